use glam::{Mat4, Vec3};

/// A positioned, oriented box. Position and axes are always derived from the
/// cached transform, so they can never go stale relative to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidBody {
    transform: Mat4,
    half_extents: Vec3,
    position: Vec3,
    axes: [Vec3; 3],
}

impl RigidBody {
    pub fn new(transform: Mat4, half_extents: Vec3) -> Self {
        let mut body = Self {
            transform,
            half_extents,
            position: Vec3::ZERO,
            axes: [Vec3::X, Vec3::Y, Vec3::Z],
        };
        body.refresh_collision_vectors();
        body
    }

    /// Box whose transform is `translate(position) * scale(half_extents)`.
    pub fn axis_aligned(position: Vec3, half_extents: Vec3) -> Self {
        Self::new(
            Mat4::from_translation(position) * Mat4::from_scale(half_extents),
            half_extents,
        )
    }

    /// `translate(position) * rotate_y(yaw) * scale(half_extents)`, yaw in degrees.
    pub fn with_yaw(position: Vec3, yaw_degrees: f32, half_extents: Vec3) -> Self {
        Self::new(
            Mat4::from_translation(position)
                * Mat4::from_rotation_y(yaw_degrees.to_radians())
                * Mat4::from_scale(half_extents),
            half_extents,
        )
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// Unit right, up and back axes, in that order.
    pub fn axes(&self) -> [Vec3; 3] {
        self.axes
    }

    /// Replaces the transform and re-derives position and axes in the same call.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.refresh_collision_vectors();
    }

    /// The three axes scaled by their half extents.
    pub fn scaled_axes(&self) -> [Vec3; 3] {
        [
            self.axes[0] * self.half_extents.x,
            self.axes[1] * self.half_extents.y,
            self.axes[2] * self.half_extents.z,
        ]
    }

    fn refresh_collision_vectors(&mut self) {
        self.axes = [
            self.transform.x_axis.truncate().normalize_or_zero(),
            self.transform.y_axis.truncate().normalize_or_zero(),
            self.transform.z_axis.truncate().normalize_or_zero(),
        ];
        self.position = self.transform.w_axis.truncate();
    }
}
