use crate::body::RigidBody;
use glam::Vec3;

const DEGENERATE_AXIS_EPSILON: f32 = 1e-12;
/// Slack added to the combined reach on edge-edge axes, in world units.
const SEPARATION_EPSILON: f32 = 1e-4;

/// Separating-axis test between two oriented boxes over the 15 candidate axes.
/// Returns true when no candidate separates them. Cross products of parallel
/// axes collapse to zero and are skipped; a zero projection of the center
/// offset never proves separation on its own. Edge-edge axes are normalized
/// and must clear the combined reach by `SEPARATION_EPSILON`, so nearly
/// parallel edges cannot report a gap out of rounding noise.
pub fn obb_overlap(a: &RigidBody, b: &RigidBody) -> bool {
    let offset = a.position() - b.position();
    let axes_a = a.axes();
    let axes_b = b.axes();
    let scaled_a = a.scaled_axes();
    let scaled_b = b.scaled_axes();

    let separates = |axis: Vec3, slack: f32| -> bool {
        let reach_a = projected_reach(&scaled_a, axis);
        let reach_b = projected_reach(&scaled_b, axis);
        offset.dot(axis).abs() > reach_a + reach_b + slack
    };

    for axis in axes_a.iter().chain(axes_b.iter()) {
        if separates(*axis, 0.0) {
            return false;
        }
    }

    for axis_a in &axes_a {
        for axis_b in &axes_b {
            let edge = axis_a.cross(*axis_b);
            if edge.length_squared() <= DEGENERATE_AXIS_EPSILON {
                continue;
            }
            if separates(edge.normalize(), SEPARATION_EPSILON) {
                return false;
            }
        }
    }

    true
}

fn projected_reach(scaled_axes: &[Vec3; 3], axis: Vec3) -> f32 {
    scaled_axes[0].dot(axis).abs() + scaled_axes[1].dot(axis).abs() + scaled_axes[2].dot(axis).abs()
}

/// Front and back sample points along the hull's heading, used by the
/// projectile hit test instead of a full box test.
pub fn hull_sample_points(hull: &RigidBody, offset: f32) -> [Vec3; 2] {
    let [_, _, back] = hull.axes();
    let center = hull.position();
    [center - back * offset, center + back * offset]
}

pub fn point_hits_hull(point: Vec3, hull: &RigidBody, offset: f32, radius: f32) -> bool {
    hull_sample_points(hull, offset)
        .iter()
        .any(|sample| sample.distance_squared(point) < radius * radius)
}
