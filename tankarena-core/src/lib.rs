pub mod ai;
pub mod arena;
pub mod body;
pub mod collision;
pub mod config;
pub mod input;
pub mod layout;
pub mod match_state;
pub mod movement;
pub mod projectile;
pub mod render;
pub mod snapshot;
pub mod tank;
pub mod world;

pub use glam;

pub use ai::{AiDecision, AiTuning, AiView, Positioning};
pub use arena::{Arena, Handle};
pub use body::RigidBody;
pub use collision::{obb_overlap, point_hits_hull};
pub use config::{ConfigError, MatchConfig, RulesConfig, TankTuning};
pub use input::{PlayerInput, TickClock};
pub use layout::{ObstacleSpec, ScatterSpec};
pub use match_state::{MatchState, MatchStatus, Outcome};
pub use projectile::{Ballistics, Projectile};
pub use render::{AssetHandle, NullSink, RecordingSink, RenderKey, RenderSink, SceneAssets};
pub use snapshot::WorldSnapshot;
pub use tank::{SpawnPose, Tank, TankId, TankPart};
pub use world::{Hit, ShotEntry, TickReport, World};
