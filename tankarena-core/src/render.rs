use crate::arena::Handle;
use crate::tank::{TankId, TankPart};
use serde::{Deserialize, Serialize};

/// Opaque reference to renderable geometry owned by the frontend. The core
/// stores and forwards it, never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankAssets {
    pub hull: AssetHandle,
    pub turret: AssetHandle,
    pub cannon: AssetHandle,
}

impl TankAssets {
    pub fn for_part(&self, part: TankPart) -> AssetHandle {
        match part {
            TankPart::Hull => self.hull,
            TankPart::Turret => self.turret,
            TankPart::Cannon => self.cannon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneAssets {
    pub player: TankAssets,
    pub enemy: TankAssets,
    pub obstacle: AssetHandle,
    pub projectile: AssetHandle,
}

impl Default for SceneAssets {
    fn default() -> Self {
        Self {
            player: TankAssets {
                hull: AssetHandle(0),
                turret: AssetHandle(1),
                cannon: AssetHandle(2),
            },
            enemy: TankAssets {
                hull: AssetHandle(3),
                turret: AssetHandle(4),
                cannon: AssetHandle(5),
            },
            obstacle: AssetHandle(6),
            projectile: AssetHandle(7),
        }
    }
}

/// Identity of everything the core asks the frontend to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderKey {
    Obstacle(usize),
    Tank(TankId, TankPart),
    Projectile(Handle),
}

/// Render registration. The core calls `register_instance` exactly once when
/// a body starts needing to be drawn and `unregister_instance` exactly once
/// when it stops. Transforms are read back through the world after a tick.
pub trait RenderSink {
    fn register_instance(&mut self, key: RenderKey, asset: AssetHandle);
    fn unregister_instance(&mut self, key: RenderKey);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn register_instance(&mut self, _key: RenderKey, _asset: AssetHandle) {}
    fn unregister_instance(&mut self, _key: RenderKey) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEvent {
    Registered(RenderKey, AssetHandle),
    Unregistered(RenderKey),
}

/// Keeps every registration call in order. Useful for headless runs and for
/// checking the exactly-once contract.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<RenderEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys registered and not yet unregistered, in registration order.
    pub fn live_keys(&self) -> Vec<RenderKey> {
        let mut live = Vec::new();
        for event in &self.events {
            match event {
                RenderEvent::Registered(key, _) => live.push(*key),
                RenderEvent::Unregistered(key) => live.retain(|existing| existing != key),
            }
        }
        live
    }

    pub fn registrations_of(&self, key: RenderKey) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, RenderEvent::Registered(k, _) if *k == key))
            .count()
    }

    pub fn unregistrations_of(&self, key: RenderKey) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, RenderEvent::Unregistered(k) if *k == key))
            .count()
    }
}

impl RenderSink for RecordingSink {
    fn register_instance(&mut self, key: RenderKey, asset: AssetHandle) {
        self.events.push(RenderEvent::Registered(key, asset));
    }

    fn unregister_instance(&mut self, key: RenderKey) {
        self.events.push(RenderEvent::Unregistered(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_keys_track_unregistration() {
        let mut sink = RecordingSink::new();
        let hull = RenderKey::Tank(TankId::Player, TankPart::Hull);
        let crate_key = RenderKey::Obstacle(0);
        sink.register_instance(hull, AssetHandle(0));
        sink.register_instance(crate_key, AssetHandle(6));
        sink.unregister_instance(hull);

        assert_eq!(sink.live_keys(), vec![crate_key]);
        assert_eq!(sink.registrations_of(hull), 1);
        assert_eq!(sink.unregistrations_of(hull), 1);
        assert_eq!(sink.unregistrations_of(crate_key), 0);
    }

    #[test]
    fn tank_assets_resolve_by_part() {
        let assets = SceneAssets::default();
        assert_eq!(assets.enemy.for_part(TankPart::Cannon), AssetHandle(5));
    }
}
