use std::collections::BTreeMap;
use tankarena_core::{AssetHandle, RenderKey, RenderSink};

/// Everything the simulation currently wants on screen, kept in draw order:
/// obstacles, then tank parts, then shells.
#[derive(Debug, Default)]
pub struct Registry {
    instances: BTreeMap<RenderKey, AssetHandle>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn instances(&self) -> impl Iterator<Item = (RenderKey, AssetHandle)> + '_ {
        self.instances.iter().map(|(key, asset)| (*key, *asset))
    }
}

impl RenderSink for Registry {
    fn register_instance(&mut self, key: RenderKey, asset: AssetHandle) {
        if self.instances.insert(key, asset).is_some() {
            log::warn!("{:?} registered twice", key);
        }
    }

    fn unregister_instance(&mut self, key: RenderKey) {
        if self.instances.remove(&key).is_none() {
            log::warn!("{:?} unregistered without being registered", key);
        }
    }
}
