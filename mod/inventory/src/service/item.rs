use stagetrack_core::ServiceError;

use crate::model::{ItemConfig, KarigarRoster};
use super::{InventoryService, kv_err};

impl InventoryService {
    /// Ordered stage names configured for an item type.
    ///
    /// Unknown or empty item names yield an empty sequence, not an
    /// error — the destination selector simply has nothing to offer.
    /// Lookups are case-insensitive (config keys are lowercased file
    /// stems).
    pub fn stages_for_item(&self, item_name: &str) -> Result<Vec<String>, ServiceError> {
        let name = item_name.trim().to_lowercase();
        if name.is_empty() {
            return Ok(Vec::new());
        }

        let key = format!("config:item:{}", name);
        match self.kv.get(&key).map_err(kv_err)? {
            Some(bytes) => {
                let config: ItemConfig = serde_yml::from_slice(&bytes).map_err(|e| {
                    ServiceError::Internal(format!("invalid item config '{}': {}", name, e))
                })?;
                Ok(config.stages)
            }
            None => Ok(Vec::new()),
        }
    }

    /// The configured worker/outsource roster. Empty when unconfigured.
    pub fn karigars(&self) -> Result<Vec<String>, ServiceError> {
        match self.kv.get("config:karigars").map_err(kv_err)? {
            Some(bytes) => {
                let roster: KarigarRoster = serde_yml::from_slice(&bytes).map_err(|e| {
                    ServiceError::Internal(format!("invalid karigar roster: {}", e))
                })?;
                Ok(roster.karigars)
            }
            None => Ok(Vec::new()),
        }
    }
}
