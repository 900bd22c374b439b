pub mod item;
pub mod lot;
pub mod transfer;

use std::sync::Arc;

use stagetrack_core::ServiceError;
use stagetrack_kv::{KVError, KVStore};

use crate::model::Lot;

pub use lot::CreateLotInput;
pub use transfer::MoveStageInput;

/// Inventory service — business logic over an injected KV document store.
///
/// Lot documents live under `lot:{lot_no}` in the read-write layer; item
/// stage lists and the karigar roster live under `config:*` in the
/// read-only file layer.
pub struct InventoryService {
    pub(crate) kv: Arc<dyn KVStore>,
}

impl InventoryService {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self { kv }
    }

    pub(crate) fn lot_key(lot_no: &str) -> String {
        format!("lot:{}", lot_no)
    }

    /// Read a lot document, returning both the parsed lot and the exact
    /// stored bytes. The bytes are the compare target for the CAS commit
    /// in the move operation.
    pub(crate) fn read_lot_raw(&self, lot_no: &str) -> Result<(Lot, Vec<u8>), ServiceError> {
        let bytes = self
            .kv
            .get(&Self::lot_key(lot_no))
            .map_err(kv_err)?
            .ok_or_else(|| ServiceError::NotFound(format!("lot '{}' not found", lot_no)))?;
        let lot = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Internal(format!("corrupt lot document: {}", e)))?;
        Ok((lot, bytes))
    }
}

/// Map storage-layer errors onto the service taxonomy.
pub(crate) fn kv_err(e: KVError) -> ServiceError {
    match e {
        KVError::ReadOnly(key) => ServiceError::ReadOnly(key),
        KVError::Storage(msg) => ServiceError::Storage(msg),
    }
}

#[cfg(test)]
pub(crate) fn test_service() -> (Arc<InventoryService>, tempfile::TempDir) {
    use stagetrack_kv::{OverlayKV, RedbStore};

    let dir = tempfile::tempdir().unwrap();
    let overlay = OverlayKV::new(RedbStore::open(&dir.path().join("test.redb")).unwrap());
    overlay.insert_file_entry(
        "config:item:ring".into(),
        b"name: Ring\nstages: [Cutting, Polishing, Packing]\n".to_vec(),
    );
    overlay.insert_file_entry(
        "config:karigars".into(),
        b"karigars: [Karigar A, Karigar B]\n".to_vec(),
    );
    (Arc::new(InventoryService::new(Arc::new(overlay))), dir)
}
