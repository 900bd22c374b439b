use stagetrack_core::{ListParams, ListResult, ServiceError, now_rfc3339};

use crate::model::{Lot, SizeAvailability, StageStock};
use super::{InventoryService, kv_err};

pub struct CreateLotInput {
    pub lot_no: String,
    pub item_name: String,
    pub current_stage_stock: StageStock,
}

impl InventoryService {
    /// Create a lot. The lot number is the natural key; creating an
    /// existing lot is a conflict, never an overwrite.
    pub fn create_lot(&self, input: CreateLotInput) -> Result<Lot, ServiceError> {
        let lot_no = input.lot_no.trim();
        if lot_no.is_empty() {
            return Err(ServiceError::Validation("lot number must not be empty".into()));
        }
        if input.item_name.trim().is_empty() {
            return Err(ServiceError::Validation("item name must not be empty".into()));
        }

        let mut stock = input.current_stage_stock;
        stock.normalize();

        let now = now_rfc3339();
        let record = Lot {
            lot_no: lot_no.to_string(),
            item_name: input.item_name.trim().to_string(),
            current_stage_stock: stock,
            create_at: Some(now.clone()),
            update_at: Some(now),
        };

        let bytes = serde_json::to_vec(&record)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let inserted = self
            .kv
            .compare_swap(&Self::lot_key(lot_no), None, &bytes)
            .map_err(kv_err)?;
        if !inserted {
            return Err(ServiceError::Conflict(format!("lot '{}' already exists", lot_no)));
        }

        Ok(record)
    }

    /// Get a lot by lot number.
    pub fn get_lot(&self, lot_no: &str) -> Result<Lot, ServiceError> {
        self.read_lot_raw(lot_no).map(|(lot, _)| lot)
    }

    /// The lot's current stage → size → quantity mapping, read fresh.
    pub fn current_stage_stock(&self, lot_no: &str) -> Result<StageStock, ServiceError> {
        Ok(self.get_lot(lot_no)?.current_stage_stock)
    }

    /// List lots ordered by lot number, with offset/limit pagination.
    pub fn list_lots(&self, params: &ListParams) -> Result<ListResult<Lot>, ServiceError> {
        let limit = params.limit.min(500);
        let entries = self.kv.scan("lot:").map_err(kv_err)?;
        let total = entries.len();

        let mut items = Vec::new();
        for (_, bytes) in entries.into_iter().skip(params.offset).take(limit) {
            let lot: Lot = serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Internal(format!("corrupt lot document: {}", e)))?;
            items.push(lot);
        }

        Ok(ListResult { items, total })
    }

    /// Sizes selectable for a transfer out of `stage`: exactly those with
    /// strictly positive quantity, each carrying its max transferable
    /// amount. An empty result means the stage has nothing to move and
    /// the quantity control stays disabled.
    pub fn selectable_sizes(
        &self,
        lot_no: &str,
        stage: &str,
    ) -> Result<Vec<SizeAvailability>, ServiceError> {
        Ok(self.get_lot(lot_no)?.current_stage_stock.sizes_available(stage))
    }
}
