use stagetrack_core::{ServiceError, now_rfc3339};
use tracing::debug;

use crate::model::Lot;
use super::{InventoryService, kv_err};

/// One stage-move request. `machine` is accepted as part of the contract
/// but is a placeholder; it is not persisted.
#[derive(Debug, Clone)]
pub struct MoveStageInput {
    pub lot_no: String,
    pub from_stage: String,
    pub to_stage: String,
    pub karigar: String,
    pub machine: Option<String>,
    pub size: String,
    pub qty: u32,
}

/// How many times a move re-reads and re-validates after losing a
/// compare-and-swap race before giving up with Conflict.
const MOVE_RETRIES: usize = 5;

impl InventoryService {
    /// Move `qty` units of `size` from one stage to another within a lot.
    ///
    /// The debit and credit land in a single document write, committed
    /// with a compare-and-swap against the exact bytes read. Quantity
    /// bounds are re-validated against the stored state on every
    /// attempt, so a caller working from a stale read cannot overdraw —
    /// the stale write loses the CAS, and the re-validation rejects it.
    /// Either both sides of the move are committed, or neither is.
    pub fn move_lot_stage(&self, input: &MoveStageInput) -> Result<Lot, ServiceError> {
        if input.lot_no.trim().is_empty() {
            return Err(ServiceError::Validation("lot number must not be empty".into()));
        }
        if input.from_stage.trim().is_empty() || input.to_stage.trim().is_empty() {
            return Err(ServiceError::Validation("source and destination stage are required".into()));
        }
        if input.karigar.trim().is_empty() {
            return Err(ServiceError::Validation("karigar must be assigned to the move".into()));
        }
        if input.size.trim().is_empty() {
            return Err(ServiceError::Validation("size is required".into()));
        }

        let key = Self::lot_key(&input.lot_no);

        for _ in 0..MOVE_RETRIES {
            let (mut lot, original) = self.read_lot_raw(&input.lot_no)?;

            lot.current_stage_stock
                .transfer(&input.from_stage, &input.to_stage, &input.size, input.qty)
                .map_err(|e| ServiceError::Validation(e.to_string()))?;
            lot.update_at = Some(now_rfc3339());

            let updated = serde_json::to_vec(&lot)
                .map_err(|e| ServiceError::Internal(e.to_string()))?;

            if self
                .kv
                .compare_swap(&key, Some(original.as_slice()), &updated)
                .map_err(kv_err)?
            {
                debug!(
                    lot_no = %input.lot_no,
                    from = %input.from_stage,
                    to = %input.to_stage,
                    size = %input.size,
                    qty = input.qty,
                    karigar = %input.karigar,
                    machine = ?input.machine,
                    "stage stock moved"
                );
                return Ok(lot);
            }
            // Lost the race to a concurrent writer — re-read and re-validate.
        }

        Err(ServiceError::Conflict(format!(
            "lot '{}' is being updated concurrently, retry the move",
            input.lot_no
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StageStock;
    use crate::service::lot::CreateLotInput;
    use crate::service::test_service;

    fn seed_ring_lot(svc: &InventoryService) {
        let mut stock = StageStock::new();
        stock.set("Cutting", "Size6", 10);
        svc.create_lot(CreateLotInput {
            lot_no: "L100".into(),
            item_name: "Ring".into(),
            current_stage_stock: stock,
        })
        .unwrap();
    }

    fn move_input(from: &str, to: &str, qty: u32) -> MoveStageInput {
        MoveStageInput {
            lot_no: "L100".into(),
            from_stage: from.into(),
            to_stage: to.into(),
            karigar: "Karigar A".into(),
            machine: None,
            size: "Size6".into(),
            qty,
        }
    }

    #[test]
    fn test_move_between_stages() {
        let (svc, _dir) = test_service();
        seed_ring_lot(&svc);

        let lot = svc.move_lot_stage(&move_input("Cutting", "Polishing", 4)).unwrap();
        assert_eq!(lot.current_stage_stock.available("Cutting", "Size6"), 6);
        assert_eq!(lot.current_stage_stock.available("Polishing", "Size6"), 4);

        // The mutation is persisted, not just returned.
        let stored = svc.current_stage_stock("L100").unwrap();
        assert_eq!(stored.available("Cutting", "Size6"), 6);
        assert_eq!(stored.available("Polishing", "Size6"), 4);
        assert_eq!(stored.total_for_size("Size6"), 10);
    }

    #[test]
    fn test_overdraw_rejected_and_state_unchanged() {
        let (svc, _dir) = test_service();
        seed_ring_lot(&svc);
        svc.move_lot_stage(&move_input("Cutting", "Polishing", 4)).unwrap();

        // Polishing holds 4; moving 7 must fail without mutating.
        let err = svc.move_lot_stage(&move_input("Polishing", "Cutting", 7)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let stock = svc.current_stage_stock("L100").unwrap();
        assert_eq!(stock.available("Cutting", "Size6"), 6);
        assert_eq!(stock.available("Polishing", "Size6"), 4);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let (svc, _dir) = test_service();
        seed_ring_lot(&svc);

        let err = svc.move_lot_stage(&move_input("Cutting", "Polishing", 0)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(
            svc.current_stage_stock("L100").unwrap().available("Cutting", "Size6"),
            10
        );
    }

    #[test]
    fn test_same_stage_rejected() {
        let (svc, _dir) = test_service();
        seed_ring_lot(&svc);

        let err = svc.move_lot_stage(&move_input("Cutting", "Cutting", 2)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn test_missing_karigar_rejected() {
        let (svc, _dir) = test_service();
        seed_ring_lot(&svc);

        let mut input = move_input("Cutting", "Polishing", 2);
        input.karigar = "  ".into();
        let err = svc.move_lot_stage(&input).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn test_unknown_lot_not_found() {
        let (svc, _dir) = test_service();

        let err = svc.move_lot_stage(&move_input("Cutting", "Polishing", 1)).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn test_concurrent_moves_never_overdraw() {
        let (svc, _dir) = test_service();
        seed_ring_lot(&svc);

        // Two operators each try to move 6 of the 10 units at Cutting,
        // both validated against the same read. Exactly one can win.
        let handles: Vec<_> = ["Polishing", "Packing"]
            .into_iter()
            .map(|dest| {
                let svc = svc.clone();
                let input = move_input("Cutting", dest, 6);
                std::thread::spawn(move || svc.move_lot_stage(&input))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(succeeded, 1);

        let stock = svc.current_stage_stock("L100").unwrap();
        assert_eq!(stock.available("Cutting", "Size6"), 4);
        assert_eq!(stock.total_for_size("Size6"), 10);
    }
}
