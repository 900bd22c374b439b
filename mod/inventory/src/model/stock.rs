use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a stock transfer was rejected. No variant mutates state.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TransferError {
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("source and destination stage must differ")]
    SameStage,

    #[error("only {available} of size '{size}' at stage '{stage}', requested {requested}")]
    Insufficient {
        stage: String,
        size: String,
        available: u32,
        requested: u32,
    },

    #[error("destination quantity would overflow")]
    QuantityOverflow,
}

/// Per-size availability at a stage, used to drive the operator form's
/// size selector and quantity cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeAvailability {
    pub size: String,
    pub available: u32,
}

/// Current stock of a lot: stage name → size label → quantity on hand.
///
/// The mapping is sparse — an absent stage or size means zero. Quantities
/// are unsigned, so a negative count is unrepresentable. Size buckets
/// that reach zero are pruned on mutation; stage keys are kept even when
/// their size map is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageStock(BTreeMap<String, BTreeMap<String, u32>>);

impl StageStock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity on hand for (stage, size). Absent keys read as zero.
    pub fn available(&self, stage: &str, size: &str) -> u32 {
        self.0
            .get(stage)
            .and_then(|sizes| sizes.get(size))
            .copied()
            .unwrap_or(0)
    }

    /// Set the quantity for (stage, size). A zero quantity removes the
    /// size bucket but keeps the stage key.
    pub fn set(&mut self, stage: &str, size: &str, qty: u32) {
        let sizes = self.0.entry(stage.to_string()).or_default();
        if qty == 0 {
            sizes.remove(size);
        } else {
            sizes.insert(size.to_string(), qty);
        }
    }

    /// Sizes with strictly positive quantity at `stage`, with their
    /// current quantity as the maximum transferable amount.
    pub fn sizes_available(&self, stage: &str) -> Vec<SizeAvailability> {
        self.0
            .get(stage)
            .map(|sizes| {
                sizes
                    .iter()
                    .filter(|(_, qty)| **qty > 0)
                    .map(|(size, qty)| SizeAvailability {
                        size: size.clone(),
                        available: *qty,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Stage names present in the mapping (including empty ones).
    pub fn stages(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    /// Total quantity of `size` across all stages.
    pub fn total_for_size(&self, size: &str) -> u64 {
        self.0
            .values()
            .filter_map(|sizes| sizes.get(size))
            .map(|qty| *qty as u64)
            .sum()
    }

    /// Drop size buckets recorded at zero. Documents deserialized from
    /// external input may carry explicit zeros; internal mutation never
    /// produces them.
    pub fn normalize(&mut self) {
        for sizes in self.0.values_mut() {
            sizes.retain(|_, qty| *qty > 0);
        }
    }

    /// Move `qty` units of `size` from `from` to `to`.
    ///
    /// Validates against the current mapping, not any earlier read:
    /// rejects zero quantity, identical stages, and any amount exceeding
    /// what is on hand at the source. On success the source bucket is
    /// debited (and pruned if it reaches zero) and the destination bucket
    /// is credited, created at zero if absent. On error the mapping is
    /// untouched.
    pub fn transfer(
        &mut self,
        from: &str,
        to: &str,
        size: &str,
        qty: u32,
    ) -> Result<(), TransferError> {
        if qty == 0 {
            return Err(TransferError::ZeroQuantity);
        }
        if from == to {
            return Err(TransferError::SameStage);
        }

        let available = self.available(from, size);
        if qty > available {
            return Err(TransferError::Insufficient {
                stage: from.to_string(),
                size: size.to_string(),
                available,
                requested: qty,
            });
        }

        let credited = self
            .available(to, size)
            .checked_add(qty)
            .ok_or(TransferError::QuantityOverflow)?;

        // Debit the source. available > 0 guarantees the bucket exists.
        if let Some(sizes) = self.0.get_mut(from) {
            let remaining = available - qty;
            if remaining == 0 {
                sizes.remove(size);
            } else {
                sizes.insert(size.to_string(), remaining);
            }
        }

        // Credit the destination.
        self.0
            .entry(to.to_string())
            .or_default()
            .insert(size.to_string(), credited);

        Ok(())
    }
}
