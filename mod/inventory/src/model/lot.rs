use serde::{Deserialize, Serialize};

use super::stock::StageStock;

/// Lot — a tracked production batch of a manufactured item.
///
/// Persisted as a JSON document under `lot:{lot_no}`. The stock mapping
/// is only ever mutated by the stage-move operation; quantities shift
/// between stage/size buckets and are never created or destroyed by it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lot {
    /// Lot number, the natural primary key (e.g. "L100").
    pub lot_no: String,

    /// Item this lot produces (e.g. "Ring"). Keys the stage configuration.
    pub item_name: String,

    /// Stage → size → quantity on hand.
    #[serde(default)]
    pub current_stage_stock: StageStock,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}
