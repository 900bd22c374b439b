use serde::{Deserialize, Serialize};

/// Per-item stage configuration, loaded from `items/{item}.yaml`:
///
/// ```yaml
/// name: Ring
/// stages: [Cutting, Polishing, Packing]
/// ```
///
/// The stage list is ordered; the form offers destinations in this order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub stages: Vec<String>,
}

/// Worker/outsource roster, loaded from `karigars.yaml`:
///
/// ```yaml
/// karigars: [Karigar A, Karigar B, Outsource X]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KarigarRoster {
    #[serde(default)]
    pub karigars: Vec<String>,
}
