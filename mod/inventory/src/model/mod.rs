pub mod item;
pub mod lot;
pub mod stock;

pub use item::{ItemConfig, KarigarRoster};
pub use lot::Lot;
pub use stock::{SizeAvailability, StageStock, TransferError};
