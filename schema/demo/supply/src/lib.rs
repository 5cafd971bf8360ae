//! Supply-chain demo schema.
//!
//! Four record types, each declaring the secondary indexes a carrier
//! network needs: cargo by manifest, manifests by sender, stock by
//! description and by last quantity adjustment, warehouses by manager.
//! `SupplyChain` drives them through scoped reference tables.

mod adjustment;
mod chain;
mod record;

pub use adjustment::QuantityAdjustment;
pub use chain::{SupplyChain, SupplyError};
pub use record::{
    Cargo, CargoId, Inventory, InventoryId, Manifest, ManifestId, Warehouse, WarehouseId,
};
