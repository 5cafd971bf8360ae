use crate::{
    Cargo, CargoId, Inventory, InventoryId, Manifest, ManifestId, QuantityAdjustment, Warehouse,
    WarehouseId,
};
use ordkey::{
    config::{ConfigError, Scope, StoreConfig},
    error::InternalError,
    key::{StringKey, alternative_range, key_range, prefix_range2},
    model::Record,
    store::Table,
};
use std::collections::{BTreeMap, btree_map::Entry};
use thiserror::Error as ThisError;

///
/// SupplyError
///

#[derive(Debug, ThisError)]
pub enum SupplyError {
    #[error("{record} #{id} does not exist")]
    Missing { record: &'static str, id: u64 },

    #[error("quantity delta cannot be zero")]
    ZeroDelta,

    #[error("cannot take {requested} units from {record} #{id}: only {available} held")]
    InsufficientQuantity {
        record: &'static str,
        id: u64,
        requested: u32,
        available: u32,
    },

    #[error("adjusting {record} #{id} would overflow its quantity")]
    QuantityOverflow { record: &'static str, id: u64 },

    #[error("nothing to ship")]
    EmptyPickList,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

///
/// SupplyChain
///
/// Warehouses live in the global scope. Stock is partitioned per
/// warehouse; manifests and cargo are partitioned per carrier.
///

#[derive(Debug)]
pub struct SupplyChain {
    config: StoreConfig,
    warehouses: Table<Warehouse>,
    stock: BTreeMap<Scope, Table<Inventory>>,
    manifests: BTreeMap<Scope, Table<Manifest>>,
    cargo: BTreeMap<Scope, Table<Cargo>>,
}

impl SupplyChain {
    pub fn open(config: StoreConfig) -> Result<Self, SupplyError> {
        let warehouses = Table::open(config.clone().with_scope(Scope::global()))?;

        Ok(Self {
            config,
            warehouses,
            stock: BTreeMap::new(),
            manifests: BTreeMap::new(),
            cargo: BTreeMap::new(),
        })
    }

    /// Scope holding the stock of one warehouse.
    pub fn warehouse_scope(warehouse: WarehouseId) -> Result<Scope, SupplyError> {
        Ok(Scope::new(format!("warehouse.{warehouse}"))?)
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn warehouses(&self) -> &Table<Warehouse> {
        &self.warehouses
    }

    pub fn stock(&self, warehouse: WarehouseId) -> Result<Option<&Table<Inventory>>, SupplyError> {
        Ok(self.stock.get(&Self::warehouse_scope(warehouse)?))
    }

    pub fn manifests(&self, carrier: &str) -> Result<Option<&Table<Manifest>>, SupplyError> {
        Ok(self.manifests.get(&Scope::new(carrier)?))
    }

    pub fn cargo(&self, carrier: &str) -> Result<Option<&Table<Cargo>>, SupplyError> {
        Ok(self.cargo.get(&Scope::new(carrier)?))
    }

    // ------------------------------------------------------------------
    // Warehouses and inventory
    // ------------------------------------------------------------------

    pub fn add_warehouse(
        &mut self,
        manager: &str,
        description: &str,
    ) -> Result<WarehouseId, SupplyError> {
        let warehouse = self.warehouses.create(manager, |id| Warehouse {
            id,
            manager: manager.into(),
            description: description.to_string(),
        })?;

        Ok(warehouse.id)
    }

    /// Warehouses run by `manager`, in id order.
    pub fn warehouses_managed_by(&self, manager: &str) -> Result<Vec<&Warehouse>, SupplyError> {
        let index = self.warehouses.secondary_index(Warehouse::BY_MANAGER)?;

        Ok(index.equal_range(StringKey::new(manager)))
    }

    pub fn add_inventory(
        &mut self,
        warehouse: WarehouseId,
        description: &str,
        quantity: u32,
    ) -> Result<InventoryId, SupplyError> {
        let manager = self.warehouses.get_by_id(warehouse)?.manager.clone();
        let stock = open_scoped(&mut self.stock, &self.config, Self::warehouse_scope(warehouse)?)?;

        let inventory = stock.create(manager, |id| Inventory {
            id,
            description: description.to_string(),
            quantity,
            last_adjustment: QuantityAdjustment::Set(quantity),
        })?;

        Ok(inventory.id)
    }

    pub fn adjust_inventory(
        &mut self,
        warehouse: WarehouseId,
        inventory: InventoryId,
        adjustment: QuantityAdjustment,
    ) -> Result<u32, SupplyError> {
        if adjustment.is_noop_delta() {
            return Err(SupplyError::ZeroDelta);
        }

        let manager = self.warehouses.get_by_id(warehouse)?.manager.clone();
        let stock = self.stock_mut(warehouse, inventory)?;
        let current = stock.get_by_id(inventory)?.quantity;

        let quantity = adjustment.apply(current).ok_or(match adjustment {
            QuantityAdjustment::Remove(requested) => SupplyError::InsufficientQuantity {
                record: Inventory::RECORD_NAME,
                id: inventory.get(),
                requested,
                available: current,
            },
            _ => SupplyError::QuantityOverflow {
                record: Inventory::RECORD_NAME,
                id: inventory.get(),
            },
        })?;

        stock.modify(inventory, manager, |row| {
            row.quantity = quantity;
            row.last_adjustment = adjustment;
        })?;

        Ok(quantity)
    }

    /// Stock whose description matches exactly (after 32-byte truncation).
    pub fn inventory_by_description(
        &self,
        warehouse: WarehouseId,
        description: &str,
    ) -> Result<Vec<&Inventory>, SupplyError> {
        let Some(stock) = self.stock(warehouse)? else {
            return Ok(Vec::new());
        };
        let index = stock.secondary_index(Inventory::BY_DESCRIPTION)?;

        Ok(index.equal_range(StringKey::new(description)))
    }

    /// Stock whose last adjustment was of kind `position`
    /// (see the `QuantityAdjustment` position constants), ordered by amount.
    pub fn inventory_adjusted_by(
        &self,
        warehouse: WarehouseId,
        position: usize,
    ) -> Result<Vec<&Inventory>, SupplyError> {
        let range = alternative_range::<QuantityAdjustment>(position).map_err(InternalError::from)?;
        let Some(stock) = self.stock(warehouse)? else {
            return Ok(Vec::new());
        };

        Ok(stock
            .secondary_index(Inventory::BY_LAST_ADJUSTMENT)?
            .range(*range.start()..=*range.end()))
    }

    /// All stock in last-adjustment order: adds, then removes, then sets.
    pub fn inventory_by_adjustment(
        &self,
        warehouse: WarehouseId,
    ) -> Result<Vec<&Inventory>, SupplyError> {
        let Some(stock) = self.stock(warehouse)? else {
            return Ok(Vec::new());
        };

        // recomputed per scan: the upper bound moves when alternatives are appended
        let range = key_range::<QuantityAdjustment>();

        Ok(stock
            .secondary_index(Inventory::BY_LAST_ADJUSTMENT)?
            .range(*range.start()..=*range.end()))
    }

    // ------------------------------------------------------------------
    // Shipping
    // ------------------------------------------------------------------

    /// Move picked stock onto a new manifest held by `carrier`.
    /// Picks naming the same row are summed into one cargo row.
    /// Inventory rows drained to zero are erased.
    pub fn ship_inventory(
        &mut self,
        warehouse: WarehouseId,
        carrier: &str,
        picks: &[(InventoryId, u32)],
        documentation: &str,
    ) -> Result<ManifestId, SupplyError> {
        if picks.is_empty() {
            return Err(SupplyError::EmptyPickList);
        }

        let manager = self.warehouses.get_by_id(warehouse)?.manager.clone();

        // merge repeated ids, then validate every total before any table changes
        let mut totals: BTreeMap<InventoryId, u32> = BTreeMap::new();
        for &(id, requested) in picks {
            if requested == 0 {
                return Err(SupplyError::ZeroDelta);
            }
            let total = totals.entry(id).or_default();
            *total = total
                .checked_add(requested)
                .ok_or(SupplyError::QuantityOverflow {
                    record: Inventory::RECORD_NAME,
                    id: id.get(),
                })?;
        }

        let mut picked = Vec::with_capacity(totals.len());
        {
            let stock = self.stock_mut(warehouse, picks[0].0)?;
            for (id, requested) in totals {
                let inventory = stock.find(id).ok_or(SupplyError::Missing {
                    record: Inventory::RECORD_NAME,
                    id: id.get(),
                })?;
                let remaining = inventory.quantity.checked_sub(requested).ok_or(
                    SupplyError::InsufficientQuantity {
                        record: Inventory::RECORD_NAME,
                        id: id.get(),
                        requested,
                        available: inventory.quantity,
                    },
                )?;
                picked.push(Pick {
                    id,
                    description: inventory.description.clone(),
                    quantity: requested,
                    remaining,
                });
            }
        }

        let carrier_scope = Scope::new(carrier)?;
        let manifests = open_scoped(&mut self.manifests, &self.config, carrier_scope.clone())?;
        let manifest = manifests
            .create(carrier, |id| Manifest {
                id,
                description: documentation.to_string(),
                sender: warehouse,
            })?
            .id;

        let cargo = open_scoped(&mut self.cargo, &self.config, carrier_scope)?;
        for pick in &picked {
            cargo.create(carrier, |id| Cargo {
                id,
                manifest,
                description: pick.description.clone(),
                quantity: pick.quantity,
            })?;
        }

        let stock = self.stock_mut(warehouse, picks[0].0)?;
        for pick in picked {
            if pick.remaining == 0 {
                stock.erase(pick.id)?;
            } else {
                stock.modify(pick.id, manager.clone(), |row| {
                    row.quantity = pick.remaining;
                    row.last_adjustment = QuantityAdjustment::Remove(pick.quantity);
                })?;
            }
        }

        Ok(manifest)
    }

    /// Cargo rows carried under one manifest, in id order.
    pub fn manifest_cargo(
        &self,
        carrier: &str,
        manifest: ManifestId,
    ) -> Result<Vec<&Cargo>, SupplyError> {
        let Some(cargo) = self.cargo(carrier)? else {
            return Ok(Vec::new());
        };

        Ok(cargo
            .secondary_index(Cargo::BY_MANIFEST)?
            .equal_range(manifest.get()))
    }

    /// Manifests a carrier holds from one sending warehouse, oldest first.
    pub fn manifests_from(
        &self,
        carrier: &str,
        sender: WarehouseId,
    ) -> Result<Vec<&Manifest>, SupplyError> {
        let Some(manifests) = self.manifests(carrier)? else {
            return Ok(Vec::new());
        };
        let range = prefix_range2(sender.get());

        Ok(manifests
            .secondary_index(Manifest::BY_SENDER)?
            .range(*range.start()..=*range.end()))
    }

    /// Take `quantity` units off a cargo row. A row reaching zero is
    /// erased, and a manifest left without cargo is erased with it.
    pub fn remove_cargo(
        &mut self,
        carrier: &str,
        manifest: ManifestId,
        cargo_id: CargoId,
        quantity: u32,
    ) -> Result<(), SupplyError> {
        if quantity == 0 {
            return Err(SupplyError::ZeroDelta);
        }

        let scope = Scope::new(carrier)?;
        let missing_manifest = SupplyError::Missing {
            record: Manifest::RECORD_NAME,
            id: manifest.get(),
        };
        let manifests = self.manifests.get_mut(&scope).ok_or(missing_manifest)?;
        manifests.get_by_id(manifest)?;

        let stock = self.cargo.get_mut(&scope).ok_or(SupplyError::Missing {
            record: Cargo::RECORD_NAME,
            id: cargo_id.get(),
        })?;
        let held = stock.get_by_id(cargo_id)?.quantity;
        if held < quantity {
            return Err(SupplyError::InsufficientQuantity {
                record: Cargo::RECORD_NAME,
                id: cargo_id.get(),
                requested: quantity,
                available: held,
            });
        }

        if held > quantity {
            stock.modify(cargo_id, carrier, |row| row.quantity -= quantity)?;
            return Ok(());
        }

        stock.erase(cargo_id)?;
        if !stock
            .secondary_index(Cargo::BY_MANIFEST)?
            .contains(manifest.get())
        {
            manifests.erase(manifest)?;
        }

        Ok(())
    }

    fn stock_mut(
        &mut self,
        warehouse: WarehouseId,
        inventory: InventoryId,
    ) -> Result<&mut Table<Inventory>, SupplyError> {
        self.stock
            .get_mut(&Self::warehouse_scope(warehouse)?)
            .ok_or(SupplyError::Missing {
                record: Inventory::RECORD_NAME,
                id: inventory.get(),
            })
    }
}

///
/// Pick
/// One validated inventory row to ship, with repeated ids merged.
///

struct Pick {
    id: InventoryId,
    description: String,
    quantity: u32,
    remaining: u32,
}

// open_scoped
// Fetch the table for `scope`, opening it on first use.
fn open_scoped<'a, R: Record>(
    tables: &'a mut BTreeMap<Scope, Table<R>>,
    config: &StoreConfig,
    scope: Scope,
) -> Result<&'a mut Table<R>, SupplyError> {
    match tables.entry(scope) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            let table = Table::open(config.clone().with_scope(entry.key().clone()))?;

            Ok(entry.insert(table))
        }
    }
}
