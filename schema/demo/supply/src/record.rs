use crate::QuantityAdjustment;
use ordkey::{
    key::{KeyEncodeError, TaggedKey as _, combine2, encode_string},
    model::{IndexKey, KeyKind, Payer, Record, RecordId, SecondaryIndex},
};

pub type WarehouseId = RecordId<Warehouse>;
pub type InventoryId = RecordId<Inventory>;
pub type ManifestId = RecordId<Manifest>;
pub type CargoId = RecordId<Cargo>;

///
/// Warehouse
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub manager: Payer,
    pub description: String,
}

impl Warehouse {
    pub const BY_MANAGER: &'static str = "by.manager";

    fn manager_key(&self) -> Result<IndexKey, KeyEncodeError> {
        Ok(encode_string(self.manager.as_str()).into())
    }
}

impl Record for Warehouse {
    const RECORD_NAME: &'static str = "warehouses";
    const INDEXES: &'static [SecondaryIndex<Self>] = &[SecondaryIndex::new(
        Self::BY_MANAGER,
        Self::RECORD_NAME,
        KeyKind::U256,
        Self::manager_key,
    )];

    fn id(&self) -> WarehouseId {
        self.id
    }
}

///
/// Inventory
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Inventory {
    pub id: InventoryId,
    pub description: String,
    pub quantity: u32,
    pub last_adjustment: QuantityAdjustment,
}

impl Inventory {
    pub const BY_DESCRIPTION: &'static str = "by.descript";
    pub const BY_LAST_ADJUSTMENT: &'static str = "by.lastadj";

    fn description_key(&self) -> Result<IndexKey, KeyEncodeError> {
        Ok(encode_string(&self.description).into())
    }

    fn last_adjustment_key(&self) -> Result<IndexKey, KeyEncodeError> {
        Ok(self.last_adjustment.encode()?.into())
    }
}

impl Record for Inventory {
    const RECORD_NAME: &'static str = "inventory";
    const INDEXES: &'static [SecondaryIndex<Self>] = &[
        SecondaryIndex::new(
            Self::BY_DESCRIPTION,
            Self::RECORD_NAME,
            KeyKind::U256,
            Self::description_key,
        ),
        SecondaryIndex::new(
            Self::BY_LAST_ADJUSTMENT,
            Self::RECORD_NAME,
            KeyKind::U64,
            Self::last_adjustment_key,
        ),
    ];

    fn id(&self) -> InventoryId {
        self.id
    }
}

///
/// Manifest
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Manifest {
    pub id: ManifestId,
    pub description: String,
    pub sender: WarehouseId,
}

impl Manifest {
    pub const BY_SENDER: &'static str = "by.sender";

    // (sender, id): one sender's manifests are contiguous, oldest first
    fn sender_key(&self) -> Result<IndexKey, KeyEncodeError> {
        Ok(combine2(self.sender.get(), self.id.get()).into())
    }
}

impl Record for Manifest {
    const RECORD_NAME: &'static str = "manifests";
    const INDEXES: &'static [SecondaryIndex<Self>] = &[SecondaryIndex::new(
        Self::BY_SENDER,
        Self::RECORD_NAME,
        KeyKind::U128,
        Self::sender_key,
    )];

    fn id(&self) -> ManifestId {
        self.id
    }
}

///
/// Cargo
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cargo {
    pub id: CargoId,
    pub manifest: ManifestId,
    pub description: String,
    pub quantity: u32,
}

impl Cargo {
    pub const BY_MANIFEST: &'static str = "by.manifest";

    fn manifest_key(&self) -> Result<IndexKey, KeyEncodeError> {
        Ok(self.manifest.get().into())
    }
}

impl Record for Cargo {
    const RECORD_NAME: &'static str = "cargo";
    const INDEXES: &'static [SecondaryIndex<Self>] = &[SecondaryIndex::new(
        Self::BY_MANIFEST,
        Self::RECORD_NAME,
        KeyKind::U64,
        Self::manifest_key,
    )];

    fn id(&self) -> CargoId {
        self.id
    }
}
