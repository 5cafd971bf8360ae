use ordkey::TaggedKey;

///
/// QuantityAdjustment
///
/// Last change applied to an inventory count. Indexed as a tagged key, so
/// a scan over one alternative finds every row last touched that way.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, TaggedKey)]
pub enum QuantityAdjustment {
    Add(u32),
    Remove(u32),
    Set(u32),
}

impl QuantityAdjustment {
    pub const ADD: usize = 0;
    pub const REMOVE: usize = 1;
    pub const SET: usize = 2;

    /// Apply to `quantity`, or `None` if the result leaves `u32`.
    #[must_use]
    pub const fn apply(self, quantity: u32) -> Option<u32> {
        match self {
            Self::Add(n) => quantity.checked_add(n),
            Self::Remove(n) => quantity.checked_sub(n),
            Self::Set(n) => Some(n),
        }
    }

    #[must_use]
    pub const fn is_noop_delta(self) -> bool {
        matches!(self, Self::Add(0) | Self::Remove(0))
    }
}
