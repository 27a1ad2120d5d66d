//! Color registry: one color per external asset, allocated per kind band.

use bridge_primitives::{Address, AssetKind, Color};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::LedgerError;

/// A registered asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    /// Color assigned to the asset.
    pub color: Color,
    /// External asset identifier.
    pub asset: Address,
    /// Kind the asset was registered as.
    pub kind: AssetKind,
}

/// Parses a wire kind code.
pub fn parse_kind(code: u8) -> Result<AssetKind, LedgerError> {
    AssetKind::try_from(code).map_err(|_| LedgerError::InvalidKind(code))
}

/// Append-only color table.
///
/// Colors are never reclaimed, so the allocation counter of a kind is also
/// the number of entries of that kind.
#[derive(Debug, Clone, Default)]
pub struct ColorRegistry {
    by_color: BTreeMap<Color, ColorEntry>,
    by_asset: BTreeMap<Address, Color>,
    allocated: BTreeMap<AssetKind, u32>,
}

impl ColorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the entry a registration of `asset` would create.
    pub fn prepare(&self, asset: Address, kind: AssetKind) -> Result<ColorEntry, LedgerError> {
        if self.by_asset.contains_key(&asset) {
            return Err(LedgerError::AlreadyRegistered(asset));
        }
        let allocated = self.token_count(kind);
        let color = kind
            .nth_color(allocated)
            .ok_or(LedgerError::ColorRangeExhausted { kind, allocated })?;
        Ok(ColorEntry { color, asset, kind })
    }

    pub(crate) fn insert(&mut self, entry: ColorEntry) -> Result<(), LedgerError> {
        let expected = self.prepare(entry.asset, entry.kind)?;
        if expected.color != entry.color {
            return Err(LedgerError::UnknownColor(entry.color));
        }
        *self.allocated.entry(entry.kind).or_insert(0) += 1;
        self.by_asset.insert(entry.asset, entry.color);
        self.by_color.insert(entry.color, entry);
        Ok(())
    }

    /// Returns the asset registered under `color`.
    pub fn resolve(&self, color: Color) -> Result<Address, LedgerError> {
        self.entry(color).map(|e| e.asset)
    }

    /// Returns the kind of a registered color.
    pub fn kind_of(&self, color: Color) -> Result<AssetKind, LedgerError> {
        self.entry(color)?;
        color.kind().ok_or(LedgerError::UnknownColor(color))
    }

    /// Returns the full entry for `color`.
    pub fn entry(&self, color: Color) -> Result<&ColorEntry, LedgerError> {
        self.by_color
            .get(&color)
            .ok_or(LedgerError::UnknownColor(color))
    }

    /// Returns the color registered for `asset`, if any.
    pub fn color_of(&self, asset: &Address) -> Option<Color> {
        self.by_asset.get(asset).copied()
    }

    /// Number of colors allocated for `kind`.
    pub fn token_count(&self, kind: AssetKind) -> u32 {
        self.allocated.get(&kind).copied().unwrap_or(0)
    }

    /// Entries in color order.
    pub fn entries(&self) -> impl Iterator<Item = &ColorEntry> {
        self.by_color.values()
    }

    /// Total number of registered assets.
    pub fn len(&self) -> usize {
        self.by_color.len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.by_color.is_empty()
    }
}
