use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::validation::ValidationError;

/// Upper bound (exclusive) of the whole color space.
pub const COLOR_SPACE_END: u32 = 65_536;

const FUNGIBLE_BAND: Range<u32> = 0..32_768;
const NON_FUNGIBLE_BAND: Range<u32> = 32_768..49_152;
const STORAGE_BAND: Range<u32> = 49_152..COLOR_SPACE_END;

/// Kind of external asset a color stands for.
///
/// Wire codes are `0`, `1` and `2` in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Divisible token; deposits carry an amount.
    Fungible,
    /// Unique token; deposits carry a token id.
    NonFungible,
    /// Unique token with a mutable storage commitment captured at deposit.
    NonFungibleWithStorage,
}

impl AssetKind {
    /// All kinds, in code order.
    pub const ALL: [AssetKind; 3] = [
        AssetKind::Fungible,
        AssetKind::NonFungible,
        AssetKind::NonFungibleWithStorage,
    ];

    /// Returns the wire code of this kind.
    pub fn code(self) -> u8 {
        match self {
            AssetKind::Fungible => 0,
            AssetKind::NonFungible => 1,
            AssetKind::NonFungibleWithStorage => 2,
        }
    }

    /// The full color band reserved for this kind.
    pub fn band(self) -> Range<u32> {
        match self {
            AssetKind::Fungible => FUNGIBLE_BAND,
            AssetKind::NonFungible => NON_FUNGIBLE_BAND,
            AssetKind::NonFungibleWithStorage => STORAGE_BAND,
        }
    }

    /// The first color handed out for this kind.
    ///
    /// Fungible allocation starts at the band start; the two non-fungible
    /// bands keep their first value unallocated.
    pub fn first_color(self) -> Color {
        match self {
            AssetKind::Fungible => Color(FUNGIBLE_BAND.start),
            AssetKind::NonFungible => Color(NON_FUNGIBLE_BAND.start + 1),
            AssetKind::NonFungibleWithStorage => Color(STORAGE_BAND.start + 1),
        }
    }

    /// How many colors this kind can ever allocate.
    pub fn capacity(self) -> u32 {
        self.band().end - self.first_color().0
    }

    /// Returns the color at `index` within this kind's allocation sequence,
    /// or `None` when the band is exhausted.
    pub fn nth_color(self, index: u32) -> Option<Color> {
        let color = self.first_color().0.checked_add(index)?;
        self.band().contains(&color).then_some(Color(color))
    }

    /// True for both non-fungible kinds.
    pub fn is_non_fungible(self) -> bool {
        !matches!(self, AssetKind::Fungible)
    }
}

impl TryFrom<u8> for AssetKind {
    type Error = ValidationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AssetKind::Fungible),
            1 => Ok(AssetKind::NonFungible),
            2 => Ok(AssetKind::NonFungibleWithStorage),
            other => Err(ValidationError::UnknownKind(other)),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Fungible => "fungible",
            AssetKind::NonFungible => "non-fungible",
            AssetKind::NonFungibleWithStorage => "non-fungible-storage",
        };
        f.write_str(name)
    }
}

/// Integer identifier of a registered asset.
///
/// The numeric value alone determines the asset kind, so consumers can
/// classify a color without a registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Returns the kind whose band contains this color.
    pub fn kind(self) -> Option<AssetKind> {
        AssetKind::ALL
            .into_iter()
            .find(|kind| kind.band().contains(&self.0))
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Color(value)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_disjoint_and_cover_the_space() {
        assert_eq!(AssetKind::Fungible.band().end, AssetKind::NonFungible.band().start);
        assert_eq!(
            AssetKind::NonFungible.band().end,
            AssetKind::NonFungibleWithStorage.band().start
        );
        assert_eq!(AssetKind::NonFungibleWithStorage.band().end, COLOR_SPACE_END);
    }

    #[test]
    fn first_colors() {
        assert_eq!(AssetKind::Fungible.first_color(), Color(0));
        assert_eq!(AssetKind::NonFungible.first_color(), Color(32_769));
        assert_eq!(AssetKind::NonFungibleWithStorage.first_color(), Color(49_153));
    }

    #[test]
    fn nth_color_stops_at_band_end() {
        let kind = AssetKind::NonFungible;
        let last = kind.capacity() - 1;
        assert_eq!(kind.nth_color(last), Some(Color(49_151)));
        assert_eq!(kind.nth_color(last + 1), None);
        assert_eq!(AssetKind::Fungible.nth_color(u32::MAX), None);
    }

    #[test]
    fn kind_of_color() {
        assert_eq!(Color(0).kind(), Some(AssetKind::Fungible));
        assert_eq!(Color(32_768).kind(), Some(AssetKind::NonFungible));
        assert_eq!(Color(49_153).kind(), Some(AssetKind::NonFungibleWithStorage));
        assert_eq!(Color(65_536).kind(), None);
    }

    #[test]
    fn kind_codes() {
        for kind in AssetKind::ALL {
            assert_eq!(AssetKind::try_from(kind.code()).unwrap(), kind);
        }
        assert!(matches!(
            AssetKind::try_from(3),
            Err(ValidationError::UnknownKind(3))
        ));
    }
}
