//! # Numeric Helpers
//!
//! Pure lookups used by command setters when filling encodings.

// =============================================================================
// SURFACE STATE TYPES
// =============================================================================

/// Memory compression state of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum MemCompState {
    /// Uncompressed
    #[default]
    Disabled   = 0,
    /// Horizontal media compression (legacy)
    Horizontal = 1,
    /// Vertical media compression (legacy)
    Vertical   = 2,
    /// Media compression
    Mc         = 3,
    /// Render compression
    Rc         = 4,
}

/// Surface tiling as seen by the OS layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum TileType {
    /// Linear layout
    #[default]
    Linear  = 0,
    /// X-major tiling
    X       = 1,
    /// Y-major tiling
    Y       = 2,
    /// Yf tiling
    Yf      = 3,
    /// Ys (64K standard) tiling
    Ys      = 4,
    /// Tile4
    Tile4   = 5,
    /// Tile64
    Tile64  = 6,
    /// Unknown/invalid tiling
    Invalid = 7,
}

/// Hardware tile mode as reported by the memory manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum GmmTileMode {
    /// Linear
    #[default]
    Linear = 0,
    /// Tile64
    Tile64 = 1,
    /// X-major
    X      = 2,
    /// Tile4
    Tile4  = 3,
}

// =============================================================================
// HELPERS
// =============================================================================

/// Clamp `value` into `[low, high]`.
///
/// When `high < low` the range is empty and the result is `low`: the low bound
/// is checked first and wins.
#[inline]
pub fn clip3<T: PartialOrd>(low: T, high: T, value: T) -> T {
    if high < low || value < low {
        low
    } else if value > high {
        high
    } else {
        value
    }
}

/// True if the surface is media or render compressed
#[inline]
pub const fn mmc_enabled(state: MemCompState) -> bool {
    matches!(state, MemCompState::Rc | MemCompState::Mc)
}

/// True if the surface is render compressed
#[inline]
pub const fn mmc_rc_enabled(state: MemCompState) -> bool {
    matches!(state, MemCompState::Rc)
}

/// Hardware tile-mode code for a surface.
///
/// The memory manager's mode wins when it is authoritative; otherwise the OS
/// tile type is mapped, with everything unrecognized landing on 3.
#[inline]
pub const fn hw_tile_type(tile_type: TileType, gmm_mode: GmmTileMode, gmm_enabled: bool) -> u32 {
    if gmm_enabled {
        return gmm_mode as u32;
    }

    match tile_type {
        TileType::Linear => 0,
        TileType::Ys => 1,
        TileType::X => 2,
        _ => 3,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip3_in_range() {
        assert_eq!(clip3(0, 10, 5), 5);
        assert_eq!(clip3(0, 10, 0), 0);
        assert_eq!(clip3(0, 10, 10), 10);
    }

    #[test]
    fn test_clip3_out_of_range() {
        assert_eq!(clip3(0, 10, -3), 0);
        assert_eq!(clip3(0, 10, 42), 10);
        assert_eq!(clip3(-8i32, 7, i32::MIN), -8);
    }

    #[test]
    fn test_clip3_inverted_bounds_return_low() {
        for value in [-100, 0, 5, 7, 10, 11, 1000] {
            assert_eq!(clip3(10, 5, value), 10);
        }
    }

    #[test]
    fn test_mmc_predicates() {
        assert!(mmc_enabled(MemCompState::Rc));
        assert!(mmc_enabled(MemCompState::Mc));
        assert!(!mmc_enabled(MemCompState::Disabled));
        assert!(!mmc_enabled(MemCompState::Horizontal));
        assert!(!mmc_enabled(MemCompState::Vertical));

        assert!(mmc_rc_enabled(MemCompState::Rc));
        assert!(!mmc_rc_enabled(MemCompState::Mc));
        assert!(!mmc_rc_enabled(MemCompState::Disabled));
    }

    #[test]
    fn test_tile_type_gmm_verbatim() {
        assert_eq!(hw_tile_type(TileType::Linear, GmmTileMode::Tile4, true), 3);
        assert_eq!(hw_tile_type(TileType::Linear, GmmTileMode::Tile64, true), 1);
        assert_eq!(hw_tile_type(TileType::X, GmmTileMode::Linear, true), 0);
    }

    #[test]
    fn test_tile_type_os_mapping() {
        assert_eq!(hw_tile_type(TileType::Linear, GmmTileMode::X, false), 0);
        assert_eq!(hw_tile_type(TileType::Ys, GmmTileMode::X, false), 1);
        assert_eq!(hw_tile_type(TileType::X, GmmTileMode::Linear, false), 2);
        assert_eq!(hw_tile_type(TileType::Y, GmmTileMode::Linear, false), 3);
        assert_eq!(hw_tile_type(TileType::Invalid, GmmTileMode::Linear, false), 3);
    }
}
