//! # Command Descriptors
//!
//! Type-level identity of hardware commands.
//!
//! A command identity is a zero-sized type implementing [`Command`]. It ties
//! together the raw encoding (a fixed-layout POD value), the parameter record
//! callers fill in, and the catalog the command belongs to. Catalogs are
//! normally declared with [`mhw_catalog!`](crate::mhw_catalog), which generates
//! the identities, the catalog's `Kind` enum, its tagged parameter union and
//! the parameter store in one go.
//!
//! ```text
//!   Catalog ── Kind { A, B, .. }          (capability keys)
//!      │    └─ ParamsMut<'a> { A(&mut APar), B(&mut BPar), .. }
//!      │
//!      ├── A: Command { Encoding = ACmd, Params = APar }
//!      └── B: Command { Encoding = BCmd, Params = BPar }
//! ```

use core::fmt;
use core::hash::Hash;
use core::mem::size_of;

use bytemuck::Pod;

// =============================================================================
// CATALOG
// =============================================================================

/// A generation's set of command identities
pub trait Catalog: 'static {
    /// One variant per command identity
    type Kind: Copy + Eq + Hash + fmt::Debug;

    /// Tagged union of mutable parameter records, one variant per command
    type ParamsMut<'a>;
}

// =============================================================================
// COMMAND
// =============================================================================

/// Compile-time identity of one hardware command
pub trait Command: 'static {
    /// Catalog this command belongs to
    type Catalog: Catalog;

    /// Fixed-layout binary encoding
    type Encoding: Pod + Default;

    /// Semantic inputs used to populate the encoding
    type Params: Default + fmt::Debug;

    /// Command name, as used by logs and the parser
    const NAME: &'static str;

    /// Capability key of this command
    const KIND: <Self::Catalog as Catalog>::Kind;

    /// Wrap a record into the catalog's tagged union
    fn tagged(params: &mut Self::Params) -> <Self::Catalog as Catalog>::ParamsMut<'_>;

    /// Encoded size in bytes
    #[inline]
    fn byte_size() -> usize {
        size_of::<Self::Encoding>()
    }
}

// =============================================================================
// PARAMETER STORAGE
// =============================================================================

/// The single parameter record of one command inside an implementation
pub struct ParamSlot<C: Command> {
    params: C::Params,
}

impl<C: Command> ParamSlot<C> {
    /// Create a slot holding the default record
    pub fn new() -> Self {
        Self {
            params: C::Params::default(),
        }
    }

    /// Get the record, resetting it to its default first if asked
    #[inline]
    pub fn get(&mut self, reset: bool) -> &mut C::Params {
        if reset {
            self.params = C::Params::default();
        }
        &mut self.params
    }

    /// Read the record
    #[inline]
    pub fn params(&self) -> &C::Params {
        &self.params
    }
}

impl<C: Command> Default for ParamSlot<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Command> fmt::Debug for ParamSlot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamSlot")
            .field("cmd", &C::NAME)
            .field("params", &self.params)
            .finish()
    }
}

/// Storage holding a [`ParamSlot`] for `C`
pub trait ParamStore<C: Command> {
    /// Slot of `C`
    fn slot(&self) -> &ParamSlot<C>;

    /// Mutable slot of `C`
    fn slot_mut(&mut self) -> &mut ParamSlot<C>;
}

// =============================================================================
// FIELD ADDRESSING
// =============================================================================

/// Dword index of a field inside a command encoding.
///
/// ```rust,ignore
/// assert_eq!(dw_location!(MiStoreDataImmCmd, dw3), 3);
/// ```
#[macro_export]
macro_rules! dw_location {
    ($cmd:ty, $field:ident) => {
        (::core::mem::offset_of!($cmd, $field) / $crate::buffer::DWORD_SIZE) as u32
    };
}

/// Dword index of `field`, which must be a field of `cmd`.
///
/// Runtime counterpart of [`dw_location!`](crate::dw_location) for call sites
/// that only hold the encoding value.
#[doc(hidden)]
#[inline]
pub fn dword_index<E, F>(cmd: &E, field: &F) -> u32 {
    let base = cmd as *const E as usize;
    let at = field as *const F as usize;
    (at.saturating_sub(base) / crate::buffer::DWORD_SIZE) as u32
}

/// Declare a dword of a command encoding with named bit-fields.
///
/// Each `name: lo..=hi` entry produces a getter `name()` and a setter
/// `set_name(v)`; the setter masks `v` to the field width.
///
/// ```rust,ignore
/// mhw_dword! {
///     pub struct MfxWaitDw0 {
///         dword_length: 0..=5,
///         mfx_sync_control_flag: 8..=8,
///         command_type: 29..=31,
///     }
/// }
/// ```
#[macro_export]
macro_rules! mhw_dword {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $lo:literal ..= $hi:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
        $vis struct $name(pub u32);

        // SAFETY: a transparent wrapper around `u32`.
        unsafe impl $crate::__private::bytemuck::Zeroable for $name {}
        // SAFETY: a transparent wrapper around `u32`; every bit pattern is valid.
        unsafe impl $crate::__private::bytemuck::Pod for $name {}

        $crate::__private::paste::paste! {
            #[allow(dead_code)]
            impl $name {
                $(
                    $(#[$fmeta])*
                    #[inline]
                    pub const fn $field(&self) -> u32 {
                        $crate::command::bits::extract(self.0, $lo, $hi)
                    }

                    #[doc = concat!("Set `", stringify!($field), "`")]
                    #[inline]
                    pub fn [<set_ $field>](&mut self, value: u32) {
                        self.0 = $crate::command::bits::insert(self.0, $lo, $hi, value);
                    }
                )*
            }
        }
    };
}

/// Bit-range helpers backing [`mhw_dword!`](crate::mhw_dword)
pub mod bits {
    /// Mask covering bits `lo..=hi`
    #[inline]
    pub const fn mask(lo: u32, hi: u32) -> u32 {
        let width = hi - lo + 1;
        if width >= 32 {
            u32::MAX
        } else {
            ((1u32 << width) - 1) << lo
        }
    }

    /// Read bits `lo..=hi` of `dw`
    #[inline]
    pub const fn extract(dw: u32, lo: u32, hi: u32) -> u32 {
        (dw & mask(lo, hi)) >> lo
    }

    /// Replace bits `lo..=hi` of `dw` with `value` (truncated to the field width)
    #[inline]
    pub const fn insert(dw: u32, lo: u32, hi: u32, value: u32) -> u32 {
        let m = mask(lo, hi);
        (dw & !m) | ((value << lo) & m)
    }
}

// =============================================================================
// TESTS
// =============================================================================
