//! # Helix MHW
//!
//! Media hardware command emission layer.
//!
//! Every hardware command a media pipeline emits is described once, as a
//! compile-time identity tying together a fixed-layout encoding and a
//! parameter record. Generation crates declare a catalog of such identities
//! and implement population per command; everything else (record storage,
//! sizing, emission into a command or batch buffer, debug parsing and the
//! feature override chain) is provided here, generically.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           helix-mhw                              │
//! │                                                                  │
//! │   caller ──▶ CmdItf<C> ──────────────┐                           │
//! │     │          (get_params/add_cmd)  │ blanket impl              │
//! │     │                                ▼                           │
//! │     │                          CmdImpl<C> (per generation)       │
//! │     │                           set_cmd │                        │
//! │     ▼                                   ▼                        │
//! │  FeatureChain ── set_params ──▶ C::Params ──▶ C::Encoding        │
//! │                                                   │              │
//! │                          HwCmdParser ◀── parse ───┤              │
//! │                                                   ▼              │
//! │                                  Target { Cmd | Batch }          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Emission Contract
//!
//! 1. `get_params(reset)` returns the one record of the command
//! 2. Callers (and the feature chain) fill the record
//! 3. `add_cmd` encodes it, shows it to the parser and appends it, followed
//!    by the optional payload
//!
//! Appends are whole-or-nothing and dword aligned.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

// =============================================================================
// MODULE EXPORTS
// =============================================================================

pub mod buffer;
pub mod command;
pub mod error;
pub mod feature;
pub mod imp;
pub mod itf;
mod macros;
pub mod parser;
pub mod utils;

// Re-exports for convenience
pub use buffer::{BatchBuffer, CommandBuffer, CommandSink, Target, DWORD_SIZE};
pub use command::{Catalog, Command, ParamSlot, ParamStore};
pub use error::{AppendError, ErrorCategory, MhwError, MhwResult};
pub use feature::{
    set_params_and_add_cmd, CallerPolicy, Capabilities, Feature, FeatureChain, FeatureId,
};
pub use imp::CmdImpl;
pub use itf::{CmdItf, CmdItfExt};
pub use parser::{FrameType, HwCmdParser, ParserConfig, ParserSummary, PARSER_ENABLED};
pub use utils::{
    clip3, hw_tile_type, mmc_enabled, mmc_rc_enabled, GmmTileMode, MemCompState, TileType,
};

/// Items used by exported macros
#[doc(hidden)]
pub mod __private {
    pub use bytemuck;
    pub use paste;
    pub use static_assertions;
}

// =============================================================================
// TEST CATALOG
// =============================================================================


// =============================================================================
// TESTS
// =============================================================================
