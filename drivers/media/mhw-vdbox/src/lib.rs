//! # Helix MHW VDBOX
//!
//! Video decode box (VDBOX) commands on top of `helix-mhw`.
//!
//! ## Layout
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      helix-mhw-vdbox                       │
//! │                                                            │
//! │   params ─────── generation-agnostic records               │
//! │   gen12  ─────── Gen12 catalog, encodings, Impl            │
//! │   xe_lpm ─────── next generation layered on gen12::Impl    │
//! │   features ───── scalability, memory compression           │
//! │   packet ─────── decode picture packet (override caller)   │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

// =============================================================================
// MODULE EXPORTS
// =============================================================================

pub mod features;
pub mod gen12;
pub mod packet;
pub mod params;
pub mod xe_lpm;

// Re-exports for convenience
pub use features::{MmcFeature, ScalabilityFeature, MMC_FEATURE_ID, SCALABILITY_FEATURE_ID};
pub use gen12::{Gen12, Gen12Kind, Gen12ParamsMut};
pub use packet::{DecodePic, DecodePicPacket, VdboxItf};
pub use params::FlushFlags;
