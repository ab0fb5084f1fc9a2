//! # VDBOX Parameter Records
//!
//! Generation-agnostic inputs of the VDBOX commands. Every generation's
//! catalog maps its encodings onto these records, so feature contributors
//! written against them work unchanged across generations.

use helix_mhw::{GmmTileMode, MemCompState, TileType};

bitflags::bitflags! {
    /// VD_PIPELINE_FLUSH wait and flush selection
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FlushFlags: u32 {
        /// Wait for the HEVC pipeline to go idle
        const WAIT_DONE_HEVC = 1 << 0;
        /// Wait for VDENC to go idle
        const WAIT_DONE_VDENC = 1 << 1;
        /// Wait for MFL to go idle
        const WAIT_DONE_MFL = 1 << 2;
        /// Wait for MFX to go idle
        const WAIT_DONE_MFX = 1 << 3;
        /// Flush HEVC pipeline commands
        const FLUSH_HEVC = 1 << 16;
        /// Flush VDENC pipeline commands
        const FLUSH_VDENC = 1 << 17;
        /// Flush MFL pipeline commands
        const FLUSH_MFL = 1 << 18;
        /// Flush MFX pipeline commands
        const FLUSH_MFX = 1 << 19;
    }
}

/// Surface role in HCP_SURFACE_STATE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum SurfaceId {
    /// Decoded picture / reconstructed picture
    #[default]
    Decoded = 0,
    /// Source input (encode)
    Source = 1,
    /// Prev reference
    PrevRef = 2,
    /// Golden reference
    GoldenRef = 3,
    /// Alt reference
    AltRef = 4,
}

/// Surface format code in HCP_SURFACE_STATE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum SurfaceFormat {
    /// 8-bit 4:2:0 planar
    #[default]
    Planar420_8 = 4,
    /// 10-bit 4:2:0 (P010)
    P010 = 13,
    /// 8-bit 4:4:4 (AYUV)
    Ayuv = 17,
}

// =============================================================================
// RECORDS
// =============================================================================

/// MI_NOOP
#[derive(Debug, Clone, Default)]
pub struct MiNoopPar {}

/// MFX_WAIT
#[derive(Debug, Clone, Default)]
pub struct MfxWaitPar {
    /// Wait for the previous MFX command to finish before continuing
    pub sync_control: bool,
}

/// VD_PIPELINE_FLUSH
#[derive(Debug, Clone, Default)]
pub struct VdPipelineFlushPar {
    /// Pipelines to wait on and flush
    pub flags: FlushFlags,
}

/// VD_CONTROL_STATE
#[derive(Debug, Clone, Default)]
pub struct VdControlStatePar {
    /// Start of a new pipeline programming sequence
    pub initialization: bool,
    /// Flush memory implicitly at pipeline end
    pub memory_implicit_flush: bool,
    /// Lock the pipe for scalable (multi-pipe) operation
    pub scalable_mode_pipe_lock: bool,
    /// Release the scalable pipe lock
    pub scalable_mode_pipe_unlock: bool,
}

/// MI_STORE_DATA_IMM
#[derive(Debug, Clone, Default)]
pub struct MiStoreDataImmPar {
    /// Graphics address written to (dword aligned)
    pub address: u64,
    /// Value written
    pub value: u32,
}

/// HCP_SURFACE_STATE
#[derive(Debug, Clone, Default)]
pub struct HcpSurfaceStatePar {
    /// Surface role
    pub surface_id: SurfaceId,
    /// Surface format
    pub format: SurfaceFormat,
    /// Row pitch in bytes (must be non-zero)
    pub pitch: u32,
    /// Row offset of the Cb plane
    pub u_offset: u32,
    /// OS tile type
    pub tile_type: TileType,
    /// Memory manager tile mode
    pub gmm_tile_mode: GmmTileMode,
    /// Whether the memory manager tile mode is authoritative
    pub gmm_tile_enabled: bool,
    /// Memory compression state
    pub mmc_state: MemCompState,
}
