//! # Gen12 VDBOX Encodings
//!
//! Raw command layouts. Each `Default` value carries the command header
//! (type, opcodes, dword length); everything else starts zeroed.

use bytemuck::{Pod, Zeroable};
use helix_mhw::mhw_dword;
use static_assertions::const_assert_eq;

/// `dword_length` for a command of `n` dwords
const fn dword_length(n: usize) -> u32 {
    (n - 2) as u32
}

// =============================================================================
// MI_NOOP
// =============================================================================

mhw_dword! {
    /// MI_NOOP dword 0
    pub struct MiNoopDw0 {
        /// Value written to the NOPID register
        identification_number: 0..=21,
        /// Write `identification_number` to NOPID
        identification_number_register_write_enable: 22..=22,
        /// MI opcode
        mi_command_opcode: 23..=28,
        /// Command type
        command_type: 29..=31,
    }
}

/// MI_NOOP
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct MiNoopCmd {
    /// Header
    pub dw0: MiNoopDw0,
}

// =============================================================================
// MFX_WAIT
// =============================================================================

mhw_dword! {
    /// MFX_WAIT dword 0
    pub struct MfxWaitDw0 {
        /// Dword length
        dword_length: 0..=5,
        /// Wait for the preceding MFX command
        mfx_sync_control_flag: 8..=8,
        /// Sub-opcode
        sub_opcode: 16..=26,
        /// Command subtype
        command_subtype: 27..=28,
        /// Command type
        command_type: 29..=31,
    }
}

/// MFX_WAIT
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct MfxWaitCmd {
    /// Header
    pub dw0: MfxWaitDw0,
}

impl Default for MfxWaitCmd {
    fn default() -> Self {
        let mut cmd = Self::zeroed();
        cmd.dw0.set_command_subtype(1);
        cmd.dw0.set_command_type(3);
        cmd
    }
}

// =============================================================================
// VD_PIPELINE_FLUSH
// =============================================================================

mhw_dword! {
    /// VDBOX command header
    pub struct VdHeader {
        /// Dword length
        dword_length: 0..=11,
        /// Sub-opcode B
        subopcode_b: 16..=20,
        /// Sub-opcode A
        subopcode_a: 21..=22,
        /// Media command opcode
        media_command_opcode: 23..=26,
        /// Pipeline
        pipeline: 27..=28,
        /// Command type
        command_type: 29..=31,
    }
}

impl VdHeader {
    /// Header for a VDBOX command of `dwords` dwords
    pub fn new(opcode: u32, subopcode_a: u32, subopcode_b: u32, dwords: usize) -> Self {
        let mut dw = Self::default();
        dw.set_command_type(3);
        dw.set_pipeline(2);
        dw.set_media_command_opcode(opcode);
        dw.set_subopcode_a(subopcode_a);
        dw.set_subopcode_b(subopcode_b);
        dw.set_dword_length(dword_length(dwords));
        dw
    }
}

mhw_dword! {
    /// VD_PIPELINE_FLUSH dword 1
    pub struct VdPipelineFlushDw1 {
        /// Wait for HEVC idle
        hevc_pipeline_done: 0..=0,
        /// Wait for VDENC idle
        vdenc_pipeline_done: 1..=1,
        /// Wait for MFL idle
        mfl_pipeline_done: 2..=2,
        /// Wait for MFX idle
        mfx_pipeline_done: 3..=3,
        /// Flush HEVC commands
        hevc_pipeline_command_flush: 16..=16,
        /// Flush VDENC commands
        vdenc_pipeline_command_flush: 17..=17,
        /// Flush MFL commands
        mfl_pipeline_command_flush: 18..=18,
        /// Flush MFX commands
        mfx_pipeline_command_flush: 19..=19,
    }
}

/// VD_PIPELINE_FLUSH
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct VdPipelineFlushCmd {
    /// Header
    pub dw0: VdHeader,
    /// Wait/flush selection
    pub dw1: VdPipelineFlushDw1,
}

impl Default for VdPipelineFlushCmd {
    fn default() -> Self {
        Self {
            dw0: VdHeader::new(0xF, 0, 0, 2),
            dw1: VdPipelineFlushDw1::default(),
        }
    }
}

// =============================================================================
// VD_CONTROL_STATE
// =============================================================================

mhw_dword! {
    /// VD_CONTROL_STATE dword 1
    pub struct VdControlStateDw1 {
        /// Pipeline initialization
        pipeline_initialization: 0..=0,
        /// Implicit memory flush at pipeline end
        memory_implicit_flush: 1..=1,
    }
}

mhw_dword! {
    /// VD_CONTROL_STATE dword 2
    pub struct VdControlStateDw2 {
        /// Take the scalable pipe lock
        scalable_mode_pipe_lock: 0..=0,
        /// Release the scalable pipe lock
        scalable_mode_pipe_unlock: 1..=1,
    }
}

/// VD_CONTROL_STATE
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct VdControlStateCmd {
    /// Header
    pub dw0: VdHeader,
    /// Pipeline control
    pub dw1: VdControlStateDw1,
    /// Scalability control
    pub dw2: VdControlStateDw2,
}

impl Default for VdControlStateCmd {
    fn default() -> Self {
        Self {
            dw0: VdHeader::new(7, 0, 0xA, 3),
            dw1: VdControlStateDw1::default(),
            dw2: VdControlStateDw2::default(),
        }
    }
}

// =============================================================================
// MI_STORE_DATA_IMM
// =============================================================================

mhw_dword! {
    /// MI_STORE_DATA_IMM dword 0
    pub struct MiStoreDataImmDw0 {
        /// Dword length
        dword_length: 0..=9,
        /// Store a qword
        store_qword: 21..=21,
        /// Use the global GTT
        use_global_gtt: 22..=22,
        /// MI opcode
        mi_command_opcode: 23..=28,
        /// Command type
        command_type: 29..=31,
    }
}

mhw_dword! {
    /// MI_STORE_DATA_IMM dword 1
    pub struct MiStoreDataImmDw1 {
        /// Address bits 31:2
        address_low: 2..=31,
    }
}

mhw_dword! {
    /// MI_STORE_DATA_IMM dword 2
    pub struct MiStoreDataImmDw2 {
        /// Address bits 47:32
        address_high: 0..=15,
    }
}

mhw_dword! {
    /// MI_STORE_DATA_IMM dword 3
    pub struct MiStoreDataImmDw3 {
        /// Data written
        data: 0..=31,
    }
}

/// MI_STORE_DATA_IMM
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct MiStoreDataImmCmd {
    /// Header
    pub dw0: MiStoreDataImmDw0,
    /// Address low
    pub dw1: MiStoreDataImmDw1,
    /// Address high
    pub dw2: MiStoreDataImmDw2,
    /// Data
    pub dw3: MiStoreDataImmDw3,
}

impl Default for MiStoreDataImmCmd {
    fn default() -> Self {
        let mut cmd = Self::zeroed();
        cmd.dw0.set_mi_command_opcode(0x20);
        cmd.dw0.set_dword_length(dword_length(4));
        cmd
    }
}

// =============================================================================
// HCP_SURFACE_STATE
// =============================================================================

mhw_dword! {
    /// HCP_SURFACE_STATE dword 1
    pub struct HcpSurfaceStateDw1 {
        /// Pitch in bytes, minus one
        surface_pitch_minus1: 0..=16,
        /// Surface role
        surface_id: 28..=31,
    }
}

mhw_dword! {
    /// HCP_SURFACE_STATE dword 2
    pub struct HcpSurfaceStateDw2 {
        /// Row offset of the Cb plane
        y_offset_for_u_cb: 0..=14,
        /// Surface format
        surface_format: 27..=31,
    }
}

mhw_dword! {
    /// HCP_SURFACE_STATE dword 3
    pub struct HcpSurfaceStateDw3 {
        /// Memory compression on
        memory_compression_enable: 0..=0,
        /// Render (1) or media (0) compression
        compression_type: 1..=1,
        /// Hardware tile mode
        tile_mode: 30..=31,
    }
}

/// HCP_SURFACE_STATE
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct HcpSurfaceStateCmd {
    /// Header
    pub dw0: VdHeader,
    /// Pitch and role
    pub dw1: HcpSurfaceStateDw1,
    /// Plane offset and format
    pub dw2: HcpSurfaceStateDw2,
    /// Compression and tiling
    pub dw3: HcpSurfaceStateDw3,
}

impl Default for HcpSurfaceStateCmd {
    fn default() -> Self {
        Self {
            dw0: VdHeader::new(7, 0, 1, 4),
            dw1: HcpSurfaceStateDw1::default(),
            dw2: HcpSurfaceStateDw2::default(),
            dw3: HcpSurfaceStateDw3::default(),
        }
    }
}

// =============================================================================
// LAYOUT CHECKS
// =============================================================================

const_assert_eq!(core::mem::size_of::<MiNoopCmd>(), 4);
const_assert_eq!(core::mem::size_of::<MfxWaitCmd>(), 4);
const_assert_eq!(core::mem::size_of::<VdPipelineFlushCmd>(), 8);
const_assert_eq!(core::mem::size_of::<VdControlStateCmd>(), 12);
const_assert_eq!(core::mem::size_of::<MiStoreDataImmCmd>(), 16);
const_assert_eq!(core::mem::size_of::<HcpSurfaceStateCmd>(), 16);
