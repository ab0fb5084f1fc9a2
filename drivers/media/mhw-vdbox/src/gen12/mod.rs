//! # Gen12 VDBOX
//!
//! Gen12 catalog and command implementation.
//!
//! Only population lives here: record storage, sizing, emission and parser
//! routing come from `helix-mhw`.

pub mod cmd;

use alloc::sync::Arc;

use helix_mhw::{
    assign_field, clip3, hw_tile_type, impl_mhw_cmds, mhw_catalog, mmc_enabled, mmc_rc_enabled,
    HwCmdParser, MhwError, MhwResult,
};

use crate::params::{
    FlushFlags, HcpSurfaceStatePar, MfxWaitPar, MiNoopPar, MiStoreDataImmPar, VdControlStatePar,
    VdPipelineFlushPar,
};
use cmd::{
    HcpSurfaceStateCmd, MfxWaitCmd, MiNoopCmd, MiStoreDataImmCmd, VdControlStateCmd,
    VdPipelineFlushCmd,
};

/// Largest encodable `surface_pitch_minus1`
pub const MAX_PITCH_MINUS1: u32 = (1 << 17) - 1;

/// Largest encodable Cb plane row offset
pub const MAX_U_OFFSET: u32 = (1 << 15) - 1;

/// Highest graphics address bit MI_STORE_DATA_IMM can reach
const ADDRESS_BITS: u32 = 48;

mhw_catalog! {
    /// Gen12 VDBOX command catalog
    pub catalog Gen12 {
        kind: Gen12Kind,
        params_mut: Gen12ParamsMut,
        store: Gen12Params,
    }
    /// No operation
    MiNoop: MiNoopCmd, MiNoopPar = "MI_NOOP";
    /// Wait for the MFX pipeline
    MfxWait: MfxWaitCmd, MfxWaitPar = "MFX_WAIT";
    /// Flush and/or wait on VDBOX pipelines
    VdPipelineFlush: VdPipelineFlushCmd, VdPipelineFlushPar = "VD_PIPELINE_FLUSH";
    /// VDBOX pipeline control
    VdControlState: VdControlStateCmd, VdControlStatePar = "VD_CONTROL_STATE";
    /// Write an immediate dword to memory
    MiStoreDataImm: MiStoreDataImmCmd, MiStoreDataImmPar = "MI_STORE_DATA_IMM";
    /// HCP surface description
    HcpSurfaceState: HcpSurfaceStateCmd, HcpSurfaceStatePar = "HCP_SURFACE_STATE";
}

// =============================================================================
// IMPLEMENTATION
// =============================================================================

/// Gen12 VDBOX command implementation
#[derive(Debug)]
pub struct Impl {
    /// One record per catalog command
    pub(crate) params: Gen12Params,
    /// Parser shared with the owning pipeline
    pub(crate) parser: Arc<HwCmdParser>,
}

impl Impl {
    /// Create an implementation with default records
    pub fn new(parser: Arc<HwCmdParser>) -> Self {
        Self {
            params: Gen12Params::default(),
            parser,
        }
    }

    /// Shared parser
    pub fn parser(&self) -> &Arc<HwCmdParser> {
        &self.parser
    }

    fn set_mfx_wait(&self, params: &MfxWaitPar, cmd: &mut MfxWaitCmd) -> MhwResult<()> {
        assign_field!(
            self.parser,
            MfxWait,
            cmd.dw0.mfx_sync_control_flag = params.sync_control as u32
        );
        Ok(())
    }

    fn set_vd_pipeline_flush(
        &self,
        params: &VdPipelineFlushPar,
        cmd: &mut VdPipelineFlushCmd,
    ) -> MhwResult<()> {
        let flags = params.flags;
        let bit = |flag: FlushFlags| flags.contains(flag) as u32;

        assign_field!(
            self.parser,
            VdPipelineFlush,
            cmd.dw1.hevc_pipeline_done = bit(FlushFlags::WAIT_DONE_HEVC)
        );
        assign_field!(
            self.parser,
            VdPipelineFlush,
            cmd.dw1.vdenc_pipeline_done = bit(FlushFlags::WAIT_DONE_VDENC)
        );
        assign_field!(
            self.parser,
            VdPipelineFlush,
            cmd.dw1.mfl_pipeline_done = bit(FlushFlags::WAIT_DONE_MFL)
        );
        assign_field!(
            self.parser,
            VdPipelineFlush,
            cmd.dw1.mfx_pipeline_done = bit(FlushFlags::WAIT_DONE_MFX)
        );
        assign_field!(
            self.parser,
            VdPipelineFlush,
            cmd.dw1.hevc_pipeline_command_flush = bit(FlushFlags::FLUSH_HEVC)
        );
        assign_field!(
            self.parser,
            VdPipelineFlush,
            cmd.dw1.vdenc_pipeline_command_flush = bit(FlushFlags::FLUSH_VDENC)
        );
        assign_field!(
            self.parser,
            VdPipelineFlush,
            cmd.dw1.mfl_pipeline_command_flush = bit(FlushFlags::FLUSH_MFL)
        );
        assign_field!(
            self.parser,
            VdPipelineFlush,
            cmd.dw1.mfx_pipeline_command_flush = bit(FlushFlags::FLUSH_MFX)
        );
        Ok(())
    }

    fn set_vd_control_state(
        &self,
        params: &VdControlStatePar,
        cmd: &mut VdControlStateCmd,
    ) -> MhwResult<()> {
        if params.scalable_mode_pipe_lock && params.scalable_mode_pipe_unlock {
            log::error!("VD_CONTROL_STATE: pipe lock and unlock requested together");
            return Err(MhwError::InvalidParameter);
        }

        assign_field!(
            self.parser,
            VdControlState,
            cmd.dw1.pipeline_initialization = params.initialization as u32
        );
        assign_field!(
            self.parser,
            VdControlState,
            cmd.dw1.memory_implicit_flush = params.memory_implicit_flush as u32
        );
        assign_field!(
            self.parser,
            VdControlState,
            cmd.dw2.scalable_mode_pipe_lock = params.scalable_mode_pipe_lock as u32
        );
        assign_field!(
            self.parser,
            VdControlState,
            cmd.dw2.scalable_mode_pipe_unlock = params.scalable_mode_pipe_unlock as u32
        );
        Ok(())
    }

    fn set_mi_store_data_imm(
        &self,
        params: &MiStoreDataImmPar,
        cmd: &mut MiStoreDataImmCmd,
    ) -> MhwResult<()> {
        if params.address & 0x3 != 0 || params.address >> ADDRESS_BITS != 0 {
            log::error!("MI_STORE_DATA_IMM: bad address {:#x}", params.address);
            return Err(MhwError::InvalidParameter);
        }

        assign_field!(
            self.parser,
            MiStoreDataImm,
            cmd.dw1.address_low = (params.address as u32) >> 2
        );
        assign_field!(
            self.parser,
            MiStoreDataImm,
            cmd.dw2.address_high = (params.address >> 32) as u32
        );
        assign_field!(self.parser, MiStoreDataImm, cmd.dw3.data = params.value);
        Ok(())
    }

    fn set_hcp_surface_state(
        &self,
        params: &HcpSurfaceStatePar,
        cmd: &mut HcpSurfaceStateCmd,
    ) -> MhwResult<()> {
        if params.pitch == 0 {
            log::error!("HCP_SURFACE_STATE: zero pitch");
            return Err(MhwError::InvalidParameter);
        }

        let pitch_minus1 = clip3(0, MAX_PITCH_MINUS1, params.pitch - 1);
        let u_offset = clip3(0, MAX_U_OFFSET, params.u_offset);
        let tile_mode = hw_tile_type(
            params.tile_type,
            params.gmm_tile_mode,
            params.gmm_tile_enabled,
        );

        assign_field!(
            self.parser,
            HcpSurfaceState,
            cmd.dw1.surface_pitch_minus1 = pitch_minus1
        );
        assign_field!(
            self.parser,
            HcpSurfaceState,
            cmd.dw1.surface_id = params.surface_id as u32
        );
        assign_field!(
            self.parser,
            HcpSurfaceState,
            cmd.dw2.y_offset_for_u_cb = u_offset
        );
        assign_field!(
            self.parser,
            HcpSurfaceState,
            cmd.dw2.surface_format = params.format as u32
        );
        assign_field!(
            self.parser,
            HcpSurfaceState,
            cmd.dw3.memory_compression_enable = mmc_enabled(params.mmc_state) as u32
        );
        assign_field!(
            self.parser,
            HcpSurfaceState,
            cmd.dw3.compression_type = mmc_rc_enabled(params.mmc_state) as u32
        );
        assign_field!(self.parser, HcpSurfaceState, cmd.dw3.tile_mode = tile_mode);
        Ok(())
    }
}

impl_mhw_cmds! {
    Impl { store: params, parser: parser }
    MiNoop,
    MfxWait => set_mfx_wait,
    VdPipelineFlush => set_vd_pipeline_flush,
    VdControlState => set_vd_control_state,
    MiStoreDataImm => set_mi_store_data_imm,
    HcpSurfaceState => set_hcp_surface_state,
}

// =============================================================================
// TESTS
// =============================================================================
