//! # Xe_LPM VDBOX
//!
//! Next generation on top of the Gen12 implementation.
//!
//! Records, encodings and every Gen12 setter are reused. Overridden setters
//! run after the Gen12 one and only touch the fields that changed.

use alloc::sync::Arc;

use helix_mhw::{assign_field, impl_mhw_cmds, HwCmdParser, MhwResult};

use crate::gen12::cmd::HcpSurfaceStateCmd;
use crate::gen12::{
    self, HcpSurfaceState, MfxWait, MiNoop, MiStoreDataImm, VdControlState, VdPipelineFlush,
};
use crate::params::HcpSurfaceStatePar;

/// Xe_LPM VDBOX command implementation
#[derive(Debug)]
pub struct Impl {
    base: gen12::Impl,
}

impl Impl {
    /// Create an implementation with default records
    pub fn new(parser: Arc<HwCmdParser>) -> Self {
        Self {
            base: gen12::Impl::new(parser),
        }
    }

    /// Shared parser
    pub fn parser(&self) -> &Arc<HwCmdParser> {
        self.base.parser()
    }

    // The memory manager tile mode is authoritative on this generation.
    fn set_hcp_surface_state(
        &self,
        params: &HcpSurfaceStatePar,
        cmd: &mut HcpSurfaceStateCmd,
    ) -> MhwResult<()> {
        assign_field!(
            self.base.parser,
            HcpSurfaceState,
            cmd.dw3.tile_mode = params.gmm_tile_mode as u32
        );
        Ok(())
    }
}

impl_mhw_cmds! {
    Impl { store: base.params, parser: base.parser, base: base }
    MiNoop,
    MfxWait,
    VdPipelineFlush,
    VdControlState,
    MiStoreDataImm,
    HcpSurfaceState => set_hcp_surface_state,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use helix_mhw::{
        CmdItfExt, CommandBuffer, CommandSink, GmmTileMode, MemCompState, MhwError, ParserConfig,
        Target, TileType, PARSER_ENABLED,
    };

    use crate::params::FlushFlags;

    fn dw(bytes: &[u8], i: usize) -> u32 {
        let at = i * 4;
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn new_impl() -> Impl {
        Impl::new(Arc::new(HwCmdParser::new(ParserConfig::default())))
    }

    #[test]
    fn test_inherits_gen12_setters() {
        let mut imp = new_impl();
        let mut buf = CommandBuffer::new(16);

        imp.par::<VdPipelineFlush>(true).flags =
            FlushFlags::WAIT_DONE_HEVC | FlushFlags::FLUSH_HEVC | FlushFlags::FLUSH_MFX;
        imp.add::<VdPipelineFlush>(Target::Cmd(&mut buf), None).unwrap();

        assert_eq!(dw(buf.as_bytes(), 1), 0x0009_0001);
        assert_eq!(imp.cmd_byte_size::<HcpSurfaceState>(), 16);
    }

    #[test]
    fn test_hcp_surface_state_uses_gmm_tile_mode() {
        let mut imp = new_impl();
        let mut buf = CommandBuffer::new(32);

        let par = imp.par::<HcpSurfaceState>(true);
        par.pitch = 4096;
        par.tile_type = TileType::Y;
        par.gmm_tile_mode = GmmTileMode::X;
        par.gmm_tile_enabled = false;
        par.mmc_state = MemCompState::Mc;
        imp.add::<HcpSurfaceState>(Target::Cmd(&mut buf), None).unwrap();

        let bytes = buf.as_bytes();
        // Gen12 fields are still programmed.
        assert_eq!(dw(bytes, 1), 4095);
        // Gen12 would pick 3 from the OS tile type.
        assert_eq!(dw(bytes, 3), (2 << 30) | 0x1);
    }

    #[test]
    fn test_gen12_validation_still_applies() {
        let mut imp = new_impl();
        let mut buf = CommandBuffer::new(32);

        imp.par::<HcpSurfaceState>(true).gmm_tile_mode = GmmTileMode::Tile4;
        assert_eq!(
            imp.add::<HcpSurfaceState>(Target::Cmd(&mut buf), None),
            Err(MhwError::InvalidParameter)
        );
        assert_eq!(buf.offset(), 0);
    }

    #[test]
    fn test_layouts_recorded_through_base_parser() {
        let parser = Arc::new(HwCmdParser::new(ParserConfig::default().with_fields_layout()));
        let mut imp = Impl::new(parser.clone());
        let mut buf = CommandBuffer::new(32);

        imp.par::<HcpSurfaceState>(true).pitch = 64;
        imp.add::<HcpSurfaceState>(Target::Cmd(&mut buf), None).unwrap();

        if PARSER_ENABLED {
            let layouts = parser.field_layouts();
            // Seven Gen12 fields, then the tile mode override.
            assert_eq!(layouts.len(), 8);
            assert_eq!(layouts[7].cmd, "HCP_SURFACE_STATE");
            assert_eq!(layouts[7].dw, 3);
            assert_eq!(layouts[7].field, "tile_mode");
        }
    }
}
