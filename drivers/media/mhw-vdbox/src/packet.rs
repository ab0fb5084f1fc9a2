//! # Decode Picture Packet
//!
//! Picture-level VDBOX programming for one decoded frame.
//!
//! The packet is the caller of the override protocol: it fills every record
//! from the picture description, lets the feature chain adjust it, then emits.
//!
//! ```text
//!   VD_CONTROL_STATE ─▶ MFX_WAIT ─▶ HCP_SURFACE_STATE ─▶ VD_PIPELINE_FLUSH
//!        ─▶ MI_STORE_DATA_IMM (status report) ─▶ [MI_NOOP to qword]
//! ```

use alloc::sync::Arc;

use helix_mhw::{
    set_params_and_add_cmd, Capabilities, CmdItf, CommandBuffer, CommandSink, Command, Feature,
    FeatureChain, FeatureId, FrameType, GmmTileMode, HwCmdParser, MhwResult, Target, TileType,
};

use crate::gen12::{
    Gen12, Gen12ParamsMut, HcpSurfaceState, MfxWait, MiNoop, MiStoreDataImm, VdControlState,
    VdPipelineFlush,
};
use crate::params::{FlushFlags, SurfaceFormat, SurfaceId};

/// Alignment the packet leaves the command buffer at
const PACKET_ALIGN: usize = 8;

// =============================================================================
// INTERFACE BOUND
// =============================================================================

/// Every command the packet emits
pub trait VdboxItf:
    CmdItf<MiNoop>
    + CmdItf<MfxWait>
    + CmdItf<VdPipelineFlush>
    + CmdItf<VdControlState>
    + CmdItf<MiStoreDataImm>
    + CmdItf<HcpSurfaceState>
{
}

impl<T> VdboxItf for T where
    T: CmdItf<MiNoop>
        + CmdItf<MfxWait>
        + CmdItf<VdPipelineFlush>
        + CmdItf<VdControlState>
        + CmdItf<MiStoreDataImm>
        + CmdItf<HcpSurfaceState>
        + ?Sized
{
}

// =============================================================================
// PICTURE DESCRIPTION
// =============================================================================

/// Picture-level inputs
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodePic {
    /// Coding type
    pub frame_type: FrameType,
    /// Decoded surface format
    pub format: SurfaceFormat,
    /// Decoded surface pitch in bytes
    pub pitch: u32,
    /// Row offset of the Cb plane
    pub u_offset: u32,
    /// OS tile type of the decoded surface
    pub tile_type: TileType,
    /// Memory manager tile mode of the decoded surface
    pub gmm_tile_mode: GmmTileMode,
    /// Whether `gmm_tile_mode` is authoritative
    pub gmm_tile_enabled: bool,
    /// Status report address
    pub status_addr: u64,
    /// Value stored at `status_addr` once the picture commands retire
    pub status_value: u32,
}

/// The packet's own contribution, built per picture
struct PicSetup {
    pic: DecodePic,
    caps: Capabilities<Gen12>,
}

impl PicSetup {
    fn new(pic: DecodePic) -> Self {
        Self {
            pic,
            caps: Capabilities::new()
                .with::<VdControlState>()
                .with::<MfxWait>()
                .with::<HcpSurfaceState>()
                .with::<VdPipelineFlush>()
                .with::<MiStoreDataImm>(),
        }
    }
}

impl Feature<Gen12> for PicSetup {
    fn id(&self) -> FeatureId {
        FeatureId(0)
    }

    fn name(&self) -> &'static str {
        "decode_pic"
    }

    fn capabilities(&self) -> &Capabilities<Gen12> {
        &self.caps
    }

    fn set_params(&self, params: Gen12ParamsMut<'_>) {
        let pic = &self.pic;
        match params {
            Gen12ParamsMut::VdControlState(par) => {
                par.initialization = true;
                par.memory_implicit_flush = true;
            }
            Gen12ParamsMut::MfxWait(par) => {
                par.sync_control = true;
            }
            Gen12ParamsMut::HcpSurfaceState(par) => {
                par.surface_id = SurfaceId::Decoded;
                par.format = pic.format;
                par.pitch = pic.pitch;
                par.u_offset = pic.u_offset;
                par.tile_type = pic.tile_type;
                par.gmm_tile_mode = pic.gmm_tile_mode;
                par.gmm_tile_enabled = pic.gmm_tile_enabled;
            }
            Gen12ParamsMut::VdPipelineFlush(par) => {
                par.flags = FlushFlags::WAIT_DONE_HEVC | FlushFlags::FLUSH_HEVC;
            }
            Gen12ParamsMut::MiStoreDataImm(par) => {
                par.address = pic.status_addr;
                par.value = pic.status_value;
            }
            Gen12ParamsMut::MiNoop(_) => {}
        }
    }
}

// =============================================================================
// PACKET
// =============================================================================

/// Picture-level decode packet over any implementation of the VDBOX commands
#[derive(Debug)]
pub struct DecodePicPacket<I: VdboxItf> {
    /// Command implementation
    itf: I,
    /// Registered contributors
    chain: FeatureChain<Gen12>,
    /// Parser shared with `itf`
    parser: Arc<HwCmdParser>,
}

impl<I: VdboxItf> DecodePicPacket<I> {
    /// Create a packet
    pub fn new(itf: I, chain: FeatureChain<Gen12>, parser: Arc<HwCmdParser>) -> Self {
        Self {
            itf,
            chain,
            parser,
        }
    }

    /// Command implementation
    pub fn itf_mut(&mut self) -> &mut I {
        &mut self.itf
    }

    /// Registered contributors
    pub fn chain(&self) -> &FeatureChain<Gen12> {
        &self.chain
    }

    /// Shared parser
    pub fn parser(&self) -> &Arc<HwCmdParser> {
        &self.parser
    }

    /// Bytes of the picture commands, without alignment padding
    pub fn pic_cmds_size(&self) -> usize {
        CmdItf::<VdControlState>::get_encoded_byte_size(&self.itf)
            + CmdItf::<MfxWait>::get_encoded_byte_size(&self.itf)
            + CmdItf::<HcpSurfaceState>::get_encoded_byte_size(&self.itf)
            + CmdItf::<VdPipelineFlush>::get_encoded_byte_size(&self.itf)
            + CmdItf::<MiStoreDataImm>::get_encoded_byte_size(&self.itf)
    }

    /// Emit the picture commands for `pic` into `cmd_buf`.
    ///
    /// Stops at the first failing command; commands before it stay in the
    /// buffer.
    pub fn add_pic_cmds(&mut self, pic: &DecodePic, cmd_buf: &mut CommandBuffer) -> MhwResult<()> {
        self.parser.frame_info_update(pic.frame_type);
        let start = cmd_buf.offset();
        let caller = PicSetup::new(*pic);

        self.emit::<VdControlState>(Some(&caller), cmd_buf)?;
        self.emit::<MfxWait>(Some(&caller), cmd_buf)?;
        self.emit::<HcpSurfaceState>(Some(&caller), cmd_buf)?;
        self.emit::<VdPipelineFlush>(Some(&caller), cmd_buf)?;
        self.emit::<MiStoreDataImm>(Some(&caller), cmd_buf)?;

        if cmd_buf.offset() % PACKET_ALIGN != 0 {
            self.emit::<MiNoop>(None, cmd_buf)?;
        }

        log::debug!(
            "DecodePicPacket: {:?} picture, {} bytes",
            pic.frame_type,
            cmd_buf.offset() - start
        );
        self.parser.parse_cmd_buf(&cmd_buf.as_bytes()[start..]);
        Ok(())
    }

    fn emit<C>(
        &mut self,
        caller: Option<&dyn Feature<Gen12>>,
        cmd_buf: &mut CommandBuffer,
    ) -> MhwResult<()>
    where
        C: Command<Catalog = Gen12>,
        I: CmdItf<C>,
    {
        set_params_and_add_cmd::<C, I>(
            &mut self.itf,
            caller,
            &self.chain,
            Target::Cmd(cmd_buf),
            None,
        )
    }

    /// Tear the packet down, returning the implementation
    pub fn into_inner(self) -> I {
        self.itf
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{MmcFeature, ScalabilityFeature};
    use crate::gen12::Impl;
    use alloc::boxed::Box;
    use helix_mhw::{MemCompState, MhwError, ParserConfig, PARSER_ENABLED};

    fn dw(bytes: &[u8], i: usize) -> u32 {
        let at = i * 4;
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn pic() -> DecodePic {
        DecodePic {
            frame_type: FrameType::I,
            format: SurfaceFormat::Planar420_8,
            pitch: 1920,
            u_offset: 1088,
            tile_type: TileType::Y,
            status_addr: 0x1_0000_1000,
            status_value: 0xABCD,
            ..Default::default()
        }
    }

    fn packet(chain: FeatureChain<Gen12>) -> DecodePicPacket<Impl> {
        let parser = Arc::new(HwCmdParser::new(ParserConfig::default()));
        DecodePicPacket::new(Impl::new(parser.clone()), chain, parser)
    }

    #[test]
    fn test_add_pic_cmds() {
        let mut packet = packet(FeatureChain::new());
        let mut buf = CommandBuffer::new(256);

        packet.add_pic_cmds(&pic(), &mut buf).unwrap();
        assert_eq!(packet.pic_cmds_size(), 56);
        assert_eq!(buf.offset(), 56);

        let b = buf.as_bytes();
        // VD_CONTROL_STATE
        assert_eq!(dw(b, 0), 0x738A_0001);
        assert_eq!(dw(b, 1), 0x3);
        assert_eq!(dw(b, 2), 0);
        // MFX_WAIT
        assert_eq!(dw(b, 3), 0x6800_0100);
        // HCP_SURFACE_STATE
        assert_eq!(dw(b, 4), 0x7381_0002);
        assert_eq!(dw(b, 5), 1919);
        assert_eq!(dw(b, 6), 0x2000_0440);
        assert_eq!(dw(b, 7), 0xC000_0000);
        // VD_PIPELINE_FLUSH
        assert_eq!(dw(b, 8), 0x7780_0000);
        assert_eq!(dw(b, 9), 0x0001_0001);
        // MI_STORE_DATA_IMM
        assert_eq!(dw(b, 10), 0x1000_0002);
        assert_eq!(dw(b, 11), 0x1000);
        assert_eq!(dw(b, 12), 0x1);
        assert_eq!(dw(b, 13), 0xABCD);
    }

    #[test]
    fn test_features_override_pic_setup() {
        let mut chain = FeatureChain::new();
        chain.register(Box::new(ScalabilityFeature::new(2))).unwrap();
        chain.register(Box::new(MmcFeature::new(MemCompState::Rc))).unwrap();
        let mut packet = packet(chain);
        let mut buf = CommandBuffer::new(256);

        packet.add_pic_cmds(&pic(), &mut buf).unwrap();

        let b = buf.as_bytes();
        assert_eq!(dw(b, 2), 0x1);
        assert_eq!(dw(b, 7), 0xC000_0003);
        assert_eq!(dw(b, 9), 0x0001_0009);
    }

    #[test]
    fn test_pads_to_qword() {
        let mut packet = packet(FeatureChain::new());
        let mut buf = CommandBuffer::new(256);
        buf.append(&[0; 4]).unwrap();

        packet.add_pic_cmds(&pic(), &mut buf).unwrap();
        assert_eq!(buf.offset(), 64);
        assert_eq!(dw(buf.as_bytes(), 15), 0);
    }

    #[test]
    fn test_failure_stops_emission() {
        let mut packet = packet(FeatureChain::new());
        let mut buf = CommandBuffer::new(256);
        let bad = DecodePic { pitch: 0, ..pic() };

        assert_eq!(
            packet.add_pic_cmds(&bad, &mut buf),
            Err(MhwError::InvalidParameter)
        );
        // VD_CONTROL_STATE and MFX_WAIT made it in.
        assert_eq!(buf.offset(), 16);
    }

    #[test]
    fn test_undersized_buffer() {
        let mut packet = packet(FeatureChain::new());
        let mut buf = CommandBuffer::new(40);

        let err = packet.add_pic_cmds(&pic(), &mut buf).unwrap_err();
        assert!(matches!(err, MhwError::Append(_)));
        assert_eq!(buf.offset(), 40);
    }

    #[test]
    fn test_layered_generation() {
        let parser = Arc::new(HwCmdParser::new(ParserConfig::default()));
        let itf = crate::xe_lpm::Impl::new(parser.clone());
        let mut packet = DecodePicPacket::new(itf, FeatureChain::new(), parser);
        let mut buf = CommandBuffer::new(256);

        packet.add_pic_cmds(&pic(), &mut buf).unwrap();
        assert_eq!(buf.offset(), 56);

        let b = buf.as_bytes();
        assert_eq!(dw(b, 5), 1919);
        // Linear memory manager tile mode instead of the OS Y tiling.
        assert_eq!(dw(b, 7), 0);
        assert_eq!(dw(b, 13), 0xABCD);
    }

    #[test]
    fn test_teardown_releases_parser() {
        let parser = Arc::new(HwCmdParser::new(ParserConfig::default()));
        let weak = Arc::downgrade(&parser);
        let itf = Impl::new(parser.clone());
        let mut packet = DecodePicPacket::new(itf, FeatureChain::new(), parser);
        let mut buf = CommandBuffer::new(256);

        packet.add_pic_cmds(&pic(), &mut buf).unwrap();
        let summary = packet.parser().summary();
        if PARSER_ENABLED {
            assert_eq!(summary.frames, 1);
            assert_eq!(summary.buffers, 1);
        }

        let itf = packet.into_inner();
        assert!(weak.upgrade().is_some());
        drop(itf);
        // The last owner dropped the parser, which runs its teardown.
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_parser_bookkeeping() {
        let mut packet = packet(FeatureChain::new());
        let mut buf = CommandBuffer::new(256);

        packet.add_pic_cmds(&pic(), &mut buf).unwrap();
        packet
            .add_pic_cmds(
                &DecodePic {
                    frame_type: FrameType::P,
                    ..pic()
                },
                &mut buf,
            )
            .unwrap();

        let parser = packet.parser();
        if PARSER_ENABLED {
            assert_eq!(parser.frame_count(), 2);
            assert_eq!(parser.frame_type(), FrameType::P);
            assert_eq!(parser.buffers_parsed(), 2);
            assert_eq!(
                parser.cmd_stats("HCP_SURFACE_STATE").map(|s| s.count),
                Some(2)
            );
            assert_eq!(parser.cmd_stats("MI_NOOP"), None);
        } else {
            assert_eq!(parser.frame_count(), 0);
        }
    }
}
