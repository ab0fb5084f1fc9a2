//! Zero-sized parser used when instrumentation is compiled out

use alloc::vec::Vec;

use super::{CmdStats, FieldLayout, FrameType, ParserConfig, ParserSummary};

/// Compiled-out hardware command parser
#[derive(Debug, Default)]
pub struct HwCmdParser;

#[allow(unused_variables)]
impl HwCmdParser {
    /// Create the parser
    #[inline(always)]
    pub fn new(config: ParserConfig) -> Self {
        HwCmdParser
    }

    /// Tear the parser down
    #[inline(always)]
    pub fn destroy(self) {}

    /// Totals since creation (always zero)
    #[inline(always)]
    pub fn summary(&self) -> ParserSummary {
        ParserSummary::default()
    }

    /// Active configuration (always the default)
    #[inline(always)]
    pub fn config(&self) -> ParserConfig {
        ParserConfig::default()
    }

    /// Whether field layouts are captured
    #[inline(always)]
    pub const fn parse_fields_layout_enabled(&self) -> bool {
        false
    }

    /// Record a field layout
    #[inline(always)]
    pub fn parse_field_layout(&self, cmd: &'static str, dw: u32, field: &'static str) {}

    /// Start a new frame
    #[inline(always)]
    pub fn frame_info_update(&self, frame_type: FrameType) {}

    /// Inspect one encoded command
    #[inline(always)]
    pub fn parse_cmd(&self, name: &'static str, data: &[u8]) {}

    /// Inspect a finished command buffer
    #[inline(always)]
    pub fn parse_cmd_buf(&self, data: &[u8]) {}

    /// Frames seen
    #[inline(always)]
    pub fn frame_count(&self) -> u32 {
        0
    }

    /// Type of the current frame
    #[inline(always)]
    pub fn frame_type(&self) -> FrameType {
        FrameType::None
    }

    /// Counters of one command
    #[inline(always)]
    pub fn cmd_stats(&self, name: &str) -> Option<CmdStats> {
        None
    }

    /// Captured field layouts
    #[inline(always)]
    pub fn field_layouts(&self) -> Vec<FieldLayout> {
        Vec::new()
    }

    /// Command buffers parsed
    #[inline(always)]
    pub fn buffers_parsed(&self) -> u32 {
        0
    }
}
