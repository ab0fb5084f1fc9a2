//! Real parser, compiled into diagnostic builds

use alloc::vec::Vec;

use hashbrown::HashMap;
use spin::Mutex;

use super::{CmdStats, FieldLayout, FrameType, ParserConfig, ParserSummary};
use crate::buffer::DWORD_SIZE;

/// Mutable parser state
#[derive(Debug, Default)]
struct ParserState {
    /// Frames started so far
    frame_count: u32,
    /// Type of the frame being built
    frame_type: FrameType,
    /// Counters keyed by command name
    stats: HashMap<&'static str, CmdStats>,
    /// Captured field layouts, without duplicates
    layouts: Vec<FieldLayout>,
    /// Finished buffers seen
    buffers_parsed: u32,
}

/// Hardware command parser.
///
/// Shared by every implementation of one pipeline through `Arc`; the state
/// lives behind a spin lock.
#[derive(Debug)]
pub struct HwCmdParser {
    config: ParserConfig,
    state: Mutex<ParserState>,
}

fn dump(prefix: &str, data: &[u8]) {
    for (i, dw) in data.chunks(DWORD_SIZE).enumerate() {
        let mut raw = [0u8; DWORD_SIZE];
        raw[..dw.len()].copy_from_slice(dw);
        log::info!("{} dw{}: {:#010x}", prefix, i, u32::from_le_bytes(raw));
    }
}

impl HwCmdParser {
    /// Create the parser
    pub fn new(config: ParserConfig) -> Self {
        log::debug!("HwCmdParser: initialized ({:?})", config);
        Self {
            config,
            state: Mutex::new(ParserState::default()),
        }
    }

    /// Tear the parser down.
    ///
    /// Dropping the last reference does the same; this only makes the point
    /// of teardown explicit for a sole owner.
    pub fn destroy(self) {
        drop(self);
    }

    /// Totals since creation
    pub fn summary(&self) -> ParserSummary {
        let state = self.state.lock();
        ParserSummary {
            frames: state.frame_count,
            buffers: state.buffers_parsed,
            commands: state.stats.len(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> ParserConfig {
        self.config
    }

    /// Whether field layouts are captured
    #[inline]
    pub fn parse_fields_layout_enabled(&self) -> bool {
        self.config.fields_layout
    }

    /// Record that `field` of dword `dw` of `cmd` was written
    pub fn parse_field_layout(&self, cmd: &'static str, dw: u32, field: &'static str) {
        if !self.config.fields_layout {
            return;
        }

        let layout = FieldLayout { cmd, dw, field };
        let mut state = self.state.lock();
        if !state.layouts.contains(&layout) {
            log::trace!("HwCmdParser: {} dw{} {}", cmd, dw, field);
            state.layouts.push(layout);
        }
    }

    /// Start a new frame
    pub fn frame_info_update(&self, frame_type: FrameType) {
        let mut state = self.state.lock();
        state.frame_count = state.frame_count.saturating_add(1);
        state.frame_type = frame_type;
        log::debug!(
            "HwCmdParser: frame {} ({:?})",
            state.frame_count,
            frame_type
        );
    }

    /// Inspect one encoded command
    pub fn parse_cmd(&self, name: &'static str, data: &[u8]) {
        let dwords = data.len() / DWORD_SIZE;
        {
            let mut state = self.state.lock();
            let stats = state.stats.entry(name).or_default();
            stats.count = stats.count.saturating_add(1);
            stats.dwords = stats.dwords.saturating_add(dwords);
        }

        log::debug!("HwCmdParser: {} ({} dwords)", name, dwords);
        if self.config.dump_dwords {
            dump(name, data);
        }
    }

    /// Inspect a finished command buffer
    pub fn parse_cmd_buf(&self, data: &[u8]) {
        let index = {
            let mut state = self.state.lock();
            state.buffers_parsed = state.buffers_parsed.saturating_add(1);
            state.buffers_parsed
        };

        log::debug!(
            "HwCmdParser: command buffer {} ({} dwords)",
            index,
            data.len() / DWORD_SIZE
        );
        if self.config.dump_dwords {
            dump("cmdbuf", data);
        }
    }

    /// Frames seen
    pub fn frame_count(&self) -> u32 {
        self.state.lock().frame_count
    }

    /// Type of the current frame
    pub fn frame_type(&self) -> FrameType {
        self.state.lock().frame_type
    }

    /// Counters of one command
    pub fn cmd_stats(&self, name: &str) -> Option<CmdStats> {
        self.state.lock().stats.get(name).copied()
    }

    /// Captured field layouts, in capture order
    pub fn field_layouts(&self) -> Vec<FieldLayout> {
        self.state.lock().layouts.clone()
    }

    /// Command buffers parsed
    pub fn buffers_parsed(&self) -> u32 {
        self.state.lock().buffers_parsed
    }
}

impl Drop for HwCmdParser {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        log::debug!(
            "HwCmdParser: destroyed after {} frames, {} buffers, {} distinct commands",
            state.frame_count,
            state.buffers_parsed,
            state.stats.len()
        );
    }
}

impl Default for HwCmdParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cmd_counts() {
        let parser = HwCmdParser::new(ParserConfig::default());
        parser.parse_cmd("MI_NOOP", &[0; 4]);
        parser.parse_cmd("MI_NOOP", &[0; 4]);
        parser.parse_cmd("MFX_WAIT", &[0; 4]);

        assert_eq!(
            parser.cmd_stats("MI_NOOP"),
            Some(CmdStats {
                count: 2,
                dwords: 2
            })
        );
        assert_eq!(parser.cmd_stats("MFX_WAIT").map(|s| s.count), Some(1));
        assert_eq!(parser.cmd_stats("VD_CONTROL_STATE"), None);
    }

    #[test]
    fn test_frame_info_update() {
        let parser = HwCmdParser::default();
        assert_eq!(parser.frame_type(), FrameType::None);

        parser.frame_info_update(FrameType::I);
        parser.frame_info_update(FrameType::P);

        assert_eq!(parser.frame_count(), 2);
        assert_eq!(parser.frame_type(), FrameType::P);
    }

    #[test]
    fn test_field_layout_capture() {
        let off = HwCmdParser::default();
        off.parse_field_layout("Cmd", 1, "value");
        assert!(off.field_layouts().is_empty());

        let on = HwCmdParser::new(ParserConfig::default().with_fields_layout());
        assert!(on.parse_fields_layout_enabled());
        on.parse_field_layout("Cmd", 1, "value");
        on.parse_field_layout("Cmd", 1, "value");
        on.parse_field_layout("Cmd", 2, "flag");

        let layouts = on.field_layouts();
        assert_eq!(layouts.len(), 2);
        assert_eq!(
            layouts[1],
            FieldLayout {
                cmd: "Cmd",
                dw: 2,
                field: "flag"
            }
        );
    }

    #[test]
    fn test_counters_saturate() {
        let parser = HwCmdParser::default();
        parser.state.lock().frame_count = u32::MAX;
        parser.state.lock().buffers_parsed = u32::MAX;
        parser.state.lock().stats.insert(
            "MI_NOOP",
            CmdStats {
                count: u32::MAX,
                dwords: usize::MAX,
            },
        );

        parser.frame_info_update(FrameType::B);
        parser.parse_cmd_buf(&[0; 4]);
        parser.parse_cmd("MI_NOOP", &[0; 4]);

        assert_eq!(parser.frame_count(), u32::MAX);
        assert_eq!(parser.buffers_parsed(), u32::MAX);
        assert_eq!(
            parser.cmd_stats("MI_NOOP"),
            Some(CmdStats {
                count: u32::MAX,
                dwords: usize::MAX
            })
        );
    }

    #[test]
    fn test_summary() {
        let parser = HwCmdParser::default();
        parser.frame_info_update(FrameType::I);
        parser.parse_cmd("MI_NOOP", &[0; 4]);
        parser.parse_cmd("MFX_WAIT", &[0; 4]);
        parser.parse_cmd_buf(&[0; 8]);

        assert_eq!(
            parser.summary(),
            ParserSummary {
                frames: 1,
                buffers: 1,
                commands: 2
            }
        );
    }

    #[test]
    fn test_parse_cmd_buf() {
        let parser = HwCmdParser::new(ParserConfig::default().with_dump_dwords());
        parser.parse_cmd_buf(&[1, 0, 0, 0, 2, 0, 0]);
        parser.parse_cmd_buf(&[]);
        assert_eq!(parser.buffers_parsed(), 2);
        parser.destroy();
    }
}
