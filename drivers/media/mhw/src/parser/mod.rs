//! # Hardware Command Parser
//!
//! Optional debug instrumentation fed with every encoded command.
//!
//! The real parser is compiled only when the `hwcmd-parser` feature is on and
//! the build is a diagnostic one (debug assertions, or `release-internal`).
//! Every other build gets a zero-sized stand-in with the same API whose
//! methods compile to nothing, so call sites never need a `cfg`.
//!
//! Parser behavior never influences control flow: nothing here returns an
//! error and nothing here is consulted by emission.

cfg_if::cfg_if! {
    if #[cfg(all(
        feature = "hwcmd-parser",
        any(debug_assertions, feature = "release-internal")
    ))] {
        mod enabled;
        pub use enabled::HwCmdParser;

        /// Whether the real parser is compiled in
        pub const PARSER_ENABLED: bool = true;
    } else {
        mod disabled;
        pub use disabled::HwCmdParser;

        /// Whether the real parser is compiled in
        pub const PARSER_ENABLED: bool = false;
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserConfig {
    /// Record `(command, dword, field)` triples written through
    /// [`assign_field!`](crate::assign_field)
    pub fields_layout: bool,
    /// Log every dword of every parsed command
    pub dump_dwords: bool,
}

impl ParserConfig {
    /// Capture field layouts
    pub const fn with_fields_layout(mut self) -> Self {
        self.fields_layout = true;
        self
    }

    /// Dump dwords
    pub const fn with_dump_dwords(mut self) -> Self {
        self.dump_dwords = true;
        self
    }
}

// =============================================================================
// SHARED TYPES
// =============================================================================

/// Picture coding type of the frame being built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum FrameType {
    /// Unknown / not yet set
    #[default]
    None = 0,
    /// Intra
    I = 1,
    /// Predicted
    P = 2,
    /// Bi-predicted
    B = 3,
}

/// Per-command counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CmdStats {
    /// Times the command was parsed
    pub count: u32,
    /// Total dwords seen
    pub dwords: usize,
}

/// One captured bit-field assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    /// Encoding the field belongs to
    pub cmd: &'static str,
    /// Dword index inside the encoding
    pub dw: u32,
    /// Field name
    pub field: &'static str,
}

/// Parser totals, as logged at teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserSummary {
    /// Frames started
    pub frames: u32,
    /// Command buffers parsed
    pub buffers: u32,
    /// Distinct commands seen
    pub commands: usize,
}
