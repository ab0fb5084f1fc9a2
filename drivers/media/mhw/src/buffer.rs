//! # Output Targets
//!
//! Append-only destinations for encoded commands.
//!
//! The command layer never owns a buffer: it borrows one [`Target`] per
//! `add_cmd` call and appends through the narrow [`CommandSink`] interface.
//! Both buffer kinds advance their cursor in whole dwords; a short tail is
//! zero padded.
//!
//! ```text
//!  ┌──────────────── capacity ────────────────┐
//!  │ cmd │ cmd │ payload+pad │      free       │
//!  └─────┴─────┴─────────────┴─────────────────┘
//!                            ▲ offset
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{AppendError, MhwError, MhwResult};

/// Granularity of every append
pub const DWORD_SIZE: usize = 4;

/// Round `size` up to a whole number of dwords
#[inline]
pub const fn dword_align(size: usize) -> usize {
    (size + (DWORD_SIZE - 1)) & !(DWORD_SIZE - 1)
}

// =============================================================================
// SINK TRAIT
// =============================================================================

/// Narrow append interface of an output target
pub trait CommandSink {
    /// Append `bytes` at the cursor.
    ///
    /// Either the whole (dword-aligned) run is written or nothing is.
    fn append(&mut self, bytes: &[u8]) -> Result<(), AppendError>;

    /// Current cursor, in bytes
    fn offset(&self) -> usize;

    /// Bytes still available
    fn remaining(&self) -> usize;

    /// Bytes written so far
    fn as_bytes(&self) -> &[u8];
}

fn copy_aligned(storage: &mut [u8], at: usize, bytes: &[u8]) -> usize {
    let aligned = dword_align(bytes.len());
    storage[at..at + bytes.len()].copy_from_slice(bytes);
    storage[at + bytes.len()..at + aligned].fill(0);
    aligned
}

// =============================================================================
// COMMAND BUFFER
// =============================================================================

/// Primary command buffer
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    /// Backing storage (fixed capacity)
    data: Vec<u8>,
    /// Write cursor
    offset: usize,
}

impl CommandBuffer {
    /// Create a command buffer of `capacity` bytes
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            offset: 0,
        }
    }

    /// Capacity in bytes
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Rewind the cursor; the contents become garbage
    pub fn reset(&mut self) {
        self.offset = 0;
    }
}

impl CommandSink for CommandBuffer {
    fn append(&mut self, bytes: &[u8]) -> Result<(), AppendError> {
        let requested = dword_align(bytes.len());
        let remaining = self.remaining();
        if requested > remaining {
            log::error!("Unable to add command (no space)");
            return Err(AppendError::NoSpace {
                requested,
                remaining,
            });
        }

        self.offset += copy_aligned(&mut self.data, self.offset, bytes);
        Ok(())
    }

    fn offset(&self) -> usize {
        self.offset
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data[..self.offset]
    }
}

// =============================================================================
// BATCH BUFFER
// =============================================================================

/// Secondary (second-level) batch buffer.
///
/// Appends are only accepted while the buffer is locked, i.e. CPU mapped.
#[derive(Debug, Clone)]
pub struct BatchBuffer {
    /// Backing storage (fixed capacity)
    data: Vec<u8>,
    /// Write cursor
    current: usize,
    /// CPU mapping present
    locked: bool,
}

impl BatchBuffer {
    /// Create an unlocked batch buffer of `size` bytes
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
            current: 0,
            locked: false,
        }
    }

    /// Map the buffer for CPU writes
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Drop the CPU mapping
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Whether the buffer is mapped
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl CommandSink for BatchBuffer {
    fn append(&mut self, bytes: &[u8]) -> Result<(), AppendError> {
        if !self.locked {
            log::error!("Batch buffer is not locked");
            return Err(AppendError::NotLocked);
        }

        let requested = dword_align(bytes.len());
        let remaining = self.remaining();
        if requested > remaining {
            log::error!("Insufficient space in batch buffer");
            return Err(AppendError::NoSpace {
                requested,
                remaining,
            });
        }

        self.current += copy_aligned(&mut self.data, self.current, bytes);
        Ok(())
    }

    fn offset(&self) -> usize {
        self.current
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.current
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data[..self.current]
    }
}

// =============================================================================
// TARGET
// =============================================================================

/// Destination of one `add_cmd` call
#[derive(Debug)]
pub enum Target<'a> {
    /// Primary command buffer
    Cmd(&'a mut CommandBuffer),
    /// Secondary batch buffer
    Batch(&'a mut BatchBuffer),
}

impl<'a> Target<'a> {
    /// Pick the destination: the command buffer when present, else the batch
    /// buffer.
    pub fn select(
        cmd_buf: Option<&'a mut CommandBuffer>,
        batch_buf: Option<&'a mut BatchBuffer>,
    ) -> MhwResult<Self> {
        match (cmd_buf, batch_buf) {
            (Some(cmd), _) => Ok(Target::Cmd(cmd)),
            (None, Some(batch)) => Ok(Target::Batch(batch)),
            (None, None) => Err(MhwError::NullTarget),
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Target::Cmd(_) => "cmd",
            Target::Batch(_) => "batch",
        }
    }

    /// The underlying sink
    pub fn sink(&mut self) -> &mut dyn CommandSink {
        match self {
            Target::Cmd(buf) => &mut **buf,
            Target::Batch(buf) => &mut **buf,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
