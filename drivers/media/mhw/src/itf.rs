//! # Command Interface
//!
//! The backend-agnostic contract every command exposes.
//!
//! Consumers program against [`CmdItf<C>`] only; which generation backs it is
//! decided by whoever constructed the implementation. All generation
//! implementations get this trait for free from
//! [`CmdImpl`](crate::imp::CmdImpl).

use crate::buffer::Target;
use crate::command::Command;
use crate::error::MhwResult;

// =============================================================================
// INTERFACE
// =============================================================================

/// The four-operation contract of command `C`
pub trait CmdItf<C: Command> {
    /// Get the command's parameter record, reset to its default if `reset`.
    ///
    /// Always the same record for a given implementation object.
    fn get_params(&mut self, reset: bool) -> &mut C::Params;

    /// Encoded size of the command in bytes
    fn get_encoded_byte_size(&self) -> usize;

    /// Encode the current parameter record and append it to `target`,
    /// followed by `extra` when it is non-empty.
    ///
    /// On error nothing from this call is in `target`, except for
    /// [`MhwError::PayloadAppend`](crate::MhwError::PayloadAppend) where the
    /// encoding was committed and only the payload is missing.
    fn add_cmd(&mut self, target: Target<'_>, extra: Option<&[u8]>) -> MhwResult<()>;
}

// =============================================================================
// TURBOFISH HELPERS
// =============================================================================

/// Generic-method view of [`CmdItf`], for call sites that name the command
/// with a turbofish:
///
/// ```rust,ignore
/// itf.par::<VdPipelineFlush>(true).flags = FlushFlags::WAIT_DONE_HEVC;
/// itf.add::<VdPipelineFlush>(Target::Cmd(&mut buf), None)?;
/// ```
pub trait CmdItfExt {
    /// See [`CmdItf::get_params`]
    #[inline]
    fn par<C: Command>(&mut self, reset: bool) -> &mut C::Params
    where
        Self: CmdItf<C>,
    {
        CmdItf::<C>::get_params(self, reset)
    }

    /// See [`CmdItf::get_encoded_byte_size`]
    #[inline]
    fn cmd_byte_size<C: Command>(&self) -> usize
    where
        Self: CmdItf<C>,
    {
        CmdItf::<C>::get_encoded_byte_size(self)
    }

    /// See [`CmdItf::add_cmd`]
    #[inline]
    fn add<C: Command>(&mut self, target: Target<'_>, extra: Option<&[u8]>) -> MhwResult<()>
    where
        Self: CmdItf<C>,
    {
        CmdItf::<C>::add_cmd(self, target, extra)
    }
}

impl<T: ?Sized> CmdItfExt for T {}
