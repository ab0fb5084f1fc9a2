//! # Command Implementation
//!
//! Generation-side half of the command contract.
//!
//! A generation implementation owns one parameter record per command and may
//! override [`CmdImpl::set_cmd`] to translate records into encodings. Byte
//! size and emission are defined once, below, for every command of every
//! generation:
//!
//! ```text
//!  add_cmd ──▶ Encoding::default() ──▶ set_cmd(params, &mut cmd)
//!                                          │
//!                                          ▼
//!                                   parser.parse_cmd(name, bytes)
//!                                          │
//!                                          ▼
//!                        target.append(cmd) ──▶ target.append(extra)
//! ```

use crate::buffer::Target;
use crate::command::{Command, ParamSlot};
use crate::error::{MhwError, MhwResult};
use crate::itf::CmdItf;
use crate::parser::HwCmdParser;

// =============================================================================
// IMPLEMENTATION TRAIT
// =============================================================================

/// Generation-specific implementation of command `C`
pub trait CmdImpl<C: Command> {
    /// Parameter record slot of `C`
    fn slot(&self) -> &ParamSlot<C>;

    /// Mutable parameter record slot of `C`
    fn slot_mut(&mut self) -> &mut ParamSlot<C>;

    /// Instrumentation hook shared by the owning pipeline
    fn hwcmd_parser(&self) -> &HwCmdParser;

    /// Populate `cmd` from `params`.
    ///
    /// The default leaves the encoding at its default value.
    #[inline]
    fn set_cmd(&self, _params: &C::Params, _cmd: &mut C::Encoding) -> MhwResult<()> {
        Ok(())
    }
}

// =============================================================================
// GENERIC EMISSION
// =============================================================================

impl<C, T> CmdItf<C> for T
where
    C: Command,
    T: CmdImpl<C> + ?Sized,
{
    #[inline]
    fn get_params(&mut self, reset: bool) -> &mut C::Params {
        self.slot_mut().get(reset)
    }

    #[inline]
    fn get_encoded_byte_size(&self) -> usize {
        C::byte_size()
    }

    fn add_cmd(&mut self, mut target: Target<'_>, extra: Option<&[u8]>) -> MhwResult<()> {
        log::trace!("{}: {} bytes -> {}", C::NAME, C::byte_size(), target.kind());

        let mut cmd = C::Encoding::default();
        self.set_cmd(self.slot().params(), &mut cmd)
            .inspect_err(|e| log::error!("{}: set failed: {}", C::NAME, e))?;

        let bytes = bytemuck::bytes_of(&cmd);
        self.hwcmd_parser().parse_cmd(C::NAME, bytes);

        let sink = target.sink();
        sink.append(bytes).map_err(|e| {
            log::error!("{}: {}", C::NAME, e);
            MhwError::Append(e)
        })?;

        if let Some(extra) = extra.filter(|extra| !extra.is_empty()) {
            sink.append(extra).map_err(|e| {
                log::error!("{}: payload of {} bytes: {}", C::NAME, extra.len(), e);
                MhwError::PayloadAppend(e)
            })?;
        }

        Ok(())
    }
}

// =============================================================================
// BINDING MACRO
// =============================================================================

/// Bind a generation implementation struct to the commands it implements.
///
/// `store` names the field (path) holding the catalog's parameter store and
/// `parser` the one holding the shared [`HwCmdParser`] (anything that derefs
/// to it). A command followed by `=> method` is populated by that inherent
/// method, with signature
/// `fn(&self, &C::Params, &mut C::Encoding) -> MhwResult<()>`; a bare command
/// keeps the no-op default.
///
/// ```rust,ignore
/// impl_mhw_cmds! {
///     Impl { store: params, parser: parser }
///     MiNoop,
///     MfxWait => set_mfx_wait,
/// }
/// ```
///
/// A derived generation names the implementation it builds on with `base`.
/// Every listed command then runs the base setter first; `=> method` only
/// adjusts what the derived generation changes, and a bare command inherits
/// the base setter unchanged.
///
/// ```rust,ignore
/// impl_mhw_cmds! {
///     Impl { store: base.params, parser: base.parser, base: base }
///     MiNoop,
///     HcpSurfaceState => set_hcp_surface_state,
/// }
/// ```
#[macro_export]
macro_rules! impl_mhw_cmds {
    (@field $self_:tt; ($($field:ident).+)) => {
        $self_.$($field).+
    };

    (@slots $cmd:ty; ($($store:ident).+); ($($parser:ident).+)) => {
        #[inline]
        fn slot(&self) -> &$crate::ParamSlot<$cmd> {
            $crate::ParamStore::<$cmd>::slot(&self.$($store).+)
        }

        #[inline]
        fn slot_mut(&mut self) -> &mut $crate::ParamSlot<$cmd> {
            $crate::ParamStore::<$cmd>::slot_mut(&mut self.$($store).+)
        }

        #[inline]
        fn hwcmd_parser(&self) -> &$crate::HwCmdParser {
            &self.$($parser).+
        }
    };

    (
        $ty:ty { store: $($store:ident).+, parser: $($parser:ident).+ $(,)? }
        $( $cmd:ty $( => $setter:ident )? ),* $(,)?
    ) => {
        $crate::impl_mhw_cmds!(
            @plain $ty; ($($store).+); ($($parser).+);
            $( $cmd $( => $setter )? ),*
        );
    };

    (
        @plain $ty:ty; $store:tt; $parser:tt;
        $( $cmd:ty $( => $setter:ident )? ),*
    ) => {
        $(
            impl $crate::CmdImpl<$cmd> for $ty {
                $crate::impl_mhw_cmds!(@slots $cmd; $store; $parser);

                $(
                    #[inline]
                    fn set_cmd(
                        &self,
                        params: &<$cmd as $crate::Command>::Params,
                        cmd: &mut <$cmd as $crate::Command>::Encoding,
                    ) -> $crate::MhwResult<()> {
                        self.$setter(params, cmd)
                    }
                )?
            }
        )*
    };

    (
        $ty:ty {
            store: $($store:ident).+,
            parser: $($parser:ident).+,
            base: $($base:ident).+ $(,)?
        }
        $( $cmd:ty $( => $setter:ident )? ),* $(,)?
    ) => {
        $crate::impl_mhw_cmds!(
            @based $ty; ($($store).+); ($($parser).+); ($($base).+);
            $( $cmd $( => $setter )? ),*
        );
    };

    (
        @based $ty:ty; $store:tt; $parser:tt; $base:tt;
        $( $cmd:ty $( => $setter:ident )? ),*
    ) => {
        $(
            impl $crate::CmdImpl<$cmd> for $ty {
                $crate::impl_mhw_cmds!(@slots $cmd; $store; $parser);

                #[inline]
                fn set_cmd(
                    &self,
                    params: &<$cmd as $crate::Command>::Params,
                    cmd: &mut <$cmd as $crate::Command>::Encoding,
                ) -> $crate::MhwResult<()> {
                    $crate::CmdImpl::<$cmd>::set_cmd(
                        &$crate::impl_mhw_cmds!(@field self; $base),
                        params,
                        cmd,
                    )?;
                    $( self.$setter(params, cmd)?; )?
                    Ok(())
                }
            }
        )*
    };
}
