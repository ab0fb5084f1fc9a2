//! # Catalog Macros
//!
//! Declarative glue turning a list of commands into a typed catalog.

/// Declare a command catalog.
///
/// For each `Name: EncodingType, ParamsType = "HW_NAME"` entry this generates
/// the zero-sized identity `Name` implementing [`Command`](crate::Command),
/// a `Kind` variant, a tagged `ParamsMut` variant and a parameter slot in the
/// store struct. Encodings must be a whole number of dwords; this is checked
/// at compile time.
///
/// ```rust,ignore
/// mhw_catalog! {
///     /// Gen12 VDBOX commands
///     pub catalog Gen12 {
///         kind: Gen12Kind,
///         params_mut: Gen12ParamsMut,
///         store: Gen12Params,
///     }
///     /// MI_NOOP
///     MiNoop: MiNoopCmd, MiNoopPar = "MI_NOOP";
///     MfxWait: MfxWaitCmd, MfxWaitPar = "MFX_WAIT";
/// }
/// ```
#[macro_export]
macro_rules! mhw_catalog {
    (
        $(#[$meta:meta])*
        $vis:vis catalog $catalog:ident {
            kind: $kind:ident,
            params_mut: $params_mut:ident,
            store: $store:ident $(,)?
        }
        $(
            $(#[$cmeta:meta])*
            $cmd:ident : $enc:ty, $par:ty = $name:literal
        );+ $(;)?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $catalog;

        #[doc = concat!("Command kinds of [`", stringify!($catalog), "`]")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $kind {
            $(
                #[doc = $name]
                $cmd,
            )+
        }

        #[doc = concat!("Mutable parameter record of one [`", stringify!($catalog), "`] command")]
        #[derive(Debug)]
        $vis enum $params_mut<'a> {
            $(
                #[doc = $name]
                $cmd(&'a mut $par),
            )+
        }

        impl $crate::Catalog for $catalog {
            type Kind = $kind;
            type ParamsMut<'a> = $params_mut<'a>;
        }

        $(
            $(#[$cmeta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            $vis struct $cmd;

            impl $crate::Command for $cmd {
                type Catalog = $catalog;
                type Encoding = $enc;
                type Params = $par;
                const NAME: &'static str = $name;
                const KIND: $kind = $kind::$cmd;

                #[inline]
                fn tagged(params: &mut $par) -> $params_mut<'_> {
                    $params_mut::$cmd(params)
                }
            }

            $crate::__private::static_assertions::const_assert!(
                ::core::mem::size_of::<$enc>() % $crate::buffer::DWORD_SIZE == 0
            );
        )+

        $crate::__private::paste::paste! {
            #[doc = concat!("Parameter records of every [`", stringify!($catalog), "`] command")]
            #[derive(Debug, Default)]
            $vis struct $store {
                $(
                    [<$cmd:snake>]: $crate::ParamSlot<$cmd>,
                )+
            }

            $(
                impl $crate::ParamStore<$cmd> for $store {
                    #[inline]
                    fn slot(&self) -> &$crate::ParamSlot<$cmd> {
                        &self.[<$cmd:snake>]
                    }

                    #[inline]
                    fn slot_mut(&mut self) -> &mut $crate::ParamSlot<$cmd> {
                        &mut self.[<$cmd:snake>]
                    }
                }
            )+
        }
    };
}

/// Write one bit-field of an encoding dword and, when the parser captures
/// field layouts, record where it lives.
///
/// The second argument is the command identity; `cmd` must be a `&mut` to its
/// encoding. Layouts are recorded under the command's `NAME`, the same key the
/// parser uses for its per-command counters.
///
/// ```rust,ignore
/// assign_field!(self.parser, MfxWait, cmd.dw0.mfx_sync_control_flag = 1);
/// ```
#[macro_export]
macro_rules! assign_field {
    ($parser:expr, $id:ty, $cmd:ident . $dw:ident . $field:ident = $value:expr) => {{
        $crate::__private::paste::paste! {
            $cmd.$dw.[<set_ $field>]($value);
        }
        let encoding: &<$id as $crate::Command>::Encoding = &*$cmd;
        if $parser.parse_fields_layout_enabled() {
            $parser.parse_field_layout(
                <$id as $crate::Command>::NAME,
                $crate::command::dword_index(encoding, &encoding.$dw),
                stringify!($field),
            );
        }
    }};
}
