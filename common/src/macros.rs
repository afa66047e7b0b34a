#[macro_export]
macro_rules! agg_mod {
    [ $( $name:ident $(,)? )+ ] => {
        $(
            pub mod $name;
        )+
    };
}

/// Parses an enum from its exact wire name, failing with the given error.
#[macro_export]
macro_rules! impl_from_str_for_enum {
    ($enum_name:ident, $err:expr, $( $variant:ident => $wire:literal ),*) => {
        impl std::str::FromStr for $enum_name {
            type Err = $crate::errors::WalletError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($enum_name::$variant),)*
                    _ => Err($err),
                }
            }
        }
    };
}

#[macro_export]
macro_rules! impl_display_for_enum {
    ($enum_name:ident, $( $variant:ident => $wire:literal ),*) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $( $enum_name::$variant => f.write_str($wire), )*
                }
            }
        }
    };
}
