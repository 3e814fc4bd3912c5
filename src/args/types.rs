use std::num::{NonZeroU64, NonZeroUsize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Declares a `>= 1` integer newtype usable as a clap value and a config
/// field.
macro_rules! positive_newtype {
    ($name:ident, $nonzero:ty, $raw:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name($nonzero);

        impl $name {
            #[must_use]
            pub const fn get(self) -> $raw {
                self.0.get()
            }
        }

        impl TryFrom<$raw> for $name {
            type Error = ValidationError;

            fn try_from(value: $raw) -> Result<Self, Self::Error> {
                <$nonzero>::new(value)
                    .map(Self)
                    .ok_or(ValidationError::ValueTooSmall { min: 1 })
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<$raw>()
                    .map_err(|err| ValidationError::InvalidNumber { source: err })
                    .and_then(Self::try_from)
            }
        }
    };
}

positive_newtype!(PositiveU64, NonZeroU64, u64);
positive_newtype!(PositiveUsize, NonZeroUsize, usize);
