//! Newtype identifiers for catalog entities.
//!
//! Zones, methods and rates are keyed by strings assigned by the admin
//! layer; products and categories come from the storefront catalog. Keeping
//! them apart stops a `CategoryId` from being matched against product lists.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

define_id!(
    /// Identifier of a shipping zone.
    ZoneId
);
define_id!(
    /// Identifier of a shipping method.
    MethodId
);
define_id!(
    /// Identifier of a shipping rate.
    RateId
);
define_id!(
    /// Identifier of a storefront product.
    ProductId
);
define_id!(
    /// Identifier of a storefront category.
    CategoryId
);
