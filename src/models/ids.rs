//! Strongly-typed ID wrappers for all entity types
//!
//! Every entity is keyed by a random UUID wrapped in its own newtype, so a
//! `PartId` can never be passed where a `UnitId` is expected. The full UUID
//! string is the stable link target; `Display` gives a short prefixed form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Full hyphenated UUID string, suitable as a link target
            pub fn to_uuid_string(&self) -> String {
                self.0.to_string()
            }

            /// Short prefixed form used in listings (e.g. `unit-1a2b3c4d`)
            pub fn short(&self) -> String {
                format!("{}{}", $display_prefix, &self.0.to_string()[..8])
            }

            /// Whether `s` names this id, either as full UUID or short form
            pub fn matches(&self, s: &str) -> bool {
                let s = s.trim();
                s.eq_ignore_ascii_case(&self.to_uuid_string()) || s.eq_ignore_ascii_case(&self.short())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.short())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(UnitId, "unit-");
define_id!(TaskId, "task-");
define_id!(PartId, "part-");
define_id!(PartUseId, "use-");
define_id!(PhotoId, "pho-");
define_id!(TimeEntryId, "time-");
define_id!(SupplyId, "sup-");
