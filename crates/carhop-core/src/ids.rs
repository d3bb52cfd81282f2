//! Branded ID newtypes.
//!
//! Every identifier in the system is a distinct string newtype so an order
//! id can never be passed where a line-item id is expected. All IDs
//! serialize as plain strings.
//!
//! ID spaces are disjoint by construction: menu-item ids are derived from
//! display names, order ids carry an `ord_` prefix, modification ids a
//! `mod_` prefix, and line-item ids are `{menu_id}_{uuid}` — a line-item
//! id is never reused within an order even after removal.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! branded_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id string.
            pub fn from_string(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

branded_id! {
    /// Identifier of one order record.
    OrderId
}

branded_id! {
    /// Identifier of one line item within an order.
    LineItemId
}

branded_id! {
    /// Identifier of one modification attached to a line item.
    ModificationId
}

branded_id! {
    /// Identifier of a catalog menu item, derived from its display name.
    MenuItemId
}

impl OrderId {
    /// Generate a fresh order id (`ord_` + UUIDv7).
    pub fn generate() -> Self {
        Self(format!("ord_{}", Uuid::now_v7()))
    }
}

impl LineItemId {
    /// Generate a fresh line-item id.
    ///
    /// The id keeps the deterministic menu-id prefix (useful when reading
    /// raw records) and appends a UUIDv7, so two adds of the same menu item
    /// in the same timestamp tick can never collide.
    pub fn generate(menu_id: &MenuItemId) -> Self {
        Self(format!("{}_{}", menu_id.as_str(), Uuid::now_v7()))
    }
}

impl ModificationId {
    /// Generate a fresh modification id (`mod_` + UUIDv7).
    pub fn generate() -> Self {
        Self(format!("mod_{}", Uuid::now_v7()))
    }
}

impl MenuItemId {
    /// Derive the catalog id from a display name: lowercase, whitespace
    /// stripped. Deterministic, and the sole lookup key for the catalog —
    /// `"Hot Dog"`, `"hot dog"`, and `"hotdog"` all resolve to `hotdog`.
    pub fn derive(name: &str) -> Self {
        Self(
            name.chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase(),
        )
    }
}
