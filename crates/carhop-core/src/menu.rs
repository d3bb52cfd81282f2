//! Menu catalog entries.

use serde::{Deserialize, Serialize};

use crate::ids::MenuItemId;
use crate::money::Price;

/// One item on the menu.
///
/// Immutable once loaded: orders snapshot the name and price at add-time,
/// so later catalog edits never retroactively change existing orders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Derived id (see [`MenuItemId::derive`]).
    pub id: MenuItemId,
    /// Display name shown to the customer.
    pub name: String,
    /// Current price.
    pub price: Price,
    /// Ingredients included by default, in recipe order.
    pub default_ingredients: Vec<String>,
    /// Subset of ingredients the customer may modify.
    pub customizable_ingredients: Vec<String>,
}

impl MenuItem {
    /// Build a catalog entry, deriving the id from the display name.
    pub fn new(
        name: impl Into<String>,
        price: Price,
        default_ingredients: Vec<String>,
        customizable_ingredients: Vec<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: MenuItemId::derive(&name),
            name,
            price,
            default_ingredients,
            customizable_ingredients,
        }
    }

    /// Whether the given ingredient accepts modifications.
    pub fn is_customizable(&self, ingredient: &str) -> bool {
        self.customizable_ingredients
            .iter()
            .any(|i| i.eq_ignore_ascii_case(ingredient))
    }
}
