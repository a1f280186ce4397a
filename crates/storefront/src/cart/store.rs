//! Cart state and the reducer that applies cart actions.

use astig_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line in the cart.
///
/// A denormalized copy of the live product document, refreshed on every
/// stock-checked change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product document ID.
    pub key: ProductId,
    pub name: String,
    /// Stock count at the last stock check.
    pub count_in_stock: u32,
    pub slug: String,
    /// Unit price.
    pub price: Decimal,
    /// Thumbnail URL.
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::from_amount(self.price)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.unit_price().times(self.quantity)
    }
}

/// Actions accepted by the cart store.
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Insert the item, replacing any line with the same key.
    AddItem(CartItem),
    /// Drop the line with this key.
    RemoveItem(ProductId),
    /// Empty the cart.
    Clear,
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
}

impl CartState {
    /// Apply an action, returning the next state.
    #[must_use]
    pub fn reduce(mut self, action: CartAction) -> Self {
        match action {
            CartAction::AddItem(item) => {
                match self.items.iter_mut().find(|line| line.key == item.key) {
                    Some(line) => *line = item,
                    None => self.items.push(item),
                }
            }
            CartAction::RemoveItem(key) => self.items.retain(|line| line.key != key),
            CartAction::Clear => self.items.clear(),
        }
        self
    }

    /// Line for `key`, if present.
    #[must_use]
    pub fn find(&self, key: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|line| &line.key == key)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Sum of all line prices.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        Price::from_amount(
            self.items
                .iter()
                .map(|line| line.line_price().amount)
                .sum(),
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
