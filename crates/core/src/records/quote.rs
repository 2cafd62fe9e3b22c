//! Quote (cotización) record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Collection, Record, empty_as_none};
use crate::{ClientId, CurrencyCode, Money, OwnerId, QuoteId, round_cents};

/// One priced line of a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(
        rename = "cantidad",
        default = "default_quantity",
        with = "rust_decimal::serde::float"
    )]
    pub quantity: Decimal,
    #[serde(rename = "precio", default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

const fn default_quantity() -> Decimal {
    Decimal::ONE
}

impl LineItem {
    /// Create a line item.
    #[must_use]
    pub fn new(description: impl Into<String>, quantity: Decimal, price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            price,
        }
    }

    /// Unrounded `quantity × price`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.quantity * self.price
    }

    /// Whether the description is empty once trimmed.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.description.trim().is_empty()
    }
}

impl Default for LineItem {
    /// The empty row a fresh quote form starts with.
    fn default() -> Self {
        Self::new(String::new(), Decimal::ONE, Decimal::ZERO)
    }
}

/// Σ(quantity × price) over the items, rounded to two decimal places.
#[must_use]
pub fn items_total<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> Decimal {
    round_cents(items.into_iter().map(LineItem::subtotal).sum())
}

/// A priced quote for one client.
///
/// `created_at` is re-stamped by the server on every save, so it reflects
/// the last edit rather than creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    #[serde(rename = "ownerId")]
    pub owner_id: OwnerId,
    #[serde(rename = "clienteId")]
    pub client_id: ClientId,
    #[serde(
        rename = "titulo",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(rename = "moneda", default)]
    pub currency: CurrencyCode,
    #[serde(rename = "creado", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Quote {
    /// The stored total with its currency, as the quote list shows it.
    #[must_use]
    pub const fn stored_total(&self) -> Money {
        Money::new(self.total, self.currency)
    }
}

impl Record for Quote {
    type Id = QuoteId;

    const COLLECTION: Collection = Collection::Quotes;

    fn id(&self) -> &QuoteId {
        &self.id
    }

    fn owner(&self) -> &OwnerId {
        &self.owner_id
    }
}
