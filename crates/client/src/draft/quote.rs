//! Quote form.
//!
//! The form keeps a list of editable line items. Quantity and price inputs
//! are parsed leniently: a comma is read as the decimal point and anything
//! unparseable counts as zero. The running total shown while typing covers
//! every row; the saved total covers only rows that have a description.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};

use teckadm_core::{
    ClientId, CurrencyCode, LineItem, Money, Quote, QuoteId, items_total, parse_amount,
};

use super::{DraftMode, ValidationError, non_blank};
use crate::reconcile::ClientPicker;
use crate::store::DocumentWrite;

/// Validated quote fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteFields {
    pub client_id: ClientId,
    pub title: Option<String>,
    /// Items with a description, trimmed.
    pub items: Vec<LineItem>,
    /// Total shown under the form: every row, blank ones included,
    /// rounded to cents.
    pub total: Decimal,
    pub currency: CurrencyCode,
}

impl QuoteFields {
    /// Fields written on create and on update. The server re-stamps
    /// `creado` on every save.
    #[must_use]
    pub fn to_write(&self) -> DocumentWrite {
        let items: Vec<Value> = self
            .items
            .iter()
            .map(|item| {
                json!({
                    "descripcion": item.description,
                    "cantidad": as_number(item.quantity),
                    "precio": as_number(item.price),
                })
            })
            .collect();

        DocumentWrite::new()
            .set("clienteId", self.client_id.as_str())
            .set("titulo", self.title.as_deref().unwrap_or_default())
            .set("items", items)
            .set("total", as_number(self.total))
            .set("moneda", self.currency.code())
            .with_server_timestamp("creado")
    }
}

fn as_number(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

/// Draft of the quotes form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteDraft {
    pub mode: DraftMode<QuoteId>,
    pub title: String,
    items: Vec<LineItem>,
    currency: CurrencyCode,
    default_currency: CurrencyCode,
    pub picker: ClientPicker,
}

impl QuoteDraft {
    /// A create draft with one blank row.
    #[must_use]
    pub fn new(default_currency: CurrencyCode) -> Self {
        Self {
            mode: DraftMode::Create,
            title: String::new(),
            items: vec![LineItem::default()],
            currency: default_currency,
            default_currency,
            picker: ClientPicker::new(),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Currency a cleared draft starts in.
    #[must_use]
    pub const fn default_currency(&self) -> CurrencyCode {
        self.default_currency
    }

    /// Switch between MXN and USD.
    pub const fn toggle_currency(&mut self) {
        self.currency = self.currency.toggled();
    }

    /// Append a blank row.
    pub fn add_item(&mut self) {
        self.items.push(LineItem::default());
    }

    /// Remove row `index`. The last remaining row cannot be removed.
    pub fn remove_item(&mut self, index: usize) -> bool {
        if self.items.len() <= 1 || index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        true
    }

    /// Set the description of row `index`.
    pub fn set_description(&mut self, index: usize, text: &str) -> bool {
        self.items
            .get_mut(index)
            .map(|item| item.description = text.to_owned())
            .is_some()
    }

    /// Set the quantity of row `index` from user input.
    pub fn set_quantity(&mut self, index: usize, text: &str) -> bool {
        self.items
            .get_mut(index)
            .map(|item| item.quantity = parse_amount(text))
            .is_some()
    }

    /// Set the price of row `index` from user input.
    pub fn set_price(&mut self, index: usize, text: &str) -> bool {
        self.items
            .get_mut(index)
            .map(|item| item.price = parse_amount(text))
            .is_some()
    }

    /// Running total over every row, as shown under the form.
    #[must_use]
    pub fn total(&self) -> Money {
        Money::new(items_total(&self.items), self.currency)
    }

    /// Bind the draft to `quote`.
    pub fn begin_edit(&mut self, quote: &Quote) {
        self.mode = DraftMode::Edit(quote.id.clone());
        self.title = quote.title.clone().unwrap_or_default();
        self.items.clone_from(&quote.items);
        if self.items.is_empty() {
            self.items.push(LineItem::default());
        }
        self.currency = quote.currency;
        self.picker.choose(quote.client_id.clone());
    }

    /// Back to a create draft with one blank row. The client selection is
    /// kept.
    pub fn reset(&mut self) {
        let picker = std::mem::take(&mut self.picker);
        *self = Self {
            picker,
            ..Self::new(self.default_currency)
        };
    }

    /// Check the form.
    ///
    /// # Errors
    ///
    /// Fails when no client is selected or no row has a description.
    pub fn validate(&self) -> Result<QuoteFields, ValidationError> {
        let client_id = self
            .picker
            .selected()
            .cloned()
            .ok_or(ValidationError::NoClientSelected)?;

        let items: Vec<LineItem> = self
            .items
            .iter()
            .filter(|item| !item.is_blank())
            .map(|item| LineItem::new(item.description.trim(), item.quantity, item.price))
            .collect();
        if items.is_empty() {
            return Err(ValidationError::NoLineItems);
        }

        Ok(QuoteFields {
            client_id,
            title: non_blank(&self.title),
            total: self.total().amount,
            items,
            currency: self.currency,
        })
    }
}

impl Default for QuoteDraft {
    fn default() -> Self {
        Self::new(CurrencyCode::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use teckadm_core::OwnerId;

    use super::*;

    fn draft_for(client: &str) -> QuoteDraft {
        let mut draft = QuoteDraft::default();
        draft.picker.choose(ClientId::new(client));
        draft
    }

    #[test]
    fn test_lenient_amounts_and_live_total() {
        let mut draft = draft_for("c1");
        draft.set_description(0, "Mantenimiento");
        draft.set_quantity(0, "2");
        draft.set_price(0, "150,50");
        draft.add_item();
        draft.set_quantity(1, "abc");
        draft.set_price(1, "99");

        assert_eq!(draft.items()[1].quantity, Decimal::ZERO);
        assert_eq!(draft.total().to_string(), "MXN $301.00");
        assert!(!draft.set_price(5, "1"));
    }

    #[test]
    fn test_saved_total_matches_displayed_total() {
        let mut draft = draft_for("c1");
        draft.set_description(0, " Cable ");
        draft.set_price(0, "10");
        draft.add_item();
        draft.set_price(1, "500");

        let fields = draft.validate().unwrap();
        assert_eq!(fields.items.len(), 1);
        assert_eq!(fields.items[0].description, "Cable");
        assert_eq!(fields.total, Decimal::new(510, 0));
        assert_eq!(fields.total, draft.total().amount);

        let write = fields.to_write();
        assert_eq!(write.fields()["moneda"], "MXN");
        assert_eq!(write.fields()["total"], 510.0);
        assert_eq!(write.server_timestamp(), Some("creado"));
    }

    #[test]
    fn test_rejections() {
        let mut draft = QuoteDraft::default();
        draft.set_description(0, "Cable");
        assert_eq!(draft.validate(), Err(ValidationError::NoClientSelected));

        let draft = draft_for("c1");
        assert_eq!(draft.validate(), Err(ValidationError::NoLineItems));
    }

    #[test]
    fn test_last_row_stays() {
        let mut draft = QuoteDraft::default();
        assert!(!draft.remove_item(0));
        draft.add_item();
        assert!(draft.remove_item(0));
        assert_eq!(draft.items().len(), 1);
    }

    #[test]
    fn test_edit_and_reset() {
        let quote = Quote {
            id: QuoteId::new("q1"),
            owner_id: OwnerId::new("U1"),
            client_id: ClientId::new("c9"),
            title: Some("Servicio".into()),
            items: Vec::new(),
            total: Decimal::ZERO,
            currency: CurrencyCode::USD,
            created_at: None,
        };
        let mut draft = QuoteDraft::default();
        draft.begin_edit(&quote);
        assert_eq!(draft.items().len(), 1);
        assert_eq!(draft.currency(), CurrencyCode::USD);
        assert_eq!(draft.picker.selected(), Some(&ClientId::new("c9")));

        draft.toggle_currency();
        assert_eq!(draft.currency(), CurrencyCode::MXN);

        draft.reset();
        assert_eq!(draft.mode, DraftMode::Create);
        assert!(draft.title.is_empty());
        assert_eq!(draft.picker.selected(), Some(&ClientId::new("c9")));
    }
}
