//! Owner-scoped queries.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::Value;

use teckadm_core::{Collection, OwnerId, fields};

use super::StoredDocument;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Ordering requested from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    /// Field to sort on.
    pub field: &'static str,
    /// Sort direction.
    pub direction: Direction,
}

impl OrderBy {
    /// Newest first by server timestamp.
    pub const NEWEST_FIRST: Self = Self {
        field: fields::CREATED,
        direction: Direction::Descending,
    };
}

/// A filtered, optionally ordered query over one collection.
///
/// Every query the client builds filters on the owner field; that filter is
/// the only authorization boundary the client knows about.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    collection: Collection,
    field: &'static str,
    value: Value,
    order: Option<OrderBy>,
}

impl Query {
    /// Documents of `collection` owned by `owner`.
    #[must_use]
    pub fn owned_by(collection: Collection, owner: &OwnerId) -> Self {
        Self {
            collection,
            field: fields::OWNER,
            value: Value::String(owner.as_str().to_owned()),
            order: None,
        }
    }

    /// Request an ordering.
    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    /// Request an ordering if one is given.
    #[must_use]
    pub fn maybe_order_by(mut self, order: Option<OrderBy>) -> Self {
        self.order = order;
        self
    }

    /// Collection queried.
    #[must_use]
    pub const fn collection(&self) -> Collection {
        self.collection
    }

    /// Requested ordering.
    #[must_use]
    pub const fn ordering(&self) -> Option<OrderBy> {
        self.order
    }

    /// Whether a document passes the equality filter.
    #[must_use]
    pub fn matches(&self, doc: &StoredDocument) -> bool {
        doc.fields.get(self.field) == Some(&self.value)
    }

    /// Apply the query to a collection's documents, given in insertion
    /// order.
    ///
    /// Unordered queries keep insertion order. Ordered queries drop
    /// documents that lack the order field, the way the hosted store does,
    /// and sort stably so ties keep insertion order.
    #[must_use]
    pub fn evaluate(&self, docs: &[StoredDocument]) -> Vec<StoredDocument> {
        let mut result: Vec<StoredDocument> =
            docs.iter().filter(|doc| self.matches(doc)).cloned().collect();

        if let Some(order) = self.order {
            result.retain(|doc| doc.fields.get(order.field).is_some_and(|v| !v.is_null()));
            result.sort_by(|a, b| {
                let ordering = compare_values(
                    a.fields.get(order.field).unwrap_or(&Value::Null),
                    b.fields.get(order.field).unwrap_or(&Value::Null),
                );
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        result
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => match (parse_timestamp(a), parse_timestamp(b)) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a.cmp(b),
        },
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::store::Fields;

    fn doc(id: &str, body: Value) -> StoredDocument {
        let fields: Fields = match body {
            Value::Object(map) => map,
            _ => Fields::new(),
        };
        StoredDocument {
            id: id.into(),
            fields,
        }
    }

    #[test]
    fn test_filters_by_owner() {
        let docs = vec![
            doc("a", json!({ "ownerId": "U1", "nombre": "Acme" })),
            doc("b", json!({ "ownerId": "U2", "nombre": "Beta" })),
            doc("c", json!({ "ownerId": "U1", "nombre": "Cosa" })),
        ];
        let query = Query::owned_by(Collection::Clients, &OwnerId::new("U1"));

        let ids: Vec<_> = query
            .evaluate(&docs)
            .into_iter()
            .map(|d| d.id.as_str().to_owned())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_newest_first_drops_unstamped() {
        let docs = vec![
            doc("old", json!({ "ownerId": "U1", "creado": "2025-01-01T00:00:00Z" })),
            doc("pending", json!({ "ownerId": "U1" })),
            doc("new", json!({ "ownerId": "U1", "creado": "2025-02-01T08:30:00.5+00:00" })),
        ];
        let query = Query::owned_by(Collection::Quotes, &OwnerId::new("U1"))
            .order_by(OrderBy::NEWEST_FIRST);

        let ids: Vec<_> = query
            .evaluate(&docs)
            .into_iter()
            .map(|d| d.id.as_str().to_owned())
            .collect();
        assert_eq!(ids, vec!["new", "old"]);
    }
}
