//! Ticket status and priority enums.
//!
//! Wire names are the Spanish values persisted in the `incidencias`
//! collection.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Ticket lifecycle status.
///
/// Advancing is cyclic: open → in progress → closed → open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TicketStatus {
    #[default]
    #[serde(rename = "abierta")]
    Open,
    #[serde(rename = "en_proceso")]
    InProgress,
    #[serde(rename = "cerrada")]
    Closed,
}

impl TicketStatus {
    /// All statuses in advance order.
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Closed];

    /// The status one step further in the cycle.
    #[must_use]
    pub const fn advance(self) -> Self {
        match self {
            Self::Open => Self::InProgress,
            Self::InProgress => Self::Closed,
            Self::Closed => Self::Open,
        }
    }

    /// Persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "abierta",
            Self::InProgress => "en_proceso",
            Self::Closed => "cerrada",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abierta" | "open" => Ok(Self::Open),
            "en_proceso" | "in_progress" => Ok(Self::InProgress),
            "cerrada" | "closed" => Ok(Self::Closed),
            _ => Err(format!("invalid ticket status: {s}")),
        }
    }
}

/// Ticket priority. Not ordered and never advanced automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TicketPriority {
    #[default]
    #[serde(rename = "baja")]
    Low,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
}

impl TicketPriority {
    /// All priorities, as offered by the picker.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "baja",
            Self::Medium => "media",
            Self::High => "alta",
        }
    }
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TicketPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baja" | "low" => Ok(Self::Low),
            "media" | "medium" => Ok(Self::Medium),
            "alta" | "high" => Ok(Self::High),
            _ => Err(format!("invalid ticket priority: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps_around() {
        let mut status = TicketStatus::Open;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(status);
            status = status.advance();
        }
        assert_eq!(
            seen,
            vec![
                TicketStatus::Open,
                TicketStatus::InProgress,
                TicketStatus::Closed,
                TicketStatus::Open,
            ]
        );
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            "\"en_proceso\""
        );
        assert_eq!(
            serde_json::from_str::<TicketPriority>("\"alta\"").unwrap(),
            TicketPriority::High
        );
    }

    #[test]
    fn test_from_str_accepts_both_spellings() {
        assert_eq!("closed".parse::<TicketStatus>(), Ok(TicketStatus::Closed));
        assert_eq!("media".parse::<TicketPriority>(), Ok(TicketPriority::Medium));
        assert!("urgent".parse::<TicketPriority>().is_err());
    }
}
