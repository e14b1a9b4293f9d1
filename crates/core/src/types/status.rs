//! Status enums for orders and contact messages.
//!
//! Both lifecycles are advisory labels, not enforced state machines: the
//! admin may set any status at any time, including moving an order from
//! `delivered` back to `pending`. The enums only constrain the *vocabulary*
//! of statuses, never the transitions.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// Nominal progression is pending → confirmed → shipped → delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
}

impl OrderStatus {
    /// The stored string form of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Contact message status.
///
/// Nominal progression is new → read → replied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Replied,
}

impl ContactStatus {
    /// The stored string form of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
        }
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "read" => Ok(Self::Read),
            "replied" => Ok(Self::Replied),
            _ => Err(format!("invalid contact status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_contact_status_roundtrip() {
        for status in [
            ContactStatus::New,
            ContactStatus::Read,
            ContactStatus::Replied,
        ] {
            assert_eq!(status.as_str().parse::<ContactStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_rejects_unknown_status() {
        assert!("cancelled".parse::<OrderStatus>().is_err());
        assert!("archived".parse::<ContactStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_literals() {
        let json = serde_json::to_string(&OrderStatus::Delivered).expect("serialize");
        assert_eq!(json, "\"delivered\"");
        let json = serde_json::to_string(&ContactStatus::New).expect("serialize");
        assert_eq!(json, "\"new\"");
    }
}
