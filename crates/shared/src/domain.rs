use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PLACEHOLDER_COLOR: &str = "#ccc";
pub const PLACEHOLDER_MATERIAL: &str = "none";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Production state of an order.
///
/// The remote side may send a value outside the known set; it is carried as
/// `Unrecognized` so listing never fails, but it is never accepted as input
/// for a status update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    InProduction,
    Shipped,
    Canceled,
    Unrecognized(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status '{0}' (expected in-production, shipped or canceled)")]
pub struct UnknownStatus(pub String);

impl OrderStatus {
    pub fn as_wire(&self) -> &str {
        match self {
            OrderStatus::InProduction => "in-production",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Unrecognized(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, OrderStatus::Unrecognized(_))
    }

    /// Presentation style for the status badge; `None` for values outside the enum.
    pub fn badge(&self) -> Option<StatusBadge> {
        match self {
            OrderStatus::InProduction => Some(StatusBadge {
                label: "In production",
                color: "yellow",
            }),
            OrderStatus::Shipped => Some(StatusBadge {
                label: "Shipped",
                color: "green",
            }),
            OrderStatus::Canceled => Some(StatusBadge {
                label: "Canceled",
                color: "red",
            }),
            OrderStatus::Unrecognized(_) => None,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "in-production" => OrderStatus::InProduction,
            "shipped" => OrderStatus::Shipped,
            "canceled" => OrderStatus::Canceled,
            _ => OrderStatus::Unrecognized(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Unrecognized(raw) => raw,
            known => known.as_wire().to_string(),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match OrderStatus::from(s.trim().to_string()) {
            OrderStatus::Unrecognized(raw) => Err(UnknownStatus(raw)),
            known => Ok(known),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customization {
    pub color: String,
    pub material: String,
}

impl Customization {
    pub fn placeholder() -> Self {
        Self {
            color: PLACEHOLDER_COLOR.to_string(),
            material: PLACEHOLDER_MATERIAL.to_string(),
        }
    }
}

/// Display shape of an order as held by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer: String,
    pub date: String,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lace_color: Option<Customization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sole_color: Option<Customization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tongue_color: Option<Customization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_color: Option<Customization>,
}

impl Order {
    /// Copy with every absent customization replaced by the placeholder.
    pub fn detail_ready(&self) -> Order {
        let fill = |part: &Option<Customization>| {
            Some(part.clone().unwrap_or_else(Customization::placeholder))
        };
        Order {
            lace_color: fill(&self.lace_color),
            sole_color: fill(&self.sole_color),
            tongue_color: fill(&self.tongue_color),
            tip_color: fill(&self.tip_color),
            ..self.clone()
        }
    }

    pub fn parts(&self) -> [(&'static str, Option<&Customization>); 4] {
        [
            ("lace", self.lace_color.as_ref()),
            ("sole", self.sole_color.as_ref()),
            ("tongue", self.tongue_color.as_ref()),
            ("tip", self.tip_color.as_ref()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[serde(other)]
    Customer,
}
