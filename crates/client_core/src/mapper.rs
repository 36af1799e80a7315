//! Wire record to display order.

use std::fmt;

use chrono::{
    format::{Item, StrftimeItems},
    DateTime, Local, TimeZone, Utc,
};
use shared::{domain::Order, protocol::WireOrder};
use thiserror::Error;

/// en-US short date, e.g. `3/14/2024`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date format '{0}'")]
pub struct InvalidDateFormat(pub String);

#[derive(Debug, Clone)]
pub struct DateStyle {
    format: String,
}

impl DateStyle {
    pub fn new(format: impl Into<String>) -> Result<Self, InvalidDateFormat> {
        let format = format.into();
        if format.trim().is_empty()
            || StrftimeItems::new(&format).any(|item| matches!(item, Item::Error))
        {
            return Err(InvalidDateFormat(format));
        }
        Ok(Self { format })
    }

    /// Renders the timestamp in the viewer's local time zone.
    pub fn render(&self, timestamp: DateTime<Utc>) -> String {
        self.render_in(timestamp, &Local)
    }

    fn render_in<Tz>(&self, timestamp: DateTime<Utc>, zone: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        timestamp
            .with_timezone(zone)
            .format(&self.format)
            .to_string()
    }
}

impl Default for DateStyle {
    fn default() -> Self {
        Self {
            format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

pub fn customer_label(name: Option<&str>, email: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => email.unwrap_or_default().to_string(),
    }
}

pub fn to_display(wire: WireOrder, style: &DateStyle) -> Order {
    Order {
        customer: customer_label(wire.customer_name.as_deref(), wire.customer_email.as_deref()),
        date: style.render(wire.created_at),
        id: wire.id,
        status: wire.status,
        lace_color: wire.lace_color,
        sole_color: wire.sole_color,
        tongue_color: wire.tongue_color,
        tip_color: wire.tip_color,
    }
}
