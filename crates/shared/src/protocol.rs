use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Customization, OrderId, OrderStatus};

pub const STATUS_SUCCESS: &str = "success";

/// Response envelope used by every endpoint of the storefront API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Order as returned by `GET /api/v1/orders`, before mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrder {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub created_at: DateTime<Utc>,
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListData {
    pub orders: Vec<WireOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub user_id: String,
    pub new_password: String,
}
