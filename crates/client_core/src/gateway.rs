use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{OrderId, OrderStatus},
    error::{ApiError, ErrorCode},
    protocol::{Envelope, OrderListData, UpdateStatusRequest, WireOrder},
};
use tracing::{info, warn};
use url::Url;

use crate::{error::GatewayError, session::Session};

pub const DEFAULT_API_BASE_URL: &str = "https://sneaker-configurator-backend.onrender.com";
const ORDERS_PATH: &str = "/api/v1/orders";

/// HTTP plumbing shared by the order gateway and the auth client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let base_url = Url::parse(base_url.trim())?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Appends `path` to the base url, keeping any prefix the base already has.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        let joined = format!("{}{}", self.base_url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url
    }

    pub fn authorized(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        builder.bearer_auth(session.token())
    }
}

/// Reads an envelope from a 2xx response, or turns a non-2xx response into a
/// rejection carrying whatever message the body offers.
pub async fn read_envelope<T: DeserializeOwned>(
    response: Response,
) -> Result<Envelope<T>, GatewayError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        return Err(rejection(status, &body).into());
    }
    serde_json::from_slice(&body).map_err(|err| GatewayError::Malformed(err.to_string()))
}

/// Accepts any 2xx response without looking at its body.
pub async fn expect_success(response: Response) -> Result<(), GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.bytes().await?;
    Err(rejection(status, &body).into())
}

fn rejection(status: StatusCode, body: &[u8]) -> ApiError {
    let code = ErrorCode::from_http_status(status.as_u16());
    match serde_json::from_slice::<Envelope<serde_json::Value>>(body) {
        Ok(envelope) => ApiError::from_envelope(code, &envelope),
        Err(_) => ApiError::new(code, None),
    }
}

pub fn require_success<T>(envelope: Envelope<T>) -> Result<T, GatewayError> {
    if !envelope.is_success() {
        return Err(ApiError::from_envelope(ErrorCode::Validation, &envelope).into());
    }
    envelope
        .data
        .ok_or_else(|| GatewayError::Malformed("success envelope without data".to_string()))
}

#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn list_orders(&self) -> Result<Vec<WireOrder>, GatewayError>;
    async fn update_status(&self, id: &OrderId, status: &OrderStatus) -> Result<(), GatewayError>;
    async fn delete_order(&self, id: &OrderId) -> Result<(), GatewayError>;
}

pub struct HttpOrderGateway {
    api: ApiClient,
    session: Session,
}

impl HttpOrderGateway {
    pub fn new(api: ApiClient, session: Session) -> Self {
        Self { api, session }
    }

    fn order_url(&self, id: &OrderId) -> Result<Url, GatewayError> {
        if id.as_str().is_empty() {
            return Err(GatewayError::InvalidInput("order id is empty".to_string()));
        }
        let mut url = self.api.endpoint(ORDERS_PATH);
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidInput("api base url cannot carry a path".into()))?
            .push(id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl OrderGateway for HttpOrderGateway {
    async fn list_orders(&self) -> Result<Vec<WireOrder>, GatewayError> {
        let request = self.api.http().get(self.api.endpoint(ORDERS_PATH));
        let response = self.api.authorized(request, &self.session).send().await?;
        let envelope: Envelope<OrderListData> = read_envelope(response).await?;
        let orders = require_success(envelope)
            .inspect_err(|err| warn!(error = %err, "orders: list rejected"))?
            .orders;
        info!(count = orders.len(), "orders: list fetched");
        Ok(orders)
    }

    async fn update_status(&self, id: &OrderId, status: &OrderStatus) -> Result<(), GatewayError> {
        if !status.is_known() {
            return Err(GatewayError::InvalidInput(format!(
                "unknown order status '{status}'"
            )));
        }
        let request = self
            .api
            .http()
            .put(self.order_url(id)?)
            .json(&UpdateStatusRequest {
                status: status.clone(),
            });
        let response = self.api.authorized(request, &self.session).send().await?;
        expect_success(response).await?;
        info!(order_id = %id, status = %status, "orders: status updated");
        Ok(())
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), GatewayError> {
        let request = self.api.http().delete(self.order_url(id)?);
        let response = self.api.authorized(request, &self.session).send().await?;
        expect_success(response).await?;
        info!(order_id = %id, "orders: deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
