//! Order dashboard state machine.
//!
//! Holds the fetched order list, the order opened in the detail view, and the
//! ledger of mutations still in flight. Every mutation is confirmation-gated:
//! local state changes only after the gateway reports success.

use std::{collections::HashMap, sync::Arc};

use shared::domain::{Order, OrderId, OrderStatus};
use tracing::{debug, error, info, warn};

use crate::{
    error::{DashboardError, GatewayError},
    gateway::OrderGateway,
    mapper::{to_display, DateStyle},
};

const LIST_FAILURE: &str = "Failed to fetch orders.";
const DELETE_FAILURE: &str = "Failed to delete order.";
const UPDATE_FAILURE: &str = "Failed to update order status.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderAction {
    Delete,
    UpdateStatus(OrderStatus),
}

impl OrderAction {
    fn name(&self) -> &'static str {
        match self {
            OrderAction::Delete => "delete",
            OrderAction::UpdateStatus(_) => "update_status",
        }
    }

    fn failure_fallback(&self) -> &'static str {
        match self {
            OrderAction::Delete => DELETE_FAILURE,
            OrderAction::UpdateStatus(_) => UPDATE_FAILURE,
        }
    }
}

/// A mutation that has been issued but not yet settled.
///
/// Only the most recently issued mutation for an order may settle; older ones
/// resolve as [`Settled::Stale`]. A confirmed delete is the exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation {
    order_id: OrderId,
    action: OrderAction,
    seq: u64,
}

impl PendingMutation {
    pub async fn dispatch<G>(&self, gateway: &G) -> Result<(), GatewayError>
    where
        G: OrderGateway + ?Sized,
    {
        match &self.action {
            OrderAction::Delete => gateway.delete_order(&self.order_id).await,
            OrderAction::UpdateStatus(status) => {
                gateway.update_status(&self.order_id, status).await
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Applied,
    Failed(String),
    Stale,
}

pub struct OrderDashboard<G: OrderGateway> {
    gateway: Arc<G>,
    date_style: DateStyle,
    orders: Vec<Order>,
    selected: Option<Order>,
    detail_visible: bool,
    last_error: Option<String>,
    in_flight: HashMap<OrderId, u64>,
    next_seq: u64,
}

impl<G: OrderGateway> OrderDashboard<G> {
    pub fn new(gateway: Arc<G>, date_style: DateStyle) -> Self {
        Self {
            gateway,
            date_style,
            orders: Vec::new(),
            selected: None,
            detail_visible: false,
            last_error: None,
            in_flight: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn gateway(&self) -> Arc<G> {
        Arc::clone(&self.gateway)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn total_orders(&self) -> usize {
        self.orders.len()
    }

    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    pub fn selected_order(&self) -> Option<&Order> {
        self.selected.as_ref()
    }

    pub fn detail_visible(&self) -> bool {
        self.detail_visible
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// First load after the dashboard is shown.
    pub async fn initialize(&mut self) -> Result<usize, GatewayError> {
        self.refresh().await
    }

    /// Fetches the list and replaces the held orders wholesale.
    ///
    /// On failure the held orders are left as they were.
    pub async fn refresh(&mut self) -> Result<usize, GatewayError> {
        match self.gateway.list_orders().await {
            Ok(wire) => {
                self.orders = wire
                    .into_iter()
                    .map(|record| to_display(record, &self.date_style))
                    .collect();
                self.last_error = None;
                info!(count = self.orders.len(), "dashboard: orders loaded");
                Ok(self.orders.len())
            }
            Err(err) => {
                error!(error = %err, "dashboard: failed to load orders");
                self.last_error = Some(err.user_message(LIST_FAILURE));
                Err(err)
            }
        }
    }

    pub fn view(&mut self, id: &OrderId) -> Result<&Order, DashboardError> {
        let detail = self
            .order(id)
            .map(Order::detail_ready)
            .ok_or_else(|| DashboardError::UnknownOrder(id.clone()))?;
        self.detail_visible = true;
        Ok(self.selected.insert(detail))
    }

    pub fn close(&mut self) {
        self.selected = None;
        self.detail_visible = false;
    }

    /// Issues a ticket for `action` on `id`, superseding any earlier one.
    pub fn begin(&mut self, id: OrderId, action: OrderAction) -> PendingMutation {
        self.next_seq += 1;
        let seq = self.next_seq;
        if let Some(previous) = self.in_flight.insert(id.clone(), seq) {
            debug!(order_id = %id, previous, seq, "dashboard: superseding in-flight mutation");
        }
        PendingMutation {
            order_id: id,
            action,
            seq,
        }
    }

    /// Applies a gateway result for a previously issued mutation.
    ///
    /// A confirmed delete always applies, whatever its ticket, and retires every
    /// ticket still pending for that order.
    pub fn settle(
        &mut self,
        pending: PendingMutation,
        result: Result<(), GatewayError>,
    ) -> Settled {
        let confirmed_delete = matches!(pending.action, OrderAction::Delete) && result.is_ok();
        let current = self.in_flight.get(&pending.order_id) == Some(&pending.seq);
        if !current && !confirmed_delete {
            debug!(
                order_id = %pending.order_id,
                action = pending.action.name(),
                "dashboard: discarding stale result"
            );
            return Settled::Stale;
        }
        if let Some(seq) = self.in_flight.remove(&pending.order_id) {
            if seq != pending.seq {
                debug!(
                    order_id = %pending.order_id,
                    retired = seq,
                    "dashboard: confirmed delete retires pending mutation"
                );
            }
        }

        if let Err(err) = result {
            warn!(
                order_id = %pending.order_id,
                action = pending.action.name(),
                error = %err,
                "dashboard: mutation failed"
            );
            let message = err.user_message(pending.action.failure_fallback());
            self.last_error = Some(message.clone());
            return Settled::Failed(message);
        }

        self.last_error = None;
        match pending.action {
            OrderAction::Delete => self.apply_delete(&pending.order_id),
            OrderAction::UpdateStatus(status) => self.apply_status(&pending.order_id, status),
        }
        Settled::Applied
    }

    pub async fn delete(&mut self, id: &OrderId) -> Settled {
        let pending = self.begin(id.clone(), OrderAction::Delete);
        let result = pending.dispatch(self.gateway.as_ref()).await;
        self.settle(pending, result)
    }

    pub async fn update_status(&mut self, id: &OrderId, status: OrderStatus) -> Settled {
        let pending = self.begin(id.clone(), OrderAction::UpdateStatus(status));
        let result = pending.dispatch(self.gateway.as_ref()).await;
        self.settle(pending, result)
    }

    fn apply_delete(&mut self, id: &OrderId) {
        self.orders.retain(|order| &order.id != id);
        info!(order_id = %id, total = self.total_orders(), "dashboard: order removed");
    }

    fn apply_status(&mut self, id: &OrderId, status: OrderStatus) {
        if let Some(order) = self.orders.iter_mut().find(|order| &order.id == id) {
            order.status = status.clone();
        }
        if let Some(selected) = self.selected.as_mut().filter(|order| &order.id == id) {
            selected.status = status;
        }
    }
}

#[cfg(test)]
#[path = "tests/dashboard_tests.rs"]
mod tests;
