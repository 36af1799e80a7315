use super::*;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::{
    domain::Customization,
    error::{ApiError, ErrorCode, GENERIC_FAILURE},
    protocol::WireOrder,
};
use tokio::sync::Mutex;

#[derive(Default)]
struct ScriptedGateway {
    remote: Mutex<Vec<WireOrder>>,
    fail_list: Mutex<bool>,
    fail_mutations: Mutex<bool>,
    list_calls: Mutex<u32>,
}

impl ScriptedGateway {
    fn with_orders(orders: Vec<WireOrder>) -> Arc<Self> {
        Arc::new(Self {
            remote: Mutex::new(orders),
            ..Self::default()
        })
    }
}

#[async_trait]
impl OrderGateway for ScriptedGateway {
    async fn list_orders(&self) -> Result<Vec<WireOrder>, GatewayError> {
        *self.list_calls.lock().await += 1;
        if *self.fail_list.lock().await {
            return Err(GatewayError::Malformed("truncated body".into()));
        }
        Ok(self.remote.lock().await.clone())
    }

    async fn update_status(&self, id: &OrderId, status: &OrderStatus) -> Result<(), GatewayError> {
        if *self.fail_mutations.lock().await {
            return Err(ApiError::new(ErrorCode::Validation, Some("Order is locked".into())).into());
        }
        for order in self.remote.lock().await.iter_mut() {
            if &order.id == id {
                order.status = status.clone();
            }
        }
        Ok(())
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), GatewayError> {
        if *self.fail_mutations.lock().await {
            return Err(ApiError::new(ErrorCode::Internal, None).into());
        }
        self.remote.lock().await.retain(|order| &order.id != id);
        Ok(())
    }
}

fn wire(id: &str, name: Option<&str>, status: OrderStatus) -> WireOrder {
    WireOrder {
        id: OrderId::new(id),
        customer_name: name.map(str::to_string),
        customer_email: Some(format!("{id}@example.com")),
        created_at: Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap(),
        status,
        lace_color: None,
        sole_color: Some(Customization {
            color: "#00ff00".into(),
            material: "rubber".into(),
        }),
        tongue_color: None,
        tip_color: None,
    }
}

fn two_orders() -> Vec<WireOrder> {
    vec![
        wire("A", Some("Ann"), OrderStatus::InProduction),
        wire("B", None, OrderStatus::Shipped),
    ]
}

async fn loaded_dashboard(gateway: Arc<ScriptedGateway>) -> OrderDashboard<ScriptedGateway> {
    let mut dashboard = OrderDashboard::new(gateway, DateStyle::default());
    dashboard.initialize().await.expect("initial load");
    dashboard
}

#[tokio::test]
async fn list_delete_update_scenario() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(gateway).await;

    assert_eq!(dashboard.orders().len(), 2);
    assert_eq!(dashboard.total_orders(), 2);
    assert_eq!(dashboard.orders()[0].customer, "Ann");
    assert_eq!(dashboard.orders()[1].customer, "B@example.com");

    let a = OrderId::new("A");
    assert_eq!(dashboard.delete(&a).await, Settled::Applied);
    assert_eq!(dashboard.total_orders(), 1);
    assert_eq!(dashboard.orders()[0].id, OrderId::new("B"));

    let b = OrderId::new("B");
    assert_eq!(
        dashboard.update_status(&b, OrderStatus::Canceled).await,
        Settled::Applied
    );
    assert_eq!(dashboard.orders()[0].status, OrderStatus::Canceled);
    assert!(dashboard.last_error().is_none());
}

#[tokio::test]
async fn refreshing_unchanged_remote_yields_equal_collections() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(Arc::clone(&gateway)).await;
    let first = dashboard.orders().to_vec();

    dashboard.refresh().await.expect("second load");

    assert_eq!(dashboard.orders(), first.as_slice());
    assert_eq!(*gateway.list_calls.lock().await, 2);
}

#[tokio::test]
async fn refresh_replaces_instead_of_merging() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(Arc::clone(&gateway)).await;

    *gateway.remote.lock().await = vec![wire("C", Some("Cy"), OrderStatus::Shipped)];
    assert_eq!(dashboard.refresh().await.expect("reload"), 1);

    assert_eq!(dashboard.orders().len(), 1);
    assert_eq!(dashboard.orders()[0].id, OrderId::new("C"));
}

#[tokio::test]
async fn failed_initial_load_leaves_orders_empty_and_surfaces_error() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    *gateway.fail_list.lock().await = true;
    let mut dashboard = OrderDashboard::new(gateway, DateStyle::default());

    assert!(dashboard.initialize().await.is_err());

    assert!(dashboard.orders().is_empty());
    assert_eq!(dashboard.last_error(), Some(GENERIC_FAILURE));
}

#[tokio::test]
async fn failed_refresh_keeps_previous_orders() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(Arc::clone(&gateway)).await;
    let before = dashboard.orders().to_vec();

    *gateway.fail_list.lock().await = true;
    assert!(dashboard.refresh().await.is_err());

    assert_eq!(dashboard.orders(), before.as_slice());
}

#[tokio::test]
async fn failed_delete_leaves_orders_identical() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(Arc::clone(&gateway)).await;
    let before = dashboard.orders().to_vec();

    *gateway.fail_mutations.lock().await = true;
    let outcome = dashboard.delete(&OrderId::new("A")).await;

    assert_eq!(outcome, Settled::Failed("Failed to delete order.".into()));
    assert_eq!(dashboard.orders(), before.as_slice());
    assert_eq!(dashboard.total_orders(), 2);
    assert_eq!(dashboard.last_error(), Some("Failed to delete order."));
}

#[tokio::test]
async fn status_update_keeps_list_and_detail_consistent() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(gateway).await;
    let b = OrderId::new("B");
    dashboard.view(&b).expect("view");

    dashboard.update_status(&b, OrderStatus::Canceled).await;

    assert_eq!(
        dashboard.order(&b).map(|o| o.status.clone()),
        Some(OrderStatus::Canceled)
    );
    assert_eq!(
        dashboard.selected_order().map(|o| o.status.clone()),
        Some(OrderStatus::Canceled)
    );
}

#[tokio::test]
async fn status_update_of_other_order_leaves_detail_alone() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(gateway).await;
    dashboard.view(&OrderId::new("A")).expect("view");

    dashboard
        .update_status(&OrderId::new("B"), OrderStatus::Canceled)
        .await;

    assert_eq!(
        dashboard.selected_order().map(|o| o.status.clone()),
        Some(OrderStatus::InProduction)
    );
}

#[tokio::test]
async fn failed_status_update_mutates_nothing() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(Arc::clone(&gateway)).await;
    let b = OrderId::new("B");
    dashboard.view(&b).expect("view");

    *gateway.fail_mutations.lock().await = true;
    let outcome = dashboard.update_status(&b, OrderStatus::Canceled).await;

    assert_eq!(outcome, Settled::Failed("Order is locked".into()));
    assert_eq!(dashboard.order(&b).map(|o| o.status.clone()), Some(OrderStatus::Shipped));
    assert_eq!(
        dashboard.selected_order().map(|o| o.status.clone()),
        Some(OrderStatus::Shipped)
    );
}

#[tokio::test]
async fn view_substitutes_placeholders_without_touching_list_entry() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(gateway).await;
    let a = OrderId::new("A");

    let detail = dashboard.view(&a).expect("view").clone();

    assert_eq!(detail.lace_color, Some(Customization::placeholder()));
    assert_eq!(detail.tip_color, Some(Customization::placeholder()));
    assert_eq!(
        detail.sole_color.as_ref().map(|c| c.material.as_str()),
        Some("rubber")
    );
    assert!(dashboard.detail_visible());
    assert!(dashboard.order(&a).expect("listed").lace_color.is_none());
}

#[tokio::test]
async fn view_of_unknown_order_changes_nothing() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(gateway).await;

    let err = dashboard.view(&OrderId::new("Z")).expect_err("unknown id");

    assert_eq!(err, DashboardError::UnknownOrder(OrderId::new("Z")));
    assert!(!dashboard.detail_visible());
    assert!(dashboard.selected_order().is_none());
}

#[tokio::test]
async fn close_clears_selection_and_is_idempotent() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(gateway).await;
    dashboard.view(&OrderId::new("A")).expect("view");

    dashboard.close();
    dashboard.close();

    assert!(!dashboard.detail_visible());
    assert!(dashboard.selected_order().is_none());
}

#[tokio::test]
async fn superseded_status_result_is_discarded() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(gateway).await;
    let b = OrderId::new("B");

    let older = dashboard.begin(b.clone(), OrderAction::UpdateStatus(OrderStatus::InProduction));
    let newer = dashboard.begin(b.clone(), OrderAction::UpdateStatus(OrderStatus::Canceled));

    assert_eq!(dashboard.settle(newer, Ok(())), Settled::Applied);
    assert_eq!(dashboard.settle(older, Ok(())), Settled::Stale);
    assert_eq!(
        dashboard.order(&b).map(|o| o.status.clone()),
        Some(OrderStatus::Canceled)
    );
}

#[tokio::test]
async fn update_resolving_after_superseding_delete_is_stale() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(gateway).await;
    let a = OrderId::new("A");

    let update = dashboard.begin(a.clone(), OrderAction::UpdateStatus(OrderStatus::Shipped));
    let delete = dashboard.begin(a.clone(), OrderAction::Delete);

    let gateway = dashboard.gateway();
    let delete_result = delete.dispatch(gateway.as_ref()).await;
    assert_eq!(dashboard.settle(delete, delete_result), Settled::Applied);

    let update_result = update.dispatch(gateway.as_ref()).await;
    assert_eq!(dashboard.settle(update, update_result), Settled::Stale);
    assert!(dashboard.order(&a).is_none());
    assert_eq!(dashboard.total_orders(), 1);
}

#[tokio::test]
async fn confirmed_delete_applies_after_newer_update_settles() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(gateway).await;
    let a = OrderId::new("A");

    let delete = dashboard.begin(a.clone(), OrderAction::Delete);
    let update = dashboard.begin(a.clone(), OrderAction::UpdateStatus(OrderStatus::Shipped));

    let gateway = dashboard.gateway();
    let update_result = update.dispatch(gateway.as_ref()).await;
    assert_eq!(dashboard.settle(update, update_result), Settled::Applied);

    let delete_result = delete.dispatch(gateway.as_ref()).await;
    assert!(delete_result.is_ok());
    assert_eq!(dashboard.settle(delete, delete_result), Settled::Applied);
    assert!(dashboard.order(&a).is_none());
    assert_eq!(dashboard.total_orders(), 1);
    assert!(dashboard.last_error().is_none());
}

#[tokio::test]
async fn confirmed_delete_retires_newer_pending_update() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(gateway).await;
    let a = OrderId::new("A");

    let delete = dashboard.begin(a.clone(), OrderAction::Delete);
    let update = dashboard.begin(a.clone(), OrderAction::UpdateStatus(OrderStatus::Canceled));

    assert_eq!(dashboard.settle(delete, Ok(())), Settled::Applied);
    assert_eq!(dashboard.settle(update, Ok(())), Settled::Stale);
    assert!(dashboard.order(&a).is_none());
    assert_eq!(dashboard.total_orders(), 1);
}

#[tokio::test]
async fn stale_failure_does_not_surface_error() {
    let gateway = ScriptedGateway::with_orders(two_orders());
    let mut dashboard = loaded_dashboard(gateway).await;
    let a = OrderId::new("A");

    let older = dashboard.begin(a.clone(), OrderAction::Delete);
    let newer = dashboard.begin(a.clone(), OrderAction::UpdateStatus(OrderStatus::Shipped));

    assert_eq!(dashboard.settle(newer, Ok(())), Settled::Applied);
    let failure = GatewayError::Malformed("late".into());
    assert_eq!(dashboard.settle(older, Err(failure)), Settled::Stale);
    assert!(dashboard.last_error().is_none());
    assert_eq!(dashboard.total_orders(), 2);
}
