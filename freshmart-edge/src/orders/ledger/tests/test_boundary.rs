use super::*;
use shared::error::{AppError, ErrorCode};

#[test]
fn test_empty_cart_rejected() {
    let fixture = create_fixture();
    assert_eq!(fixture.ledger.create(draft(vec![])), Err(LedgerError::OrderEmpty));

    // zero-quantity lines are dropped before the emptiness check
    let err = fixture
        .ledger
        .create(draft(vec![cart_item(1, "Fresh Tomatoes", 40, 0)]))
        .unwrap_err();
    assert_eq!(err, LedgerError::OrderEmpty);
    assert!(fixture.ledger.list().is_empty());
}

#[test]
fn test_zero_quantity_lines_dropped() {
    let fixture = create_fixture();
    let order = fixture
        .ledger
        .create(draft(vec![
            cart_item(1, "Fresh Tomatoes", 40, 0),
            cart_item(2, "Onions", 30, 3),
        ]))
        .unwrap();
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.total, 90);
    assert_eq!(fixture.catalog.by_id(1).unwrap().stock, 50);
}

#[test]
fn test_blank_customer_fields_rejected() {
    let fixture = create_fixture();
    let mut d = draft(vec![cart_item(1, "Fresh Tomatoes", 40, 1)]);
    d.customer_phone = "  ".to_string();
    let err = fixture.ledger.create(d).unwrap_err();
    assert_eq!(err, LedgerError::Validation { field: "customerPhone" });
    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    // nothing persisted, stock untouched
    assert!(fixture.ledger.list().is_empty());
    assert_eq!(fixture.catalog.by_id(1).unwrap().stock, 50);
}

#[test]
fn test_non_positive_price_rejected() {
    let fixture = create_fixture();
    for price in [-40, 0] {
        let err = fixture
            .ledger
            .create(draft(vec![
                cart_item(2, "Onions", 30, 1),
                cart_item(1, "Fresh Tomatoes", price, 2),
            ]))
            .unwrap_err();
        assert_eq!(err, LedgerError::Validation { field: "price" });
    }
    assert!(fixture.ledger.list().is_empty());
    assert_eq!(fixture.catalog.by_id(1).unwrap().stock, 50);
    assert_eq!(fixture.catalog.by_id(2).unwrap().stock, 30);
}

#[test]
fn test_total_overflow_rejected() {
    let fixture = create_fixture();
    let err = fixture
        .ledger
        .create(draft(vec![cart_item(1, "Fresh Tomatoes", i64::MAX, 2)]))
        .unwrap_err();
    assert_eq!(err, LedgerError::Validation { field: "total" });

    // each line fits, the sum does not
    let err = fixture
        .ledger
        .create(draft(vec![
            cart_item(1, "Fresh Tomatoes", i64::MAX / 2, 1),
            cart_item(2, "Onions", i64::MAX / 2, 1),
            cart_item(3, "Potatoes", 25, 1),
        ]))
        .unwrap_err();
    assert_eq!(err, LedgerError::Validation { field: "total" });
    assert_eq!(err.code(), ErrorCode::ValidationFailed);

    assert!(fixture.ledger.list().is_empty());
    assert_eq!(fixture.catalog.by_id(1).unwrap().stock, 50);
}

#[test]
fn test_stock_never_blocks_order() {
    let fixture = create_fixture();
    // Cheese has 10 in stock, product 999 does not exist
    let order = fixture
        .ledger
        .create(draft(vec![
            cart_item(14, "Cheese", 200, 25),
            cart_item(999, "Ghost Item", 10, 1),
        ]))
        .unwrap();
    assert_eq!(order.total, 5010);
    assert_eq!(fixture.catalog.by_id(14).unwrap().stock, 0);
}

#[test]
fn test_duplicate_order_id_rejected() {
    let fixture = create_fixture();
    let items = vec![cart_item(1, "Fresh Tomatoes", 40, 1)];
    fixture
        .ledger
        .create_with_id("ORD1".to_string(), draft(items.clone()))
        .unwrap();
    let err = fixture
        .ledger
        .create_with_id("ORD1".to_string(), draft(items))
        .unwrap_err();
    assert_eq!(err, LedgerError::DuplicateOrder("ORD1".to_string()));
    assert_eq!(fixture.ledger.list().len(), 1);
}

#[test]
fn test_unknown_order() {
    let fixture = create_fixture();
    let err = fixture.ledger.confirm("ORD-missing").unwrap_err();
    assert_eq!(err, LedgerError::OrderNotFound("ORD-missing".to_string()));
    assert_eq!(err.code(), ErrorCode::OrderNotFound);
}

#[test]
fn test_unknown_agent_leaves_order_unchanged() {
    let fixture = create_fixture();
    let order = place_order(&fixture);

    let err = fixture.ledger.assign(&order.order_id, 42).unwrap_err();
    assert_eq!(err, LedgerError::AgentNotFound(42));
    assert_eq!(fixture.ledger.get(&order.order_id), Some(order));
}

#[test]
fn test_invalid_transitions() {
    let fixture = create_fixture();
    let order = place_order(&fixture);
    let id = order.order_id.as_str();

    // pending cannot be delivered
    let err = fixture.ledger.deliver(id, None, None).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransition { .. }));

    fixture.ledger.confirm(id).unwrap();
    // confirm twice
    assert!(matches!(
        fixture.ledger.confirm(id),
        Err(LedgerError::InvalidTransition { from: OrderStatus::Confirmed, .. })
    ));

    fixture.ledger.assign(id, 1).unwrap();
    // out-for-delivery cannot be reassigned
    assert!(matches!(
        fixture.ledger.assign(id, 2),
        Err(LedgerError::InvalidTransition { .. })
    ));
    assert_eq!(fixture.ledger.get(id).unwrap().assigned_to_id, Some(1));
}

#[test]
fn test_delivered_is_terminal() {
    let fixture = create_fixture();
    let order = place_order(&fixture);
    let id = order.order_id.as_str();
    fixture.ledger.assign(id, 1).unwrap();
    let delivered = fixture.ledger.deliver(id, None, None).unwrap();

    for err in [
        fixture.ledger.confirm(id).unwrap_err(),
        fixture.ledger.assign(id, 2).unwrap_err(),
        fixture.ledger.quick_assign(id).unwrap_err(),
        fixture.ledger.deliver(id, None, None).unwrap_err(),
    ] {
        assert_eq!(err, LedgerError::AlreadyDelivered(id.to_string()));
    }
    assert_eq!(fixture.ledger.get(id), Some(delivered));
    assert_eq!(fixture.agents.by_id(1).unwrap().orders_delivered, 1);
}

#[test]
fn test_quick_assign_without_agents() {
    let fixture = create_fixture();
    let mut ids = Vec::new();
    for _ in 0..5 {
        let order = place_order(&fixture);
        fixture.ledger.quick_assign(&order.order_id).unwrap();
        ids.push(order.order_id);
    }

    let order = place_order(&fixture);
    let err = fixture.ledger.quick_assign(&order.order_id).unwrap_err();
    assert_eq!(err, LedgerError::NoAgentsAvailable);
    assert_eq!(fixture.ledger.get(&order.order_id).unwrap().status, OrderStatus::Pending);
}

#[test]
fn test_order_status_error_wins_over_agent_error() {
    let fixture = create_fixture();
    let order = place_order(&fixture);
    fixture.ledger.assign(&order.order_id, 1).unwrap();
    let err = fixture.ledger.assign(&order.order_id, 42).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransition { .. }));
}

#[test]
fn test_into_app_error() {
    let err: AppError = LedgerError::AgentNotFound(7).into();
    assert_eq!(err.code, ErrorCode::AgentNotFound);
    assert_eq!(err.details.unwrap()["agentId"], 7);

    let err: AppError = LedgerError::InvalidTransition {
        order_id: "ORD1".to_string(),
        from: OrderStatus::Pending,
        to: OrderStatus::Delivered,
    }
    .into();
    assert_eq!(err.code, ErrorCode::OrderInvalidTransition);
    assert_eq!(err.message, "Order ORD1 cannot move from pending to delivered");
}
