//! Pure decision logic for the order workflows.
//!
//! Nothing here touches the database. The workflow locks rows, hands their
//! snapshot to these functions, and applies whatever they decide.

use std::collections::HashMap;

use shopsmart_core::{Money, OrderStatus, ProductId};

use super::OrderError;
use crate::models::{OrderItem, OrderLineRequest, StockSnapshot};

/// A fully validated order, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlan {
    pub shipping_address: String,
    pub items: Vec<OrderItem>,
    pub total: Money,
}

impl OrderPlan {
    /// Units to take out of stock per product.
    #[must_use]
    pub fn stock_deductions(&self) -> Vec<(ProductId, i32)> {
        quantities_by_product(&self.items)
    }
}

/// Sum line quantities per product, in ascending product order.
///
/// Stock rows are always touched in this order so concurrent workflows
/// acquire row locks consistently.
#[must_use]
pub fn quantities_by_product(items: &[OrderItem]) -> Vec<(ProductId, i32)> {
    let mut totals: Vec<(ProductId, i32)> = Vec::new();
    for item in items {
        match totals.iter_mut().find(|(id, _)| *id == item.product_id) {
            Some((_, quantity)) => *quantity += item.quantity,
            None => totals.push((item.product_id, item.quantity)),
        }
    }
    totals.sort_by_key(|(id, _)| *id);
    totals
}

/// What a status change must do besides writing the new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    /// Put every line's quantity back into stock.
    RestoreStock,
    /// Only the status and `updatedAt` change.
    StatusOnly,
}

/// Parse a client-supplied status label.
///
/// # Errors
///
/// Returns `OrderError::InvalidStatus` for anything but the six exact labels.
pub fn parse_status(raw: &str) -> Result<OrderStatus, OrderError> {
    raw.parse::<OrderStatus>()
        .map_err(|_| OrderError::InvalidStatus(raw.to_owned()))
}

/// Validate an order request against locked catalog rows.
///
/// Checks run in a fixed order: shipping address, non-empty request,
/// quantities, then each line in turn for existence and stock. Repeated
/// lines for one product are checked against their running total.
///
/// # Errors
///
/// Returns the first `OrderError` encountered.
pub fn plan_order(
    shipping_address: Option<&str>,
    lines: &[OrderLineRequest],
    catalog: &[StockSnapshot],
) -> Result<OrderPlan, OrderError> {
    let shipping_address = shipping_address
        .map(str::trim)
        .filter(|a| !a.is_empty() && !a.eq_ignore_ascii_case("N/A"))
        .ok_or(OrderError::MissingShippingAddress)?;

    if lines.is_empty() {
        return Err(OrderError::EmptyOrder);
    }

    if let Some(bad) = lines.iter().find(|l| l.quantity < 1) {
        return Err(OrderError::InvalidQuantity {
            product_id: bad.product_id,
            quantity: bad.quantity,
        });
    }

    let by_id: HashMap<ProductId, &StockSnapshot> = catalog.iter().map(|p| (p.id, p)).collect();
    let mut requested_so_far: HashMap<ProductId, i32> = HashMap::new();
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        let product = by_id
            .get(&line.product_id)
            .ok_or(OrderError::ProductNotFound(line.product_id))?;

        let requested = requested_so_far.entry(product.id).or_insert(0);
        *requested = requested.saturating_add(line.quantity);
        if product.stock < *requested {
            return Err(OrderError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock - (*requested - line.quantity),
                requested: line.quantity,
            });
        }

        items.push(OrderItem {
            product_id: product.id,
            quantity: line.quantity,
            price: product.price,
            name: Some(product.name.clone()),
            image: None,
        });
    }

    let total = items
        .iter()
        .map(|item| item.price.times(item.quantity.unsigned_abs()))
        .sum::<Money>()
        .round_to_cents();

    Ok(OrderPlan {
        shipping_address: shipping_address.to_owned(),
        items,
        total,
    })
}

/// Decide whether `current -> requested` is allowed and what it entails.
///
/// # Errors
///
/// Returns `OrderError::IllegalTransitionFromCancelled` when `current` is
/// `Cancelled`, including a repeated cancellation.
pub fn plan_transition(
    current: OrderStatus,
    requested: OrderStatus,
) -> Result<TransitionEffect, OrderError> {
    if current.is_terminal() {
        return Err(OrderError::IllegalTransitionFromCancelled);
    }
    Ok(match requested {
        OrderStatus::Cancelled => TransitionEffect::RestoreStock,
        _ => TransitionEffect::StatusOnly,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::*;

    fn money(s: &str) -> Money {
        Money::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    fn product(id: i32, name: &str, price: &str, stock: i32) -> StockSnapshot {
        StockSnapshot {
            id: ProductId::new(id),
            name: name.to_string(),
            price: money(price),
            stock,
        }
    }

    fn line(id: i32, quantity: i32) -> OrderLineRequest {
        OrderLineRequest {
            product_id: ProductId::new(id),
            quantity,
        }
    }

    #[test]
    fn test_plan_computes_total_and_captures_price() {
        let catalog = [product(1, "Lamp", "10.00", 5), product(2, "Mug", "2.50", 10)];
        let plan = plan_order(Some("1 Main St"), &[line(1, 3), line(2, 2)], &catalog).unwrap();

        assert_eq!(plan.total, money("35.00"));
        assert_eq!(plan.shipping_address, "1 Main St");
        assert_eq!(plan.items.len(), 2);
        assert_eq!(plan.items[0].price, money("10.00"));
        assert_eq!(plan.items[1].quantity, 2);
    }

    #[test]
    fn test_plan_rounds_total_half_away_from_zero() {
        let catalog = [product(1, "Gum", "0.125", 10)];
        let plan = plan_order(Some("addr"), &[line(1, 1)], &catalog).unwrap();
        assert_eq!(plan.total, money("0.13"));
    }

    #[test]
    fn test_missing_address_is_checked_first() {
        for address in [None, Some(""), Some("  "), Some("N/A")] {
            let err = plan_order(address, &[], &[]).unwrap_err();
            assert!(matches!(err, OrderError::MissingShippingAddress));
        }
    }

    #[test]
    fn test_empty_order() {
        let err = plan_order(Some("addr"), &[], &[]).unwrap_err();
        assert!(matches!(err, OrderError::EmptyOrder));
    }

    #[test]
    fn test_invalid_quantity_before_lookup() {
        let err = plan_order(Some("addr"), &[line(99, 0)], &[]).unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidQuantity { quantity: 0, .. }
        ));
    }

    #[test]
    fn test_unknown_product() {
        let catalog = [product(1, "Lamp", "10.00", 5)];
        let err = plan_order(Some("addr"), &[line(1, 1), line(7, 1)], &catalog).unwrap_err();
        assert!(matches!(err, OrderError::ProductNotFound(id) if id == ProductId::new(7)));
    }

    #[test]
    fn test_insufficient_stock_reports_available_and_requested() {
        let catalog = [product(1, "Lamp", "10.00", 2)];
        let err = plan_order(Some("addr"), &[line(1, 3)], &catalog).unwrap_err();
        match err {
            OrderError::InsufficientStock {
                product,
                available,
                requested,
            } => {
                assert_eq!(product, "Lamp");
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_repeated_lines_use_running_total() {
        let catalog = [product(1, "Lamp", "10.00", 5)];
        let err = plan_order(Some("addr"), &[line(1, 3), line(1, 3)], &catalog).unwrap_err();
        assert!(matches!(
            err,
            OrderError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            }
        ));

        let plan = plan_order(Some("addr"), &[line(1, 3), line(1, 2)], &catalog).unwrap();
        assert_eq!(plan.stock_deductions(), vec![(ProductId::new(1), 5)]);
    }

    #[test]
    fn test_quantities_by_product_merge_and_sort() {
        let items: Vec<OrderItem> = [(3, 1), (1, 2), (3, 4)]
            .into_iter()
            .map(|(id, quantity)| OrderItem {
                product_id: ProductId::new(id),
                quantity,
                price: money("1.00"),
                name: None,
                image: None,
            })
            .collect();
        assert_eq!(
            quantities_by_product(&items),
            vec![(ProductId::new(1), 2), (ProductId::new(3), 5)]
        );
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("Shipped").unwrap(), OrderStatus::Shipped);
        assert!(matches!(
            parse_status("Lost"),
            Err(OrderError::InvalidStatus(s)) if s == "Lost"
        ));
    }

    #[test]
    fn test_transition_into_cancelled_restores_stock() {
        for from in OrderStatus::ALL.into_iter().filter(|s| !s.is_terminal()) {
            assert_eq!(
                plan_transition(from, OrderStatus::Cancelled).unwrap(),
                TransitionEffect::RestoreStock
            );
        }
    }

    #[test]
    fn test_other_transitions_only_change_status() {
        assert_eq!(
            plan_transition(OrderStatus::Pending, OrderStatus::Delivered).unwrap(),
            TransitionEffect::StatusOnly
        );
        assert_eq!(
            plan_transition(OrderStatus::Shipped, OrderStatus::Pending).unwrap(),
            TransitionEffect::StatusOnly
        );
    }

    #[test]
    fn test_cancelled_is_terminal() {
        for to in OrderStatus::ALL {
            assert!(matches!(
                plan_transition(OrderStatus::Cancelled, to),
                Err(OrderError::IllegalTransitionFromCancelled)
            ));
        }
    }

    fn catalog_strategy() -> impl Strategy<Value = Vec<StockSnapshot>> {
        prop::collection::vec((0_i32..20, 0_i64..10_000), 1..6).prop_map(|rows| {
            rows.into_iter()
                .zip(1..)
                .map(|((stock, cents), id)| StockSnapshot {
                    id: ProductId::new(id),
                    name: format!("product-{id}"),
                    price: Money::from_cents(cents).unwrap(),
                    stock,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_accepted_plans_never_oversell(
            catalog in catalog_strategy(),
            raw_lines in prop::collection::vec((1_i32..7, 1_i32..8), 1..8),
        ) {
            let lines: Vec<_> = raw_lines.iter().map(|&(id, q)| line(id, q)).collect();
            if let Ok(plan) = plan_order(Some("addr"), &lines, &catalog) {
                for (id, deducted) in plan.stock_deductions() {
                    let stock = catalog.iter().find(|p| p.id == id).unwrap().stock;
                    prop_assert!(stock - deducted >= 0);
                }
                let requested: i32 = lines.iter().map(|l| l.quantity).sum();
                let deducted: i32 = plan.stock_deductions().iter().map(|(_, q)| q).sum();
                prop_assert_eq!(requested, deducted);
            }
        }

        #[test]
        fn prop_total_is_sum_of_price_times_quantity(
            catalog in catalog_strategy(),
            raw_lines in prop::collection::vec((1_i32..7, 1_i32..8), 1..8),
        ) {
            let lines: Vec<_> = raw_lines.iter().map(|&(id, q)| line(id, q)).collect();
            if let Ok(plan) = plan_order(Some("addr"), &lines, &catalog) {
                let expected: Decimal = plan
                    .items
                    .iter()
                    .map(|i| i.price.amount() * Decimal::from(i.quantity))
                    .sum();
                prop_assert_eq!(plan.total.amount(), expected.round_dp(2));
            }
        }

        #[test]
        fn prop_rejection_reasons_match_catalog(
            catalog in catalog_strategy(),
            raw_lines in prop::collection::vec((1_i32..7, 1_i32..8), 1..8),
        ) {
            let lines: Vec<_> = raw_lines.iter().map(|&(id, q)| line(id, q)).collect();
            match plan_order(Some("addr"), &lines, &catalog) {
                Ok(_) => {}
                Err(OrderError::ProductNotFound(id)) => {
                    prop_assert!(catalog.iter().all(|p| p.id != id));
                }
                Err(OrderError::InsufficientStock { available, requested, .. }) => {
                    prop_assert!(available < requested);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
            }
        }
    }
}
