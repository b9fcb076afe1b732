use crate::helpers::{assert_book_invariants, collecting_registry};
use matchbook_rs::prelude::*;

#[test]
fn test_partial_fill_keeps_buy_remainder() {
    let (registry, trades) = collecting_registry(8, TradePricePolicy::SellSide);

    let buy = registry
        .submit(Side::Buy, 0, 50, 100, OrderId::from_u64(1))
        .unwrap();
    registry
        .submit(Side::Sell, 0, 30, 100, OrderId::from_u64(2))
        .unwrap();

    let trades = trades.lock().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].instrument, 0);
    assert_eq!(trades[0].price, 100);
    assert_eq!(trades[0].quantity, 30);
    assert_eq!(trades[0].buy_order_id, OrderId::from_u64(1));
    assert_eq!(trades[0].sell_order_id, OrderId::from_u64(2));

    let book = registry.book(0).unwrap();
    let buys = book.buy_orders(10);
    assert_eq!(buys.len(), 1);
    assert_eq!(buys[0].remaining(), 20);
    assert_eq!(buys[0].price(), 100);
    assert_eq!(buy.remaining(), 20);
    assert!(book.sell_orders(10).is_empty());
    assert_book_invariants(book);
}

#[test]
fn test_equal_orders_empty_both_books() {
    let (registry, trades) = collecting_registry(8, TradePricePolicy::SellSide);

    registry
        .submit(Side::Buy, 1, 40, 150, OrderId::from_u64(1))
        .unwrap();
    registry
        .submit(Side::Sell, 1, 40, 150, OrderId::from_u64(2))
        .unwrap();

    let trades = trades.lock().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!((trades[0].price, trades[0].quantity), (150, 40));

    let book = registry.book(1).unwrap();
    assert_eq!(book.resting_order_count(), 0);
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.best_ask(), None);
}

#[test]
fn test_cross_trades_at_resting_sell_price() {
    let (registry, trades) = collecting_registry(8, TradePricePolicy::SellSide);

    registry
        .submit(Side::Sell, 2, 10, 90, OrderId::from_u64(1))
        .unwrap();
    registry
        .submit(Side::Buy, 2, 10, 100, OrderId::from_u64(2))
        .unwrap();

    let trades = trades.lock().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!((trades[0].price, trades[0].quantity), (90, 10));
    assert_eq!(registry.book(2).unwrap().resting_order_count(), 0);
}

#[test]
fn test_resting_policy_matches_same_scenario() {
    let (registry, trades) = collecting_registry(8, TradePricePolicy::Resting);

    registry
        .submit(Side::Sell, 2, 10, 90, OrderId::from_u64(1))
        .unwrap();
    registry
        .submit(Side::Buy, 2, 10, 100, OrderId::from_u64(2))
        .unwrap();

    assert_eq!(trades.lock().unwrap()[0].price, 90);
}

#[test]
fn test_invalid_submissions_leave_book_unchanged() {
    let (registry, trades) = collecting_registry(MAX_INSTRUMENTS, TradePricePolicy::SellSide);
    registry
        .submit(Side::Sell, 0, 10, 100, OrderId::from_u64(1))
        .unwrap();
    let before = registry.snapshot(0, usize::MAX).unwrap();

    let zero_quantity = registry.submit(Side::Buy, 0, 0, 100, OrderId::from_u64(2));
    assert!(matches!(zero_quantity, Err(OrderBookError::InvalidOrder { .. })));

    let bad_instrument =
        registry.submit(Side::Buy, MAX_INSTRUMENTS, 10, 100, OrderId::from_u64(3));
    assert!(matches!(bad_instrument, Err(OrderBookError::InvalidOrder { .. })));

    let after = registry.snapshot(0, usize::MAX).unwrap();
    assert_eq!(before.buys, after.buys);
    assert_eq!(before.sells, after.sells);
    assert!(trades.lock().unwrap().is_empty());
    assert_eq!(registry.total_resting_orders(), 1);
}

#[test]
fn test_reference_simulation_sequence() {
    let (registry, trades) = collecting_registry(MAX_INSTRUMENTS, TradePricePolicy::SellSide);
    let orders = [
        (Side::Buy, 0, 50, 100),
        (Side::Sell, 0, 30, 100),
        (Side::Buy, 1, 40, 150),
        (Side::Sell, 1, 40, 150),
        (Side::Buy, 2, 25, 200),
        (Side::Sell, 2, 25, 200),
        (Side::Buy, 3, 100, 250),
        (Side::Sell, 3, 100, 250),
        (Side::Buy, 4, 60, 300),
        (Side::Sell, 4, 60, 300),
    ];

    for (id, (side, instrument, quantity, price)) in orders.into_iter().enumerate() {
        registry
            .submit(side, instrument, quantity, price, OrderId::from_u64(id as u64))
            .unwrap();
    }

    let executed: Vec<(usize, u64, u64)> = trades
        .lock()
        .unwrap()
        .iter()
        .map(|t| (t.instrument, t.quantity, t.price))
        .collect();
    assert_eq!(
        executed,
        vec![
            (0, 30, 100),
            (1, 40, 150),
            (2, 25, 200),
            (3, 100, 250),
            (4, 60, 300)
        ]
    );
    assert_eq!(registry.total_resting_orders(), 1);
}

#[test]
fn test_zero_price_buy_rests_and_crosses_zero_sell() {
    let (registry, trades) = collecting_registry(1, TradePricePolicy::SellSide);

    let buy = registry
        .submit(Side::Buy, 0, 10, 0, OrderId::from_u64(1))
        .unwrap();
    registry
        .submit(Side::Sell, 0, 4, 1, OrderId::from_u64(2))
        .unwrap();

    let book = registry.book(0).unwrap();
    assert!(trades.lock().unwrap().is_empty());
    assert_eq!(book.best_bid(), Some(0));
    assert_eq!(book.best_ask(), Some(1));
    assert_eq!(book.spread(), Some(1));

    registry
        .submit(Side::Sell, 0, 6, 0, OrderId::from_u64(3))
        .unwrap();

    let trades = trades.lock().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!((trades[0].price, trades[0].quantity), (0, 6));
    assert_eq!(trades[0].buy_order_id, OrderId::from_u64(1));
    assert_eq!(buy.remaining(), 4);
    assert_eq!(book.best_bid(), Some(0));
    assert_eq!(book.best_ask(), Some(1));
    assert_book_invariants(book);
}

#[test]
fn test_extreme_prices_keep_priority() {
    let (registry, trades) = collecting_registry(1, TradePricePolicy::SellSide);

    registry
        .submit(Side::Buy, 0, u64::MAX, 0, OrderId::from_u64(1))
        .unwrap();
    registry
        .submit(Side::Buy, 0, 1, u64::MAX, OrderId::from_u64(2))
        .unwrap();
    registry
        .submit(Side::Sell, 0, u64::MAX, u64::MAX, OrderId::from_u64(3))
        .unwrap();

    let book = registry.book(0).unwrap();
    let buy_prices: Vec<u64> = book.buy_orders(10).iter().map(|o| o.price()).collect();
    assert_eq!(buy_prices, vec![0]);
    assert_eq!(book.sell_orders(10)[0].remaining(), u64::MAX - 1);

    registry
        .submit(Side::Sell, 0, u64::MAX, 0, OrderId::from_u64(4))
        .unwrap();

    let executed: Vec<(u64, u64)> = trades
        .lock()
        .unwrap()
        .iter()
        .map(|t| (t.price, t.quantity))
        .collect();
    assert_eq!(executed, vec![(u64::MAX, 1), (0, u64::MAX)]);
    assert_eq!(book.buy_orders(10).len(), 0);
    assert_eq!(book.best_ask(), Some(u64::MAX));
    assert_eq!(book.traded_volume(), u64::MAX);
    assert_book_invariants(book);
}

#[test]
fn test_price_priority_beats_arrival() {
    let (registry, trades) = collecting_registry(1, TradePricePolicy::SellSide);

    registry
        .submit(Side::Buy, 0, 10, 100, OrderId::from_u64(1))
        .unwrap();
    registry
        .submit(Side::Buy, 0, 10, 102, OrderId::from_u64(2))
        .unwrap();
    registry
        .submit(Side::Buy, 0, 10, 101, OrderId::from_u64(3))
        .unwrap();
    registry
        .submit(Side::Sell, 0, 25, 100, OrderId::from_u64(4))
        .unwrap();

    let buyers: Vec<OrderId> = trades
        .lock()
        .unwrap()
        .iter()
        .map(|t| t.buy_order_id)
        .collect();
    assert_eq!(
        buyers,
        vec![
            OrderId::from_u64(2),
            OrderId::from_u64(3),
            OrderId::from_u64(1)
        ]
    );

    let book = registry.book(0).unwrap();
    assert_eq!(book.buy_orders(10)[0].remaining(), 5);
    assert_book_invariants(book);
}

#[test]
fn test_cancel_then_match_skips_cancelled_order() {
    let (registry, trades) = collecting_registry(1, TradePricePolicy::SellSide);

    registry
        .submit(Side::Sell, 0, 10, 100, OrderId::from_u64(1))
        .unwrap();
    registry
        .submit(Side::Sell, 0, 10, 100, OrderId::from_u64(2))
        .unwrap();
    let cancelled = registry.cancel(0, OrderId::from_u64(1)).unwrap();
    assert_eq!(cancelled.remaining(), 10);

    registry
        .submit(Side::Buy, 0, 10, 100, OrderId::from_u64(3))
        .unwrap();

    let trades = trades.lock().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].sell_order_id, OrderId::from_u64(2));
}

#[test]
fn test_snapshot_package_of_live_book() {
    let (registry, _) = collecting_registry(1, TradePricePolicy::SellSide);
    registry
        .submit(Side::Buy, 0, 10, 99, OrderId::from_u64(1))
        .unwrap();
    registry
        .submit(Side::Sell, 0, 10, 101, OrderId::from_u64(2))
        .unwrap();

    let book = registry.book(0).unwrap();
    let json = book.snapshot_to_json(10).unwrap();
    let snapshot = OrderBookSnapshotPackage::from_json(&json)
        .unwrap()
        .into_snapshot()
        .unwrap();

    assert_eq!(snapshot.best_bid(), Some((99, 10)));
    assert_eq!(snapshot.best_ask(), Some((101, 10)));
    assert!(!snapshot.is_crossed());
}
