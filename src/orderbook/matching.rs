//! Contains the core matching logic for the order book.

use super::book::OrderBook;
use super::trade::TradeEvent;
use crate::utils::current_time_millis;
use tracing::trace;

impl OrderBook {
    /// Crosses the best buy against the best sell until the book no longer crosses.
    ///
    /// Holds the book's matching lock for the whole pass, so trades of one instrument
    /// are produced by one thread at a time and reported in execution order. Every
    /// iteration exhausts at least one head, which bounds the pass by the number of
    /// resting orders. Returns the number of trades executed by this pass.
    ///
    /// # Panics
    /// Panics if a head with no remaining quantity is found, since that means an
    /// exhausted record was left linked.
    pub fn match_orders(&self) -> usize {
        let _guard = self.lock_matching();
        let mut trades = 0;

        loop {
            let Some(buy_head) = self.buy.head() else {
                break;
            };
            let Some(sell_head) = self.sell.head() else {
                break;
            };

            let buy = buy_head.value();
            let sell = sell_head.value();
            if buy.price() < sell.price() {
                break;
            }

            let quantity = buy.remaining().min(sell.remaining());
            assert!(
                quantity > 0,
                "order book {}: exhausted order left at the head ({} / {})",
                self.instrument,
                buy,
                sell
            );

            let price = self.price_policy.execution_price(buy, sell);
            buy.fill(quantity);
            sell.fill(quantity);

            let event = TradeEvent {
                trade_id: self.next_trade_id(),
                instrument: self.instrument,
                price,
                quantity,
                buy_order_id: buy.id(),
                sell_order_id: sell.id(),
                timestamp: current_time_millis(),
            };
            trace!(
                "Order book {}: matched {} at {} (buy {}, sell {})",
                self.instrument, quantity, price, event.buy_order_id, event.sell_order_id
            );
            self.publish_trade(&event);
            trades += 1;

            if let Some(filled) = self.buy.pop_if_head_exhausted(&buy_head) {
                self.order_locations.remove(&filled.id());
            }
            if let Some(filled) = self.sell.pop_if_head_exhausted(&sell_head) {
                self.order_locations.remove(&filled.id());
            }
        }

        if trades > 0 {
            trace!(
                "Order book {}: matching pass produced {} trades",
                self.instrument, trades
            );
        }
        trades
    }
}
