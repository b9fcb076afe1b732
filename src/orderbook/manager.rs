/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Centralized trade event routing.
//!
//! A router owns one channel and hands out [`TradeListener`]s that forward every trade
//! into it, so the books of a whole registry can feed a single consumer. The std
//! flavour drains the channel on a dedicated thread, the tokio flavour on a task.

use super::error::OrderBookError;
use super::trade::{TradeEvent, TradeListener};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use tokio::sync::mpsc as tokio_mpsc;
use tracing::{error, info};

/// Routes trade events through a std `mpsc` channel.
pub struct TradeRouterStd {
    /// Sender for trade events
    trade_sender: mpsc::Sender<TradeEvent>,
    /// Receiver for trade events (taken when the processor starts)
    trade_receiver: Option<mpsc::Receiver<TradeEvent>>,
}

impl TradeRouterStd {
    /// Create a new router with its own trade event channel.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();

        Self {
            trade_sender: sender,
            trade_receiver: Some(receiver),
        }
    }

    /// A listener forwarding every trade into this router's channel.
    pub fn listener(&self) -> TradeListener {
        let sender = self.trade_sender.clone();

        Arc::new(move |event: &TradeEvent| {
            if let Err(e) = sender.send(event.clone()) {
                error!(
                    "Failed to route trade {} of instrument {}: {}",
                    event.trade_id, event.instrument, e
                );
            }
        })
    }

    /// Take the receiving end to consume trades yourself.
    pub fn take_receiver(&mut self) -> Option<mpsc::Receiver<TradeEvent>> {
        self.trade_receiver.take()
    }

    /// Start the trade event processor in a separate thread.
    ///
    /// The thread logs every trade and stops once all listeners and the router are
    /// dropped. Fails if the receiver was already taken.
    pub fn start_trade_processor(&mut self) -> Result<thread::JoinHandle<u64>, OrderBookError> {
        let receiver = self
            .trade_receiver
            .take()
            .ok_or_else(|| OrderBookError::InvalidOperation {
                message: "trade processor already started".to_string(),
            })?;

        Ok(thread::spawn(move || {
            info!("Trade processor started");

            let mut processed = 0;
            while let Ok(trade_event) = receiver.recv() {
                process_trade_event(&trade_event);
                processed += 1;
            }

            info!("Trade processor stopped after {} trades", processed);
            processed
        }))
    }
}

impl Default for TradeRouterStd {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes trade events through a tokio unbounded channel.
///
/// Sending never blocks, so the listener is safe to call from the synchronous
/// matching pass.
pub struct TradeRouterTokio {
    trade_sender: tokio_mpsc::UnboundedSender<TradeEvent>,
    trade_receiver: Option<tokio_mpsc::UnboundedReceiver<TradeEvent>>,
}

impl TradeRouterTokio {
    /// Create a new router with its own trade event channel.
    pub fn new() -> Self {
        let (sender, receiver) = tokio_mpsc::unbounded_channel();

        Self {
            trade_sender: sender,
            trade_receiver: Some(receiver),
        }
    }

    /// A listener forwarding every trade into this router's channel.
    pub fn listener(&self) -> TradeListener {
        let sender = self.trade_sender.clone();

        Arc::new(move |event: &TradeEvent| {
            if let Err(e) = sender.send(event.clone()) {
                error!(
                    "Failed to route trade {} of instrument {}: {}",
                    event.trade_id, event.instrument, e
                );
            }
        })
    }

    /// Take the receiving end to consume trades yourself.
    pub fn take_receiver(&mut self) -> Option<tokio_mpsc::UnboundedReceiver<TradeEvent>> {
        self.trade_receiver.take()
    }

    /// Spawn the trade event processor on the given runtime.
    pub fn start_trade_processor(
        &mut self,
        runtime: &tokio::runtime::Handle,
    ) -> Result<tokio::task::JoinHandle<u64>, OrderBookError> {
        let mut receiver =
            self.trade_receiver
                .take()
                .ok_or_else(|| OrderBookError::InvalidOperation {
                    message: "trade processor already started".to_string(),
                })?;

        Ok(runtime.spawn(async move {
            info!("Async trade processor started");

            let mut processed = 0;
            while let Some(trade_event) = receiver.recv().await {
                process_trade_event(&trade_event);
                processed += 1;
            }

            info!("Async trade processor stopped after {} trades", processed);
            processed
        }))
    }
}

impl Default for TradeRouterTokio {
    fn default() -> Self {
        Self::new()
    }
}

/// Process a single trade event.
fn process_trade_event(event: &TradeEvent) {
    info!(
        "Trade {} on instrument {}: {} units at price {} (buy {}, sell {})",
        event.trade_id,
        event.instrument,
        event.quantity,
        event.price,
        event.buy_order_id,
        event.sell_order_id
    );
}
