//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Listener traits and the fan-out dispatcher.
//!
//! A listener implements only the callbacks it cares about; every method has
//! a no-op default. Callbacks return `anyhow::Result<()>`: an `Err` from one
//! listener is routed to that listener's `on_error` and never prevents the
//! remaining listeners from receiving the same event.

use std::sync::Arc;

use anyhow::Result;

use armordex_types::market::{
    InstrumentData, MarketMessage, OrderBook, Quotes, SessionState, SpotData, Trade,
};
use armordex_types::user::{
    AccountState, AllOrdersCancelled, CancelAllOrdersFailed, InternalTransferExecuted,
    InternalTransferReceived, InternalTransferRejected, OpenPosition,
    OpenPositionForcefullyClosed, OrderCancelFailed, OrderCancelled, OrderFilled,
    OrderForcefullyCancelled, OrderModificationFailed, OrderModified, OrderPlaceFailed,
    OrderPlaced, TimerAdded, TimerCancelFailed, TimerCancelled, TimerExpired, TimerRejected,
    TimerTriggered, TimerUpdateFailed, TimerUpdated, UserMessage,
};

/// Receiver of public market data events.
#[allow(unused_variables)]
pub trait MarketListener: Send + Sync {
    /// Called when the market stream transport is open.
    fn on_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Called on every dispatched message, before the typed callback.
    fn on_message(&self, message: &MarketMessage) -> Result<()> {
        Ok(())
    }

    fn on_order_book(&self, order_book: &OrderBook) -> Result<()> {
        Ok(())
    }

    fn on_trade(&self, trade: &Trade) -> Result<()> {
        Ok(())
    }

    fn on_quotes(&self, quotes: &Quotes) -> Result<()> {
        Ok(())
    }

    fn on_session_state(&self, session_state: &SessionState) -> Result<()> {
        Ok(())
    }

    fn on_instrument_data(&self, instrument_data: &InstrumentData) -> Result<()> {
        Ok(())
    }

    fn on_spot_data(&self, spot_data: &SpotData) -> Result<()> {
        Ok(())
    }

    /// Called on parsing or verification failures and unclean closes. A
    /// serious problem which should be investigated (cf.
    /// [`on_disconnect`](MarketListener::on_disconnect)).
    fn on_error(&self, error: &anyhow::Error) {}

    /// Called when the stream disconnects cleanly; the client should
    /// reconnect.
    fn on_disconnect(&self, reason: &str) {}
}

/// Receiver of private account events on the user stream.
///
/// Immediately after `on_ready` the exchange sends a welcome pack:
/// `order_placed` for every pending order, `open_position` for every open
/// position and an initial `account_state`.
#[allow(unused_variables)]
pub trait UserListener: Send + Sync {
    /// Called when the handshake completes and commands may be sent.
    fn on_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Called on every dispatched entity, before the typed callback.
    fn on_message(&self, message: &UserMessage) -> Result<()> {
        Ok(())
    }

    fn on_account_state(&self, account_state: &AccountState) -> Result<()> {
        Ok(())
    }

    fn on_open_position(&self, open_position: &OpenPosition) -> Result<()> {
        Ok(())
    }

    fn on_open_position_forcefully_closed(
        &self,
        open_position_forcefully_closed: &OpenPositionForcefullyClosed,
    ) -> Result<()> {
        Ok(())
    }

    fn on_order_placed(&self, order_placed: &OrderPlaced) -> Result<()> {
        Ok(())
    }

    fn on_order_place_failed(&self, order_place_failed: &OrderPlaceFailed) -> Result<()> {
        Ok(())
    }

    fn on_order_cancelled(&self, order_cancelled: &OrderCancelled) -> Result<()> {
        Ok(())
    }

    fn on_order_forcefully_cancelled(
        &self,
        order_forcefully_cancelled: &OrderForcefullyCancelled,
    ) -> Result<()> {
        Ok(())
    }

    fn on_order_cancel_failed(&self, order_cancel_failed: &OrderCancelFailed) -> Result<()> {
        Ok(())
    }

    fn on_all_orders_cancelled(&self, all_orders_cancelled: &AllOrdersCancelled) -> Result<()> {
        Ok(())
    }

    fn on_cancel_all_orders_failed(
        &self,
        cancel_all_orders_failed: &CancelAllOrdersFailed,
    ) -> Result<()> {
        Ok(())
    }

    fn on_order_modified(&self, order_modified: &OrderModified) -> Result<()> {
        Ok(())
    }

    fn on_order_modification_failed(
        &self,
        order_modification_failed: &OrderModificationFailed,
    ) -> Result<()> {
        Ok(())
    }

    fn on_order_filled(&self, order_filled: &OrderFilled) -> Result<()> {
        Ok(())
    }

    fn on_timer_added(&self, timer_added: &TimerAdded) -> Result<()> {
        Ok(())
    }

    fn on_timer_rejected(&self, timer_rejected: &TimerRejected) -> Result<()> {
        Ok(())
    }

    fn on_timer_expired(&self, timer_expired: &TimerExpired) -> Result<()> {
        Ok(())
    }

    fn on_timer_triggered(&self, timer_triggered: &TimerTriggered) -> Result<()> {
        Ok(())
    }

    fn on_timer_updated(&self, timer_updated: &TimerUpdated) -> Result<()> {
        Ok(())
    }

    fn on_timer_update_failed(&self, timer_update_failed: &TimerUpdateFailed) -> Result<()> {
        Ok(())
    }

    fn on_timer_cancelled(&self, timer_cancelled: &TimerCancelled) -> Result<()> {
        Ok(())
    }

    fn on_timer_cancel_failed(&self, timer_cancel_failed: &TimerCancelFailed) -> Result<()> {
        Ok(())
    }

    fn on_internal_transfer_received(
        &self,
        internal_transfer_received: &InternalTransferReceived,
    ) -> Result<()> {
        Ok(())
    }

    fn on_internal_transfer_executed(
        &self,
        internal_transfer_executed: &InternalTransferExecuted,
    ) -> Result<()> {
        Ok(())
    }

    fn on_internal_transfer_rejected(
        &self,
        internal_transfer_rejected: &InternalTransferRejected,
    ) -> Result<()> {
        Ok(())
    }

    /// Called on parsing, decryption or verification failures and unclean
    /// closes. A serious problem which should be investigated (cf.
    /// [`on_disconnect`](UserListener::on_disconnect)).
    fn on_error(&self, error: &anyhow::Error) {}

    /// Called when the stream disconnects cleanly; the client should
    /// reconnect and re-handshake.
    fn on_disconnect(&self, reason: &str) {}
}

/// Ordered set of listeners with identity-based removal.
///
/// Fan-out iterates in insertion order; `remove` drops the first entry that
/// is the same allocation as the argument.
pub struct ListenerSet<L: ?Sized> {
    listeners: Vec<Arc<L>>,
}

impl<L: ?Sized> Default for ListenerSet<L> {
    fn default() -> Self {
        ListenerSet { listeners: Vec::new() }
    }
}

impl<L: ?Sized> ListenerSet<L> {
    pub fn add(&mut self, listener: Arc<L>) {
        self.listeners.push(listener);
    }

    pub fn remove(&mut self, listener: &Arc<L>) {
        if let Some(position) = self
            .listeners
            .iter()
            .position(|existing| Arc::ptr_eq(existing, listener))
        {
            self.listeners.remove(position);
        }
    }

    /// Invoke `callback` on every listener in order; an `Err` is handed to
    /// `on_error` for that listener only.
    pub fn dispatch(
        &self,
        callback: impl Fn(&L) -> Result<()>,
        on_error: impl Fn(&L, &anyhow::Error),
    ) {
        for listener in &self.listeners {
            if let Err(error) = callback(listener) {
                on_error(listener, &error);
            }
        }
    }

    /// Invoke an infallible callback on every listener in order.
    pub fn notify(&self, callback: impl Fn(&L)) {
        for listener in &self.listeners {
            callback(listener);
        }
    }
}
