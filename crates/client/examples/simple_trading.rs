//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Minimal two-stream strategy.
//!
//! Picks the first futures instrument from `instrument_data`, sells into the
//! best bid whenever it trades above a threshold, and panic-closes every open
//! position with one batch when the account balance drops too low. Expects
//! `armordex-public-key.asc` and `trader-private-key.asc` in the working
//! directory.

use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing::{error, info};

use armordex_client::{StreamDriver, StreamHandle};
use armordex_core::{
    ExchangeDescriptor, MarketListener, MarketStream, TraderIdentity, UserListener, UserStream,
};
use armordex_types::market::{InstrumentData, InstrumentKind, OrderBook};
use armordex_types::prelude::*;
use armordex_types::user::{AccountState, OpenPosition, PositionSide};

const SELL_THRESHOLD: f64 = 0.001;
const BALANCE_THRESHOLD: f64 = 3.1415927;

fn next_client_order_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(1)
}

struct SimpleMarketListener {
    user: StreamHandle<UserStream>,
    selected_futures: Mutex<Option<String>>,
}

impl MarketListener for SimpleMarketListener {
    fn on_instrument_data(&self, instrument_data: &InstrumentData) -> Result<()> {
        let futures = instrument_data
            .data
            .values()
            .find(|instrument| instrument.kind == InstrumentKind::Futures);
        if let Some(instrument) = futures {
            info!(instrument_id = %instrument.instrument_id, symbol = %instrument.symbol, "trading futures");
            *self.selected_futures.lock().expect("lock") = Some(instrument.instrument_id.clone());
        }
        Ok(())
    }

    fn on_order_book(&self, order_book: &OrderBook) -> Result<()> {
        let selected = self.selected_futures.lock().expect("lock").clone();
        if selected.as_deref() != Some(order_book.instrument_id.as_str()) {
            return Ok(());
        }
        let Some(best_bid) = order_book.bids.first() else {
            return Ok(());
        };
        if best_bid.price().parse::<f64>().unwrap_or(0.0) <= SELL_THRESHOLD {
            return Ok(());
        }
        let order = PlaceOrder {
            client_order_id: next_client_order_id(),
            instrument_id: order_book.instrument_id.clone(),
            order_type: "limit".to_owned(),
            limit_price: best_bid.price().to_owned(),
            side: "sell".to_owned(),
            quantity: 1000,
            post_only: None,
        };
        self.user.with(move |stream| {
            if let Err(error) = stream.place_order(order) {
                error!(%error, "order placement failed");
            }
        })
    }
}

struct SimpleUserListener {
    user: StreamHandle<UserStream>,
    open_positions: Mutex<HashMap<String, OpenPosition>>,
}

impl UserListener for SimpleUserListener {
    fn on_ready(&self) -> Result<()> {
        info!("user stream ready");
        Ok(())
    }

    fn on_open_position(&self, open_position: &OpenPosition) -> Result<()> {
        self.open_positions
            .lock()
            .expect("lock")
            .insert(open_position.instrument_id.clone(), open_position.clone());
        Ok(())
    }

    fn on_account_state(&self, account_state: &AccountState) -> Result<()> {
        let balance = account_state.balance.parse::<f64>().unwrap_or(0.0);
        if balance >= BALANCE_THRESHOLD {
            return Ok(());
        }
        // Close everything with one atomic batch.
        let orders: Vec<OrderCommand> = self
            .open_positions
            .lock()
            .expect("lock")
            .values()
            .map(|position| {
                let (side, limit_price) = match position.side {
                    PositionSide::Short => ("buy", "100000"),
                    PositionSide::Long => ("sell", "0.00000001"),
                };
                OrderCommand::PlaceOrder(PlaceOrder {
                    client_order_id: next_client_order_id(),
                    instrument_id: position.instrument_id.clone(),
                    order_type: "limit".to_owned(),
                    limit_price: limit_price.to_owned(),
                    side: side.to_owned(),
                    quantity: position.quantity,
                    post_only: None,
                })
            })
            .collect();
        if orders.is_empty() {
            return Ok(());
        }
        info!(balance, "balance below threshold, closing all positions");
        self.user.with(move |stream| {
            if let Err(error) = stream.batch(orders) {
                error!(%error, "panic batch failed");
            }
        })
    }

    fn on_error(&self, error: &anyhow::Error) {
        error!(%error, "user stream error");
    }

    fn on_disconnect(&self, reason: &str) {
        info!(reason, "user stream disconnected");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let exchange_key = fs::read_to_string("armordex-public-key.asc")
        .context("failed to read the exchange public key")?;
    let trader_key = fs::read_to_string("trader-private-key.asc")
        .context("failed to read the trader private key")?;

    let exchange = ExchangeDescriptor::new(&exchange_key, "wss://api.armordex.example")?;
    let mut trader = TraderIdentity::new("83745263748", &trader_key)?;
    trader.unlock("s3cret")?;

    let user_stream = UserStream::with_default_nonce_group(exchange.clone(), trader);
    let user_url = user_stream.user_stream_url();
    let market_url = exchange.market_stream_url();

    let mut user_driver = StreamDriver::new(user_stream);
    let user_handle = user_driver.handle();
    user_driver
        .handler_mut()
        .add_listener(Arc::new(SimpleUserListener {
            user: user_handle.clone(),
            open_positions: Mutex::new(HashMap::new()),
        }));

    let mut market_driver = StreamDriver::new(MarketStream::new(exchange));
    market_driver
        .handler_mut()
        .add_listener(Arc::new(SimpleMarketListener {
            user: user_handle,
            selected_futures: Mutex::new(None),
        }));

    let user_task = tokio::spawn(async move { user_driver.run(&user_url).await });
    let market_task = tokio::spawn(async move { market_driver.run(&market_url).await });
    let (user_result, market_result) = tokio::try_join!(user_task, market_task)?;
    user_result?;
    market_result?;
    Ok(())
}
