//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Public market stream engine.
//!
//! Connects the frame codec, the clearsign verifier and the listener fan-out.
//! The market stream is receive-only: the engine never sends a frame, it only
//! verifies, parses and dispatches. A payload that fails verification is
//! surfaced through `on_error` and never dispatched.

use std::sync::Arc;

use armordex_types::market::MarketMessage;

use crate::envelope;
use crate::error::{StreamError, TransportError};
use crate::exchange::ExchangeDescriptor;
use crate::frame::Frame;
use crate::listener::{ListenerSet, MarketListener};
use crate::transport::{OutboundSink, ProtocolHandler};

/// Engine for the clearsigned market data stream.
pub struct MarketStream {
    exchange: ExchangeDescriptor,
    listeners: ListenerSet<dyn MarketListener>,
}

impl MarketStream {
    pub fn new(exchange: ExchangeDescriptor) -> Self {
        MarketStream {
            exchange,
            listeners: ListenerSet::default(),
        }
    }

    /// URL the transport adapter should connect to.
    pub fn market_stream_url(&self) -> String {
        self.exchange.market_stream_url()
    }

    pub fn add_listener(&mut self, listener: Arc<dyn MarketListener>) {
        self.listeners.add(listener);
    }

    pub fn remove_listener(&mut self, listener: &Arc<dyn MarketListener>) {
        self.listeners.remove(listener);
    }

    /// Surface an externally observed error to every listener.
    pub fn on_error(&self, error: &anyhow::Error) {
        self.listeners.notify(|l| l.on_error(error));
    }

    fn process_frame(&mut self, raw: &str) -> Result<(), StreamError> {
        match Frame::parse(raw)? {
            Frame::Keepalive | Frame::Unknown => Ok(()),
            Frame::Error { error_code } => {
                if error_code == "maintenance" {
                    // Graceful shutdown notice; the clean close that follows
                    // is reported through on_disconnect.
                    Ok(())
                } else {
                    Err(TransportError::ErrorFrame { error_code }.into())
                }
            }
            Frame::Data { data } => {
                let plaintext =
                    envelope::verify_clearsigned(&data, self.exchange.public_key())?;
                let message: MarketMessage = serde_json::from_str(&plaintext)?;
                self.dispatch(&message);
                Ok(())
            }
        }
    }

    fn dispatch(&self, message: &MarketMessage) {
        if matches!(message, MarketMessage::Unknown) {
            return;
        }
        self.listeners
            .dispatch(|l| l.on_message(message), |l, e| l.on_error(e));
        match message {
            MarketMessage::OrderBook(order_book) => self
                .listeners
                .dispatch(|l| l.on_order_book(order_book), |l, e| l.on_error(e)),
            MarketMessage::Trade(trade) => self
                .listeners
                .dispatch(|l| l.on_trade(trade), |l, e| l.on_error(e)),
            MarketMessage::Quotes(quotes) => self
                .listeners
                .dispatch(|l| l.on_quotes(quotes), |l, e| l.on_error(e)),
            MarketMessage::SessionState(session_state) => self.listeners.dispatch(
                |l| l.on_session_state(session_state),
                |l, e| l.on_error(e),
            ),
            MarketMessage::InstrumentData(instrument_data) => self.listeners.dispatch(
                |l| l.on_instrument_data(instrument_data),
                |l, e| l.on_error(e),
            ),
            MarketMessage::SpotData(spot_data) => self
                .listeners
                .dispatch(|l| l.on_spot_data(spot_data), |l, e| l.on_error(e)),
            MarketMessage::Unknown => {}
        }
    }
}

impl ProtocolHandler for MarketStream {
    fn opened(&mut self, _sink: Box<dyn OutboundSink>) {
        // The market stream sends nothing; the sink is dropped.
        self.listeners
            .dispatch(|l| l.on_ready(), |l, e| l.on_error(e));
    }

    fn deliver(&mut self, frame: &str) {
        if let Err(error) = self.process_frame(frame) {
            self.on_error(&anyhow::Error::new(error));
        }
    }

    fn closed(&mut self, clean: bool, code: u16, reason: &str) {
        if clean {
            let message = format!("connection closed cleanly - {code} : {reason}");
            self.listeners.notify(|l| l.on_disconnect(&message));
        } else {
            let error = anyhow::Error::new(StreamError::from(TransportError::ClosedWithError {
                code,
                reason: reason.to_owned(),
            }));
            self.on_error(&error);
        }
    }
}
