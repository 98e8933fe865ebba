//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Typed messages of the public market stream.
//!
//! Prices travel as decimal strings, quantities as integers and timestamps as
//! milliseconds since the epoch, UTC. A message whose `type` this crate does
//! not know collapses to [`MarketMessage::Unknown`] and is dropped by the
//! engine without an error, which keeps old clients alive when the exchange
//! adds message types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One side level of an order book: `["<decimal price>", <quantity>]`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceLevel(pub String, pub u64);

impl PriceLevel {
    pub fn price(&self) -> &str {
        &self.0
    }

    pub fn quantity(&self) -> u64 {
        self.1
    }
}

/// Full order book snapshot for one instrument.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderBook {
    pub instrument_id: String,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityProvider {
    Buyer,
    Seller,
    Auction,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Trade {
    pub instrument_id: String,
    pub trade_id: String,
    /// Milliseconds since epoch, UTC.
    pub timestamp: i64,
    pub price: String,
    pub quantity: u64,
    pub liquidity_provider: LiquidityProvider,
}

/// Best bid/ask and session statistics for one instrument.
///
/// The quote sides are optional: an empty book has no bid or ask.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Quotes {
    pub instrument_id: String,
    pub last: Option<String>,
    pub last_quantity: Option<u64>,
    pub bid: Option<String>,
    pub bid_quantity: Option<u64>,
    pub ask: Option<String>,
    pub ask_quantity: Option<u64>,
    pub volume: u64,
    pub open_interest: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    OpeningAuction,
    Continuous,
    Auction,
    ClosingAuction,
    NoTrading,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionState {
    pub state: SessionPhase,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    Futures,
    Option,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    CallEuropean,
    PutEuropean,
}

/// Static definition of a tradeable instrument.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Instrument {
    pub instrument_id: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: InstrumentKind,
    pub tick_size: f64,
    /// Milliseconds since epoch, UTC.
    pub issue_date: i64,
    /// Milliseconds since epoch, UTC.
    pub expiration_date: i64,
    pub underlying_symbol: String,
    pub notional_amount: u64,
    /// Taker fee, decimal fraction.
    pub fee: f64,
    /// Maker rebate, decimal fraction.
    pub taker_to_maker: f64,
    pub initial_margin: f64,
    pub maintenance_margin: f64,
    /// Options only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<f64>,
    /// Options only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_type: Option<OptionType>,
}

/// Definitions of all listed instruments, keyed by instrument id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InstrumentData {
    pub data: BTreeMap<String, Instrument>,
}

/// Spot index reading for an underlying.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SpotData {
    pub underlying_symbol: String,
    pub spot_price: String,
    /// Milliseconds since epoch, UTC.
    pub timestamp: i64,
}

/// A clearsigned market stream payload, parsed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketMessage {
    OrderBook(OrderBook),
    Trade(Trade),
    Quotes(Quotes),
    SessionState(SessionState),
    InstrumentData(InstrumentData),
    SpotData(SpotData),
    /// Forward compatibility: anything the exchange added after this client.
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_an_order_book() {
        let message: MarketMessage = serde_json::from_value(json!({
            "type": "order_book",
            "instrument_id": "71",
            "bids": [["9000", 10], ["8999", 7]],
            "asks": [["9001", 2]],
        }))
        .expect("parse");
        let MarketMessage::OrderBook(book) = message else {
            panic!("expected an order book");
        };
        assert_eq!(book.instrument_id, "71");
        assert_eq!(book.bids[0].price(), "9000");
        assert_eq!(book.bids[1].quantity(), 7);
        assert_eq!(book.asks.len(), 1);
    }

    #[test]
    fn parses_a_trade() {
        let message: MarketMessage = serde_json::from_value(json!({
            "type": "trade",
            "instrument_id": "71",
            "trade_id": "t-123",
            "timestamp": 1506958410894i64,
            "price": "9000.5",
            "quantity": 3,
            "liquidity_provider": "seller",
        }))
        .expect("parse");
        assert!(matches!(
            message,
            MarketMessage::Trade(Trade { liquidity_provider: LiquidityProvider::Seller, .. })
        ));
    }

    #[test]
    fn parses_session_state() {
        let message: MarketMessage = serde_json::from_value(json!({
            "type": "session_state",
            "state": "opening_auction",
        }))
        .expect("parse");
        assert!(matches!(
            message,
            MarketMessage::SessionState(SessionState { state: SessionPhase::OpeningAuction })
        ));
    }

    #[test]
    fn parses_instrument_data_with_futures_and_options() {
        let message: MarketMessage = serde_json::from_value(json!({
            "type": "instrument_data",
            "data": {
                "71": {
                    "instrument_id": "71",
                    "symbol": "F.USD.DEC17",
                    "type": "futures",
                    "tick_size": 0.5,
                    "issue_date": 1500000000000i64,
                    "expiration_date": 1512000000000i64,
                    "underlying_symbol": "usd",
                    "notional_amount": 1,
                    "fee": 0.0005,
                    "taker_to_maker": 0.00025,
                    "initial_margin": 0.04,
                    "maintenance_margin": 0.02,
                },
                "72": {
                    "instrument_id": "72",
                    "symbol": "O.USD.C.9000",
                    "type": "option",
                    "tick_size": 0.1,
                    "issue_date": 1500000000000i64,
                    "expiration_date": 1512000000000i64,
                    "underlying_symbol": "usd",
                    "notional_amount": 1,
                    "fee": 0.0005,
                    "taker_to_maker": 0.00025,
                    "initial_margin": 0.04,
                    "maintenance_margin": 0.02,
                    "strike": 9000.0,
                    "option_type": "call_european",
                },
            },
        }))
        .expect("parse");
        let MarketMessage::InstrumentData(data) = message else {
            panic!("expected instrument data");
        };
        assert_eq!(data.data["71"].kind, InstrumentKind::Futures);
        assert_eq!(data.data["72"].option_type, Some(OptionType::CallEuropean));
        assert_eq!(data.data["72"].strike, Some(9000.0));
    }

    #[test]
    fn unknown_message_types_collapse_to_unknown() {
        let message: MarketMessage =
            serde_json::from_value(json!({"type": "funding_rate", "rate": "0.01"}))
                .expect("unknown types still parse");
        assert_eq!(message, MarketMessage::Unknown);
    }
}
