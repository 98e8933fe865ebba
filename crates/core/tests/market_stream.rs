//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! End-to-end tests of the market stream engine: clearsign verification,
//! typed dispatch and lifecycle reporting.

mod common;

use std::sync::{Arc, Mutex};

use serde_json::json;

use armordex_core::transport::ProtocolHandler;
use armordex_core::{MarketListener, MarketStream};
use armordex_types::market::MarketMessage;

use common::{
    exchange_descriptor, forged_market_data_frame, market_data_frame, CaptureSink,
    RecordingMarketListener,
};

fn open_stream() -> (MarketStream, Arc<RecordingMarketListener>) {
    let listener = RecordingMarketListener::new();
    let mut stream = MarketStream::new(exchange_descriptor());
    stream.add_listener(listener.clone());
    stream.opened(Box::new(CaptureSink::new(Arc::new(Mutex::new(Vec::new())))));
    (stream, listener)
}

fn order_book() -> serde_json::Value {
    json!({
        "type": "order_book",
        "instrument_id": "71",
        "bids": [["9000", 10]],
        "asks": [["9001", 2]],
    })
}

#[test]
fn opening_the_transport_emits_ready() {
    let (_stream, listener) = open_stream();
    assert!(*listener.ready.lock().unwrap());
}

#[test]
fn clearsigned_messages_are_verified_parsed_and_dispatched() {
    let (mut stream, listener) = open_stream();
    stream.deliver(&market_data_frame(&order_book()));

    listener.assert_no_errors();
    assert_eq!(listener.message_count(), 1);
    let books = listener.order_books.lock().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].instrument_id, "71");
    assert_eq!(books[0].bids[0].price(), "9000");
}

#[test]
fn instrument_data_round_trips_through_the_stream() {
    let (mut stream, listener) = open_stream();
    stream.deliver(&market_data_frame(&json!({
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
        },
    })));

    listener.assert_no_errors();
    let data = listener.instrument_data.lock().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].data["71"].symbol, "F.USD.DEC17");
}

#[test]
fn a_forged_signature_surfaces_an_error_and_nothing_is_dispatched() {
    let (mut stream, listener) = open_stream();
    stream.deliver(&forged_market_data_frame(&order_book()));

    assert_eq!(listener.message_count(), 0);
    assert!(listener.order_books.lock().unwrap().is_empty());
    let errors = listener.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("signature"), "got: {}", errors[0]);
}

#[test]
fn keepalive_and_unknown_frames_are_silent() {
    let (mut stream, listener) = open_stream();
    stream.deliver(r#"{"type": "keepalive", "timestamp": 1506958410894}"#);
    stream.deliver(r#"{"type": "motd", "text": "hello"}"#);

    assert_eq!(listener.message_count(), 0);
    listener.assert_no_errors();
}

#[test]
fn unknown_clearsigned_message_types_are_silent() {
    let (mut stream, listener) = open_stream();
    stream.deliver(&market_data_frame(&json!({"type": "funding_rate", "rate": "0.01"})));

    assert_eq!(listener.message_count(), 0);
    listener.assert_no_errors();
}

#[test]
fn maintenance_error_frames_are_swallowed() {
    let (mut stream, listener) = open_stream();
    stream.deliver(r#"{"type": "error", "error_code": "maintenance"}"#);
    listener.assert_no_errors();
}

#[test]
fn other_error_frames_reach_on_error() {
    let (mut stream, listener) = open_stream();
    stream.deliver(r#"{"type": "error", "error_code": "overloaded"}"#);
    let errors = listener.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("overloaded"));
}

#[test]
fn malformed_payloads_reach_on_error() {
    let (mut stream, listener) = open_stream();
    stream.deliver("not json");
    assert_eq!(listener.error_count(), 1);
}

#[test]
fn every_listener_receives_every_message_in_insertion_order() {
    let (mut stream, first) = open_stream();
    let second = RecordingMarketListener::new();
    stream.add_listener(second.clone());

    stream.deliver(&market_data_frame(&order_book()));

    assert_eq!(first.message_count(), 1);
    assert_eq!(second.message_count(), 1);
    assert!(matches!(
        first.messages.lock().unwrap()[0],
        MarketMessage::OrderBook(_)
    ));
}

#[test]
fn removed_listeners_receive_nothing() {
    let (mut stream, first) = open_stream();
    let second = RecordingMarketListener::new();
    let second_dyn: Arc<dyn MarketListener> = second.clone();
    stream.add_listener(second_dyn.clone());
    stream.remove_listener(&second_dyn);

    stream.deliver(&market_data_frame(&order_book()));

    assert_eq!(first.message_count(), 1);
    assert_eq!(second.message_count(), 0);
}

#[test]
fn clean_close_reports_disconnect_and_unclean_close_reports_an_error() {
    let (mut stream, listener) = open_stream();
    stream.closed(true, 1000, "maintenance window");
    {
        let disconnects = listener.disconnects.lock().unwrap();
        assert_eq!(disconnects.len(), 1);
        assert!(disconnects[0].contains("maintenance window"));
    }
    listener.assert_no_errors();

    stream.closed(false, 1006, "connection reset");
    assert_eq!(listener.error_count(), 1);
}
