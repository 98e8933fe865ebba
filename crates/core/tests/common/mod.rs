//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Shared fixtures for the stream integration suites: generated OpenPGP
//! keys, a frame-capturing sink and recording listeners.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use pgp::composed::{KeyType, SecretKeyParamsBuilder, SignedPublicKey, SignedSecretKey};
use pgp::types::SecretKeyTrait;
use rand::thread_rng;

use armordex_core::error::TransportError;
use armordex_core::transport::OutboundSink;
use armordex_core::{envelope, ExchangeDescriptor, TraderIdentity};
use armordex_types::user::UserMessage;

pub const ACCOUNT_ID: &str = "123456789";

pub struct TestKeys {
    pub exchange_secret: SignedSecretKey,
    pub exchange_public: SignedPublicKey,
    pub exchange_public_armored: String,
    pub trader_secret_armored: String,
    pub trader_public: SignedPublicKey,
    /// An unrelated keypair; signatures made with it must never verify.
    pub mallory_secret: SignedSecretKey,
    pub mallory_public: SignedPublicKey,
}

/// RSA keys are slow to generate, so every suite shares one set.
pub static KEYS: Lazy<TestKeys> = Lazy::new(|| {
    let (exchange_secret, exchange_public) = generate_keypair("");
    let (trader_secret, trader_public) = generate_keypair("");
    let (mallory_secret, mallory_public) = generate_keypair("");
    TestKeys {
        exchange_public_armored: exchange_public
            .to_armored_string(Default::default())
            .expect("armor exchange public key"),
        trader_secret_armored: trader_secret
            .to_armored_string(Default::default())
            .expect("armor trader secret key"),
        exchange_secret,
        exchange_public,
        trader_public,
        mallory_secret,
        mallory_public,
    }
});

/// Generate a sign+encrypt capable keypair, optionally passphrase-protected.
pub fn generate_keypair(passphrase: &str) -> (SignedSecretKey, SignedPublicKey) {
    let mut rng = thread_rng();
    let params = SecretKeyParamsBuilder::default()
        .key_type(KeyType::Rsa(2048))
        .can_sign(true)
        .can_encrypt(true)
        .primary_user_id("Armordex Test <test@armordex.example>".into())
        .passphrase(if passphrase.is_empty() {
            None
        } else {
            Some(passphrase.to_owned())
        })
        .build()
        .expect("key params");
    let secret_key = params.generate(&mut rng).expect("generate secret key");
    let signed_secret = secret_key
        .sign(&mut rng, || passphrase.to_owned())
        .expect("self-sign secret key");
    let public_key = signed_secret.public_key();
    let signed_public = public_key
        .sign(&mut rng, &signed_secret, || passphrase.to_owned())
        .expect("sign public key");
    (signed_secret, signed_public)
}

pub fn exchange_descriptor() -> ExchangeDescriptor {
    ExchangeDescriptor::new(&KEYS.exchange_public_armored, "wss://api.armordex.example")
        .expect("exchange descriptor")
}

pub fn unlocked_trader() -> TraderIdentity {
    let mut trader =
        TraderIdentity::new(ACCOUNT_ID, &KEYS.trader_secret_armored).expect("trader identity");
    trader.unlock("").expect("unlock");
    trader
}

/// Sink capturing outbound frames for later decryption.
pub struct CaptureSink {
    frames: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl CaptureSink {
    pub fn new(frames: Arc<Mutex<Vec<Vec<u8>>>>) -> Self {
        CaptureSink { frames }
    }
}

impl OutboundSink for CaptureSink {
    fn send(&mut self, frame: Vec<u8>) -> Result<(), TransportError> {
        self.frames.lock().expect("sink lock").push(frame);
        Ok(())
    }
}

/// Decrypt an outbound trader frame the way the exchange would and return the
/// command JSON.
pub fn decrypt_outbound(frame: &[u8]) -> serde_json::Value {
    let armored = std::str::from_utf8(frame).expect("outbound frames are UTF-8");
    let plaintext = envelope::decrypt_verify(
        armored,
        &KEYS.exchange_secret,
        "",
        &KEYS.trader_public,
    )
    .expect("decrypt outbound frame");
    serde_json::from_str(&plaintext).expect("outbound frame is JSON")
}

/// Wrap `entities` in a signed, encrypted `data` frame, as the exchange sends
/// them on the user stream.
pub fn user_data_frame(entities: &serde_json::Value) -> String {
    let armored = envelope::sign_encrypt(
        &entities.to_string(),
        &KEYS.exchange_secret,
        "",
        &KEYS.trader_public,
    )
    .expect("sign+encrypt inbound payload");
    serde_json::json!({"type": "data", "data": armored}).to_string()
}

/// Same as [`user_data_frame`] but signed by an unrelated key.
pub fn forged_user_data_frame(entities: &serde_json::Value) -> String {
    let armored = envelope::sign_encrypt(
        &entities.to_string(),
        &KEYS.mallory_secret,
        "",
        &KEYS.trader_public,
    )
    .expect("sign+encrypt forged payload");
    serde_json::json!({"type": "data", "data": armored}).to_string()
}

/// Wrap a market message in a clearsigned `data` frame.
pub fn market_data_frame(message: &serde_json::Value) -> String {
    let blob = envelope::sign_clearsigned(&message.to_string(), &KEYS.exchange_secret, "")
        .expect("clearsign market payload");
    serde_json::json!({"type": "data", "data": blob}).to_string()
}

/// Same as [`market_data_frame`] but signed by an unrelated key.
pub fn forged_market_data_frame(message: &serde_json::Value) -> String {
    let blob = envelope::sign_clearsigned(&message.to_string(), &KEYS.mallory_secret, "")
        .expect("clearsign forged payload");
    serde_json::json!({"type": "data", "data": blob}).to_string()
}

/// User listener recording everything it sees.
#[derive(Default)]
pub struct RecordingUserListener {
    pub ready: Mutex<bool>,
    pub messages: Mutex<Vec<UserMessage>>,
    pub errors: Mutex<Vec<String>>,
    pub disconnects: Mutex<Vec<String>>,
    pub order_filled: Mutex<Vec<armordex_types::user::OrderFilled>>,
    pub account_states: Mutex<Vec<armordex_types::user::AccountState>>,
    pub timer_added: Mutex<Vec<armordex_types::user::TimerAdded>>,
}

impl RecordingUserListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.lock().expect("lock")
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().expect("lock").len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().expect("lock").len()
    }

    pub fn assert_no_errors(&self) {
        let errors = self.errors.lock().expect("lock");
        assert!(errors.is_empty(), "unexpected listener errors: {errors:?}");
    }
}

impl armordex_core::UserListener for RecordingUserListener {
    fn on_ready(&self) -> anyhow::Result<()> {
        *self.ready.lock().expect("lock") = true;
        Ok(())
    }

    fn on_message(&self, message: &UserMessage) -> anyhow::Result<()> {
        self.messages.lock().expect("lock").push(message.clone());
        Ok(())
    }

    fn on_account_state(
        &self,
        account_state: &armordex_types::user::AccountState,
    ) -> anyhow::Result<()> {
        self.account_states
            .lock()
            .expect("lock")
            .push(account_state.clone());
        Ok(())
    }

    fn on_order_filled(
        &self,
        order_filled: &armordex_types::user::OrderFilled,
    ) -> anyhow::Result<()> {
        self.order_filled
            .lock()
            .expect("lock")
            .push(order_filled.clone());
        Ok(())
    }

    fn on_timer_added(&self, timer_added: &armordex_types::user::TimerAdded) -> anyhow::Result<()> {
        self.timer_added
            .lock()
            .expect("lock")
            .push(timer_added.clone());
        Ok(())
    }

    fn on_error(&self, error: &anyhow::Error) {
        self.errors.lock().expect("lock").push(format!("{error:#}"));
    }

    fn on_disconnect(&self, reason: &str) {
        self.disconnects
            .lock()
            .expect("lock")
            .push(reason.to_owned());
    }
}

/// Market listener recording everything it sees.
#[derive(Default)]
pub struct RecordingMarketListener {
    pub ready: Mutex<bool>,
    pub messages: Mutex<Vec<armordex_types::market::MarketMessage>>,
    pub order_books: Mutex<Vec<armordex_types::market::OrderBook>>,
    pub trades: Mutex<Vec<armordex_types::market::Trade>>,
    pub instrument_data: Mutex<Vec<armordex_types::market::InstrumentData>>,
    pub errors: Mutex<Vec<String>>,
    pub disconnects: Mutex<Vec<String>>,
}

impl RecordingMarketListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().expect("lock").len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().expect("lock").len()
    }

    pub fn assert_no_errors(&self) {
        let errors = self.errors.lock().expect("lock");
        assert!(errors.is_empty(), "unexpected listener errors: {errors:?}");
    }
}

impl armordex_core::MarketListener for RecordingMarketListener {
    fn on_ready(&self) -> anyhow::Result<()> {
        *self.ready.lock().expect("lock") = true;
        Ok(())
    }

    fn on_message(
        &self,
        message: &armordex_types::market::MarketMessage,
    ) -> anyhow::Result<()> {
        self.messages.lock().expect("lock").push(message.clone());
        Ok(())
    }

    fn on_order_book(
        &self,
        order_book: &armordex_types::market::OrderBook,
    ) -> anyhow::Result<()> {
        self.order_books
            .lock()
            .expect("lock")
            .push(order_book.clone());
        Ok(())
    }

    fn on_trade(&self, trade: &armordex_types::market::Trade) -> anyhow::Result<()> {
        self.trades.lock().expect("lock").push(trade.clone());
        Ok(())
    }

    fn on_instrument_data(
        &self,
        instrument_data: &armordex_types::market::InstrumentData,
    ) -> anyhow::Result<()> {
        self.instrument_data
            .lock()
            .expect("lock")
            .push(instrument_data.clone());
        Ok(())
    }

    fn on_error(&self, error: &anyhow::Error) {
        self.errors.lock().expect("lock").push(format!("{error:#}"));
    }

    fn on_disconnect(&self, reason: &str) {
        self.disconnects
            .lock()
            .expect("lock")
            .push(reason.to_owned());
    }
}
