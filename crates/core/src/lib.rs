//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Armordex Core
//!
//! Client-side protocol engine for the Armordex derivatives exchange.
//!
//! The exchange speaks two long-lived WebSocket conversations: a public
//! **market stream** of clearsigned market data and a private **user stream**
//! of OpenPGP sign+encrypt traffic carrying account events and the trader's
//! own commands. This crate is the engine between a WebSocket adapter and
//! the trading logic:
//!
//! - **OpenPGP envelope**: clearsign verification for market data,
//!   sign+encrypt / decrypt+verify for the user stream
//! - **Replay-resistant nonce protocol**: a `get_last_nonce` → `subscribe` →
//!   `subscribed` handshake seeds a strictly monotonic nonce counter, scoped
//!   by nonce group so concurrent sessions cannot collide
//! - **Command state machine**: immediate sends, collected batches and the
//!   two time-triggered batch modes, with mutually exclusive transitions
//! - **Listener fan-out**: typed callbacks with no-op defaults; one failing
//!   listener never starves the rest
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use armordex_core::{ExchangeDescriptor, TraderIdentity, UserListener, UserStream};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! struct Printer;
//! impl UserListener for Printer {
//!     fn on_ready(&self) -> anyhow::Result<()> {
//!         println!("session live");
//!         Ok(())
//!     }
//! }
//!
//! let exchange = ExchangeDescriptor::new(EXCHANGE_KEY, "wss://api.armordex.example")?;
//! let mut trader = TraderIdentity::new("123456789", TRADER_KEY)?;
//! trader.unlock("s3cret")?;
//!
//! let mut stream = UserStream::with_default_nonce_group(exchange, trader);
//! stream.add_listener(Arc::new(Printer));
//! // hand `stream` to a transport adapter, e.g. armordex-client
//! # const EXCHANGE_KEY: &str = "";
//! # const TRADER_KEY: &str = "";
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`envelope`] - OpenPGP envelope operations shared by both streams
//! - [`frame`] - outer transport frame codec (`keepalive` / `error` / `data`)
//! - [`market`] - market stream engine: verify, parse, fan out
//! - [`user`] - user stream engine: handshake, nonces, batches, commands
//! - [`listener`] - listener traits and the fan-out dispatcher
//! - [`transport`] - the thin contract a WebSocket adapter implements against
//!
//! The engine is single-threaded: all state transitions happen on the
//! transport's event thread, and the crate holds no locks. Multi-threaded
//! hosts serialize access through a mailbox (see `armordex-client`).

pub mod envelope;
pub mod error;
pub mod exchange;
pub mod frame;
pub mod listener;
pub mod market;
pub mod trader;
pub mod transport;
pub mod user;

pub use error::{BatchMode, CommandError, CryptoError, StreamError, TransportError};
pub use exchange::ExchangeDescriptor;
pub use frame::Frame;
pub use listener::{ListenerSet, MarketListener, UserListener};
pub use market::MarketStream;
pub use trader::TraderIdentity;
pub use transport::{OutboundSink, ProtocolHandler};
pub use user::{StreamState, UserStream};

// Wire types are re-exported so most hosts only depend on this crate.
pub use armordex_types as types;
