//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Shared wire types for the Armordex exchange streams.
//!
//! This crate provides the canonical type definitions spoken on both exchange
//! streams: the outbound user stream commands with their nonce stamps, the
//! inbound market and user stream messages, and the structural validators run
//! over commands before they are stamped. Types are serializable via serde
//! and mirror the exchange's JSON schemas field for field.
//!
//! # Quick Start
//!
//! ```rust
//! use armordex_types::prelude::*;
//!
//! let order = OrderCommand::PlaceOrder(PlaceOrder {
//!     client_order_id: 15,
//!     instrument_id: "76".to_string(),
//!     order_type: "limit".to_string(),
//!     limit_price: "4.5".to_string(),
//!     side: "buy".to_string(),
//!     quantity: 6,
//!     post_only: None,
//! });
//! assert!(validate_order_command(&order).is_ok());
//! ```

pub mod command;
pub mod market;
pub mod user;
pub mod validate;

/// Prelude module for convenient glob imports.
pub mod prelude {
    pub use crate::command::{
        AddTimerCommand, BatchCommand, CancelAllOrders, CancelOrder, CancelTimerCommand, Command,
        InternalTransfer, InternalTransferCommand, ModifyOrder, NonceGroup, OrderCommand,
        PlaceOrder, SequencedCommand, TimerCommand, UpdateTimerCommand,
    };
    pub use crate::market::{
        Instrument, InstrumentData, InstrumentKind, MarketMessage, OrderBook, PriceLevel, Quotes,
        SessionPhase, SessionState, SpotData, Trade,
    };
    pub use crate::user::{LastNonce, Subscribed, UserMessage};
    pub use crate::validate::{validate_order_command, ValidationError};
}
