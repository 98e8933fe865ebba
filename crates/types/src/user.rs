//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Typed messages of the private user stream.
//!
//! A decrypted user stream payload is always a JSON array of these entities;
//! a single logical event arrives as a singleton array. `last_nonce` and
//! `subscribed` drive the session handshake inside the engine and are never
//! dispatched to listeners; everything else fans out. Unknown `type` values
//! collapse to [`UserMessage::Unknown`] and are dropped silently.

use serde::{Deserialize, Serialize};

use crate::command::NonceGroup;

/// Handshake reply carrying the last nonce the exchange has seen for this
/// account and nonce group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LastNonce {
    pub last_nonce: u64,
    pub nonce_group: NonceGroup,
}

/// Handshake confirmation; the session is live once this arrives for the
/// client's own nonce group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Subscribed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    pub message_nonce_group: NonceGroup,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    MarginCall,
    Liquidation,
}

/// Balance and margin snapshot; all monetary fields are decimal strings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccountState {
    pub balance: String,
    pub free_balance: String,
    pub total_initial_margin: String,
    pub total_maintenance_margin: String,
    pub total_unsettled_pnl: String,
    pub total_locked_for_orders: String,
    pub total_pending_withdrawal: String,
    pub account_status: AccountStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PositionSide {
    Long,
    Short,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub instrument_id: String,
    /// Futures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pnl: Option<String>,
    pub maintenance_margin: String,
    pub initial_margin: String,
    pub side: PositionSide,
    pub quantity: u64,
    pub average_opening_price: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OpenPositionForcefullyClosed {
    pub instrument_id: String,
    pub side: PositionSide,
    pub quantity: u64,
    pub cause: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderPlaced {
    pub client_order_id: u64,
    pub instrument_id: String,
    pub limit_price: String,
    pub side: String,
    pub quantity: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderPlaceFailed {
    pub client_order_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderCancelled {
    pub client_order_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderForcefullyCancelled {
    pub client_order_id: u64,
    /// `"liquidation"` or `"settlement"`.
    pub cause: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderCancelFailed {
    pub client_order_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

/// Dummy payload, reserved for future extensions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AllOrdersCancelled {}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CancelAllOrdersFailed {
    pub cause: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderModified {
    pub client_order_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderModificationFailed {
    pub client_order_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderFilled {
    pub client_order_id: u64,
    pub trade_price: String,
    pub trade_quantity: u64,
    pub leaves_order_quantity: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimerAdded {
    pub timer_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimerRejected {
    pub timer_id: u64,
    /// One of `too_many_active_timers`, `timer_already_expired`,
    /// `timer_already_exists`.
    pub cause: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimerExpired {
    pub timer_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimerTriggered {
    pub timer_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimerUpdated {
    pub timer_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimerUpdateFailed {
    pub timer_id: u64,
    /// One of `not_found`, `timer_execution_interval_broken`.
    pub cause: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimerCancelled {
    pub timer_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimerCancelFailed {
    pub timer_id: u64,
    pub cause: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InternalTransferReceived {
    pub source_account_id: String,
    pub amount: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InternalTransferExecuted {
    pub destination_account_id: String,
    pub amount: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InternalTransferRejected {
    pub destination_account_id: String,
    pub amount: String,
    pub cause: String,
}

/// One entity of a decrypted user stream payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserMessage {
    LastNonce(LastNonce),
    Subscribed(Subscribed),
    AccountState(AccountState),
    OpenPosition(OpenPosition),
    OpenPositionForcefullyClosed(OpenPositionForcefullyClosed),
    OrderPlaced(OrderPlaced),
    OrderPlaceFailed(OrderPlaceFailed),
    OrderCancelled(OrderCancelled),
    OrderForcefullyCancelled(OrderForcefullyCancelled),
    OrderCancelFailed(OrderCancelFailed),
    AllOrdersCancelled(AllOrdersCancelled),
    CancelAllOrdersFailed(CancelAllOrdersFailed),
    OrderModified(OrderModified),
    OrderModificationFailed(OrderModificationFailed),
    OrderFilled(OrderFilled),
    TimerAdded(TimerAdded),
    TimerRejected(TimerRejected),
    TimerExpired(TimerExpired),
    TimerTriggered(TimerTriggered),
    TimerUpdated(TimerUpdated),
    TimerUpdateFailed(TimerUpdateFailed),
    TimerCancelled(TimerCancelled),
    TimerCancelFailed(TimerCancelFailed),
    InternalTransferReceived(InternalTransferReceived),
    InternalTransferExecuted(InternalTransferExecuted),
    InternalTransferRejected(InternalTransferRejected),
    /// Forward compatibility: anything the exchange added after this client.
    #[serde(other)]
    Unknown,
}
