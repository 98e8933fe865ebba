//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Outbound command schemas for the user stream.
//!
//! Every command the trader can send is a closed, internally tagged type: the
//! wire `type` field is the serde tag, so an unrepresentable command cannot be
//! built, let alone sent. Order commands ([`OrderCommand`]) are stamped
//! individually with `(account_id, nonce, nonce_group)` before they go out or
//! enter a batch; control envelopes ([`Command`]) carry their own stamp,
//! except `get_last_nonce` which opens the handshake and has no nonce yet.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validate::ValidationError;

/// Nonce space selector, `0..=9`.
///
/// Concurrent sessions for the same account must use distinct groups so their
/// nonce sequences cannot collide; the exchange's own webapp uses group 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NonceGroup(u8);

impl NonceGroup {
    /// Create a nonce group, rejecting values outside `0..=9`.
    pub fn new(group: u8) -> Result<Self, ValidationError> {
        if group > 9 {
            return Err(ValidationError::InvalidCommand {
                field: "nonce_group",
                reason: format!("{group} is outside 0..=9"),
            });
        }
        Ok(NonceGroup(group))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for NonceGroup {
    /// Group 5, the conventional default for API clients.
    fn default() -> Self {
        NonceGroup(5)
    }
}

impl fmt::Display for NonceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Limit order placement.
///
/// `limit_price` stays a decimal string end to end so the engine never
/// rewrites the trader's precision.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlaceOrder {
    /// Positive integer id, unique among the trader's orders.
    pub client_order_id: u64,
    /// String id of the instrument (numeric on the wire side).
    pub instrument_id: String,
    /// Only `"limit"` is accepted.
    pub order_type: String,
    /// Positive decimal as a string.
    pub limit_price: String,
    /// `"buy"` or `"sell"`.
    pub side: String,
    pub quantity: u64,
    /// When true the order is rejected instead of taking liquidity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CancelOrder {
    pub client_order_id: u64,
}

/// Order modification; at least one of `new_price` / `new_quantity` must be set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModifyOrder {
    pub client_order_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_quantity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
}

/// Cancels every pending order of the account; no payload beyond the tag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CancelAllOrders {}

/// An order command as submitted by the trader, before nonce stamping.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderCommand {
    PlaceOrder(PlaceOrder),
    CancelOrder(CancelOrder),
    ModifyOrder(ModifyOrder),
    CancelAllOrders(CancelAllOrders),
}

impl OrderCommand {
    /// Wire name of the command, as it appears in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderCommand::PlaceOrder(_) => "place_order",
            OrderCommand::CancelOrder(_) => "cancel_order",
            OrderCommand::ModifyOrder(_) => "modify_order",
            OrderCommand::CancelAllOrders(_) => "cancel_all_orders",
        }
    }

    /// Parse an order command from loose JSON.
    ///
    /// The enum is closed, so this is the boundary where a foreign `type`
    /// surfaces as [`ValidationError::UnsupportedCommand`] rather than a
    /// serde error.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        let kind = value
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(ValidationError::InvalidCommand {
                field: "type",
                reason: "missing command type".to_owned(),
            })?;
        match kind {
            "place_order" | "cancel_order" | "modify_order" | "cancel_all_orders" => {
                serde_json::from_value(value).map_err(|e| ValidationError::InvalidCommand {
                    field: "command",
                    reason: e.to_string(),
                })
            }
            other => Err(ValidationError::UnsupportedCommand {
                kind: other.to_owned(),
            }),
        }
    }
}

/// An order command carrying its `(account_id, nonce, nonce_group)` stamp.
///
/// This is the exact shape sent standalone or as a `batch` child; the stamp
/// fields sit next to the command's own fields on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SequencedCommand {
    #[serde(flatten)]
    pub command: OrderCommand,
    pub account_id: String,
    pub nonce: u64,
    pub nonce_group: NonceGroup,
}

/// `{type:"batch"}` envelope; children are individually stamped, the envelope
/// itself carries no nonce.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BatchCommand {
    pub account_id: String,
    pub batch: Vec<SequencedCommand>,
}

/// Payload carried inside a timer envelope. The exchange only accepts order
/// batches here, which the single variant encodes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerCommand {
    Batch(BatchCommand),
}

/// `add_timer` envelope registering a time-triggered batch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AddTimerCommand {
    pub timer_id: u64,
    /// The batch will not execute before this millisecond timestamp.
    pub execution_start_timestamp: i64,
    /// The batch will not execute after this millisecond timestamp.
    pub execution_expiration_timestamp: i64,
    /// Absent only while the envelope is pre-stamped and the batch still open.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<TimerCommand>,
    pub account_id: String,
    pub nonce: u64,
    pub nonce_group: NonceGroup,
}

/// `update_timer` envelope. The two timestamp fields are always present on
/// the wire, `null` when unchanged; `new_command` is omitted when unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UpdateTimerCommand {
    pub timer_id: u64,
    pub new_execution_start_timestamp: Option<i64>,
    pub new_execution_expiration_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_command: Option<TimerCommand>,
    pub account_id: String,
    pub nonce: u64,
    pub nonce_group: NonceGroup,
}

impl UpdateTimerCommand {
    /// True when the envelope updates nothing, which the exchange rejects.
    pub fn is_empty_update(&self) -> bool {
        self.new_execution_start_timestamp.is_none()
            && self.new_execution_expiration_timestamp.is_none()
            && self.new_command.is_none()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CancelTimerCommand {
    pub timer_id: u64,
    pub account_id: String,
    pub nonce: u64,
    pub nonce_group: NonceGroup,
}

/// Transfer of funds to another account on the exchange, as submitted by the
/// trader before stamping.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InternalTransfer {
    pub destination_account_id: String,
    /// Positive decimal as a string.
    pub amount: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InternalTransferCommand {
    pub destination_account_id: String,
    pub amount: String,
    pub account_id: String,
    pub nonce: u64,
    pub nonce_group: NonceGroup,
}

/// Control envelopes of the user stream.
///
/// Standalone order commands go out as [`SequencedCommand`]; everything else
/// the engine sends is one of these.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Opens the handshake; deliberately carries no nonce.
    GetLastNonce {
        account_id: String,
        nonce_group: NonceGroup,
    },
    Subscribe {
        account_id: String,
        nonce: u64,
        nonce_group: NonceGroup,
    },
    Batch(BatchCommand),
    AddTimer(AddTimerCommand),
    UpdateTimer(UpdateTimerCommand),
    CancelTimer(CancelTimerCommand),
    InternalTransfer(InternalTransferCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stamped_place_order() -> SequencedCommand {
        SequencedCommand {
            command: OrderCommand::PlaceOrder(PlaceOrder {
                client_order_id: 15,
                instrument_id: "76".to_owned(),
                order_type: "limit".to_owned(),
                limit_price: "4.5".to_owned(),
                side: "buy".to_owned(),
                quantity: 6,
                post_only: None,
            }),
            account_id: "123456789".to_owned(),
            nonce: 7,
            nonce_group: NonceGroup::default(),
        }
    }

    #[test]
    fn sequenced_place_order_wire_shape() {
        let value = serde_json::to_value(stamped_place_order()).expect("serialize");
        assert_eq!(
            value,
            json!({
                "type": "place_order",
                "account_id": "123456789",
                "nonce": 7,
                "nonce_group": 5,
                "client_order_id": 15,
                "instrument_id": "76",
                "order_type": "limit",
                "limit_price": "4.5",
                "side": "buy",
                "quantity": 6,
            })
        );
    }

    #[test]
    fn cancel_all_orders_has_no_payload_fields() {
        let value = serde_json::to_value(SequencedCommand {
            command: OrderCommand::CancelAllOrders(CancelAllOrders::default()),
            account_id: "1".to_owned(),
            nonce: 3,
            nonce_group: NonceGroup::default(),
        })
        .expect("serialize");
        assert_eq!(
            value,
            json!({"type": "cancel_all_orders", "account_id": "1", "nonce": 3, "nonce_group": 5})
        );
    }

    #[test]
    fn get_last_nonce_carries_no_nonce() {
        let value = serde_json::to_value(Command::GetLastNonce {
            account_id: "123456789".to_owned(),
            nonce_group: NonceGroup::default(),
        })
        .expect("serialize");
        assert_eq!(
            value,
            json!({"type": "get_last_nonce", "account_id": "123456789", "nonce_group": 5})
        );
    }

    #[test]
    fn update_timer_serializes_unchanged_timestamps_as_null() {
        let value = serde_json::to_value(Command::UpdateTimer(UpdateTimerCommand {
            timer_id: 1,
            new_execution_start_timestamp: Some(100),
            new_execution_expiration_timestamp: None,
            new_command: None,
            account_id: "123456789".to_owned(),
            nonce: 7,
            nonce_group: NonceGroup::default(),
        }))
        .expect("serialize");
        assert_eq!(
            value,
            json!({
                "type": "update_timer",
                "timer_id": 1,
                "new_execution_start_timestamp": 100,
                "new_execution_expiration_timestamp": null,
                "account_id": "123456789",
                "nonce": 7,
                "nonce_group": 5,
            })
        );
    }

    #[test]
    fn add_timer_embeds_a_tagged_batch() {
        let value = serde_json::to_value(Command::AddTimer(AddTimerCommand {
            timer_id: 1,
            execution_start_timestamp: 100,
            execution_expiration_timestamp: 200,
            command: Some(TimerCommand::Batch(BatchCommand {
                account_id: "123456789".to_owned(),
                batch: vec![stamped_place_order()],
            })),
            account_id: "123456789".to_owned(),
            nonce: 6,
            nonce_group: NonceGroup::default(),
        }))
        .expect("serialize");
        assert_eq!(value["command"]["type"], "batch");
        assert_eq!(value["command"]["batch"][0]["type"], "place_order");
        assert_eq!(value["command"]["batch"][0]["nonce"], 7);
    }

    #[test]
    fn from_value_rejects_unknown_command_type() {
        let err = OrderCommand::from_value(json!({"type": "withdraw", "amount": "1"}))
            .expect_err("unknown type must not parse");
        assert!(matches!(err, ValidationError::UnsupportedCommand { kind } if kind == "withdraw"));
    }

    #[test]
    fn from_value_parses_known_commands() {
        let command = OrderCommand::from_value(json!({
            "type": "cancel_order",
            "client_order_id": 22,
        }))
        .expect("parse");
        assert_eq!(
            command,
            OrderCommand::CancelOrder(CancelOrder { client_order_id: 22 })
        );
    }

    #[test]
    fn nonce_group_range_is_enforced() {
        assert!(NonceGroup::new(9).is_ok());
        assert!(NonceGroup::new(10).is_err());
        assert_eq!(NonceGroup::default().get(), 5);
    }
}
