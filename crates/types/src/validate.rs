//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Structural and range checks over order commands.
//!
//! Decimal fields are validated as parseable positive numbers but transmitted
//! as their original strings, so the trader's precision survives the trip.
//! `post_only` being strictly boolean is enforced by the types themselves;
//! the JSON boundary ([`OrderCommand::from_value`](crate::command::OrderCommand::from_value))
//! rejects anything else before it gets here.

use thiserror::Error;

use crate::command::{ModifyOrder, OrderCommand, PlaceOrder};

/// Rejections produced while checking a command before it is stamped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid {field}: {reason}")]
    InvalidCommand { field: &'static str, reason: String },

    #[error("unsupported command type: {kind}")]
    UnsupportedCommand { kind: String },
}

/// Validate a single order command according to its type.
pub fn validate_order_command(command: &OrderCommand) -> Result<(), ValidationError> {
    match command {
        OrderCommand::PlaceOrder(place_order) => validate_place_order(place_order),
        OrderCommand::CancelOrder(cancel_order) => {
            check_positive_int("client_order_id", cancel_order.client_order_id)
        }
        OrderCommand::ModifyOrder(modify_order) => validate_modify_order(modify_order),
        OrderCommand::CancelAllOrders(_) => Ok(()),
    }
}

fn validate_place_order(place_order: &PlaceOrder) -> Result<(), ValidationError> {
    check_positive_int("client_order_id", place_order.client_order_id)?;
    check_positive_int("quantity", place_order.quantity)?;
    check_positive_int_str("instrument_id", &place_order.instrument_id)?;
    check_positive_decimal("limit_price", &place_order.limit_price)?;
    let side = &place_order.side;
    if !side.eq_ignore_ascii_case("buy") && !side.eq_ignore_ascii_case("sell") {
        return Err(ValidationError::InvalidCommand {
            field: "side",
            reason: format!(r#"has to be either "buy" or "sell", got: {side}"#),
        });
    }
    if !place_order.order_type.eq_ignore_ascii_case("limit") {
        return Err(ValidationError::InvalidCommand {
            field: "order_type",
            reason: "the only supported order_type is limit currently".to_owned(),
        });
    }
    Ok(())
}

fn validate_modify_order(modify_order: &ModifyOrder) -> Result<(), ValidationError> {
    check_positive_int("client_order_id", modify_order.client_order_id)?;
    if let Some(new_price) = &modify_order.new_price {
        check_positive_decimal("new_price", new_price)?;
    }
    if let Some(new_quantity) = modify_order.new_quantity {
        check_positive_int("new_quantity", new_quantity)?;
    }
    if modify_order.new_price.is_none() && modify_order.new_quantity.is_none() {
        return Err(ValidationError::InvalidCommand {
            field: "new_price",
            reason: "modify_order should have new_price or new_quantity".to_owned(),
        });
    }
    Ok(())
}

fn check_positive_int(field: &'static str, value: u64) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::InvalidCommand {
            field,
            reason: format!("{value} should be greater than 0"),
        });
    }
    Ok(())
}

fn check_positive_int_str(field: &'static str, value: &str) -> Result<(), ValidationError> {
    match value.parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(()),
        _ => Err(ValidationError::InvalidCommand {
            field,
            reason: format!("{value} should be a positive integer"),
        }),
    }
}

fn check_positive_decimal(field: &'static str, value: &str) -> Result<(), ValidationError> {
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() && parsed > 0.0 => Ok(()),
        _ => Err(ValidationError::InvalidCommand {
            field,
            reason: format!("{value} should be greater than 0"),
        }),
    }
}
