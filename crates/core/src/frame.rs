//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Outer transport frame codec.
//!
//! Every inbound WebSocket message on either stream is UTF-8 JSON with a
//! `type` field. Only `keepalive`, `error` and `data` are meaningful;
//! anything else is skipped for forward compatibility. Outbound frames are
//! raw armored ciphertext bytes and need no wrapping.

use serde::{Deserialize, Serialize};

/// An inbound transport frame, before any cryptography.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    /// Liveness ping from the exchange; discarded.
    Keepalive,
    /// Stream-level error. `error_code == "maintenance"` announces a graceful
    /// shutdown and is swallowed; the clean close that follows is reported
    /// through `on_disconnect`.
    Error { error_code: String },
    /// An ASCII-armored OpenPGP blob: clearsigned on the market stream,
    /// sign+encrypted on the user stream.
    Data { data: String },
    #[serde(other)]
    Unknown,
}

impl Frame {
    /// Parse one inbound frame.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
