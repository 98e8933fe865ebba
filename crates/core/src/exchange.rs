//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Exchange endpoint descriptor: public key material and stream URLs.

use pgp::composed::SignedPublicKey;

use crate::envelope;
use crate::error::CryptoError;

/// Public identity of the exchange. Immutable after construction.
#[derive(Debug, Clone)]
pub struct ExchangeDescriptor {
    public_key: SignedPublicKey,
    base_url: String,
}

impl ExchangeDescriptor {
    /// Build a descriptor from the exchange's armored public key and the base
    /// API URL, e.g. `wss://api.armordex.example`.
    pub fn new(public_key_armored: &str, base_url: impl Into<String>) -> Result<Self, CryptoError> {
        Ok(ExchangeDescriptor {
            public_key: envelope::parse_public_key(public_key_armored)?,
            base_url: base_url.into(),
        })
    }

    /// Key every inbound payload must verify against.
    pub fn public_key(&self) -> &SignedPublicKey {
        &self.public_key
    }

    pub fn market_stream_url(&self) -> String {
        format!("{}/market_stream", self.base_url)
    }

    pub fn user_stream_url(&self) -> String {
        format!("{}/user_stream", self.base_url)
    }
}
