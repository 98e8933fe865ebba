//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Unified error hierarchy for the Armordex engine.

use thiserror::Error;

use armordex_types::validate::ValidationError;

/// Top-level error type for stream operations.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("cryptographic operation failed")]
    Crypto(#[from] CryptoError),

    #[error("command rejected")]
    Command(#[from] CommandError),

    #[error("transport layer error")]
    Transport(#[from] TransportError),

    #[error("malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Errors related to the OpenPGP envelope.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("invalid key material: {0}")]
    InvalidKeyFormat(String),

    #[error("signature verification failed")]
    SignatureInvalid,

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("encryption failed: {0}")]
    EncryptFailed(String),

    #[error("decryption failed: {0}")]
    DecryptFailed(String),

    #[error("key unlock failed: {0}")]
    UnlockFailed(String),

    #[error("private key is locked, unlock it with the passphrase first")]
    KeyLocked,
}

/// Errors raised synchronously by the command API.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("user stream is not ready, wait until on_ready is called")]
    NotInitialized,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("cannot {attempted} while {active} batch is active")]
    BatchModeConflict {
        attempted: &'static str,
        active: BatchMode,
    },

    #[error("empty batch")]
    EmptyBatch,

    #[error(
        "update at least one: order commands, execution start timestamp, execution expiration timestamp"
    )]
    NoUpdateFields,

    #[error("no transport attached, connect before sending")]
    NotConnected,
}

/// The batch mode active on a user stream, exposed for conflict reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchMode {
    None,
    Standard,
    TimeTriggeredCreate,
    TimeTriggeredUpdate,
}

impl std::fmt::Display for BatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BatchMode::None => "no",
            BatchMode::Standard => "a standard",
            BatchMode::TimeTriggeredCreate => "a time-triggered create",
            BatchMode::TimeTriggeredUpdate => "a time-triggered update",
        };
        f.write_str(name)
    }
}

/// Errors related to the transport layer.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection closed with error - {code} : {reason}")]
    ClosedWithError { code: u16, reason: String },

    #[error("stream error frame: {error_code}")]
    ErrorFrame { error_code: String },

    #[error("send failed: {0}")]
    SendFailed(String),
}
