//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! Trader identity: account id and private key material.

use pgp::composed::{SignedPublicKey, SignedSecretKey};
use pgp::types::SecretKeyTrait;
use zeroize::Zeroizing;

use crate::envelope;
use crate::error::CryptoError;

/// The trader's account and signing identity.
///
/// Constructed locked. [`unlock`](TraderIdentity::unlock) must succeed once
/// before the identity can sign or decrypt; the verified passphrase is then
/// cached (zeroized on drop) for the engine's lifetime, so no later operation
/// prompts again. Unlock is idempotent after success.
pub struct TraderIdentity {
    account_id: String,
    private_key: SignedSecretKey,
    passphrase: Option<Zeroizing<String>>,
}

impl TraderIdentity {
    /// Build an identity from an opaque account id and armored private key.
    pub fn new(account_id: impl Into<String>, private_key_armored: &str) -> Result<Self, CryptoError> {
        Ok(TraderIdentity {
            account_id: account_id.into(),
            private_key: envelope::parse_secret_key(private_key_armored)?,
            passphrase: None,
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Unlock the primary key and all subkeys with `passphrase`.
    ///
    /// The passphrase is checked against every secret key packet before it is
    /// accepted, so a wrong passphrase fails here rather than on the first
    /// outbound command.
    pub fn unlock(&mut self, passphrase: &str) -> Result<(), CryptoError> {
        if self.passphrase.is_some() {
            return Ok(());
        }
        self.private_key
            .unlock(|| passphrase.to_owned(), |_| Ok(()))
            .map_err(|e| CryptoError::UnlockFailed(e.to_string()))?;
        for subkey in &self.private_key.secret_subkeys {
            subkey
                .unlock(|| passphrase.to_owned(), |_| Ok(()))
                .map_err(|e| CryptoError::UnlockFailed(e.to_string()))?;
        }
        self.passphrase = Some(Zeroizing::new(passphrase.to_owned()));
        Ok(())
    }

    pub fn is_unlocked(&self) -> bool {
        self.passphrase.is_some()
    }

    /// Sign `plaintext` with the trader key and encrypt it to `recipient`.
    pub fn sign_encrypt_to(
        &self,
        plaintext: &str,
        recipient: &SignedPublicKey,
    ) -> Result<String, CryptoError> {
        envelope::sign_encrypt(plaintext, &self.private_key, self.passphrase()?, recipient)
    }

    /// Decrypt `armored` with the trader key and verify it against `signer`.
    pub fn decrypt_verify_from(
        &self,
        armored: &str,
        signer: &SignedPublicKey,
    ) -> Result<String, CryptoError> {
        envelope::decrypt_verify(armored, &self.private_key, self.passphrase()?, signer)
    }

    fn passphrase(&self) -> Result<&str, CryptoError> {
        self.passphrase
            .as_deref()
            .map(String::as_str)
            .ok_or(CryptoError::KeyLocked)
    }
}
