//
// Copyright (c) 2025 ARMORDEX LABS
// This source code is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at https://mozilla.org/MPL/2.0/
//
// Project: armordex — Armored client engine for the Armordex derivatives exchange.
//

//! OpenPGP envelope operations for both exchange streams.
//!
//! The market stream carries ASCII-armored clearsigned JSON; the user stream
//! carries armored messages signed by the sender and encrypted to the
//! recipient. A decrypted user stream payload without a valid signature from
//! the expected key is a protocol error, not a warning, so
//! [`decrypt_verify`] refuses to return plaintext that did not verify.

use pgp::composed::cleartext::CleartextSignedMessage;
use pgp::composed::{Deserializable, Message, SignedPublicKey, SignedSecretKey};
use pgp::crypto::hash::HashAlgorithm;
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use rand::thread_rng;

use crate::error::CryptoError;

/// Parse an ASCII-armored OpenPGP public key.
pub fn parse_public_key(armored: &str) -> Result<SignedPublicKey, CryptoError> {
    let (key, _headers) = SignedPublicKey::from_string(armored)
        .map_err(|e| CryptoError::InvalidKeyFormat(e.to_string()))?;
    Ok(key)
}

/// Parse an ASCII-armored OpenPGP private key. The key stays locked; see
/// [`TraderIdentity::unlock`](crate::trader::TraderIdentity::unlock).
pub fn parse_secret_key(armored: &str) -> Result<SignedSecretKey, CryptoError> {
    let (key, _headers) = SignedSecretKey::from_string(armored)
        .map_err(|e| CryptoError::InvalidKeyFormat(e.to_string()))?;
    Ok(key)
}

/// Produce an armored clearsigned message whose canonical text equals `text`.
pub fn sign_clearsigned(
    text: &str,
    signer: &SignedSecretKey,
    passphrase: &str,
) -> Result<String, CryptoError> {
    let mut rng = thread_rng();
    let signed = CleartextSignedMessage::sign(&mut rng, text, signer, || passphrase.to_owned())
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
    signed
        .to_armored_string(Default::default())
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))
}

/// Verify an armored clearsigned blob against `signer` and return its text.
pub fn verify_clearsigned(blob: &str, signer: &SignedPublicKey) -> Result<String, CryptoError> {
    let (signed, _headers) = CleartextSignedMessage::from_string(blob)
        .map_err(|e| CryptoError::DecryptFailed(e.to_string()))?;
    signed
        .verify(signer)
        .map_err(|_| CryptoError::SignatureInvalid)?;
    Ok(signed.signed_text())
}

/// Sign `plaintext` with `signer` and encrypt it to `recipient`, returning
/// the armored ciphertext.
pub fn sign_encrypt(
    plaintext: &str,
    signer: &SignedSecretKey,
    passphrase: &str,
    recipient: &SignedPublicKey,
) -> Result<String, CryptoError> {
    let mut rng = thread_rng();
    let signed = Message::new_literal("", plaintext)
        .sign(&mut rng, signer, || passphrase.to_owned(), HashAlgorithm::SHA2_256)
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
    // Encrypt to the first subkey when one exists, to the primary otherwise.
    let encrypted = match recipient.public_subkeys.first() {
        Some(subkey) => {
            signed.encrypt_to_keys_seipdv1(&mut rng, SymmetricKeyAlgorithm::AES256, &[subkey])
        }
        None => {
            signed.encrypt_to_keys_seipdv1(&mut rng, SymmetricKeyAlgorithm::AES256, &[recipient])
        }
    }
    .map_err(|e| CryptoError::EncryptFailed(e.to_string()))?;
    encrypted
        .to_armored_string(Default::default())
        .map_err(|e| CryptoError::EncryptFailed(e.to_string()))
}

/// Decrypt an armored ciphertext with `recipient` and verify the signature
/// against `signer`, returning the plaintext.
pub fn decrypt_verify(
    armored: &str,
    recipient: &SignedSecretKey,
    passphrase: &str,
    signer: &SignedPublicKey,
) -> Result<String, CryptoError> {
    let (message, _headers) =
        Message::from_string(armored).map_err(|e| CryptoError::DecryptFailed(e.to_string()))?;
    let (decrypted, _key_ids) = message
        .decrypt(|| passphrase.to_owned(), &[recipient])
        .map_err(|e| CryptoError::DecryptFailed(e.to_string()))?;
    let decrypted = decrypted
        .decompress()
        .map_err(|e| CryptoError::DecryptFailed(e.to_string()))?;
    decrypted
        .verify(signer)
        .map_err(|_| CryptoError::SignatureInvalid)?;
    let content = decrypted
        .get_content()
        .map_err(|e| CryptoError::DecryptFailed(e.to_string()))?
        .ok_or_else(|| CryptoError::DecryptFailed("empty message".to_owned()))?;
    String::from_utf8(content).map_err(|e| CryptoError::DecryptFailed(e.to_string()))
}
