// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EIP-191 personal_sign signature recovery.
//!
//! The signed payload is the UTF-8 message prefixed with
//! `"\x19Ethereum Signed Message:\n"` and the message length before
//! Keccak-256 hashing, so challenge signatures cannot be confused with
//! signatures over transactions or other protocol data. Recovery derives the
//! signer's address directly from the signature; no public-key lookup exists.

use alloy::primitives::{Address, Signature};

use super::AuthError;

/// Recover the address that produced `signature` over `message`.
///
/// `signature` is the 65-byte `r || s || v` form as hex, with or without the
/// `0x` prefix. Pure function; any parse or curve failure is
/// [`AuthError::MalformedSignature`].
pub fn recover_signer(message: &str, signature: &str) -> Result<Address, AuthError> {
    let signature: Signature = signature
        .trim()
        .parse()
        .map_err(|e| AuthError::MalformedSignature(format!("parse: {e}")))?;

    signature
        .recover_address_from_msg(message)
        .map_err(|e| AuthError::MalformedSignature(format!("recovery: {e}")))
}
