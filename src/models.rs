// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the authentication API, plus the
//! [`WalletAddress`] canonical address type. All wire types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! ## Wallet Address Type
//!
//! [`WalletAddress`] is the single normalization boundary for Ethereum-style
//! addresses. Every entry point (challenge issuance, verification, storage
//! key derivation) goes through [`WalletAddress::parse`], so identity
//! matching is case-insensitive everywhere by construction.

use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Canonical Ethereum-compatible wallet address.
///
/// Always holds the lowercase `0x`-prefixed 40-hex-character form, so string
/// equality is identity equality. Construct via [`WalletAddress::parse`];
/// malformed input never produces a value of this type (deserialization
/// funnels through `parse` as well).
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq, Hash)]
pub struct WalletAddress(String);

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        WalletAddress::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Raised when an address is not a valid 20-byte hex string.
#[derive(Debug, thiserror::Error)]
#[error("invalid wallet address")]
pub struct InvalidAddress;

impl WalletAddress {
    /// Parse and normalize an address from client input.
    ///
    /// Accepts any case (checksummed or not), with or without the `0x`
    /// prefix, and canonicalizes to lowercase `0x…`.
    pub fn parse(raw: &str) -> Result<Self, InvalidAddress> {
        let addr = Address::from_str(raw.trim()).map_err(|_| InvalidAddress)?;
        Ok(Self(format!("{addr:#x}")))
    }

    /// The canonical lowercase string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Address> for WalletAddress {
    fn from(addr: Address) -> Self {
        Self(format!("{addr:#x}"))
    }
}

// =============================================================================
// Authentication Requests & Responses
// =============================================================================

/// Request to obtain a fresh signing challenge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChallengeRequest {
    /// Wallet address claiming to authenticate (any case).
    pub address: String,
}

/// Response carrying the prompt the client must sign verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChallengeResponse {
    /// Human-readable prompt embedding the one-time nonce.
    pub message: String,
}

/// Request to verify a signed challenge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyRequest {
    /// Wallet address claiming to authenticate (any case).
    pub address: String,
    /// Hex-encoded 65-byte personal_sign signature over the prompt.
    pub signature: String,
}

/// Response after successful verification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    /// Canonical (lowercase) wallet address that was verified.
    pub address: WalletAddress,
    /// Signed session token, valid for 24 hours.
    #[serde(rename = "accessToken")]
    pub access_token: String,
}
