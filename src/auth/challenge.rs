// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge issuance and verification.
//!
//! ## Protocol Flow
//!
//! 1. Client posts its address; [`ChallengeIssuer`] stores a fresh nonce and
//!    returns the signing prompt.
//! 2. Client signs the prompt offline (EIP-191 personal_sign) and posts the
//!    signature; [`ChallengeVerifier`] checks freshness, recovers the signer
//!    address, and on success consumes the challenge and mints a session
//!    token.
//!
//! Per identity the state machine is
//! `Unchallenged → Challenged(nonce, issued_at) → {Verified | Rejected}`;
//! a new challenge request always overwrites the outstanding one.

use std::sync::Arc;

use chrono::{Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use uuid::Uuid;

use crate::models::WalletAddress;
use crate::storage::ChallengeDatabase;

use super::{recover::recover_signer, token::SessionTokenIssuer, AuthError};

/// Number of random bytes in a nonce (128 bits hex-encoded).
const NONCE_BYTES: usize = 16;

/// Build the prompt for a nonce.
///
/// The exact wording is part of the wire contract: the client signs this
/// string byte-for-byte, and verification rebuilds it from the stored nonce.
pub fn challenge_message(nonce: &str) -> String {
    format!("Please prove you control this wallet by signing this random text: {nonce}")
}

/// Generate a cryptographically-strong 128-bit hex nonce.
fn generate_nonce(rng: &SystemRandom) -> Result<String, AuthError> {
    let mut bytes = [0u8; NONCE_BYTES];
    rng.fill(&mut bytes)
        .map_err(|_| AuthError::Internal("nonce generation failed".to_string()))?;
    Ok(alloy::hex::encode(bytes))
}

// =============================================================================
// ChallengeIssuer
// =============================================================================

/// Issues one-time signing challenges.
#[derive(Clone)]
pub struct ChallengeIssuer {
    store: Arc<ChallengeDatabase>,
    rng: SystemRandom,
}

impl ChallengeIssuer {
    pub fn new(store: Arc<ChallengeDatabase>) -> Self {
        Self {
            store,
            rng: SystemRandom::new(),
        }
    }

    /// Store a fresh challenge for `address` and return the signing prompt.
    ///
    /// Creates the identity on first contact; subsequent calls overwrite the
    /// outstanding challenge (only the latest nonce is ever valid).
    pub fn issue(&self, address: &WalletAddress) -> Result<String, AuthError> {
        let nonce = generate_nonce(&self.rng)?;
        let issued_at = Utc::now();

        let identity = self.store.upsert_challenge(address, &nonce, issued_at)?;
        tracing::debug!(%address, %identity, "issued challenge");

        Ok(challenge_message(&nonce))
    }
}

// =============================================================================
// ChallengeVerifier
// =============================================================================

/// Verifies signed challenges and mints session tokens.
#[derive(Clone)]
pub struct ChallengeVerifier {
    store: Arc<ChallengeDatabase>,
    tokens: SessionTokenIssuer,
    freshness_window: Duration,
}

impl ChallengeVerifier {
    pub fn new(
        store: Arc<ChallengeDatabase>,
        tokens: SessionTokenIssuer,
        challenge_ttl_secs: i64,
    ) -> Self {
        Self {
            store,
            tokens,
            freshness_window: Duration::seconds(challenge_ttl_secs),
        }
    }

    /// Verify a signature over the outstanding challenge for `address`.
    ///
    /// Succeeds iff a challenge exists, it is within the freshness window,
    /// and the recovered signer equals the claimed address. On success the
    /// challenge is consumed so a captured signature cannot be replayed, and
    /// a session token bound to the identity is returned.
    pub fn verify(
        &self,
        address: &WalletAddress,
        signature: &str,
    ) -> Result<String, AuthError> {
        let (identity, challenge) = self
            .store
            .get_challenge(address)?
            .ok_or(AuthError::IdentityNotFound)?;

        // A stale challenge keeps failing until a new one is issued
        let elapsed = Utc::now().signed_duration_since(challenge.issued_at);
        if elapsed > self.freshness_window {
            return Err(AuthError::ChallengeExpired);
        }

        let message = challenge_message(&challenge.nonce);
        let signer = recover_signer(&message, signature)?;

        if WalletAddress::from(signer) != *address {
            return Err(AuthError::SignatureMismatch);
        }

        // One signature, one login: the first verifier to consume the nonce
        // wins; a concurrent verify that lost the race is turned away even
        // though its snapshot read still saw the challenge.
        if !self.store.consume_challenge(address, &challenge.nonce)? {
            return Err(AuthError::IdentityNotFound);
        }
        tracing::info!(%address, %identity, "wallet verified");

        self.tokens.issue(identity)
    }
}

// =============================================================================
// Tests
// =============================================================================
