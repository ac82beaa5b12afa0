// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Challenge-response proof of wallet control.
//!
//! ## Auth Flow
//!
//! 1. Client posts `{ address }` to `/v1/auth/challenge`
//! 2. Server stores a fresh 128-bit nonce for the address and returns the
//!    signing prompt
//! 3. Client signs the prompt with its wallet key (EIP-191 personal_sign)
//! 4. Client posts `{ address, signature }` to `/v1/auth/verify`
//! 5. Server checks the 5-minute freshness window, recovers the signer
//!    address from the signature, and compares it to the claimed address
//! 6. On success the challenge is consumed and a 24-hour JWT bound to the
//!    identity is returned
//!
//! ## Security
//!
//! - The private key never leaves the client; the server only ever sees a
//!   signature over the server-chosen prompt
//! - Nonces are single-use: consumed on success, overwritten on reissue
//! - Malformed and mismatched signatures are indistinguishable to clients

pub mod challenge;
pub mod error;
pub mod recover;
pub mod token;

pub use challenge::{challenge_message, ChallengeIssuer, ChallengeVerifier};
pub use error::AuthError;
pub use recover::recover_signer;
pub use token::{SessionClaims, SessionTokenIssuer};
