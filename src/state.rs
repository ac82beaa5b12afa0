// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{ChallengeIssuer, ChallengeVerifier, SessionTokenIssuer};
use crate::config::AuthConfig;
use crate::storage::ChallengeDatabase;

/// Shared application state.
///
/// The challenge database is the only shared mutable resource; redb
/// serializes its write transactions internally, so a plain `Arc` suffices.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ChallengeDatabase>,
    pub issuer: ChallengeIssuer,
    pub verifier: ChallengeVerifier,
}

impl AppState {
    pub fn new(store: Arc<ChallengeDatabase>, config: &AuthConfig) -> Self {
        let tokens = SessionTokenIssuer::new(&config.token_secret, config.token_ttl_secs);
        let issuer = ChallengeIssuer::new(Arc::clone(&store));
        let verifier =
            ChallengeVerifier::new(Arc::clone(&store), tokens, config.challenge_ttl_secs);

        Self {
            store,
            issuer,
            verifier,
        }
    }
}
