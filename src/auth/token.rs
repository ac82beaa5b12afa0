// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuance.
//!
//! A successful verification mints an HS256 JWT binding the identity's
//! stable uuid (not the raw address, so addresses can be re-keyed without
//! invalidating the claim format). Tokens are self-contained: nothing is
//! persisted server-side, and downstream middleware validates them with
//! [`SessionTokenIssuer::decode`].

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthError;

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Identity uuid (stable reference, survives address migration)
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds): `iat` + token lifetime
    pub exp: i64,
}

/// Issues signed, time-limited session credentials.
#[derive(Clone)]
pub struct SessionTokenIssuer {
    secret: String,
    ttl_secs: i64,
}

impl SessionTokenIssuer {
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    /// Sign a session token for a verified identity.
    pub fn issue(&self, identity: Uuid) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: identity.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("token signing: {e}")))
    }

    /// Validate a bearer token and extract its claims.
    ///
    /// This is the boundary consumed by downstream protected resources:
    /// signature check, expiry check, identity extraction.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}
