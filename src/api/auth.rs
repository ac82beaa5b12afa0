// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication API endpoints.
//!
//! Transport layer for the challenge-response protocol: parses request
//! bodies, hands them to the protocol components, and maps typed rejections
//! to status codes via [`AuthError`]'s `IntoResponse`.

use axum::{extract::State, Json};

use crate::{
    auth::AuthError,
    models::{ChallengeRequest, ChallengeResponse, VerifyRequest, VerifyResponse, WalletAddress},
    state::AppState,
};

/// Issue a fresh signing challenge for a wallet address.
///
/// Creates the identity on first contact. Repeated calls overwrite the
/// outstanding challenge; only the most recent prompt can be verified.
#[utoipa::path(
    post,
    path = "/v1/auth/challenge",
    tag = "Auth",
    request_body = ChallengeRequest,
    responses(
        (status = 200, description = "Challenge issued", body = ChallengeResponse),
        (status = 400, description = "Invalid wallet address"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn issue_challenge(
    State(state): State<AppState>,
    Json(request): Json<ChallengeRequest>,
) -> Result<Json<ChallengeResponse>, AuthError> {
    let address =
        WalletAddress::parse(&request.address).map_err(|_| AuthError::InvalidAddress)?;

    let message = state.issuer.issue(&address)?;
    Ok(Json(ChallengeResponse { message }))
}

/// Verify a signed challenge and mint a session token.
///
/// The signature must cover the exact prompt returned by the challenge
/// endpoint, produced with EIP-191 personal_sign by the key controlling the
/// claimed address.
#[utoipa::path(
    post,
    path = "/v1/auth/verify",
    tag = "Auth",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Wallet verified, session token issued", body = VerifyResponse),
        (status = 400, description = "Invalid wallet address"),
        (status = 401, description = "Unknown identity, stale challenge, or invalid signature"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, AuthError> {
    let address =
        WalletAddress::parse(&request.address).map_err(|_| AuthError::InvalidAddress)?;

    let access_token = state.verifier.verify(&address, &request.signature)?;
    Ok(Json(VerifyResponse {
        address,
        access_token,
    }))
}
