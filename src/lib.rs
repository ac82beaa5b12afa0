// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet Auth Server - Ethereum Challenge-Response Authentication
//!
//! This crate authenticates users by proving control of an Ethereum account
//! private key. The server issues a one-time signing challenge, the client
//! signs it offline (EIP-191 personal_sign), and the server recovers the
//! signer address from the signature before minting a time-bound JWT.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Challenge issuance, signature recovery, session tokens
//! - `storage` - Persistent challenge store (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod state;
pub mod storage;
