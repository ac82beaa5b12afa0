// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Challenge Storage Module
//!
//! Persistent identity-and-challenge records backed by redb. The database is
//! the only shared mutable state in the service; every mutation goes through
//! a single ACID write transaction, which is the sole coordination primitive
//! the protocol needs (per-identity challenge replacement is linearizable).

pub mod challenge_db;

pub use challenge_db::{ChallengeDatabase, ChallengeDbError, ChallengeDbResult, StoredChallenge};
