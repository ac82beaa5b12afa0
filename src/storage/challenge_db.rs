// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded challenge store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `identities`: canonical address → identity uuid (created once, never deleted)
//! - `challenges`: canonical address → serialized StoredChallenge (1:1, overwritten)
//!
//! The whole find-or-create-or-replace sequence of [`ChallengeDatabase::upsert_challenge`]
//! runs inside a single write transaction, so two concurrent requests for the
//! same address can never interleave into a half-written state: the store
//! always ends up holding exactly one of the competing nonces.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::WalletAddress;

// =============================================================================
// Table Definitions
// =============================================================================

/// Identity table: canonical address → identity uuid string.
const IDENTITIES: TableDefinition<&str, &str> = TableDefinition::new("identities");

/// Challenge table: canonical address → serialized StoredChallenge (JSON bytes).
const CHALLENGES: TableDefinition<&str, &[u8]> = TableDefinition::new("challenges");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChallengeDbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt identity record: {0}")]
    CorruptIdentity(#[from] uuid::Error),
}

pub type ChallengeDbResult<T> = Result<T, ChallengeDbError>;

// =============================================================================
// Stored Records
// =============================================================================

/// Outstanding proof-of-control challenge for one identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredChallenge {
    /// One-time random token embedded in the signing prompt.
    pub nonce: String,
    /// Wall-clock issuance time; verification must happen within the
    /// freshness window measured from here.
    pub issued_at: DateTime<Utc>,
}

// =============================================================================
// ChallengeDatabase
// =============================================================================

/// Embedded ACID identity-and-challenge database.
#[derive(Debug)]
pub struct ChallengeDatabase {
    db: Database,
}

impl ChallengeDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> ChallengeDbResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(IDENTITIES)?;
            let _ = write_txn.open_table(CHALLENGES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Attach a fresh challenge to an address, creating the identity if this
    /// is its first challenge request.
    ///
    /// Find-or-create of the identity row and replacement of the challenge
    /// happen in one write transaction; on any failure the transaction rolls
    /// back and no partial state is observable. Returns the identity uuid.
    pub fn upsert_challenge(
        &self,
        address: &WalletAddress,
        nonce: &str,
        issued_at: DateTime<Utc>,
    ) -> ChallengeDbResult<Uuid> {
        let record = StoredChallenge {
            nonce: nonce.to_string(),
            issued_at,
        };
        let json = serde_json::to_vec(&record)?;

        let write_txn = self.db.begin_write()?;
        let identity = {
            let mut identities = write_txn.open_table(IDENTITIES)?;
            let existing = identities
                .get(address.as_str())?
                .map(|v| v.value().to_string());

            let identity = match existing {
                Some(raw) => Uuid::parse_str(&raw)?,
                None => {
                    let id = Uuid::new_v4();
                    identities.insert(address.as_str(), id.to_string().as_str())?;
                    id
                }
            };

            let mut challenges = write_txn.open_table(CHALLENGES)?;
            challenges.insert(address.as_str(), json.as_slice())?;

            identity
        };
        write_txn.commit()?;

        Ok(identity)
    }

    /// Load the outstanding challenge for an address.
    ///
    /// Returns `None` when the identity does not exist or has no outstanding
    /// challenge (e.g. it was consumed by a successful verification).
    pub fn get_challenge(
        &self,
        address: &WalletAddress,
    ) -> ChallengeDbResult<Option<(Uuid, StoredChallenge)>> {
        let read_txn = self.db.begin_read()?;

        let identities = read_txn.open_table(IDENTITIES)?;
        let Some(identity_raw) = identities.get(address.as_str())? else {
            return Ok(None);
        };
        let identity = Uuid::parse_str(identity_raw.value())?;

        let challenges = read_txn.open_table(CHALLENGES)?;
        match challenges.get(address.as_str())? {
            Some(value) => {
                let record: StoredChallenge = serde_json::from_slice(value.value())?;
                Ok(Some((identity, record)))
            }
            None => Ok(None),
        }
    }

    /// Delete the outstanding challenge for an address if its nonce still
    /// matches `expected_nonce`.
    ///
    /// The nonce guard makes consumption atomic with respect to a concurrent
    /// reissue: a verification that raced with a new challenge request never
    /// deletes the newer nonce. The identity row is kept. Returns whether a
    /// challenge was removed.
    pub fn consume_challenge(
        &self,
        address: &WalletAddress,
        expected_nonce: &str,
    ) -> ChallengeDbResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut challenges = write_txn.open_table(CHALLENGES)?;

            let matches = match challenges.get(address.as_str())? {
                Some(value) => {
                    let record: StoredChallenge = serde_json::from_slice(value.value())?;
                    record.nonce == expected_nonce
                }
                None => false,
            };

            if matches {
                challenges.remove(address.as_str())?;
            }
            matches
        };
        write_txn.commit()?;

        Ok(removed)
    }

    /// Cheap storage reachability check for health probes.
    pub fn ping(&self) -> ChallengeDbResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(IDENTITIES)?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
