//! Persistent referral ledger using RocksDB transactions.

use crate::error::{Error, Result};
use crate::record::{ReferralRecord, UserId};
use rocksdb::{Direction, IteratorMode, Options, TransactionDB, TransactionDBOptions};
use std::path::Path;

/// The `channel_joins` ledger.
pub struct Ledger {
    db: TransactionDB,
}

impl Ledger {
    /// Open or create the ledger at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let txn_opts = TransactionDBOptions::default();
        let db = TransactionDB::open(&opts, &txn_opts, path)?;
        Ok(Self { db })
    }

    /// Number of users credited to `referrer_id`. Zero for unknown referrers.
    pub fn count(&self, referrer_id: UserId) -> Result<usize> {
        let prefix = ReferralRecord::referrer_prefix(referrer_id);
        let mut count = 0;

        let iter = self
            .db
            .iterator(IteratorMode::From(prefix.as_bytes(), Direction::Forward));
        for item in iter {
            let (key, _) = item?;
            if key.starts_with(prefix.as_bytes()) {
                count += 1;
            } else {
                break;
            }
        }

        Ok(count)
    }

    /// Get the record for a `(referrer, user)` pair.
    pub fn get(&self, referrer_id: UserId, user_id: UserId) -> Result<Option<ReferralRecord>> {
        let key = ReferralRecord::row_key(referrer_id, user_id);
        match self.db.get(key.as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    /// Credit `user_id` to `referrer_id` unless that pair is already recorded.
    ///
    /// Returns `true` iff a new row was written. The row key is locked
    /// exclusively for the duration of the transaction, so concurrent
    /// calls for the same pair serialize and exactly one of them wins.
    pub fn insert_if_absent(&self, referrer_id: UserId, user_id: UserId) -> Result<bool> {
        let row_key = ReferralRecord::row_key(referrer_id, user_id);
        let txn = self.db.transaction();

        if txn.get_for_update(row_key.as_bytes(), true)?.is_some() {
            txn.rollback()?;
            return Ok(false);
        }

        let record = ReferralRecord::new(referrer_id, user_id);
        txn.put(row_key.as_bytes(), serde_json::to_vec(&record)?)?;
        txn.put(
            ReferralRecord::index_key(user_id, referrer_id).as_bytes(),
            b"",
        )?;
        txn.commit()?;

        tracing::debug!(referrer_id, user_id, "Recorded referral");
        Ok(true)
    }

    /// Remove every credit of `user_id`, whichever referrer it belongs to.
    ///
    /// Returns the number of rows removed; a user with no rows yields 0.
    pub fn delete_by_user(&self, user_id: UserId) -> Result<usize> {
        let prefix = ReferralRecord::user_index_prefix(user_id);
        let txn = self.db.transaction();

        let mut referrers = Vec::new();
        {
            let iter = txn.iterator(IteratorMode::From(prefix.as_bytes(), Direction::Forward));
            for item in iter {
                let (key, _) = item?;
                if !key.starts_with(prefix.as_bytes()) {
                    break;
                }
                referrers.push(parse_index_suffix(&key, &prefix)?);
            }
        }

        let mut removed = 0;
        for referrer_id in referrers {
            let row_key = ReferralRecord::row_key(referrer_id, user_id);
            if txn.get_for_update(row_key.as_bytes(), true)?.is_some() {
                txn.delete(row_key.as_bytes())?;
                removed += 1;
            }
            txn.delete(ReferralRecord::index_key(user_id, referrer_id).as_bytes())?;
        }
        txn.commit()?;

        if removed > 0 {
            tracing::debug!(user_id, removed, "Purged referrals");
        }
        Ok(removed)
    }
}

/// Extract the referrer id from a `join_by_user:{user}:{referrer}` key.
fn parse_index_suffix(key: &[u8], prefix: &str) -> Result<UserId> {
    let key_str = String::from_utf8_lossy(key);
    key_str
        .strip_prefix(prefix)
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| Error::Corrupt(format!("index key {:?}", key_str)))
}
