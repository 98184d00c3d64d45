//! Reftrack Ledger - durable record of referral credits
//!
//! Maps `(referrer, invited user)` pairs to the moment the invited user
//! joined the target chat. The composite key is the only uniqueness
//! authority: concurrent or replayed credits for the same pair collapse
//! into a single row without any in-process locking.
//!
//! # Layout
//!
//! - `join:{referrer_id}:{user_id}` holds the JSON [`ReferralRecord`]
//! - `join_by_user:{user_id}:{referrer_id}` is an empty index entry used to
//!   purge every credit of a user in one transaction
//!
//! # Example
//!
//! ```no_run
//! use reftrack_ledger::Ledger;
//!
//! let ledger = Ledger::open("referrals.db")?;
//! if ledger.insert_if_absent(555, 777)? {
//!     println!("credited, total = {}", ledger.count(555)?);
//! }
//! # Ok::<(), reftrack_ledger::Error>(())
//! ```

pub mod error;
pub mod ledger;
pub mod record;

pub use error::{Error, Result};
pub use ledger::Ledger;
pub use record::{ReferralRecord, UserId};
