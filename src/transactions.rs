/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The [TransactionTracker], which turns the raw replies to a fanned-out client operation into a single
//! quorum-decided [Outcome].
//!
//! Every client operation issued by a node opens one [Transaction]. Each reply that replicas send back
//! is collected into its transaction, and once per tick the tracker is [swept](TransactionTracker::sweep)
//! to decide which transactions are finished. With a [replication factor](REPLICATION_FACTOR) of 3 and a
//! [quorum](QUORUM) of 2, a pending transaction is decided as follows, in this order:
//! 1. If all 3 replicas replied, it succeeds iff at least 2 replies were successes.
//! 2. If 2 replies were successes, it succeeds without waiting for the third.
//! 3. If 2 replies were failures, it fails without waiting for the third.
//! 4. If more than the timeout has elapsed since it was opened, it times out.
//! 5. Otherwise it stays pending.
//!
//! Decided transactions are removed from the pending set and their success is remembered in a completed
//! record. Replies for transactions that are not pending (already decided, or never opened by this node)
//! are discarded.

use std::collections::{BTreeMap, HashMap};

use crate::ring::locator::REPLICATION_FACTOR;
use crate::types::{LogicalTime, OperationKind, TransactionID};

/// Number of matching replies needed to decide a transaction.
pub const QUORUM: usize = REPLICATION_FACTOR / 2 + 1;

/// Number of time units a transaction may stay pending before it times out.
pub const DEFAULT_TRANSACTION_TIMEOUT: u64 = 10;

/// A client operation awaiting replies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    id: TransactionID,
    created_at: LogicalTime,
    kind: OperationKind,
    key: String,
    value: Option<String>,
    reply_count: usize,
    success_count: usize,
}

impl Transaction {
    fn new(
        id: TransactionID,
        created_at: LogicalTime,
        kind: OperationKind,
        key: String,
        value: Option<String>,
    ) -> Self {
        Self {
            id,
            created_at,
            kind,
            key,
            value,
            reply_count: 0,
            success_count: 0,
        }
    }

    pub fn id(&self) -> TransactionID {
        self.id
    }

    pub fn created_at(&self) -> LogicalTime {
        self.created_at
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value written by the operation, or for reads, the value carried by the latest successful read
    /// reply.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn reply_count(&self) -> usize {
        self.reply_count
    }

    pub fn success_count(&self) -> usize {
        self.success_count
    }

    pub fn failure_count(&self) -> usize {
        self.reply_count - self.success_count
    }

    fn collect(&mut self, success: bool) {
        self.reply_count += 1;
        if success {
            self.success_count += 1;
        }
    }

    /// Decide the transaction, if the replies collected so far or the time elapsed allow it.
    fn decide(&self, now: LogicalTime, timeout: u64) -> Option<Outcome> {
        if self.reply_count >= REPLICATION_FACTOR {
            if self.success_count >= QUORUM {
                Some(Outcome::Succeeded)
            } else {
                Some(Outcome::Failed)
            }
        } else if self.success_count >= QUORUM {
            Some(Outcome::Succeeded)
        } else if self.failure_count() >= QUORUM {
            Some(Outcome::Failed)
        } else if now.elapsed_since(self.created_at) > timeout {
            Some(Outcome::TimedOut)
        } else {
            None
        }
    }
}

/// How a transaction was decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A quorum of replicas reported success.
    Succeeded,
    /// A quorum of replicas reported failure, or all replied without a quorum of successes.
    Failed,
    /// Too few replies arrived before the timeout.
    TimedOut,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Succeeded
    }
}

/// A transaction that a [sweep](TransactionTracker::sweep) removed from the pending set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub transaction: Transaction,
    pub outcome: Outcome,
}

/// Owns every pending transaction of a node.
#[derive(Clone, Debug)]
pub struct TransactionTracker {
    timeout: u64,
    pending: BTreeMap<TransactionID, Transaction>,
    completed: HashMap<TransactionID, bool>,
}

impl TransactionTracker {
    pub fn new(timeout: u64) -> Self {
        Self {
            timeout,
            pending: BTreeMap::new(),
            completed: HashMap::new(),
        }
    }

    /// Start tracking a client operation that was just fanned out.
    ///
    /// Opening an id that is already pending replaces the pending transaction.
    pub fn open(
        &mut self,
        id: TransactionID,
        now: LogicalTime,
        kind: OperationKind,
        key: String,
        value: Option<String>,
    ) {
        self.pending
            .insert(id, Transaction::new(id, now, kind, key, value));
    }

    /// Collect a reply to a create, update, or delete. Returns whether `id` was pending.
    pub fn collect_reply(&mut self, id: TransactionID, success: bool) -> bool {
        match self.pending.get_mut(&id) {
            Some(transaction) => {
                transaction.collect(success);
                true
            }
            None => false,
        }
    }

    /// Collect a reply to a read. A reply that carries a value is a success, and its value replaces the
    /// transaction's. Returns whether `id` was pending.
    pub fn collect_read_reply(&mut self, id: TransactionID, value: Option<String>) -> bool {
        match self.pending.get_mut(&id) {
            Some(transaction) => {
                transaction.collect(value.is_some());
                if value.is_some() {
                    transaction.value = value;
                }
                true
            }
            None => false,
        }
    }

    /// Decide every pending transaction that can be decided at time `now`, and remove them from the
    /// pending set. Resolutions are returned in ascending order of transaction id.
    pub fn sweep(&mut self, now: LogicalTime) -> Vec<Resolution> {
        let timeout = self.timeout;
        let decided: Vec<(TransactionID, Outcome)> = self
            .pending
            .iter()
            .filter_map(|(id, transaction)| {
                transaction
                    .decide(now, timeout)
                    .map(|outcome| (*id, outcome))
            })
            .collect();

        let mut resolutions = Vec::with_capacity(decided.len());
        for (id, outcome) in decided {
            if let Some(transaction) = self.pending.remove(&id) {
                self.completed.insert(id, outcome.is_success());
                resolutions.push(Resolution {
                    transaction,
                    outcome,
                });
            }
        }
        resolutions
    }

    pub fn pending(&self, id: TransactionID) -> Option<&Transaction> {
        self.pending.get(&id)
    }

    pub fn is_pending(&self, id: TransactionID) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Whether a decided transaction succeeded. `None` if `id` has not been decided.
    pub fn completed(&self, id: TransactionID) -> Option<bool> {
        self.completed.get(&id).copied()
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }
}

impl Default for TransactionTracker {
    fn default() -> Self {
        TransactionTracker::new(DEFAULT_TRANSACTION_TIMEOUT)
    }
}
