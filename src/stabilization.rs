/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The stabilization protocol, which re-propagates locally held keys to their current replica sets after
//! the ring changes.
//!
//! When a node joins or leaves, the replica sets of some keys move. Whenever a node's
//! [ring](crate::ring::HashRing) reports a [structural change](crate::ring::RingChange::Changed), the node
//! walks every key in its local store, recomputes the key's replica set under the new ring, and sends a
//! repair-tagged create carrying its local value to every member of that set, itself included if it is
//! still a replica.
//!
//! Repair creates are idempotent: a receiver that already holds the key keeps its value, and a receiver
//! that lacks the key adopts it. Receivers never reply to them.
//!
//! ## Limitations
//!
//! Stabilization is best effort:
//! - Keys are never removed from nodes that have dropped out of their replica set, so stale copies
//!   persist across churn.
//! - Divergent values are not reconciled. Whichever value a replica holds first is the one it keeps.

use crate::messages::Message;
use crate::ring::HashRing;
use crate::store::KVStore;
use crate::types::Address;

/// A repair message and the replica it is for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repair {
    pub destination: Address,
    pub message: Message,
}

/// Compute the repair messages that re-propagate every entry of `store` to its replica set under `ring`.
///
/// Yields nothing for a ring that cannot support replication.
pub fn plan_repairs<K: KVStore>(ring: &HashRing, store: &K) -> Vec<Repair> {
    let mut repairs = Vec::new();
    for (key, value) in store.entries() {
        let replicas = ring.locate(&key);
        for (role, replica) in replicas.with_roles() {
            repairs.push(Repair {
                destination: replica.address().clone(),
                message: Message::repair(ring.me().clone(), key.clone(), value.clone(), role),
            });
        }
    }
    repairs
}
