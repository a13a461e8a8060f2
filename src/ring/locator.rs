/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Methods used to decide which members replicate a given key.
//!
//! The coordinator of a key is the first member whose position is at or after the key's position. If the
//! key falls in the arc after the last member (or at or before the first one), the coordinator is the
//! first member. The replica set is the coordinator followed by the next two members walking forward
//! around the ring.
//!
//! Replica sets are derived on every call and never cached: any [refresh](super::HashRing::refresh)
//! can move them.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::types::{Address, Member, RingPosition};

use super::HashRing;

/// Number of members that store each key.
pub const REPLICATION_FACTOR: usize = 3;

/// The place a member takes in a key's [replica set](ReplicaSet).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub enum ReplicaRole {
    Primary,
    Secondary,
    Tertiary,
}

impl ReplicaRole {
    const ORDER: [ReplicaRole; REPLICATION_FACTOR] =
        [ReplicaRole::Primary, ReplicaRole::Secondary, ReplicaRole::Tertiary];
}

/// The members responsible for a key, coordinator first.
///
/// Either empty (the ring has fewer than [REPLICATION_FACTOR] members) or exactly
/// [REPLICATION_FACTOR] distinct members long.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplicaSet(Vec<Member>);

impl ReplicaSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn members(&self) -> &[Member] {
        &self.0
    }

    pub fn coordinator(&self) -> Option<&Member> {
        self.0.first()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.0.iter().any(|member| member.address() == address)
    }

    /// Iterate over the members of the replica set paired with their roles.
    pub fn with_roles(&self) -> impl Iterator<Item = (ReplicaRole, &Member)> {
        ReplicaRole::ORDER.into_iter().zip(self.0.iter())
    }

    /// The role of `address` in this set, if it is a member.
    pub fn role_of(&self, address: &Address) -> Option<ReplicaRole> {
        self.with_roles()
            .find(|(_, member)| member.address() == address)
            .map(|(role, _)| role)
    }
}

impl HashRing {
    /// Compute the replica set of `key` under the current ring.
    pub fn locate(&self, key: &str) -> ReplicaSet {
        self.locate_position(self.key_position(key))
    }

    /// Compute the replica set of a raw ring position under the current ring.
    pub fn locate_position(&self, position: RingPosition) -> ReplicaSet {
        let members = self.members();
        let (first, last) = match (members.first(), members.last()) {
            (Some(first), Some(last)) if members.len() >= REPLICATION_FACTOR => (first, last),
            _ => return ReplicaSet::empty(),
        };

        let coordinator = if position <= first.position() || position > last.position() {
            0
        } else {
            members
                .iter()
                .position(|member| member.position() >= position)
                .unwrap_or(0)
        };

        ReplicaSet(
            (0..REPLICATION_FACTOR)
                .map(|offset| members[(coordinator + offset) % members.len()].clone())
                .collect(),
        )
    }

    /// The two members after the local node on the ring. These hold replicas of the keys that the
    /// local node coordinates.
    ///
    /// Empty if the ring cannot support replication, or the local node has not been placed yet.
    pub fn successors(&self) -> Vec<Member> {
        self.neighbours(|me, offset, len| (me + offset) % len)
    }

    /// The two members before the local node on the ring. The local node holds replicas of the keys
    /// that these members coordinate.
    ///
    /// Empty if the ring cannot support replication, or the local node has not been placed yet.
    pub fn predecessors(&self) -> Vec<Member> {
        self.neighbours(|me, offset, len| (me + len - offset) % len)
    }

    fn neighbours(&self, step: impl Fn(usize, usize, usize) -> usize) -> Vec<Member> {
        let len = self.len();
        match self.my_index() {
            Some(me) if len >= REPLICATION_FACTOR => (1..REPLICATION_FACTOR)
                .map(|offset| self.members()[step(me, offset, len)].clone())
                .collect(),
            _ => Vec::new(),
        }
    }
}
