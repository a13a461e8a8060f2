/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The consistent-hash ring that decides which nodes replicate which keys.
//!
//! Every node, including the local one, is placed on the ring at the position obtained by hashing its
//! [address](crate::types::Address) with [ring_position]. Keys are hashed with the same function, and a key
//! is replicated by the first node at or after its position and by that node's two successors (see
//! [locator]).
//!
//! ## Refreshing the ring
//!
//! The ring is rebuilt from scratch every time the [membership provider](crate::membership::Membership)
//! is polled. [HashRing::refresh] compares the rebuilt ring with the previous one and reports whether
//! the placement of nodes changed in a way that can move keys between replica sets
//! ([RingChange::Changed]), in which case the owner of the ring must run
//! [stabilization](crate::stabilization).
//!
//! The comparison is positional: two rings are considered the same if they have the same number of
//! members and the members at each index sit at the same ring positions.

pub mod locator;

use sha2::{Digest, Sha256};

use crate::types::{Address, Member, RingPosition, RingSize};

/// Hash `bytes` into the ring space.
///
/// This is the first 8 bytes of the SHA-256 digest of `bytes`, read as a big-endian integer, modulo
/// `ring_size`. The function is pure, so a key or an address always lands on the same position, in this
/// process and in every other process using the same ring size.
pub fn ring_position(bytes: &[u8], ring_size: RingSize) -> RingPosition {
    let digest = Sha256::digest(bytes);
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    RingPosition::new(u64::from_be_bytes(prefix) % ring_size.int())
}

/// Whether a call to [HashRing::refresh] changed the placement of members.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingChange {
    Changed,
    Unchanged,
}

impl RingChange {
    pub fn is_changed(self) -> bool {
        self == RingChange::Changed
    }
}

/// An ordered set of [members](Member) that always includes the local node once it has been refreshed.
///
/// Members are kept sorted by [ring position](Member#ordering-of-members) and are unique by address.
#[derive(Clone, Debug)]
pub struct HashRing {
    me: Address,
    ring_size: RingSize,
    members: Vec<Member>,
}

impl HashRing {
    /// Create an empty ring for the node at `me`. The first [refresh](Self::refresh) always reports
    /// [RingChange::Changed].
    pub fn new(me: Address, ring_size: RingSize) -> Self {
        Self {
            me,
            ring_size,
            members: Vec::new(),
        }
    }

    /// Create a ring from explicitly placed members. The order of `members` does not matter.
    pub fn from_members(me: Address, ring_size: RingSize, members: Vec<Member>) -> Self {
        Self {
            me,
            ring_size,
            members: sorted_unique(members),
        }
    }

    /// Rebuild the ring from the current list of live members plus the local node.
    ///
    /// `live_members` may be in any order, and may or may not contain the local node.
    pub fn refresh(&mut self, live_members: impl IntoIterator<Item = Address>) -> RingChange {
        let candidate = sorted_unique(
            live_members
                .into_iter()
                .chain(std::iter::once(self.me.clone()))
                .map(|address| Member::new(address, self.ring_size))
                .collect(),
        );

        let change = if self.members.len() != candidate.len() {
            RingChange::Changed
        } else if self
            .members
            .iter()
            .zip(candidate.iter())
            .any(|(old, new)| old.position() != new.position())
        {
            RingChange::Changed
        } else {
            RingChange::Unchanged
        };

        self.members = candidate;
        change
    }

    /// The members of the ring, in ascending order of ring position.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The address of the local node.
    pub fn me(&self) -> &Address {
        &self.me
    }

    pub fn ring_size(&self) -> RingSize {
        self.ring_size
    }

    /// Position of `key` in this ring's space.
    pub fn key_position(&self, key: &str) -> RingPosition {
        ring_position(key.as_bytes(), self.ring_size)
    }

    /// Index of the local node in [members](Self::members), if it has been placed.
    pub fn my_index(&self) -> Option<usize> {
        self.members.iter().position(|member| member.address() == &self.me)
    }
}

// Sort members by position (ties by address) and drop repeated addresses.
fn sorted_unique(mut members: Vec<Member>) -> Vec<Member> {
    members.sort_by(|a, b| a.address().cmp(b.address()));
    members.dedup_by(|a, b| a.address() == b.address());
    members.sort();
    members
}
