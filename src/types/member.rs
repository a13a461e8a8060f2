/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The [Member] type: a node as placed on a [hash ring](crate::ring::HashRing).

use std::cmp::Ordering;

use crate::ring::ring_position;

use super::basic::{Address, RingPosition, RingSize};

/// A node's address together with its position on the ring.
///
/// ## Ordering of members
///
/// Members are ordered by ring position. Distinct addresses should not hash to the same position, but
/// when they do the tie is broken by comparing address bytes, so a ring always has a total order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Member {
    address: Address,
    position: RingPosition,
}

impl Member {
    /// Place `address` on a ring with `ring_size` positions.
    pub fn new(address: Address, ring_size: RingSize) -> Self {
        let position = ring_position(address.bytes(), ring_size);
        Self { address, position }
    }

    /// Create a member at an explicit position, bypassing the hash function.
    pub fn with_position(address: Address, position: RingPosition) -> Self {
        Self { address, position }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub const fn position(&self) -> RingPosition {
        self.position
    }
}

impl Ord for Member {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position
            .cmp(&other.position)
            .then_with(|| self.address.cmp(&other.address))
    }
}

impl PartialOrd for Member {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
