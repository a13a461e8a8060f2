/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! [Trait definition](Membership) for the pluggable membership provider.
//!
//! Discovering peers and detecting their failures is left to the library user (a gossip or heartbeat
//! protocol, a static list, a service registry, ...). A node only asks its provider, once per tick, for
//! the addresses it currently believes to be alive.

use crate::types::Address;

pub trait Membership: Send {
    /// The addresses of the members currently believed to be alive.
    ///
    /// The list can be in any order, and may or may not include the local node.
    fn live_members(&self) -> Vec<Address>;
}

/// A fixed list of members is a valid, if never-changing, membership provider.
impl Membership for Vec<Address> {
    fn live_members(&self) -> Vec<Address> {
        self.clone()
    }
}
