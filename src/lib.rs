/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! A replicated key-value store node built on a consistent-hash ring.
//!
//! Every live node takes a position on a ring of fixed size by hashing its address. A key is stored on a
//! replica set of three consecutive ring members, starting at the first member at or after the key's
//! own position. A node that receives a client operation coordinates it: it sends one request to each
//! replica and decides the operation once two of the three replicas agree, or once the operation times
//! out. When the ring changes, every node re-sends the keys it holds to their new replica sets.
//!
//! The node is driven by its owner, one [tick](node::Node::tick) at a time. The transport, the membership
//! provider, and the local store are pluggable through the [Network](networking::Network),
//! [Membership](membership::Membership), and [KVStore](store::KVStore) traits.

pub mod config;

pub mod events;

pub mod logging;

pub mod membership;

pub mod messages;

pub mod networking;

pub mod node;

pub mod ring;

pub mod stabilization;

pub mod store;

pub mod transactions;

pub mod types;

pub(crate) mod event_bus;

pub(crate) mod protocol;
