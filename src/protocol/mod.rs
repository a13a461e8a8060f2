/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The CRUD protocol, which nodes use to create, read, update, and delete replicated keys.
//!
//! Every node plays two roles in the protocol:
//! 1. [Client](client): a node that is asked to carry out an operation on a key becomes the operation's
//!    coordinator. It locates the key's replica set, sends one request to each replica (all sharing one
//!    fresh [transaction id](crate::types::TransactionID)), and opens a
//!    [transaction](crate::transactions::Transaction) that collects the replies.
//! 2. [Server](server): a node that receives a request applies it to its local
//!    [store](crate::store::KVStore), reports the outcome to its audit trail, and replies to the
//!    coordinator.
//!
//! Requests tagged with [TransactionID::REPAIR](crate::types::TransactionID::REPAIR) come from
//! [stabilization](crate::stabilization) rather than from a client. Servers never reply to them, and a
//! repair create never overwrites a key that the server already holds.

pub(crate) mod client;

pub(crate) mod server;
