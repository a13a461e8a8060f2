/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions of ringstore events, for auditing, event handling, and logging.
//!
//! An event for a given action indicates that the action has been completed. The two operation events
//! together form the audit trail of a node:
//! - [ServeOperationEvent]: this node, acting as a replica, applied a request to its local store.
//! - [ResolveTransactionEvent]: this node, acting as coordinator, decided the outcome of a client
//!   operation it issued.
//!
//! Events are published synchronously, from inside the [tick](crate::node::Node::tick) that caused
//! them, to the handlers registered on the [NodeSpec](crate::node::NodeSpec).

use crate::transactions::Outcome;
use crate::types::{Address, LogicalTime, Member, OperationKind, TransactionID};

#[derive(Clone, Debug)]
pub enum Event {
    // Events in the audit trail.
    ServeOperation(ServeOperationEvent),
    ResolveTransaction(ResolveTransactionEvent),
    // Events that change the ring or the placement of keys.
    UpdateRing(UpdateRingEvent),
    Stabilize(StabilizeEvent),
    // Client operations that could not be issued.
    DropOperation(DropOperationEvent),
}

/// A replica applied a (non-repair) request to its local store.
#[derive(Clone, Debug)]
pub struct ServeOperationEvent {
    pub timestamp: LogicalTime,
    /// The replica that served the request.
    pub node: Address,
    /// The coordinator that sent the request.
    pub origin: Address,
    pub transaction: TransactionID,
    pub kind: OperationKind,
    pub key: String,
    /// The value written by a create or update, or the value found by a read.
    pub value: Option<String>,
    pub success: bool,
}

/// A coordinator decided the outcome of a client operation.
#[derive(Clone, Debug)]
pub struct ResolveTransactionEvent {
    pub timestamp: LogicalTime,
    /// The coordinator.
    pub node: Address,
    pub transaction: TransactionID,
    pub kind: OperationKind,
    pub key: String,
    /// The value written by a create or update, or the value returned by a successful read.
    pub value: Option<String>,
    pub outcome: Outcome,
}

/// The ring changed structurally. `members` is the new ring in ascending order of position.
#[derive(Clone, Debug)]
pub struct UpdateRingEvent {
    pub timestamp: LogicalTime,
    pub node: Address,
    pub members: Vec<Member>,
}

/// A node re-sent its keys to their current replica sets after a ring change.
#[derive(Clone, Debug)]
pub struct StabilizeEvent {
    pub timestamp: LogicalTime,
    pub node: Address,
    /// Number of locally held keys walked.
    pub keys: usize,
    /// Number of repair messages sent.
    pub repairs: usize,
}

/// A client operation was dropped before any request was sent, because the ring has too few members
/// to form a replica set.
#[derive(Clone, Debug)]
pub struct DropOperationEvent {
    pub timestamp: LogicalTime,
    pub node: Address,
    pub kind: OperationKind,
    pub key: String,
}
