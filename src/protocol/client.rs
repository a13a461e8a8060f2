/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Client side of the CRUD protocol: fanning an operation out to its replica set.

use crate::messages::{Message, Operation};
use crate::networking::{Network, SenderHandle};
use crate::ring::HashRing;
use crate::transactions::TransactionTracker;
use crate::types::{LogicalTime, TransactionID};

/// Allocates transaction ids and issues requests on behalf of the local node.
pub(crate) struct Client {
    next_transaction: TransactionID,
}

impl Client {
    pub(crate) fn new() -> Self {
        Self {
            next_transaction: TransactionID::init(),
        }
    }

    /// Send `operation` to every member of its key's replica set and start tracking it.
    ///
    /// Returns the id of the new transaction, or `None` if the ring is too small to have replica sets,
    /// in which case nothing is sent, no transaction is opened, and no id is used up.
    pub(crate) fn issue<N: Network>(
        &mut self,
        operation: Operation,
        now: LogicalTime,
        ring: &HashRing,
        tracker: &mut TransactionTracker,
        sender: &mut SenderHandle<N>,
    ) -> Option<TransactionID> {
        let replicas = ring.locate(operation.key());
        if replicas.is_empty() {
            return None;
        }

        let transaction = self.next_transaction;
        self.next_transaction = transaction.next();

        tracker.open(
            transaction,
            now,
            operation.kind(),
            operation.key().to_string(),
            operation.value().map(str::to_string),
        );

        for (role, replica) in replicas.with_roles() {
            let request = Message::request(transaction, ring.me().clone(), &operation, role);
            sender.send(replica.address(), request);
        }

        Some(transaction)
    }
}
