/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Methods to build, start, and drive a node.
//!
//! A node places itself and its live peers on a [hash ring](crate::ring), stores the keys whose replica
//! sets it belongs to, coordinates the client operations it is asked to carry out, and repairs replica
//! placement when the ring changes.
//!
//! The key components of this module are:
//! - The builder-pattern interface to construct a [specification of the node](NodeSpec) with:
//!   1. `NodeSpec::builder` to construct a `NodeSpecBuilder`,
//!   2. The setters of the `NodeSpecBuilder`, and
//!   3. The `NodeSpecBuilder::build` method to construct a [NodeSpec],
//! - The function to [start](NodeSpec::start) a [Node] given its specification,
//! - [The type](Node) that owns all of the node's state, and the [tick](Node::tick) that drives it.
//!
//! ## Starting a node
//!
//! Here is an example that demonstrates how to build and start a node using the builder pattern:
//!
//! ```ignore
//! let mut node =
//!     NodeSpec::builder()
//!     .network(network)
//!     .membership(membership)
//!     .kv_store(MemStore::new())
//!     .configuration(configuration)
//!     .on_resolve_transaction(resolve_handler)
//!     .build()
//!     .start();
//! ```
//!
//! ### Required setters
//!
//! The required setters are for providing the trait implementations required to run a node:
//! - `.network(...)`
//! - `.membership(...)`
//! - `.kv_store(...)`
//! - `.configuration(...)`
//!
//! ### Optional setters
//!
//! The optional setters are for registering user-defined event handlers for events from
//! [crate::events]:
//! - `.on_serve_operation(...)`
//! - `.on_resolve_transaction(...)`
//! - `.on_update_ring(...)`
//! - `.on_stabilize(...)`
//! - `.on_drop_operation(...)`
//!
//! ## Driving a node
//!
//! A node has no threads of its own. Its owner calls [Node::tick] periodically with the current
//! [logical time](LogicalTime), and every mutation of the node's state happens inside that call, in this
//! order:
//! 1. [Update the ring](Node::update_ring) from the membership provider, running
//!    [stabilization](crate::stabilization) if the ring changed.
//! 2. [Check messages](Node::check_messages): drain every queued message, serving requests and
//!    collecting replies.
//! 3. [Sweep transactions](Node::sweep_transactions) once, deciding every transaction that has a quorum
//!    or has timed out.
//!
//! Client operations ([create](Node::create), [read](Node::read), [update](Node::update),
//! [delete](Node::delete)) return as soon as their requests are sent. Their outcome is published as a
//! [ResolveTransactionEvent] by a later tick.

use typed_builder::TypedBuilder;

use crate::config::Configuration;
use crate::event_bus::*;
use crate::events::*;
use crate::membership::Membership;
use crate::messages::{Message, MessageBody, MessageKind, Operation};
use crate::networking::{Network, SenderHandle};
use crate::protocol::client::Client;
use crate::protocol::server;
use crate::ring::{HashRing, RingChange};
use crate::stabilization::{plan_repairs, Repair};
use crate::store::KVStore;
use crate::transactions::{Outcome, Resolution, TransactionTracker};
use crate::types::{Address, LogicalTime, TransactionID};

/// Stores all necessary parameters and trait implementations required to run a [Node].
#[derive(TypedBuilder)]
#[builder(builder_method(doc =
    "
    Create a builder for building a [NodeSpec]. On the builder call the following methods to construct a valid [NodeSpec].

    Required:
    - `.network(...)`
    - `.membership(...)`
    - `.kv_store(...)`
    - `.configuration(...)`

    Optional:
    - `.on_serve_operation(...)`
    - `.on_resolve_transaction(...)`
    - `.on_update_ring(...)`
    - `.on_stabilize(...)`
    - `.on_drop_operation(...)`
"
))]
pub struct NodeSpec<N: Network, M: Membership, K: KVStore> {
    // Required parameters
    #[builder(setter(doc = "Set the implementation of networking. The argument must implement the [Network](crate::networking::Network) trait. Required."))]
    network: N,
    #[builder(setter(doc = "Set the membership provider. The argument must implement the [Membership](crate::membership::Membership) trait. Required."))]
    membership: M,
    #[builder(setter(doc = "Set the implementation of the node's local store. The argument must implement the [KVStore](crate::store::KVStore) trait. Required."))]
    kv_store: K,
    #[builder(setter(doc = "Set the [configuration](Configuration), which contains the necessary parameters to run a node. Required."))]
    configuration: Configuration,
    // Optional parameters
    #[builder(default, setter(transform = |handler: impl Fn(&ServeOperationEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<ServeOperationEvent>),
    doc = "Register a handler closure to be invoked after the node applies a request to its local store. Optional."))]
    on_serve_operation: Option<HandlerPtr<ServeOperationEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&ResolveTransactionEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<ResolveTransactionEvent>),
    doc = "Register a handler closure to be invoked after the node decides the outcome of a client operation it coordinated. Optional."))]
    on_resolve_transaction: Option<HandlerPtr<ResolveTransactionEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&UpdateRingEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<UpdateRingEvent>),
    doc = "Register a handler closure to be invoked after the node's ring changes. Optional."))]
    on_update_ring: Option<HandlerPtr<UpdateRingEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&StabilizeEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<StabilizeEvent>),
    doc = "Register a handler closure to be invoked after the node re-sends its keys to their replica sets. Optional."))]
    on_stabilize: Option<HandlerPtr<StabilizeEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&DropOperationEvent) + Send + 'static| Some(Box::new(handler) as HandlerPtr<DropOperationEvent>),
    doc = "Register a handler closure to be invoked after the node drops a client operation because the ring is too small. Optional."))]
    on_drop_operation: Option<HandlerPtr<DropOperationEvent>>,
}

impl<N: Network, M: Membership, K: KVStore> NodeSpec<N, M, K> {
    /// Creates the node's components from its specification. The node starts with an empty ring, at
    /// logical time 0; its first [tick](Node::tick) places it on the ring.
    pub fn start(self) -> Node<N, M, K> {
        let Configuration {
            me,
            ring_size,
            transaction_timeout,
            log_events,
        } = self.configuration;

        let event_handlers = EventHandlers::new(
            log_events,
            self.on_serve_operation,
            self.on_resolve_transaction,
            self.on_update_ring,
            self.on_stabilize,
            self.on_drop_operation,
        );

        Node {
            sender: SenderHandle::new(me.clone(), self.network),
            membership: self.membership,
            ring: HashRing::new(me.clone(), ring_size),
            store: self.kv_store,
            tracker: TransactionTracker::new(transaction_timeout),
            client: Client::new(),
            event_handlers,
            now: LogicalTime::init(),
            me,
        }
    }
}

/// A running node. Owns the node's ring, local store, and pending transactions, and is the only thing
/// that mutates them.
pub struct Node<N: Network, M: Membership, K: KVStore> {
    me: Address,
    sender: SenderHandle<N>,
    membership: M,
    ring: HashRing,
    store: K,
    tracker: TransactionTracker,
    client: Client,
    event_handlers: EventHandlers,
    now: LogicalTime,
}

impl<N: Network, M: Membership, K: KVStore> Node<N, M, K> {
    /// Run one round of the node at logical time `now`: update the ring, drain the inbound queue, and
    /// sweep pending transactions.
    pub fn tick(&mut self, now: LogicalTime) {
        self.now = now;
        self.update_ring();
        self.check_messages();
        self.sweep_transactions();
    }

    /// Rebuild the ring from the membership provider. If the ring changed, re-send every local key to
    /// its new replica set before returning.
    pub fn update_ring(&mut self) -> RingChange {
        let change = self.ring.refresh(self.membership.live_members());
        if change.is_changed() {
            self.event_handlers.fire_handlers(Event::UpdateRing(UpdateRingEvent {
                timestamp: self.now,
                node: self.me.clone(),
                members: self.ring.members().to_vec(),
            }));
            self.stabilize();
        }
        change
    }

    /// Drain every message currently queued for this node. Returns the number of messages handled.
    pub fn check_messages(&mut self) -> usize {
        let mut handled = 0;
        while let Some(message) = self.sender.recv() {
            match message.kind() {
                MessageKind::Reply | MessageKind::ReadReply => self.on_receive_reply(message),
                MessageKind::Create | MessageKind::Read | MessageKind::Update | MessageKind::Delete => {
                    self.on_receive_request(message)
                }
            }
            handled += 1;
        }
        handled
    }

    /// Decide every pending transaction that has a quorum of replies or has timed out, publishing a
    /// [ResolveTransactionEvent] for each. Returns the decided transactions and their outcomes.
    pub fn sweep_transactions(&mut self) -> Vec<(TransactionID, Outcome)> {
        let resolutions = self.tracker.sweep(self.now);
        let mut decided = Vec::with_capacity(resolutions.len());
        for Resolution {
            transaction,
            outcome,
        } in resolutions
        {
            decided.push((transaction.id(), outcome));
            self.event_handlers
                .fire_handlers(Event::ResolveTransaction(ResolveTransactionEvent {
                    timestamp: self.now,
                    node: self.me.clone(),
                    transaction: transaction.id(),
                    kind: transaction.kind(),
                    key: transaction.key().to_string(),
                    value: transaction.value().map(str::to_string),
                    outcome,
                }));
        }
        decided
    }

    /// Create `key` with `value` on its replica set.
    ///
    /// Returns the id of the transaction tracking the operation, or `None` if the ring has too few
    /// members to form a replica set, in which case nothing is sent.
    pub fn create(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<TransactionID> {
        self.issue(Operation::Create {
            key: key.into(),
            value: value.into(),
        })
    }

    /// Read `key` from its replica set. See [create](Self::create) for the return value.
    pub fn read(&mut self, key: impl Into<String>) -> Option<TransactionID> {
        self.issue(Operation::Read { key: key.into() })
    }

    /// Overwrite `key` with `value` on its replica set. See [create](Self::create) for the return value.
    pub fn update(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<TransactionID> {
        self.issue(Operation::Update {
            key: key.into(),
            value: value.into(),
        })
    }

    /// Delete `key` from its replica set. See [create](Self::create) for the return value.
    pub fn delete(&mut self, key: impl Into<String>) -> Option<TransactionID> {
        self.issue(Operation::Delete { key: key.into() })
    }

    pub fn address(&self) -> &Address {
        &self.me
    }

    pub fn ring(&self) -> &HashRing {
        &self.ring
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn transactions(&self) -> &TransactionTracker {
        &self.tracker
    }

    /// The logical time of the latest tick.
    pub fn now(&self) -> LogicalTime {
        self.now
    }

    /// Whether the client operation with the given id succeeded. `None` if it is still pending or was
    /// never issued by this node.
    pub fn transaction_outcome(&self, transaction: TransactionID) -> Option<bool> {
        self.tracker.completed(transaction)
    }

    fn issue(&mut self, operation: Operation) -> Option<TransactionID> {
        let kind = operation.kind();
        let key = operation.key().to_string();

        let issued = self.client.issue(
            operation,
            self.now,
            &self.ring,
            &mut self.tracker,
            &mut self.sender,
        );

        // With fewer than 3 members there is no replica set. The operation is dropped outright rather
        // than partially replicated to the members that are available.
        if issued.is_none() {
            log::debug!(
                "Dropping {} of {}: ring of {} has {} members.",
                kind,
                key,
                self.me,
                self.ring.len()
            );
            self.event_handlers
                .fire_handlers(Event::DropOperation(DropOperationEvent {
                    timestamp: self.now,
                    node: self.me.clone(),
                    kind,
                    key,
                }));
        }
        issued
    }

    fn on_receive_request(&mut self, request: Message) {
        let served = server::serve(&mut self.store, &self.me, request, self.now);
        if let Some((coordinator, reply)) = served.reply {
            self.sender.send(&coordinator, reply);
        }
        if let Some(event) = served.event {
            self.event_handlers.fire_handlers(Event::ServeOperation(event));
        }
    }

    fn on_receive_reply(&mut self, reply: Message) {
        let collected = match reply.body {
            MessageBody::Reply { success } => self.tracker.collect_reply(reply.transaction, success),
            MessageBody::ReadReply { value } => {
                self.tracker.collect_read_reply(reply.transaction, value)
            }
            _ => return,
        };

        if !collected {
            log::debug!(
                "Discarding reply from {} for transaction {}, which {} is not tracking.",
                reply.origin,
                reply.transaction,
                self.me
            );
        }
    }

    fn stabilize(&mut self) {
        let repairs = plan_repairs(&self.ring, &self.store);
        let repair_count = repairs.len();
        for Repair {
            destination,
            message,
        } in repairs
        {
            self.sender.send(&destination, message);
        }

        self.event_handlers.fire_handlers(Event::Stabilize(StabilizeEvent {
            timestamp: self.now,
            node: self.me.clone(),
            keys: self.store.len(),
            repairs: repair_count,
        }));
    }
}
