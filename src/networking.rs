/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! [Trait definition](Network) for pluggable networking, as well as the internal handle that nodes use
//! to send typed messages over it.
//!
//! ringstore's transport is modular: the library only ever hands bytes to a [Network] implementation and
//! drains bytes from it. Delivery is fire-and-forget. Messages may be lost, duplicated, or reordered;
//! the [transaction timeout](crate::transactions) and [stabilization](crate::stabilization) are the only
//! recovery mechanisms, and neither relies on the network doing anything more than best effort.

use crate::messages::Message;
use crate::types::Address;

pub trait Network: Send {
    /// Send `payload` from `origin` to `peer` without blocking.
    fn send(&mut self, origin: &Address, peer: &Address, payload: Vec<u8>);

    /// Receive a payload addressed to this node. Returns immediately with a None if no payload is queued.
    fn recv(&mut self) -> Option<Vec<u8>>;
}

/// Encodes typed messages and hands them to the [Network].
pub(crate) struct SenderHandle<N: Network> {
    me: Address,
    network: N,
}

impl<N: Network> SenderHandle<N> {
    pub(crate) fn new(me: Address, network: N) -> Self {
        Self { me, network }
    }

    /// Send `message` to `peer`. A message that cannot be encoded is dropped, like a message lost in
    /// transit.
    pub(crate) fn send(&mut self, peer: &Address, message: Message) {
        match message.encode() {
            Ok(payload) => self.network.send(&self.me, peer, payload),
            Err(err) => log::warn!("Dropping message to {}: {}", peer, err),
        }
    }

    /// Receive the next queued message, skipping payloads that do not decode.
    pub(crate) fn recv(&mut self) -> Option<Message> {
        while let Some(payload) = self.network.recv() {
            match Message::decode(&payload) {
                Ok(message) => return Some(message),
                Err(err) => log::warn!("Dropping payload received by {}: {}", self.me, err),
            }
        }
        None
    }
}
