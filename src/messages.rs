/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Definitions for structured messages that are sent between nodes.
//!
//! Every message carries the [transaction id](TransactionID) that ties requests to their replies and the
//! address of its origin, which is where replies are sent. What the message asks for or answers is
//! described by its [body](MessageBody).
//!
//! On the wire, messages are [borsh](borsh)-encoded. [Message::encode] and [Message::decode] are the only
//! places that deal with bytes; everything else in the library works with typed messages.

use std::fmt::{self, Display, Formatter};

use borsh::{BorshDeserialize, BorshSerialize};

use crate::ring::locator::ReplicaRole;
use crate::types::{Address, OperationKind, TransactionID};

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Message {
    pub transaction: TransactionID,
    pub origin: Address,
    pub body: MessageBody,
}

/// The requests a coordinator sends to replicas, and the replies replicas send back.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum MessageBody {
    Create {
        key: String,
        value: String,
        role: ReplicaRole,
    },
    Read {
        key: String,
    },
    Update {
        key: String,
        value: String,
        role: ReplicaRole,
    },
    Delete {
        key: String,
    },
    /// Answer to a create, update, or delete.
    Reply { success: bool },
    /// Answer to a read. `None` means the replica does not hold the key.
    ///
    /// A stored empty string is a hit: it travels as `Some("")` and counts as a success. Stores that
    /// use the empty string to mean "absent" must not hold it as a value.
    ReadReply { value: Option<String> },
}

/// Discriminant of a [MessageBody], without its fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Create,
    Read,
    Update,
    Delete,
    Reply,
    ReadReply,
}

impl Message {
    /// A request carrying out `operation` against the replica that plays `role` for the operation's key.
    pub fn request(
        transaction: TransactionID,
        origin: Address,
        operation: &Operation,
        role: ReplicaRole,
    ) -> Message {
        let body = match operation.clone() {
            Operation::Create { key, value } => MessageBody::Create { key, value, role },
            Operation::Read { key } => MessageBody::Read { key },
            Operation::Update { key, value } => MessageBody::Update { key, value, role },
            Operation::Delete { key } => MessageBody::Delete { key },
        };
        Message {
            transaction,
            origin,
            body,
        }
    }

    /// A create request sent by [stabilization](crate::stabilization). It is applied only if the receiver
    /// lacks `key`, and is never replied to.
    pub fn repair(origin: Address, key: String, value: String, role: ReplicaRole) -> Message {
        Message {
            transaction: TransactionID::REPAIR,
            origin,
            body: MessageBody::Create { key, value, role },
        }
    }

    pub fn reply(transaction: TransactionID, origin: Address, success: bool) -> Message {
        Message {
            transaction,
            origin,
            body: MessageBody::Reply { success },
        }
    }

    pub fn read_reply(transaction: TransactionID, origin: Address, value: Option<String>) -> Message {
        Message {
            transaction,
            origin,
            body: MessageBody::ReadReply { value },
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self.body {
            MessageBody::Create { .. } => MessageKind::Create,
            MessageBody::Read { .. } => MessageKind::Read,
            MessageBody::Update { .. } => MessageKind::Update,
            MessageBody::Delete { .. } => MessageKind::Delete,
            MessageBody::Reply { .. } => MessageKind::Reply,
            MessageBody::ReadReply { .. } => MessageKind::ReadReply,
        }
    }

    /// Whether this message belongs to [stabilization](crate::stabilization) traffic.
    pub fn is_repair(&self) -> bool {
        self.transaction.is_repair()
    }

    /// Get the key the message is about. Replies do not carry one.
    pub fn key(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Create { key, .. }
            | MessageBody::Read { key }
            | MessageBody::Update { key, .. }
            | MessageBody::Delete { key } => Some(key),
            MessageBody::Reply { .. } | MessageBody::ReadReply { .. } => None,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, MessageCodecError> {
        self.try_to_vec().map_err(MessageCodecError::Encode)
    }

    pub fn decode(bytes: &[u8]) -> Result<Message, MessageCodecError> {
        Message::try_from_slice(bytes).map_err(MessageCodecError::Decode)
    }
}

/// A client operation, as issued by the coordinator before it is fanned out to replicas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Create { key: String, value: String },
    Read { key: String },
    Update { key: String, value: String },
    Delete { key: String },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Create { .. } => OperationKind::Create,
            Operation::Read { .. } => OperationKind::Read,
            Operation::Update { .. } => OperationKind::Update,
            Operation::Delete { .. } => OperationKind::Delete,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Operation::Create { key, .. }
            | Operation::Read { key }
            | Operation::Update { key, .. }
            | Operation::Delete { key } => key,
        }
    }

    /// The value written by the operation. Reads and deletes carry none.
    pub fn value(&self) -> Option<&str> {
        match self {
            Operation::Create { value, .. } | Operation::Update { value, .. } => Some(value),
            Operation::Read { .. } | Operation::Delete { .. } => None,
        }
    }
}

/// Error when converting a [Message] to or from its wire form.
#[derive(Debug)]
pub enum MessageCodecError {
    Encode(std::io::Error),
    Decode(std::io::Error),
}

impl Display for MessageCodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MessageCodecError::Encode(source) => write!(f, "failed to encode message: {}", source),
            MessageCodecError::Decode(source) => write!(f, "failed to decode message: {}", source),
        }
    }
}

impl std::error::Error for MessageCodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MessageCodecError::Encode(source) | MessageCodecError::Decode(source) => Some(source),
        }
    }
}
