/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Server side of the CRUD protocol: applying requests to the local store.

use crate::events::ServeOperationEvent;
use crate::messages::{Message, MessageBody};
use crate::store::KVStore;
use crate::types::{Address, LogicalTime, OperationKind};

/// What serving a request produced: the reply to send back to the coordinator (paired with the
/// coordinator's address), and the audit record of the operation. Repair requests produce neither.
#[derive(Default)]
pub(crate) struct Served {
    pub(crate) reply: Option<(Address, Message)>,
    pub(crate) event: Option<ServeOperationEvent>,
}

/// Apply a request to `store` on behalf of the node at `me`.
///
/// # Precondition
/// `request` is a create, read, update, or delete. Replies are collected by the
/// [tracker](crate::transactions::TransactionTracker), not served; passing one here is a no-op.
pub(crate) fn serve<K: KVStore>(
    store: &mut K,
    me: &Address,
    request: Message,
    now: LogicalTime,
) -> Served {
    let Message {
        transaction,
        origin,
        body,
    } = request;
    let repair = transaction.is_repair();

    let (kind, key, value, success) = match body {
        MessageBody::Create { key, .. } if repair && store.contains(&key) => {
            return Served::default();
        }
        MessageBody::Create { key, value, .. } if repair => {
            store.create(&key, &value);
            return Served::default();
        }
        MessageBody::Create { key, value, .. } => {
            let success = store.create(&key, &value);
            (OperationKind::Create, key, Some(value), success)
        }
        MessageBody::Read { key } => {
            let value = store.read(&key);
            let success = value.is_some();
            (OperationKind::Read, key, value, success)
        }
        MessageBody::Update { key, value, .. } => {
            let success = store.update(&key, &value);
            (OperationKind::Update, key, Some(value), success)
        }
        MessageBody::Delete { key } => {
            let success = store.delete(&key);
            if repair {
                return Served::default();
            }
            (OperationKind::Delete, key, None, success)
        }
        MessageBody::Reply { .. } | MessageBody::ReadReply { .. } => return Served::default(),
    };

    let reply = match kind {
        OperationKind::Read => Message::read_reply(transaction, me.clone(), value.clone()),
        _ => Message::reply(transaction, me.clone(), success),
    };

    Served {
        reply: Some((origin.clone(), reply)),
        event: Some(ServeOperationEvent {
            timestamp: now,
            node: me.clone(),
            origin,
            transaction,
            kind,
            key,
            value,
            success,
        }),
    }
}
