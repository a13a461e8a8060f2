/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Functions that log out events.
//!
//! The logs defined in this module are printed if the user enabled them via the node's
//! [configuration](crate::config::Configuration).
//!
//! ringstore logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
//! printed onto a terminal or to a file, set up a
//! [logging implementation](https://docs.rs/log/latest/log/#available-logging-implementations).
//!
//! ## Log message format
//!
//! Log messages are CSVs (Comma Separated Values) with at least three values. The first three values
//! are always:
//! 1. The name of the [event](crate::events) in PascalCase (defined in this module as constants).
//! 2. The logical time at which the event was emitted.
//! 3. The address of the node that emitted the event.
//!
//! The rest of the values differ depending on the kind of event. For example, the following snippet
//! is how a [ResolveTransaction](crate::events::ResolveTransactionEvent) is printed:
//!
//! ```text
//! ResolveTransaction, 42, 10.0.0.1:4000, 17, Update, fruit, banana, Succeeded
//! ```
//!
//! In the snippet:
//! - The fourth value is the transaction id.
//! - The fifth and sixth values are the operation and the key it was on.
//! - The seventh value is the value written or read, or `-` if there is none.
//! - The eighth value is the outcome.

use crate::events::*;
use log;

// Names of each event in PascalCase for printing:
pub const SERVE_OPERATION: &str = "ServeOperation";
pub const RESOLVE_TRANSACTION: &str = "ResolveTransaction";
pub const UPDATE_RING: &str = "UpdateRing";
pub const STABILIZE: &str = "Stabilize";
pub const DROP_OPERATION: &str = "DropOperation";

/// Implemented by event types. Used to get a closure that logs the event.
pub(crate) trait Logger {
    /// Returns a pointer to the default logging handler for a given event type.
    fn get_logger() -> Box<dyn Fn(&Self) + Send>;
}

impl Logger for ServeOperationEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |serve_operation_event: &ServeOperationEvent| {
            log::info!(
                "{}, {}, {}, {}, {}, {}, {}, {}, {}",
                SERVE_OPERATION,
                serve_operation_event.timestamp,
                serve_operation_event.node,
                serve_operation_event.origin,
                serve_operation_event.transaction,
                serve_operation_event.kind,
                serve_operation_event.key,
                value_or_dash(&serve_operation_event.value),
                success_or_failure(serve_operation_event.success)
            )
        };
        Box::new(logger)
    }
}

impl Logger for ResolveTransactionEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |resolve_transaction_event: &ResolveTransactionEvent| {
            log::info!(
                "{}, {}, {}, {}, {}, {}, {}, {:?}",
                RESOLVE_TRANSACTION,
                resolve_transaction_event.timestamp,
                resolve_transaction_event.node,
                resolve_transaction_event.transaction,
                resolve_transaction_event.kind,
                resolve_transaction_event.key,
                value_or_dash(&resolve_transaction_event.value),
                resolve_transaction_event.outcome
            )
        };
        Box::new(logger)
    }
}

impl Logger for UpdateRingEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |update_ring_event: &UpdateRingEvent| {
            let members: Vec<String> = update_ring_event
                .members
                .iter()
                .map(|member| format!("{}@{}", member.address(), member.position()))
                .collect();
            log::info!(
                "{}, {}, {}, {}",
                UPDATE_RING,
                update_ring_event.timestamp,
                update_ring_event.node,
                members.join(" ")
            )
        };
        Box::new(logger)
    }
}

impl Logger for StabilizeEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |stabilize_event: &StabilizeEvent| {
            log::info!(
                "{}, {}, {}, {}, {}",
                STABILIZE,
                stabilize_event.timestamp,
                stabilize_event.node,
                stabilize_event.keys,
                stabilize_event.repairs
            )
        };
        Box::new(logger)
    }
}

impl Logger for DropOperationEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send> {
        let logger = |drop_operation_event: &DropOperationEvent| {
            log::info!(
                "{}, {}, {}, {}, {}",
                DROP_OPERATION,
                drop_operation_event.timestamp,
                drop_operation_event.node,
                drop_operation_event.kind,
                drop_operation_event.key
            )
        };
        Box::new(logger)
    }
}

fn value_or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn success_or_failure(success: bool) -> &'static str {
    if success {
        "Success"
    } else {
        "Failure"
    }
}
