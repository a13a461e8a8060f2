/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

use crate::events::*;
use crate::logging::Logger;

pub(crate) type HandlerPtr<T> = Box<dyn Fn(&T) + Send>;

/// The handlers registered for each kind of [Event]. Handlers run in registration order, on the thread
/// that ticks the node.
pub(crate) struct EventHandlers {
    pub(crate) serve_operation_handlers: Vec<HandlerPtr<ServeOperationEvent>>,
    pub(crate) resolve_transaction_handlers: Vec<HandlerPtr<ResolveTransactionEvent>>,
    pub(crate) update_ring_handlers: Vec<HandlerPtr<UpdateRingEvent>>,
    pub(crate) stabilize_handlers: Vec<HandlerPtr<StabilizeEvent>>,
    pub(crate) drop_operation_handlers: Vec<HandlerPtr<DropOperationEvent>>,
}

impl EventHandlers {
    /// Collect the user-defined handlers, adding the default [loggers](crate::logging) in front of them
    /// if `log_events` is set.
    pub(crate) fn new(
        log_events: bool,
        serve_operation_handler: Option<HandlerPtr<ServeOperationEvent>>,
        resolve_transaction_handler: Option<HandlerPtr<ResolveTransactionEvent>>,
        update_ring_handler: Option<HandlerPtr<UpdateRingEvent>>,
        stabilize_handler: Option<HandlerPtr<StabilizeEvent>>,
        drop_operation_handler: Option<HandlerPtr<DropOperationEvent>>,
    ) -> Self {
        Self {
            serve_operation_handlers: handlers(log_events, serve_operation_handler),
            resolve_transaction_handlers: handlers(log_events, resolve_transaction_handler),
            update_ring_handlers: handlers(log_events, update_ring_handler),
            stabilize_handlers: handlers(log_events, stabilize_handler),
            drop_operation_handlers: handlers(log_events, drop_operation_handler),
        }
    }

    pub(crate) fn fire_handlers(&self, event: Event) {
        match event {
            Event::ServeOperation(serve_operation_event) =>
                self.serve_operation_handlers.iter().for_each(|handler| handler(&serve_operation_event)),

            Event::ResolveTransaction(resolve_transaction_event) =>
                self.resolve_transaction_handlers.iter().for_each(|handler| handler(&resolve_transaction_event)),

            Event::UpdateRing(update_ring_event) =>
                self.update_ring_handlers.iter().for_each(|handler| handler(&update_ring_event)),

            Event::Stabilize(stabilize_event) =>
                self.stabilize_handlers.iter().for_each(|handler| handler(&stabilize_event)),

            Event::DropOperation(drop_operation_event) =>
                self.drop_operation_handlers.iter().for_each(|handler| handler(&drop_operation_event)),
        }
    }
}

fn handlers<E: Logger>(log_events: bool, user_handler: Option<HandlerPtr<E>>) -> Vec<HandlerPtr<E>> {
    let mut handlers = Vec::new();
    if log_events {
        handlers.push(E::get_logger());
    }
    handlers.extend(user_handler);
    handlers
}
