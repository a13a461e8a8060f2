use std::sync::{Arc, Mutex};

use ringstore_rs::{
    events::{
        DropOperationEvent, ResolveTransactionEvent, ServeOperationEvent, StabilizeEvent,
        UpdateRingEvent,
    },
    types::{Address, TransactionID},
};

/// Collects the events published by the nodes of a test cluster.
#[derive(Clone, Default)]
pub(crate) struct EventRecorder {
    served: Arc<Mutex<Vec<ServeOperationEvent>>>,
    resolved: Arc<Mutex<Vec<ResolveTransactionEvent>>>,
    ring_updates: Arc<Mutex<Vec<UpdateRingEvent>>>,
    stabilizations: Arc<Mutex<Vec<StabilizeEvent>>>,
    drops: Arc<Mutex<Vec<DropOperationEvent>>>,
}

impl EventRecorder {
    pub(crate) fn serve_operation_handler(&self) -> impl Fn(&ServeOperationEvent) + Send + 'static {
        let served = self.served.clone();
        move |event| served.lock().unwrap().push(event.clone())
    }

    pub(crate) fn resolve_transaction_handler(&self) -> impl Fn(&ResolveTransactionEvent) + Send + 'static {
        let resolved = self.resolved.clone();
        move |event| resolved.lock().unwrap().push(event.clone())
    }

    pub(crate) fn update_ring_handler(&self) -> impl Fn(&UpdateRingEvent) + Send + 'static {
        let ring_updates = self.ring_updates.clone();
        move |event| ring_updates.lock().unwrap().push(event.clone())
    }

    pub(crate) fn stabilize_handler(&self) -> impl Fn(&StabilizeEvent) + Send + 'static {
        let stabilizations = self.stabilizations.clone();
        move |event| stabilizations.lock().unwrap().push(event.clone())
    }

    pub(crate) fn drop_operation_handler(&self) -> impl Fn(&DropOperationEvent) + Send + 'static {
        let drops = self.drops.clone();
        move |event| drops.lock().unwrap().push(event.clone())
    }

    pub(crate) fn served(&self) -> Vec<ServeOperationEvent> {
        self.served.lock().unwrap().clone()
    }

    pub(crate) fn resolved(&self) -> Vec<ResolveTransactionEvent> {
        self.resolved.lock().unwrap().clone()
    }

    /// Every resolution `coordinator` published for `transaction`.
    pub(crate) fn resolutions_of(
        &self,
        coordinator: &Address,
        transaction: TransactionID,
    ) -> Vec<ResolveTransactionEvent> {
        self.resolved()
            .into_iter()
            .filter(|event| &event.node == coordinator && event.transaction == transaction)
            .collect()
    }

    pub(crate) fn ring_updates(&self) -> Vec<UpdateRingEvent> {
        self.ring_updates.lock().unwrap().clone()
    }

    pub(crate) fn stabilizations(&self) -> Vec<StabilizeEvent> {
        self.stabilizations.lock().unwrap().clone()
    }

    pub(crate) fn drops(&self) -> Vec<DropOperationEvent> {
        self.drops.lock().unwrap().clone()
    }
}
