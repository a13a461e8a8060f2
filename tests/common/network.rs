use std::{
    collections::{HashMap, HashSet},
    sync::{
        mpsc::{self, Receiver, Sender, TryRecvError},
        Arc, Mutex,
    },
};

use ringstore_rs::{messages::Message, networking::Network, types::Address};

/// The state shared by every stub of one mock network: an inbox per node, the set of partitioned nodes,
/// and a record of every payload sent.
#[derive(Default)]
struct Hub {
    inboxes: HashMap<Address, Sender<Vec<u8>>>,
    partitioned: HashSet<Address>,
    sent: Vec<(Address, Address, Vec<u8>)>,
}

/// A handle on a mock network, used by tests to connect nodes, cut them off, and inspect traffic.
#[derive(Clone, Default)]
pub(crate) struct MockNetwork(Arc<Mutex<Hub>>);

impl MockNetwork {
    pub(crate) fn new() -> MockNetwork {
        MockNetwork::default()
    }

    /// Give `address` an inbox and return the stub it sends and receives through.
    pub(crate) fn connect(&self, address: Address) -> NetworkStub {
        let (sender, receiver) = mpsc::channel();
        self.0.lock().unwrap().inboxes.insert(address, sender);
        NetworkStub {
            hub: self.clone(),
            inbox: receiver,
        }
    }

    /// Silently drop every payload sent to `address` from now on.
    pub(crate) fn partition(&self, address: &Address) {
        self.0.lock().unwrap().partitioned.insert(address.clone());
    }

    /// Deliver `message` straight into `peer`'s inbox, as if `message.origin` had sent it. Injected
    /// messages are not recorded as sent.
    pub(crate) fn inject(&self, peer: &Address, message: Message) {
        let hub = self.0.lock().unwrap();
        if let Some(inbox) = hub.inboxes.get(peer) {
            let _ = inbox.send(message.encode().unwrap());
        }
    }

    /// Deliver raw bytes straight into `peer`'s inbox. Injected payloads are not recorded as sent.
    pub(crate) fn inject_raw(&self, peer: &Address, payload: Vec<u8>) {
        let hub = self.0.lock().unwrap();
        if let Some(inbox) = hub.inboxes.get(peer) {
            let _ = inbox.send(payload);
        }
    }

    /// Every message `origin` has sent, paired with its destination.
    pub(crate) fn sent_by(&self, origin: &Address) -> Vec<(Address, Message)> {
        self.0
            .lock()
            .unwrap()
            .sent
            .iter()
            .filter(|(from, _, _)| from == origin)
            .map(|(_, to, payload)| (to.clone(), Message::decode(payload).unwrap()))
            .collect()
    }

    pub(crate) fn clear_sent(&self) {
        self.0.lock().unwrap().sent.clear();
    }
}

/// A mock network stub which passes messages between nodes using channels.
pub(crate) struct NetworkStub {
    hub: MockNetwork,
    inbox: Receiver<Vec<u8>>,
}

impl Network for NetworkStub {
    fn send(&mut self, origin: &Address, peer: &Address, payload: Vec<u8>) {
        let mut hub = self.hub.0.lock().unwrap();
        hub.sent.push((origin.clone(), peer.clone(), payload.clone()));
        if hub.partitioned.contains(peer) {
            return;
        }
        if let Some(inbox) = hub.inboxes.get(peer) {
            let _ = inbox.send(payload);
        }
    }

    fn recv(&mut self) -> Option<Vec<u8>> {
        match self.inbox.try_recv() {
            Ok(payload) => Some(payload),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => panic!(),
        }
    }
}
