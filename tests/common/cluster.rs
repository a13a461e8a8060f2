use ringstore_rs::{
    config::Configuration,
    node::{Node, NodeSpec},
    store::{KVStore, MemStore},
    transactions::DEFAULT_TRANSACTION_TIMEOUT,
    types::{Address, LogicalTime},
};

use super::{
    membership::MembershipStub,
    network::{MockNetwork, NetworkStub},
    recorder::EventRecorder,
};

pub(crate) type TestNode = Node<NetworkStub, MembershipStub, MemStore>;

/// A set of nodes sharing one mock network, one membership list, and one event recorder, driven by a
/// simulated clock.
///
/// Every [tick](Cluster::tick) advances the clock by one unit and ticks every live node once, in the
/// order the nodes were started. A message is handled the next time its recipient ticks: later in the
/// same round if the recipient was started after the sender, otherwise in the following round.
pub(crate) struct Cluster {
    network: MockNetwork,
    membership: MembershipStub,
    recorder: EventRecorder,
    nodes: Vec<TestNode>,
    transaction_timeout: u64,
    now: u64,
}

impl Cluster {
    pub(crate) fn new(addresses: &[&str]) -> Cluster {
        Cluster::with_timeout(addresses, DEFAULT_TRANSACTION_TIMEOUT)
    }

    pub(crate) fn with_timeout(addresses: &[&str], transaction_timeout: u64) -> Cluster {
        let mut cluster = Cluster {
            network: MockNetwork::new(),
            membership: MembershipStub::new(Vec::new()),
            recorder: EventRecorder::default(),
            nodes: Vec::new(),
            transaction_timeout,
            now: 0,
        };
        for address in addresses {
            cluster.join(address);
        }
        cluster
    }

    /// Start a node at `address` and add it to the membership list. It takes its place on the rings of
    /// the cluster on the next tick.
    pub(crate) fn join(&mut self, address: &str) {
        let address = Address::from(address);
        let network = self.network.connect(address.clone());

        let configuration = Configuration::builder()
            .me(address.clone())
            .transaction_timeout(self.transaction_timeout)
            .log_events(true)
            .build();

        let node = NodeSpec::builder()
            .network(network)
            .membership(self.membership.clone())
            .kv_store(MemStore::new())
            .configuration(configuration)
            .on_serve_operation(self.recorder.serve_operation_handler())
            .on_resolve_transaction(self.recorder.resolve_transaction_handler())
            .on_update_ring(self.recorder.update_ring_handler())
            .on_stabilize(self.recorder.stabilize_handler())
            .on_drop_operation(self.recorder.drop_operation_handler())
            .build()
            .start();

        self.nodes.push(node);
        self.membership.join(address);
    }

    /// Stop the node at `address` and remove it from the membership list.
    pub(crate) fn fail(&mut self, address: &str) {
        let address = Address::from(address);
        self.membership.leave(&address);
        self.nodes.retain(|node| node.address() != &address);
    }

    pub(crate) fn tick(&mut self) {
        self.now += 1;
        for node in &mut self.nodes {
            node.tick(LogicalTime::new(self.now));
        }
    }

    pub(crate) fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Tick until `done` holds, for at most `max_ticks` ticks. Returns whether `done` held.
    pub(crate) fn run_until(&mut self, max_ticks: u64, done: impl Fn(&Cluster) -> bool) -> bool {
        for _ in 0..max_ticks {
            if done(self) {
                return true;
            }
            self.tick();
        }
        done(self)
    }

    pub(crate) fn node(&self, address: &str) -> &TestNode {
        let address = Address::from(address);
        self.nodes
            .iter()
            .find(|node| node.address() == &address)
            .expect("No live node has this address.")
    }

    pub(crate) fn node_mut(&mut self, address: &str) -> &mut TestNode {
        let address = Address::from(address);
        self.nodes
            .iter_mut()
            .find(|node| node.address() == &address)
            .expect("No live node has this address.")
    }

    pub(crate) fn nodes(&self) -> &[TestNode] {
        &self.nodes
    }

    /// The live nodes whose local stores hold `key`, in start order.
    pub(crate) fn holders(&self, key: &str) -> Vec<Address> {
        self.nodes
            .iter()
            .filter(|node| node.store().contains(key))
            .map(|node| node.address().clone())
            .collect()
    }

    pub(crate) fn network(&self) -> &MockNetwork {
        &self.network
    }

    pub(crate) fn recorder(&self) -> &EventRecorder {
        &self.recorder
    }

    pub(crate) fn now(&self) -> u64 {
        self.now
    }
}
