use std::sync::{Arc, Mutex};

use ringstore_rs::{membership::Membership, types::Address};

/// A membership provider whose list of live nodes is shared by every node of a test cluster and edited
/// directly by the test.
#[derive(Clone)]
pub(crate) struct MembershipStub(Arc<Mutex<Vec<Address>>>);

impl MembershipStub {
    pub(crate) fn new(live: impl IntoIterator<Item = Address>) -> MembershipStub {
        MembershipStub(Arc::new(Mutex::new(live.into_iter().collect())))
    }

    pub(crate) fn join(&self, address: Address) {
        let mut live = self.0.lock().unwrap();
        if !live.contains(&address) {
            live.push(address);
        }
    }

    pub(crate) fn leave(&self, address: &Address) {
        self.0.lock().unwrap().retain(|live| live != address);
    }
}

impl Membership for MembershipStub {
    fn live_members(&self) -> Vec<Address> {
        self.0.lock().unwrap().clone()
    }
}
