//! Types that are used across multiple components of a ringstore node.
//!
//! Other types, specific to single components, can be found in those components' modules, e.g.,
//! [`crate::ring::locator::ReplicaSet`] or [`crate::transactions::Transaction`].

pub mod basic;

pub mod member;

pub use basic::{Address, LogicalTime, OperationKind, RingPosition, RingSize, TransactionID};
pub use member::Member;
