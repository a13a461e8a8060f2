/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! "Inert" types that are passed around between the components of a node and sent over the network,
//! but have no active behavior of their own. Most follow the newtype pattern, and the API for using
//! them is defined in this module.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use borsh::{BorshDeserialize, BorshSerialize};
use std::fmt::{self, Debug, Display, Formatter};

/// Opaque network identity of a node.
///
/// The bytes of an address are never interpreted by the library, except to order two members that
/// happen to share the same [ring position](RingPosition).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize)]
pub struct Address(Vec<u8>);

impl Address {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Address(value.as_bytes().to_vec())
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Address(value.into_bytes())
    }
}

// Addresses are usually human readable ("10.0.0.1:4000"). Those that are not are printed in base64.
impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(readable) => f.write_str(readable),
            Err(_) => f.write_str(&STANDARD_NO_PAD.encode(&self.0)),
        }
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

/// A point in the ring space, i.e., an integer in `[0, RingSize)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize)]
pub struct RingPosition(u64);

impl RingPosition {
    pub const fn new(int: u64) -> Self {
        Self(int)
    }

    pub const fn int(&self) -> u64 {
        self.0
    }
}

impl Display for RingPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Number of distinct positions in the ring space. Ring positions are hashes reduced modulo this
/// number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingSize(u64);

impl RingSize {
    /// Create a ring size. A ring space needs at least one position, so `0` is treated as `1`.
    pub const fn new(int: u64) -> Self {
        if int == 0 {
            Self(1)
        } else {
            Self(int)
        }
    }

    pub const fn int(&self) -> u64 {
        self.0
    }
}

impl Default for RingSize {
    fn default() -> Self {
        RingSize::new(512)
    }
}

/// Ties a client request to the replies that replicas send back for it.
///
/// Ids are allocated by a per-node counter starting from [TransactionID::init]. The value
/// [TransactionID::REPAIR] is reserved for [stabilization](crate::stabilization) traffic and is never
/// allocated to a client operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize)]
pub struct TransactionID(u64);

impl TransactionID {
    /// Marks repair messages: they never get a reply and never overwrite an existing value.
    pub const REPAIR: TransactionID = TransactionID(u64::MAX);

    pub const fn new(int: u64) -> Self {
        Self(int)
    }

    pub const fn init() -> Self {
        Self(0)
    }

    pub const fn int(&self) -> u64 {
        self.0
    }

    pub fn is_repair(&self) -> bool {
        *self == Self::REPAIR
    }

    /// The id allocated after this one. Skips over [TransactionID::REPAIR].
    pub fn next(&self) -> Self {
        let next = Self(self.0.wrapping_add(1));
        if next.is_repair() {
            Self::init()
        } else {
            next
        }
    }
}

impl Display for TransactionID {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_repair() {
            f.write_str("repair")
        } else {
            Display::fmt(&self.0, f)
        }
    }
}

/// Time as seen by the driver of a node. One unit is one tick of whatever clock the deployment uses;
/// the library only ever compares and subtracts these values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogicalTime(u64);

impl LogicalTime {
    pub const fn new(int: u64) -> Self {
        Self(int)
    }

    pub const fn init() -> Self {
        Self(0)
    }

    pub const fn int(&self) -> u64 {
        self.0
    }

    /// Number of time units between `earlier` and `self`, or 0 if `earlier` is in the future.
    pub fn elapsed_since(&self, earlier: LogicalTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl Display for LogicalTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// The four client-visible operations on a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Delete,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Create => f.write_str("Create"),
            OperationKind::Read => f.write_str("Read"),
            OperationKind::Update => f.write_str("Update"),
            OperationKind::Delete => f.write_str("Delete"),
        }
    }
}
