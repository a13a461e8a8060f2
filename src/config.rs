/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! User-defined parameters of a node.
//!
//! The [Configuration] is built with the builder pattern, for example:
//!
//! ```ignore
//! let configuration =
//!     Configuration::builder()
//!     .me(Address::from("10.0.0.1:4000"))
//!     .ring_size(RingSize::new(512))
//!     .transaction_timeout(10)
//!     .log_events(true)
//!     .build();
//! ```
//!
//! ## Ring size
//!
//! Every node in a cluster must use the same ring size, since it determines where addresses and keys
//! land on the ring. Ring positions of distinct addresses may collide in a small ring space; collisions
//! are tolerated (see [Member](crate::types::Member#ordering-of-members)) but make placement lopsided.
//!
//! ## Log Events
//!
//! ringstore logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
//! printed onto a terminal or to a file, set up a [logging
//! implementation](https://docs.rs/log/latest/log/#available-logging-implementations).

use typed_builder::TypedBuilder;

use crate::transactions::DEFAULT_TRANSACTION_TIMEOUT;
use crate::types::{Address, RingSize};

#[derive(Clone, Debug, TypedBuilder)]
#[builder(builder_method(doc =
    "
    Create a builder for building a [Configuration]. On the builder call the following methods to construct a valid [Configuration].

    Required:
    - `.me(...)`

    Optional:
    - `.ring_size(...)`
    - `.transaction_timeout(...)`
    - `.log_events(...)`
"
))]
pub struct Configuration {
    #[builder(setter(into, doc = "Set the address of the local node, as seen by its peers. Required."))]
    pub me: Address,
    #[builder(default, setter(doc = "Set the number of positions in the ring space. Defaults to 512."))]
    pub ring_size: RingSize,
    #[builder(default = DEFAULT_TRANSACTION_TIMEOUT, setter(doc = "Set how many logical time units a client operation may wait for a quorum before it times out. Defaults to 10."))]
    pub transaction_timeout: u64,
    #[builder(default = false, setter(doc = "Enable logging of events? Defaults to false."))]
    pub log_events: bool,
}
