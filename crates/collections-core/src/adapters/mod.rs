//! # Adapters
//!
//! Concrete implementations of the outbound ports.
//!
//! The service assumes a single authoritative store with synchronous
//! read-after-write semantics; the in-memory adapters here provide exactly
//! that, guarded by the host's lock.

mod gate;
mod memory;
mod time;

pub use gate::ContributorGate;
pub use memory::{InMemoryCollectionStore, InMemoryLinkStore, InMemoryNodeStore};
pub use time::{FixedTimeSource, SystemTimeSource};
