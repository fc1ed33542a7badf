//! Caching primitives for catalog reads.

mod clock;
mod scope;
mod ttl;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scope::RequestScope;
pub use ttl::TtlCache;
