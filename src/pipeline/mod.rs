//! Background pipelines decoupling the request path from slow sinks.
//!
//! Both pipelines share a lifecycle: producers hold a cloneable handle
//! over a bounded channel, a single consumer task drains it, and dropping
//! the last handle closes the channel. The consumer then finishes the
//! buffered work and exits, so awaiting its [`tokio::task::JoinHandle`]
//! during shutdown is the drain barrier.

mod search_worker;
mod stats_worker;

pub use search_worker::{spawn_search_worker, SearchHandle};
pub use stats_worker::{spawn_stats_worker, StatsHandle};
