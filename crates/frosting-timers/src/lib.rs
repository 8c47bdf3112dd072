//! Frosting Timers
//!
//! Timer plumbing for a single-threaded event loop:
//! - [`Scheduler`]: cancellable one-shot timers
//! - [`ManualScheduler`]: simulated clock for tests
//! - [`Debouncer`]: restartable quiet-period timer
//! - [`CountdownLatch`]: fire-once callback after N signals

mod debounce;
mod latch;
mod scheduler;

pub use debounce::Debouncer;
pub use latch::CountdownLatch;
pub use scheduler::{ManualScheduler, Scheduler, Task, TimerId};
