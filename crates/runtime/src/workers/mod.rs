//! Worker tasks that back the session orchestration.

mod session;

pub use session::{Command, SessionWorker};
