//! Checkpointed data collection for paintshop QAOA experiments.
//!
//! Every experiment point is a [`Task`]: an experiment name plus a flat
//! parameter struct whose deterministic name selects a directory in the
//! [`TaskStore`]. Re-running a collection skips every task whose result is
//! already on disk, so long sweeps can be interrupted and resumed.
//!
//! ```rust
//! use paintshop_collect::{Task, TaskStore};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Point {
//!     gamma: f64,
//!     beta: f64,
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = TaskStore::open(dir.path()).unwrap();
//! let task = Task::new("demo", Point { gamma: 0.5, beta: 0.25 }).unwrap();
//! assert_eq!(task.name().unwrap(), "demo__beta=0.25__gamma=0.5");
//!
//! let value: f64 = store.run_or_load(&task, |p| Ok(p.gamma + p.beta)).unwrap();
//! assert_eq!(value, 0.75);
//! assert!(store.is_complete(&task).unwrap());
//! ```

pub mod config;
pub mod error;
pub mod store;
pub mod task;

pub use config::{CollectConfig, GridConfig};
pub use error::{CollectError, CollectResult};
pub use store::{ResultRecord, TaskEntry, TaskStore};
pub use task::{Task, experiment_of};
