//! The submit, poll and paginate pipeline.
//!
//! Each stage is usable on its own; `QueryRunner` chains them for the CLI.

pub mod paginator;
pub mod poller;
pub mod runner;
pub mod submitter;

pub use paginator::{Paginator, ResultPages, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use poller::{PollOptions, Poller, DEFAULT_POLL_INTERVAL};
pub use runner::{QueryOutcome, QueryRunner, RunOptions};
pub use submitter::{SubmitOptions, Submitter};
