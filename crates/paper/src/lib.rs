//! Simulated collaborators for running trigger strategies without a broker.

pub mod execution;
pub mod feed;

pub use execution::PaperExecution;
pub use feed::PaperFeed;
