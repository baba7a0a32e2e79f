pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod lookup;
pub mod pipeline;
pub mod reader;
pub mod types;
