pub mod batch;
pub mod cli;
pub mod config;
pub mod jobs;
pub mod model;
pub mod prompt;
pub mod report;
pub mod summarize;
pub mod util;
