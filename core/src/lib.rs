pub mod api;
pub mod backend;
pub mod bids;
pub mod config;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod runner;
