pub mod cache;
pub mod config;
pub mod error;
pub mod output;
pub mod rules;
pub mod scoring;
pub mod season;
pub mod simulate;
