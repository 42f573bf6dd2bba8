pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod manifest;
pub mod pipeline;
pub mod report;
pub mod types;
