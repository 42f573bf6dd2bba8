pub mod activity;
pub mod geo;
