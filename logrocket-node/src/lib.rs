pub mod actions;
pub mod batch;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod operation;
pub mod params;
