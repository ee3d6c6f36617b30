mod app;
mod webhook;

pub use app::{router, State};
