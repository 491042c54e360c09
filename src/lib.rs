pub mod api;
pub mod core;
pub mod donation;
pub mod session;
