pub mod models;
pub mod renderers;
pub mod senders;
pub mod service;
pub mod status;
pub mod truncate;
