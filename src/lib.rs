pub mod config;
pub mod event;
pub mod notifications;

pub use config::{Args, CardStyle, HandlerConfig};
pub use event::Event;
pub use notifications::service::{HandlerError, TeamsHandler};
