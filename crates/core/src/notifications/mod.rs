//! Notifications module.
//!
//! The lifecycle controller reports every action outcome through the
//! `NotificationSink` trait. Front ends implement the sink to show toasts,
//! print to the terminal, and so on.

mod notification;
mod sink;

pub use notification::*;
pub use sink::*;
