//! Session module - access token and the scoped state container.

mod session_state;

pub use session_state::{AccessToken, Session};
