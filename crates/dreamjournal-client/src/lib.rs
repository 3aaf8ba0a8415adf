//! Session and REST client core for the dream journal.
//!
//! [`SessionManager`] owns the signed-in identity and its persistence;
//! [`ApiClient`] is the typed gateway every view calls.

pub mod config;
pub mod error;
pub mod gateway;
pub mod session;
pub mod token;
pub mod validation;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use gateway::ApiClient;
pub use session::{Redirect, Session, SessionManager};
pub use validation::ValidationError;
