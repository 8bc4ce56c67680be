//! Identity types, token secrets, and the credential pair held by the session.

pub mod credential;
pub mod id;
pub mod secret;

pub use credential::*;
pub use id::*;
pub use secret::*;
