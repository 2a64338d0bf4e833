//! API request handlers.

mod session;
mod types;

pub use session::*;
pub use types::*;
