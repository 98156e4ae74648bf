//! Client side of recipebox: a typed HTTP client plus the session file it
//! keeps between runs. The `recipebox` binary is a thin terminal UI on top.

mod error;
mod http;
mod session;

pub use error::ClientError;
pub use http::{recipe_from_detail, RecipeboxClient, DEFAULT_API_URL};
pub use session::{Session, SessionStore, DEFAULT_SESSION_FILE};
