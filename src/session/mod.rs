pub mod events;
pub mod store;

pub use events::AuthEvent;
pub use store::{keys, SessionPolicy, SessionState, SessionStore};
