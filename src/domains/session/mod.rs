pub mod repository;
pub mod types;

pub use repository::{SessionRepository, SqliteSessionRepository};
pub use types::{NewSession, Session, SessionStatus};
