pub mod repository;
pub mod types;

pub use repository::{ProgramRepository, SqliteProgramRepository};
pub use types::{NewProgram, Program, ProgramScope, ProgramStatus};
