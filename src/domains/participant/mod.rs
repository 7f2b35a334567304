pub mod repository;
pub mod types;

pub use repository::{ProgramParticipantRepository, SqliteProgramParticipantRepository};
pub use types::{Gender, NewProgramParticipant, ParticipantStatus, ProgramParticipant, SpecialStatus};
