//! Fixtures shared by the unit tests

use crate::db_migration::initialize_database;
use crate::domains::attendance::{AttendanceStatus, NewSessionAttendance};
use crate::domains::participant::{Gender, NewProgramParticipant, SpecialStatus};
use crate::domains::program::NewProgram;
use crate::domains::session::{NewSession, SessionStatus};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Every `sqlite::memory:` connection is its own database, so the pool holds exactly one
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite pool")
}

pub async fn migrated_pool() -> SqlitePool {
    let pool = memory_pool().await;
    initialize_database(&pool).await.expect("migrations apply");
    pool
}

pub fn new_program(title: &str, conducted_by: Uuid, total_sessions: i64, minimum: i64) -> NewProgram {
    NewProgram {
        title: title.to_string(),
        description: None,
        location: Some("Community centre".to_string()),
        start_date: "2025-06-01".to_string(),
        end_date: Some("2025-08-31".to_string()),
        total_sessions,
        minimum_sessions_for_completion: minimum,
        conducted_by,
        status: None,
    }
}

pub fn new_session(program_id: Uuid, session_number: i64, status: SessionStatus) -> NewSession {
    NewSession {
        program_id,
        session_number,
        title: format!("Session {}", session_number),
        session_date: Some(format!("2025-06-{:02}", session_number.clamp(1, 28))),
        status: Some(status),
        expected_participants: Some(10),
    }
}

pub fn new_participant(program_id: Uuid, age: i64, gender: Gender) -> NewProgramParticipant {
    NewProgramParticipant {
        program_id,
        name: format!("Participant aged {}", age),
        age,
        gender,
        special_status: SpecialStatus::default(),
        status: None,
        enrollment_date: Some("2025-06-01".to_string()),
    }
}

pub fn new_attendance(session_id: Uuid, participant_id: Uuid, status: AttendanceStatus) -> NewSessionAttendance {
    NewSessionAttendance {
        session_id,
        program_participant_id: participant_id,
        attendance_status: status,
        session_performance: None,
        session_materials_received: Vec::new(),
        notes: None,
    }
}
