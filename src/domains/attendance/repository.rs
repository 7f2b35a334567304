use crate::domains::attendance::types::{NewSessionAttendance, SessionAttendance, SessionAttendanceRow};
use crate::errors::{DbError, DomainError, DomainResult, ValidationError};
use crate::types::{in_clause_placeholders, IN_CLAUSE_CHUNK_SIZE};
use crate::validation::{common, Validate};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, query_scalar, SqlitePool};
use uuid::Uuid;

/// Trait defining session attendance repository operations
#[async_trait]
pub trait SessionAttendanceRepository: Send + Sync {
    async fn create(&self, new_attendance: &NewSessionAttendance) -> DomainResult<SessionAttendance>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<SessionAttendance>;

    /// Bulk read of every attendance record for any of the given sessions. Recording
    /// order holds within each session; ids are read in chunks.
    async fn find_by_session_ids(&self, session_ids: &[Uuid]) -> DomainResult<Vec<SessionAttendance>>;
}

/// SQLite implementation for SessionAttendanceRepository
#[derive(Debug, Clone)]
pub struct SqliteSessionAttendanceRepository {
    pool: SqlitePool,
}

impl SqliteSessionAttendanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The participant must be enrolled in the program the session belongs to
    async fn validate_same_program(&self, session_id: Uuid, participant_id: Uuid) -> DomainResult<()> {
        let matches: i64 = query_scalar(
            "SELECT COUNT(*) FROM program_sessions s
             JOIN program_participants p ON p.program_id = s.program_id
             WHERE s.id = ? AND p.id = ?"
        )
        .bind(session_id.to_string())
        .bind(participant_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;

        if matches == 0 {
            return Err(DomainError::Validation(ValidationError::relationship(
                "program_participant_id is not enrolled in the session's program",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionAttendanceRepository for SqliteSessionAttendanceRepository {
    async fn create(&self, new_attendance: &NewSessionAttendance) -> DomainResult<SessionAttendance> {
        new_attendance.validate()?;
        common::validate_session_exists(&self.pool, &new_attendance.session_id, "session_id").await?;
        common::validate_participant_exists(
            &self.pool,
            &new_attendance.program_participant_id,
            "program_participant_id",
        )
        .await?;
        self.validate_same_program(new_attendance.session_id, new_attendance.program_participant_id).await?;

        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();
        let materials = serde_json::to_string(&new_attendance.session_materials_received)
            .map_err(|e| DomainError::Internal(format!("Failed to encode materials: {}", e)))?;

        query(
            "INSERT INTO session_attendance (
                id, session_id, program_participant_id, attendance_status,
                session_performance, session_materials_received, notes, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(id.to_string())
        .bind(new_attendance.session_id.to_string())
        .bind(new_attendance.program_participant_id.to_string())
        .bind(new_attendance.attendance_status.as_str())
        .bind(new_attendance.session_performance.map(|p| p.as_str()))
        .bind(materials)
        .bind(&new_attendance.notes)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<SessionAttendance> {
        let row = query_as::<_, SessionAttendanceRow>("SELECT * FROM session_attendance WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("SessionAttendance".to_string(), id))?;

        row.into_entity()
    }

    async fn find_by_session_ids(&self, session_ids: &[Uuid]) -> DomainResult<Vec<SessionAttendance>> {
        if session_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for chunk in session_ids.chunks(IN_CLAUSE_CHUNK_SIZE) {
            let sql = format!(
                "SELECT * FROM session_attendance WHERE session_id IN ({}) ORDER BY created_at ASC, rowid ASC",
                in_clause_placeholders(chunk.len())
            );

            let mut select = query_as::<_, SessionAttendanceRow>(&sql);
            for id in chunk {
                select = select.bind(id.to_string());
            }

            let rows = select.fetch_all(&self.pool).await.map_err(DbError::from)?;
            for row in rows {
                records.push(row.into_entity()?);
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::attendance::types::{AttendanceStatus, MaterialReceipt, SessionPerformance};
    use crate::domains::participant::{Gender, ProgramParticipantRepository, SqliteProgramParticipantRepository};
    use crate::domains::program::{ProgramRepository, SqliteProgramRepository};
    use crate::domains::session::{SessionRepository, SessionStatus, SqliteSessionRepository};
    use crate::test_support::{migrated_pool, new_participant, new_program, new_session};

    fn record(session_id: Uuid, participant_id: Uuid) -> NewSessionAttendance {
        NewSessionAttendance {
            session_id,
            program_participant_id: participant_id,
            attendance_status: AttendanceStatus::Attended,
            session_performance: Some(SessionPerformance::Good),
            session_materials_received: vec![MaterialReceipt {
                product_id: "kit-1".to_string(),
                product_name: "School kit".to_string(),
                quantity: 1,
            }],
            notes: Some("Arrived with sibling".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_bulk_read() {
        let pool = migrated_pool().await;
        let programs = SqliteProgramRepository::new(pool.clone());
        let sessions = SqliteSessionRepository::new(pool.clone());
        let participants = SqliteProgramParticipantRepository::new(pool.clone());
        let attendance = SqliteSessionAttendanceRepository::new(pool);

        let program = programs.create(&new_program("Attendance", Uuid::new_v4(), 6, 4)).await.unwrap();
        let s1 = sessions.create(&new_session(program.id, 1, SessionStatus::Completed)).await.unwrap();
        let s2 = sessions.create(&new_session(program.id, 2, SessionStatus::Completed)).await.unwrap();
        let p = participants.create(&new_participant(program.id, 14, Gender::Female)).await.unwrap();

        let created = attendance.create(&record(s1.id, p.id)).await.unwrap();
        assert_eq!(created.session_materials_received.len(), 1);
        assert_eq!(created.session_performance, Some(SessionPerformance::Good));
        attendance.create(&record(s2.id, p.id)).await.unwrap();

        let only_first = attendance.find_by_session_ids(&[s1.id]).await.unwrap();
        assert_eq!(only_first, vec![created]);

        let both = attendance.find_by_session_ids(&[s1.id, s2.id]).await.unwrap();
        assert_eq!(both.len(), 2);
        assert!(attendance.find_by_session_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_participant_from_other_program_is_rejected() {
        let pool = migrated_pool().await;
        let programs = SqliteProgramRepository::new(pool.clone());
        let sessions = SqliteSessionRepository::new(pool.clone());
        let participants = SqliteProgramParticipantRepository::new(pool.clone());
        let attendance = SqliteSessionAttendanceRepository::new(pool);

        let owner = Uuid::new_v4();
        let program = programs.create(&new_program("Here", owner, 6, 4)).await.unwrap();
        let elsewhere = programs.create(&new_program("There", owner, 6, 4)).await.unwrap();
        let session = sessions.create(&new_session(program.id, 1, SessionStatus::Completed)).await.unwrap();
        let stranger = participants.create(&new_participant(elsewhere.id, 30, Gender::Male)).await.unwrap();

        let result = attendance.create(&record(session.id, stranger.id)).await;
        assert!(matches!(result, Err(DomainError::Validation(ValidationError::Relationship(_)))));
    }

    #[tokio::test]
    async fn test_bulk_read_past_sqlite_variable_limit() {
        let pool = migrated_pool().await;
        let programs = SqliteProgramRepository::new(pool.clone());
        let sessions = SqliteSessionRepository::new(pool.clone());
        let participants = SqliteProgramParticipantRepository::new(pool.clone());
        let attendance = SqliteSessionAttendanceRepository::new(pool);

        let program = programs.create(&new_program("Crowded", Uuid::new_v4(), 6, 4)).await.unwrap();
        let s1 = sessions.create(&new_session(program.id, 1, SessionStatus::Completed)).await.unwrap();
        let s2 = sessions.create(&new_session(program.id, 2, SessionStatus::Completed)).await.unwrap();
        let a = participants.create(&new_participant(program.id, 14, Gender::Female)).await.unwrap();
        let b = participants.create(&new_participant(program.id, 15, Gender::Male)).await.unwrap();

        let first = attendance.create(&record(s2.id, a.id)).await.unwrap();
        let second = attendance.create(&record(s2.id, b.id)).await.unwrap();
        attendance.create(&record(s1.id, a.id)).await.unwrap();

        let mut ids = vec![s1.id];
        ids.extend((0..33_000).map(|_| Uuid::new_v4()));
        ids.push(s2.id);

        let fetched = attendance.find_by_session_ids(&ids).await.unwrap();
        assert_eq!(fetched.len(), 3);

        let s2_ids: Vec<Uuid> = fetched.iter().filter(|r| r.session_id == s2.id).map(|r| r.id).collect();
        assert_eq!(s2_ids, vec![first.id, second.id]);
    }
}
