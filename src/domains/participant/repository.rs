use crate::domains::participant::types::{
    NewProgramParticipant, ParticipantStatus, ProgramParticipant, ProgramParticipantRow,
};
use crate::errors::{DbError, DomainError, DomainResult};
use crate::types::{in_clause_placeholders, IN_CLAUSE_CHUNK_SIZE};
use crate::validation::{common, Validate};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

/// Trait defining program participant repository operations
#[async_trait]
pub trait ProgramParticipantRepository: Send + Sync {
    async fn create(&self, new_participant: &NewProgramParticipant) -> DomainResult<ProgramParticipant>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<ProgramParticipant>;

    /// Bulk read of every enrollment in any of the given programs. Enrollment
    /// order holds within each program; ids are read in chunks.
    async fn find_by_program_ids(&self, program_ids: &[Uuid]) -> DomainResult<Vec<ProgramParticipant>>;
}

/// SQLite implementation for ProgramParticipantRepository
#[derive(Debug, Clone)]
pub struct SqliteProgramParticipantRepository {
    pool: SqlitePool,
}

impl SqliteProgramParticipantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgramParticipantRepository for SqliteProgramParticipantRepository {
    async fn create(&self, new_participant: &NewProgramParticipant) -> DomainResult<ProgramParticipant> {
        new_participant.validate()?;
        common::validate_program_exists(&self.pool, &new_participant.program_id, "program_id").await?;

        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();
        let status = new_participant.status.unwrap_or(ParticipantStatus::Enrolled);
        let flags = new_participant.special_status;

        query(
            "INSERT INTO program_participants (
                id, program_id, name, age, gender,
                is_disabled, is_wounded, is_separated, is_unaccompanied,
                status, enrollment_date, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(id.to_string())
        .bind(new_participant.program_id.to_string())
        .bind(&new_participant.name)
        .bind(new_participant.age)
        .bind(new_participant.gender.as_str())
        .bind(flags.is_disabled)
        .bind(flags.is_wounded)
        .bind(flags.is_separated)
        .bind(flags.is_unaccompanied)
        .bind(status.as_str())
        .bind(&new_participant.enrollment_date)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<ProgramParticipant> {
        let row = query_as::<_, ProgramParticipantRow>("SELECT * FROM program_participants WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("ProgramParticipant".to_string(), id))?;

        row.into_entity()
    }

    async fn find_by_program_ids(&self, program_ids: &[Uuid]) -> DomainResult<Vec<ProgramParticipant>> {
        if program_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut participants = Vec::new();
        for chunk in program_ids.chunks(IN_CLAUSE_CHUNK_SIZE) {
            let sql = format!(
                "SELECT * FROM program_participants WHERE program_id IN ({}) ORDER BY created_at ASC, rowid ASC",
                in_clause_placeholders(chunk.len())
            );

            let mut select = query_as::<_, ProgramParticipantRow>(&sql);
            for id in chunk {
                select = select.bind(id.to_string());
            }

            let rows = select.fetch_all(&self.pool).await.map_err(DbError::from)?;
            for row in rows {
                participants.push(row.into_entity()?);
            }
        }

        Ok(participants)
    }
}
