use crate::domains::session::types::{NewSession, Session, SessionRow, SessionStatus};
use crate::errors::{DbError, DomainError, DomainResult, ValidationError};
use crate::types::{in_clause_placeholders, IN_CLAUSE_CHUNK_SIZE};
use crate::validation::{common, Validate};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

/// Trait defining session repository operations
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, new_session: &NewSession) -> DomainResult<Session>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Session>;

    /// Bulk read of every session belonging to any of the given programs,
    /// ordered by program then session number. Any number of ids is accepted.
    async fn find_by_program_ids(&self, program_ids: &[Uuid]) -> DomainResult<Vec<Session>>;
}

/// SQLite implementation for SessionRepository
#[derive(Debug, Clone)]
pub struct SqliteSessionRepository {
    pool: SqlitePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for SqliteSessionRepository {
    async fn create(&self, new_session: &NewSession) -> DomainResult<Session> {
        new_session.validate()?;
        common::validate_program_exists(&self.pool, &new_session.program_id, "program_id").await?;

        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();
        let status = new_session.status.unwrap_or(SessionStatus::Planned);

        let result = query(
            "INSERT INTO program_sessions (
                id, program_id, session_number, title, session_date, status,
                expected_participants, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(id.to_string())
        .bind(new_session.program_id.to_string())
        .bind(new_session.session_number)
        .bind(&new_session.title)
        .bind(&new_session.session_date)
        .bind(status.as_str())
        .bind(new_session.expected_participants.unwrap_or(0))
        .bind(&now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(DomainError::Validation(ValidationError::invalid_value(
                    "session_number",
                    "is already used in this program",
                )));
            }
            Err(e) => return Err(DbError::from(e).into()),
        }

        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Session> {
        let row = query_as::<_, SessionRow>("SELECT * FROM program_sessions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("Session".to_string(), id))?;

        row.into_entity()
    }

    async fn find_by_program_ids(&self, program_ids: &[Uuid]) -> DomainResult<Vec<Session>> {
        if program_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut sessions = Vec::new();
        for chunk in program_ids.chunks(IN_CLAUSE_CHUNK_SIZE) {
            let sql = format!(
                "SELECT * FROM program_sessions WHERE program_id IN ({}) ORDER BY program_id ASC, session_number ASC",
                in_clause_placeholders(chunk.len())
            );

            let mut select = query_as::<_, SessionRow>(&sql);
            for id in chunk {
                select = select.bind(id.to_string());
            }

            let rows = select.fetch_all(&self.pool).await.map_err(DbError::from)?;
            for row in rows {
                sessions.push(row.into_entity()?);
            }
        }

        // Uuid ordering matches the TEXT ordering of the hyphenated column
        sessions.sort_by_key(|s| (s.program_id, s.session_number));
        Ok(sessions)
    }
}
