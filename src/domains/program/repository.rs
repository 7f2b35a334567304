use crate::domains::program::types::{NewProgram, Program, ProgramRow, ProgramScope, ProgramStatus};
use crate::errors::{DbError, DomainError, DomainResult};
use crate::validation::Validate;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

/// Trait defining program repository operations
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    async fn create(&self, new_program: &NewProgram) -> DomainResult<Program>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Program>;

    /// Fetch every program inside the scope, oldest first
    async fn find_by_scope(&self, scope: &ProgramScope) -> DomainResult<Vec<Program>>;
}

/// SQLite implementation for ProgramRepository
#[derive(Debug, Clone)]
pub struct SqliteProgramRepository {
    pool: SqlitePool,
}

impl SqliteProgramRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_rows(rows: Vec<ProgramRow>) -> DomainResult<Vec<Program>> {
        rows.into_iter().map(ProgramRow::into_entity).collect()
    }
}

#[async_trait]
impl ProgramRepository for SqliteProgramRepository {
    async fn create(&self, new_program: &NewProgram) -> DomainResult<Program> {
        new_program.validate()?;

        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();
        let status = new_program.status.unwrap_or(ProgramStatus::Planned);

        query(
            "INSERT INTO programs (
                id, title, description, location, start_date, end_date,
                total_sessions, minimum_sessions_for_completion, conducted_by, status,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(id.to_string())
        .bind(&new_program.title)
        .bind(&new_program.description)
        .bind(&new_program.location)
        .bind(&new_program.start_date)
        .bind(&new_program.end_date)
        .bind(new_program.total_sessions)
        .bind(new_program.minimum_sessions_for_completion)
        .bind(new_program.conducted_by.to_string())
        .bind(status.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        self.find_by_id(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Program> {
        let row = query_as::<_, ProgramRow>("SELECT * FROM programs WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| DomainError::EntityNotFound("Program".to_string(), id))?;

        row.into_entity()
    }

    async fn find_by_scope(&self, scope: &ProgramScope) -> DomainResult<Vec<Program>> {
        let rows = match scope {
            ProgramScope::Single(id) => {
                query_as::<_, ProgramRow>("SELECT * FROM programs WHERE id = ?")
                    .bind(id.to_string())
                    .fetch_all(&self.pool)
                    .await
            }
            ProgramScope::All => {
                query_as::<_, ProgramRow>("SELECT * FROM programs ORDER BY created_at ASC, id ASC")
                    .fetch_all(&self.pool)
                    .await
            }
            ProgramScope::ConductedBy(user_id) => {
                query_as::<_, ProgramRow>(
                    "SELECT * FROM programs WHERE conducted_by = ? ORDER BY created_at ASC, id ASC"
                )
                .bind(user_id.to_string())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(DbError::from)?;

        Self::map_rows(rows)
    }
}
