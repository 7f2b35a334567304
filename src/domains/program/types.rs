use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::types::{parse_datetime_column, parse_enum_column, parse_uuid_column};
use crate::validation::{common, Validate, ValidationBuilder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle status of a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramStatus {
    Planned,
    Active,
    Completed,
    Cancelled,
}

impl ProgramStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramStatus::Planned => "planned",
            ProgramStatus::Active => "active",
            ProgramStatus::Completed => "completed",
            ProgramStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(ProgramStatus::Planned),
            "active" => Some(ProgramStatus::Active),
            "completed" => Some(ProgramStatus::Completed),
            "cancelled" => Some(ProgramStatus::Cancelled),
            _ => None,
        }
    }
}

/// Program entity - a multi-session activity with a fixed roster and a completion threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: String, // ISO date format YYYY-MM-DD
    pub end_date: Option<String>,
    /// Number of sessions the program plans to run
    pub total_sessions: i64,
    pub minimum_sessions_for_completion: i64,
    pub conducted_by: Uuid,
    pub status: ProgramStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which programs a caller is allowed to see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramScope {
    /// Exactly one program, ownership is checked after the fetch
    Single(Uuid),
    /// Every program
    All,
    /// Programs conducted by the given user
    ConductedBy(Uuid),
}

/// NewProgram DTO - used when creating a new program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgram {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub total_sessions: i64,
    pub minimum_sessions_for_completion: i64,
    pub conducted_by: Uuid,
    pub status: Option<ProgramStatus>,
}

impl Validate for NewProgram {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("title", Some(self.title.clone()))
            .required()
            .min_length(2)
            .max_length(200)
            .validate()?;

        ValidationBuilder::new("conducted_by", Some(self.conducted_by))
            .not_nil()
            .validate()?;

        common::validate_date_format(&self.start_date, "start_date")?;
        if let Some(end_date) = &self.end_date {
            common::validate_date_format(end_date, "end_date")?;
            // ISO dates compare correctly as strings
            if end_date < &self.start_date {
                return Err(DomainError::Validation(ValidationError::invalid_value(
                    "end_date", "cannot be before start_date"
                )));
            }
        }

        ValidationBuilder::new("total_sessions", Some(self.total_sessions))
            .min(1)
            .validate()?;

        ValidationBuilder::new("minimum_sessions_for_completion", Some(self.minimum_sessions_for_completion))
            .range(1, self.total_sessions)
            .validate()?;

        Ok(())
    }
}

/// ProgramRow - SQLite row representation for mapping from database
#[derive(Debug, Clone, FromRow)]
pub struct ProgramRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub total_sessions: i64,
    pub minimum_sessions_for_completion: i64,
    pub conducted_by: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ProgramRow {
    pub fn into_entity(self) -> DomainResult<Program> {
        Ok(Program {
            id: parse_uuid_column(&self.id, "programs.id")?,
            title: self.title,
            description: self.description,
            location: self.location,
            start_date: self.start_date,
            end_date: self.end_date,
            total_sessions: self.total_sessions,
            minimum_sessions_for_completion: self.minimum_sessions_for_completion,
            conducted_by: parse_uuid_column(&self.conducted_by, "programs.conducted_by")?,
            status: parse_enum_column(&self.status, "programs.status", ProgramStatus::from_str)?,
            created_at: parse_datetime_column(&self.created_at, "programs.created_at")?,
            updated_at: parse_datetime_column(&self.updated_at, "programs.updated_at")?,
        })
    }
}
