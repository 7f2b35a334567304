use crate::errors::DomainResult;
use crate::types::{parse_datetime_column, parse_enum_column, parse_uuid_column};
use crate::validation::{common, Validate, ValidationBuilder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Status of a single program session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Planned,
    Ongoing,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Planned => "planned",
            SessionStatus::Ongoing => "ongoing",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(SessionStatus::Planned),
            "ongoing" => Some(SessionStatus::Ongoing),
            "completed" => Some(SessionStatus::Completed),
            "cancelled" => Some(SessionStatus::Cancelled),
            _ => None,
        }
    }
}

/// Session entity - one scheduled occurrence within a program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub program_id: Uuid,
    /// 1-based, unique within the program
    pub session_number: i64,
    pub title: String,
    pub session_date: Option<String>,
    pub status: SessionStatus,
    pub expected_participants: i64,
    pub created_at: DateTime<Utc>,
}

/// NewSession DTO - used when scheduling a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSession {
    pub program_id: Uuid,
    pub session_number: i64,
    pub title: String,
    pub session_date: Option<String>,
    pub status: Option<SessionStatus>,
    pub expected_participants: Option<i64>,
}

impl Validate for NewSession {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("program_id", Some(self.program_id))
            .not_nil()
            .validate()?;

        ValidationBuilder::new("session_number", Some(self.session_number))
            .min(1)
            .validate()?;

        ValidationBuilder::new("title", Some(self.title.clone()))
            .required()
            .max_length(200)
            .validate()?;

        if let Some(date) = &self.session_date {
            common::validate_date_format(date, "session_date")?;
        }

        if let Some(expected) = self.expected_participants {
            ValidationBuilder::new("expected_participants", Some(expected))
                .min(0)
                .validate()?;
        }

        Ok(())
    }
}

/// SessionRow - SQLite row representation for mapping from database
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: String,
    pub program_id: String,
    pub session_number: i64,
    pub title: String,
    pub session_date: Option<String>,
    pub status: String,
    pub expected_participants: i64,
    pub created_at: String,
}

impl SessionRow {
    pub fn into_entity(self) -> DomainResult<Session> {
        Ok(Session {
            id: parse_uuid_column(&self.id, "program_sessions.id")?,
            program_id: parse_uuid_column(&self.program_id, "program_sessions.program_id")?,
            session_number: self.session_number,
            title: self.title,
            session_date: self.session_date,
            status: parse_enum_column(&self.status, "program_sessions.status", SessionStatus::from_str)?,
            expected_participants: self.expected_participants,
            created_at: parse_datetime_column(&self.created_at, "program_sessions.created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_number_must_be_positive() {
        let session = NewSession {
            program_id: Uuid::new_v4(),
            session_number: 0,
            title: "Intro".to_string(),
            session_date: None,
            status: None,
            expected_participants: None,
        };
        assert!(session.validate().is_err());
    }

    #[test]
    fn test_row_with_unknown_status_fails_to_map() {
        let row = SessionRow {
            id: Uuid::new_v4().to_string(),
            program_id: Uuid::new_v4().to_string(),
            session_number: 1,
            title: "Intro".to_string(),
            session_date: None,
            status: "postponed".to_string(),
            expected_participants: 10,
            created_at: Utc::now().to_rfc3339(),
        };
        assert!(row.into_entity().is_err());
    }
}
