use crate::errors::DomainResult;
use crate::types::{parse_datetime_column, parse_enum_column, parse_uuid_column};
use crate::validation::{common, Validate, ValidationBuilder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// Enrollment status of a participant within one program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParticipantStatus {
    Enrolled,
    Active,
    Completed,
    DroppedOut,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Enrolled => "enrolled",
            ParticipantStatus::Active => "active",
            ParticipantStatus::Completed => "completed",
            ParticipantStatus::DroppedOut => "dropped-out",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "enrolled" => Some(ParticipantStatus::Enrolled),
            "active" => Some(ParticipantStatus::Active),
            "completed" => Some(ParticipantStatus::Completed),
            "dropped-out" => Some(ParticipantStatus::DroppedOut),
            _ => None,
        }
    }
}

/// Four independent vulnerability flags; any combination is allowed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialStatus {
    pub is_disabled: bool,
    pub is_wounded: bool,
    pub is_separated: bool,
    pub is_unaccompanied: bool,
}

/// ProgramParticipant entity - the enrollment of one person in one program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramParticipant {
    pub id: Uuid,
    pub program_id: Uuid,
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    pub special_status: SpecialStatus,
    pub status: ParticipantStatus,
    pub enrollment_date: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// NewProgramParticipant DTO - used when enrolling a participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgramParticipant {
    pub program_id: Uuid,
    pub name: String,
    pub age: i64,
    pub gender: Gender,
    #[serde(default)]
    pub special_status: SpecialStatus,
    pub status: Option<ParticipantStatus>,
    pub enrollment_date: Option<String>,
}

impl Validate for NewProgramParticipant {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("program_id", Some(self.program_id))
            .not_nil()
            .validate()?;

        ValidationBuilder::new("name", Some(self.name.clone()))
            .required()
            .max_length(200)
            .validate()?;

        ValidationBuilder::new("age", Some(self.age))
            .range(0, 130)
            .validate()?;

        if let Some(date) = &self.enrollment_date {
            common::validate_date_format(date, "enrollment_date")?;
        }

        Ok(())
    }
}

/// ProgramParticipantRow - SQLite row representation for mapping from database
#[derive(Debug, Clone, FromRow)]
pub struct ProgramParticipantRow {
    pub id: String,
    pub program_id: String,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub is_disabled: bool,
    pub is_wounded: bool,
    pub is_separated: bool,
    pub is_unaccompanied: bool,
    pub status: String,
    pub enrollment_date: Option<String>,
    pub created_at: String,
}

impl ProgramParticipantRow {
    pub fn into_entity(self) -> DomainResult<ProgramParticipant> {
        Ok(ProgramParticipant {
            id: parse_uuid_column(&self.id, "program_participants.id")?,
            program_id: parse_uuid_column(&self.program_id, "program_participants.program_id")?,
            name: self.name,
            age: self.age,
            gender: parse_enum_column(&self.gender, "program_participants.gender", Gender::from_str)?,
            special_status: SpecialStatus {
                is_disabled: self.is_disabled,
                is_wounded: self.is_wounded,
                is_separated: self.is_separated,
                is_unaccompanied: self.is_unaccompanied,
            },
            status: parse_enum_column(&self.status, "program_participants.status", ParticipantStatus::from_str)?,
            enrollment_date: self.enrollment_date,
            created_at: parse_datetime_column(&self.created_at, "program_participants.created_at")?,
        })
    }
}
