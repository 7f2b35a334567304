use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::types::{parse_datetime_column, parse_enum_column, parse_uuid_column};
use crate::validation::{Validate, ValidationBuilder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Presence of one participant at one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Registered,
    Attended,
    Absent,
    Late,
    LeftEarly,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Registered => "registered",
            AttendanceStatus::Attended => "attended",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::LeftEarly => "left-early",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "registered" => Some(AttendanceStatus::Registered),
            "attended" => Some(AttendanceStatus::Attended),
            "absent" => Some(AttendanceStatus::Absent),
            "late" => Some(AttendanceStatus::Late),
            "left-early" => Some(AttendanceStatus::LeftEarly),
            _ => None,
        }
    }

    /// Late arrivals and early leavers were still there
    pub fn counts_as_present(&self) -> bool {
        matches!(
            self,
            AttendanceStatus::Attended | AttendanceStatus::Late | AttendanceStatus::LeftEarly
        )
    }
}

/// Facilitator's rating of a participant's session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionPerformance {
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
    Poor,
}

impl SessionPerformance {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPerformance::Excellent => "excellent",
            SessionPerformance::Good => "good",
            SessionPerformance::Satisfactory => "satisfactory",
            SessionPerformance::NeedsImprovement => "needs-improvement",
            SessionPerformance::Poor => "poor",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "excellent" => Some(SessionPerformance::Excellent),
            "good" => Some(SessionPerformance::Good),
            "satisfactory" => Some(SessionPerformance::Satisfactory),
            "needs-improvement" => Some(SessionPerformance::NeedsImprovement),
            "poor" => Some(SessionPerformance::Poor),
            _ => None,
        }
    }

    /// Whether the rating is good enough for the session to count as completed
    pub fn counts_as_completed(&self) -> bool {
        matches!(
            self,
            SessionPerformance::Excellent | SessionPerformance::Good | SessionPerformance::Satisfactory
        )
    }
}

/// One line of material handed to a participant at a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialReceipt {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
}

/// SessionAttendance entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAttendance {
    pub id: Uuid,
    pub session_id: Uuid,
    pub program_participant_id: Uuid,
    pub attendance_status: AttendanceStatus,
    pub session_performance: Option<SessionPerformance>,
    pub session_materials_received: Vec<MaterialReceipt>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// NewSessionAttendance DTO - used when recording attendance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSessionAttendance {
    pub session_id: Uuid,
    pub program_participant_id: Uuid,
    pub attendance_status: AttendanceStatus,
    pub session_performance: Option<SessionPerformance>,
    #[serde(default)]
    pub session_materials_received: Vec<MaterialReceipt>,
    pub notes: Option<String>,
}

impl Validate for NewSessionAttendance {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("session_id", Some(self.session_id))
            .not_nil()
            .validate()?;

        ValidationBuilder::new("program_participant_id", Some(self.program_participant_id))
            .not_nil()
            .validate()?;

        for material in &self.session_materials_received {
            ValidationBuilder::new("product_id", Some(material.product_id.clone()))
                .required()
                .validate()?;
            ValidationBuilder::new("product_name", Some(material.product_name.clone()))
                .required()
                .validate()?;
            if material.quantity <= 0 {
                return Err(DomainError::Validation(ValidationError::invalid_value(
                    "quantity", "must be positive"
                )));
            }
        }

        Ok(())
    }
}

/// SessionAttendanceRow - SQLite row representation for mapping from database
#[derive(Debug, Clone, FromRow)]
pub struct SessionAttendanceRow {
    pub id: String,
    pub session_id: String,
    pub program_participant_id: String,
    pub attendance_status: String,
    pub session_performance: Option<String>,
    pub session_materials_received: String,
    pub notes: Option<String>,
    pub created_at: String,
}

impl SessionAttendanceRow {
    pub fn into_entity(self) -> DomainResult<SessionAttendance> {
        let session_performance = self
            .session_performance
            .as_deref()
            .map(|value| parse_enum_column(value, "session_attendance.session_performance", SessionPerformance::from_str))
            .transpose()?;

        let session_materials_received: Vec<MaterialReceipt> = serde_json::from_str(&self.session_materials_received)
            .map_err(|e| DomainError::Internal(format!(
                "Invalid JSON in session_attendance.session_materials_received for {}: {}", self.id, e
            )))?;

        Ok(SessionAttendance {
            id: parse_uuid_column(&self.id, "session_attendance.id")?,
            session_id: parse_uuid_column(&self.session_id, "session_attendance.session_id")?,
            program_participant_id: parse_uuid_column(
                &self.program_participant_id,
                "session_attendance.program_participant_id",
            )?,
            attendance_status: parse_enum_column(
                &self.attendance_status,
                "session_attendance.attendance_status",
                AttendanceStatus::from_str,
            )?,
            session_performance,
            session_materials_received,
            notes: self.notes,
            created_at: parse_datetime_column(&self.created_at, "session_attendance.created_at")?,
        })
    }
}
