use crate::domains::attendance::{AttendanceStatus, MaterialReceipt, SessionPerformance};
use crate::domains::participant::ProgramParticipant;
use crate::domains::program::Program;
use crate::domains::session::Session;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Full report for one program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramReport {
    pub program: Program,
    pub statistics: ProgramStatistics,
    pub sessions: Vec<SessionReport>,
    pub participants: Vec<ParticipantReport>,
    pub material_distribution: BTreeMap<String, MaterialDistribution>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramStatistics {
    pub total_enrolled_participants: i64,
    pub active_participants: i64,
    pub completed_participants: i64,
    pub dropped_out_participants: i64,
    pub total_sessions: i64,
    pub completed_sessions: i64,
    pub planned_sessions: i64,
    pub unique_attendees: i64,
    pub eligible_for_completion: i64,
    pub overall_attendance_rate: i64,
    pub completion_rate: i64,
    pub retention_rate: i64,
    pub age_groups: AgeGroups,
    pub gender_distribution: GenderDistribution,
    pub special_status: SpecialStatusCounts,
    /// Attendance records whose participant is not enrolled in the program
    pub orphaned_attendance_records: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGroups {
    #[serde(rename = "0-17")]
    pub under_18: i64,
    #[serde(rename = "18-35")]
    pub from_18_to_35: i64,
    #[serde(rename = "36-55")]
    pub from_36_to_55: i64,
    #[serde(rename = "56+")]
    pub over_55: i64,
}

impl AgeGroups {
    /// Boundaries: age < 18, 18..=35, 36..=55, age > 55
    pub fn record(&mut self, age: i64) {
        match age {
            a if a < 18 => self.under_18 += 1,
            18..=35 => self.from_18_to_35 += 1,
            36..=55 => self.from_36_to_55 += 1,
            _ => self.over_55 += 1,
        }
    }

    pub fn total(&self) -> i64 {
        self.under_18 + self.from_18_to_35 + self.from_36_to_55 + self.over_55
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderDistribution {
    pub male: i64,
    pub female: i64,
    pub other: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialStatusCounts {
    pub disabled: i64,
    pub wounded: i64,
    pub separated: i64,
    pub unaccompanied: i64,
}

/// A session with its attendance counters merged in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    #[serde(flatten)]
    pub session: Session,
    /// Records counting as present
    pub attendance_count: i64,
    pub total_attendance_records: i64,
}

/// A participant with the computed aggregate merged in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantReport {
    #[serde(flatten)]
    pub participant: ProgramParticipant,
    pub sessions_attended: i64,
    pub sessions_completed: i64,
    pub total_materials_received: Vec<MaterialTotal>,
    pub attendance_details: Vec<AttendanceDetail>,
    pub attendance_rate: i64,
    pub eligible_for_completion: bool,
}

/// Running total of one product received by one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialTotal {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub sessions_received: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDetail {
    pub session_id: Uuid,
    pub session_number: i64,
    pub session_title: String,
    pub session_date: Option<String>,
    pub attendance_status: AttendanceStatus,
    pub materials_received: Vec<MaterialReceipt>,
    pub session_performance: Option<SessionPerformance>,
}

/// Program-wide totals for one product name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDistribution {
    pub total_quantity: i64,
    pub unique_recipients: i64,
    pub sessions_distributed: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_band_boundaries() {
        let mut groups = AgeGroups::default();
        for age in [0, 17, 18, 35, 36, 55, 56, 90] {
            groups.record(age);
        }
        assert_eq!(groups, AgeGroups { under_18: 2, from_18_to_35: 2, from_36_to_55: 2, over_55: 2 });
        assert_eq!(groups.total(), 8);
    }

    #[test]
    fn test_age_groups_serialize_with_band_labels() {
        let json = serde_json::to_value(AgeGroups { under_18: 1, ..AgeGroups::default() }).unwrap();
        assert_eq!(json["0-17"], 1);
        assert_eq!(json["56+"], 0);
    }
}
