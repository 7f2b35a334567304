use crate::domains::attendance::{MaterialReceipt, SessionAttendance};
use crate::domains::participant::{Gender, ParticipantStatus, ProgramParticipant};
use crate::domains::program::Program;
use crate::domains::report::index::ReportIndex;
use crate::domains::report::rates::round_half_up_percent;
use crate::domains::report::types::{
    AttendanceDetail, MaterialDistribution, MaterialTotal, ParticipantReport, ProgramReport,
    ProgramStatistics, SessionReport,
};
use crate::domains::session::{Session, SessionStatus};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use uuid::Uuid;

/// Running aggregate for one enrolled participant during the attendance walk
struct ParticipantTally<'a> {
    participant: &'a ProgramParticipant,
    sessions_attended: i64,
    sessions_completed: i64,
    materials: Vec<MaterialTotal>,
    details: Vec<AttendanceDetail>,
}

impl<'a> ParticipantTally<'a> {
    fn new(participant: &'a ProgramParticipant) -> Self {
        Self {
            participant,
            sessions_attended: 0,
            sessions_completed: 0,
            materials: Vec::new(),
            details: Vec::new(),
        }
    }

    fn record(&mut self, session: &Session, record: &SessionAttendance) {
        self.details.push(AttendanceDetail {
            session_id: session.id,
            session_number: session.session_number,
            session_title: session.title.clone(),
            session_date: session.session_date.clone(),
            attendance_status: record.attendance_status,
            materials_received: record.session_materials_received.clone(),
            session_performance: record.session_performance,
        });

        if record.attendance_status.counts_as_present() {
            self.sessions_attended += 1;
        }
        if record.session_performance.map_or(false, |p| p.counts_as_completed()) {
            self.sessions_completed += 1;
        }
        for receipt in &record.session_materials_received {
            self.add_material(receipt, session.session_number);
        }
    }

    /// Fold by product id; a session is listed once per product
    fn add_material(&mut self, receipt: &MaterialReceipt, session_number: i64) {
        match self.materials.iter_mut().find(|m| m.product_id == receipt.product_id) {
            Some(total) => {
                total.quantity += receipt.quantity;
                if !total.sessions_received.contains(&session_number) {
                    total.sessions_received.push(session_number);
                }
            }
            None => self.materials.push(MaterialTotal {
                product_id: receipt.product_id.clone(),
                product_name: receipt.product_name.clone(),
                quantity: receipt.quantity,
                sessions_received: vec![session_number],
            }),
        }
    }

    fn into_report(self, completed_sessions: i64, minimum_for_completion: i64) -> ParticipantReport {
        ParticipantReport {
            participant: self.participant.clone(),
            sessions_attended: self.sessions_attended,
            sessions_completed: self.sessions_completed,
            total_materials_received: self.materials,
            attendance_details: self.details,
            attendance_rate: round_half_up_percent(self.sessions_attended, completed_sessions),
            eligible_for_completion: self.sessions_attended >= minimum_for_completion,
        }
    }
}

#[derive(Default)]
struct ProductTally {
    total_quantity: i64,
    recipients: HashSet<Uuid>,
    sessions: BTreeSet<i64>,
}

/// Build the report for one program from the pre-fetched index.
///
/// Pure: the same program and index always produce the same report.
pub fn build_program_report(program: &Program, index: &ReportIndex<'_>) -> ProgramReport {
    let sessions = index.sessions_for(program.id);
    let participants = index.participants_for(program.id);
    let mut stats = ProgramStatistics::default();

    for participant in participants {
        match participant.status {
            ParticipantStatus::Enrolled | ParticipantStatus::Active => stats.active_participants += 1,
            ParticipantStatus::Completed => stats.completed_participants += 1,
            ParticipantStatus::DroppedOut => stats.dropped_out_participants += 1,
        }
        stats.age_groups.record(participant.age);
        match participant.gender {
            Gender::Male => stats.gender_distribution.male += 1,
            Gender::Female => stats.gender_distribution.female += 1,
            Gender::Other => stats.gender_distribution.other += 1,
        }
        let flags = participant.special_status;
        stats.special_status.disabled += i64::from(flags.is_disabled);
        stats.special_status.wounded += i64::from(flags.is_wounded);
        stats.special_status.separated += i64::from(flags.is_separated);
        stats.special_status.unaccompanied += i64::from(flags.is_unaccompanied);
    }
    stats.total_enrolled_participants = participants.len() as i64;

    for session in sessions {
        match session.status {
            SessionStatus::Completed => stats.completed_sessions += 1,
            SessionStatus::Planned => stats.planned_sessions += 1,
            _ => {}
        }
    }
    stats.total_sessions = sessions.len() as i64;

    // Every enrolled participant shows up, attended or not
    let mut tallies: Vec<ParticipantTally<'_>> = participants.iter().map(|p| ParticipantTally::new(*p)).collect();
    let slots: HashMap<Uuid, usize> = participants.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
    let mut unique_attendees: HashSet<Uuid> = HashSet::new();
    let mut session_reports = Vec::with_capacity(sessions.len());

    for session in sessions {
        let records = index.attendance_for(session.id);
        let mut attendance_count = 0;

        for record in records {
            let Some(&slot) = slots.get(&record.program_participant_id) else {
                stats.orphaned_attendance_records += 1;
                continue;
            };
            tallies[slot].record(session, record);
            if record.attendance_status.counts_as_present() {
                unique_attendees.insert(record.program_participant_id);
                attendance_count += 1;
            }
        }

        session_reports.push(SessionReport {
            session: (*session).clone(),
            attendance_count,
            total_attendance_records: records.len() as i64,
        });
    }
    stats.unique_attendees = unique_attendees.len() as i64;

    let mut products: BTreeMap<String, ProductTally> = BTreeMap::new();
    for tally in &tallies {
        for material in &tally.materials {
            let product = products.entry(material.product_name.clone()).or_default();
            product.total_quantity += material.quantity;
            product.recipients.insert(tally.participant.id);
            product.sessions.extend(material.sessions_received.iter().copied());
        }
    }
    let material_distribution = products
        .into_iter()
        .map(|(name, product)| {
            (name, MaterialDistribution {
                total_quantity: product.total_quantity,
                unique_recipients: product.recipients.len() as i64,
                sessions_distributed: product.sessions.len() as i64,
            })
        })
        .collect();

    let total_attended: i64 = tallies.iter().map(|t| t.sessions_attended).sum();
    stats.eligible_for_completion = tallies
        .iter()
        .filter(|t| t.sessions_attended >= program.minimum_sessions_for_completion)
        .count() as i64;
    stats.overall_attendance_rate = round_half_up_percent(
        total_attended,
        stats.total_enrolled_participants * stats.completed_sessions,
    );
    stats.completion_rate = round_half_up_percent(stats.completed_participants, stats.total_enrolled_participants);
    stats.retention_rate = round_half_up_percent(
        stats.total_enrolled_participants - stats.dropped_out_participants,
        stats.total_enrolled_participants,
    );

    let participant_reports = tallies
        .into_iter()
        .map(|t| t.into_report(stats.completed_sessions, program.minimum_sessions_for_completion))
        .collect();

    ProgramReport {
        program: program.clone(),
        statistics: stats,
        sessions: session_reports,
        participants: participant_reports,
        material_distribution,
    }
}
