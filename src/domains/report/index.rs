use crate::domains::attendance::SessionAttendance;
use crate::domains::participant::ProgramParticipant;
use crate::domains::session::Session;
use std::collections::HashMap;
use uuid::Uuid;

/// Lookup tables over one batch of fetched rows.
///
/// Owned by a single report-generation call and dropped with it. Each bucket
/// keeps the order the rows were fetched in.
#[derive(Debug, Default)]
pub struct ReportIndex<'a> {
    sessions_by_program: HashMap<Uuid, Vec<&'a Session>>,
    participants_by_program: HashMap<Uuid, Vec<&'a ProgramParticipant>>,
    attendance_by_session: HashMap<Uuid, Vec<&'a SessionAttendance>>,
}

impl<'a> ReportIndex<'a> {
    pub fn build(
        sessions: &'a [Session],
        participants: &'a [ProgramParticipant],
        attendance: &'a [SessionAttendance],
    ) -> Self {
        let mut index = Self::default();

        for session in sessions {
            index.sessions_by_program.entry(session.program_id).or_default().push(session);
        }
        for participant in participants {
            index
                .participants_by_program
                .entry(participant.program_id)
                .or_default()
                .push(participant);
        }
        for record in attendance {
            index.attendance_by_session.entry(record.session_id).or_default().push(record);
        }

        index
    }

    pub fn sessions_for(&self, program_id: Uuid) -> &[&'a Session] {
        self.sessions_by_program.get(&program_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn participants_for(&self, program_id: Uuid) -> &[&'a ProgramParticipant] {
        self.participants_by_program.get(&program_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn attendance_for(&self, session_id: Uuid) -> &[&'a SessionAttendance] {
        self.attendance_by_session.get(&session_id).map(Vec::as_slice).unwrap_or(&[])
    }
}
