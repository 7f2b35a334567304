use crate::auth::AuthContext;
use crate::domains::attendance::{SessionAttendanceRepository, SqliteSessionAttendanceRepository};
use crate::domains::participant::{ProgramParticipantRepository, SqliteProgramParticipantRepository};
use crate::domains::program::{ProgramRepository, ProgramScope, SqliteProgramRepository};
use crate::domains::report::engine::build_program_report;
use crate::domains::report::index::ReportIndex;
use crate::domains::report::types::ProgramReport;
use crate::domains::report::visibility::{ensure_program_access, resolve_scope};
use crate::domains::session::{SessionRepository, SqliteSessionRepository};
use crate::errors::ServiceResult;
use async_trait::async_trait;
use log::{debug, info, warn};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// Trait defining program report operations
#[async_trait]
pub trait ProgramReportService: Send + Sync {
    /// Reports for every program visible to the caller, or for one program when `program_id` is given
    async fn get_program_reports(
        &self,
        program_id: Option<Uuid>,
        auth: &AuthContext,
    ) -> ServiceResult<Vec<ProgramReport>>;
}

/// Implementation of the program report service
#[derive(Clone)]
pub struct ProgramReportServiceImpl {
    program_repo: Arc<dyn ProgramRepository>,
    session_repo: Arc<dyn SessionRepository>,
    participant_repo: Arc<dyn ProgramParticipantRepository>,
    attendance_repo: Arc<dyn SessionAttendanceRepository>,
}

impl ProgramReportServiceImpl {
    pub fn new(
        program_repo: Arc<dyn ProgramRepository>,
        session_repo: Arc<dyn SessionRepository>,
        participant_repo: Arc<dyn ProgramParticipantRepository>,
        attendance_repo: Arc<dyn SessionAttendanceRepository>,
    ) -> Self {
        Self {
            program_repo,
            session_repo,
            participant_repo,
            attendance_repo,
        }
    }

    /// Wire the SQLite repositories over one pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self::new(
            Arc::new(SqliteProgramRepository::new(pool.clone())),
            Arc::new(SqliteSessionRepository::new(pool.clone())),
            Arc::new(SqliteProgramParticipantRepository::new(pool.clone())),
            Arc::new(SqliteSessionAttendanceRepository::new(pool)),
        )
    }
}

#[async_trait]
impl ProgramReportService for ProgramReportServiceImpl {
    async fn get_program_reports(
        &self,
        program_id: Option<Uuid>,
        auth: &AuthContext,
    ) -> ServiceResult<Vec<ProgramReport>> {
        let scope = resolve_scope(auth, program_id)?;
        let programs = self.program_repo.find_by_scope(&scope).await?;

        if let (ProgramScope::Single(_), Some(program)) = (scope, programs.first()) {
            ensure_program_access(auth, program)?;
        }

        if programs.is_empty() {
            info!("Program reports for user {} ({:?}): no visible programs", auth.user_id, scope);
            return Ok(Vec::new());
        }

        let program_ids: Vec<Uuid> = programs.iter().map(|p| p.id).collect();
        let (sessions, participants) = tokio::try_join!(
            self.session_repo.find_by_program_ids(&program_ids),
            self.participant_repo.find_by_program_ids(&program_ids),
        )?;

        let session_ids: Vec<Uuid> = sessions.iter().map(|s| s.id).collect();
        let attendance = self.attendance_repo.find_by_session_ids(&session_ids).await?;
        debug!(
            "Fetched {} sessions, {} participants, {} attendance records for {} programs",
            sessions.len(),
            participants.len(),
            attendance.len(),
            programs.len()
        );

        let index = ReportIndex::build(&sessions, &participants, &attendance);
        let reports: Vec<ProgramReport> = programs
            .iter()
            .map(|program| build_program_report(program, &index))
            .collect();

        for report in &reports {
            let orphaned = report.statistics.orphaned_attendance_records;
            if orphaned > 0 {
                warn!(
                    "Program {} has {} attendance records for participants not enrolled in it",
                    report.program.id, orphaned
                );
            }
        }

        info!(
            "Program reports for user {} ({:?}): {} programs",
            auth.user_id,
            scope,
            reports.len()
        );
        Ok(reports)
    }
}
