pub mod engine;
pub mod index;
pub mod rates;
pub mod service;
pub mod types;
pub mod visibility;

pub use service::{ProgramReportService, ProgramReportServiceImpl};
pub use types::{
    AgeGroups, AttendanceDetail, GenderDistribution, MaterialDistribution, MaterialTotal,
    ParticipantReport, ProgramReport, ProgramStatistics, SessionReport, SpecialStatusCounts,
};
