pub mod attendance;
pub mod participant;
pub mod permission;
pub mod program;
pub mod report;
pub mod session;

pub use report::{ProgramReportService, ProgramReportServiceImpl};
