pub mod repository;
pub mod types;

pub use repository::{SessionAttendanceRepository, SqliteSessionAttendanceRepository};
pub use types::{
    AttendanceStatus, MaterialReceipt, NewSessionAttendance, SessionAttendance, SessionPerformance,
};
