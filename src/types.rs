use uuid::Uuid;
use chrono::{DateTime, Utc};
use crate::errors::{DomainError, DomainResult};

// Re-export UserRole and Permission from the permission module
pub use crate::domains::permission::{UserRole, Permission};

/// Ids bound into one `IN (...)` list. SQLite rejects statements with more
/// than 32766 variables, so bulk reads split their ids into chunks of this size.
pub const IN_CLAUSE_CHUNK_SIZE: usize = 500;

/// `?, ?, ?` placeholders for an `IN (...)` list of `count` values
pub fn in_clause_placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Parse a TEXT id column into a Uuid
pub fn parse_uuid_column(value: &str, column: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| DomainError::Internal(format!("Invalid UUID format for {} '{}': {}", column, value, e)))
}

/// Parse a TEXT timestamp column stored as RFC3339
pub fn parse_datetime_column(value: &str, column: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DomainError::Internal(format!("Invalid RFC3339 format for {} '{}': {}", column, value, e)))
}

/// Parse a TEXT enum column through the type's `from_str`
pub fn parse_enum_column<T>(value: &str, column: &str, parse: fn(&str) -> Option<T>) -> DomainResult<T> {
    parse(value).ok_or_else(|| DomainError::Internal(format!("Unknown value for {}: '{}'", column, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_parsers_report_bad_values() {
        assert!(parse_uuid_column("not-a-uuid", "programs.id").is_err());
        assert!(parse_datetime_column("yesterday", "programs.created_at").is_err());
        assert!(parse_enum_column("root", "users.role", UserRole::from_str).is_err());

        let id = Uuid::new_v4();
        assert_eq!(parse_uuid_column(&id.to_string(), "programs.id").unwrap(), id);
        assert_eq!(parse_enum_column("admin", "users.role", UserRole::from_str).unwrap(), UserRole::Admin);
    }

    #[test]
    fn test_in_clause_placeholders() {
        assert_eq!(in_clause_placeholders(1), "?");
        assert_eq!(in_clause_placeholders(3), "?, ?, ?");
        assert!(IN_CLAUSE_CHUNK_SIZE < 32766);
    }
}
