//! Per-program attendance, demographic and material-distribution reports

pub mod auth;
pub mod config;
pub mod db_migration;
pub mod domains;
pub mod errors;
pub mod server;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_support;
