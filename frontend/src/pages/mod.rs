pub mod audit_log;
pub mod clients;
pub mod dashboard;
