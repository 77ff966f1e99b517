pub mod csv_import;
pub mod lifecycle;
pub mod reconciliation;
pub mod report;
pub mod templates;
pub mod users;
