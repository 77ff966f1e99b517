pub mod audit;
pub mod checklist;
pub mod error;
pub mod finding;
pub mod id;
pub mod store;
pub mod template;
pub mod user;
