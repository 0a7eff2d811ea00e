pub mod auth;
pub mod operation_log;
pub mod users;
