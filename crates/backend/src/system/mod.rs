pub mod auth;
pub mod handlers;
pub mod initialization;
pub mod operation_log;
pub mod users;
