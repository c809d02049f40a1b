pub mod add;
pub mod auth_cmd;
pub mod common;
pub mod completions;
pub mod config;
pub mod list;
pub mod pull;
pub mod remote;
pub mod remove;
pub mod status;
pub mod sync;
