pub mod ai;
pub mod auth;
pub mod dispatch;
pub mod groups;
pub mod jobs;
pub mod uploads;
