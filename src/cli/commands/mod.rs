pub mod auth;
pub mod notification;
pub mod project;
pub mod task;
