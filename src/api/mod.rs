pub mod notifications;
pub mod projects;
pub mod tasks;
pub mod users;

pub use notifications::NotificationApi;
pub use projects::ProjectApi;
pub use tasks::TaskApi;
pub use users::UserApi;
