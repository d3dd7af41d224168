pub mod notification;
pub mod project;
pub mod task;
pub mod user;

pub use notification::Notification;
pub use project::Project;
pub use task::{Task, TaskPriority, TaskStatus};
pub use user::User;

use uuid::Uuid;

/// Anything held in a resource store exposes its server-assigned id.
pub trait Identified {
    fn id(&self) -> Uuid;
}
