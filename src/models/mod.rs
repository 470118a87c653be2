pub mod task;
pub mod user;

pub use task::{derive_slug, Task, TaskInput, TaskPatch};
pub use user::{User, UserSnapshot};
