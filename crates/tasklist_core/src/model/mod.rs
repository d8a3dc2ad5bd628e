mod task;

pub use task::{DraftTask, Task, TaskId};
