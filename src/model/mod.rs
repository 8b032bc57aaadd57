pub mod project;
pub mod task;
pub mod timeline;

pub use project::Project;
pub use task::{Task, TaskStatus};
pub use timeline::{DateSpan, Granularity, Period, TimelineScale};
