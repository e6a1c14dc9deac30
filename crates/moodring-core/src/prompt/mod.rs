mod scheduler;

pub use scheduler::{PromptScheduler, PromptState, PromptWindow, SchedulerState};
