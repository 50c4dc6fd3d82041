mod agent;
mod direction;
mod experiment;
mod schedule;
mod training_day;

pub use agent::{AgentDescriptor, ExecutionAgent};
pub use direction::Direction;
pub use experiment::ExperimentSpec;
pub use schedule::{Schedule, SchedulePoint};
pub use training_day::TrainingDay;
