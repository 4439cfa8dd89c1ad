/// Minute clock for stepping a run.
pub mod clock;
pub mod dispatch;
pub mod engine;
pub mod report;
pub mod types;
