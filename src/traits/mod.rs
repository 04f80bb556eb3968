pub mod executor;
pub mod reporter;

pub use executor::ModuleExecutor;
pub use reporter::{StatusReporter, TracingReporter};
