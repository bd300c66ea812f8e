pub mod scenario;
pub mod sinks;

pub use scenario::{replay, ReplayReport, Scenario, Step};
pub use sinks::{DesktopSink, FanoutSink, StdoutSink};
