use crate::domain::server_timing::timing::Timing;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub mod timing;

/// Durations of the handler's steps, in the order they ran.
#[derive(Debug, Clone, Default)]
pub struct ServerTiming {
    timings: Vec<Timing>,
}

impl Display for ServerTiming {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = self
            .timings
            .iter()
            .map(|tim| tim.to_string())
            .collect::<Vec<String>>()
            .join(", ");

        write!(f, "{display}")
    }
}

impl ServerTiming {
    pub fn new() -> ServerTiming {
        ServerTiming::default()
    }

    /// Record the time elapsed since `started` under `name`.
    pub fn stop(&mut self, name: &'static str, started: Instant) {
        self.timings.push(Timing::new(name, started.elapsed()));
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }
}
