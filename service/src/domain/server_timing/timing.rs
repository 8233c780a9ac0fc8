use std::fmt::{Display, Formatter};
use std::time::Duration;

/// One `Server-Timing` metric entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timing {
    pub name: &'static str,
    pub duration: Duration,
}

impl Display for Timing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{};dur={}", self.name, self.duration.as_millis())
    }
}

impl Timing {
    pub fn new(name: &'static str, duration: Duration) -> Timing {
        Timing { name, duration }
    }
}
