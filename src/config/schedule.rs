use std::time::Duration;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub cadence_secs: u64,
    pub run_on_startup: bool,
}

impl ScheduleConfig {
    pub fn cadence(&self) -> Duration {
        Duration::from_secs(self.cadence_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            cadence_secs: 3600,  // top of every hour
            run_on_startup: false,
        }
    }
}
