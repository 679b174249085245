//! Environment-driven settings for the simulator.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use pinpointer_runtime::RuntimeConfig;

/// Settings read from the environment (and `.env`), overridable by flags.
#[derive(Clone, Debug, Default)]
pub struct SimConfig {
    pub runtime: RuntimeConfig,
    /// Directory for a `sim.log` file. Console logging is always on.
    pub log_dir: Option<PathBuf>,
    /// Pause between ticks, so the output can be watched live.
    pub tick_delay: Option<Duration>,
}

impl SimConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("SIM_COMMAND_BUFFER") {
            config.runtime.command_buffer_size = capacity.max(1);
        }

        if let Some(capacity) = read_env::<usize>("SIM_EVENT_BUFFER") {
            config.runtime.event_buffer_size = capacity.max(1);
        }

        if let Some(dir) = env::var_os("SIM_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(dir));
        }

        if let Some(millis) = read_env::<u64>("SIM_TICK_DELAY_MS") {
            config.tick_delay = Some(Duration::from_millis(millis));
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
