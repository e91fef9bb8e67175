use std::time::Duration;

pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 700;
pub const DEFAULT_FRAME_RATE: u32 = 60;

/// knobs for the host loop; the interpreter itself has none
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub instructions_per_second: u32,
    pub frame_rate: u32,
    /// stop cleanly after this many instructions
    pub max_steps: Option<u64>,
    /// fixed seed for Cxnn, for reproducible runs
    pub seed: Option<u64>,
    pub mute: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instructions_per_second: DEFAULT_INSTRUCTIONS_PER_SECOND,
            frame_rate: DEFAULT_FRAME_RATE,
            max_steps: None,
            seed: None,
            mute: false,
        }
    }
}

impl Config {
    /// instructions executed between two presented frames, at least one
    pub fn steps_per_frame(&self) -> u32 {
        (self.instructions_per_second / self.frame_rate.max(1)).max(1)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }
}
