use std::time::Duration;

/// the delay and sound timers both count down at this rate
pub const CHIP8_TIMER_HZ: u32 = 60;

/// The two 8-bit countdown timers. They know nothing about wall-clock time;
/// the host calls [`Timers::tick`] once per 1/60s.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// count both timers down by one, stopping at zero
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// the tone should sound for as long as the sound timer is running
    pub fn is_sound_active(&self) -> bool {
        self.sound > 0
    }
}

/// Converts elapsed wall-clock time into a number of timer ticks. Time that
/// doesn't add up to a whole tick is carried over to the next call, so a slow
/// frame is caught up on rather than lost.
#[derive(Debug, Clone)]
pub struct TickClock {
    period: Duration,
    owed: Duration,
}

impl TickClock {
    pub fn new(hz: u32) -> Self {
        TickClock {
            period: Duration::from_secs(1) / hz.max(1),
            owed: Duration::ZERO,
        }
    }

    /// add `elapsed` to the clock and return how many whole ticks are now due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.owed += elapsed;
        let mut ticks = 0;
        while self.owed >= self.period {
            self.owed -= self.period;
            ticks += 1;
        }
        ticks
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(CHIP8_TIMER_HZ)
    }
}
