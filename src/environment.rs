use crate::config::Config;
use crate::display::Display;
use crate::error::Chip8Error;
use crate::input::Input;
use crate::interpreter::Chip8Interpreter;
use crate::sound::{Sound, ToneGate};
use crate::timer::TickClock;
use log::{error, info};
use std::io;
use std::time::{Duration, Instant};

/// Owns the interpreter and wires it to a screen, a keyboard and a speaker.
/// Everything time-related happens here: instruction pacing, 60Hz timer
/// ticks and frame presentation.
pub struct Environment<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    tone: ToneGate<'a>,
    clock: TickClock,
    config: Config,
    steps: u64,
}

impl<'a> Environment<'a> {
    pub fn new(
        config: Config,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
    ) -> Self {
        let interpreter = match config.seed {
            Some(seed) => Chip8Interpreter::with_seed(seed),
            None => Chip8Interpreter::new(),
        };
        Environment {
            interpreter,
            display,
            input,
            tone: ToneGate::new(sound),
            clock: TickClock::default(),
            config,
            steps: 0,
        }
    }

    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        self.interpreter.load_program(reader)
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    /// Run until the user quits or `max_steps` is reached. Returns the
    /// number of instructions executed. Any interpreter error halts the loop.
    pub fn main_loop(&mut self) -> Result<u64, Chip8Error> {
        let frame = self.config.frame_duration();
        info!(
            "Starting [ips: {}, fps: {}, steps/frame: {}]",
            self.config.instructions_per_second,
            self.config.frame_rate,
            self.config.steps_per_frame()
        );
        let mut last = Instant::now();
        loop {
            let start = Instant::now();
            let elapsed = start.duration_since(last);
            last = start;
            match self.run_frame(elapsed) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    error!(
                        "Halted [pc: {:03X}, steps: {}]: {}",
                        self.interpreter.program_counter(),
                        self.steps,
                        e
                    );
                    return Err(e);
                }
            }
            let spent = start.elapsed();
            if spent < frame {
                spin_sleep::sleep(frame - spent);
            }
        }
        info!("Stopped [steps: {}]", self.steps);
        Ok(self.steps)
    }

    /// one presented frame: input, a batch of steps, owed timer ticks,
    /// sound, draw. Returns false when the loop should end.
    fn run_frame(&mut self, elapsed: Duration) -> Result<bool, Chip8Error> {
        let keys = self.input.keys()?;
        if self.input.quit_requested() {
            info!("Quit requested");
            return Ok(false);
        }
        self.interpreter.set_keys(keys);

        for _ in 0..self.config.steps_per_frame() {
            if matches!(self.config.max_steps, Some(max) if self.steps >= max) {
                return Ok(false);
            }
            self.interpreter.step()?;
            self.steps += 1;
        }

        for _ in 0..self.clock.advance(elapsed) {
            self.interpreter.tick();
        }
        self.tone.update(self.interpreter.is_sound_active());
        self.display.draw(self.interpreter.frame())?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DummyDisplay;
    use crate::input::DummyInput;
    use crate::sound::Mute;

    fn config(max_steps: Option<u64>) -> Config {
        Config {
            instructions_per_second: 600,
            frame_rate: 60,
            max_steps,
            seed: Some(1),
            mute: true,
        }
    }

    #[test]
    fn test_runs_until_max_steps() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute;
        let mut env = Environment::new(config(Some(25)), &mut display, &mut input, &mut sound);
        let mut prog: &[u8] = &[0x70, 0x01, 0x12, 0x00]; // ADD V0,01; JP 200
        env.load_program(&mut prog)?;
        assert_eq!(env.main_loop()?, 25);
        assert_eq!(env.interpreter().registers()[0], 13);
        drop(env);
        // 10 steps per frame: two full frames drawn, the third stops early
        assert_eq!(display.frames, 2);
        Ok(())
    }

    #[test]
    fn test_quit_from_input() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]).quit_after(3);
        let mut sound = Mute;
        let mut env = Environment::new(config(None), &mut display, &mut input, &mut sound);
        let mut prog: &[u8] = &[0x12, 0x00]; // JP 200
        env.load_program(&mut prog)?;
        assert_eq!(env.main_loop()?, 20);
        Ok(())
    }

    #[test]
    fn test_bad_instruction_halts() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute;
        let mut env = Environment::new(config(None), &mut display, &mut input, &mut sound);
        let mut prog: &[u8] = &[0x60, 0x01, 0x00, 0x00];
        env.load_program(&mut prog)?;
        assert!(matches!(
            env.main_loop(),
            Err(Chip8Error::UnrecognizedInstruction { opcode: 0x0000, addr: 0x202 })
        ));
        Ok(())
    }

    #[test]
    fn test_frame_ticks_owed_timers() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[0x5]);
        let mut sound = Mute;
        let mut env = Environment::new(config(None), &mut display, &mut input, &mut sound);
        // LD V0,0A; LD DT,V0; JP 204
        let mut prog: &[u8] = &[0x60, 0x0a, 0xf0, 0x15, 0x12, 0x04];
        env.load_program(&mut prog)?;
        assert!(env.run_frame(Duration::ZERO)?);
        assert_eq!(env.interpreter().timers().delay, 10);
        assert!(env.run_frame(Duration::from_millis(50))?);
        assert_eq!(env.interpreter().timers().delay, 7);
        assert!(env.interpreter().is_key_pressed(0x5)?);
        Ok(())
    }
}
