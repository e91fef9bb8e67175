//!
//! ## Design
//!
//! * the interpreter is a plain state machine: `step()` runs exactly one
//!   instruction, `tick()` counts the timers down once; neither knows about
//!   wall-clock time, screens or keyboards
//! * the host (environment) owns all timing: it batches steps per frame and
//!   converts elapsed time into 60Hz timer ticks, carrying the remainder so
//!   hitches are caught up on
//! * display, input and audio sit behind traits so alternatives can be
//!   plugged in; starting with TUI in-console
//! * every fault (bad opcode, stack misuse, memory overrun) stops the machine
//!   with a `Chip8Error` rather than being skipped
//!
//! Model
//!
//! Environment
//!  |-- display, input, sound, config
//!  |-- interpreter
//!  |    |-- memory (font + program)
//!  |    |-- registers, index, pc, stack
//!  |    |-- timers
//!  |    |-- key latch
//!  |    `-- framebuffer
//!  `-- main loop
//!       |-- keys = input.keys(); interpreter.set_keys(keys)
//!       |-- interpreter.step() x steps_per_frame
//!       |-- interpreter.tick() x clock.advance(elapsed)
//!       |-- tone.update(interpreter.is_sound_active())
//!       |-- display.draw(interpreter.frame())
//!       `-- sleep(rest of frame)
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod sound;
pub mod timer;

pub use error::Chip8Error;
