//! # interpreter
//!
//! Machine state of a CHIP-8 and the fetch/decode/execute step:
//!  * 4K memory, font at 0x050, program from 0x200
//!  * V0-VF 8bit registers; VF doubles as carry/borrow/collision flag
//!  * I 16bit index register
//!  * program counter, starts at 0x200
//!  * 16-deep call stack of return addresses
//!  * delay and sound timers, counted down by the host at 60Hz
//!  * 16-key input latch, written by the host
//!  * 64x32 framebuffer, read by the host
//!
//! The interpreter never talks to a screen, keyboard or speaker itself; see
//! the environment module for that.
use crate::error::{Bounds, Chip8Error};
use crate::framebuffer::FrameBuffer;
use crate::instruction::{Instruction, Instruction::*};
use crate::memory::{Chip8MemoryMap, MemoryMap, CHIP8_PROGRAM_ADDR};
use crate::timer::Timers;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

const CHIP8_STACK_DEPTH: usize = 16;
const FLAG: usize = 0xf;

/// An Fx0A in progress. Keys already down when the wait began have to be
/// released before they count, so one press satisfies one wait.
#[derive(Debug, Clone, Copy)]
struct KeyWait {
    reg: usize,
    held: [bool; 16],
}

impl KeyWait {
    /// lowest key that went down since the wait began
    fn press(&mut self, keys: &[bool; 16]) -> Option<u8> {
        for (held, down) in self.held.iter_mut().zip(keys) {
            *held &= *down;
        }
        keys.iter()
            .zip(self.held.iter())
            .position(|(down, held)| *down && !*held)
            .map(|k| k as u8)
    }
}

pub struct Chip8Interpreter {
    memory: Chip8MemoryMap,
    v: [u8; 16],
    i: u16,
    program_counter: u16,
    stack: [u16; CHIP8_STACK_DEPTH],
    stack_pointer: usize,
    timers: Timers,
    keys: [bool; 16],
    frame: FrameBuffer,
    waiting_for_key: Option<KeyWait>,
    rng: StdRng,
}

impl Default for Chip8Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8Interpreter {
    /// fresh machine; random numbers seeded from the OS
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// fresh machine with reproducible random numbers
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Chip8Interpreter {
            memory: Chip8MemoryMap::new(),
            v: [0; 16],
            i: 0,
            program_counter: CHIP8_PROGRAM_ADDR,
            stack: [0; CHIP8_STACK_DEPTH],
            stack_pointer: 0,
            timers: Timers::new(),
            keys: [false; 16],
            frame: FrameBuffer::new(),
            waiting_for_key: None,
            rng,
        }
    }

    /// load a chip8 program
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        let len = self.memory.load_program(reader)?;
        info!("Loaded ROM [size: {}]", len);
        Ok(len)
    }

    /// load raw bytes at an arbitrary offset
    pub fn load(&mut self, bytes: &[u8], offset: u16) -> Result<(), Chip8Error> {
        self.memory.load(bytes, offset)
    }

    /// execute exactly one instruction. While waiting on Fx0A this consumes
    /// nothing until a key is newly pressed.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        if let Some(wait) = self.waiting_for_key.as_mut() {
            if let Some(key) = wait.press(&self.keys) {
                let reg = wait.reg;
                debug!("Key wait over [key: {:X}, reg: V{:X}]", key, reg);
                self.v[reg] = key;
                self.waiting_for_key = None;
            }
            return Ok(());
        }

        let addr = self.program_counter;
        let word = self.memory.get_word(addr)?;
        self.program_counter = addr.wrapping_add(2);
        let instr = Instruction::decode(word)
            .ok_or(Chip8Error::UnrecognizedInstruction { opcode: word, addr })?;
        trace!("{:03X}: {:04X} {}", addr, word, instr);
        self.execute(instr, addr)
    }

    fn execute(&mut self, instr: Instruction, addr: u16) -> Result<(), Chip8Error> {
        match instr {
            Cls => self.frame.clear(),
            Drw(x, y, n) => {
                let rows = self.memory.get_ro_slice(self.i, n as usize)?;
                let collision = self.frame.draw_sprite(self.v[x], self.v[y], rows);
                self.v[FLAG] = collision as u8;
            }

            Ret => {
                if self.stack_pointer == 0 {
                    return Err(Chip8Error::StackUnderflow { addr });
                }
                self.stack_pointer -= 1;
                self.program_counter = self.stack[self.stack_pointer];
                debug!("RET {:03X} -> {:03X}", addr, self.program_counter);
            }
            Call(nnn) => {
                if self.stack_pointer == CHIP8_STACK_DEPTH {
                    return Err(Chip8Error::StackOverflow { addr });
                }
                self.stack[self.stack_pointer] = self.program_counter;
                self.stack_pointer += 1;
                self.program_counter = nnn;
                debug!("CALL {:03X} -> {:03X} [depth: {}]", addr, nnn, self.stack_pointer);
            }
            Jp(nnn) => self.program_counter = nnn,
            JpV0(nnn) => self.program_counter = nnn + self.v[0] as u16,
            SeImm(x, nn) => self.skip_if(self.v[x] == nn),
            SneImm(x, nn) => self.skip_if(self.v[x] != nn),
            SeReg(x, y) => self.skip_if(self.v[x] == self.v[y]),
            SneReg(x, y) => self.skip_if(self.v[x] != self.v[y]),
            Skp(x) => self.skip_if(self.keys[(self.v[x] & 0xf) as usize]),
            Sknp(x) => self.skip_if(!self.keys[(self.v[x] & 0xf) as usize]),

            LdImm(x, nn) => self.v[x] = nn,
            AddImm(x, nn) => self.v[x] = self.v[x].wrapping_add(nn),
            LdReg(x, y) => self.v[x] = self.v[y],
            Or(x, y) => self.v[x] |= self.v[y],
            And(x, y) => self.v[x] &= self.v[y],
            Xor(x, y) => self.v[x] ^= self.v[y],
            AddReg(x, y) => {
                let (res, carry) = self.v[x].overflowing_add(self.v[y]);
                self.set_with_flag(x, res, carry);
            }
            Sub(x, y) => {
                let (res, borrow) = self.v[x].overflowing_sub(self.v[y]);
                self.set_with_flag(x, res, !borrow);
            }
            Subn(x, y) => {
                let (res, borrow) = self.v[y].overflowing_sub(self.v[x]);
                self.set_with_flag(x, res, !borrow);
            }
            Shr(x, _) => {
                let out = self.v[x] & 0x01 != 0;
                self.set_with_flag(x, self.v[x] >> 1, out);
            }
            Shl(x, _) => {
                let out = self.v[x] & 0x80 != 0;
                self.set_with_flag(x, self.v[x] << 1, out);
            }
            Rnd(x, nn) => self.v[x] = self.rng.gen::<u8>() & nn,

            LdI(nnn) => self.i = nnn,
            AddI(x) => self.i = self.i.wrapping_add(self.v[x] as u16),
            LdFont(x) => self.i = Chip8MemoryMap::font_addr(self.v[x]),
            LdBcd(x) => {
                let vx = self.v[x];
                self.memory.write(&[vx / 100, vx / 10 % 10, vx % 10], self.i)?;
            }
            Store(x) => self.memory.write(&self.v[..=x], self.i)?,
            Load(x) => {
                let src = self.memory.get_ro_slice(self.i, x + 1)?;
                self.v[..=x].copy_from_slice(src);
            }
            LdFromDt(x) => self.v[x] = self.timers.delay,
            LdDt(x) => self.timers.delay = self.v[x],
            LdSt(x) => self.timers.sound = self.v[x],
            WaitKey(x) => {
                debug!("Waiting for key [reg: V{:X}]", x);
                self.waiting_for_key = Some(KeyWait {
                    reg: x,
                    held: self.keys,
                });
            }
        }
        Ok(())
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.program_counter = self.program_counter.wrapping_add(2);
        }
    }

    // flag written last, so it wins when x is VF
    fn set_with_flag(&mut self, x: usize, value: u8, flag: bool) {
        self.v[x] = value;
        self.v[FLAG] = flag as u8;
    }

    /// 60Hz timer tick
    pub fn tick(&mut self) {
        self.timers.tick();
    }

    pub fn is_sound_active(&self) -> bool {
        self.timers.is_sound_active()
    }

    pub fn is_pixel_set(&self, x: usize, y: usize) -> Result<bool, Chip8Error> {
        self.frame.is_pixel_set(x, y)
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<(), Chip8Error> {
        let k = self
            .keys
            .get_mut(key as usize)
            .ok_or(Chip8Error::OutOfBounds(Bounds::Key(key)))?;
        *k = pressed;
        Ok(())
    }

    pub fn set_keys(&mut self, keys: [bool; 16]) {
        self.keys = keys;
    }

    pub fn is_key_pressed(&self, key: u8) -> Result<bool, Chip8Error> {
        self.keys
            .get(key as usize)
            .copied()
            .ok_or(Chip8Error::OutOfBounds(Bounds::Key(key)))
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.waiting_for_key.is_some()
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn index_register(&self) -> u16 {
        self.i
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }
}
