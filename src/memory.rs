use crate::error::{Bounds, Chip8Error};
use std::io;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the addressable memory of the machine. Every access is bounds
/// checked; reaching past the end is an error, never a wrap.
pub trait MemoryMap {
    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), Chip8Error> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// get a single byte
    fn get_byte(&self, addr: u16) -> Result<u8, Chip8Error> {
        Ok(self.get_ro_slice(addr, 1)?[0])
    }

    /// get a big-endian two-byte word (instruction fetch)
    fn get_word(&self, addr: u16) -> Result<u16, Chip8Error> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error>;
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// where the font glyphs live, 5 bytes per hex digit
pub const CHIP8_FONT_ADDR: u16 = 0x050;
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// Defines the CHIP-8 memory map:
///   0x0000-0x004f  reserved
///   0x0050-0x009f  font
///   0x00a0-0x01ff  reserved
///   0x0200-0x0fff  program
///
/// chip-8 programs *should* not jump below 0x200
pub struct Chip8MemoryMap {
    bytes: [u8; CHIP8_RAM_SIZE_BYTES],
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], Chip8Error> {
        let a = addr as usize;
        self.bytes
            .get_mut(a..a + len)
            .ok_or(Chip8Error::OutOfBounds(Bounds::Memory { addr: a, len }))
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], Chip8Error> {
        let a = addr as usize;
        self.bytes
            .get(a..a + len)
            .ok_or(Chip8Error::OutOfBounds(Bounds::Memory { addr: a, len }))
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8MemoryMap {
    /// zeroed memory with the font baked in
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: [0u8; CHIP8_RAM_SIZE_BYTES],
        };
        mm.initialize_font();
        mm
    }

    /// (re)write the glyph table at 0x050
    pub fn initialize_font(&mut self) {
        let a = CHIP8_FONT_ADDR as usize;
        self.bytes[a..a + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
    }

    /// copy `data` in at `offset`; all-or-nothing
    pub fn load(&mut self, data: &[u8], offset: u16) -> Result<(), Chip8Error> {
        let available = CHIP8_RAM_SIZE_BYTES.saturating_sub(offset as usize);
        if data.len() > available {
            return Err(Chip8Error::RomTooLarge {
                size: data.len(),
                available,
            });
        }
        self.write(data, offset)
    }

    /// read a whole CHIP-8 program and load it at 0x200
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(Chip8Error::RomUnreadable)?;
        self.load(&buf, CHIP8_PROGRAM_ADDR)?;
        Ok(buf.len())
    }

    /// address of the glyph for the low nibble of `digit`
    pub fn font_addr(digit: u8) -> u16 {
        CHIP8_FONT_ADDR + CHIP8_FONT_GLYPH_BYTES * (digit & 0x0f) as u16
    }
}

pub const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
