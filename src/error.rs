use std::fmt;
use std::io;
use thiserror::Error;

/// Everything that can stop the interpreter. None of these are recoverable:
/// either the ROM is malformed or the host broke its side of the contract.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("unable to read ROM: {0}")]
    RomUnreadable(#[source] io::Error),

    #[error("ROM is {size} bytes but only {available} bytes fit in memory")]
    RomTooLarge { size: usize, available: usize },

    #[error("unrecognized instruction {opcode:04X} at {addr:03X}")]
    UnrecognizedInstruction { opcode: u16, addr: u16 },

    #[error("call stack overflow at {addr:03X}")]
    StackOverflow { addr: u16 },

    #[error("return with an empty call stack at {addr:03X}")]
    StackUnderflow { addr: u16 },

    #[error("{0} is out of bounds")]
    OutOfBounds(Bounds),

    #[error("host i/o failed: {0}")]
    Host(#[from] io::Error),
}

/// what was addressed when an [`Chip8Error::OutOfBounds`] was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bounds {
    Memory { addr: usize, len: usize },
    Pixel { x: usize, y: usize },
    Key(u8),
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bounds::Memory { addr, len } => write!(f, "memory {:03X}+{}", addr, len),
            Bounds::Pixel { x, y } => write!(f, "pixel ({}, {})", x, y),
            Bounds::Key(k) => write!(f, "key {:X}", k),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_hex() {
        let e = Chip8Error::UnrecognizedInstruction {
            opcode: 0x5121,
            addr: 0x204,
        };
        assert_eq!(e.to_string(), "unrecognized instruction 5121 at 204");
        let e = Chip8Error::OutOfBounds(Bounds::Pixel { x: 64, y: 0 });
        assert_eq!(e.to_string(), "pixel (64, 0) is out of bounds");
    }
}
