//! # instruction
//!
//! Every CHIP-8 instruction is one big-endian 16-bit word, split into nibbles:
//!
//!   c x y n    c = class, x/y = register index, n = 4-bit literal
//!     n n n    nnn = 12-bit address
//!       n n    nn = 8-bit literal
//!
//! Decoding is a single match over the nibbles; execution lives in the
//! interpreter and matches on the decoded variant.
use std::fmt;
use Instruction::*;

/// register index, always 0x0-0xf
pub type Reg = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // Display
    Cls,
    Drw(Reg, Reg, u8),

    // Control flow
    Ret,
    Jp(u16),
    JpV0(u16),
    Call(u16),
    SeImm(Reg, u8),
    SneImm(Reg, u8),
    SeReg(Reg, Reg),
    SneReg(Reg, Reg),
    Skp(Reg),
    Sknp(Reg),

    // Arithmetic
    LdImm(Reg, u8),
    AddImm(Reg, u8),
    LdReg(Reg, Reg),
    Or(Reg, Reg),
    And(Reg, Reg),
    Xor(Reg, Reg),
    AddReg(Reg, Reg),
    Sub(Reg, Reg),
    Shr(Reg, Reg),
    Subn(Reg, Reg),
    Shl(Reg, Reg),
    Rnd(Reg, u8),

    // Index register, timers, memory
    LdI(u16),
    AddI(Reg),
    LdFont(Reg),
    LdBcd(Reg),
    Store(Reg),
    Load(Reg),
    LdFromDt(Reg),
    LdDt(Reg),
    LdSt(Reg),
    WaitKey(Reg),
}

impl Instruction {
    /// decode a fetched word; `None` if the word is not a CHIP-8 instruction
    pub fn decode(word: u16) -> Option<Instruction> {
        let nibbles: [usize; 4] = [
            ((word & 0xF000) >> 12).into(),
            ((word & 0x0F00) >> 8).into(),
            ((word & 0x00F0) >> 4).into(),
            (word & 0x000F).into(),
        ];
        let nn = word as u8;
        let nnn = word & 0x0FFF;
        let instr = match nibbles {
            [0x0, 0x0, 0xE, 0x0] => Cls,
            [0x0, 0x0, 0xE, 0xE] => Ret,
            [0x1, _, _, _] => Jp(nnn),
            [0x2, _, _, _] => Call(nnn),
            [0x3, x, _, _] => SeImm(x, nn),
            [0x4, x, _, _] => SneImm(x, nn),
            [0x5, x, y, 0x0] => SeReg(x, y),
            [0x6, x, _, _] => LdImm(x, nn),
            [0x7, x, _, _] => AddImm(x, nn),
            [0x8, x, y, 0x0] => LdReg(x, y),
            [0x8, x, y, 0x1] => Or(x, y),
            [0x8, x, y, 0x2] => And(x, y),
            [0x8, x, y, 0x3] => Xor(x, y),
            [0x8, x, y, 0x4] => AddReg(x, y),
            [0x8, x, y, 0x5] => Sub(x, y),
            [0x8, x, y, 0x6] => Shr(x, y),
            [0x8, x, y, 0x7] => Subn(x, y),
            [0x8, x, y, 0xE] => Shl(x, y),
            [0x9, x, y, 0x0] => SneReg(x, y),
            [0xA, _, _, _] => LdI(nnn),
            [0xB, _, _, _] => JpV0(nnn),
            [0xC, x, _, _] => Rnd(x, nn),
            [0xD, x, y, n] => Drw(x, y, n as u8),
            [0xE, x, 0x9, 0xE] => Skp(x),
            [0xE, x, 0xA, 0x1] => Sknp(x),
            [0xF, x, 0x0, 0x7] => LdFromDt(x),
            [0xF, x, 0x0, 0xA] => WaitKey(x),
            [0xF, x, 0x1, 0x5] => LdDt(x),
            [0xF, x, 0x1, 0x8] => LdSt(x),
            [0xF, x, 0x1, 0xE] => AddI(x),
            [0xF, x, 0x2, 0x9] => LdFont(x),
            [0xF, x, 0x3, 0x3] => LdBcd(x),
            [0xF, x, 0x5, 0x5] => Store(x),
            [0xF, x, 0x6, 0x5] => Load(x),
            _ => return None,
        };
        Some(instr)
    }
}

/// conventional assembler mnemonics, for tracing
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jp(nnn) => write!(f, "JP {:03X}", nnn),
            Call(nnn) => write!(f, "CALL {:03X}", nnn),
            SeImm(x, nn) => write!(f, "SE V{:X}, {:02X}", x, nn),
            SneImm(x, nn) => write!(f, "SNE V{:X}, {:02X}", x, nn),
            SeReg(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            LdImm(x, nn) => write!(f, "LD V{:X}, {:02X}", x, nn),
            AddImm(x, nn) => write!(f, "ADD V{:X}, {:02X}", x, nn),
            LdReg(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr(x, _) => write!(f, "SHR V{:X}", x),
            Subn(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl(x, _) => write!(f, "SHL V{:X}", x),
            SneReg(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI(nnn) => write!(f, "LD I, {:03X}", nnn),
            JpV0(nnn) => write!(f, "JP V0, {:03X}", nnn),
            Rnd(x, nn) => write!(f, "RND V{:X}, {:02X}", x, nn),
            Drw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {:X}", x, y, n),
            Skp(x) => write!(f, "SKP V{:X}", x),
            Sknp(x) => write!(f, "SKNP V{:X}", x),
            LdFromDt(x) => write!(f, "LD V{:X}, DT", x),
            WaitKey(x) => write!(f, "LD V{:X}, K", x),
            LdDt(x) => write!(f, "LD DT, V{:X}", x),
            LdSt(x) => write!(f, "LD ST, V{:X}", x),
            AddI(x) => write!(f, "ADD I, V{:X}", x),
            LdFont(x) => write!(f, "LD F, V{:X}", x),
            LdBcd(x) => write!(f, "LD B, V{:X}", x),
            Store(x) => write!(f, "LD [I], V{:X}", x),
            Load(x) => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fields() {
        assert_eq!(Instruction::decode(0x00e0), Some(Cls));
        assert_eq!(Instruction::decode(0x1abc), Some(Jp(0xabc)));
        assert_eq!(Instruction::decode(0x6a42), Some(LdImm(0xa, 0x42)));
        assert_eq!(Instruction::decode(0x7fff), Some(AddImm(0xf, 0xff)));
        assert_eq!(Instruction::decode(0xa050), Some(LdI(0x050)));
        assert_eq!(Instruction::decode(0xd125), Some(Drw(1, 2, 5)));
        assert_eq!(Instruction::decode(0x8ab4), Some(AddReg(0xa, 0xb)));
        assert_eq!(Instruction::decode(0xe39e), Some(Skp(3)));
        assert_eq!(Instruction::decode(0xf765), Some(Load(7)));
    }

    #[test]
    fn test_decode_subselectors() {
        let subs = [
            (0x8120, LdReg(1, 2)),
            (0x8121, Or(1, 2)),
            (0x8122, And(1, 2)),
            (0x8123, Xor(1, 2)),
            (0x8125, Sub(1, 2)),
            (0x8126, Shr(1, 2)),
            (0x8127, Subn(1, 2)),
            (0x812e, Shl(1, 2)),
        ];
        for (word, instr) in subs {
            assert_eq!(Instruction::decode(word), Some(instr));
        }
    }

    #[test]
    fn test_decode_rejects_unknown() {
        // machine code routine, bad sub-selectors, superset opcodes
        for word in [0x0123, 0x00ff, 0x5121, 0x8128, 0x812f, 0x9121, 0xe1a2, 0xf175, 0xf030] {
            assert_eq!(Instruction::decode(word), None, "{:04x}", word);
        }
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Instruction::decode(0xd015).unwrap().to_string(), "DRW V0, V1, 5");
        assert_eq!(Instruction::decode(0x2208).unwrap().to_string(), "CALL 208");
        assert_eq!(Instruction::decode(0xf30a).unwrap().to_string(), "LD V3, K");
    }
}
