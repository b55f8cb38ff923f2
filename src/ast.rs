//! Components describing LC-3 machine words: registers, opcodes,
//! condition codes, and the decoded instruction record.
//!
//! The key item here is [`Instr`], the fully decoded form of a raw 16-bit
//! word, produced by [`Instr::decode`]. Decoding is total: every 16-bit
//! pattern maps to some record, because the top four bits always select one
//! of the sixteen opcode slots (including the [`Opcode::Reserved`] slot,
//! which executes as a no-op).

/// A register. Must be between 0 and 7.
///
/// A `Reg` can be constructed by selecting a register from [`reg_consts`],
/// or by using [`Reg::try_from`].
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Reg(pub(crate) u8);

/// Register constants!
pub mod reg_consts {
    use super::Reg;

    /// The 0th register in the register file.
    pub const R0: Reg = Reg(0);
    /// The 1st register in the register file.
    pub const R1: Reg = Reg(1);
    /// The 2nd register in the register file.
    pub const R2: Reg = Reg(2);
    /// The 3rd register in the register file.
    pub const R3: Reg = Reg(3);
    /// The 4th register in the register file.
    pub const R4: Reg = Reg(4);
    /// The 5th register in the register file.
    pub const R5: Reg = Reg(5);
    /// The 6th register in the register file.
    pub const R6: Reg = Reg(6);
    /// The 7th register in the register file.
    pub const R7: Reg = Reg(7);
}

impl Reg {
    /// Gets the register number of this [`Reg`]. This is always between 0 and 7.
    pub fn reg_no(self) -> u8 {
        self.0
    }
}
impl std::fmt::Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}", self.0)
    }
}
impl From<Reg> for usize {
    // Used for indexing the reg file.
    fn from(value: Reg) -> Self {
        usize::from(value.0)
    }
}
impl TryFrom<u8> for Reg {
    type Error = std::num::TryFromIntError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0..=7 => Ok(Reg(value)),
            // HACKy, but there's no other way to create this error
            _     => u8::try_from(256).map(|_| unreachable!("should've been TryFromIntError")),
        }
    }
}

/// The condition code, set after every instruction that defines it.
///
/// The code reflects the sign of the last register write that defines it.
/// Conditional branches consult it through [`CondCode::mask`]:
///
/// | code       | mask (bin) |
/// |------------|------------|
/// | `Negative` | `100`      |
/// | `Zero`     | `010`      |
/// | `Positive` | `001`      |
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub enum CondCode {
    /// The last defining write was negative (sign bit set).
    Negative,
    /// The last defining write was zero.
    #[default]
    Zero,
    /// The last defining write was positive.
    Positive,
}
impl CondCode {
    /// Computes the condition code for a just-written register value.
    pub fn of(value: u16) -> Self {
        match (value as i16).cmp(&0) {
            std::cmp::Ordering::Less    => CondCode::Negative,
            std::cmp::Ordering::Equal   => CondCode::Zero,
            std::cmp::Ordering::Greater => CondCode::Positive,
        }
    }

    /// The single-bit NZP mask for this code, testable against [`Instr::nzp`].
    pub fn mask(self) -> u8 {
        match self {
            CondCode::Negative => 0b100,
            CondCode::Zero     => 0b010,
            CondCode::Positive => 0b001,
        }
    }

    /// Checks whether a branch with the given NZP mask is taken under this code.
    ///
    /// An all-zero mask never passes (`BR` with no condition bits is a no-op).
    pub fn satisfies(self, nzp: u8) -> bool {
        nzp & self.mask() != 0
    }
}
impl std::fmt::Display for CondCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CondCode::Negative => f.write_str("n"),
            CondCode::Zero     => f.write_str("z"),
            CondCode::Positive => f.write_str("p"),
        }
    }
}

/// An opcode slot. The top four bits of a raw word always select one of these.
///
/// Slot `0b1101` is reserved by the ISA; it decodes successfully but executes
/// as a no-op.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Opcode {
    /// Conditional branch (`0b0000`).
    BR,
    /// Add (`0b0001`).
    ADD,
    /// Load, PC-relative (`0b0010`).
    LD,
    /// Store, PC-relative (`0b0011`).
    ST,
    /// Jump to subroutine (`0b0100`).
    JSR,
    /// Bitwise and (`0b0101`).
    AND,
    /// Load, base + offset (`0b0110`).
    LDR,
    /// Store, base + offset (`0b0111`).
    STR,
    /// Return from interrupt (`0b1000`). A no-op in this simulator.
    RTI,
    /// Bitwise complement (`0b1001`).
    NOT,
    /// Load indirect (`0b1010`).
    LDI,
    /// Store indirect (`0b1011`).
    STI,
    /// Jump through register (`0b1100`).
    JMP,
    /// The reserved slot (`0b1101`).
    Reserved,
    /// Load effective address (`0b1110`).
    LEA,
    /// Trap to a service routine (`0b1111`).
    TRAP,
}
impl Opcode {
    /// Selects the opcode slot from a raw word's top four bits.
    pub fn of(word: u16) -> Self {
        match word >> 12 {
            0x0 => Opcode::BR,
            0x1 => Opcode::ADD,
            0x2 => Opcode::LD,
            0x3 => Opcode::ST,
            0x4 => Opcode::JSR,
            0x5 => Opcode::AND,
            0x6 => Opcode::LDR,
            0x7 => Opcode::STR,
            0x8 => Opcode::RTI,
            0x9 => Opcode::NOT,
            0xA => Opcode::LDI,
            0xB => Opcode::STI,
            0xC => Opcode::JMP,
            0xD => Opcode::Reserved,
            0xE => Opcode::LEA,
            0xF => Opcode::TRAP,
            _   => unreachable!("u16 >> 12 is always within 0..16"),
        }
    }
}

/// Sign-extends the low `bits` bits of `value` to a full 16-bit signed word.
///
/// The sign bit of the field is replicated leftward (two's-complement
/// extension), so the low `bits` bits of the result always equal the
/// original field.
pub fn sign_extend(value: u16, bits: u32) -> i16 {
    debug_assert!((1..=16).contains(&bits));
    ((value << (16 - bits)) as i16) >> (16 - bits)
}

/// A fully decoded instruction record.
///
/// Every field is extracted for every word, regardless of opcode; exactly one
/// of the offset/immediate fields is meaningful per opcode and the rest are
/// decoded-but-unused. This mirrors the fixed bit layout of the ISA.
///
/// ```
/// use lc3_solo::ast::{Instr, Opcode};
///
/// // ADD R0, R0, #5
/// let instr = Instr::decode(0x1025);
/// assert_eq!(instr.opcode, Opcode::ADD);
/// assert!(instr.imm_flag);
/// assert_eq!(instr.imm5, 5);
/// ```
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Instr {
    /// The opcode slot selected by the top four bits.
    pub opcode: Opcode,
    /// The 3-bit N/Z/P condition-test mask (bits 11-9), used by `BR`.
    pub nzp: u8,
    /// Destination register (bits 11-9).
    pub dr: Reg,
    /// First source register (bits 8-6); also the base register of
    /// `LDR`/`STR`/`JMP`/`JSRR`.
    pub sr1: Reg,
    /// Second source register (bits 2-0).
    pub sr2: Reg,
    /// Sign-extended 5-bit immediate (bits 4-0).
    pub imm5: i16,
    /// Sign-extended 9-bit PC-relative offset (bits 8-0).
    pub pc_offset9: i16,
    /// Sign-extended 11-bit PC-relative offset (bits 10-0).
    pub pc_offset11: i16,
    /// Sign-extended 6-bit base offset (bits 5-0).
    pub offset6: i16,
    /// The 8-bit trap vector (bits 7-0).
    pub trap_vect: u8,
    /// Bit 5: immediate (set) vs. register (clear) form of `ADD`/`AND`.
    pub imm_flag: bool,
    /// Bit 11: selects the register-indirect (`JSRR`) form of `JSR` when set.
    pub jsrr_flag: bool,
}

impl Instr {
    /// Decodes a raw 16-bit word into an instruction record.
    ///
    /// This function is pure and total: it never fails, and decoding the same
    /// word twice yields identical records.
    pub fn decode(word: u16) -> Self {
        Self {
            opcode:      Opcode::of(word),
            nzp:         ((word & 0x0E00) >> 9) as u8,
            dr:          Reg(((word & 0x0E00) >> 9) as u8),
            sr1:         Reg(((word & 0x01C0) >> 6) as u8),
            sr2:         Reg((word & 0x0007) as u8),
            imm5:        sign_extend(word & 0x001F, 5),
            pc_offset9:  sign_extend(word & 0x01FF, 9),
            pc_offset11: sign_extend(word & 0x07FF, 11),
            offset6:     sign_extend(word & 0x003F, 6),
            trap_vect:   (word & 0x00FF) as u8,
            imm_flag:    word & 0x0020 != 0,
            jsrr_flag:   word & 0x0800 != 0,
        }
    }
}
