//! Disassembly of raw machine words.
//!
//! [`disassemble`] renders one word as the mnemonic line a memory viewer
//! prints next to it; [`bit_string`] renders the same word as nibble-grouped
//! binary. Both are pure display helpers layered on [`Instr::decode`] and
//! never consult or mutate machine state.
//!
//! ```
//! use lc3_solo::disasm::{bit_string, disassemble};
//!
//! assert_eq!(disassemble(0x1025), "ADD R0, R0, #5");
//! assert_eq!(disassemble(0xF025), "TRAP x25");
//! assert_eq!(bit_string(0x1025), "0001 0000 0010 0101");
//! ```

use crate::ast::{Instr, Opcode};

/// The NZP suffix for each 3-bit branch mask, indexed by the mask itself.
const NZP_SUFFIX: [&str; 8] = ["", "p", "z", "zp", "n", "np", "nz", "nzp"];

/// Renders one raw word as a mnemonic string.
///
/// The field semantics match execution exactly: the branch mask becomes a
/// letter suffix (`NOP` when empty), ADD/AND pick the immediate or
/// register form off the mode flag, and the subroutine-call word renders as
/// `JSR #off` or `JSRR Rn` per its own mode flag. Words in the reserved
/// opcode slot render as `RES`.
pub fn disassemble(word: u16) -> String {
    let instr = Instr::decode(word);

    match instr.opcode {
        Opcode::BR => match instr.nzp {
            0 => String::from("NOP"),
            nzp => format!("BR{} #{}", NZP_SUFFIX[usize::from(nzp)], instr.pc_offset9),
        },
        Opcode::ADD => match instr.imm_flag {
            true => format!("ADD {}, {}, #{}", instr.dr, instr.sr1, instr.imm5),
            false => format!("ADD {}, {}, {}", instr.dr, instr.sr1, instr.sr2),
        },
        Opcode::AND => match instr.imm_flag {
            true => format!("AND {}, {}, #{}", instr.dr, instr.sr1, instr.imm5),
            false => format!("AND {}, {}, {}", instr.dr, instr.sr1, instr.sr2),
        },
        Opcode::LD => format!("LD {}, #{}", instr.dr, instr.pc_offset9),
        Opcode::LDI => format!("LDI {}, #{}", instr.dr, instr.pc_offset9),
        Opcode::LDR => format!("LDR {}, {}, #{}", instr.dr, instr.sr1, instr.offset6),
        Opcode::LEA => format!("LEA {}, #{}", instr.dr, instr.pc_offset9),
        Opcode::ST => format!("ST {}, #{}", instr.dr, instr.pc_offset9),
        Opcode::STI => format!("STI {}, #{}", instr.dr, instr.pc_offset9),
        Opcode::STR => format!("STR {}, {}, #{}", instr.dr, instr.sr1, instr.offset6),
        Opcode::JSR => match instr.jsrr_flag {
            true => format!("JSRR {}", instr.sr1),
            false => format!("JSR #{}", instr.pc_offset11),
        },
        Opcode::JMP => format!("JMP {}", instr.sr1),
        Opcode::NOT => format!("NOT {}, {}", instr.dr, instr.sr1),
        Opcode::RTI => String::from("RTI"),
        Opcode::Reserved => String::from("RES"),
        Opcode::TRAP => format!("TRAP x{:02x}", instr.trap_vect),
    }
}

/// Renders one raw word as space-separated binary nibbles, the form shown
/// alongside hex in a memory viewer.
pub fn bit_string(word: u16) -> String {
    format!(
        "{:04b} {:04b} {:04b} {:04b}",
        (word >> 12) & 0xF,
        (word >> 8) & 0xF,
        (word >> 4) & 0xF,
        word & 0xF,
    )
}
