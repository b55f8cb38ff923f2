//! A LC-3 object-file loader, disassembler, and simulator.
//!
//! This crate is the machine underneath a terminal LC-3 debugger: it loads
//! assembled object images, executes them one step at a time or in a
//! run-to-breakpoint loop, and exposes the registers, memory, console
//! output, and disassembly a frontend renders. The frontend itself (screen
//! drawing, keybindings, argument parsing) lives outside the crate.
//!
//! # Usage
//!
//! Load an object byte stream into a simulator and run it:
//! ```
//! use lc3_solo::sim::Simulator;
//! use lc3_solo::ast::reg_consts::R0;
//!
//! // .orig x3000 / ADD R0, R0, #5 / HALT
//! let stream = [0x30, 0x00, 0x00, 0x02, 0x10, 0x25, 0xF0, 0x25];
//!
//! let mut simulator = Simulator::new(Default::default());
//! simulator.load_stream(&stream).unwrap();
//! simulator.run();
//!
//! assert_eq!(simulator.reg_file[R0], 5);
//! assert!(simulator.halted());
//! ```
//!
//! A memory viewer disassembles words independently of the machine:
//! ```
//! use lc3_solo::disasm::disassemble;
//!
//! assert_eq!(disassemble(0x1025), "ADD R0, R0, #5");
//! assert_eq!(disassemble(0xF025), "TRAP x25");
//! ```
//!
//! If more granularity is needed, there are stepping, breakpoint, and
//! memory-editing functions. See the [`sim`] module for more details.
#![warn(missing_docs)]

pub mod ast;
pub mod disasm;
pub mod obj;
pub mod sim;
pub mod sym;
