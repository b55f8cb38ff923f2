//! Simulating and execution of assembled LC-3 images.
//!
//! This module is focused on executing loaded object images (i.e., [`ObjectFile`]).
//!
//! This module consists of:
//! - [`Simulator`]: The struct that simulates loaded machine code.
//! - [`mem`]: The module handling memory and the register file.
//! - [`debug`]: The module handling breakpoint flags for the simulator.
//! - [`io`]: The module handling the console sink and keyboard sources.
//!
//! # Usage
//!
//! To simulate some code, you need to instantiate a Simulator and load an
//! object stream (or an already-parsed [`ObjectFile`]) to it:
//!
//! ```
//! use lc3_solo::sim::Simulator;
//! use lc3_solo::ast::reg_consts::R0;
//!
//! // .orig x3000 / ADD R0, R0, #5 / HALT
//! let stream = [0x30, 0x00, 0x00, 0x02, 0x10, 0x25, 0xF0, 0x25];
//!
//! let mut sim = Simulator::new(Default::default());
//! sim.load_stream(&stream).unwrap();
//! sim.run();
//!
//! assert_eq!(sim.reg_file[R0], 5);
//! assert!(sim.halted());
//! ```
//!
//! ## Prefetch
//!
//! The machine prefetches: immediately after an instruction executes, the
//! word at `pc` is fetched, decoded, and latched, and `pc` advances past it.
//! The latched record (see [`Simulator::latched_instr`]) is therefore always
//! the *next* instruction to execute, and the `pc`/`ir` fields as displayed
//! by a debugger reflect already-fetched-but-not-yet-executed state. The
//! address of the latched instruction itself is [`Simulator::prefetch_pc`].
//!
//! ## Execution
//!
//! [`Simulator::step`] executes exactly one instruction. [`Simulator::run`]
//! executes until the machine halts or an armed breakpoint is reached; the
//! breakpoint is left latched and suppressed, so a second `run` from the
//! same stop continues through it, while a later pass over the address
//! triggers it again.
//!
//! ```
//! use lc3_solo::sim::Simulator;
//!
//! // x3000: ADD R0, R0, #1 / ADD R0, R0, #1 / HALT
//! let stream = [0x30, 0x00, 0x00, 0x03, 0x10, 0x21, 0x10, 0x21, 0xF0, 0x25];
//!
//! let mut sim = Simulator::new(Default::default());
//! sim.load_stream(&stream).unwrap();
//!
//! sim.set_breakpoint(0x3001);
//! sim.run();
//! assert_eq!(sim.prefetch_pc(), 0x3001); // stopped just before x3001
//! assert!(!sim.halted());
//!
//! sim.run(); // does not immediately re-trigger
//! assert!(sim.halted());
//! ```
//!
//! ## Querying and editing state
//!
//! Registers, `pc`, `ir`, the condition code, and the console are plain
//! fields or accessors. Memory can be inspected and edited with
//! [`Simulator::peek`] and [`Simulator::poke`] (the "memory explorer"
//! surface), which route through the same device-register-aware path the
//! machine itself uses.
//!
//! ## IO
//!
//! `OUT`/`PUTS` append to the [`Console`] field; `GETC`/`IN` block on the
//! installed [`Keyboard`] (see [`Simulator::set_keyboard`]). The default
//! keyboard is empty, so input traps read NUL rather than wedging.
//!
//! [`ObjectFile`]: crate::obj::ObjectFile
//! [`Console`]: io::Console
//! [`Keyboard`]: io::Keyboard

pub mod debug;
pub mod io;
pub mod mem;

use crate::ast::reg_consts::{R0, R1, R7};
use crate::ast::{CondCode, Instr, Opcode, Reg};
use crate::obj::{LoadError, ObjectFile};
use debug::{BpState, Breakpoints};
use io::{Console, EmptyKeyboard, Keyboard};
use mem::{InitStrategy, MemArray, RegFile};

/// Where the PC starts on a fresh machine and after [`Simulator::reset`].
pub const PC_START: u16 = 0x3000;

/// The trap vector of the unsigned-divide extension
/// (enabled by [`SimFlags::enable_udiv`]).
pub const UDIV_VECT: u8 = 0x80;

/// Configuration flags for [`Simulator`].
///
/// These are consumed by [`Simulator::new`] and preserved across
/// [`Simulator::reset`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SimFlags {
    /// Whether the unsigned-divide trap extension ([`UDIV_VECT`]) is enabled.
    ///
    /// When disabled, that vector behaves like any other unassigned vector
    /// (a generic call through the trap table).
    ///
    /// By default, this flag is `false`.
    pub enable_udiv: bool,

    /// The fill strategy for memory and registers on a cold start.
    ///
    /// By default, this flag is [`InitStrategy::default`] (zeroed).
    pub machine_init: InitStrategy,
}

#[allow(clippy::derivable_impls)]
impl Default for SimFlags {
    fn default() -> Self {
        Self {
            enable_udiv: false,
            machine_init: Default::default(),
        }
    }
}

/// Executes loaded machine code.
pub struct Simulator {
    /// The simulator's memory.
    ///
    /// Note that this is held in the heap, as it is too large for the stack.
    pub mem: MemArray,

    /// The simulator's register file.
    pub reg_file: RegFile,

    /// The program counter.
    ///
    /// Because of prefetch, this always points *past* the latched
    /// instruction; the latched instruction's own address is
    /// [`Simulator::prefetch_pc`].
    pub pc: u16,

    /// Latch of the most recently fetched raw word, for display.
    pub ir: u16,

    /// The condition code.
    pub cc: CondCode,

    /// The decoded form of `ir`: the next instruction to execute.
    next_instr: Instr,

    /// Whether the run loop should keep going.
    running: bool,

    /// Whether the machine has executed a halt. Stepping is refused until
    /// an explicit [`Simulator::reset`].
    halted: bool,

    /// The number of instructions executed since the last reset.
    /// Diagnostics only; this can be set to 0 to reset the counter.
    pub instructions_run: u64,

    /// Breakpoint flags, one per address.
    pub breakpoints: Breakpoints,

    /// Console output emitted by the `OUT`/`PUTS` trap routines.
    pub console: Console,

    /// Key source for the `GETC`/`IN` trap routines.
    keyboard: Box<dyn Keyboard + Send>,

    /// The loaded image, retained so [`Simulator::reset`] can re-apply it.
    image: ObjectFile,

    /// Configuration settings for the simulator. Preserved between resets.
    pub flags: SimFlags,
}

impl Simulator {
    /// Creates a new simulator with nothing loaded.
    pub fn new(flags: SimFlags) -> Self {
        let mut filler = flags.machine_init.generator();

        Self {
            mem: MemArray::new(&mut filler),
            reg_file: RegFile::new(&mut filler),
            pc: PC_START,
            ir: 0,
            cc: CondCode::Zero,
            next_instr: Instr::decode(0),
            running: false,
            halted: false,
            instructions_run: 0,
            breakpoints: Breakpoints::new(),
            console: Console::new(),
            keyboard: Box::new(EmptyKeyboard),
            image: ObjectFile::empty(),
            flags,
        }
    }

    /// Installs a keyboard source for the `GETC`/`IN` trap routines.
    pub fn set_keyboard(&mut self, keyboard: impl Keyboard + Send + 'static) {
        self.keyboard = Box::new(keyboard);
    }

    /// Parses and loads an object byte stream.
    ///
    /// On error, memory is left at whatever partial writes occurred and the
    /// machine should not be run until a fresh, valid load.
    pub fn load_stream(&mut self, stream: &[u8]) -> Result<(), LoadError> {
        let obj = ObjectFile::read(stream)?;
        self.load_obj_file(&obj);
        Ok(())
    }

    /// Loads an object file into this simulator.
    ///
    /// Only the addressed cells are overwritten. The image is retained for
    /// [`Simulator::reset`], and the fetch/decode latch is primed from the
    /// current `pc`.
    pub fn load_obj_file(&mut self, obj: &ObjectFile) {
        for (origin, words) in obj.block_iter() {
            self.mem.copy_obj_block(origin, words);
        }
        self.image = obj.clone();
        self.fetch();
    }

    /// Resets the machine to a cold start with the same loaded image.
    ///
    /// This clears `halted`, re-applies the retained image, zeroes the
    /// registers, condition code and instruction counter, restores the PC to
    /// [`PC_START`], and re-primes the fetch/decode latch. Breakpoints and
    /// [`SimFlags`] survive a reset.
    pub fn reset(&mut self) {
        self.pc = PC_START;
        self.running = true;
        self.halted = false;
        self.reg_file.clear();
        self.cc = CondCode::Zero;
        self.instructions_run = 0;

        for (origin, words) in self.image.block_iter() {
            self.mem.copy_obj_block(origin, words);
        }
        self.fetch();
    }

    /// Fetches and decodes the word at `pc`, latching it as the next
    /// instruction and advancing `pc` past it.
    fn fetch(&mut self) {
        self.ir = self.mem.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        self.next_instr = Instr::decode(self.ir);
    }

    /// Sets the condition code from a just-written register value.
    fn set_cc(&mut self, result: u16) {
        self.cc = CondCode::of(result);
    }

    /// The address of the latched (about-to-execute) instruction.
    ///
    /// `pc` has already advanced past the fetch, so this is `pc - 1`.
    pub fn prefetch_pc(&self) -> u16 {
        self.pc.wrapping_sub(1)
    }

    /// The decoded instruction that the next [`Simulator::step`] will execute.
    pub fn latched_instr(&self) -> Instr {
        self.next_instr
    }

    /// Whether the machine has halted. Stepping is refused until a reset.
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Whether a [`Simulator::run`] loop is in progress or was not stopped.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Reads a memory cell through the machine's own access path
    /// (the "memory explorer" read).
    pub fn peek(&self, addr: u16) -> u16 {
        self.mem.read(addr)
    }

    /// Writes a memory cell through the machine's own access path
    /// (the "memory explorer" edit).
    pub fn poke(&mut self, addr: u16, value: u16) {
        self.mem.write(addr, value);
    }

    /// Arms a breakpoint at the given address. Idempotent.
    pub fn set_breakpoint(&mut self, addr: u16) {
        self.breakpoints.set(addr);
    }

    /// Removes the breakpoint at the given address. Idempotent.
    pub fn unset_breakpoint(&mut self, addr: u16) {
        self.breakpoints.unset(addr);
    }

    /// The breakpoint flag at the given address.
    pub fn breakpoint_state(&self, addr: u16) -> BpState {
        self.breakpoints.state(addr)
    }

    /// Executes exactly one instruction. No-op if the machine has halted.
    ///
    /// The latched instruction executes, then (unless that execution halted
    /// the machine) the next word at `pc` is fetched and latched.
    pub fn step(&mut self) {
        if self.halted {
            return;
        }

        self.execute();
        if self.halted {
            return;
        }
        self.fetch();
    }

    /// Executes until the machine halts or an armed breakpoint is reached.
    ///
    /// On hitting an armed breakpoint, execution stops with the breakpointed
    /// instruction latched but not executed, and the flag flips to
    /// [`BpState::PendingRearm`] so an immediate second `run` from the same
    /// position continues through it. The flag flips back to
    /// [`BpState::Armed`] as soon as the fetch latch next lands on that
    /// address, so a later pass over it triggers again.
    ///
    /// This blocks for as long as execution continues, including any
    /// unbounded wait on keyboard input inside a `GETC`/`IN` trap.
    pub fn run(&mut self) {
        self.running = true;
        while self.running && !self.halted {
            let at = self.prefetch_pc();
            if self.breakpoints.state(at) == BpState::Armed {
                self.running = false;
                self.breakpoints.suppress(at);
                break;
            }

            self.execute();
            if !self.halted {
                self.fetch();
            }
            self.breakpoints.rearm(self.prefetch_pc());
        }
    }

    /// Blocks on the keyboard source. An exhausted source reads as NUL.
    fn wait_key(&mut self) -> u8 {
        self.keyboard.wait_key().unwrap_or(0)
    }

    /// Applies the latched instruction's semantics to the machine state.
    fn execute(&mut self) {
        let instr = self.next_instr;

        match instr.opcode {
            Opcode::BR => {
                if self.cc.satisfies(instr.nzp) {
                    self.pc = self.pc.wrapping_add_signed(instr.pc_offset9);
                }
            }
            Opcode::ADD => {
                let rhs = match instr.imm_flag {
                    true => instr.imm5 as u16,
                    false => self.reg_file[instr.sr2],
                };
                let result = self.reg_file[instr.sr1].wrapping_add(rhs);
                self.reg_file[instr.dr] = result;
                self.set_cc(result);
            }
            Opcode::AND => {
                let rhs = match instr.imm_flag {
                    true => instr.imm5 as u16,
                    false => self.reg_file[instr.sr2],
                };
                let result = self.reg_file[instr.sr1] & rhs;
                self.reg_file[instr.dr] = result;
                self.set_cc(result);
            }
            Opcode::LD => {
                let ea = self.pc.wrapping_add_signed(instr.pc_offset9);
                let val = self.mem.read(ea);
                self.reg_file[instr.dr] = val;
                self.set_cc(val);
            }
            Opcode::LDI => {
                let ea = self.mem.read(self.pc.wrapping_add_signed(instr.pc_offset9));
                let val = self.mem.read(ea);
                self.reg_file[instr.dr] = val;
                self.set_cc(val);
            }
            Opcode::LDR => {
                let ea = self.reg_file[instr.sr1].wrapping_add_signed(instr.offset6);
                let val = self.mem.read(ea);
                self.reg_file[instr.dr] = val;
                self.set_cc(val);
            }
            Opcode::LEA => {
                let ea = self.pc.wrapping_add_signed(instr.pc_offset9);
                self.reg_file[instr.dr] = ea;
                self.set_cc(ea);
            }
            Opcode::ST => {
                let ea = self.pc.wrapping_add_signed(instr.pc_offset9);
                self.mem.write(ea, self.reg_file[instr.dr]);
            }
            Opcode::STI => {
                let ea = self.mem.read(self.pc.wrapping_add_signed(instr.pc_offset9));
                self.mem.write(ea, self.reg_file[instr.dr]);
            }
            Opcode::STR => {
                let ea = self.reg_file[instr.sr1].wrapping_add_signed(instr.offset6);
                self.mem.write(ea, self.reg_file[instr.dr]);
            }
            Opcode::JSR => {
                // The target is read before R7 is written, so JSRR R7
                // jumps through the pre-call value.
                let target = match instr.jsrr_flag {
                    true => self.reg_file[instr.sr1],
                    false => self.pc.wrapping_add_signed(instr.pc_offset11),
                };
                self.reg_file[R7] = self.pc;
                self.pc = target;
            }
            Opcode::JMP => {
                // JMP also writes the link register. Nonstandard, but it is
                // the behavior being reproduced.
                let target = self.reg_file[instr.sr1];
                self.reg_file[R7] = self.pc;
                self.pc = target;
            }
            Opcode::NOT => {
                let result = !self.reg_file[instr.sr1];
                self.reg_file[instr.dr] = result;
                self.set_cc(result);
            }
            Opcode::RTI => { /* interrupts are out of scope */ }
            Opcode::Reserved => { /* reserved slot executes as a no-op */ }
            Opcode::TRAP => self.trap(instr.trap_vect),
        }

        self.instructions_run = self.instructions_run.wrapping_add(1);
    }

    /// Dispatches a trap vector to its service routine.
    fn trap(&mut self, vect: u8) {
        match vect {
            // GETC: read one key into R0, no echo.
            0x20 => {
                let key = self.wait_key();
                self.reg_file[R0] = u16::from(key);
            }
            // OUT: write R0's low byte to the console.
            0x21 => {
                self.console.push(self.reg_file[R0] as u8);
            }
            // PUTS: write the NUL-terminated string at [R0].
            // A local cursor walks the string, so R0 is unchanged after.
            0x22 => {
                let mut addr = self.reg_file[R0];
                loop {
                    let word = self.mem.read(addr);
                    if word == 0 {
                        break;
                    }
                    self.console.push(word as u8);
                    addr = addr.wrapping_add(1);
                }
            }
            // IN: read one key into R0 and echo it.
            0x23 => {
                let key = self.wait_key();
                self.reg_file[R0] = u16::from(key);
                self.console.push(key);
            }
            // HALT.
            0x25 => {
                self.halted = true;
                self.running = false;
            }
            // Unsigned divide extension: R0 <- R0 / R1, R1 <- R0 % R1.
            // A zero divisor skips the trap entirely.
            UDIV_VECT if self.flags.enable_udiv => {
                let divisor = self.reg_file[R1];
                if divisor != 0 {
                    let dividend = self.reg_file[R0];
                    self.reg_file[R0] = dividend / divisor;
                    self.reg_file[R1] = dividend % divisor;
                }
            }
            // Any other vector: a generic call through the trap vector
            // table at low memory.
            _ => {
                self.reg_file[R7] = self.pc;
                self.pc = self.mem.read(u16::from(vect));
            }
        }
    }
}
impl Default for Simulator {
    fn default() -> Self {
        Self::new(Default::default())
    }
}
impl std::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulator")
            .field("pc", &self.pc)
            .field("ir", &self.ir)
            .field("cc", &self.cc)
            .field("running", &self.running)
            .field("halted", &self.halted)
            .field("instructions_run", &self.instructions_run)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::io::ScriptedKeyboard;
    use super::*;
    use crate::ast::reg_consts::*;

    /// Places raw words at an origin and primes the pipeline there.
    fn load_words(sim: &mut Simulator, origin: u16, words: &[u16]) {
        let mut obj = vec![origin.to_be_bytes(), (words.len() as u16).to_be_bytes()];
        obj.extend(words.iter().map(|w| w.to_be_bytes()));
        sim.load_stream(&obj.concat()).unwrap();
    }

    fn sim_with(words: &[u16]) -> Simulator {
        let mut sim = Simulator::new(Default::default());
        load_words(&mut sim, PC_START, words);
        sim
    }

    #[test]
    fn load_primes_the_latch() {
        let sim = sim_with(&[0x1025, 0xF025]);
        assert_eq!(sim.ir, 0x1025);
        assert_eq!(sim.pc, 0x3001);
        assert_eq!(sim.prefetch_pc(), 0x3000);
        assert_eq!(sim.latched_instr(), Instr::decode(0x1025));
    }

    #[test]
    fn add_imm_sets_cc_positive() {
        let mut sim = sim_with(&[0x1025, 0xF025]); // ADD R0, R0, #5
        sim.step();
        assert_eq!(sim.reg_file[R0], 5);
        assert_eq!(sim.cc, CondCode::Positive);
    }

    #[test]
    fn add_wraps_without_trapping() {
        let mut sim = sim_with(&[0x1021, 0xF025]); // ADD R0, R0, #1
        sim.reg_file[R0] = 0xFFFF;
        sim.step();
        assert_eq!(sim.reg_file[R0], 0);
        assert_eq!(sim.cc, CondCode::Zero);
    }

    #[test]
    fn and_reg_form() {
        let mut sim = sim_with(&[0x5042, 0xF025]); // AND R0, R1, R2
        sim.reg_file[R1] = 0b1100;
        sim.reg_file[R2] = 0b1010;
        sim.step();
        assert_eq!(sim.reg_file[R0], 0b1000);
        assert_eq!(sim.cc, CondCode::Positive);
    }

    #[test]
    fn not_complements_and_sets_cc() {
        let mut sim = sim_with(&[0x907F, 0xF025]); // NOT R0, R1
        sim.reg_file[R1] = 0x00FF;
        sim.step();
        assert_eq!(sim.reg_file[R0], 0xFF00);
        assert_eq!(sim.cc, CondCode::Negative);
    }

    #[test]
    fn store_leaves_cc_unchanged() {
        // ADD R0, R0, #5 ; ST R0, #2
        let mut sim = sim_with(&[0x1025, 0x3002, 0xF025]);
        sim.step();
        assert_eq!(sim.cc, CondCode::Positive);
        sim.step(); // ST: pc=x3002 at execute, ea = x3002 + 2
        assert_eq!(sim.cc, CondCode::Positive);
        assert_eq!(sim.peek(0x3004), 5);
    }

    #[test]
    fn ld_ldi_ldr_effective_addresses() {
        // LD R0, #2 ; LDI R1, #2 ; LDR R2, R0, #1
        let mut sim = sim_with(&[0x2002, 0xA202, 0x6401]);
        sim.poke(0x3003, 0x1234); // LD target (x3001 + 2)
        sim.poke(0x3004, 0x4000); // LDI pointer (x3002 + 2)
        sim.poke(0x4000, 0x5678); // LDI target
        sim.poke(0x1235, 0x0042); // LDR target (R0 + 1)

        sim.step();
        assert_eq!(sim.reg_file[R0], 0x1234);
        sim.step();
        assert_eq!(sim.reg_file[R1], 0x5678);
        sim.step();
        assert_eq!(sim.reg_file[R2], 0x0042);
        assert_eq!(sim.cc, CondCode::Positive);
    }

    #[test]
    fn sti_stores_through_pointer() {
        // ADD R0, R0, #7 ; STI R0, #1
        let mut sim = sim_with(&[0x1027, 0xB001]);
        sim.poke(0x3003, 0x5000); // pointer cell (x3002 + 1)
        sim.step();
        sim.step();
        assert_eq!(sim.peek(0x5000), 7);
    }

    #[test]
    fn br_empty_mask_never_branches() {
        let mut sim = sim_with(&[0x01FF, 0xF025]); // BR (no nzp) #-1
        sim.step();
        // Fall through: the next latched instruction is the halt.
        assert_eq!(sim.prefetch_pc(), 0x3001);
    }

    #[test]
    fn br_taken_on_matching_mask() {
        // ADD R0, R0, #1 ; BRp #1 ; HALT ; HALT
        let mut sim = sim_with(&[0x1021, 0x0201, 0xF025, 0xF025]);
        sim.step();
        sim.step(); // BRp: pc=x3002 at execute, +1 => x3003
        assert_eq!(sim.prefetch_pc(), 0x3003);
    }

    #[test]
    fn jsr_pc_relative_links_r7() {
        let mut sim = sim_with(&[0x4005, 0xF025]); // JSR #5 (bit 11 clear)
        sim.step();
        assert_eq!(sim.reg_file[R7], 0x3001);
        assert_eq!(sim.prefetch_pc(), 0x3006);
    }

    #[test]
    fn jsrr_through_r7_uses_pre_call_value() {
        let mut sim = sim_with(&[0x4DC0, 0xF025]); // JSRR-form through R7 (bit 11 set)
        sim.reg_file[R7] = 0x4000;
        sim.step();
        assert_eq!(sim.prefetch_pc(), 0x4000);
        assert_eq!(sim.reg_file[R7], 0x3001);
    }

    #[test]
    fn jmp_writes_link_register() {
        // Reproduces the source's quirk: JMP leaves a return address in R7.
        let mut sim = sim_with(&[0xC040, 0xF025]); // JMP R1
        sim.reg_file[R1] = 0x4000;
        sim.step();
        assert_eq!(sim.prefetch_pc(), 0x4000);
        assert_eq!(sim.reg_file[R7], 0x3001);
    }

    #[test]
    fn rti_and_reserved_are_no_ops() {
        let mut sim = sim_with(&[0x8000, 0xD555, 0xF025]);
        sim.reg_file[R0] = 0xABCD;
        sim.step();
        sim.step();
        assert_eq!(sim.reg_file[R0], 0xABCD);
        assert_eq!(sim.prefetch_pc(), 0x3002);
        assert_eq!(sim.instructions_run, 2);
    }

    #[test]
    fn halt_refuses_further_steps() {
        let mut sim = sim_with(&[0xF025, 0x1021]);
        sim.step();
        assert!(sim.halted());
        let count = sim.instructions_run;
        sim.step();
        sim.step();
        assert_eq!(sim.instructions_run, count);
    }

    #[test]
    fn unassigned_vector_calls_through_trap_table() {
        let mut sim = sim_with(&[0xF040, 0xF025]); // TRAP x40
        sim.poke(0x0040, 0x5000); // trap table entry
        sim.poke(0x5000, 0xF025);
        sim.step();
        assert_eq!(sim.reg_file[R7], 0x3001);
        assert_eq!(sim.prefetch_pc(), 0x5000);
    }

    #[test]
    fn getc_does_not_echo_but_in_does() {
        // GETC ; IN ; HALT
        let mut sim = sim_with(&[0xF020, 0xF023, 0xF025]);
        sim.set_keyboard(ScriptedKeyboard::new(*b"ab"));
        sim.step();
        assert_eq!(sim.reg_file[R0], u16::from(b'a'));
        assert_eq!(sim.console.contents(), "");
        sim.step();
        assert_eq!(sim.reg_file[R0], u16::from(b'b'));
        assert_eq!(sim.console.contents(), "b");
    }

    #[test]
    fn exhausted_keyboard_reads_nul() {
        let mut sim = sim_with(&[0xF020, 0xF025]);
        sim.reg_file[R0] = 0x1234;
        sim.step();
        assert_eq!(sim.reg_file[R0], 0);
    }

    #[test]
    fn udiv_disabled_falls_back_to_trap_table() {
        let mut sim = sim_with(&[0xF080, 0xF025]);
        sim.poke(u16::from(UDIV_VECT), 0x5000);
        sim.step();
        assert_eq!(sim.prefetch_pc(), 0x5000);
    }

    #[test]
    fn reset_restores_cold_start_with_same_image() {
        let mut sim = sim_with(&[0x1025, 0xF025]);
        sim.run();
        assert!(sim.halted());
        assert_eq!(sim.reg_file[R0], 5);
        sim.poke(0x3000, 0x0000); // scribble over the program

        sim.reset();
        assert!(!sim.halted());
        assert_eq!(sim.reg_file[R0], 0);
        assert_eq!(sim.cc, CondCode::Zero);
        assert_eq!(sim.instructions_run, 0);
        assert_eq!(sim.peek(0x3000), 0x1025); // image re-applied

        sim.run();
        assert_eq!(sim.reg_file[R0], 5);
        assert!(sim.halted());
    }

    #[test]
    fn breakpoints_survive_reset() {
        let mut sim = sim_with(&[0x1021, 0x1021, 0xF025]);
        sim.set_breakpoint(0x3001);
        sim.run();
        assert_eq!(sim.prefetch_pc(), 0x3001);
        sim.reset();
        sim.run();
        assert_eq!(sim.prefetch_pc(), 0x3001);
        assert!(!sim.halted());
    }
}
