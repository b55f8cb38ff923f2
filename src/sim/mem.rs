//! Memory and register storage for the simulator.
//!
//! This module consists of:
//! - [`MemArray`]: the 65536-cell memory, spanning the full 16-bit address space.
//! - [`RegFile`]: the eight-register file.
//! - [`InitStrategy`]: the fill strategy for memory and registers on a cold start.

use rand::rngs::StdRng;
use rand::Rng;

use crate::ast::Reg;

/// Keyboard status register address.
pub const KBSR: u16 = 0xFE00;
/// Keyboard data register address.
pub const KBDR: u16 = 0xFE02;
/// Display status register address.
pub const DSR: u16 = 0xFE04;
/// Display data register address.
pub const DDR: u16 = 0xFE06;

const N: usize = 1 << 16;

/// Trait that describes types that can generate fill data for a cold-started
/// memory or register file.
pub trait WordFiller {
    /// Generate the data.
    fn generate(&mut self) -> u16;
}
impl WordFiller for () {
    /// This creates unseeded, non-deterministic values.
    fn generate(&mut self) -> u16 {
        rand::random()
    }
}
impl WordFiller for u16 {
    /// Sets each word to the given value.
    fn generate(&mut self) -> u16 {
        *self
    }
}
impl WordFiller for StdRng {
    /// This creates values from the standard random number generator.
    ///
    /// This can be used to create deterministic, seeded values.
    fn generate(&mut self) -> u16 {
        self.gen()
    }
}

/// Strategy used to fill memory and registers when the machine is created.
///
/// A freshly built machine has not loaded anything, so its cells hold
/// whatever the strategy produces. The random strategies are useful for
/// catching programs that rely on cold memory being zero.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum InitStrategy {
    /// Fills every cell with zero.
    #[default]
    Zeroed,

    /// Fills each cell randomly and non-deterministically.
    Unseeded,

    /// Fills each cell randomly and deterministically.
    Seeded {
        /// The seed the RNG is initialized with.
        seed: u64
    },
}

impl InitStrategy {
    pub(super) fn generator(&self) -> impl WordFiller {
        use rand::SeedableRng;

        match self {
            InitStrategy::Zeroed => Filler::Known(0),
            InitStrategy::Unseeded => Filler::Unseeded,
            InitStrategy::Seeded { seed } => Filler::Seeded(Box::new(StdRng::seed_from_u64(*seed))),
        }
    }
}

enum Filler {
    Unseeded,
    Seeded(Box<StdRng>),
    Known(u16),
}
impl WordFiller for Filler {
    fn generate(&mut self) -> u16 {
        match self {
            Filler::Unseeded  => ().generate(),
            Filler::Seeded(r) => r.generate(),
            Filler::Known(k)  => k.generate(),
        }
    }
}

/// Memory.
///
/// This can be addressed with any `u16` (16-bit address), so no out-of-range
/// access is possible by construction. Values wrap silently as 16-bit
/// two's-complement quantities.
///
/// Four addresses ([`KBSR`], [`KBDR`], [`DSR`], [`DDR`]) are aliased to
/// device registers. They are routed through a dedicated arm of
/// [`MemArray::read`]/[`MemArray::write`] so device behavior can be attached
/// there without touching callers; in the current design they carry no
/// read/write side effects and behave as plain cells.
#[derive(Debug)]
pub struct MemArray {
    // Held in the heap; 64Ki words is too large for the stack.
    data: Box<[u16; N]>,
}

impl MemArray {
    /// Creates a new memory, filled by the provided strategy generator.
    pub fn new(filler: &mut impl WordFiller) -> Self {
        Self {
            data: std::iter::repeat_with(|| filler.generate())
                .take(N)
                .collect::<Box<[u16]>>()
                .try_into()
                .unwrap_or_else(|_| unreachable!("iterator should have had {N} elements")),
        }
    }

    /// Copies an object-file block into this memory, overwriting only the
    /// addressed cells. Blocks that run past `xFFFF` wrap around.
    pub fn copy_obj_block(&mut self, start: u16, words: &[u16]) {
        for (i, &word) in words.iter().enumerate() {
            self.data[usize::from(start.wrapping_add(i as u16))] = word;
        }
    }

    /// Reads the cell at the provided address, as the machine would.
    ///
    /// Device-register reads currently have no modeled side effects
    /// (status bits are never raised); they land in the device arm so that
    /// polling semantics could be added without touching callers.
    pub fn read(&self, addr: u16) -> u16 {
        match addr {
            KBSR | KBDR | DSR | DDR => self.data[usize::from(addr)],
            _ => self.data[usize::from(addr)],
        }
    }

    /// Writes the cell at the provided address, as the machine would.
    pub fn write(&mut self, addr: u16, value: u16) {
        match addr {
            KBSR | KBDR | DSR | DDR => self.data[usize::from(addr)] = value,
            _ => self.data[usize::from(addr)] = value,
        }
    }
}
impl std::ops::Index<u16> for MemArray {
    type Output = u16;

    fn index(&self, addr: u16) -> &Self::Output {
        &self.data[usize::from(addr)]
    }
}
impl std::ops::IndexMut<u16> for MemArray {
    fn index_mut(&mut self, addr: u16) -> &mut Self::Output {
        &mut self.data[usize::from(addr)]
    }
}

/// The register file.
///
/// This struct can be indexed with a [`Reg`] (which can be constructed using
/// the [`crate::ast::reg_consts`] module or via [`Reg::try_from`]).
///
/// # Example
///
/// ```
/// use lc3_solo::sim::mem::RegFile;
/// use lc3_solo::ast::reg_consts::R0;
///
/// let mut reg = RegFile::new(&mut 0u16);
/// reg[R0] = 11;
/// assert_eq!(reg[R0], 11);
/// ```
#[derive(Debug, Clone)]
pub struct RegFile([u16; 8]);
impl RegFile {
    /// Creates a register file, filled by the provided strategy generator.
    pub fn new(filler: &mut impl WordFiller) -> Self {
        Self(std::array::from_fn(|_| filler.generate()))
    }

    /// Zeroes every register. Used on reset.
    pub fn clear(&mut self) {
        self.0 = [0; 8];
    }
}
impl std::ops::Index<Reg> for RegFile {
    type Output = u16;

    fn index(&self, index: Reg) -> &Self::Output {
        &self.0[usize::from(index)]
    }
}
impl std::ops::IndexMut<Reg> for RegFile {
    fn index_mut(&mut self, index: Reg) -> &mut Self::Output {
        &mut self.0[usize::from(index)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::reg_consts::*;

    #[test]
    fn zeroed_strategy_fills_zero() {
        let mem = MemArray::new(&mut InitStrategy::Zeroed.generator());
        assert_eq!(mem[0x0000], 0);
        assert_eq!(mem[0x3000], 0);
        assert_eq!(mem[0xFFFF], 0);
    }

    #[test]
    fn seeded_strategy_is_deterministic() {
        let a = MemArray::new(&mut InitStrategy::Seeded { seed: 0xC0DE }.generator());
        let b = MemArray::new(&mut InitStrategy::Seeded { seed: 0xC0DE }.generator());
        for addr in [0x0000u16, 0x1234, 0x8000, 0xFFFF] {
            assert_eq!(a[addr], b[addr]);
        }
    }

    #[test]
    fn copy_obj_block_touches_only_addressed_cells() {
        let mut mem = MemArray::new(&mut 0xBEEFu16);
        mem.copy_obj_block(0x3000, &[0x1021, 0xF025]);
        assert_eq!(mem[0x2FFF], 0xBEEF);
        assert_eq!(mem[0x3000], 0x1021);
        assert_eq!(mem[0x3001], 0xF025);
        assert_eq!(mem[0x3002], 0xBEEF);
    }

    #[test]
    fn copy_obj_block_wraps_address_space() {
        let mut mem = MemArray::new(&mut InitStrategy::Zeroed.generator());
        mem.copy_obj_block(0xFFFF, &[0xAAAA, 0xBBBB]);
        assert_eq!(mem[0xFFFF], 0xAAAA);
        assert_eq!(mem[0x0000], 0xBBBB);
    }

    #[test]
    fn device_registers_read_as_plain_cells() {
        let mut mem = MemArray::new(&mut InitStrategy::Zeroed.generator());
        mem.write(KBDR, 0x61);
        assert_eq!(mem.read(KBDR), 0x61);
        assert_eq!(mem.read(KBSR), 0);
    }

    #[test]
    fn reg_file_clear() {
        let mut reg = RegFile::new(&mut 7u16);
        assert_eq!(reg[R3], 7);
        reg.clear();
        for r in [R0, R1, R2, R3, R4, R5, R6, R7] {
            assert_eq!(reg[r], 0);
        }
    }
}
