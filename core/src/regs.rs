//! Guest register identifiers carried as IR immediates.

use std::fmt;

/// A32 core register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct A32Reg(u8);

impl A32Reg {
    pub const SP: A32Reg = A32Reg(13);
    pub const LR: A32Reg = A32Reg(14);
    pub const PC: A32Reg = A32Reg(15);

    /// Build a register from a 4-bit encoding field.
    pub const fn new(n: u32) -> Self {
        assert!(n < 16, "A32 register index out of range");
        Self(n as u8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_pc(self) -> bool {
        self.0 == 15
    }
}

impl fmt::Display for A32Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            13 => f.write_str("sp"),
            14 => f.write_str("lr"),
            15 => f.write_str("pc"),
            n => write!(f, "r{n}"),
        }
    }
}

/// A32 extension (VFP) register: single- or double-precision view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum A32ExtReg {
    S(u8),
    D(u8),
}

impl A32ExtReg {
    /// Single-precision register from `Vx:X` (VFP encoding order).
    pub const fn single(vx: u32, x: u32) -> Self {
        A32ExtReg::S((((vx & 0xf) << 1) | (x & 1)) as u8)
    }

    /// Double-precision register from `X:Vx`.
    pub const fn double(vx: u32, x: u32) -> Self {
        A32ExtReg::D((((x & 1) << 4) | (vx & 0xf)) as u8)
    }

    pub const fn is_double(self) -> bool {
        matches!(self, A32ExtReg::D(_))
    }
}

impl fmt::Display for A32ExtReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            A32ExtReg::S(n) => write!(f, "s{n}"),
            A32ExtReg::D(n) => write!(f, "d{n}"),
        }
    }
}
