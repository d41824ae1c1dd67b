use std::fmt;

use dbt_core::{A32ExtReg, A32Reg, Cond};

/// Guest-visible exception conditions raised from translated code.
///
/// The discriminant is the payload of `A32ExceptionRaised`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum Exception {
    /// Encoding is UNDEFINED or not recognised by any decoder.
    UndefinedInstruction = 0,
    /// Encoding is UNPREDICTABLE.
    UnpredictableInstruction,
    SendEvent,
    WaitForInterrupt,
    WaitForEvent,
    Yield,
    Breakpoint,
}

impl Exception {
    pub const fn code(self) -> u64 {
        self as u64
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Barrel-shifter operation encoded in `stype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftType {
    Lsl,
    Lsr,
    Asr,
    Ror,
}

impl ShiftType {
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => ShiftType::Lsl,
            1 => ShiftType::Lsr,
            2 => ShiftType::Asr,
            _ => ShiftType::Ror,
        }
    }
}

// -- Field conversions for decoded argument structs --

pub fn cond(v: i64) -> Cond {
    Cond::from_bits(v as u32)
}

pub fn reg(v: i64) -> A32Reg {
    A32Reg::new((v & 0xf) as u32)
}

pub fn ext_single(vx: i64, x: i64) -> A32ExtReg {
    A32ExtReg::single(vx as u32, x as u32)
}

pub fn ext_double(vx: i64, x: i64) -> A32ExtReg {
    A32ExtReg::double(vx as u32, x as u32)
}

/// `ARMExpandImm`: an 8-bit value rotated right by twice `rot`.
pub fn arm_expand_imm(rot: i64, imm8: i64) -> u32 {
    ((imm8 as u32) & 0xff).rotate_right(((rot as u32) & 0xf) * 2)
}

/// Carry-out of `ARMExpandImm_C` when the rotation is non-zero.
pub fn arm_expand_imm_carry(rot: i64, imm8: i64) -> Option<bool> {
    if rot & 0xf == 0 {
        None
    } else {
        Some(arm_expand_imm(rot, imm8) >> 31 != 0)
    }
}
