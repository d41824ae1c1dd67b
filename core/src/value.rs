use crate::regs::{A32ExtReg, A32Reg};
use crate::types::Type;

/// Handle to an instruction node in its owning block's arena.
///
/// Handles are plain slot ids; they are only meaningful for the block
/// that issued them and are validated against that block on use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstRef(pub u32);

impl InstRef {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// An IR operand: nothing, a typed immediate, or a reference to the
/// result of an earlier instruction.
///
/// A reference carries the result type of the instruction it points at,
/// so every non-empty value knows its type without consulting the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Value {
    #[default]
    Empty,
    U1(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    A32Reg(A32Reg),
    A32ExtReg(A32ExtReg),
    Inst(InstRef, Type),
}

impl Value {
    pub const fn get_type(&self) -> Type {
        match *self {
            Value::Empty => Type::Void,
            Value::U1(_) => Type::U1,
            Value::U8(_) => Type::U8,
            Value::U16(_) => Type::U16,
            Value::U32(_) => Type::U32,
            Value::U64(_) => Type::U64,
            Value::A32Reg(_) => Type::A32Reg,
            Value::A32ExtReg(_) => Type::A32ExtReg,
            Value::Inst(_, ty) => ty,
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub const fn is_immediate(&self) -> bool {
        !matches!(self, Value::Empty | Value::Inst(..))
    }

    /// The referenced instruction, if this value is a reference.
    pub const fn inst(&self) -> Option<InstRef> {
        match *self {
            Value::Inst(r, _) => Some(r),
            _ => None,
        }
    }

    /// Zero-extended integer payload of an integer immediate.
    pub const fn imm_as_u64(&self) -> Option<u64> {
        match *self {
            Value::U1(v) => Some(v as u64),
            Value::U8(v) => Some(v as u64),
            Value::U16(v) => Some(v as u64),
            Value::U32(v) => Some(v as u64),
            Value::U64(v) => Some(v),
            _ => None,
        }
    }

    pub const fn is_zero(&self) -> bool {
        matches!(self.imm_as_u64(), Some(0))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::U1(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<A32Reg> for Value {
    fn from(r: A32Reg) -> Self {
        Value::A32Reg(r)
    }
}

impl From<A32ExtReg> for Value {
    fn from(r: A32ExtReg) -> Self {
        Value::A32ExtReg(r)
    }
}
