use std::fmt;

/// Static semantic type of an IR value.
///
/// Every immediate carries one of these tags, and every opcode declares
/// the type of its result and of each formal argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Type {
    Void = 0,
    /// Compatible with every other type (pseudo-op operands, identity).
    Opaque,
    A32Reg,
    A32ExtReg,
    U1,
    U8,
    U16,
    U32,
    U64,
}

pub const TYPE_COUNT: usize = 9;

impl Type {
    pub const fn name(self) -> &'static str {
        match self {
            Type::Void => "Void",
            Type::Opaque => "Opaque",
            Type::A32Reg => "A32Reg",
            Type::A32ExtReg => "A32ExtReg",
            Type::U1 => "U1",
            Type::U8 => "U8",
            Type::U16 => "U16",
            Type::U32 => "U32",
            Type::U64 => "U64",
        }
    }

    pub const fn size_bits(self) -> u32 {
        match self {
            Type::U1 => 1,
            Type::U8 => 8,
            Type::U16 => 16,
            Type::U32 => 32,
            Type::U64 => 64,
            _ => 0,
        }
    }

    pub const fn is_void(self) -> bool {
        matches!(self, Type::Void)
    }

    pub const fn is_integer(self) -> bool {
        matches!(self, Type::U1 | Type::U8 | Type::U16 | Type::U32 | Type::U64)
    }

    /// Whether an actual argument of type `self` may be passed where
    /// `formal` is declared.
    pub fn is_compatible_with(self, formal: Type) -> bool {
        self == formal || self == Type::Opaque || formal == Type::Opaque
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Guest condition code, in architectural encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Cond {
    Eq = 0,
    Ne = 1,
    /// Carry set (unsigned higher or same).
    Hs = 2,
    /// Carry clear (unsigned lower).
    Lo = 3,
    Mi = 4,
    Pl = 5,
    Vs = 6,
    Vc = 7,
    Hi = 8,
    Ls = 9,
    Ge = 10,
    Lt = 11,
    Gt = 12,
    Le = 13,
    #[default]
    Al = 14,
    /// Reserved in A32; never a valid instruction condition.
    Nv = 15,
}

impl Cond {
    /// Decode the 4-bit condition field of an instruction word.
    pub const fn from_bits(bits: u32) -> Cond {
        match bits & 0xf {
            0 => Cond::Eq,
            1 => Cond::Ne,
            2 => Cond::Hs,
            3 => Cond::Lo,
            4 => Cond::Mi,
            5 => Cond::Pl,
            6 => Cond::Vs,
            7 => Cond::Vc,
            8 => Cond::Hi,
            9 => Cond::Ls,
            10 => Cond::Ge,
            11 => Cond::Lt,
            12 => Cond::Gt,
            13 => Cond::Le,
            14 => Cond::Al,
            _ => Cond::Nv,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Cond::Eq => "eq",
            Cond::Ne => "ne",
            Cond::Hs => "hs",
            Cond::Lo => "lo",
            Cond::Mi => "mi",
            Cond::Pl => "pl",
            Cond::Vs => "vs",
            Cond::Vc => "vc",
            Cond::Hi => "hi",
            Cond::Ls => "ls",
            Cond::Ge => "ge",
            Cond::Lt => "lt",
            Cond::Gt => "gt",
            Cond::Le => "le",
            Cond::Al => "al",
            Cond::Nv => "nv",
        }
    }

    /// Return the inverted condition. `Al` and `Nv` have no inverse
    /// and map to themselves.
    pub const fn invert(self) -> Cond {
        match self {
            Cond::Al | Cond::Nv => self,
            _ => Cond::from_bits(self as u32 ^ 1),
        }
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
