use crate::types::Type;

/// IR opcodes.
///
/// Guest-state accessors are prefixed with the architecture (`A32`);
/// everything else is architecture-neutral. Each opcode has a fixed
/// arity and formal argument types recorded in [`OPCODE_DEFS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    // -- Core --
    Void = 0,
    Identity,
    Breakpoint,

    // -- A32 guest state --
    A32SetCheckBit,
    A32GetRegister,
    A32GetExtendedRegister32,
    A32GetExtendedRegister64,
    A32SetRegister,
    A32SetExtendedRegister32,
    A32SetExtendedRegister64,
    A32GetCpsr,
    A32SetCpsr,
    A32SetCpsrNZCV,
    A32GetNFlag,
    A32SetNFlag,
    A32GetZFlag,
    A32SetZFlag,
    A32GetCFlag,
    A32SetCFlag,
    A32GetVFlag,
    A32SetVFlag,
    A32BXWritePC,
    A32CallSupervisor,
    A32ExceptionRaised,

    // -- A32 guest memory --
    A32ReadMemory8,
    A32ReadMemory32,
    A32WriteMemory8,
    A32WriteMemory32,

    // -- Hints --
    PushRSB,

    // -- Pseudo-operations (read a secondary result of their argument) --
    GetCarryFromOp,
    GetOverflowFromOp,

    // -- Integer arithmetic --
    Add32,
    Sub32,
    Mul32,
    And32,
    Eor32,
    Or32,
    Not32,
    LogicalShiftLeft32,
    LogicalShiftRight32,
    ArithmeticShiftRight32,
    RotateRight32,
    RotateRightExtended,
    MostSignificantBit,
    IsZero32,
    LeastSignificantByte,
    ZeroExtendByteToWord,

    // -- Floating point --
    FPAdd32,
    FPAdd64,
    FPSub32,
    FPSub64,
    FPMul32,
    FPMul64,

    // Sentinel, must be last
    Count,
}

/// Flags describing properties of an opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpFlags(u16);

impl OpFlags {
    pub const NONE: OpFlags = OpFlags(0);
    /// Writes some part of the guest CPSR (flags, mode, GE bits).
    pub const WRITES_CPSR: OpFlags = OpFlags(0x01);
    /// Reads some part of the guest CPSR.
    pub const READS_CPSR: OpFlags = OpFlags(0x02);
    /// Has side effects; must not be removed even when unused.
    pub const SIDE_EFFECTS: OpFlags = OpFlags(0x04);
    /// Reads guest memory.
    pub const READS_MEMORY: OpFlags = OpFlags(0x08);
    /// Writes guest memory.
    pub const WRITES_MEMORY: OpFlags = OpFlags(0x10);
    /// Pseudo-operation: reads a secondary output of its argument.
    pub const PSEUDO: OpFlags = OpFlags(0x20);
    /// Reads or writes guest core/extension registers.
    pub const GUEST_REG: OpFlags = OpFlags(0x40);

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: OpFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: OpFlags) -> Self {
        Self(self.0 | other.0)
    }
}

/// Static definition of an opcode: name, result type, formal
/// argument types and flags.
#[derive(Debug, Clone, Copy)]
pub struct OpDef {
    pub name: &'static str,
    pub ret: Type,
    pub args: &'static [Type],
    pub flags: OpFlags,
}

impl OpDef {
    pub const fn nb_args(&self) -> usize {
        self.args.len()
    }
}

/// Maximum arity of any opcode.
pub const MAX_ARGS: usize = 4;

const fn f(a: OpFlags, b: OpFlags) -> OpFlags {
    OpFlags(a.0 | b.0)
}

const N: OpFlags = OpFlags::NONE;
const WC: OpFlags = OpFlags::WRITES_CPSR;
const RC: OpFlags = OpFlags::READS_CPSR;
const SE: OpFlags = OpFlags::SIDE_EFFECTS;
const RM: OpFlags = OpFlags::READS_MEMORY;
const WM: OpFlags = OpFlags::WRITES_MEMORY;
const PS: OpFlags = OpFlags::PSEUDO;
const GR: OpFlags = OpFlags::GUEST_REG;

const fn def(
    name: &'static str,
    ret: Type,
    args: &'static [Type],
    flags: OpFlags,
) -> OpDef {
    OpDef {
        name,
        ret,
        args,
        flags,
    }
}

use crate::types::Type::{
    A32ExtReg as XR, A32Reg as R, Opaque as O, Void as V, U1, U32, U64, U8,
};

/// Static opcode definition table, indexed by `Opcode as usize`.
pub static OPCODE_DEFS: [OpDef; Opcode::Count as usize] = [
    def("Void", V, &[], N),
    def("Identity", O, &[O], N),
    def("Breakpoint", V, &[], SE),
    def("A32SetCheckBit", V, &[U1], SE),
    def("A32GetRegister", U32, &[R], GR),
    def("A32GetExtendedRegister32", U32, &[XR], GR),
    def("A32GetExtendedRegister64", U64, &[XR], GR),
    def("A32SetRegister", V, &[R, U32], f(GR, SE)),
    def("A32SetExtendedRegister32", V, &[XR, U32], f(GR, SE)),
    def("A32SetExtendedRegister64", V, &[XR, U64], f(GR, SE)),
    def("A32GetCpsr", U32, &[], RC),
    def("A32SetCpsr", V, &[U32], f(WC, SE)),
    def("A32SetCpsrNZCV", V, &[U32], f(WC, SE)),
    def("A32GetNFlag", U1, &[], RC),
    def("A32SetNFlag", V, &[U1], f(WC, SE)),
    def("A32GetZFlag", U1, &[], RC),
    def("A32SetZFlag", V, &[U1], f(WC, SE)),
    def("A32GetCFlag", U1, &[], RC),
    def("A32SetCFlag", V, &[U1], f(WC, SE)),
    def("A32GetVFlag", U1, &[], RC),
    def("A32SetVFlag", V, &[U1], f(WC, SE)),
    def("A32BXWritePC", V, &[U32], SE),
    def("A32CallSupervisor", V, &[U32], SE),
    def("A32ExceptionRaised", V, &[U32, U64], SE),
    def("A32ReadMemory8", U8, &[U32], f(RM, SE)),
    def("A32ReadMemory32", U32, &[U32], f(RM, SE)),
    def("A32WriteMemory8", V, &[U32, U8], f(WM, SE)),
    def("A32WriteMemory32", V, &[U32, U32], f(WM, SE)),
    def("PushRSB", V, &[U64], SE),
    def("GetCarryFromOp", U1, &[O], PS),
    def("GetOverflowFromOp", U1, &[O], PS),
    def("Add32", U32, &[U32, U32, U1], N),
    def("Sub32", U32, &[U32, U32, U1], N),
    def("Mul32", U32, &[U32, U32], N),
    def("And32", U32, &[U32, U32], N),
    def("Eor32", U32, &[U32, U32], N),
    def("Or32", U32, &[U32, U32], N),
    def("Not32", U32, &[U32], N),
    def("LogicalShiftLeft32", U32, &[U32, U8, U1], N),
    def("LogicalShiftRight32", U32, &[U32, U8, U1], N),
    def("ArithmeticShiftRight32", U32, &[U32, U8, U1], N),
    def("RotateRight32", U32, &[U32, U8, U1], N),
    def("RotateRightExtended", U32, &[U32, U1], N),
    def("MostSignificantBit", U1, &[U32], N),
    def("IsZero32", U1, &[U32], N),
    def("LeastSignificantByte", U8, &[U32], N),
    def("ZeroExtendByteToWord", U32, &[U8], N),
    def("FPAdd32", U32, &[U32, U32], N),
    def("FPAdd64", U64, &[U64, U64], N),
    def("FPSub32", U32, &[U32, U32], N),
    def("FPSub64", U64, &[U64, U64], N),
    def("FPMul32", U32, &[U32, U32], N),
    def("FPMul64", U64, &[U64, U64], N),
];

impl Opcode {
    pub fn def(self) -> &'static OpDef {
        &OPCODE_DEFS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// Type of the value this opcode produces (`Void` if none).
    pub fn return_type(self) -> Type {
        self.def().ret
    }

    pub fn num_args(self) -> usize {
        self.def().nb_args()
    }

    /// Declared type of formal argument `index`.
    pub fn arg_type(self, index: usize) -> Type {
        self.def().args[index]
    }

    pub fn writes_to_cpsr(self) -> bool {
        self.def().flags.contains(OpFlags::WRITES_CPSR)
    }

    pub fn reads_from_cpsr(self) -> bool {
        self.def().flags.contains(OpFlags::READS_CPSR)
    }

    pub fn has_side_effects(self) -> bool {
        self.def().flags.contains(OpFlags::SIDE_EFFECTS)
    }

    pub fn is_pseudo_operation(self) -> bool {
        self.def().flags.contains(OpFlags::PSEUDO)
    }

    /// All real opcodes, in table order.
    pub fn all() -> impl Iterator<Item = Opcode> {
        ALL_OPCODES.iter().copied()
    }
}

static ALL_OPCODES: [Opcode; Opcode::Count as usize] = [
    Opcode::Void,
    Opcode::Identity,
    Opcode::Breakpoint,
    Opcode::A32SetCheckBit,
    Opcode::A32GetRegister,
    Opcode::A32GetExtendedRegister32,
    Opcode::A32GetExtendedRegister64,
    Opcode::A32SetRegister,
    Opcode::A32SetExtendedRegister32,
    Opcode::A32SetExtendedRegister64,
    Opcode::A32GetCpsr,
    Opcode::A32SetCpsr,
    Opcode::A32SetCpsrNZCV,
    Opcode::A32GetNFlag,
    Opcode::A32SetNFlag,
    Opcode::A32GetZFlag,
    Opcode::A32SetZFlag,
    Opcode::A32GetCFlag,
    Opcode::A32SetCFlag,
    Opcode::A32GetVFlag,
    Opcode::A32SetVFlag,
    Opcode::A32BXWritePC,
    Opcode::A32CallSupervisor,
    Opcode::A32ExceptionRaised,
    Opcode::A32ReadMemory8,
    Opcode::A32ReadMemory32,
    Opcode::A32WriteMemory8,
    Opcode::A32WriteMemory32,
    Opcode::PushRSB,
    Opcode::GetCarryFromOp,
    Opcode::GetOverflowFromOp,
    Opcode::Add32,
    Opcode::Sub32,
    Opcode::Mul32,
    Opcode::And32,
    Opcode::Eor32,
    Opcode::Or32,
    Opcode::Not32,
    Opcode::LogicalShiftLeft32,
    Opcode::LogicalShiftRight32,
    Opcode::ArithmeticShiftRight32,
    Opcode::RotateRight32,
    Opcode::RotateRightExtended,
    Opcode::MostSignificantBit,
    Opcode::IsZero32,
    Opcode::LeastSignificantByte,
    Opcode::ZeroExtendByteToWord,
    Opcode::FPAdd32,
    Opcode::FPAdd64,
    Opcode::FPSub32,
    Opcode::FPSub64,
    Opcode::FPMul32,
    Opcode::FPMul64,
];
