use crate::block::Block;
use crate::location::LocationDescriptor;
use crate::opcode::Opcode;
use crate::types::Type;
use crate::value::Value;

/// A result together with the carry-out of the operation that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultAndCarry {
    pub result: Value,
    pub carry: Value,
}

/// Architecture-neutral IR construction on top of a [`Block`].
///
/// Every `gen`-style method appends exactly one instruction (plus the
/// pseudo-operations noted on the method) and returns its result.
#[derive(Debug)]
pub struct IrEmitter {
    pub block: Block,
}

impl IrEmitter {
    pub fn new(location: LocationDescriptor) -> Self {
        Self {
            block: Block::new(location),
        }
    }

    pub fn with_block(block: Block) -> Self {
        Self { block }
    }

    pub fn into_block(self) -> Block {
        self.block
    }

    // -- Internal helpers --

    fn inst(&mut self, opc: Opcode, args: &[Value]) -> Value {
        self.block.append_new_inst(opc, args)
    }

    fn unary(&mut self, opc: Opcode, a: Value) -> Value {
        self.inst(opc, &[a])
    }

    fn binary(&mut self, opc: Opcode, a: Value, b: Value) -> Value {
        self.inst(opc, &[a, b])
    }

    fn shift(
        &mut self,
        opc: Opcode,
        value: Value,
        amount: Value,
        carry_in: Value,
    ) -> ResultAndCarry {
        let result = self.inst(opc, &[value, amount, carry_in]);
        let carry = self.get_carry_from_op(result);
        ResultAndCarry { result, carry }
    }

    // -- Immediates --

    pub fn imm1(&self, v: bool) -> Value {
        Value::U1(v)
    }

    pub fn imm8(&self, v: u8) -> Value {
        Value::U8(v)
    }

    pub fn imm32(&self, v: u32) -> Value {
        Value::U32(v)
    }

    pub fn imm64(&self, v: u64) -> Value {
        Value::U64(v)
    }

    // -- Core --

    pub fn identity(&mut self, a: Value) -> Value {
        self.unary(Opcode::Identity, a)
    }

    /// Return-stack-buffer hint: the block at `return_location` is
    /// likely to run when the callee returns.
    pub fn push_rsb(&mut self, return_location: LocationDescriptor) {
        let key = self.imm64(return_location.unique_hash());
        self.unary(Opcode::PushRSB, key);
    }

    // -- Pseudo-operations --

    pub fn get_carry_from_op(&mut self, op: Value) -> Value {
        self.unary(Opcode::GetCarryFromOp, op)
    }

    pub fn get_overflow_from_op(&mut self, op: Value) -> Value {
        self.unary(Opcode::GetOverflowFromOp, op)
    }

    // -- Integer arithmetic --

    pub fn add_with_carry(&mut self, a: Value, b: Value, carry_in: Value) -> Value {
        self.inst(Opcode::Add32, &[a, b, carry_in])
    }

    pub fn add(&mut self, a: Value, b: Value) -> Value {
        let c = self.imm1(false);
        self.add_with_carry(a, b, c)
    }

    pub fn sub_with_carry(&mut self, a: Value, b: Value, carry_in: Value) -> Value {
        self.inst(Opcode::Sub32, &[a, b, carry_in])
    }

    pub fn sub(&mut self, a: Value, b: Value) -> Value {
        let c = self.imm1(true);
        self.sub_with_carry(a, b, c)
    }

    pub fn mul(&mut self, a: Value, b: Value) -> Value {
        self.binary(Opcode::Mul32, a, b)
    }

    pub fn and(&mut self, a: Value, b: Value) -> Value {
        self.binary(Opcode::And32, a, b)
    }

    pub fn eor(&mut self, a: Value, b: Value) -> Value {
        self.binary(Opcode::Eor32, a, b)
    }

    pub fn or(&mut self, a: Value, b: Value) -> Value {
        self.binary(Opcode::Or32, a, b)
    }

    pub fn not(&mut self, a: Value) -> Value {
        self.unary(Opcode::Not32, a)
    }

    // -- Shifts and rotates --

    pub fn logical_shift_left(
        &mut self,
        value: Value,
        amount: Value,
        carry_in: Value,
    ) -> ResultAndCarry {
        self.shift(Opcode::LogicalShiftLeft32, value, amount, carry_in)
    }

    pub fn logical_shift_right(
        &mut self,
        value: Value,
        amount: Value,
        carry_in: Value,
    ) -> ResultAndCarry {
        self.shift(Opcode::LogicalShiftRight32, value, amount, carry_in)
    }

    pub fn arithmetic_shift_right(
        &mut self,
        value: Value,
        amount: Value,
        carry_in: Value,
    ) -> ResultAndCarry {
        self.shift(Opcode::ArithmeticShiftRight32, value, amount, carry_in)
    }

    pub fn rotate_right(
        &mut self,
        value: Value,
        amount: Value,
        carry_in: Value,
    ) -> ResultAndCarry {
        self.shift(Opcode::RotateRight32, value, amount, carry_in)
    }

    pub fn rotate_right_extended(
        &mut self,
        value: Value,
        carry_in: Value,
    ) -> ResultAndCarry {
        let result = self.binary(Opcode::RotateRightExtended, value, carry_in);
        let carry = self.get_carry_from_op(result);
        ResultAndCarry { result, carry }
    }

    // -- Bit queries and extensions --

    pub fn most_significant_bit(&mut self, a: Value) -> Value {
        self.unary(Opcode::MostSignificantBit, a)
    }

    pub fn is_zero(&mut self, a: Value) -> Value {
        self.unary(Opcode::IsZero32, a)
    }

    pub fn least_significant_byte(&mut self, a: Value) -> Value {
        self.unary(Opcode::LeastSignificantByte, a)
    }

    pub fn zero_extend_byte_to_word(&mut self, a: Value) -> Value {
        self.unary(Opcode::ZeroExtendByteToWord, a)
    }

    // -- Floating point (raw bit patterns) --

    fn fp_binary(
        &mut self,
        op32: Opcode,
        op64: Opcode,
        a: Value,
        b: Value,
    ) -> Value {
        let opc = if a.get_type() == Type::U64 { op64 } else { op32 };
        self.binary(opc, a, b)
    }

    pub fn fp_add(&mut self, a: Value, b: Value) -> Value {
        self.fp_binary(Opcode::FPAdd32, Opcode::FPAdd64, a, b)
    }

    pub fn fp_sub(&mut self, a: Value, b: Value) -> Value {
        self.fp_binary(Opcode::FPSub32, Opcode::FPSub64, a, b)
    }

    pub fn fp_mul(&mut self, a: Value, b: Value) -> Value {
        self.fp_binary(Opcode::FPMul32, Opcode::FPMul64, a, b)
    }
}
