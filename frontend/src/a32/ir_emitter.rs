use std::ops::{Deref, DerefMut};

use dbt_core::{
    A32ExtReg, A32Reg, Block, IrEmitter, LocationDescriptor, Opcode,
    Terminal, Value,
};

use super::types::Exception;

/// IR construction with A32 guest-state accessors.
///
/// `current_location` is the location of the instruction being
/// translated; reads of PC observe it plus 8 as the architecture
/// requires in ARM state.
#[derive(Debug)]
pub struct A32IrEmitter {
    base: IrEmitter,
    pub current_location: LocationDescriptor,
}

impl Deref for A32IrEmitter {
    type Target = IrEmitter;

    fn deref(&self) -> &IrEmitter {
        &self.base
    }
}

impl DerefMut for A32IrEmitter {
    fn deref_mut(&mut self) -> &mut IrEmitter {
        &mut self.base
    }
}

impl A32IrEmitter {
    pub fn new(block: Block, current_location: LocationDescriptor) -> Self {
        Self {
            base: IrEmitter::with_block(block),
            current_location,
        }
    }

    pub fn into_block(self) -> Block {
        self.base.into_block()
    }

    fn emit(&mut self, opc: Opcode, args: &[Value]) -> Value {
        self.base.block.append_new_inst(opc, args)
    }

    /// Address of the current instruction.
    pub fn pc(&self) -> u32 {
        self.current_location.pc()
    }

    /// PC as read by the current instruction.
    pub fn pc_read(&self) -> u32 {
        self.pc().wrapping_add(8)
    }

    pub fn set_term(&mut self, term: Terminal) {
        self.base.block.set_terminal(term);
    }

    // -- Core registers --

    pub fn get_register(&mut self, reg: A32Reg) -> Value {
        if reg.is_pc() {
            return Value::U32(self.pc_read());
        }
        self.emit(Opcode::A32GetRegister, &[Value::A32Reg(reg)])
    }

    /// Write a core register other than PC; PC writes go through one
    /// of the `*_write_pc` methods.
    pub fn set_register(&mut self, reg: A32Reg, value: Value) {
        assert!(!reg.is_pc(), "PC must be written through a *_write_pc call");
        self.emit(Opcode::A32SetRegister, &[Value::A32Reg(reg), value]);
    }

    // -- Extension registers --

    pub fn get_extended_register(&mut self, reg: A32ExtReg) -> Value {
        let opc = if reg.is_double() {
            Opcode::A32GetExtendedRegister64
        } else {
            Opcode::A32GetExtendedRegister32
        };
        self.emit(opc, &[Value::A32ExtReg(reg)])
    }

    pub fn set_extended_register(&mut self, reg: A32ExtReg, value: Value) {
        let opc = if reg.is_double() {
            Opcode::A32SetExtendedRegister64
        } else {
            Opcode::A32SetExtendedRegister32
        };
        self.emit(opc, &[Value::A32ExtReg(reg), value]);
    }

    // -- PC writes --

    /// Branch without interworking: the target is word-aligned.
    pub fn branch_write_pc(&mut self, value: Value) {
        let mask = self.imm32(0xffff_fffc);
        let new_pc = self.and(value, mask);
        self.emit(Opcode::A32SetRegister, &[Value::A32Reg(A32Reg::PC), new_pc]);
    }

    /// Branch with interworking: bit 0 selects the Thumb state.
    pub fn bx_write_pc(&mut self, value: Value) {
        self.emit(Opcode::A32BXWritePC, &[value]);
    }

    /// PC written by a data-processing result (ARMv7: interworking).
    pub fn alu_write_pc(&mut self, value: Value) {
        self.bx_write_pc(value);
    }

    /// PC written by a load (ARMv5 and later: interworking).
    pub fn load_write_pc(&mut self, value: Value) {
        self.bx_write_pc(value);
    }

    // -- Exceptions --

    pub fn call_supervisor(&mut self, imm: u32) {
        let imm = self.imm32(imm);
        self.emit(Opcode::A32CallSupervisor, &[imm]);
    }

    pub fn exception_raised(&mut self, exception: Exception) {
        let pc = self.imm32(self.pc());
        let code = self.imm64(exception.code());
        self.emit(Opcode::A32ExceptionRaised, &[pc, code]);
    }

    // -- Flags --

    pub fn set_n_flag(&mut self, value: Value) {
        self.emit(Opcode::A32SetNFlag, &[value]);
    }

    pub fn set_z_flag(&mut self, value: Value) {
        self.emit(Opcode::A32SetZFlag, &[value]);
    }

    pub fn get_c_flag(&mut self) -> Value {
        self.emit(Opcode::A32GetCFlag, &[])
    }

    pub fn set_c_flag(&mut self, value: Value) {
        self.emit(Opcode::A32SetCFlag, &[value]);
    }

    pub fn set_v_flag(&mut self, value: Value) {
        self.emit(Opcode::A32SetVFlag, &[value]);
    }

    /// Set N and Z from a 32-bit result.
    pub fn set_nz(&mut self, result: Value) {
        let n = self.most_significant_bit(result);
        self.set_n_flag(n);
        let z = self.is_zero(result);
        self.set_z_flag(z);
    }

    // -- Memory --

    pub fn read_memory_8(&mut self, vaddr: Value) -> Value {
        self.emit(Opcode::A32ReadMemory8, &[vaddr])
    }

    pub fn read_memory_32(&mut self, vaddr: Value) -> Value {
        self.emit(Opcode::A32ReadMemory32, &[vaddr])
    }

    pub fn write_memory_8(&mut self, vaddr: Value, value: Value) {
        self.emit(Opcode::A32WriteMemory8, &[vaddr, value]);
    }

    pub fn write_memory_32(&mut self, vaddr: Value, value: Value) {
        self.emit(Opcode::A32WriteMemory32, &[vaddr, value]);
    }
}
