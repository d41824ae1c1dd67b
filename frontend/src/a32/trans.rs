//! ARM instruction translation.
//!
//! Data-processing encodings funnel into `gen_data_processing`,
//! parameterised by a `DpOp` and the shifter-operand form; every other
//! handler is written out directly.

use dbt_core::{A32Reg, Cond, LocationDescriptor, ResultAndCarry, Terminal, Value};

use super::decode::arm::*;
use super::types::{
    arm_expand_imm, arm_expand_imm_carry, cond, reg, Exception, ShiftType,
};
use super::visitor::ArmTranslatorVisitor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DpOp {
    And,
    Eor,
    Sub,
    Rsb,
    Add,
    Adc,
    Sbc,
    Rsc,
    Tst,
    Teq,
    Cmp,
    Cmn,
    Orr,
    Mov,
    Bic,
    Mvn,
}

impl DpOp {
    /// Logical ops take C from the shifter; arithmetic ops compute C, V.
    fn is_logical(self) -> bool {
        use DpOp::*;
        matches!(self, And | Eor | Tst | Teq | Orr | Mov | Bic | Mvn)
    }

    /// Compare ops only set flags.
    fn is_compare(self) -> bool {
        matches!(self, DpOp::Tst | DpOp::Teq | DpOp::Cmp | DpOp::Cmn)
    }

    fn reads_rn(self) -> bool {
        !matches!(self, DpOp::Mov | DpOp::Mvn)
    }

    fn uses_carry_in(self) -> bool {
        matches!(self, DpOp::Adc | DpOp::Sbc | DpOp::Rsc)
    }
}

/// The second operand of a data-processing instruction.
#[derive(Debug, Clone, Copy)]
enum Shifter {
    Imm { rot: i64, imm8: i64 },
    ImmShift { rm: A32Reg, imm5: u8, stype: ShiftType },
    RegShift { rm: A32Reg, rs: A32Reg, stype: ShiftType },
}

impl Shifter {
    fn imm_shift(rm: i64, imm5: i64, stype: i64) -> Self {
        Shifter::ImmShift {
            rm: reg(rm),
            imm5: (imm5 & 0x1f) as u8,
            stype: ShiftType::from_bits(stype as u32),
        }
    }

    fn reg_shift(rm: i64, rs: i64, stype: i64) -> Self {
        Shifter::RegShift {
            rm: reg(rm),
            rs: reg(rs),
            stype: ShiftType::from_bits(stype as u32),
        }
    }

    fn imm(rot: i64, imm8: i64) -> Self {
        Shifter::Imm { rot, imm8 }
    }
}

/// Load/store access kinds with immediate offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LdSt {
    Ldr,
    Ldrb,
    Str,
    Strb,
}

// ── Helpers ────────────────────────────────────────────────────

impl ArmTranslatorVisitor {
    /// Read the C flag once per instruction.
    fn carry_flag(&mut self, cache: &mut Option<Value>) -> Value {
        if let Some(c) = *cache {
            return c;
        }
        let c = self.ir.get_c_flag();
        *cache = Some(c);
        c
    }

    fn gen_shifter(
        &mut self,
        shifter: Shifter,
        need_carry: bool,
        c_flag: &mut Option<Value>,
    ) -> ResultAndCarry {
        match shifter {
            Shifter::Imm { rot, imm8 } => {
                let result = self.ir.imm32(arm_expand_imm(rot, imm8));
                let carry = match arm_expand_imm_carry(rot, imm8) {
                    Some(c) => self.ir.imm1(c),
                    None if need_carry => self.carry_flag(c_flag),
                    None => self.ir.imm1(false),
                };
                ResultAndCarry { result, carry }
            }
            Shifter::ImmShift { rm, imm5, stype } => {
                let carry_in = self.carry_flag(c_flag);
                let value = self.ir.get_register(rm);
                self.emit_imm_shift(value, stype, imm5, carry_in)
            }
            Shifter::RegShift { rm, rs, stype } => {
                let carry_in = self.carry_flag(c_flag);
                let shift_reg = self.ir.get_register(rs);
                let amount = self.ir.least_significant_byte(shift_reg);
                let value = self.ir.get_register(rm);
                self.emit_reg_shift(value, stype, amount, carry_in)
            }
        }
    }

    fn gen_data_processing(
        &mut self,
        op: DpOp,
        cond: Cond,
        s: bool,
        n: A32Reg,
        d: A32Reg,
        shifter: Shifter,
    ) -> bool {
        if let Shifter::RegShift { rm, rs, .. } = shifter {
            if d.is_pc() || n.is_pc() || rm.is_pc() || rs.is_pc() {
                return self.unpredictable_instruction();
            }
        }

        if !self.condition_passed(cond) {
            return false;
        }

        let s = s || op.is_compare();
        let mut c_flag = None;
        let shifted = self.gen_shifter(shifter, s && op.is_logical(), &mut c_flag);
        let operand = shifted.result;
        let rn = if op.reads_rn() {
            self.ir.get_register(n)
        } else {
            Value::Empty
        };
        let carry_in = if op.uses_carry_in() {
            self.carry_flag(&mut c_flag)
        } else {
            Value::Empty
        };

        let result = match op {
            DpOp::And | DpOp::Tst => self.ir.and(rn, operand),
            DpOp::Eor | DpOp::Teq => self.ir.eor(rn, operand),
            DpOp::Orr => self.ir.or(rn, operand),
            DpOp::Bic => {
                let inverted = self.ir.not(operand);
                self.ir.and(rn, inverted)
            }
            DpOp::Mov => operand,
            DpOp::Mvn => self.ir.not(operand),
            DpOp::Add | DpOp::Cmn => self.ir.add(rn, operand),
            DpOp::Adc => self.ir.add_with_carry(rn, operand, carry_in),
            DpOp::Sub | DpOp::Cmp => self.ir.sub(rn, operand),
            DpOp::Sbc => self.ir.sub_with_carry(rn, operand, carry_in),
            DpOp::Rsb => self.ir.sub(operand, rn),
            DpOp::Rsc => self.ir.sub_with_carry(operand, rn, carry_in),
        };

        let arith_flags = if s && !op.is_logical() {
            let carry = self.ir.get_carry_from_op(result);
            let overflow = self.ir.get_overflow_from_op(result);
            Some((carry, overflow))
        } else {
            None
        };

        if !op.is_compare() {
            if d.is_pc() {
                if s {
                    // Exception return; not available in user mode.
                    return self.unpredictable_instruction();
                }
                self.ir.alu_write_pc(result);
                self.ir.set_term(Terminal::ReturnToDispatch);
                return false;
            }
            self.ir.set_register(d, result);
        }

        if s {
            self.ir.set_nz(result);
            match arith_flags {
                Some((carry, overflow)) => {
                    self.ir.set_c_flag(carry);
                    self.ir.set_v_flag(overflow);
                }
                None => self.ir.set_c_flag(shifted.carry),
            }
        }
        true
    }

    // -- Data-processing argument adapters --

    fn dp_rrr(&mut self, op: DpOp, a: &ArgsSRrrShi) -> bool {
        let shifter = Shifter::imm_shift(a.rm, a.imm5, a.stype);
        self.gen_data_processing(op, cond(a.cond), a.s != 0, reg(a.rn), reg(a.rd), shifter)
    }

    fn dp_cmp_rrr(&mut self, op: DpOp, a: &ArgsRrShi) -> bool {
        let shifter = Shifter::imm_shift(a.rm, a.imm5, a.stype);
        self.gen_data_processing(op, cond(a.cond), true, reg(a.rn), A32Reg::new(0), shifter)
    }

    fn dp_mov_rrr(&mut self, op: DpOp, a: &ArgsSRdShi) -> bool {
        let shifter = Shifter::imm_shift(a.rm, a.imm5, a.stype);
        self.gen_data_processing(op, cond(a.cond), a.s != 0, A32Reg::new(0), reg(a.rd), shifter)
    }

    fn dp_rrrr(&mut self, op: DpOp, a: &ArgsSRrrShr) -> bool {
        let shifter = Shifter::reg_shift(a.rm, a.rs, a.stype);
        self.gen_data_processing(op, cond(a.cond), a.s != 0, reg(a.rn), reg(a.rd), shifter)
    }

    fn dp_cmp_rrrr(&mut self, op: DpOp, a: &ArgsRrShr) -> bool {
        let shifter = Shifter::reg_shift(a.rm, a.rs, a.stype);
        self.gen_data_processing(op, cond(a.cond), true, reg(a.rn), A32Reg::new(0), shifter)
    }

    fn dp_mov_rrrr(&mut self, op: DpOp, a: &ArgsSRdShr) -> bool {
        let shifter = Shifter::reg_shift(a.rm, a.rs, a.stype);
        self.gen_data_processing(op, cond(a.cond), a.s != 0, A32Reg::new(0), reg(a.rd), shifter)
    }

    fn dp_rri(&mut self, op: DpOp, a: &ArgsSRriRot) -> bool {
        let shifter = Shifter::imm(a.rot, a.imm8);
        self.gen_data_processing(op, cond(a.cond), a.s != 0, reg(a.rn), reg(a.rd), shifter)
    }

    fn dp_cmp_rri(&mut self, op: DpOp, a: &ArgsRiRot) -> bool {
        let shifter = Shifter::imm(a.rot, a.imm8);
        self.gen_data_processing(op, cond(a.cond), true, reg(a.rn), A32Reg::new(0), shifter)
    }

    fn dp_mov_rri(&mut self, op: DpOp, a: &ArgsSRdRot) -> bool {
        let shifter = Shifter::imm(a.rot, a.imm8);
        self.gen_data_processing(op, cond(a.cond), a.s != 0, A32Reg::new(0), reg(a.rd), shifter)
    }

    // -- Load/store --

    fn gen_load_store(&mut self, kind: LdSt, a: &ArgsLdstImm) -> bool {
        let n = reg(a.rn);
        let t = reg(a.rt);
        let (p, u, w) = (a.p != 0, a.u != 0, a.w != 0);

        if !p && w {
            // LDRT/STRT and friends.
            return self.interpret_this_instruction();
        }
        let wback = !p || w;
        if wback && n.is_pc() {
            return self.unpredictable_instruction();
        }
        let byte = matches!(kind, LdSt::Ldrb | LdSt::Strb);
        let unpredictable = (wback && n == t) || (byte && t.is_pc());
        if (unpredictable && !self.unpredictable_allowed()) || (byte && t.is_pc()) {
            return self.unpredictable_instruction();
        }

        if !self.condition_passed(cond(a.cond)) {
            return false;
        }

        let imm = self.ir.imm32((a.imm12 & 0xfff) as u32);
        let base = self.ir.get_register(n);
        let offset_addr = if u {
            self.ir.add(base, imm)
        } else {
            self.ir.sub(base, imm)
        };
        let address = if p { offset_addr } else { base };

        match kind {
            LdSt::Ldr | LdSt::Ldrb => {
                let data = if kind == LdSt::Ldr {
                    self.ir.read_memory_32(address)
                } else {
                    let loaded = self.ir.read_memory_8(address);
                    self.ir.zero_extend_byte_to_word(loaded)
                };
                if wback {
                    self.ir.set_register(n, offset_addr);
                }
                if t.is_pc() {
                    self.ir.load_write_pc(data);
                    self.ir.set_term(Terminal::ReturnToDispatch);
                    return false;
                }
                self.ir.set_register(t, data);
            }
            LdSt::Str | LdSt::Strb => {
                let value = self.ir.get_register(t);
                if kind == LdSt::Str {
                    self.ir.write_memory_32(address, value);
                } else {
                    let low = self.ir.least_significant_byte(value);
                    self.ir.write_memory_8(address, low);
                }
                if wback {
                    self.ir.set_register(n, offset_addr);
                }
            }
        }
        true
    }

    // -- Hints --

    fn gen_hint(&mut self, a: &ArgsCond, exception: Exception) -> bool {
        if !self.options.hook_hint_instructions {
            return self.gen_nop(a);
        }
        if !self.condition_passed(cond(a.cond)) {
            return false;
        }
        self.raise_exception(exception)
    }

    /// Hints that translate to nothing still reject the NV space.
    fn gen_nop(&mut self, a: &ArgsCond) -> bool {
        if cond(a.cond) == Cond::Nv {
            return self.unpredictable_instruction();
        }
        true
    }

    fn branch_target(&self, imm: i64) -> LocationDescriptor {
        let target = self.ir.pc_read().wrapping_add(imm as u32);
        self.ir.current_location.set_pc(target)
    }
}

// ── Decode trait implementation ────────────────────────────────

impl Decode for ArmTranslatorVisitor {
    // -- Data processing (register) --

    fn trans_and_rrr(&mut self, a: &ArgsSRrrShi) -> bool {
        self.dp_rrr(DpOp::And, a)
    }
    fn trans_eor_rrr(&mut self, a: &ArgsSRrrShi) -> bool {
        self.dp_rrr(DpOp::Eor, a)
    }
    fn trans_sub_rrr(&mut self, a: &ArgsSRrrShi) -> bool {
        self.dp_rrr(DpOp::Sub, a)
    }
    fn trans_rsb_rrr(&mut self, a: &ArgsSRrrShi) -> bool {
        self.dp_rrr(DpOp::Rsb, a)
    }
    fn trans_add_rrr(&mut self, a: &ArgsSRrrShi) -> bool {
        self.dp_rrr(DpOp::Add, a)
    }
    fn trans_adc_rrr(&mut self, a: &ArgsSRrrShi) -> bool {
        self.dp_rrr(DpOp::Adc, a)
    }
    fn trans_sbc_rrr(&mut self, a: &ArgsSRrrShi) -> bool {
        self.dp_rrr(DpOp::Sbc, a)
    }
    fn trans_rsc_rrr(&mut self, a: &ArgsSRrrShi) -> bool {
        self.dp_rrr(DpOp::Rsc, a)
    }
    fn trans_tst_rrr(&mut self, a: &ArgsRrShi) -> bool {
        self.dp_cmp_rrr(DpOp::Tst, a)
    }
    fn trans_teq_rrr(&mut self, a: &ArgsRrShi) -> bool {
        self.dp_cmp_rrr(DpOp::Teq, a)
    }
    fn trans_cmp_rrr(&mut self, a: &ArgsRrShi) -> bool {
        self.dp_cmp_rrr(DpOp::Cmp, a)
    }
    fn trans_cmn_rrr(&mut self, a: &ArgsRrShi) -> bool {
        self.dp_cmp_rrr(DpOp::Cmn, a)
    }
    fn trans_orr_rrr(&mut self, a: &ArgsSRrrShi) -> bool {
        self.dp_rrr(DpOp::Orr, a)
    }
    fn trans_mov_rrr(&mut self, a: &ArgsSRdShi) -> bool {
        self.dp_mov_rrr(DpOp::Mov, a)
    }
    fn trans_bic_rrr(&mut self, a: &ArgsSRrrShi) -> bool {
        self.dp_rrr(DpOp::Bic, a)
    }
    fn trans_mvn_rrr(&mut self, a: &ArgsSRdShi) -> bool {
        self.dp_mov_rrr(DpOp::Mvn, a)
    }

    // -- Data processing (register-shifted register) --

    fn trans_and_rrrr(&mut self, a: &ArgsSRrrShr) -> bool {
        self.dp_rrrr(DpOp::And, a)
    }
    fn trans_eor_rrrr(&mut self, a: &ArgsSRrrShr) -> bool {
        self.dp_rrrr(DpOp::Eor, a)
    }
    fn trans_sub_rrrr(&mut self, a: &ArgsSRrrShr) -> bool {
        self.dp_rrrr(DpOp::Sub, a)
    }
    fn trans_rsb_rrrr(&mut self, a: &ArgsSRrrShr) -> bool {
        self.dp_rrrr(DpOp::Rsb, a)
    }
    fn trans_add_rrrr(&mut self, a: &ArgsSRrrShr) -> bool {
        self.dp_rrrr(DpOp::Add, a)
    }
    fn trans_adc_rrrr(&mut self, a: &ArgsSRrrShr) -> bool {
        self.dp_rrrr(DpOp::Adc, a)
    }
    fn trans_sbc_rrrr(&mut self, a: &ArgsSRrrShr) -> bool {
        self.dp_rrrr(DpOp::Sbc, a)
    }
    fn trans_rsc_rrrr(&mut self, a: &ArgsSRrrShr) -> bool {
        self.dp_rrrr(DpOp::Rsc, a)
    }
    fn trans_tst_rrrr(&mut self, a: &ArgsRrShr) -> bool {
        self.dp_cmp_rrrr(DpOp::Tst, a)
    }
    fn trans_teq_rrrr(&mut self, a: &ArgsRrShr) -> bool {
        self.dp_cmp_rrrr(DpOp::Teq, a)
    }
    fn trans_cmp_rrrr(&mut self, a: &ArgsRrShr) -> bool {
        self.dp_cmp_rrrr(DpOp::Cmp, a)
    }
    fn trans_cmn_rrrr(&mut self, a: &ArgsRrShr) -> bool {
        self.dp_cmp_rrrr(DpOp::Cmn, a)
    }
    fn trans_orr_rrrr(&mut self, a: &ArgsSRrrShr) -> bool {
        self.dp_rrrr(DpOp::Orr, a)
    }
    fn trans_mov_rrrr(&mut self, a: &ArgsSRdShr) -> bool {
        self.dp_mov_rrrr(DpOp::Mov, a)
    }
    fn trans_bic_rrrr(&mut self, a: &ArgsSRrrShr) -> bool {
        self.dp_rrrr(DpOp::Bic, a)
    }
    fn trans_mvn_rrrr(&mut self, a: &ArgsSRdShr) -> bool {
        self.dp_mov_rrrr(DpOp::Mvn, a)
    }

    // -- Data processing (immediate) --

    fn trans_and_rri(&mut self, a: &ArgsSRriRot) -> bool {
        self.dp_rri(DpOp::And, a)
    }
    fn trans_eor_rri(&mut self, a: &ArgsSRriRot) -> bool {
        self.dp_rri(DpOp::Eor, a)
    }
    fn trans_sub_rri(&mut self, a: &ArgsSRriRot) -> bool {
        self.dp_rri(DpOp::Sub, a)
    }
    fn trans_rsb_rri(&mut self, a: &ArgsSRriRot) -> bool {
        self.dp_rri(DpOp::Rsb, a)
    }
    fn trans_add_rri(&mut self, a: &ArgsSRriRot) -> bool {
        self.dp_rri(DpOp::Add, a)
    }
    fn trans_adc_rri(&mut self, a: &ArgsSRriRot) -> bool {
        self.dp_rri(DpOp::Adc, a)
    }
    fn trans_sbc_rri(&mut self, a: &ArgsSRriRot) -> bool {
        self.dp_rri(DpOp::Sbc, a)
    }
    fn trans_rsc_rri(&mut self, a: &ArgsSRriRot) -> bool {
        self.dp_rri(DpOp::Rsc, a)
    }
    fn trans_tst_rri(&mut self, a: &ArgsRiRot) -> bool {
        self.dp_cmp_rri(DpOp::Tst, a)
    }
    fn trans_teq_rri(&mut self, a: &ArgsRiRot) -> bool {
        self.dp_cmp_rri(DpOp::Teq, a)
    }
    fn trans_cmp_rri(&mut self, a: &ArgsRiRot) -> bool {
        self.dp_cmp_rri(DpOp::Cmp, a)
    }
    fn trans_cmn_rri(&mut self, a: &ArgsRiRot) -> bool {
        self.dp_cmp_rri(DpOp::Cmn, a)
    }
    fn trans_orr_rri(&mut self, a: &ArgsSRriRot) -> bool {
        self.dp_rri(DpOp::Orr, a)
    }
    fn trans_mov_rri(&mut self, a: &ArgsSRdRot) -> bool {
        self.dp_mov_rri(DpOp::Mov, a)
    }
    fn trans_bic_rri(&mut self, a: &ArgsSRriRot) -> bool {
        self.dp_rri(DpOp::Bic, a)
    }
    fn trans_mvn_rri(&mut self, a: &ArgsSRdRot) -> bool {
        self.dp_mov_rri(DpOp::Mvn, a)
    }

    // -- Multiply --

    fn trans_mul(&mut self, a: &ArgsMul) -> bool {
        let (d, n, m) = (reg(a.rd), reg(a.rn), reg(a.rm));
        let pc_operand = n.is_pc() || m.is_pc();
        if d.is_pc() || (pc_operand && !self.unpredictable_allowed()) {
            return self.unpredictable_instruction();
        }
        if !self.condition_passed(cond(a.cond)) {
            return false;
        }
        let rn = self.ir.get_register(n);
        let rm = self.ir.get_register(m);
        let result = self.ir.mul(rn, rm);
        self.ir.set_register(d, result);
        if a.s != 0 {
            self.ir.set_nz(result);
        }
        true
    }

    fn trans_mla(&mut self, a: &ArgsMla) -> bool {
        let (d, n, m, ra) = (reg(a.rd), reg(a.rn), reg(a.rm), reg(a.ra));
        let pc_operand = n.is_pc() || m.is_pc() || ra.is_pc();
        if d.is_pc() || (pc_operand && !self.unpredictable_allowed()) {
            return self.unpredictable_instruction();
        }
        if !self.condition_passed(cond(a.cond)) {
            return false;
        }
        let rn = self.ir.get_register(n);
        let rm = self.ir.get_register(m);
        let acc = self.ir.get_register(ra);
        let product = self.ir.mul(rn, rm);
        let result = self.ir.add(product, acc);
        self.ir.set_register(d, result);
        if a.s != 0 {
            self.ir.set_nz(result);
        }
        true
    }

    // -- Branches --

    fn trans_b(&mut self, a: &ArgsBranch) -> bool {
        if !self.condition_passed(cond(a.cond)) {
            return false;
        }
        let target = self.branch_target(a.imm);
        self.ir.set_term(Terminal::link_block(target));
        false
    }

    fn trans_bl(&mut self, a: &ArgsBranch) -> bool {
        if !self.condition_passed(cond(a.cond)) {
            return false;
        }
        let ret = self.next_location();
        self.ir.push_rsb(ret);
        let lr = self.ir.imm32(ret.pc());
        self.ir.set_register(A32Reg::LR, lr);
        let target = self.branch_target(a.imm);
        self.ir.set_term(Terminal::link_block(target));
        false
    }

    fn trans_bx(&mut self, a: &ArgsBx) -> bool {
        if !self.condition_passed(cond(a.cond)) {
            return false;
        }
        let m = reg(a.rm);
        let target = self.ir.get_register(m);
        self.ir.bx_write_pc(target);
        if m == A32Reg::LR {
            self.ir.set_term(Terminal::PopRSBHint);
        } else {
            self.ir.set_term(Terminal::ReturnToDispatch);
        }
        false
    }

    fn trans_blx_reg(&mut self, a: &ArgsBx) -> bool {
        let m = reg(a.rm);
        if m.is_pc() {
            return self.unpredictable_instruction();
        }
        if !self.condition_passed(cond(a.cond)) {
            return false;
        }
        let ret = self.next_location();
        self.ir.push_rsb(ret);
        let target = self.ir.get_register(m);
        let lr = self.ir.imm32(ret.pc());
        self.ir.set_register(A32Reg::LR, lr);
        self.ir.bx_write_pc(target);
        self.ir.set_term(Terminal::ReturnToDispatch);
        false
    }

    // -- Load/store --

    fn trans_str_imm(&mut self, a: &ArgsLdstImm) -> bool {
        self.gen_load_store(LdSt::Str, a)
    }
    fn trans_ldr_imm(&mut self, a: &ArgsLdstImm) -> bool {
        self.gen_load_store(LdSt::Ldr, a)
    }
    fn trans_strb_imm(&mut self, a: &ArgsLdstImm) -> bool {
        self.gen_load_store(LdSt::Strb, a)
    }
    fn trans_ldrb_imm(&mut self, a: &ArgsLdstImm) -> bool {
        self.gen_load_store(LdSt::Ldrb, a)
    }

    // -- Exception generation --

    fn trans_svc(&mut self, a: &ArgsSvc) -> bool {
        if !self.condition_passed(cond(a.cond)) {
            return false;
        }
        let ret = self.next_location();
        self.ir.push_rsb(ret);
        let next_pc = self.ir.imm32(ret.pc());
        self.ir.branch_write_pc(next_pc);
        self.ir.call_supervisor((a.imm & 0xff_ffff) as u32);
        self.ir.set_term(Terminal::check_halt(Terminal::PopRSBHint));
        false
    }

    fn trans_udf(&mut self, _a: &ArgsUdf) -> bool {
        self.undefined_instruction()
    }

    fn trans_bkpt(&mut self, a: &ArgsBkpt) -> bool {
        let c = cond(a.cond);
        if c != Cond::Al && !self.unpredictable_allowed() {
            return self.unpredictable_instruction();
        }
        if !self.condition_passed(c) {
            return false;
        }
        self.raise_exception(Exception::Breakpoint)
    }

    // -- Hints --

    fn trans_nop(&mut self, a: &ArgsCond) -> bool {
        self.gen_nop(a)
    }
    fn trans_yield(&mut self, a: &ArgsCond) -> bool {
        self.gen_hint(a, Exception::Yield)
    }
    fn trans_wfe(&mut self, a: &ArgsCond) -> bool {
        self.gen_hint(a, Exception::WaitForEvent)
    }
    fn trans_wfi(&mut self, a: &ArgsCond) -> bool {
        self.gen_hint(a, Exception::WaitForInterrupt)
    }
    fn trans_sev(&mut self, a: &ArgsCond) -> bool {
        self.gen_hint(a, Exception::SendEvent)
    }
}
