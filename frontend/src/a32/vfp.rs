//! VFPv2 instruction translation.

use dbt_core::{A32ExtReg, Value};

use super::decode::vfp::*;
use super::ir_emitter::A32IrEmitter;
use super::types::{cond, ext_double, ext_single, reg};
use super::visitor::ArmTranslatorVisitor;

/// FPSCR.LEN and FPSCR.STRIDE: short-vector mode when non-zero.
const FPSCR_VECTOR_MASK: u32 = 0x0037_0000;

type FpBinOp = fn(&mut A32IrEmitter, Value, Value) -> Value;

impl ArmTranslatorVisitor {
    fn vfp_regs(a: &ArgsVfpDnm) -> (A32ExtReg, A32ExtReg, A32ExtReg) {
        if a.sz != 0 {
            (
                ext_double(a.vd, a.d),
                ext_double(a.vn, a.n),
                ext_double(a.vm, a.m),
            )
        } else {
            (
                ext_single(a.vd, a.d),
                ext_single(a.vn, a.n),
                ext_single(a.vm, a.m),
            )
        }
    }

    /// `Dd = op(Dn, Dm)` (or the single-precision equivalent).
    fn gen_vfp_binary(&mut self, a: &ArgsVfpDnm, op: FpBinOp) -> bool {
        if self.ir.current_location.fpscr_mode() & FPSCR_VECTOR_MASK != 0 {
            return self.interpret_this_instruction();
        }
        if !self.condition_passed(cond(a.cond)) {
            return false;
        }
        let (d, n, m) = Self::vfp_regs(a);
        let lhs = self.ir.get_extended_register(n);
        let rhs = self.ir.get_extended_register(m);
        let result = op(&mut self.ir, lhs, rhs);
        self.ir.set_extended_register(d, result);
        true
    }
}

impl Decode for ArmTranslatorVisitor {
    fn trans_vmul(&mut self, a: &ArgsVfpDnm) -> bool {
        self.gen_vfp_binary(a, |ir, x, y| ir.fp_mul(x, y))
    }

    fn trans_vadd(&mut self, a: &ArgsVfpDnm) -> bool {
        self.gen_vfp_binary(a, |ir, x, y| ir.fp_add(x, y))
    }

    fn trans_vsub(&mut self, a: &ArgsVfpDnm) -> bool {
        self.gen_vfp_binary(a, |ir, x, y| ir.fp_sub(x, y))
    }

    fn trans_vmov_core_single(&mut self, a: &ArgsVmovSr) -> bool {
        let t = reg(a.rt);
        let n = ext_single(a.vn, a.n);
        if t.is_pc() {
            return self.unpredictable_instruction();
        }
        if !self.condition_passed(cond(a.cond)) {
            return false;
        }
        if a.op != 0 {
            let value = self.ir.get_extended_register(n);
            self.ir.set_register(t, value);
        } else {
            let value = self.ir.get_register(t);
            self.ir.set_extended_register(n, value);
        }
        true
    }
}
