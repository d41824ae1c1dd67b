//! Per-instruction IR shape.

use dbt_core::{A32Reg, Cond, Terminal, Value};
use dbt_frontend::a32::Exception;
use dbt_frontend::TranslationOptions;

use super::*;

use dbt_core::Opcode::*;

fn r(n: u32) -> Value {
    Value::A32Reg(A32Reg::new(n))
}

// ── Data processing ──────────────────────────────────────────

#[test]
fn mov_immediate() {
    // mov r0, #1
    let block = run(&[0xe3a0_0001]);
    assert_eq!(opcodes(&block), vec![A32SetRegister]);
    let set = only(&block, A32SetRegister);
    assert_eq!(set.arg(0), r(0));
    assert_eq!(set.arg(1), Value::U32(1));
    assert_eq!(terminal(&block), &Terminal::link_block_fast(at(1)));
    assert_eq!(block.end_location(), at(1));
    assert_eq!(block.cycle_count(), 1);
    assert_eq!(block.condition(), Cond::Al);
}

#[test]
fn add_register() {
    // add r0, r1, r2
    let block = run(&[0xe081_0002]);
    assert_eq!(
        opcodes(&block),
        vec![A32GetCFlag, A32GetRegister, A32GetRegister, Add32, A32SetRegister]
    );
    let gets = find(&block, A32GetRegister);
    assert_eq!(gets[0].arg(0), r(2));
    assert_eq!(gets[1].arg(0), r(1));
    let add = only(&block, Add32);
    assert_eq!(add.arg(2), Value::U1(false));
    assert_eq!(only(&block, A32SetRegister).arg(0), r(0));
}

#[test]
fn adds_sets_all_flags() {
    // adds r0, r1, r2
    let block = run(&[0xe091_0002]);
    assert_eq!(
        opcodes(&block),
        vec![
            A32GetCFlag,
            A32GetRegister,
            A32GetRegister,
            Add32,
            GetCarryFromOp,
            GetOverflowFromOp,
            A32SetRegister,
            MostSignificantBit,
            A32SetNFlag,
            IsZero32,
            A32SetZFlag,
            A32SetCFlag,
            A32SetVFlag,
        ]
    );
    // The flag pseudo-ops read the Add32 result.
    let add_ref = block.inst_refs()[3];
    assert_eq!(only(&block, GetCarryFromOp).arg(0).inst(), Some(add_ref));
    assert_eq!(only(&block, GetOverflowFromOp).arg(0).inst(), Some(add_ref));
    assert_eq!(block.inst(add_ref).use_count(), 5);
}

#[test]
fn cmp_immediate_only_sets_flags() {
    // cmp r0, #0
    let block = run(&[0xe350_0000]);
    assert_eq!(
        opcodes(&block),
        vec![
            A32GetRegister,
            Sub32,
            GetCarryFromOp,
            GetOverflowFromOp,
            MostSignificantBit,
            A32SetNFlag,
            IsZero32,
            A32SetZFlag,
            A32SetCFlag,
            A32SetVFlag,
        ]
    );
    let sub = only(&block, Sub32);
    assert_eq!(sub.arg(1), Value::U32(0));
    assert_eq!(sub.arg(2), Value::U1(true));
    assert!(find(&block, A32SetRegister).is_empty());
}

#[test]
fn movs_rotated_immediate_sets_carry_from_rotation() {
    // movs r0, #0x40000000
    let block = run(&[0xe3b0_0101]);
    assert_eq!(
        opcodes(&block),
        vec![
            A32SetRegister,
            MostSignificantBit,
            A32SetNFlag,
            IsZero32,
            A32SetZFlag,
            A32SetCFlag,
        ]
    );
    assert_eq!(only(&block, A32SetRegister).arg(1), Value::U32(0x4000_0000));
    assert_eq!(only(&block, A32SetCFlag).arg(0), Value::U1(false));
}

#[test]
fn movs_unrotated_immediate_keeps_carry() {
    // movs r0, #1
    let block = run(&[0xe3b0_0001]);
    let set_c = only(&block, A32SetCFlag);
    let get_c = block.inst_refs()[0];
    assert_eq!(block.inst(get_c).opcode(), A32GetCFlag);
    assert_eq!(set_c.arg(0).inst(), Some(get_c));
}

#[test]
fn bic_inverts_operand() {
    // bic r0, r1, #0xff
    let block = run(&[0xe3c1_00ff]);
    assert_eq!(opcodes(&block), vec![A32GetRegister, Not32, And32, A32SetRegister]);
    assert_eq!(only(&block, Not32).arg(0), Value::U32(0xff));
}

#[test]
fn adc_reads_carry_once() {
    // adc r0, r1, r2
    let block = run(&[0xe0a1_0002]);
    assert_eq!(find(&block, A32GetCFlag).len(), 1);
    let carry = block.inst_refs()[0];
    assert_eq!(only(&block, Add32).arg(2).inst(), Some(carry));
}

#[test]
fn pc_operand_reads_as_address_plus_eight() {
    // add r0, pc, #0
    let block = run(&[0xe28f_0000]);
    assert_eq!(opcodes(&block), vec![Add32, A32SetRegister]);
    assert_eq!(only(&block, Add32).arg(0), Value::U32(BASE + 8));
}

// ── Shifts ───────────────────────────────────────────────────

#[test]
fn lsl_zero_folds_away() {
    // mov r0, r1
    let block = run(&[0xe1a0_0001]);
    assert_eq!(opcodes(&block), vec![A32GetCFlag, A32GetRegister, A32SetRegister]);
}

#[test]
fn strict_lsl_zero_emits_shift() {
    let options = TranslationOptions {
        strict_imm_shift: true,
        ..TranslationOptions::default()
    };
    let block = run_with(&[0xe1a0_0001], options);
    assert_eq!(
        opcodes(&block),
        vec![
            A32GetCFlag,
            A32GetRegister,
            LogicalShiftLeft32,
            GetCarryFromOp,
            A32SetRegister,
        ]
    );
    assert_eq!(only(&block, LogicalShiftLeft32).arg(1), Value::U8(0));
}

#[test]
fn lsr_and_asr_zero_mean_thirty_two() {
    // mov r0, r1, lsr #32
    let block = run(&[0xe1a0_0021]);
    assert_eq!(only(&block, LogicalShiftRight32).arg(1), Value::U8(32));

    // mov r0, r1, asr #32
    let block = run(&[0xe1a0_0041]);
    assert_eq!(only(&block, ArithmeticShiftRight32).arg(1), Value::U8(32));
}

#[test]
fn ror_zero_is_rrx() {
    // mov r0, r1, rrx
    let block = run(&[0xe1a0_0061]);
    let rrx = only(&block, RotateRightExtended);
    assert_eq!(rrx.num_args(), 2);
    assert!(find(&block, RotateRight32).is_empty());

    // mov r0, r1, ror #4
    let block = run(&[0xe1a0_0261]);
    assert_eq!(only(&block, RotateRight32).arg(1), Value::U8(4));
}

#[test]
fn register_shift_uses_low_byte() {
    // add r0, r0, r2, lsl r1
    let block = run(&[0xe080_0112]);
    let lsb_ref = block
        .instructions()
        .find(|(_, inst)| inst.opcode() == LeastSignificantByte)
        .map(|(r, _)| r);
    assert!(lsb_ref.is_some());
    assert_eq!(only(&block, LogicalShiftLeft32).arg(1).inst(), lsb_ref);
}

#[test]
fn register_shift_with_pc_is_unpredictable() {
    // add r0, pc, r1, lsl r2
    let block = run(&[0xe08f_0211]);
    assert_raises_only(&block, BASE, Exception::UnpredictableInstruction);
    assert_eq!(block.end_location(), at(1));
}

// ── PC writes ────────────────────────────────────────────────

#[test]
fn mov_pc_writes_with_interworking() {
    // mov pc, lr
    let block = run(&[0xe1a0_f00e, 0xe3a0_0001]);
    assert_eq!(opcodes(&block), vec![A32GetCFlag, A32GetRegister, A32BXWritePC]);
    assert_eq!(terminal(&block), &Terminal::ReturnToDispatch);
    assert_eq!(block.end_location(), at(1));
}

#[test]
fn movs_pc_is_unpredictable() {
    // movs pc, lr
    let block = run(&[0xe1b0_f00e]);
    assert!(find(&block, A32BXWritePC).is_empty());
    assert_raised(&block, BASE, Exception::UnpredictableInstruction);
}

// ── Multiply ─────────────────────────────────────────────────

#[test]
fn mul_and_mla() {
    // mul r0, r1, r2
    let block = run(&[0xe000_0291]);
    assert_eq!(opcodes(&block), vec![A32GetRegister, A32GetRegister, Mul32, A32SetRegister]);

    // mla r0, r1, r2, r1
    let block = run(&[0xe020_1291]);
    assert_eq!(
        opcodes(&block),
        vec![A32GetRegister, A32GetRegister, A32GetRegister, Mul32, Add32, A32SetRegister]
    );

    // muls r0, r1, r2
    let block = run(&[0xe010_0291]);
    assert_eq!(
        opcodes(&block),
        vec![
            A32GetRegister,
            A32GetRegister,
            Mul32,
            A32SetRegister,
            MostSignificantBit,
            A32SetNFlag,
            IsZero32,
            A32SetZFlag,
        ]
    );
}

#[test]
fn mul_to_pc_is_unpredictable() {
    // mul pc, r1, r2
    let block = run(&[0xe00f_0291]);
    assert_raises_only(&block, BASE, Exception::UnpredictableInstruction);
}

// ── Branches ─────────────────────────────────────────────────

#[test]
fn branch_links_to_target() {
    // b #+8 (to pc + 8)
    let block = run(&[0xea00_0000, 0xe3a0_0001]);
    assert!(block.is_empty());
    assert_eq!(terminal(&block), &Terminal::link_block(at(2)));
    assert_eq!(block.end_location(), at(1));
    assert_eq!(block.cycle_count(), 1);
}

#[test]
fn branch_to_self_and_backwards() {
    // b .
    let block = run(&[0xeaff_fffe]);
    assert_eq!(terminal(&block), &Terminal::link_block(loc(BASE)));

    // b . - 8
    let block = run(&[0xeaff_fffc]);
    assert_eq!(terminal(&block), &Terminal::link_block(loc(BASE - 8)));
}

#[test]
fn branch_stops_fetching() {
    let words = [0xe3a0_0001, 0xea00_0000, 0xe3a0_0002];
    let mut fetched = Vec::new();
    let block = translate(
        loc(BASE),
        |addr| {
            fetched.push(addr);
            fetch_from(&words)(addr)
        },
        &TranslationOptions::default(),
    );
    assert_eq!(fetched, vec![BASE, BASE + 4]);
    assert_eq!(terminal(&block), &Terminal::link_block(at(3)));
    assert_eq!(block.end_location(), at(2));
    assert_eq!(block.cycle_count(), 2);
}

#[test]
fn bl_pushes_return_and_sets_lr() {
    // bl #+12
    let block = run(&[0xeb00_0001]);
    assert_eq!(opcodes(&block), vec![PushRSB, A32SetRegister]);
    assert_eq!(only(&block, PushRSB).arg(0), Value::U64(at(1).unique_hash()));
    let set_lr = only(&block, A32SetRegister);
    assert_eq!(set_lr.arg(0), Value::A32Reg(A32Reg::LR));
    assert_eq!(set_lr.arg(1), Value::U32(BASE + 4));
    assert_eq!(terminal(&block), &Terminal::link_block(at(3)));
}

#[test]
fn bx_lr_hints_return() {
    // bx lr
    let block = run(&[0xe12f_ff1e]);
    assert_eq!(opcodes(&block), vec![A32GetRegister, A32BXWritePC]);
    assert_eq!(terminal(&block), &Terminal::PopRSBHint);

    // bx r3
    let block = run(&[0xe12f_ff13]);
    assert_eq!(only(&block, A32GetRegister).arg(0), r(3));
    assert_eq!(terminal(&block), &Terminal::ReturnToDispatch);
}

#[test]
fn blx_register() {
    // blx r3
    let block = run(&[0xe12f_ff33]);
    assert_eq!(
        opcodes(&block),
        vec![PushRSB, A32GetRegister, A32SetRegister, A32BXWritePC]
    );
    assert_eq!(only(&block, A32SetRegister).arg(1), Value::U32(BASE + 4));
    assert_eq!(terminal(&block), &Terminal::ReturnToDispatch);

    // blx pc
    let block = run(&[0xe12f_ff3f]);
    assert_raises_only(&block, BASE, Exception::UnpredictableInstruction);
}

// ── Load/store ───────────────────────────────────────────────

#[test]
fn ldr_offset() {
    // ldr r0, [r1, #4]
    let block = run(&[0xe591_0004]);
    assert_eq!(
        opcodes(&block),
        vec![A32GetRegister, Add32, A32ReadMemory32, A32SetRegister]
    );
    assert_eq!(only(&block, Add32).arg(1), Value::U32(4));
    let set = only(&block, A32SetRegister);
    assert_eq!(set.arg(0), r(0));

    // ldr r0, [r1, #-4]
    let block = run(&[0xe511_0004]);
    assert_eq!(
        opcodes(&block),
        vec![A32GetRegister, Sub32, A32ReadMemory32, A32SetRegister]
    );
}

#[test]
fn ldr_post_index_writes_back() {
    // ldr r0, [r1], #4
    let block = run(&[0xe491_0004]);
    assert_eq!(
        opcodes(&block),
        vec![A32GetRegister, Add32, A32ReadMemory32, A32SetRegister, A32SetRegister]
    );
    // Post-indexed: the access uses the unmodified base.
    let base = block.inst_refs()[0];
    assert_eq!(only(&block, A32ReadMemory32).arg(0).inst(), Some(base));
    let sets = find(&block, A32SetRegister);
    assert_eq!(sets[0].arg(0), r(1));
    assert_eq!(sets[1].arg(0), r(0));
}

#[test]
fn ldrb_zero_extends() {
    // ldrb r0, [r1]
    let block = run(&[0xe5d1_0000]);
    assert_eq!(
        opcodes(&block),
        vec![A32GetRegister, Add32, A32ReadMemory8, ZeroExtendByteToWord, A32SetRegister]
    );
}

#[test]
fn stores() {
    // str r0, [r1]
    let block = run(&[0xe581_0000]);
    assert_eq!(
        opcodes(&block),
        vec![A32GetRegister, Add32, A32GetRegister, A32WriteMemory32]
    );

    // strb r0, [r1]
    let block = run(&[0xe5c1_0000]);
    assert_eq!(
        opcodes(&block),
        vec![A32GetRegister, Add32, A32GetRegister, LeastSignificantByte, A32WriteMemory8]
    );
}

#[test]
fn ldr_pc_branches() {
    // ldr pc, [r1]
    let block = run(&[0xe591_f000, 0xe3a0_0001]);
    assert_eq!(
        opcodes(&block),
        vec![A32GetRegister, Add32, A32ReadMemory32, A32BXWritePC]
    );
    assert_eq!(terminal(&block), &Terminal::ReturnToDispatch);
    assert_eq!(block.end_location(), at(1));
}

#[test]
fn writeback_to_loaded_register() {
    // ldr r0, [r0, #4]!
    let block = run(&[0xe5b0_0004]);
    assert_raises_only(&block, BASE, Exception::UnpredictableInstruction);

    let options = TranslationOptions {
        define_unpredictable_behaviour: true,
        ..TranslationOptions::default()
    };
    let block = run_with(&[0xe5b0_0004], options);
    assert_eq!(only(&block, A32ReadMemory32).arg(0).inst(), Some(block.inst_refs()[1]));
    assert_eq!(find(&block, A32SetRegister).len(), 2);
    assert_eq!(terminal(&block), &Terminal::link_block_fast(at(1)));
}

#[test]
fn unpredictable_load_store_forms() {
    // ldr r0, [pc, #4]!
    let block = run(&[0xe5bf_0004]);
    assert_raises_only(&block, BASE, Exception::UnpredictableInstruction);

    // ldrb pc, [r1]
    let block = run(&[0xe5d1_f000]);
    assert_raises_only(&block, BASE, Exception::UnpredictableInstruction);
}

#[test]
fn unprivileged_access_is_interpreted() {
    // ldrt r0, [r1], #0
    let block = run(&[0xe4b1_0000]);
    assert!(block.is_empty());
    assert_eq!(terminal(&block), &Terminal::interpret(loc(BASE)));
}

// ── Exceptions and hints ─────────────────────────────────────

#[test]
fn svc_calls_supervisor() {
    // svc #0x10
    let block = run(&[0xef00_0010]);
    assert_eq!(
        opcodes(&block),
        vec![PushRSB, And32, A32SetRegister, A32CallSupervisor]
    );
    assert_eq!(only(&block, A32CallSupervisor).arg(0), Value::U32(0x10));
    assert_eq!(only(&block, A32SetRegister).arg(0), Value::A32Reg(A32Reg::PC));
    assert_eq!(terminal(&block), &Terminal::check_halt(Terminal::PopRSBHint));
}

#[test]
fn udf_and_unallocated_raise_undefined() {
    let block = run(&[UDF]);
    assert_raises_only(&block, BASE, Exception::UndefinedInstruction);
    assert_eq!(block.end_location(), at(1));
    assert_eq!(block.cycle_count(), 1);

    let block = run(&[0xe790_0001]);
    assert_raises_only(&block, BASE, Exception::UndefinedInstruction);
}

#[test]
fn unhooked_hints_emit_nothing() {
    for word in [0xe320_f000, 0xe320_f001, 0xe320_f002, 0xe320_f003, 0xe320_f004] {
        let block = run(&[word]);
        assert!(block.is_empty(), "{word:#010x}");
        assert_eq!(terminal(&block), &Terminal::link_block_fast(at(1)));
    }
}

#[test]
fn hooked_hints_raise() {
    let options = TranslationOptions {
        hook_hint_instructions: true,
        ..TranslationOptions::default()
    };
    let cases = [
        (0xe320_f001, Exception::Yield),
        (0xe320_f002, Exception::WaitForEvent),
        (0xe320_f003, Exception::WaitForInterrupt),
        (0xe320_f004, Exception::SendEvent),
    ];
    for (word, exception) in cases {
        let block = run_with(&[word], options);
        assert_eq!(opcodes(&block), vec![And32, A32SetRegister, A32ExceptionRaised]);
        let and = only(&block, And32);
        assert_eq!(and.arg(0), Value::U32(BASE + 4));
        assert_eq!(and.arg(1), Value::U32(0xffff_fffc));
        assert_raised(&block, BASE, exception);
    }

    // nop is never hooked
    let block = run_with(&[0xe320_f000], options);
    assert!(block.is_empty());
}

#[test]
fn bkpt_raises_breakpoint() {
    // bkpt #0x1234
    let block = run(&[0xe121_2374]);
    assert_eq!(opcodes(&block), vec![And32, A32SetRegister, A32ExceptionRaised]);
    assert_raised(&block, BASE, Exception::Breakpoint);
    assert_eq!(block.end_location(), at(1));
}

#[test]
fn conditional_bkpt() {
    // bkpteq #0
    let block = run(&[0x0120_0070]);
    assert_raises_only(&block, BASE, Exception::UnpredictableInstruction);
    assert_eq!(block.condition(), Cond::Al);

    let options = TranslationOptions {
        define_unpredictable_behaviour: true,
        ..TranslationOptions::default()
    };
    let block = run_with(&[0x0120_0070], options);
    assert_eq!(block.condition(), Cond::Eq);
    assert_eq!(block.condition_failed_location(), at(1));
    assert_raised(&block, BASE, Exception::Breakpoint);
}

#[test]
fn exception_codes() {
    assert_eq!(Exception::UndefinedInstruction.code(), 0);
    assert_eq!(Exception::UnpredictableInstruction.code(), 1);
    assert_eq!(Exception::SendEvent.code(), 2);
    assert_eq!(Exception::WaitForInterrupt.code(), 3);
    assert_eq!(Exception::WaitForEvent.code(), 4);
    assert_eq!(Exception::Yield.code(), 5);
    assert_eq!(Exception::Breakpoint.code(), 6);
}
