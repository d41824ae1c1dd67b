use dbt_core::{
    dump_block, dump_block_io, A32ExtReg, A32Reg, Block, Cond,
    LocationDescriptor, Opcode, Terminal, Value,
};

fn loc(pc: u32) -> LocationDescriptor {
    LocationDescriptor::arm(pc)
}

fn sample_block() -> Block {
    let mut b = Block::new(loc(0x100));
    let r1 = b.append_new_inst(Opcode::A32GetRegister, &[Value::A32Reg(A32Reg::new(1))]);
    b.append_new_inst(Opcode::A32SetRegister, &[Value::A32Reg(A32Reg::new(2)), r1]);
    b.add_cycles(1);
    b.set_terminal(Terminal::link_block(loc(0x104)));
    b
}

#[test]
fn dump_format() {
    let text = dump_block(&sample_block());
    let expected = "\
Block: location={00000100,!T,!E,00000000}
cycles=1, entry_cond=al
[0000000000000000] %0     = A32GetRegister r1 (uses: 1)
[0000000000000001]          A32SetRegister r2, %0 (uses: 0)
terminal = LinkBlock{{00000104,!T,!E,00000000}}
";
    assert_eq!(text, expected);
}

#[test]
fn dump_is_deterministic() {
    let b = sample_block();
    assert_eq!(dump_block(&b), dump_block(&b));
    assert_eq!(dump_block(&b), dump_block(&b.clone()));
}

#[test]
fn dump_io_matches_string() {
    let b = sample_block();
    let mut out = Vec::new();
    dump_block_io(&b, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), dump_block(&b));
}

#[test]
fn dump_conditional_header() {
    let mut b = Block::new(loc(0));
    b.set_condition(Cond::Ne);
    b.set_condition_failed_location(loc(4));
    b.set_terminal(Terminal::ReturnToDispatch);
    let text = dump_block(&b);
    assert!(
        text.contains("cycles=0, entry_cond=ne, cond_fail={00000004,!T,!E,00000000}\n"),
        "{text}"
    );
}

#[test]
fn dump_without_terminal() {
    let b = Block::new(loc(0));
    assert!(dump_block(&b).ends_with("terminal = <invalid terminal>\n"));
}

#[test]
fn dump_immediates() {
    let mut b = Block::new(loc(0));
    b.append_new_inst(Opcode::A32ExceptionRaised, &[Value::U32(0x10), Value::U64(1)]);
    b.append_new_inst(Opcode::A32SetCFlag, &[Value::U1(true)]);
    b.append_new_inst(Opcode::A32GetExtendedRegister64, &[Value::A32ExtReg(A32ExtReg::D(3))]);
    b.append_new_inst(Opcode::A32WriteMemory8, &[Value::U32(0), Value::U8(255)]);
    let text = dump_block(&b);
    assert!(text.contains("A32ExceptionRaised #0x10, #0x1 (uses: 0)"), "{text}");
    assert!(text.contains("A32SetCFlag #1 (uses: 0)"), "{text}");
    assert!(text.contains("A32GetExtendedRegister64 d3 (uses: 0)"), "{text}");
    assert!(text.contains("A32WriteMemory8 #0x0, #255 (uses: 0)"), "{text}");
}

#[test]
fn dump_annotates_type_errors() {
    let mut b = Block::new(loc(0));
    b.append_new_inst(
        Opcode::A32SetRegister,
        &[Value::A32Reg(A32Reg::new(0)), Value::U8(1)],
    );
    let text = dump_block(&b);
    assert!(text.contains("r0, #1 <type error: U8 != U32>"), "{text}");
}

#[test]
fn dump_renumbers_after_erase() {
    let mut b = Block::new(loc(0));
    let dead = b.append_new_inst(Opcode::A32GetRegister, &[Value::A32Reg(A32Reg::new(0))]);
    let live = b.append_new_inst(Opcode::A32GetRegister, &[Value::A32Reg(A32Reg::new(1))]);
    b.append_new_inst(Opcode::Not32, &[live]);
    b.erase(dead.inst().unwrap());

    let text = dump_block(&b);
    assert!(text.contains("%0     = A32GetRegister r1"), "{text}");
    assert!(text.contains("%1     = Not32 %0"), "{text}");
    assert!(!text.contains("r0"), "{text}");
}
