use dbt_core::{A32ExtReg, A32Reg, Cond, InstRef, LocationDescriptor, Type, Value, FPSCR_MODE_MASK, TYPE_COUNT};

#[test]
fn type_sizes() {
    assert_eq!(Type::U1.size_bits(), 1);
    assert_eq!(Type::U8.size_bits(), 8);
    assert_eq!(Type::U16.size_bits(), 16);
    assert_eq!(Type::U32.size_bits(), 32);
    assert_eq!(Type::U64.size_bits(), 64);
    assert_eq!(Type::A32Reg.size_bits(), 0);
    assert_eq!(Type::Void.size_bits(), 0);
}

#[test]
fn type_classification() {
    assert!(Type::U1.is_integer());
    assert!(Type::U64.is_integer());
    assert!(!Type::A32Reg.is_integer());
    assert!(!Type::Opaque.is_integer());
    assert!(Type::Void.is_void());
    assert!(!Type::U32.is_void());
    assert_eq!(Type::U64 as usize + 1, TYPE_COUNT);
}

#[test]
fn opaque_is_compatible_both_ways() {
    assert!(Type::U32.is_compatible_with(Type::U32));
    assert!(Type::Opaque.is_compatible_with(Type::U8));
    assert!(Type::U8.is_compatible_with(Type::Opaque));
    assert!(!Type::U8.is_compatible_with(Type::U32));
    assert!(!Type::A32Reg.is_compatible_with(Type::A32ExtReg));
}

#[test]
fn cond_from_bits_roundtrips_encoding() {
    for bits in 0..16u32 {
        assert_eq!(Cond::from_bits(bits) as u32, bits);
    }
    assert_eq!(Cond::from_bits(0x1e), Cond::Al);
}

#[test]
fn cond_invert() {
    assert_eq!(Cond::Eq.invert(), Cond::Ne);
    assert_eq!(Cond::Ne.invert(), Cond::Eq);
    assert_eq!(Cond::Hs.invert(), Cond::Lo);
    assert_eq!(Cond::Ge.invert(), Cond::Lt);
    assert_eq!(Cond::Gt.invert(), Cond::Le);
    assert_eq!(Cond::Al.invert(), Cond::Al);
    assert_eq!(Cond::Nv.invert(), Cond::Nv);
}

#[test]
fn cond_names() {
    assert_eq!(Cond::Eq.to_string(), "eq");
    assert_eq!(Cond::Al.to_string(), "al");
    assert_eq!(Cond::default(), Cond::Al);
}

#[test]
fn value_types() {
    assert_eq!(Value::Empty.get_type(), Type::Void);
    assert_eq!(Value::U1(true).get_type(), Type::U1);
    assert_eq!(Value::U8(1).get_type(), Type::U8);
    assert_eq!(Value::U16(1).get_type(), Type::U16);
    assert_eq!(Value::U32(1).get_type(), Type::U32);
    assert_eq!(Value::U64(1).get_type(), Type::U64);
    assert_eq!(Value::A32Reg(A32Reg::SP).get_type(), Type::A32Reg);
    assert_eq!(
        Value::A32ExtReg(A32ExtReg::S(3)).get_type(),
        Type::A32ExtReg
    );
    assert_eq!(Value::Inst(InstRef(7), Type::U1).get_type(), Type::U1);
}

#[test]
fn value_immediates() {
    assert!(Value::U32(5).is_immediate());
    assert!(Value::A32Reg(A32Reg::LR).is_immediate());
    assert!(!Value::Empty.is_immediate());
    assert!(!Value::Inst(InstRef(0), Type::U32).is_immediate());
    assert_eq!(Value::U1(true).imm_as_u64(), Some(1));
    assert_eq!(Value::U16(0xbeef).imm_as_u64(), Some(0xbeef));
    assert_eq!(Value::A32Reg(A32Reg::PC).imm_as_u64(), None);
    assert!(Value::U64(0).is_zero());
    assert!(!Value::U8(1).is_zero());
    assert_eq!(Value::from(3u32), Value::U32(3));
    assert_eq!(Value::from(false), Value::U1(false));
    assert_eq!(Value::Inst(InstRef(2), Type::U32).inst(), Some(InstRef(2)));
}

#[test]
fn register_display() {
    assert_eq!(A32Reg::new(0).to_string(), "r0");
    assert_eq!(A32Reg::new(12).to_string(), "r12");
    assert_eq!(A32Reg::SP.to_string(), "sp");
    assert_eq!(A32Reg::LR.to_string(), "lr");
    assert_eq!(A32Reg::PC.to_string(), "pc");
    assert!(A32Reg::new(15).is_pc());
    assert_eq!(A32ExtReg::single(1, 1).to_string(), "s3");
    assert_eq!(A32ExtReg::double(1, 1).to_string(), "d17");
    assert!(A32ExtReg::double(0, 0).is_double());
    assert!(!A32ExtReg::single(0, 0).is_double());
}

#[test]
#[should_panic]
fn register_out_of_range() {
    let _ = A32Reg::new(16);
}

#[test]
fn location_equality_covers_all_fields() {
    let base = LocationDescriptor::arm(0x1000);
    assert_eq!(base, LocationDescriptor::new(0x1000, false, false, 0));
    assert_ne!(base, base.set_tflag(true));
    assert_ne!(base, base.set_eflag(true));
    assert_ne!(base, LocationDescriptor::new(0x1000, false, false, 0x0040_0000));
    assert_ne!(base, base.set_pc(0x1004));
}

#[test]
fn location_advance_wraps() {
    let loc = LocationDescriptor::arm(0xffff_fffc);
    assert_eq!(loc.advance_pc(4).pc(), 0);
    assert_eq!(loc.advance_pc(-4).pc(), 0xffff_fff8);
}

#[test]
fn location_hash_and_display() {
    let loc = LocationDescriptor::new(0x8000, true, false, FPSCR_MODE_MASK);
    assert_eq!(loc.unique_hash() & 0xffff_ffff, 0x8000);
    assert_ne!(loc.unique_hash(), loc.set_tflag(false).unique_hash());
    assert_eq!(
        LocationDescriptor::arm(0x10).to_string(),
        "{00000010,!T,!E,00000000}"
    );
}
