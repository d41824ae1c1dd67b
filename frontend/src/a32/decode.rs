//! A32 decode tables generated from `decode/*.decode` by build.rs.

use std::sync::OnceLock;

use super::options::TranslationOptions;
use super::visitor::ArmTranslatorVisitor;
use crate::decoder::{decode_first, DecodeTable, Matcher};

pub mod arm {
    use crate::decoder::Matcher;
    include!(concat!(env!("OUT_DIR"), "/arm_decode.rs"));
}

pub mod vfp {
    use crate::decoder::Matcher;
    include!(concat!(env!("OUT_DIR"), "/vfp_decode.rs"));
}

pub type ArmMatcher = Matcher<ArmTranslatorVisitor>;
pub type ArmDecodeTable = DecodeTable<ArmTranslatorVisitor>;

pub fn arm_table() -> &'static ArmDecodeTable {
    static TABLE: OnceLock<ArmDecodeTable> = OnceLock::new();
    TABLE.get_or_init(|| DecodeTable::new(arm::matchers()))
}

pub fn vfp_table() -> &'static ArmDecodeTable {
    static TABLE: OnceLock<ArmDecodeTable> = OnceLock::new();
    TABLE.get_or_init(|| DecodeTable::new(vfp::matchers()))
}

/// Find the handler for `insn`: VFP first (when enabled), then ARM.
pub fn decode(
    insn: u32,
    options: &TranslationOptions,
) -> Option<&'static ArmMatcher> {
    if options.enable_vfp {
        decode_first(&[vfp_table(), arm_table()], insn)
    } else {
        arm_table().decode(insn)
    }
}
