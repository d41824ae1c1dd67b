//! A32 (ARM state) frontend: decode tables, translator visitor and
//! block translation driver.

pub mod decode;
pub mod ir_emitter;
pub mod options;
mod trans;
pub mod translate;
pub mod types;
mod vfp;
pub mod visitor;

pub use ir_emitter::A32IrEmitter;
pub use options::TranslationOptions;
pub use translate::{translate, translate_single_instruction, ArmDisasContext};
pub use types::{Exception, ShiftType};
pub use visitor::{ArmTranslatorVisitor, ConditionalState, INSN_WIDTH};
