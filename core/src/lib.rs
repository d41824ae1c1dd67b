pub mod block;
pub mod dump;
pub mod error;
pub mod inst;
pub mod ir_builder;
pub mod location;
pub mod opcode;
pub mod regs;
pub mod terminal;
pub mod types;
pub mod value;

pub use block::Block;
pub use dump::{dump_block, dump_block_io, write_block};
pub use error::{IrError, IrResult};
pub use inst::Inst;
pub use ir_builder::{IrEmitter, ResultAndCarry};
pub use location::{LocationDescriptor, FPSCR_MODE_MASK};
pub use opcode::{OpDef, OpFlags, Opcode, MAX_ARGS, OPCODE_DEFS};
pub use regs::{A32ExtReg, A32Reg};
pub use terminal::Terminal;
pub use types::{Cond, Type, TYPE_COUNT};
pub use value::{InstRef, Value};
