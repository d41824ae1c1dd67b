//! Internal invariant violations of the IR graph.
//!
//! These are programming defects in a translator or pass, never guest
//! faults. Guest-visible faults are expressed inside the IR instead.

use thiserror::Error;

use crate::opcode::Opcode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    #[error("terminal has already been set")]
    TerminalAlreadySet,

    #[error("terminal has not been set")]
    TerminalNotSet,

    #[error("{opcode:?} takes {expected} arguments, got {got}")]
    ArityMismatch {
        opcode: Opcode,
        expected: usize,
        got: usize,
    },

    #[error("argument index {index} out of range for {opcode:?}")]
    ArgIndexOutOfRange { opcode: Opcode, index: usize },

    #[error("instruction handle {0} is not a live, earlier node of this block")]
    InvalidInstRef(u32),

    #[error("block has no condition-failed location")]
    NoConditionFailedLocation,

    #[error("instruction {index} still has {uses} uses")]
    InstStillInUse { index: u32, uses: u32 },
}

pub type IrResult<T> = Result<T, IrError>;
