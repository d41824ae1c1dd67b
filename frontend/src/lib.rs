//! Guest instruction decoding and IR generation.
//!
//! Provides the generic translation framework (`TranslatorOps` trait
//! and `translator_loop`), the table-driven decoder dispatch, and the
//! A32 translator.

pub mod a32;
pub mod decoder;

pub use a32::{
    translate, translate_single_instruction, ArmTranslatorVisitor,
    ConditionalState, TranslationOptions,
};
pub use decoder::{DecodeTable, Matcher};

// ---------------------------------------------------------------
// Generic translation framework
// ---------------------------------------------------------------

/// Block termination reason set by `translate_insn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisasJumpType {
    /// Continue to the next sequential instruction.
    Next,
    /// Reached the maximum number of instructions per block.
    TooMany,
    /// The block cannot absorb further instructions (conditional
    /// region closed); fall through to the next block.
    EndOfRegion,
    /// The instruction ended the block; a terminal is already set.
    NoReturn,
}

impl DisasJumpType {
    /// Whether translation stopped with the block still falling
    /// through to the next sequential instruction.
    pub fn falls_through(self) -> bool {
        matches!(
            self,
            DisasJumpType::Next
                | DisasJumpType::TooMany
                | DisasJumpType::EndOfRegion
        )
    }
}

/// Base context shared by all guest architectures.
#[derive(Debug, Clone)]
pub struct DisasContextBase {
    /// How the current instruction terminates.
    pub is_jmp: DisasJumpType,
    /// Number of guest instructions translated so far.
    pub num_insns: usize,
    /// Maximum instructions allowed in one block (`None`: unbounded).
    pub max_insns: Option<usize>,
}

impl DisasContextBase {
    pub fn new(max_insns: Option<usize>) -> Self {
        Self {
            is_jmp: DisasJumpType::Next,
            num_insns: 0,
            max_insns,
        }
    }
}

/// Per-architecture translation operations.
pub trait TranslatorOps {
    /// Called once at the start of the block.
    fn tb_start(&mut self);

    /// Decode and translate one guest instruction.
    ///
    /// Must set `base_mut().is_jmp` when the instruction ends the
    /// block or the block cannot take another instruction.
    fn translate_insn(&mut self);

    /// Finalize the block (default terminal, end location).
    fn tb_stop(&mut self);

    fn base(&self) -> &DisasContextBase;

    fn base_mut(&mut self) -> &mut DisasContextBase;
}

/// Generic translation loop: drives the decode → translate cycle.
///
/// At least one instruction is always translated, even with a cap of
/// zero.
pub fn translator_loop<T: TranslatorOps + ?Sized>(ctx: &mut T) {
    ctx.tb_start();

    loop {
        ctx.translate_insn();
        ctx.base_mut().num_insns += 1;

        let base = ctx.base();
        if base.is_jmp != DisasJumpType::Next {
            break;
        }
        if base.max_insns.is_some_and(|max| base.num_insns >= max) {
            ctx.base_mut().is_jmp = DisasJumpType::TooMany;
            break;
        }
    }

    ctx.tb_stop();
}
