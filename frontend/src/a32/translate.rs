use std::mem;

use log::{debug, warn};

use dbt_core::{Block, IrError, LocationDescriptor, Terminal};

use super::options::TranslationOptions;
use super::visitor::{ArmTranslatorVisitor, ConditionalState, INSN_WIDTH};
use crate::{translator_loop, DisasContextBase, DisasJumpType, TranslatorOps};

/// A32 translation context: the visitor plus the guest code source.
pub struct ArmDisasContext<F> {
    pub base: DisasContextBase,
    pub visitor: ArmTranslatorVisitor,
    fetch: F,
}

impl<F: FnMut(u32) -> u32> ArmDisasContext<F> {
    pub fn new(
        location: LocationDescriptor,
        fetch: F,
        options: TranslationOptions,
    ) -> Self {
        Self {
            base: DisasContextBase::new(options.max_instructions),
            visitor: ArmTranslatorVisitor::new(location, options),
            fetch,
        }
    }

    pub fn into_block(self) -> Block {
        self.visitor.into_block()
    }

    /// Advance past the instruction just translated.
    fn advance(&mut self) {
        let ir = &mut self.visitor.ir;
        ir.current_location = ir.current_location.advance_pc(INSN_WIDTH);
        ir.block.add_cycles(1);
    }
}

impl<F: FnMut(u32) -> u32> TranslatorOps for ArmDisasContext<F> {
    fn tb_start(&mut self) {
        debug!("translating block at {}", self.visitor.ir.current_location);
    }

    fn translate_insn(&mut self) {
        let pc = self.visitor.ir.pc();
        let insn = (self.fetch)(pc);
        let should_continue = self.visitor.decode_and_call(insn);

        if self.visitor.cond_state == ConditionalState::Break {
            self.base.is_jmp = DisasJumpType::NoReturn;
            return;
        }

        self.advance();

        if !should_continue {
            self.base.is_jmp = DisasJumpType::NoReturn;
        } else if !self.visitor.cond_can_continue() {
            self.base.is_jmp = DisasJumpType::EndOfRegion;
        }
    }

    fn tb_stop(&mut self) {
        let current = self.visitor.ir.current_location;
        let block = &mut self.visitor.ir.block;

        // A handler that set a terminal must also have ended the block.
        if self.base.is_jmp.falls_through() {
            block.set_terminal(Terminal::link_block_fast(current));
        }
        if !block.has_terminal() {
            panic!("{}", IrError::TerminalNotSet);
        }
        block.set_end_location(current);

        debug!(
            "block {} done: {} guest insns, {} IR insns, terminal {}",
            block.location(),
            self.base.num_insns,
            block.len(),
            block.terminal().map_or_else(String::new, ToString::to_string),
        );
    }

    fn base(&self) -> &DisasContextBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DisasContextBase {
        &mut self.base
    }
}

/// Translate guest code starting at `location` into one IR block.
///
/// `fetch` returns the instruction word at a guest address. The
/// returned block always has a terminal and its end location set.
pub fn translate(
    location: LocationDescriptor,
    fetch: impl FnMut(u32) -> u32,
    options: &TranslationOptions,
) -> Block {
    if location.tflag() {
        warn!("thumb translation unsupported at {location}, interpreting");
        let mut block = Block::new(location);
        block.set_terminal(Terminal::interpret(location));
        return block;
    }

    let mut ctx = ArmDisasContext::new(location, fetch, *options);
    translator_loop(&mut ctx);
    ctx.into_block()
}

/// Translate exactly one instruction word into `block` at `location`.
///
/// Conditional folding across instructions is not managed; the caller
/// inspects the block condition itself. Returns the handler's
/// continue/stop result. The terminal is left unset when the handler
/// did not set one.
pub fn translate_single_instruction(
    block: &mut Block,
    location: LocationDescriptor,
    insn: u32,
) -> bool {
    let placeholder = Block::new(block.location());
    let taken = mem::replace(block, placeholder);
    let mut visitor =
        ArmTranslatorVisitor::with_block(taken, location, TranslationOptions::default());

    let should_continue = visitor.decode_and_call(insn);

    let ir = &mut visitor.ir;
    ir.current_location = ir.current_location.advance_pc(INSN_WIDTH);
    ir.block.add_cycles(1);
    let end = ir.current_location;
    ir.block.set_end_location(end);

    *block = visitor.into_block();
    should_continue
}
