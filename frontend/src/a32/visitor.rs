use log::trace;

use dbt_core::{Block, Cond, LocationDescriptor, ResultAndCarry, Terminal, Value};

use super::decode;
use super::ir_emitter::A32IrEmitter;
use super::options::TranslationOptions;
use super::types::{Exception, ShiftType};

/// Width of one A32 instruction in bytes.
pub const INSN_WIDTH: i32 = 4;

/// Progress of conditional-execution folding within one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionalState {
    /// No conditional instruction seen; the block is unconditional.
    #[default]
    None,
    /// Inside the conditional region that opens the block.
    Translating,
    /// Conditional region closed; later instructions are unconditional.
    Trailing,
    /// A condition could not be folded; the terminal is set.
    Break,
}

/// Per-block translation state shared by every A32 handler.
///
/// Handlers live in `trans.rs` (ARM) and `vfp.rs` (VFP) as the
/// generated `Decode` trait implementations. Each one returns `true`
/// to keep translating and `false` once the block is finished.
#[derive(Debug)]
pub struct ArmTranslatorVisitor {
    pub ir: A32IrEmitter,
    pub cond_state: ConditionalState,
    pub options: TranslationOptions,
}

impl ArmTranslatorVisitor {
    pub fn new(location: LocationDescriptor, options: TranslationOptions) -> Self {
        Self::with_block(Block::new(location), location, options)
    }

    /// Continue emitting into an existing block at `location`.
    pub fn with_block(
        block: Block,
        location: LocationDescriptor,
        options: TranslationOptions,
    ) -> Self {
        Self {
            ir: A32IrEmitter::new(block, location),
            cond_state: ConditionalState::None,
            options,
        }
    }

    pub fn into_block(self) -> Block {
        self.ir.into_block()
    }

    /// Decode `insn` and run its handler, falling back to the
    /// undefined-instruction handler when no table matches.
    pub fn decode_and_call(&mut self, insn: u32) -> bool {
        match decode::decode(insn, &self.options) {
            Some(m) => {
                trace!("{:#010x}: {insn:08x} {}", self.ir.pc(), m.name());
                m.call(self, insn)
            }
            None => {
                trace!("{:#010x}: {insn:08x} <undefined>", self.ir.pc());
                self.undefined_instruction()
            }
        }
    }

    /// Location of the instruction after the current one.
    pub fn next_location(&self) -> LocationDescriptor {
        self.ir.current_location.advance_pc(INSN_WIDTH)
    }

    /// Whether the block can take another instruction.
    ///
    /// Once a conditional region has been opened, the block is only
    /// extended while no emitted instruction writes the CPSR.
    pub fn cond_can_continue(&self) -> bool {
        debug_assert_ne!(self.cond_state, ConditionalState::Break);

        if self.cond_state == ConditionalState::None {
            return true;
        }
        self.ir.block.instructions().all(|(_, inst)| !inst.writes_to_cpsr())
    }

    /// Gate every conditional handler on this before emitting IR.
    ///
    /// Returns `false` when the instruction must not be translated into
    /// this block; the terminal has then been set and the handler must
    /// return `false` as well.
    pub fn condition_passed(&mut self, cond: Cond) -> bool {
        assert_ne!(
            self.cond_state,
            ConditionalState::Break,
            "translation continued after a conditional break"
        );

        if cond == Cond::Nv {
            // Obsolete encoding space.
            self.unpredictable_instruction();
            return false;
        }

        if self.cond_state == ConditionalState::Translating {
            let region_end = self.ir.block.try_condition_failed_location().ok();
            if region_end != Some(self.ir.current_location) || cond == Cond::Al {
                trace!("conditional region closed at {}", self.ir.current_location);
                self.cond_state = ConditionalState::Trailing;
            } else if cond == self.ir.block.condition() {
                let next = self.next_location();
                self.ir.block.set_condition_failed_location(next);
                self.ir.block.increment_condition_failed_cycle_count();
                return true;
            } else {
                return self.cond_break(cond);
            }
        }

        if cond == Cond::Al {
            return true;
        }

        // Only the first instruction of a block may open a region.
        if !self.ir.block.is_empty() || self.cond_state != ConditionalState::None {
            return self.cond_break(cond);
        }

        trace!("block condition {cond} adopted at {}", self.ir.current_location);
        let next = self.next_location();
        self.cond_state = ConditionalState::Translating;
        self.ir.block.set_condition(cond);
        self.ir.block.set_condition_failed_location(next);
        self.ir.block.set_condition_failed_cycle_count(1);
        true
    }

    fn cond_break(&mut self, cond: Cond) -> bool {
        trace!("condition {cond} breaks block at {}", self.ir.current_location);
        self.cond_state = ConditionalState::Break;
        let here = self.ir.current_location;
        self.ir.set_term(Terminal::link_block_fast(here));
        false
    }

    // -- Block-ending helpers --

    /// Hand the current instruction to the interpreter.
    pub fn interpret_this_instruction(&mut self) -> bool {
        let here = self.ir.current_location;
        self.ir.set_term(Terminal::interpret(here));
        false
    }

    pub fn unpredictable_instruction(&mut self) -> bool {
        self.ir.exception_raised(Exception::UnpredictableInstruction);
        self.ir.set_term(Terminal::check_halt(Terminal::ReturnToDispatch));
        false
    }

    pub fn undefined_instruction(&mut self) -> bool {
        self.ir.exception_raised(Exception::UndefinedInstruction);
        self.ir.set_term(Terminal::check_halt(Terminal::ReturnToDispatch));
        false
    }

    /// Raise `exception` with PC already advanced past the instruction.
    pub fn raise_exception(&mut self, exception: Exception) -> bool {
        let next_pc = self.ir.imm32(self.ir.pc().wrapping_add(INSN_WIDTH as u32));
        self.ir.branch_write_pc(next_pc);
        self.ir.exception_raised(exception);
        self.ir.set_term(Terminal::check_halt(Terminal::ReturnToDispatch));
        false
    }

    /// UNPREDICTABLE encodings are rejected unless a defined behaviour
    /// was requested; returns whether translation may proceed.
    pub fn unpredictable_allowed(&self) -> bool {
        self.options.define_unpredictable_behaviour
    }

    // -- Shifter operands --

    pub fn emit_imm_shift(
        &mut self,
        value: Value,
        stype: ShiftType,
        imm5: u8,
        carry_in: Value,
    ) -> ResultAndCarry {
        match stype {
            ShiftType::Lsl if imm5 == 0 && !self.options.strict_imm_shift => {
                ResultAndCarry {
                    result: value,
                    carry: carry_in,
                }
            }
            ShiftType::Lsl => {
                let amount = self.ir.imm8(imm5);
                self.ir.logical_shift_left(value, amount, carry_in)
            }
            ShiftType::Lsr => {
                let amount = self.ir.imm8(if imm5 == 0 { 32 } else { imm5 });
                self.ir.logical_shift_right(value, amount, carry_in)
            }
            ShiftType::Asr => {
                let amount = self.ir.imm8(if imm5 == 0 { 32 } else { imm5 });
                self.ir.arithmetic_shift_right(value, amount, carry_in)
            }
            ShiftType::Ror if imm5 == 0 => {
                self.ir.rotate_right_extended(value, carry_in)
            }
            ShiftType::Ror => {
                let amount = self.ir.imm8(imm5);
                self.ir.rotate_right(value, amount, carry_in)
            }
        }
    }

    pub fn emit_reg_shift(
        &mut self,
        value: Value,
        stype: ShiftType,
        amount: Value,
        carry_in: Value,
    ) -> ResultAndCarry {
        match stype {
            ShiftType::Lsl => self.ir.logical_shift_left(value, amount, carry_in),
            ShiftType::Lsr => self.ir.logical_shift_right(value, amount, carry_in),
            ShiftType::Asr => self.ir.arithmetic_shift_right(value, amount, carry_in),
            ShiftType::Ror => self.ir.rotate_right(value, amount, carry_in),
        }
    }
}
