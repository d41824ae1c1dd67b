use crate::error::{IrError, IrResult};
use crate::inst::Inst;
use crate::location::LocationDescriptor;
use crate::opcode::Opcode;
use crate::terminal::Terminal;
use crate::types::Cond;
use crate::value::{InstRef, Value};

/// One translation unit: straight-line IR plus a single exit.
///
/// Instruction nodes live in a block-owned arena and are addressed by
/// [`InstRef`] handles. A node is never freed on its own; erasing it
/// only unlinks it from the program-order list, and the arena goes away
/// with the block. Argument slots that hold a [`Value::Inst`] are the
/// only references that count towards a node's use count, and every
/// mutation of a slot goes through the block so the counts stay exact.
/// An argument may only name a live node that precedes its user in
/// program order.
#[derive(Debug, Clone)]
pub struct Block {
    location: LocationDescriptor,
    end_location: LocationDescriptor,

    // -- Conditional execution --
    cond: Cond,
    cond_failed: Option<LocationDescriptor>,
    cond_failed_cycle_count: usize,

    cycle_count: usize,
    terminal: Option<Terminal>,

    arena: Vec<Inst>,
    live: Vec<bool>,
    order: Vec<InstRef>,
}

impl Block {
    pub fn new(location: LocationDescriptor) -> Self {
        Self {
            location,
            end_location: location,
            cond: Cond::Al,
            cond_failed: None,
            cond_failed_cycle_count: 0,
            cycle_count: 0,
            terminal: None,
            arena: Vec::with_capacity(64),
            live: Vec::with_capacity(64),
            order: Vec::with_capacity(64),
        }
    }

    // -- Locations --

    pub fn location(&self) -> LocationDescriptor {
        self.location
    }

    /// Location of the first guest instruction not covered by this block.
    pub fn end_location(&self) -> LocationDescriptor {
        self.end_location
    }

    pub fn set_end_location(&mut self, location: LocationDescriptor) {
        self.end_location = location;
    }

    // -- Conditional execution --

    /// Condition that must hold on entry for the block to execute.
    pub fn condition(&self) -> Cond {
        self.cond
    }

    pub fn set_condition(&mut self, cond: Cond) {
        self.cond = cond;
    }

    pub fn has_condition_failed_location(&self) -> bool {
        self.cond_failed.is_some()
    }

    pub fn try_condition_failed_location(
        &self,
    ) -> IrResult<LocationDescriptor> {
        self.cond_failed.ok_or(IrError::NoConditionFailedLocation)
    }

    /// Where execution resumes when the entry condition fails.
    pub fn condition_failed_location(&self) -> LocationDescriptor {
        self.try_condition_failed_location()
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn set_condition_failed_location(
        &mut self,
        location: LocationDescriptor,
    ) {
        self.cond_failed = Some(location);
    }

    /// Guest cycles charged when the entry condition fails.
    pub fn condition_failed_cycle_count(&self) -> usize {
        self.cond_failed_cycle_count
    }

    pub fn set_condition_failed_cycle_count(&mut self, count: usize) {
        self.cond_failed_cycle_count = count;
    }

    pub fn increment_condition_failed_cycle_count(&mut self) {
        self.cond_failed_cycle_count += 1;
    }

    // -- Cycle accounting --

    pub fn cycle_count(&self) -> usize {
        self.cycle_count
    }

    pub fn add_cycles(&mut self, cycles: usize) {
        self.cycle_count += cycles;
    }

    // -- Terminal --

    pub fn terminal(&self) -> Option<&Terminal> {
        self.terminal.as_ref()
    }

    pub fn has_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn try_set_terminal(&mut self, term: Terminal) -> IrResult<()> {
        if self.terminal.is_some() {
            return Err(IrError::TerminalAlreadySet);
        }
        self.terminal = Some(term);
        Ok(())
    }

    /// Set the block exit. Setting it twice is a translator bug.
    pub fn set_terminal(&mut self, term: Terminal) {
        self.try_set_terminal(term).unwrap_or_else(|e| panic!("{e}"));
    }

    pub fn try_replace_terminal(&mut self, term: Terminal) -> IrResult<()> {
        if self.terminal.is_none() {
            return Err(IrError::TerminalNotSet);
        }
        self.terminal = Some(term);
        Ok(())
    }

    /// Swap out an existing terminal (used by passes).
    pub fn replace_terminal(&mut self, term: Terminal) {
        self.try_replace_terminal(term)
            .unwrap_or_else(|e| panic!("{e}"));
    }

    // -- Instructions --

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> impl Iterator<Item = (InstRef, &Inst)> {
        self.order.iter().map(|&r| (r, &self.arena[r.index()]))
    }

    /// Handles in program order.
    pub fn inst_refs(&self) -> &[InstRef] {
        &self.order
    }

    pub fn inst(&self, r: InstRef) -> &Inst {
        self.check_ref(r).unwrap_or_else(|e| panic!("{e}"));
        &self.arena[r.index()]
    }

    pub fn try_append_new_inst(
        &mut self,
        opcode: Opcode,
        args: &[Value],
    ) -> IrResult<Value> {
        let pos = self.order.len();
        self.insert_inst(pos, opcode, args)
    }

    /// Append an instruction and return a reference to its result.
    ///
    /// Panics if `args` does not match the opcode's arity.
    pub fn append_new_inst(&mut self, opcode: Opcode, args: &[Value]) -> Value {
        self.try_append_new_inst(opcode, args)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_prepend_new_inst(
        &mut self,
        before: InstRef,
        opcode: Opcode,
        args: &[Value],
    ) -> IrResult<Value> {
        let pos = self.position(before)?;
        self.insert_inst(pos, opcode, args)
    }

    /// Insert an instruction immediately before `before`.
    pub fn prepend_new_inst(
        &mut self,
        before: InstRef,
        opcode: Opcode,
        args: &[Value],
    ) -> Value {
        self.try_prepend_new_inst(before, opcode, args)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_set_arg(
        &mut self,
        inst: InstRef,
        index: usize,
        value: Value,
    ) -> IrResult<()> {
        self.check_ref(inst)?;
        let opcode = self.arena[inst.index()].opcode();
        if index >= opcode.num_args() {
            return Err(IrError::ArgIndexOutOfRange { opcode, index });
        }
        if let Some(r) = value.inst() {
            let user = self.position(inst)?;
            self.check_operand(r, user)?;
            self.arena[r.index()].use_inc();
        }
        let old = self.arena[inst.index()].set_arg_raw(index, value);
        if let Some(r) = old.inst() {
            self.arena[r.index()].use_dec();
        }
        Ok(())
    }

    /// Rebind argument `index` of `inst`, moving the use from the old
    /// referent (if any) to the new one.
    pub fn set_arg(&mut self, inst: InstRef, index: usize, value: Value) {
        self.try_set_arg(inst, index, value)
            .unwrap_or_else(|e| panic!("{e}"));
    }

    /// Point every use of `target` at `replacement` instead.
    pub fn replace_uses_with(&mut self, target: InstRef, replacement: Value) {
        let mut slots = Vec::new();
        for &r in &self.order {
            let inst = &self.arena[r.index()];
            for (i, arg) in inst.args().iter().enumerate() {
                if arg.inst() == Some(target) {
                    slots.push((r, i));
                }
            }
        }
        for (r, i) in slots {
            self.set_arg(r, i, replacement);
        }
    }

    pub fn try_erase(&mut self, inst: InstRef) -> IrResult<()> {
        let pos = self.position(inst)?;
        let uses = self.arena[inst.index()].use_count();
        if uses > 0 {
            return Err(IrError::InstStillInUse {
                index: inst.0,
                uses,
            });
        }
        for i in 0..self.arena[inst.index()].num_args() {
            self.try_set_arg(inst, i, Value::Empty)?;
        }
        self.arena[inst.index()].set_opcode(Opcode::Void);
        self.live[inst.index()] = false;
        self.order.remove(pos);
        Ok(())
    }

    /// Unlink an unused instruction from the block, releasing the uses
    /// held by its arguments. The arena slot itself is kept.
    pub fn erase(&mut self, inst: InstRef) {
        self.try_erase(inst).unwrap_or_else(|e| panic!("{e}"));
    }

    // -- Internal helpers --

    fn check_ref(&self, r: InstRef) -> IrResult<()> {
        if self.live.get(r.index()).copied().unwrap_or(false) {
            Ok(())
        } else {
            Err(IrError::InvalidInstRef(r.0))
        }
    }

    fn position(&self, r: InstRef) -> IrResult<usize> {
        self.check_ref(r)?;
        self.order
            .iter()
            .position(|&x| x == r)
            .ok_or(IrError::InvalidInstRef(r.0))
    }

    /// `r` must be live and sit before program-order position `user`.
    fn check_operand(&self, r: InstRef, user: usize) -> IrResult<()> {
        if user == self.order.len() {
            return self.check_ref(r);
        }
        match self.position(r)? {
            pos if pos < user => Ok(()),
            _ => Err(IrError::InvalidInstRef(r.0)),
        }
    }

    fn insert_inst(
        &mut self,
        pos: usize,
        opcode: Opcode,
        args: &[Value],
    ) -> IrResult<Value> {
        if args.len() != opcode.num_args() {
            return Err(IrError::ArityMismatch {
                opcode,
                expected: opcode.num_args(),
                got: args.len(),
            });
        }
        for arg in args {
            if let Some(r) = arg.inst() {
                self.check_operand(r, pos)?;
            }
        }

        let r = InstRef(self.arena.len() as u32);
        let mut inst = Inst::new(opcode);
        for (i, &arg) in args.iter().enumerate() {
            inst.set_arg_raw(i, arg);
        }
        self.arena.push(inst);
        self.live.push(true);
        for arg in args {
            if let Some(t) = arg.inst() {
                self.arena[t.index()].use_inc();
            }
        }
        self.order.insert(pos, r);
        Ok(Value::Inst(r, opcode.return_type()))
    }
}
