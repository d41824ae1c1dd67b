use crate::opcode::{Opcode, MAX_ARGS};
use crate::types::Type;
use crate::value::Value;

/// A single IR operation.
///
/// The argument array always has exactly `opcode.num_args()` live
/// slots. `use_count` is the number of argument slots elsewhere in the
/// block that reference this instruction; it is maintained by the
/// owning [`Block`](crate::block::Block), never by the node itself.
#[derive(Debug, Clone)]
pub struct Inst {
    opcode: Opcode,
    args: [Value; MAX_ARGS],
    use_count: u32,
}

impl Inst {
    pub(crate) fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            args: [Value::Empty; MAX_ARGS],
            use_count: 0,
        }
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Type of the value this instruction produces.
    pub fn get_type(&self) -> Type {
        self.opcode.return_type()
    }

    pub fn num_args(&self) -> usize {
        self.opcode.num_args()
    }

    pub fn arg(&self, index: usize) -> Value {
        assert!(
            index < self.num_args(),
            "argument index {index} out of range for {:?}",
            self.opcode
        );
        self.args[index]
    }

    pub fn args(&self) -> &[Value] {
        &self.args[..self.num_args()]
    }

    pub fn use_count(&self) -> u32 {
        self.use_count
    }

    pub fn has_uses(&self) -> bool {
        self.use_count > 0
    }

    pub fn writes_to_cpsr(&self) -> bool {
        self.opcode.writes_to_cpsr()
    }

    pub fn reads_from_cpsr(&self) -> bool {
        self.opcode.reads_from_cpsr()
    }

    pub fn has_side_effects(&self) -> bool {
        self.opcode.has_side_effects()
    }

    pub fn is_pseudo_operation(&self) -> bool {
        self.opcode.is_pseudo_operation()
    }

    pub(crate) fn set_arg_raw(&mut self, index: usize, value: Value) -> Value {
        std::mem::replace(&mut self.args[index], value)
    }

    pub(crate) fn set_opcode(&mut self, opcode: Opcode) {
        self.opcode = opcode;
    }

    pub(crate) fn use_inc(&mut self) {
        self.use_count += 1;
    }

    pub(crate) fn use_dec(&mut self) {
        assert!(self.use_count > 0, "use count underflow on {:?}", self.opcode);
        self.use_count -= 1;
    }
}
