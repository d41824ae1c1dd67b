/// Knobs that change how guest code is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationOptions {
    /// Consult the VFP decode table before the base ARM table.
    pub enable_vfp: bool,

    /// Translate UNPREDICTABLE encodings with a defined behaviour
    /// instead of raising `UnpredictableInstruction`.
    pub define_unpredictable_behaviour: bool,

    /// Raise exceptions for YIELD, WFE, WFI and SEV instead of
    /// treating them as no-ops.
    pub hook_hint_instructions: bool,

    /// Emit an explicit shift for `LSL #0` register operands.
    pub strict_imm_shift: bool,

    /// Cap on guest instructions per block.
    pub max_instructions: Option<usize>,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            enable_vfp: true,
            define_unpredictable_behaviour: false,
            hook_hint_instructions: false,
            strict_imm_shift: false,
            max_instructions: None,
        }
    }
}
