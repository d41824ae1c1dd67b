use std::fmt;

/// Identifies a translation point: guest PC plus the processor state
/// bits that change how instructions at that PC are translated.
///
/// Blocks are keyed by this descriptor in the block cache, so two
/// descriptors are equal only when every field matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LocationDescriptor {
    pc: u32,
    /// Thumb execution state.
    tflag: bool,
    /// Big-endian data accesses.
    eflag: bool,
    /// FPSCR mode bits (len, stride, rounding, FZ, DN).
    fpscr_mode: u32,
}

/// FPSCR bits that participate in the location descriptor.
pub const FPSCR_MODE_MASK: u32 = 0x07f7_0000;

impl LocationDescriptor {
    pub const fn new(pc: u32, tflag: bool, eflag: bool, fpscr: u32) -> Self {
        Self {
            pc,
            tflag,
            eflag,
            fpscr_mode: fpscr & FPSCR_MODE_MASK,
        }
    }

    /// ARM-state, little-endian descriptor with default FPSCR.
    pub const fn arm(pc: u32) -> Self {
        Self::new(pc, false, false, 0)
    }

    pub const fn pc(&self) -> u32 {
        self.pc
    }

    pub const fn tflag(&self) -> bool {
        self.tflag
    }

    pub const fn eflag(&self) -> bool {
        self.eflag
    }

    pub const fn fpscr_mode(&self) -> u32 {
        self.fpscr_mode
    }

    /// Same descriptor with the PC advanced by `amount` bytes (wrapping).
    pub const fn advance_pc(self, amount: i32) -> Self {
        Self {
            pc: self.pc.wrapping_add(amount as u32),
            ..self
        }
    }

    pub const fn set_pc(self, pc: u32) -> Self {
        Self { pc, ..self }
    }

    pub const fn set_tflag(self, tflag: bool) -> Self {
        Self { tflag, ..self }
    }

    pub const fn set_eflag(self, eflag: bool) -> Self {
        Self { eflag, ..self }
    }

    /// Pack every field into one 64-bit key (PC in the low word).
    pub const fn unique_hash(&self) -> u64 {
        let upper = self.fpscr_mode as u64
            | (self.tflag as u64)
            | ((self.eflag as u64) << 1);
        (upper << 32) | self.pc as u64
    }
}

impl fmt::Display for LocationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{:08x},{},{},{:08x}}}",
            self.pc,
            if self.tflag { "T" } else { "!T" },
            if self.eflag { "E" } else { "!E" },
            self.fpscr_mode
        )
    }
}
