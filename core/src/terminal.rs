//! Block exits.
//!
//! A terminal describes how control leaves a finished block. Nested
//! variants form a finite tree that the backend resolves at block exit.

use std::fmt;

use crate::location::LocationDescriptor;
use crate::types::Cond;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// Hand off to the interpreter, starting at `next`.
    Interpret { next: LocationDescriptor },
    /// Return to the dispatcher without a known successor.
    ReturnToDispatch,
    /// Continue at `next` (through the dispatcher or a patched link).
    LinkBlock { next: LocationDescriptor },
    /// Continue at `next`; the backend may link directly without
    /// re-checking the halt request.
    LinkBlockFast { next: LocationDescriptor },
    /// Pop the return stack buffer to predict the successor.
    PopRSBHint,
    /// Evaluate `cond` against guest flags at block exit.
    If {
        cond: Cond,
        then_: Box<Terminal>,
        else_: Box<Terminal>,
    },
    /// Branch on the check bit set by `A32SetCheckBit`.
    CheckBit {
        then_: Box<Terminal>,
        else_: Box<Terminal>,
    },
    /// Return to the dispatcher if a halt was requested, otherwise
    /// take `else_`.
    CheckHalt { else_: Box<Terminal> },
}

impl Terminal {
    pub fn interpret(next: LocationDescriptor) -> Self {
        Terminal::Interpret { next }
    }

    pub fn link_block(next: LocationDescriptor) -> Self {
        Terminal::LinkBlock { next }
    }

    pub fn link_block_fast(next: LocationDescriptor) -> Self {
        Terminal::LinkBlockFast { next }
    }

    pub fn if_then_else(cond: Cond, then_: Terminal, else_: Terminal) -> Self {
        Terminal::If {
            cond,
            then_: Box::new(then_),
            else_: Box::new(else_),
        }
    }

    pub fn check_bit(then_: Terminal, else_: Terminal) -> Self {
        Terminal::CheckBit {
            then_: Box::new(then_),
            else_: Box::new(else_),
        }
    }

    pub fn check_halt(else_: Terminal) -> Self {
        Terminal::CheckHalt {
            else_: Box::new(else_),
        }
    }

    /// Number of terminal nodes in this tree.
    pub fn node_count(&self) -> usize {
        match self {
            Terminal::If { then_, else_, .. }
            | Terminal::CheckBit { then_, else_ } => {
                1 + then_.node_count() + else_.node_count()
            }
            Terminal::CheckHalt { else_ } => 1 + else_.node_count(),
            _ => 1,
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Interpret { next } => write!(f, "Interpret{{{next}}}"),
            Terminal::ReturnToDispatch => f.write_str("ReturnToDispatch{}"),
            Terminal::LinkBlock { next } => write!(f, "LinkBlock{{{next}}}"),
            Terminal::LinkBlockFast { next } => {
                write!(f, "LinkBlockFast{{{next}}}")
            }
            Terminal::PopRSBHint => f.write_str("PopRSBHint{}"),
            Terminal::If { cond, then_, else_ } => {
                write!(f, "If{{{cond}, {then_}, {else_}}}")
            }
            Terminal::CheckBit { then_, else_ } => {
                write!(f, "CheckBit{{{then_}, {else_}}}")
            }
            Terminal::CheckHalt { else_ } => write!(f, "CheckHalt{{{else_}}}"),
        }
    }
}
