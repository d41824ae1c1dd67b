//! Table-driven instruction dispatch.
//!
//! A [`Matcher`] pairs a fixed-bit mask/expected rule with the handler
//! it selects. A [`DecodeTable`] is an immutable list of matchers built
//! once; lookups return the first matcher that accepts the word, with
//! more specific masks tried first.

use std::cmp::Reverse;
use std::fmt;

/// Handler selected by a matcher: the visitor plus the raw word.
pub type Handler<V> = fn(&mut V, u32) -> bool;

pub struct Matcher<V> {
    name: &'static str,
    mask: u32,
    expect: u32,
    handler: Handler<V>,
}

impl<V> Matcher<V> {
    pub const fn new(
        name: &'static str,
        mask: u32,
        expect: u32,
        handler: Handler<V>,
    ) -> Self {
        Self {
            name,
            mask,
            expect,
            handler,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn mask(&self) -> u32 {
        self.mask
    }

    pub fn expect(&self) -> u32 {
        self.expect
    }

    pub fn matches(&self, insn: u32) -> bool {
        insn & self.mask == self.expect
    }

    /// Invoke the handler. `insn` must be accepted by this matcher.
    pub fn call(&self, visitor: &mut V, insn: u32) -> bool {
        debug_assert!(self.matches(insn), "{} called on {insn:08x}", self.name);
        (self.handler)(visitor, insn)
    }
}

impl<V> Clone for Matcher<V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<V> fmt::Debug for Matcher<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("name", &self.name)
            .field("mask", &format_args!("{:#010x}", self.mask))
            .field("expect", &format_args!("{:#010x}", self.expect))
            .finish()
    }
}

pub struct DecodeTable<V> {
    matchers: Vec<Matcher<V>>,
}

impl<V> DecodeTable<V> {
    /// Build a table. Matchers with more fixed bits are consulted
    /// first; ties keep their insertion order.
    pub fn new(mut matchers: Vec<Matcher<V>>) -> Self {
        matchers.sort_by_key(|m| Reverse(m.mask.count_ones()));
        Self { matchers }
    }

    pub fn decode(&self, insn: u32) -> Option<&Matcher<V>> {
        self.matchers.iter().find(|m| m.matches(insn))
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Matcher<V>> {
        self.matchers.iter()
    }
}

impl<V> fmt::Debug for DecodeTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.matchers.iter()).finish()
    }
}

/// Search `tables` in priority order; the first accepting matcher wins.
pub fn decode_first<'a, V>(
    tables: &[&'a DecodeTable<V>],
    insn: u32,
) -> Option<&'a Matcher<V>> {
    tables.iter().find_map(|t| t.decode(insn))
}
