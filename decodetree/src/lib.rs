//! Generator for instruction decoders described in `.decode` files.
//!
//! The input language is the QEMU decodetree format: `%field`,
//! `&argset`, `@format` and pattern lines. The output is Rust source
//! with one argument struct per argset, a `Decode` trait with one
//! `trans_*` method per pattern, and a `matchers()` constructor that
//! lists every pattern as a `(name, mask, expected bits, handler)`
//! entry for a table-driven dispatcher.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Write;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeTreeError {
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: Box<DecodeTreeError>,
    },

    #[error("bit pattern exceeds {0} bits")]
    PatternTooWide(u32),

    #[error("bad field segment: {0}")]
    BadSegment(String),

    #[error("bad inline field: {0}")]
    BadInlineField(String),

    #[error("bad attribute: {0}")]
    BadAttr(String),

    #[error("unknown format @{0}")]
    UnknownFormat(String),

    #[error("unknown field transform: {0}")]
    UnknownFunction(String),

    #[error("empty definition")]
    EmptyDefinition,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DecodeTreeError>;

// ── Data structures ─────────────────────────────────────────────

/// One `pos:len` (or `pos:slen`) piece of a `%field`.
#[derive(Clone, Debug)]
pub struct FieldSegment {
    pub pos: u32,
    pub len: u32,
    pub signed: bool,
}

#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    /// Most significant segment first.
    pub segments: Vec<FieldSegment>,
    /// `!function=` transform applied to the concatenated value.
    pub func: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ArgSet {
    pub name: String,
    pub fields: Vec<String>,
    /// The struct is provided by the including module.
    pub is_extern: bool,
}

/// How one argument-set member is filled in from the instruction word.
#[derive(Clone, Debug)]
pub enum FieldMapping {
    FieldRef(String),
    Inline { pos: u32, len: u32, signed: bool },
    Const(i32),
}

#[derive(Clone, Debug)]
pub struct Format {
    pub name: String,
    pub fixedbits: u32,
    pub fixedmask: u32,
    pub args_name: String,
    pub field_map: BTreeMap<String, FieldMapping>,
}

#[derive(Clone, Debug)]
pub struct Pattern {
    pub name: String,
    pub fixedbits: u32,
    pub fixedmask: u32,
    /// Empty when the handler takes no arguments.
    pub args_name: String,
    pub field_map: BTreeMap<String, FieldMapping>,
}

pub struct Parsed {
    pub fields: BTreeMap<String, Field>,
    pub argsets: BTreeMap<String, ArgSet>,
    pub patterns: Vec<Pattern>,
}

// ── Token classification ────────────────────────────────────────

pub fn is_bit_char(c: char) -> bool {
    matches!(c, '0' | '1' | '.' | '-')
}

pub fn is_bit_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_bit_char)
}

pub fn is_inline_field(s: &str) -> bool {
    let Some((name, len)) = s.split_once(':') else {
        return false;
    };
    !name.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !len.is_empty()
        && len.bytes().all(|b| b.is_ascii_digit())
}

/// Length of the leading run of bit tokens and inline fields.
pub fn count_bit_tokens(tokens: &[&str]) -> usize {
    tokens
        .iter()
        .position(|t| !is_bit_token(t) && !is_inline_field(t))
        .unwrap_or(tokens.len())
}

// ── Bit patterns ────────────────────────────────────────────────

pub struct BitPatternResult {
    pub fixedbits: u32,
    pub fixedmask: u32,
    /// Inline `name:len` fields as `(pos, len)`.
    pub inline_fields: BTreeMap<String, (u32, u32)>,
}

/// Walks a bit pattern from the most significant bit down.
struct BitCursor {
    width: u32,
    remaining: u32,
}

impl BitCursor {
    fn new(width: u32) -> Self {
        Self {
            width,
            remaining: width,
        }
    }

    /// Claim the next `len` bits; returns the position of the lowest.
    fn take(&mut self, len: u32) -> Result<u32> {
        if len > self.remaining {
            return Err(DecodeTreeError::PatternTooWide(self.width));
        }
        self.remaining -= len;
        Ok(self.remaining)
    }
}

pub fn parse_bit_tokens(tokens: &[&str], width: u32) -> Result<BitPatternResult> {
    let mut cursor = BitCursor::new(width);
    let mut result = BitPatternResult {
        fixedbits: 0,
        fixedmask: 0,
        inline_fields: BTreeMap::new(),
    };

    for &tok in tokens {
        if is_bit_token(tok) {
            for c in tok.chars() {
                let bit = 1u32 << cursor.take(1)?;
                match c {
                    '0' => result.fixedmask |= bit,
                    '1' => {
                        result.fixedmask |= bit;
                        result.fixedbits |= bit;
                    }
                    _ => {}
                }
            }
        } else if is_inline_field(tok) {
            let bad = || DecodeTreeError::BadInlineField(tok.to_string());
            let (name, len) = tok.split_once(':').ok_or_else(bad)?;
            let len: u32 = len.parse().map_err(|_| bad())?;
            let pos = cursor.take(len)?;
            result.inline_fields.insert(name.to_string(), (pos, len));
        } else {
            break;
        }
    }
    Ok(result)
}

// ── Definitions ─────────────────────────────────────────────────

pub fn parse_field_segment(s: &str) -> Result<FieldSegment> {
    let bad = || DecodeTreeError::BadSegment(s.to_string());
    let (pos, len) = s.split_once(':').ok_or_else(bad)?;
    let (signed, len) = match len.strip_prefix('s') {
        Some(rest) => (true, rest),
        None => (false, len),
    };
    let pos: u32 = pos.parse().map_err(|_| bad())?;
    let len: u32 = len.parse().map_err(|_| bad())?;
    if !(1..=32).contains(&len) || pos + len > 32 {
        return Err(bad());
    }
    Ok(FieldSegment { pos, len, signed })
}

/// `%name seg... [!function=func]`
pub fn parse_field(line: &str) -> Result<Field> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let name = definition_name(&tokens)?;
    let mut field = Field {
        name,
        segments: Vec::new(),
        func: None,
    };
    for tok in &tokens[1..] {
        match tok.strip_prefix("!function=") {
            Some(func) => field.func = Some(func.to_string()),
            None => field.segments.push(parse_field_segment(tok)?),
        }
    }
    Ok(field)
}

/// `&name member... [!extern]`
pub fn parse_argset(line: &str) -> Result<ArgSet> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let name = definition_name(&tokens)?;
    let (is_extern, members) = match tokens[1..].split_last() {
        Some((&"!extern", members)) => (true, members),
        _ => (false, &tokens[1..]),
    };
    Ok(ArgSet {
        name,
        fields: members.iter().map(|m| m.to_string()).collect(),
        is_extern,
    })
}

/// Name of a `%`, `&` or `@` definition, without its sigil.
fn definition_name(tokens: &[&str]) -> Result<String> {
    match tokens.first() {
        Some(t) if t.len() > 1 => Ok(t[1..].to_string()),
        _ => Err(DecodeTreeError::EmptyDefinition),
    }
}

/// Trailing attributes of a format or pattern line.
#[derive(Default)]
struct Attrs {
    argset: Option<String>,
    format: Option<String>,
    mappings: BTreeMap<String, FieldMapping>,
}

impl Attrs {
    fn parse(tokens: &[&str], fields: &BTreeMap<String, Field>) -> Result<Self> {
        let mut attrs = Attrs::default();
        for &tok in tokens {
            let field_ref = |name: &str| FieldMapping::FieldRef(name.to_string());
            if let Some(name) = tok.strip_prefix('&') {
                attrs.argset = Some(name.to_string());
            } else if let Some(name) = tok.strip_prefix('@') {
                attrs.format.get_or_insert_with(|| name.to_string());
            } else if let Some(name) = tok.strip_prefix('%') {
                attrs.mappings.insert(name.to_string(), field_ref(name));
            } else if let Some((key, value)) = tok.split_once('=') {
                let mapping = match value.strip_prefix('%') {
                    Some(name) => field_ref(name),
                    None => value
                        .parse()
                        .map(FieldMapping::Const)
                        .map_err(|_| DecodeTreeError::BadAttr(tok.to_string()))?,
                };
                attrs.mappings.insert(key.to_string(), mapping);
            } else if !tok.starts_with('!') && fields.contains_key(tok) {
                attrs.mappings.insert(tok.to_string(), field_ref(tok));
            }
        }
        Ok(attrs)
    }
}

/// Fill members not named by an attribute from inline bit fields.
fn add_inline_fields(
    map: &mut BTreeMap<String, FieldMapping>,
    inline: &BTreeMap<String, (u32, u32)>,
) {
    for (name, &(pos, len)) in inline {
        map.entry(name.clone()).or_insert(FieldMapping::Inline {
            pos,
            len,
            signed: false,
        });
    }
}

/// Join lines ending in `\` with the line that follows.
pub fn merge_continuations(input: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut joining = false;
    for line in input.lines() {
        let mut current = match lines.pop() {
            Some(mut prev) if joining => {
                prev.push(' ');
                prev.push_str(line.trim());
                prev
            }
            prev => {
                lines.extend(prev);
                line.to_string()
            }
        };
        joining = current.ends_with('\\');
        if joining {
            current.pop();
            let kept = current.trim_end_matches(' ').len();
            current.truncate(kept);
        }
        lines.push(current);
    }
    lines.join("\n")
}

// ── Parser ──────────────────────────────────────────────────────

struct Parser {
    width: u32,
    fields: BTreeMap<String, Field>,
    argsets: BTreeMap<String, ArgSet>,
    formats: BTreeMap<String, Format>,
    patterns: Vec<Pattern>,
    auto_argsets: BTreeMap<String, ArgSet>,
}

impl Parser {
    fn new(width: u32) -> Self {
        Self {
            width,
            fields: BTreeMap::new(),
            argsets: BTreeMap::new(),
            formats: BTreeMap::new(),
            patterns: Vec::new(),
            auto_argsets: BTreeMap::new(),
        }
    }

    fn line(&mut self, line: &str) -> Result<()> {
        match line.chars().next() {
            Some('%') => {
                let field = parse_field(line)?;
                self.fields.insert(field.name.clone(), field);
            }
            Some('&') => {
                let argset = parse_argset(line)?;
                self.argsets.insert(argset.name.clone(), argset);
            }
            Some('@') => {
                let format = self.format(line)?;
                self.formats.insert(format.name.clone(), format);
            }
            // Overlap groups only affect ordering; the table sorts anyway.
            Some('{' | '}' | '[' | ']') | None => {}
            Some(_) => {
                let pattern = self.pattern(line)?;
                self.patterns.push(pattern);
            }
        }
        Ok(())
    }

    /// Split a definition into its bit pattern and trailing attributes.
    fn split(&self, tokens: &[&str]) -> Result<(BitPatternResult, Attrs)> {
        let body = &tokens[1..];
        let nbits = count_bit_tokens(body);
        let bits = parse_bit_tokens(&body[..nbits], self.width)?;
        let attrs = Attrs::parse(&body[nbits..], &self.fields)?;
        Ok((bits, attrs))
    }

    /// `@name bits... &argset [mappings...]`
    fn format(&self, line: &str) -> Result<Format> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let name = definition_name(&tokens)?;
        let (bits, attrs) = self.split(&tokens)?;
        let mut field_map = attrs.mappings;
        add_inline_fields(&mut field_map, &bits.inline_fields);
        Ok(Format {
            name,
            fixedbits: bits.fixedbits,
            fixedmask: bits.fixedmask,
            args_name: attrs.argset.unwrap_or_default(),
            field_map,
        })
    }

    /// `name bits... [@format] [&argset] [mappings...]`
    fn pattern(&mut self, line: &str) -> Result<Pattern> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let name = tokens[0].to_string();
        let (bits, attrs) = self.split(&tokens)?;

        let mut pattern = Pattern {
            name,
            fixedbits: bits.fixedbits,
            fixedmask: bits.fixedmask,
            args_name: String::new(),
            field_map: BTreeMap::new(),
        };

        if let Some(fname) = &attrs.format {
            let format = self
                .formats
                .get(fname)
                .ok_or_else(|| DecodeTreeError::UnknownFormat(fname.clone()))?;
            pattern.fixedbits |= format.fixedbits;
            pattern.fixedmask |= format.fixedmask;
            pattern.args_name = format.args_name.clone();
            pattern.field_map = format.field_map.clone();
            pattern.field_map.extend(attrs.mappings);
            return Ok(pattern);
        }

        pattern.field_map = attrs.mappings;
        add_inline_fields(&mut pattern.field_map, &bits.inline_fields);
        pattern.args_name = match attrs.argset {
            Some(argset) => argset,
            None if pattern.field_map.is_empty() => String::new(),
            None => {
                let auto = ArgSet {
                    name: format!("_auto_{}", pattern.name),
                    fields: pattern.field_map.keys().cloned().collect(),
                    is_extern: false,
                };
                let name = auto.name.clone();
                self.auto_argsets.insert(name.clone(), auto);
                name
            }
        };
        Ok(pattern)
    }

    fn finish(mut self) -> Parsed {
        self.argsets.append(&mut self.auto_argsets);
        Parsed {
            fields: self.fields,
            argsets: self.argsets,
            patterns: self.patterns,
        }
    }
}

/// Parse a decode file whose instructions are `width` bits wide.
///
/// Errors are wrapped in `DecodeTreeError::Line` with the 1-based
/// logical line number.
pub fn parse_with_width(input: &str, width: u32) -> Result<Parsed> {
    let mut parser = Parser::new(width);
    for (index, raw) in merge_continuations(input).lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        parser.line(line).map_err(|e| DecodeTreeError::Line {
            line: index + 1,
            source: Box::new(e),
        })?;
    }
    Ok(parser.finish())
}

// ── Code generation ────────────────────────────────────────────

pub fn format_hex(val: u32, width: u32) -> String {
    if width <= 16 {
        format!("{val:#06x}")
    } else {
        format!("{val:#010x}")
    }
}

pub fn to_camel(s: &str) -> String {
    s.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
                .unwrap_or_default()
        })
        .collect()
}

fn args_struct_name(args_name: &str) -> String {
    if args_name.is_empty() {
        "ArgsEmpty".to_string()
    } else {
        format!("Args{}", to_camel(args_name))
    }
}

fn low_mask(len: u32) -> u32 {
    u32::MAX.checked_shr(32 - len.min(32)).unwrap_or(0)
}

/// Unique `call_*` function name per pattern, in file order.
fn call_names(patterns: &[Pattern]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    patterns
        .iter()
        .map(|p| {
            let n = seen.entry(p.name.as_str()).or_default();
            *n += 1;
            match *n {
                1 => format!("call_{}", p.name),
                n => format!("call_{}_{n}", p.name),
            }
        })
        .collect()
}

/// Writes generated Rust for instructions of one width.
struct Emitter<'w> {
    w: &'w mut dyn Write,
    width: u32,
}

impl Emitter<'_> {
    fn insn_ty(&self) -> &'static str {
        if self.width <= 16 {
            "u16"
        } else {
            "u32"
        }
    }

    fn signed_ty(&self) -> &'static str {
        if self.width <= 16 {
            "i16"
        } else {
            "i32"
        }
    }

    /// Expression extracting `len` bits at `pos` from `insn`.
    fn bits_expr(&self, pos: u32, len: u32, signed: bool) -> String {
        if !signed {
            return format!("((insn >> {pos}) & {:#x}) as i64", low_mask(len));
        }
        let (ty, left, right) = (self.signed_ty(), self.width - pos - len, self.width - len);
        if left == 0 {
            format!("((insn as {ty}) >> {right}) as i64")
        } else {
            format!("(((insn as {ty}) << {left}) >> {right}) as i64")
        }
    }

    fn arg_structs(&mut self, argsets: &BTreeMap<String, ArgSet>, need_empty: bool) -> Result<()> {
        let mut have_empty = false;
        for argset in argsets.values().filter(|a| !a.is_extern) {
            let sname = args_struct_name(&argset.name);
            have_empty |= sname == "ArgsEmpty";
            writeln!(self.w, "#[derive(Debug, Clone, Copy, Default)]")?;
            writeln!(self.w, "pub struct {sname} {{")?;
            for member in &argset.fields {
                writeln!(self.w, "    pub {member}: i64,")?;
            }
            writeln!(self.w, "}}\n")?;
        }
        if need_empty && !have_empty {
            writeln!(self.w, "#[derive(Debug, Clone, Copy, Default)]")?;
            writeln!(self.w, "pub struct ArgsEmpty {{}}\n")?;
        }
        Ok(())
    }

    fn extractor(&mut self, field: &Field) -> Result<()> {
        let (first, rest) = field
            .segments
            .split_first()
            .ok_or_else(|| DecodeTreeError::BadSegment(field.name.clone()))?;
        let tail = match field.func.as_deref() {
            None => "val".to_string(),
            Some(func) => transform(func)?,
        };

        let ty = self.insn_ty();
        let head = self.bits_expr(first.pos, first.len, first.signed);
        writeln!(self.w, "#[allow(dead_code)]")?;
        writeln!(self.w, "fn extract_{}(insn: {ty}) -> i64 {{", field.name)?;
        writeln!(self.w, "    let val: i64 = {head};")?;
        for seg in rest {
            let next = self.bits_expr(seg.pos, seg.len, false);
            writeln!(self.w, "    let val = (val << {}) | {next};", seg.len)?;
        }
        writeln!(self.w, "    {tail}")?;
        writeln!(self.w, "}}\n")?;
        Ok(())
    }

    fn mapping_expr(&self, mapping: &FieldMapping) -> String {
        match mapping {
            FieldMapping::FieldRef(name) => format!("extract_{name}(insn)"),
            &FieldMapping::Inline { pos, len, signed } => self.bits_expr(pos, len, signed),
            FieldMapping::Const(c) => format!("{c}_i64"),
        }
    }

    fn decode_trait(&mut self, patterns: &[Pattern]) -> Result<()> {
        writeln!(self.w, "pub trait Decode {{")?;
        let mut declared = HashSet::new();
        // Several encodings may share one handler.
        for p in patterns.iter().filter(|p| declared.insert(p.name.as_str())) {
            let sname = args_struct_name(&p.args_name);
            writeln!(self.w, "    fn trans_{}(&mut self, a: &{sname}) -> bool;", p.name)?;
        }
        writeln!(self.w, "}}\n")?;
        Ok(())
    }

    fn call_fn(&mut self, p: &Pattern, call: &str, members: &[String]) -> Result<()> {
        let sname = args_struct_name(&p.args_name);
        let ty = self.insn_ty();
        writeln!(self.w, "fn {call}<T: Decode + ?Sized>(ctx: &mut T, insn: u32) -> bool {{")?;
        if self.width <= 16 {
            writeln!(self.w, "    let insn = insn as {ty};")?;
        }
        if members.is_empty() {
            writeln!(self.w, "    let _ = insn;")?;
            writeln!(self.w, "    ctx.trans_{}(&{sname} {{}})", p.name)?;
        } else {
            writeln!(self.w, "    let a = {sname} {{")?;
            for member in members {
                let value = p
                    .field_map
                    .get(member)
                    .map_or_else(|| "0".to_string(), |m| self.mapping_expr(m));
                writeln!(self.w, "        {member}: {value},")?;
            }
            writeln!(self.w, "    }};")?;
            writeln!(self.w, "    ctx.trans_{}(&a)", p.name)?;
        }
        writeln!(self.w, "}}\n")?;
        Ok(())
    }

    /// `matchers()` expects a `Matcher<T>` type in scope with a
    /// `new(name, mask, expect, handler)` constructor.
    fn matchers(&mut self, patterns: &[Pattern], calls: &[String]) -> Result<()> {
        writeln!(self.w, "pub fn matchers<T: Decode>() -> Vec<Matcher<T>> {{")?;
        writeln!(self.w, "    vec![")?;
        for (p, call) in patterns.iter().zip(calls) {
            let mask = format_hex(p.fixedmask, self.width);
            let bits = format_hex(p.fixedbits, self.width);
            writeln!(self.w, "        Matcher::new(\"{}\", {mask}, {bits}, {call}::<T>),", p.name)?;
        }
        writeln!(self.w, "    ]")?;
        writeln!(self.w, "}}")?;
        Ok(())
    }
}

/// Final expression for a `!function=` transform.
///
/// Supported: `ex_shift_N` (scale by `1 << N`) and `ex_plus_N` (add `N`).
fn transform(func: &str) -> Result<String> {
    let unknown = || DecodeTreeError::UnknownFunction(func.to_string());
    if let Some(n) = func.strip_prefix("ex_shift_") {
        let n: u32 = n.parse().map_err(|_| unknown())?;
        Ok(format!("val << {n}"))
    } else if let Some(n) = func.strip_prefix("ex_plus_") {
        let n: i64 = n.parse().map_err(|_| unknown())?;
        Ok(format!("val + {n}"))
    } else {
        Err(unknown())
    }
}

// ── Public API ─────────────────────────────────────────────────

pub fn generate_with_width(input: &str, output: &mut dyn Write, width: u32) -> Result<()> {
    let parsed = parse_with_width(input, width)?;
    let need_empty = parsed.patterns.iter().any(|p| p.args_name.is_empty());
    let calls = call_names(&parsed.patterns);

    let mut out = Emitter { w: output, width };
    writeln!(out.w, "// Auto-generated by decodetree.")?;
    writeln!(out.w, "// Do not edit.\n")?;
    out.arg_structs(&parsed.argsets, need_empty)?;
    for field in parsed.fields.values() {
        out.extractor(field)?;
    }
    out.decode_trait(&parsed.patterns)?;
    for (p, call) in parsed.patterns.iter().zip(&calls) {
        let members = parsed
            .argsets
            .get(&p.args_name)
            .map_or(&[][..], |a| a.fields.as_slice());
        out.call_fn(p, call, members)?;
    }
    out.matchers(&parsed.patterns, &calls)?;
    Ok(())
}

pub fn generate(input: &str, output: &mut dyn Write) -> Result<()> {
    generate_with_width(input, output, 32)
}
