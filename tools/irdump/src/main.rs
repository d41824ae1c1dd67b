//! dbt-irdump: A32 machine code to IR dump tool.
//!
//! Reads guest ARM words (from the command line or a raw little-endian
//! image), translates them block-by-block and prints the IR of every
//! block in a human-readable format.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use dbt_core::{dump_block_io, Block, LocationDescriptor};
use dbt_frontend::a32::decode;
use dbt_frontend::{translate, translate_single_instruction, TranslationOptions};

/// `UDF #0`, returned for fetches outside the loaded image.
const OUT_OF_IMAGE_WORD: u32 = 0xe7f0_00f0;

#[derive(Parser, Debug)]
#[command(
    name = "dbt-irdump",
    about = "Translate A32 machine code into IR blocks and print them."
)]
struct Args {
    /// Instruction words in hex (e.g. e0810002 0a000000)
    #[arg(value_name = "WORD", value_parser = parse_hex)]
    words: Vec<u32>,

    /// Raw little-endian image to load instead of WORD arguments
    #[arg(short, long, value_name = "FILE", conflicts_with = "words")]
    input: Option<PathBuf>,

    /// Guest address the first word is loaded at
    #[arg(long, value_name = "HEX", value_parser = parse_hex, default_value = "0")]
    base: u32,

    /// Address translation starts at (defaults to --base)
    #[arg(long, value_name = "HEX", value_parser = parse_hex, conflicts_with = "single")]
    start: Option<u32>,

    /// Maximum number of blocks to translate
    #[arg(long, value_name = "N", conflicts_with = "single")]
    count: Option<usize>,

    /// Maximum guest instructions per block
    #[arg(long, value_name = "N", conflicts_with = "single")]
    max_insns: Option<usize>,

    /// Translate each word on its own with translate_single_instruction,
    /// which always uses the default translation options
    #[arg(long, action = clap::ArgAction::SetTrue)]
    single: bool,

    /// Decode with the base ARM table only
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "single")]
    no_vfp: bool,

    /// Give UNPREDICTABLE encodings a defined behaviour
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "single")]
    define_unpredictable: bool,

    /// Raise exceptions for hint instructions
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "single")]
    hook_hints: bool,

    /// Emit an explicit shift for LSL #0 operands
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "single")]
    strict_imm_shift: bool,

    /// Output to file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> TranslationOptions {
        TranslationOptions {
            enable_vfp: !self.no_vfp,
            define_unpredictable_behaviour: self.define_unpredictable,
            hook_hint_instructions: self.hook_hints,
            strict_imm_shift: self.strict_imm_shift,
            max_instructions: self.max_insns,
        }
    }
}

fn parse_hex(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid hex `{s}`: {e}"))
}

/// Guest code loaded at a fixed base address.
struct Image {
    base: u32,
    words: Vec<u32>,
}

impl Image {
    fn load(args: &Args) -> Result<Self> {
        let words = match &args.input {
            Some(path) => {
                let data = fs::read(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                if data.len() % 4 != 0 {
                    bail!(
                        "{}: size {} is not a multiple of 4",
                        path.display(),
                        data.len()
                    );
                }
                data.chunks_exact(4)
                    .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect()
            }
            None => args.words.clone(),
        };
        if words.is_empty() {
            bail!("no instructions given (pass WORD arguments or --input)");
        }
        Ok(Self { base: args.base, words })
    }

    fn end(&self) -> u64 {
        self.base as u64 + 4 * self.words.len() as u64
    }

    fn contains(&self, pc: u32) -> bool {
        pc >= self.base && (pc as u64) < self.end()
    }

    fn fetch(&self, pc: u32) -> u32 {
        if !self.contains(pc) {
            return OUT_OF_IMAGE_WORD;
        }
        self.words[(pc - self.base) as usize / 4]
    }
}

fn dump_single(image: &Image, w: &mut impl Write) -> Result<()> {
    for (i, &insn) in image.words.iter().enumerate() {
        let pc = image.base.wrapping_add(4 * i as u32);
        let location = LocationDescriptor::arm(pc);
        let mut block = Block::new(location);
        let cont = translate_single_instruction(&mut block, location, insn);

        writeln!(w, "insn @ 0x{pc:08x}: {insn:08x}")?;
        dump_block_io(&block, w)?;
        writeln!(w, "continue = {cont}")?;
        writeln!(w)?;
    }
    Ok(())
}

fn dump_blocks(
    image: &Image,
    start: u32,
    count: usize,
    options: &TranslationOptions,
    w: &mut impl Write,
) -> Result<usize> {
    let mut pc = start;
    let mut blocks = 0usize;

    while image.contains(pc) && blocks < count {
        let location = LocationDescriptor::arm(pc);
        let block = translate(location, |addr| image.fetch(addr), options);

        writeln!(w, "Block #{blocks} @ 0x{pc:08x}")?;
        for addr in (pc..block.end_location().pc()).step_by(4) {
            let insn = image.fetch(addr);
            let name = decode::decode(insn, options).map_or("<undefined>", |m| m.name());
            writeln!(w, "  {addr:08x}: {insn:08x}  {name}")?;
        }
        dump_block_io(&block, w)?;
        writeln!(w)?;

        blocks += 1;
        // A block that stopped without advancing cannot make progress.
        let next = block.end_location().pc();
        if next == pc {
            break;
        }
        pc = next;
    }
    Ok(blocks)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let image = Image::load(&args)?;
    let options = args.options();

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => {
            let f = fs::File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            Box::new(BufWriter::new(f))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if args.single {
        dump_single(&image, &mut out)?;
    } else {
        let start = args.start.unwrap_or(image.base);
        if !image.contains(start) {
            bail!("start address 0x{start:08x} is outside the image");
        }
        let count = args.count.unwrap_or(usize::MAX);
        let blocks = dump_blocks(&image, start, count, &options, &mut out)?;
        info!("translated {blocks} block(s)");
    }

    out.flush()?;
    Ok(())
}
