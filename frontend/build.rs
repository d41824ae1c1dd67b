use std::env;
use std::fs;
use std::path::Path;

const DECODE_FILES: &[(&str, &str)] = &[
    ("decode/arm.decode", "arm_decode.rs"),
    ("decode/vfp.decode", "vfp_decode.rs"),
];

fn main() {
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");

    for &(src, dst) in DECODE_FILES {
        let decode_file = Path::new(src);
        println!("cargo::rerun-if-changed={}", decode_file.display());

        let input = fs::read_to_string(decode_file)
            .unwrap_or_else(|e| panic!("failed to read {src}: {e}"));

        let mut output = Vec::new();
        if let Err(e) = decodetree::generate(&input, &mut output) {
            panic!("decodetree code generation failed for {src}: {e}");
        }

        let out_path = Path::new(&out_dir).join(dst);
        fs::write(&out_path, output)
            .unwrap_or_else(|e| panic!("failed to write {dst}: {e}"));
    }
}
