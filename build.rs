// build.rs
use std::{fs, path::Path};

/// Emits one `#[test]` per acceptance ROM found under `tests/roms`.
/// The generated file is pulled in by `tests/rom_tests.rs`.
fn generate_rom_tests() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let destination = Path::new(&out_dir).join("generated_rom_tests.rs");

    let mut test_code = String::new();
    let roms = glob::glob("tests/roms/**/*.gb").expect("Failed to read glob pattern");

    for entry in roms.filter_map(Result::ok) {
        let Some(path) = entry.to_str() else {
            continue;
        };
        let name = path
            .replace("/", "_")
            .replace("\\", "_")
            .replace(")", "_")
            .replace("(", "_")
            .replace(",", "_")
            .replace(" ", "_")
            .replace("-", "_")
            .replace(".", "_")
            .replace("__", "_");

        let name = name.strip_prefix("tests_roms_").unwrap_or(&name);

        test_code.push_str(&format!(
            "#[test] fn rom_{}() {{ run_test(r#\"{}\"#); }}\n",
            name.to_lowercase(),
            path
        ));
    }

    fs::write(destination, test_code).unwrap();
}

fn main() {
    println!("cargo:rerun-if-changed=tests/roms");
    generate_rom_tests();
}
