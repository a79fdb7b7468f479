use clap::Parser;

use lockstep_gb::args::Args;

fn main() {
    let args = Args::parse();
    if let Err(e) = lockstep_gb::rom_exec(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
