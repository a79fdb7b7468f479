pub mod args;
pub mod bits;
pub mod cartridge;
pub mod constants;
pub mod cpu;
pub mod input;
pub mod interrupt;
pub mod mmu;
pub mod ppu;
pub mod timer;

use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use log::info;

use crate::constants::*;
use crate::cpu::Cpu;
use crate::ppu::terminal::display_frame;

pub fn setup_logging(log_path: &Option<PathBuf>) -> Result<(), io::Error> {
    let env = env_logger::Env::default().default_filter_or("info");
    let mut builder = env_logger::Builder::from_env(env);
    // Bare lines, so trace output diffs cleanly against reference logs.
    builder.format(|buf, record| writeln!(buf, "{}", record.args()));

    if let Some(path) = log_path {
        let file = std::fs::File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

/// Loads the cartridge named by `args` and runs it until the frame limit,
/// or forever when there is none.
pub fn rom_exec(args: args::Args) -> Result<(), Box<dyn Error>> {
    setup_logging(&args.log_path)?;
    let cartridge = cartridge::load_cartridge(&args.load_rom, args.boot_rom.as_deref())?;
    let cpu = Cpu::with_frame_buffer(cartridge)?;
    main_loop(cpu, &args);
    Ok(())
}

/// One frame per iteration: run, present, then sleep off the remainder
/// of the frame period.
fn main_loop(mut cpu: Cpu, args: &args::Args) {
    let mut last_frame_time = Instant::now();
    let mut frames: u64 = 0;
    loop {
        cpu.run_frame();
        frames += 1;

        if !args.headless {
            display_frame(cpu.screen());

            let elapsed = last_frame_time.elapsed();
            if elapsed < FRAME_DURATION {
                std::thread::sleep(FRAME_DURATION - elapsed);
            }
            last_frame_time = Instant::now();
        }

        if args.frames.is_some_and(|limit| frames >= limit) {
            break;
        }
    }

    let serial = cpu.serial_output();
    if !serial.is_empty() {
        info!("Serial output: {}", String::from_utf8_lossy(serial));
    }
    info!("Stopped after {} frames", frames);
}
