use std::collections::VecDeque;
use std::sync::Mutex;

use log::{LevelFilter, Metadata, Record};

/// Enough trace lines to see the instructions leading up to a failure.
const RING_BUFFER_SIZE: usize = 60;

lazy_static::lazy_static! {
    static ref LOG_BUFFER: Mutex<VecDeque<String>> =
        Mutex::new(VecDeque::with_capacity(RING_BUFFER_SIZE));
}

/// Keeps only the most recent log lines, for dumping when a test fails.
struct RingLogger;

impl log::Log for RingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let Ok(mut buffer) = LOG_BUFFER.lock() else {
            return;
        };
        if buffer.len() >= RING_BUFFER_SIZE {
            buffer.pop_front();
        }
        buffer.push_back(format!("{}", record.args()));
    }

    fn flush(&self) {}
}

/// Installs the ring logger. Later calls in the same test binary are no-ops.
pub fn init_logger() {
    if log::set_logger(&RingLogger).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

pub fn lines() -> Vec<String> {
    LOG_BUFFER
        .lock()
        .map(|buffer| buffer.iter().cloned().collect())
        .unwrap_or_default()
}

pub fn dump_log() {
    let lines = lines();
    if lines.is_empty() {
        println!("Log buffer is empty.");
        return;
    }

    println!("--- LAST {} LOG LINES ---", lines.len());
    let len = lines.len() as i32;
    for (i, line) in lines.iter().enumerate() {
        // Relative index, the newest line is 0.
        println!("{:>3}. {}", i as i32 - len + 1, line);
    }
}
