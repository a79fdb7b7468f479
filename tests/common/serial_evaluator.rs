use lockstep_gb::cpu::Cpu;
use lockstep_gb::mmu::Memory;

use crate::common::EvaluationSpec;

const PASSED_STR: &[u8] = b"Passed";
const FAILED_STR: &[u8] = b"Failed";

/// Stops once a test ROM reports a verdict over the serial port or on
/// its background map, or once the step budget runs out.
pub struct SerialEvaluator {
    max_steps: u64,
    steps: u64,
}

impl SerialEvaluator {
    pub fn new() -> Self {
        // Slow in debug builds; run ROM suites with --release.
        Self::with_budget(50_000_000)
    }

    pub fn with_budget(max_steps: u64) -> Self {
        Self {
            steps: 0,
            max_steps,
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl EvaluationSpec for SerialEvaluator {
    fn evaluate(&mut self, cpu: &Cpu) -> bool {
        self.steps += 1;
        // The map scrape is pricier, so only now and then.
        if self.steps % 100_000 == 0 {
            let display = scrape_test_result(cpu);
            let bytes = display.as_bytes();
            if contains_bytes(bytes, PASSED_STR) || contains_bytes(bytes, FAILED_STR) {
                return false;
            }
        }

        let serial = cpu.serial_output();
        let scan_range = &serial[serial.len().saturating_sub(100)..];
        if contains_bytes(scan_range, PASSED_STR) || contains_bytes(scan_range, FAILED_STR) {
            return false;
        }

        self.steps < self.max_steps
    }

    fn report(&self, cpu: &Cpu) {
        let output = String::from_utf8_lossy(cpu.serial_output());
        if output.contains("Passed") {
            return;
        }
        let display = scrape_test_result(cpu);
        if display.contains("Passed") {
            return;
        }
        super::dump_log();
        panic!(
            "no pass verdict after {}/{} steps\nserial: {}\n--- Display --------\n{}",
            self.steps, self.max_steps, output, display
        );
    }
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}

/// Reads the visible 20x18 corner of the first background map as ASCII.
/// Most test ROMs map tiles 1:1 to characters.
pub fn scrape_test_result(cpu: &Cpu) -> String {
    let mut lines = Vec::new();
    for y in 0..18u16 {
        let line: String = (0..20u16)
            .map(|x| cpu.bus.read_byte(0x9800 + y * 32 + x))
            .map(|tile| {
                if (32..=126).contains(&tile) {
                    tile as char
                } else {
                    ' '
                }
            })
            .collect();

        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    lines.join("\n")
}
