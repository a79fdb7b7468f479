use std::path::Path;

use lockstep_gb::{
    cartridge::{self, Cartridge},
    cpu::Cpu,
};

use crate::common::{EvaluationSpec, RuntimeSession};

pub struct RuntimeBuilder<E: EvaluationSpec> {
    rom_data: Option<Vec<u8>>,
    boot_data: Option<Vec<u8>>,
    evaluator: E,
}

impl RuntimeBuilder<NoopEvaluator> {
    pub fn new() -> Self {
        Self {
            rom_data: None,
            boot_data: None,
            evaluator: NoopEvaluator,
        }
    }
}

impl<E: EvaluationSpec> RuntimeBuilder<E> {
    pub fn with_rom_path(self, rom_path: &Path) -> Self {
        let buffer = cartridge::load_rom(rom_path).unwrap();
        self.with_rom_data(buffer)
    }

    pub fn with_rom_data(mut self, data: Vec<u8>) -> Self {
        self.rom_data = Some(data);
        self
    }

    pub fn with_boot_data(mut self, data: Vec<u8>) -> Self {
        self.boot_data = Some(data);
        self
    }

    /// Swap the current evaluator for a different one
    pub fn with_evaluator<NewE: EvaluationSpec>(self, eval: NewE) -> RuntimeBuilder<NewE> {
        RuntimeBuilder {
            rom_data: self.rom_data,
            boot_data: self.boot_data,
            evaluator: eval,
        }
    }

    pub fn build(self) -> RuntimeSession<E> {
        let rom = self.rom_data.expect("no ROM given to the runtime builder");
        let cartridge = Cartridge::new(rom, self.boot_data).unwrap();
        let cpu = Cpu::with_frame_buffer(cartridge).unwrap();

        RuntimeSession {
            cpu,
            evaluator: self.evaluator,
        }
    }
}

/// A fallback evaluator that does nothing.
pub struct NoopEvaluator;

impl EvaluationSpec for NoopEvaluator {}
