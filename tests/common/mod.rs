// Each test binary uses a different slice of these helpers.
#![allow(dead_code)]

pub mod ring_logger;
pub mod rom_image;
pub mod runtime_builder;
pub mod runtime_session;
pub mod serial_evaluator;

pub use ring_logger::{dump_log, init_logger};
pub use rom_image::RomImage;
pub use runtime_builder::{NoopEvaluator, RuntimeBuilder};
pub use runtime_session::{EvaluationSpec, RuntimeSession};
