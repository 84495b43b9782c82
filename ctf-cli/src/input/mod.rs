//! Input handling module

pub mod file_reader;
pub mod resolver;

pub use file_reader::FileReader;
pub use resolver::{resolve_inputs, ResolvedInputs};
