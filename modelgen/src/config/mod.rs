//! Configuration for generation runs

pub mod defaults;
mod settings;

pub use settings::GeneratorConfig;
