pub mod error;
pub mod sensitive;
pub mod settings;
