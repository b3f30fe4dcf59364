pub mod settings;
pub mod speech;
