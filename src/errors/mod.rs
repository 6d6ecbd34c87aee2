pub mod classification;
pub mod types;

pub use types::ConsoleError;
