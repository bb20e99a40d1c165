// Utils compartidos

pub mod constants;
pub mod path;

pub use constants::*;
