pub mod error;
pub mod process;
pub mod time;
