// Common utilities and constants shared by all modules
pub mod constants;
pub mod utils;
