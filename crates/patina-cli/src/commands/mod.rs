pub mod blend;
pub mod config;
pub mod extract;
pub mod utils;
