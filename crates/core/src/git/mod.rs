//! Git CLI wrapper.

pub mod client;
pub mod parser;

pub use client::GitClient;
pub use parser::*;
