//! SVN CLI wrapper.

pub mod client;
pub mod parser;

pub use client::SvnClient;
pub use parser::*;
