pub mod common;
pub mod mcp;
pub mod odt;
pub mod tools;
