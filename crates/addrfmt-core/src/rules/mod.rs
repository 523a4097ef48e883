//! Built-in rule data and the patterns shared by parser and formatter.

pub mod generic;
pub mod patterns;
