pub mod package;
pub mod tree;
pub mod xml;
