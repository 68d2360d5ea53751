pub mod config;
pub mod context;
pub mod docx;
pub mod extract;
pub mod markup;
pub mod progress;
pub mod render;
