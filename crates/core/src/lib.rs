#![forbid(unsafe_code)]

pub mod model;
pub mod prompt;

pub use prompt::{SYSTEM_PROMPT, render_prompt};
