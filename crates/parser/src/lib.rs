// slash-parser: parse bridge and pipeline worker adapter (embedded in Tauri).

pub mod bridge;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod worker;
