//! UCI in both directions: serving our own searcher, and driving an external engine.
pub mod client;
pub mod server;

pub use client::UciProcess;
pub use server::UciEngine;
