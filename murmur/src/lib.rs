//! Murmur turns spoken commands from a wearable transcription device into
//! on-chain transfers and swaps. A webhook receives transcript batches,
//! segments out delimited command utterances, maps each to a structured
//! intent through an LLM extraction call, executes the intents against a
//! custody service, and records every attempted settlement in a ledger.

pub mod api;
pub mod config;
pub mod db;
pub mod directory;
pub mod engine;
pub mod error;
pub mod extraction;
pub mod llm;
pub mod models;
pub mod segmenter;
pub mod wallet;
