//! Conversational turn pipeline.

pub mod orchestrator;
