//! Shared fakes for integration tests: a scripted pool/session pair, a
//! recording telemetry sink, and a slow upstream reader.

#![allow(dead_code)]

pub mod scripted_pool;
pub mod trickle;
