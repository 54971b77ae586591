//! kitchain CLI library.
//!
//! This crate provides the command implementations for the `kitchain`
//! binary: chaining WAV samples into sliced kits and inspecting the slice
//! tables of existing kits. All audio and format work lives in
//! `kitchain-core`; this layer validates user input, forwards progress and
//! renders results.

pub mod commands;
