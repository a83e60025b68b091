//! tagfilter CLI - compile JSON filters into parameterized SQL.
//!
//! This crate provides the `tagfilter` binary, which loads a TOML model
//! description and compiles filter payloads against it.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
