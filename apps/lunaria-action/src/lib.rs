//! Lunaria action core library.
//!
//! This crate exposes the building blocks of the Lunaria pull request
//! action: deciding which changed files Lunaria tracks, classifying how the
//! pull request changes their localization status, and keeping a single
//! summary comment on the pull request up to date.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Settings discovery and effective settings resolution.
//! - `engine`: Locating and running the `@lunariajs/core` status engine.
//! - `pattern`: `@lang`/`@path` path templates and shared paths.
//! - `matcher`: File rule matching against changed filenames.
//! - `classify`: Status labels, notes, and the outdated warning.
//! - `comment`: Markdown rendering of the summary comment.
//! - `github`: REST client and lazy pagination.
//! - `publish`: Find-or-create of the marked comment.
//! - `action`: Event gating and the end-to-end run.
//! - `models`: Payload, REST and engine data models.
//! - `output`: Human/JSON printers for a finished run.
//! - `utils`: Console prefixes and workflow commands.
pub mod action;
pub mod classify;
pub mod cli;
pub mod comment;
pub mod config;
pub mod engine;
pub mod error;
pub mod github;
pub mod matcher;
pub mod models;
pub mod output;
pub mod pattern;
pub mod publish;
pub mod utils;
