//! End-to-end tests for the command-line front end
//!
//! Tests are organized by topic:
//! - `commands` - Each subcommand run against a scenario file
