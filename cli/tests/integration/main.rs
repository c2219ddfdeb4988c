//! Integration tests for the summon CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! Every test points `SUMMON_CONFIG` at a temp file and configures a backend
//! binary that does not exist, so nothing ever reaches a real controller.

mod cli_tests;
mod credentials_command;
