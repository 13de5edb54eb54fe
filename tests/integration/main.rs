//! Integration tests for notecue

mod helpers;

mod cli_test;
mod engine_scenarios_test;
mod parse_test;
mod stamp_test;
