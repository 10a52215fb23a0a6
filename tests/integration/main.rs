//! Integration tests for pairqc.
//!
//! These tests drive the library across module boundaries and the built binary end to end.

mod test_error_paths;
mod test_pipeline_concurrency;
mod test_properties;
mod test_read_through_scenario;
