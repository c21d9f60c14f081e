//! Integration test modules.

mod hydration_reload_test;
mod lead_endpoint_test;
