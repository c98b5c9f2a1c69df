//! Integration test modules.

mod app_session_test;
mod backend_test;
