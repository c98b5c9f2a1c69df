//! Unit test modules.

mod progression_test;
mod program_file_test;
mod store_test;
