// tests/integration/mod.rs

pub mod listing_tests;
pub mod submission_tests;
