// src/api/handlers/mod.rs
pub mod submission_handler;
pub mod system_handler;
