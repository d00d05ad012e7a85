// src/domain/mod.rs
pub mod image_model;
pub mod submission;
pub mod submitter_model;
