// src/repository/mod.rs
pub mod image_repository;
pub mod submitter_repository;
