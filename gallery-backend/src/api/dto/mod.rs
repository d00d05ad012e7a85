// src/api/dto/mod.rs
pub mod submission_dto;
