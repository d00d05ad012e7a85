// src/service/mod.rs
pub mod listing_service;
pub mod storage_service;
pub mod submission_service;
