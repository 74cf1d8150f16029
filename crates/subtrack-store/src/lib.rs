//! Subscription stores for subtrack
//!
//! This crate implements the repository traits from `subtrack-core` over
//! process memory and over a JSON document on disk.

pub mod json_file;
pub mod memory;
pub mod snapshot;

pub use json_file::JsonFileRepository;
pub use memory::MemoryRepository;
pub use snapshot::StoreSnapshot;
