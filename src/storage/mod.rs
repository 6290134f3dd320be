//! Storage implementations for the CRM core

pub mod in_memory;

pub use in_memory::InMemoryStore;
