//! Token record store

mod memory;


pub use memory::InMemoryTokenRecordRepository;
