pub mod clipboard;
pub mod local;
pub mod metadata;
pub mod operations;
pub mod service;
pub mod watcher;

#[cfg(test)]
pub mod memory;
