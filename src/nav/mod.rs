//! The common navigator: tree state, toolbar commands and the explorer
//! that keeps them in step with the editor input.

pub mod commands;
pub mod editor_input;
pub mod events;
pub mod explorer;
pub mod file_commands;
pub mod renderer;
pub mod selection;
pub mod tree;
