pub mod dialog;
pub mod editor;
pub mod menu;
pub mod status_bar;
pub mod toolbar;
pub mod tree;
