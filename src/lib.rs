pub mod app;
pub mod audio;
pub mod core;
pub mod messaging;
pub mod settings;
pub mod ui;
pub mod utils;
