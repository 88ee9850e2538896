pub mod entries;
pub mod settings;
pub mod setup;
pub mod summary;
pub mod ui;
pub mod watch;
