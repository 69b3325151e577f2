// System Layer
pub mod config;
pub mod filesystem;
pub mod launcher;

pub use config::Config;
pub use filesystem::{FileSystem, LocalFileSystem};
pub use launcher::{ProcessLauncher, SystemLauncher};
