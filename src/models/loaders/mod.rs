pub mod toml_loader;

pub use toml_loader::{load_snapshot, save_snapshot, LibrarySnapshot, SnapshotItem};
