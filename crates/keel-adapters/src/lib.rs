//! Infrastructure adapters for Keel.
//!
//! This crate implements the ports defined in `keel-core::application::ports`
//! and loads graph snapshots from disk. All process spawning and file I/O
//! lives here.

pub mod filesystem;
pub mod graph_loader;
pub mod xcode;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use graph_loader::JsonGraphLoader;
pub use xcode::{FixedXcodeController, XcodeBuildController};
