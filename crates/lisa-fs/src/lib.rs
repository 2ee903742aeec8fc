//! Filesystem primitives for Lisa
//!
//! Provides forward-slash relative path handling, atomic writes and the
//! recursive listing used to walk authoritative template trees.

pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use error::{Error, Result};
pub use io::{copy_file, ensure_parent_dir, files_identical, read_text, write_atomic, write_text};
pub use path::NormalizedPath;
pub use walk::list_files_recursive;
