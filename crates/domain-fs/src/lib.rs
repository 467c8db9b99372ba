//! Filesystem access for domain configuration files
//!
//! Provides normalized path handling, atomic locked writes, content checksums,
//! a format-agnostic [`ConfigStore`] and the [`ConfigSource`] abstraction the
//! reconciliation flow reads domain configurations from.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod source;

pub use checksum::compute_content_checksum;
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::{NormalizedPath, validate_path_identifier};
pub use source::{ConfigSource, DomainKey, FsConfigSource, MemoryConfigSource};
