//! # Repositories
//!
//! Data access implementations over the connection pool. The snapshot
//! repository is the whole persistence contract: the engine requires a
//! key-value store of tenant state blobs, nothing more.

pub mod snapshot;
