// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index persistence and snapshots.
//!
//! ```text
//!   IndexWriter ──stage──▶ private IndexSnapshot
//!        │ commit
//!        ├──▶ IndexStore::apply (SQLite file or memory, atomic)
//!        └──▶ publish Arc<IndexSnapshot> (generation + 1)
//!
//!   readers ◀── IndexHandle::snapshot() (lock-free after the Arc clone)
//! ```

mod handle;
pub mod memory;
mod snapshot;
pub mod sqlite;
pub mod traits;

pub use handle::{IndexHandle, IndexState, IndexWriter};
pub use memory::InMemoryIndexStore;
pub use snapshot::IndexSnapshot;
pub use sqlite::SqliteIndexStore;
pub use traits::{CommitStats, IndexError, IndexStore, WriteBatch};
