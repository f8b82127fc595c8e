//! sealbox-archive: selection packing, container unpacking, and the capacity gate
//!
//! # Overview
//! - `capacity`: payload ceiling derived from available system memory
//! - `naming`: case-insensitive top-level name allocation (`report (2).txt`)
//! - `pack`: files and directory trees → in-memory ZIP container
//! - `unpack`: ZIP container → files on disk, or a logical entry listing

pub mod capacity;
pub mod naming;
pub mod pack;
pub mod unpack;

pub use capacity::CapacityGate;
pub use naming::NameAllocator;
pub use pack::{measure, pack, plan, PackOptions, PackedContainer, PlannedEntry};
pub use unpack::{read_entries, unpack, UnpackReport};
