//! flex-json-util - helpers that sit next to flex-json documents.

pub mod fs_move;
pub mod group;
pub mod uuid;

pub use fs_move::{move_dir, move_file};
pub use group::separate_by_value;
pub use uuid::{generate_uuid, generate_uuid_with};
