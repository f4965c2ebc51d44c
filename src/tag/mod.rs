//! Per-user, per-kind category vocabulary.
//!
//! Tags are created lazily: writing a record with a novel category name
//! upserts the matching tag in the same unit of work. Tags are never deleted.

mod db;
mod domain;
mod list;

pub(crate) use db::{ensure_tag, get_tags_by_kind};
pub use db::create_tag_table;
pub(crate) use domain::{Tag, TagKind, TagName};
pub use list::get_tags_page;
