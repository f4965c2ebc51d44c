//! Database operations for tags.

use rusqlite::{Connection, Row};

use crate::{Error, UserId};

use super::{Tag, TagKind, TagName};

/// Add `name` to the user's vocabulary for `kind` if it is not already there.
///
/// Record writes call this inside the same SQL transaction as the record
/// insert or update, so a novel category and the record referencing it land
/// atomically.
pub(crate) fn ensure_tag(
    user_id: UserId,
    kind: TagKind,
    name: &TagName,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT OR IGNORE INTO tag (user_id, kind, name) VALUES (?1, ?2, ?3);",
        (user_id, kind.as_str(), name.as_ref()),
    )?;

    Ok(())
}

/// Retrieve the user's tags for `kind`, ordered alphabetically by name.
pub(crate) fn get_tags_by_kind(
    user_id: UserId,
    kind: TagKind,
    connection: &Connection,
) -> Result<Vec<Tag>, Error> {
    connection
        .prepare(
            "SELECT user_id, kind, name FROM tag
             WHERE user_id = ?1 AND kind = ?2
             ORDER BY name ASC;",
        )?
        .query_map((user_id, kind.as_str()), map_row)?
        .map(|maybe_tag| maybe_tag.map_err(|error| error.into()))
        .collect()
}

/// Initialize the tag table and indexes.
pub fn create_tag_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS tag (
            user_id INTEGER NOT NULL,
            kind TEXT NOT NULL,
            name TEXT NOT NULL,
            UNIQUE(user_id, kind, name)
        );

        CREATE INDEX IF NOT EXISTS idx_tag_user_kind ON tag(user_id, kind);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Tag, rusqlite::Error> {
    let user_id = row.get(0)?;
    let raw_kind: String = row.get(1)?;
    let kind = match raw_kind.as_str() {
        "income" => TagKind::Income,
        "expense" => TagKind::Expense,
        _ => TagKind::Inventory,
    };
    let raw_name: String = row.get(2)?;

    Ok(Tag {
        user_id,
        kind,
        name: TagName::new_unchecked(&raw_name),
    })
}
