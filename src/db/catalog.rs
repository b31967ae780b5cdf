/// Project and tag administration queries. Both tables share one shape.
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::JournalError;
use crate::types::{CatalogId, CatalogItem, CatalogKind};

pub fn list_items(kind: CatalogKind, include_inactive: bool, conn: &Connection) -> Result<Vec<CatalogItem>> {
    let filter = if include_inactive { "" } else { "WHERE active = 1" };
    let mut stmt = conn.prepare(&format!(
        "SELECT id, name, description, color, active FROM {} {filter} ORDER BY name",
        kind.table()
    ))?;
    let rows = stmt.query_map([], |row| {
        Ok(CatalogItem {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            color: row.get(3)?,
            active: row.get(4)?,
        })
    })?;
    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

pub fn query_item_by_name(kind: CatalogKind, name: &str, conn: &Connection) -> Result<Option<CatalogItem>> {
    let item = conn
        .query_row(
            &format!(
                "SELECT id, name, description, color, active FROM {} WHERE name = ?1",
                kind.table()
            ),
            [name],
            |row| {
                Ok(CatalogItem {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    color: row.get(3)?,
                    active: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(item)
}

/// Creates an active item. Without a color one is picked from the palette.
pub fn create_item(
    kind: CatalogKind,
    name: &str,
    description: Option<&str>,
    color: Option<&str>,
    conn: &Connection,
) -> Result<CatalogId> {
    let color = color.map(str::to_string).unwrap_or_else(crate::color::random_color);
    conn.execute(
        &format!(
            "INSERT INTO {} (name, description, color, active) VALUES (?1, ?2, ?3, 1)",
            kind.table()
        ),
        params![name.trim(), description, color],
    )?;
    let id = conn.last_insert_rowid() as CatalogId;
    tracing::info!(kind = kind.label(), id, name, "catalog item created");
    Ok(id)
}

pub fn update_item(
    kind: CatalogKind,
    id: CatalogId,
    name: &str,
    description: Option<&str>,
    color: &str,
    conn: &Connection,
) -> Result<()> {
    let changed = conn.execute(
        &format!(
            "UPDATE {} SET name = ?1, description = ?2, color = ?3 WHERE id = ?4",
            kind.table()
        ),
        params![name.trim(), description, color, id],
    )?;
    if changed == 0 {
        return Err(JournalError::CatalogItemNotFound { kind, id }.into());
    }
    tracing::info!(kind = kind.label(), id, "catalog item updated");
    Ok(())
}

pub fn delete_item(kind: CatalogKind, id: CatalogId, conn: &Connection) -> Result<()> {
    let changed = conn.execute(&format!("DELETE FROM {} WHERE id = ?1", kind.table()), [id])?;
    if changed == 0 {
        return Err(JournalError::CatalogItemNotFound { kind, id }.into());
    }
    tracing::info!(kind = kind.label(), id, "catalog item deleted");
    Ok(())
}

/// Flips the active flag and returns the new value.
pub fn toggle_item_status(kind: CatalogKind, id: CatalogId, conn: &Connection) -> Result<bool> {
    let active: Option<bool> = conn
        .query_row(
            &format!("UPDATE {} SET active = NOT active WHERE id = ?1 RETURNING active", kind.table()),
            [id],
            |row| row.get(0),
        )
        .optional()?;
    let active = active.ok_or(JournalError::CatalogItemNotFound { kind, id })?;
    tracing::info!(kind = kind.label(), id, active, "catalog item toggled");
    Ok(active)
}

pub fn list_projects(include_inactive: bool, conn: &Connection) -> Result<Vec<CatalogItem>> {
    list_items(CatalogKind::Project, include_inactive, conn)
}

pub fn list_tags(include_inactive: bool, conn: &Connection) -> Result<Vec<CatalogItem>> {
    list_items(CatalogKind::Tag, include_inactive, conn)
}

pub fn create_project(
    name: &str,
    description: Option<&str>,
    color: Option<&str>,
    conn: &Connection,
) -> Result<CatalogId> {
    create_item(CatalogKind::Project, name, description, color, conn)
}

pub fn create_tag(
    name: &str,
    description: Option<&str>,
    color: Option<&str>,
    conn: &Connection,
) -> Result<CatalogId> {
    create_item(CatalogKind::Tag, name, description, color, conn)
}

pub fn update_project(
    id: CatalogId,
    name: &str,
    description: Option<&str>,
    color: &str,
    conn: &Connection,
) -> Result<()> {
    update_item(CatalogKind::Project, id, name, description, color, conn)
}

pub fn update_tag(
    id: CatalogId,
    name: &str,
    description: Option<&str>,
    color: &str,
    conn: &Connection,
) -> Result<()> {
    update_item(CatalogKind::Tag, id, name, description, color, conn)
}

pub fn delete_project(id: CatalogId, conn: &Connection) -> Result<()> {
    delete_item(CatalogKind::Project, id, conn)
}

pub fn delete_tag(id: CatalogId, conn: &Connection) -> Result<()> {
    delete_item(CatalogKind::Tag, id, conn)
}

pub fn toggle_project_status(id: CatalogId, conn: &Connection) -> Result<bool> {
    toggle_item_status(CatalogKind::Project, id, conn)
}

pub fn toggle_tag_status(id: CatalogId, conn: &Connection) -> Result<bool> {
    toggle_item_status(CatalogKind::Tag, id, conn)
}
