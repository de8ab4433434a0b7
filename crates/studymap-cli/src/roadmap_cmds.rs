//! Operator CLI handlers for roadmap commands.
//!
//! Implements:
//! - `studymap create <text>`          -- synthesize and store a roadmap
//! - `studymap list`                   -- list stored roadmaps
//! - `studymap show <id>`              -- print one roadmap with items
//! - `studymap toggle <id> <period> <item>` -- flip an item's completion
//! - `studymap delete <id>`            -- remove a roadmap

use anyhow::{Context, Result, bail};
use sqlx::PgPool;
use uuid::Uuid;

use studymap_core::{progress, synthesize, ItemSelector, PlanMode};
use studymap_db::queries::roadmaps;

// Retries for the optimistic-lock replace before giving up.
const TOGGLE_RETRIES: usize = 3;

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).with_context(|| format!("invalid roadmap ID: {raw}"))
}

// -----------------------------------------------------------------------
// studymap create <text>
// -----------------------------------------------------------------------

pub async fn cmd_create(pool: &PgPool, owner: Uuid, text: &str, mode: PlanMode) -> Result<()> {
    let roadmap = synthesize(text, mode);
    let stored = roadmaps::insert_roadmap(pool, owner, &roadmap, mode).await?;

    println!("Roadmap created.");
    println!();
    println!("  ID:       {}", stored.id);
    println!("  Title:    {}", stored.title);
    println!("  Category: {}", roadmap.category);
    println!("  Periods:  {}", roadmap.periods.len());
    println!("  Items:    {}", roadmap.total_items());

    Ok(())
}

// -----------------------------------------------------------------------
// studymap list
// -----------------------------------------------------------------------

pub async fn cmd_list(pool: &PgPool, owner: Uuid) -> Result<()> {
    let rows = roadmaps::list_roadmaps(pool, owner).await?;

    if rows.is_empty() {
        println!("No roadmaps found. Use `studymap create <text>` to make one.");
        return Ok(());
    }

    let id_w = 36;
    let title_w = rows.iter().map(|r| r.title.len()).max().unwrap_or(5).max(5);

    println!("{:<id_w$}  {:<title_w$}  {:>8}", "ID", "Title", "Progress");
    println!("{}  {}  {}", "-".repeat(id_w), "-".repeat(title_w), "-".repeat(8));
    for row in &rows {
        println!("{:<id_w$}  {:<title_w$}  {:>7}%", row.id, row.title, row.progress);
    }

    Ok(())
}

// -----------------------------------------------------------------------
// studymap show <id>
// -----------------------------------------------------------------------

pub async fn cmd_show(pool: &PgPool, owner: Uuid, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let stored = roadmaps::get_roadmap(pool, id, owner)
        .await?
        .with_context(|| format!("roadmap {id} not found"))?;
    let roadmap = stored.roadmap()?;

    println!("{}", roadmap.title);
    println!(
        "  category: {}   mode: {}   progress: {}%",
        roadmap.category, stored.mode, roadmap.progress_percent
    );
    println!();
    for period in &roadmap.periods {
        let marker = if period.completed { "x" } else { " " };
        println!("[{marker}] Period {}: {}", period.index, period.title);
        for (i, item) in period.items.iter().enumerate() {
            let marker = if item.completed { "x" } else { " " };
            println!("      [{marker}] {}. {}", i + 1, item.label);
        }
    }

    Ok(())
}

// -----------------------------------------------------------------------
// studymap toggle <id> <period> <item>
// -----------------------------------------------------------------------

/// Read-modify-write with optimistic locking: re-read and retry when a
/// concurrent writer got there first.
pub async fn cmd_toggle(pool: &PgPool, owner: Uuid, id: &str, period: u32, item: &str) -> Result<()> {
    let id = parse_id(id)?;
    let selector = ItemSelector::parse(item);

    for _ in 0..TOGGLE_RETRIES {
        let stored = roadmaps::get_roadmap(pool, id, owner)
            .await?
            .with_context(|| format!("roadmap {id} not found"))?;
        let roadmap = stored.roadmap()?;

        let updated = progress::toggle(&roadmap, period, &selector)?;

        if let Some(saved) =
            roadmaps::replace_roadmap(pool, id, owner, &updated, stored.updated_at).await?
        {
            println!("Progress: {}%", saved.progress);
            return Ok(());
        }
        tracing::debug!(%id, "toggle raced with another writer, retrying");
    }

    bail!("could not update roadmap {id}: too many concurrent updates")
}

// -----------------------------------------------------------------------
// studymap delete <id>
// -----------------------------------------------------------------------

pub async fn cmd_delete(pool: &PgPool, owner: Uuid, id: &str) -> Result<()> {
    let id = parse_id(id)?;
    let removed = roadmaps::delete_roadmap(pool, id, owner).await?;
    if removed {
        println!("Roadmap {id} deleted.");
        Ok(())
    } else {
        bail!("roadmap {id} not found")
    }
}
