use crate::output::{print_json, print_table};
use anyhow::Context;
use attendant_core::range::{create_range, RangeRequest};
use attendant_core::store::DEFAULT_LIST_LIMIT;
use clap::Subcommand;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum PositionSubcommand {
    /// List an event's positions
    List {
        /// Event id
        #[arg(long)]
        event: String,
        /// Include inactive positions
        #[arg(long)]
        all: bool,
    },

    /// Create "<prefix> <n>" for every number in a range
    Range {
        /// Event id
        #[arg(long)]
        event: String,
        /// First number
        #[arg(long)]
        start: u32,
        /// Last number (inclusive)
        #[arg(long)]
        end: u32,
        /// Name prefix
        #[arg(long, default_value = "Position")]
        prefix: String,
        /// Area for every created position
        #[arg(long)]
        area: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, subcmd: PositionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PositionSubcommand::List { event, all } => list(root, &event, all, json),
        PositionSubcommand::Range {
            event,
            start,
            end,
            prefix,
            area,
        } => {
            let request = RangeRequest {
                start,
                end,
                prefix,
                area,
            };
            range(root, &event, &request, json)
        }
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(root: &Path, event: &str, all: bool, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open_store(root)?;
    let positions = store
        .list_positions(event, all, DEFAULT_LIST_LIMIT)
        .with_context(|| format!("failed to list positions for event '{event}'"))?;

    if json {
        return print_json(&positions);
    }
    if positions.is_empty() {
        println!("No positions.");
        return Ok(());
    }

    let rows = positions
        .iter()
        .map(|p| {
            vec![
                p.position_number.to_string(),
                p.name.clone(),
                p.area.clone().unwrap_or_else(|| "-".to_string()),
                if p.is_active { "yes" } else { "no" }.to_string(),
                p.id.clone(),
            ]
        })
        .collect();
    print_table(&["NUMBER", "NAME", "AREA", "ACTIVE", "ID"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// range
// ---------------------------------------------------------------------------

fn range(root: &Path, event: &str, request: &RangeRequest, json: bool) -> anyhow::Result<()> {
    let (_, store) = super::open_store(root)?;
    let summary = create_range(store.as_ref(), event, request)
        .with_context(|| format!("cannot create positions {}-{}", request.start, request.end))?;
    super::reconcile::print_summary(&summary, json)?;

    if summary.is_total_failure() {
        anyhow::bail!("no position could be saved: {}", summary.message);
    }
    Ok(())
}
