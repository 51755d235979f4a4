use crate::output::{print_json, print_table};
use anyhow::Context;
use attendant_core::execute::Summary;
use attendant_core::plan::Decision;
use attendant_core::reconcile::{preview, reconcile, resolve_area, ReconcileRequest};
use std::io::Read;
use std::path::{Path, PathBuf};

pub struct ReconcileArgs {
    pub event: String,
    pub file: Option<PathBuf>,
    pub area: Option<String>,
    pub dry_run: bool,
}

pub fn run(root: &Path, args: ReconcileArgs, json: bool) -> anyhow::Result<()> {
    let (config, store) = super::open_store(root)?;

    let request = ReconcileRequest {
        event_id: args.event,
        positions_text: read_names(args.file.as_deref())?,
        default_area: resolve_area(
            args.area.as_deref(),
            config.reconcile.default_area.as_deref(),
        ),
    };

    if args.dry_run {
        let decisions = preview(store.as_ref(), &request)
            .with_context(|| format!("cannot plan positions for event '{}'", request.event_id))?;
        return print_decisions(&decisions, json);
    }

    let summary = reconcile(store.as_ref(), &request)
        .with_context(|| format!("cannot reconcile positions for event '{}'", request.event_id))?;
    print_summary(&summary, json)?;

    if summary.is_total_failure() {
        anyhow::bail!("no position could be saved: {}", summary.message);
    }
    Ok(())
}

fn read_names(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read names from stdin")?;
            Ok(text)
        }
    }
}

fn print_decisions(decisions: &[Decision], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&decisions);
    }
    let rows = decisions
        .iter()
        .map(|d| {
            vec![
                d.label().to_string(),
                d.position_number().to_string(),
                d.name().to_string(),
                d.position_id().unwrap_or("-").to_string(),
            ]
        })
        .collect();
    print_table(&["ACTION", "NUMBER", "NAME", "ID"], rows);
    Ok(())
}

pub(crate) fn print_summary(summary: &Summary, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(summary);
    }
    let rows = summary
        .outcomes
        .iter()
        .map(|o| {
            vec![
                o.action.to_string(),
                o.position_number.to_string(),
                o.name.clone(),
                o.error.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["RESULT", "NUMBER", "NAME", "ERROR"], rows);
    println!();
    println!("{}", summary.message);
    Ok(())
}
