//! Report rendering
//!
//! Turns a settled result into terminal output. Panels are built as plain
//! text first so their content can be tested; color is only applied when
//! printing.

mod error;
mod panels;

pub use error::{ErrorView, print_error};
pub use panels::{Panel, build_panel};

use clap::ValueEnum;
use colored::*;
use sitescan_core::domain::payload::ResultPayload;

/// Report panels, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PanelKind {
    Overview,
    Pages,
    Links,
    Issues,
    Keywords,
    PagePower,
    Duplicates,
    Performance,
}

impl PanelKind {
    pub const ALL: [PanelKind; 8] = [
        PanelKind::Overview,
        PanelKind::Pages,
        PanelKind::Links,
        PanelKind::Issues,
        PanelKind::Keywords,
        PanelKind::PagePower,
        PanelKind::Duplicates,
        PanelKind::Performance,
    ];
}

/// Print the report of a completed scan
///
/// An empty `only` selection prints every panel.
pub fn print_report(scan_id: &str, payload: &ResultPayload, only: &[PanelKind]) {
    println!("{}", "Scan Results".bold());
    println!("  ID:       {}", scan_id.cyan());
    if let Some(completed) = payload.completed_at() {
        println!(
            "  Finished: {}",
            completed.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
    }
    println!();

    for kind in selected_panels(only) {
        print_panel(&build_panel(kind, payload));
    }
}

fn selected_panels(only: &[PanelKind]) -> Vec<PanelKind> {
    if only.is_empty() {
        return PanelKind::ALL.to_vec();
    }
    PanelKind::ALL
        .into_iter()
        .filter(|kind| only.contains(kind))
        .collect()
}

fn print_panel(panel: &Panel) {
    println!("{}", panel.title.bold());
    println!("{}", "─".repeat(60).dimmed());
    if panel.is_empty() {
        for line in &panel.lines {
            println!("  {}", line.yellow());
        }
    } else {
        for line in &panel.lines {
            println!("  {}", line);
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_selection_means_every_panel() {
        assert_eq!(selected_panels(&[]), PanelKind::ALL.to_vec());
    }

    #[test]
    fn selection_keeps_display_order() {
        assert_eq!(
            selected_panels(&[PanelKind::Performance, PanelKind::Overview]),
            vec![PanelKind::Overview, PanelKind::Performance]
        );
    }
}
