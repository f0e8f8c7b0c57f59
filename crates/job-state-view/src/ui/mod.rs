//! UI module - job state renderers.
//!
//! - `tree.rs`: Pure visual model of a job state
//! - `failed.rs`: Failed-state panel (summary row + on-demand details)

mod failed;
mod tree;

pub use failed::FailedStatePanel;
pub use tree::{render_tree, DetailPanel, Severity, SummaryRow, VisualTree, FAILED_HEADING};
