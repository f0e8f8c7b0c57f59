//! UI module - TUI rendering components.
//!
//! - `layout.rs`: Main layout orchestration
//! - `job_list.rs`: Failed job list
//! - `job_detail.rs`: Selected job with its failed-state panel
//! - `widgets/`: Reusable UI components

mod job_detail;
mod job_list;
mod layout;

pub mod widgets;

pub use layout::render;
