//! # dexaudit
//!
//! **Read-only audits for the battle data corpus.** Two independent passes:
//!
//! - **Move check** - cross-reference every `<move>` listed in `species.xml`
//!   against the move names declared in `moves.xml` and report the strays
//!   (misspellings, capitalization slips).
//! - **Annotations** - scrape `@`-tagged comments out of the `.js`/`.xml`
//!   resource files and print them grouped by category and order.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,no_run
//! use dexaudit::moves::{MoveSet, find_mismatches};
//! use dexaudit::xml_tree::Document;
//! use std::path::Path;
//!
//! let moves = MoveSet::load(Path::new("moves.xml")).unwrap();
//! let species = Document::load(Path::new("species.xml")).unwrap();
//! for mismatch in find_mismatches(&species, &moves) {
//!     println!("{}", mismatch.unwrap());
//! }
//! ```
//!
//! ```rust,no_run
//! use dexaudit::annotations::{AnnotationFormat, build_report, scan_directory};
//! use std::path::Path;
//!
//! let format = AnnotationFormat::typed();
//! let exts = vec!["js".to_string(), "xml".to_string()];
//! let scan = scan_directory(Path::new("../resources"), &exts, &format).unwrap();
//! let report = build_report(&format, scan.records);
//! println!("{} groups", report.groups.len());
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! check-moves                       # moves.xml vs species.xml in cwd
//! check-moves --json                # machine-readable mismatches
//! annotations                       # positioned annotations in ../resources
//! annotations --format typed        # type/subtype annotations
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// Arena-backed XML element tree with ElementTree-style path lookups.
///
/// Nodes are addressed by [`NodeId`](xml_tree::NodeId), so structurally
/// identical siblings stay distinct in the [`ParentMap`](xml_tree::ParentMap).
pub mod xml_tree;

/// Move-name validator: species move references vs the declared move set.
pub mod moves;

/// Annotation extraction, grouping and report rendering.
///
/// # Submodules
///
/// - [`annotations::format`] - annotation patterns (built-in and custom)
/// - [`annotations::extract`] - directory scan and per-line extraction
/// - [`annotations::group`] - two-level grouping into a sorted report
/// - [`annotations::output`] - human and JSON rendering
pub mod annotations;

// ============================================================================
// Support Modules
// ============================================================================

/// Optional `.dexaudit/config.toml` support.
pub mod config;

/// Library error type.
pub mod error;

/// Resource file discovery.
pub mod fs_utils;

/// Shared binary plumbing: logging setup and exit handling.
pub mod cli;

pub use error::{AuditError, Result};
