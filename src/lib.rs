// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Test code may unwrap freely
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

//! Quality-assessment metrics for predicted and modelled protein structures.
//!
//! Reads per-residue (pLDDT, QMEAN, ...) and pairwise (PAE) quality metrics
//! from ModelCIF-style metadata tables, indexes them by a model's residue
//! numbering, and turns them into colors and hover labels.
//!
//! # Key entry points
//!
//! - [`quality::QualityAssessmentProvider`] - per-model metric index with a
//!   build-once cache
//! - [`quality::pairwise`] - on-demand pairwise (PAE) matrices
//! - [`color::scale::ColorScale`] - continuous and discrete color scales
//! - [`theme`] - pLDDT confidence and QMEAN score color themes
//! - [`labels`] - averaged metric labels for a selection
//! - [`options::QualityOptions`] - configuration with TOML preset support
//!
//! # Collaborators
//!
//! The crate does not parse structure files. The host hands over metadata
//! as a [`table::Frame`] and implements [`model::StructureModel`] to resolve
//! residue labels into its own residue indexing.

pub mod color;
pub mod error;
pub mod labels;
pub mod model;
pub mod options;
pub mod quality;
pub mod symbols;
pub mod table;
pub mod theme;

#[cfg(test)]
pub(crate) mod testing;
