//! IDE features: high-level APIs for editor requests.
//!
//! This module sits between the resolver (`hir`) and whatever protocol
//! layer drives it. Each function corresponds to one editor request and
//! works in byte offsets; [`Analysis::line_index`] converts positions.
//!
//! ## Usage
//!
//! The recommended way to use this module is through `AnalysisHost`:
//!
//! ```ignore
//! use goscope::ide::AnalysisHost;
//! use goscope::hir::ResolverConfig;
//!
//! let mut host = AnalysisHost::new(ResolverConfig::new());
//! let file = host.set_file_text("/app/main.go", "package main\n");
//!
//! let analysis = host.analysis();
//! let items = analysis.completions(file, offset);
//! ```

mod analysis;
mod completion;
mod goto;
mod references;

pub use analysis::{Analysis, AnalysisHost};
pub use completion::{CompletionItem, completions};
pub use goto::{NavigationTarget, goto_definition};
pub use references::{FileRange, ReferenceResult, declaration_at, find_references};
