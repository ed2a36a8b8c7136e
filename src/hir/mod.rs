//! Semantic layer: reference resolution over a workspace of parsed files.
//!
//! ## Architecture
//!
//! ```text
//! Workspace (files, directories, import roots)
//!     ↓
//! Reference (ExprReference | TypeNameReference | ImportReference)
//!     ↓ unqualified                    ↓ qualified
//! scope: walk-up, file, imports,   members: fields, embedded
//!        package, builtin               fields, methods; or the
//!                                       qualifier's package
//!     ↓
//! ScopeProcessor (resolve: first match, collect: all candidates)
//! ```
//!
//! Nothing is cached. Every `resolve` or `candidates` call walks the trees
//! of the workspace it borrows.

mod declaration;
mod imports;
mod input;
mod lookup;
mod members;
mod reference;
mod scope;

pub use declaration::{Declaration, Directory};
pub use imports::{ImportEntry, ImportTable};
pub use input::{FileData, ResolverConfig, Workspace, normalize};
pub use lookup::{
    CollectProcessor, LookupItem, LookupKind, ResolveProcessor, ScopeProcessor,
};
pub use members::{collect_members, methods_of, resolve_member, resolve_type_spec};
pub use reference::{
    ExprReference, GoReference, ImportReference, Qualifier, Reference, TypeNameReference,
};
pub use scope::{ScopeFilter, package_files, unqualified_files, walk_up};
