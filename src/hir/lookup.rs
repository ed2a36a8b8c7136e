//! Completion candidates and the processors that collect them.

use std::ops::ControlFlow;

use smol_str::SmolStr;

use super::declaration::Declaration;

/// What a lookup entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Package,
    Import,
    Type,
    Function,
    Method,
    Field,
    Variable,
    Constant,
    Parameter,
    Receiver,
}

/// One semantic candidate: a name and what it resolves to. Display text is
/// left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupItem {
    pub kind: LookupKind,
    pub name: SmolStr,
    /// `None` for an import whose package is not in the workspace.
    pub declaration: Option<Declaration>,
}

impl LookupItem {
    /// Item named after its declaration; `None` for nameless declarations.
    pub fn from_declaration(declaration: Declaration) -> Option<Self> {
        Some(Self {
            kind: declaration.kind(),
            name: declaration.name()?,
            declaration: Some(declaration),
        })
    }
}

/// Receives names in scope order.
///
/// Scope walks call [`wants`](Self::wants) before building a declaration so
/// that single-name resolution does no extra work, and stop as soon as
/// [`process`](Self::process) breaks.
pub trait ScopeProcessor {
    fn wants(&self, _name: &str) -> bool {
        true
    }

    fn process(&mut self, item: LookupItem) -> ControlFlow<()>;
}

/// Stops at the first declaration with the wanted name.
#[derive(Debug)]
pub struct ResolveProcessor {
    name: SmolStr,
    result: Option<Declaration>,
}

impl ResolveProcessor {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            result: None,
        }
    }

    pub fn into_result(self) -> Option<Declaration> {
        self.result
    }
}

impl ScopeProcessor for ResolveProcessor {
    fn wants(&self, name: &str) -> bool {
        self.name == name
    }

    fn process(&mut self, item: LookupItem) -> ControlFlow<()> {
        if item.name != self.name {
            return ControlFlow::Continue(());
        }
        match item.declaration {
            Some(declaration) => {
                self.result = Some(declaration);
                ControlFlow::Break(())
            }
            None => ControlFlow::Continue(()),
        }
    }
}

/// Collects every candidate, duplicates included.
#[derive(Debug, Default)]
pub struct CollectProcessor {
    items: Vec<LookupItem>,
}

impl CollectProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_items(self) -> Vec<LookupItem> {
        self.items
    }
}

impl ScopeProcessor for CollectProcessor {
    fn process(&mut self, item: LookupItem) -> ControlFlow<()> {
        self.items.push(item);
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::declaration::Directory;

    fn package(name: &str) -> LookupItem {
        LookupItem::from_declaration(Declaration::Directory(Directory::new(format!("/src/{}", name))))
            .unwrap()
    }

    #[test]
    fn test_resolve_processor_stops_at_first_match() {
        let mut processor = ResolveProcessor::new("fmt");
        assert!(processor.wants("fmt"));
        assert!(!processor.wants("os"));

        assert_eq!(processor.process(package("os")), ControlFlow::Continue(()));
        assert_eq!(processor.process(package("fmt")), ControlFlow::Break(()));
        assert_eq!(
            processor.into_result(),
            Some(Declaration::Directory(Directory::new("/src/fmt")))
        );
    }

    #[test]
    fn test_resolve_processor_skips_unresolved_names() {
        let mut processor = ResolveProcessor::new("fmt");
        let unresolved = LookupItem {
            kind: LookupKind::Import,
            name: "fmt".into(),
            declaration: None,
        };

        assert_eq!(processor.process(unresolved), ControlFlow::Continue(()));
        assert!(processor.into_result().is_none());
    }

    #[test]
    fn test_collect_processor_keeps_duplicates() {
        let mut processor = CollectProcessor::new();
        let _ = processor.process(package("fmt"));
        let _ = processor.process(package("fmt"));

        assert_eq!(processor.into_items().len(), 2);
    }
}
