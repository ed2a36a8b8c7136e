//! Go SDK loading.

use std::path::Path;

use crate::ide::AnalysisHost;

use super::{LoadError, WorkspaceLoader};

/// Loads the Go SDK source tree at `sdk_src` (e.g. `$GOROOT/src`) into
/// `host`. SDK tests are not loaded.
///
/// A missing tree is not an error: the host simply has no builtin fallback
/// and no standard library. When the host has no SDK root configured yet,
/// `sdk_src` becomes its root.
pub fn load_into_host(sdk_src: &Path, host: &mut AnalysisHost) -> Result<usize, LoadError> {
    if !sdk_src.is_dir() {
        tracing::debug!("no SDK sources at {}", sdk_src.display());
        return Ok(0);
    }

    if host.config().sdk_src().is_none() {
        let config = host.config().clone().with_sdk_src(sdk_src);
        host.set_config(config);
    }

    WorkspaceLoader::new().with_tests(false).load_directory(sdk_src, host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::ResolverConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_sdk_loads_nothing() {
        let dir = TempDir::new().unwrap();
        let mut host = AnalysisHost::new(ResolverConfig::new());

        assert_eq!(load_into_host(&dir.path().join("go/src"), &mut host).unwrap(), 0);
        assert!(host.config().sdk_src().is_none());
    }

    #[test]
    fn test_sdk_provides_builtin_file() {
        let dir = TempDir::new().unwrap();
        let builtin = dir.path().join("builtin");
        fs::create_dir_all(&builtin).unwrap();
        fs::write(builtin.join("builtin.go"), "package builtin\n\ntype error interface {\n\tError() string\n}\n").unwrap();

        let mut host = AnalysisHost::new(ResolverConfig::new());
        assert_eq!(load_into_host(dir.path(), &mut host).unwrap(), 1);
        assert!(host.workspace().builtin_file().is_some());
    }
}
