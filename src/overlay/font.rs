use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{BitclockError, BitclockResult};

/// Pluggable font resolution: produce raw font bytes for the overlay, or
/// report unavailability.
///
/// Callers must tolerate failure — an unresolved font degrades the overlay,
/// never the run.
pub trait FontProvider {
    fn resolve(&self) -> BitclockResult<Vec<u8>>;
}

/// Resolves the first `.ttf`/`.otf`/`.ttc` file found in any of the given
/// directories, in order. Directories that do not exist are skipped.
#[derive(Clone, Debug)]
pub struct DirFontProvider {
    dirs: Vec<PathBuf>,
}

impl DirFontProvider {
    pub fn new(dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// The conventional lookup used by the bundled binary: `fonts/` and
    /// `assets/fonts/` below the working directory.
    pub fn conventional() -> Self {
        Self::new(["fonts", "assets/fonts"])
    }
}

impl FontProvider for DirFontProvider {
    fn resolve(&self) -> BitclockResult<Vec<u8>> {
        for dir in &self.dirs {
            if let Some(path) = first_font_file(dir) {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("read font file '{}'", path.display()))?;
                tracing::debug!(path = %path.display(), "resolved overlay font");
                return Ok(bytes);
            }
        }
        Err(BitclockError::resource(format!(
            "no font file found in {:?}",
            self.dirs
        )))
    }
}

fn first_font_file(dir: &Path) -> Option<PathBuf> {
    let rd = std::fs::read_dir(dir).ok()?;

    let mut candidates: Vec<PathBuf> = rd
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .map(str::to_ascii_lowercase)
                .is_some_and(|ext| ext == "ttf" || ext == "otf" || ext == "ttc")
        })
        .collect();

    // Directory iteration order is platform-dependent; sort for determinism.
    candidates.sort();
    candidates.into_iter().next()
}

/// Serves font bytes injected at construction time.
#[derive(Clone, Debug)]
pub struct StaticFontProvider {
    bytes: Vec<u8>,
}

impl StaticFontProvider {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl FontProvider for StaticFontProvider {
    fn resolve(&self) -> BitclockResult<Vec<u8>> {
        if self.bytes.is_empty() {
            return Err(BitclockError::resource("static font bytes are empty"));
        }
        Ok(self.bytes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_provider_reports_unavailability_for_missing_dirs() {
        let p = DirFontProvider::new(["definitely/not/a/real/dir"]);
        assert!(matches!(p.resolve(), Err(BitclockError::Resource(_))));
    }

    #[test]
    fn static_provider_roundtrips_bytes() {
        let p = StaticFontProvider::new(vec![1, 2, 3]);
        assert_eq!(p.resolve().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn static_provider_rejects_empty_bytes() {
        let p = StaticFontProvider::new(Vec::new());
        assert!(p.resolve().is_err());
    }
}
