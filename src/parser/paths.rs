//! Slug generation and link-target path resolution.
//!
//! Path handling here is purely lexical: `.` and `..` segments are folded
//! without touching the filesystem, so parsing stays a pure function of file
//! bytes and cache keys stay stable across platforms.

use std::path::{Component, Path, PathBuf};

use crate::core::{CiteError, Result};

/// Derive the slug form of a heading for link-syntax compatibility.
///
/// Lower-cases the text, turns spaces into hyphens, and strips punctuation,
/// so `## Getting Started!` can be referenced as `#getting-started`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if ch == ' ' || ch == '-' {
            slug.push('-');
        } else if ch == '_' {
            slug.push('_');
        }
    }
    slug
}

/// Fold `.` and `..` segments lexically, preserving any root or prefix.
///
/// `..` at the root is dropped rather than kept, matching how wiki-style
/// resolvers clamp at the vault root.
#[must_use]
pub fn normalize_components(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(
                    normalized.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_))
                ) {
                    normalized.pop();
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Turn `path` into an absolute, normalized form suitable as a cache key.
///
/// # Errors
///
/// Returns [`CiteError::ReadError`] if the current directory is needed for
/// a relative path but cannot be determined.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| CiteError::from_io(path, &e))?
            .join(path)
    };
    Ok(normalize_components(&absolute))
}

/// Resolve a link's path portion relative to its source file.
///
/// Returns `None` for references that cannot name a local file: URL schemes,
/// or paths that escape the scope root when a `scope` directory is given.
/// References starting with `/` are treated as scope-absolute when a scope
/// is configured, filesystem-absolute otherwise. When `assume_md` is set
/// (wiki-style references), extension-less targets get `.md` appended.
#[must_use]
pub fn resolve_target(
    source_path: &Path,
    scope: Option<&Path>,
    reference: &str,
    assume_md: bool,
) -> Option<PathBuf> {
    let reference = reference.trim();
    if reference.is_empty() || reference.contains("://") {
        return None;
    }

    let mut candidate = if let Some(rest) = reference.strip_prefix('/') {
        match scope {
            Some(root) => root.join(rest),
            None => PathBuf::from(reference),
        }
    } else {
        source_path.parent()?.join(reference)
    };

    if assume_md && candidate.extension().is_none() {
        candidate.set_extension("md");
    }

    let normalized = normalize_components(&candidate);
    if let Some(root) = scope {
        if !normalized.starts_with(normalize_components(root)) {
            return None;
        }
    }
    Some(normalized)
}
