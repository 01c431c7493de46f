//! Path normalization and splitting helpers.
//!
//! Paths are `/`-separated strings; the root path `/` has no segments.
//! There is no `.`/`..` traversal and no symlink indirection anywhere in
//! this filesystem, so these helpers are purely lexical.

use crate::error::VfsError;

/// Split a path into its non-empty name segments.
///
/// Empty segments (leading, trailing, or doubled slashes) collapse, so
/// `"//var//log/"` and `"/var/log"` resolve identically.
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Split a path into parent directory and leaf name.
///
/// # Arguments
/// * `path` - Path to split
///
/// # Returns
/// (parent_path, leaf_name) tuple. The root path yields an empty leaf.
pub fn split_parent(path: &str) -> (&str, &str) {
    let trimmed: &str = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) => ("/", &trimmed[1..]),
        Some(pos) => (&trimmed[..pos], &trimmed[pos + 1..]),
        None => ("/", trimmed),
    }
}

/// Render a path in canonical `/a/b` form for display and notifications.
pub fn clean(path: &str) -> String {
    let parts: Vec<&str> = segments(path);
    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Validate a new entry name.
///
/// Names must be non-empty, must not contain `/`, and the dot names are
/// reserved.
pub fn validate_name(name: &str) -> Result<(), VfsError> {
    if name.is_empty() || name.contains('/') || name == "." || name == ".." {
        return Err(VfsError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
