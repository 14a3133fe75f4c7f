use crate::error::StoreError;

pub const ROOT: &str = "/";

/// Checks that `path` is an absolute node path without empty segments.
pub fn validate_node_path(path: &str) -> Result<(), StoreError> {
    if path == ROOT {
        return Ok(());
    }
    let valid = path.starts_with('/')
        && !path.ends_with('/')
        && path[1..].split('/').all(|segment| !segment.is_empty());
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidPath(path.to_string()))
    }
}

/// Splits a property path into its node path and property name.
pub fn split_property_path(path: &str) -> Result<(&str, &str), StoreError> {
    validate_node_path(path)?;
    match path.rsplit_once('/') {
        Some((_, "")) | None => Err(StoreError::InvalidPath(path.to_string())),
        Some(("", name)) => Ok((ROOT, name)),
        Some((node, name)) => Ok((node, name)),
    }
}

/// The parent of a node path, or `None` for the root.
pub fn parent(path: &str) -> Option<&str> {
    match path.rsplit_once('/') {
        _ if path == ROOT => None,
        Some(("", _)) => Some(ROOT),
        Some((parent, _)) => Some(parent),
        None => None,
    }
}

pub fn join(parent: &str, child: &str) -> String {
    if parent == ROOT {
        format!("/{}", child)
    } else {
        format!("{}/{}", parent, child)
    }
}

/// Whether `path` is `ancestor` itself or lies below it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    if ancestor == ROOT {
        return path.starts_with('/');
    }
    path == ancestor
        || (path.starts_with(ancestor) && path.as_bytes().get(ancestor.len()) == Some(&b'/'))
}
