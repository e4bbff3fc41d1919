//! POSIX path resolution for logical file paths
//!
//! Logical paths are forward-slash separated and conceptually rooted at `/`,
//! regardless of the host platform. These helpers never touch the filesystem.

/// Resolve `path` against `base` the way POSIX `path.resolve` does.
///
/// An absolute `path` ignores `base`. The result is always absolute with
/// `.`/`..` segments and repeated slashes removed; `..` at the root stays at
/// the root.
pub fn resolve(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        normalize(path)
    } else {
        normalize(&format!("{}/{}", base, path))
    }
}

/// Normalize a path into its absolute canonical form
pub fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Resolve a file set key (with or without a leading slash) against the root
pub fn to_absolute(file_path: &str) -> String {
    resolve("/", file_path)
}

/// Directory portion of an absolute normalized path (`/` for root-level entries)
pub fn parent_directory(absolute_path: &str) -> String {
    match absolute_path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(index) => absolute_path[..index].to_string(),
    }
}

/// Turn a glob found inside `document_path` into an absolute glob.
///
/// Relative globs are anchored at the document's directory, globs starting
/// with `/` at the root.
pub fn resolve_glob(document_path: &str, glob_expression: &str) -> String {
    let base_path = parent_directory(&to_absolute(document_path));
    resolve(&base_path, glob_expression)
}

/// Shortest relative path from the `base_path` directory to `absolute_file_path`.
///
/// Both inputs are resolved first, so the result never starts with `/`.
/// Identical paths yield an empty string.
pub fn to_relative(base_path: &str, absolute_file_path: &str) -> String {
    let from = normalize(base_path);
    let to = normalize(absolute_file_path);

    let from_segments: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segments: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_segments
        .iter()
        .zip(to_segments.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::with_capacity(from_segments.len() - common + to_segments.len());
    parts.extend(std::iter::repeat_n("..", from_segments.len() - common));
    parts.extend(&to_segments[common..]);

    parts.join("/")
}
