//! Output filename derivation

/// Fallback base name when an upload carries no usable filename
pub const DEFAULT_BASE_NAME: &str = "image";

/// Split `name` into base and extension. Dotfiles and trailing dots have no extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((base, ext))
            if !base.is_empty() && !ext.is_empty() && !ext.contains(['/', '\\']) =>
        {
            (base, Some(ext))
        }
        _ => (name, None),
    }
}

/// Base name without extension, falling back to `image` for empty names
pub fn base_name(name: &str) -> &str {
    let (base, _) = split_extension(name.trim());
    if base.is_empty() {
        DEFAULT_BASE_NAME
    } else {
        base
    }
}

/// Replace (or append) the extension of `name`
pub fn with_extension(name: &str, extension: &str) -> String {
    format!("{}.{}", base_name(name), extension)
}

/// `<base>-copy-<index>.<ext>`, or `<base>-copy-<index>` when there is no extension
pub fn copy_name(name: &str, index: usize) -> String {
    match split_extension(name) {
        (base, Some(ext)) => format!("{}-copy-{}.{}", base, index, ext),
        (base, None) => format!("{}-copy-{}", base, index),
    }
}

/// Strip a trailing `-copy-<n>` marker left by [`copy_name`]
pub fn strip_copy_suffix(base: &str) -> &str {
    match base.rsplit_once("-copy-") {
        Some((stem, n))
            if !stem.is_empty() && !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) =>
        {
            stem
        }
        _ => base,
    }
}
