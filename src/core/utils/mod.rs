//! Path and naming helpers shared by the model, dependency graph and plugins.

use std::path::{Component, Path, PathBuf};

/// Extensions stripped from module paths when computing module keys.
const MODULE_EXTENSIONS: &[&str] = &[".d.ts", ".tsx", ".ts", ".jsx", ".js", ".mjs"];

/// Lexically normalize a path (`.` and `..` components) without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Extension-stripped key identifying a module file.
///
/// # Examples
///
/// ```
/// # use tagscope::core::utils::module_key;
/// assert_eq!(module_key("src/./button/button.ts"), "src/button/button");
/// assert_eq!(module_key("src/types.d.ts"), "src/types");
/// ```
pub fn module_key(path: &str) -> String {
    let normalized = normalize_path(Path::new(path));
    let text = normalized.to_string_lossy();
    strip_module_extension(&text).to_string()
}

fn strip_module_extension(path: &str) -> &str {
    MODULE_EXTENSIONS
        .iter()
        .find_map(|ext| path.strip_suffix(ext))
        .unwrap_or(path)
}

/// Resolve a relative import specifier against the importing file and return the
/// target's module key. Bare specifiers (`lit`, `@scope/pkg`) yield `None`.
pub fn resolve_import_key(current_file: &str, specifier: &str) -> Option<String> {
    if !specifier.starts_with('.') {
        return None;
    }
    let base_dir = Path::new(current_file).parent()?;
    let joined = base_dir.join(specifier);
    Some(module_key(&joined.to_string_lossy()))
}

/// Convert a camelCase property name to its dash-case attribute name.
///
/// # Examples
///
/// ```
/// # use tagscope::core::utils::dash_case;
/// assert_eq!(dash_case("maxLength"), "max-length");
/// assert_eq!(dash_case("label"), "label");
/// ```
pub fn dash_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_import() {
        assert_eq!(
            resolve_import_key("/p/src/button/button.ts", "../icon/icon.js").as_deref(),
            Some("/p/src/icon/icon")
        );
        assert_eq!(
            resolve_import_key("/p/src/button.ts", "./icon").as_deref(),
            Some("/p/src/icon")
        );
    }

    #[test]
    fn test_bare_specifier_is_not_resolved() {
        assert_eq!(resolve_import_key("/p/src/button.ts", "lit"), None);
    }

    #[test]
    fn test_dash_case() {
        assert_eq!(dash_case("ariaLabelledBy"), "aria-labelled-by");
        assert_eq!(dash_case("disabled"), "disabled");
    }
}
