//! Import statement discovery and URL resolution.
//!
//! Only named brace-list imports (`import { a, b } from "./x"`) are
//! recognised. Default imports, namespace imports and re-exports are left
//! alone. Each statement is resolved against the URL of the file that
//! contains it:
//!
//! ```text
//! containing: https://github.com/org/repo/blob/main/lib/plugin.js
//!
//! "./util"        → https://github.com/org/repo/blob/main/lib/util.js
//! "../shared/fmt" → https://github.com/org/repo/blob/main/shared/fmt.js
//! "lib/arrays"    → https://github.com/org/repo/blob/main/lib/arrays.js
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Number of URL segments that make up the repository root, e.g.
/// `https:` / `` / `github.com` / `org` / `repo` / `blob` / `main`.
pub const REPOSITORY_ROOT_SEGMENTS: usize = 7;

/// Extensions treated as already-complete source file names.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "ts", "mjs", "cjs", "jsx", "tsx"];

static NAMED_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+\{\s*([^}]+)\s*\}\s+from\s+['"]([^'"]+)['"]"#)
        .expect("named import pattern is valid")
});

static IMPORT_STATEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*import\s+(?:[\w$*\s,{}]+?\s+from\s+)?['"][^'"]+['"][ \t]*;?[ \t]*(?:\r?\n)?"#,
    )
    .expect("import statement pattern is valid")
});

/// One `import { ... } from "..."` statement resolved to a fetchable URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReference {
    /// Names listed between the braces, in source order
    pub names: Vec<String>,
    /// The module specifier exactly as written
    pub raw_module_specifier: String,
    /// Absolute URL the specifier resolves to
    pub resolved_url: String,
}

/// Extract named imports from `file_text`, in file order.
///
/// Duplicate specifiers are preserved; de-duplication is the driver's job.
pub fn parse_imports(file_text: &str, containing_url: &str) -> Vec<ImportReference> {
    NAMED_IMPORT
        .captures_iter(file_text)
        .map(|caps| {
            let names = caps[1]
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
            let specifier = caps[2].to_string();
            let resolved_url = resolve_specifier(&specifier, containing_url);
            ImportReference {
                names,
                raw_module_specifier: specifier,
                resolved_url,
            }
        })
        .collect()
}

/// Resolve `specifier` against the URL of the file importing it.
pub fn resolve_specifier(specifier: &str, containing_url: &str) -> String {
    let segments: Vec<&str> = containing_url.split('/').collect();

    let resolved = if specifier.starts_with("./") || specifier.starts_with("../") {
        // Drop the containing file name, keep its directory
        let mut base: Vec<&str> = segments[..segments.len().saturating_sub(1)].to_vec();
        let mut rest = specifier;
        loop {
            if let Some(stripped) = rest.strip_prefix("./") {
                rest = stripped;
            } else if let Some(stripped) = rest.strip_prefix("../") {
                if base.len() > REPOSITORY_ROOT_SEGMENTS {
                    base.pop();
                }
                rest = stripped;
            } else {
                break;
            }
        }
        format!("{}/{}", base.join("/"), rest)
    } else {
        let root_len = segments.len().min(REPOSITORY_ROOT_SEGMENTS);
        format!("{}/{}", segments[..root_len].join("/"), specifier)
    };

    if has_source_extension(&resolved) {
        return resolved;
    }
    match source_extension(containing_url) {
        Some(extension) => format!("{resolved}.{extension}"),
        None => resolved,
    }
}

/// Extension of the last path segment of `url`, if it has one.
pub fn source_extension(url: &str) -> Option<&str> {
    let file_name = url.rsplit('/').next()?;
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        None
    } else {
        Some(extension)
    }
}

fn has_source_extension(url: &str) -> bool {
    source_extension(url).is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Remove every import statement (named, default, namespace, side-effect)
/// from `file_text`.
pub fn strip_imports(file_text: &str) -> String {
    IMPORT_STATEMENT.replace_all(file_text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUGIN_URL: &str = "https://github.com/alloy-org/plugin-builder/blob/main/lib/plugin.js";

    #[test]
    fn test_relative_import_resolves_against_directory() {
        let imports = parse_imports(r#"import { foo, bar } from "./util""#, PLUGIN_URL);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].names, vec!["foo", "bar"]);
        assert_eq!(imports[0].raw_module_specifier, "./util");
        assert_eq!(
            imports[0].resolved_url,
            "https://github.com/alloy-org/plugin-builder/blob/main/lib/util.js"
        );
    }

    #[test]
    fn test_bare_import_resolves_against_repository_root() {
        let imports = parse_imports(
            r#"import { inlineImportsFromGithub } from "lib/plugin-file-extractor""#,
            PLUGIN_URL,
        );
        assert_eq!(
            imports[0].resolved_url,
            "https://github.com/alloy-org/plugin-builder/blob/main/lib/plugin-file-extractor.js"
        );
    }

    #[test]
    fn test_parent_directory_import() {
        let url = "https://github.com/org/repo/blob/main/lib/deep/plugin.ts";
        assert_eq!(
            resolve_specifier("../shared/format", url),
            "https://github.com/org/repo/blob/main/lib/shared/format.ts"
        );
    }

    #[test]
    fn test_parent_directory_never_escapes_repository_root() {
        let url = "https://github.com/org/repo/blob/main/plugin.js";
        assert_eq!(
            resolve_specifier("../../util", url),
            "https://github.com/org/repo/blob/main/util.js"
        );
    }

    #[test]
    fn test_existing_extension_is_kept() {
        assert_eq!(
            resolve_specifier("./helpers.ts", PLUGIN_URL),
            "https://github.com/alloy-org/plugin-builder/blob/main/lib/helpers.ts"
        );
    }

    #[test]
    fn test_containing_url_without_extension_appends_nothing() {
        let url = "https://github.com/org/repo/blob/main/plugin";
        assert_eq!(
            resolve_specifier("./util", url),
            "https://github.com/org/repo/blob/main/util"
        );
    }

    #[test]
    fn test_single_quotes_and_file_order() {
        let text = "import { b } from './b'\nimport { a } from './a'\n";
        let urls: Vec<_> = parse_imports(text, PLUGIN_URL)
            .into_iter()
            .map(|i| i.raw_module_specifier)
            .collect();
        assert_eq!(urls, vec!["./b", "./a"]);
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let text = "import { a } from './util'\nimport { b } from './util'\n";
        let imports = parse_imports(text, PLUGIN_URL);
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].resolved_url, imports[1].resolved_url);
    }

    #[test]
    fn test_unsupported_import_forms_are_ignored() {
        let text = r#"
import fetch from "isomorphic-fetch"
import * as path from "./path"
export { thing } from "./thing"
const lazy = import("./lazy")
"#;
        assert!(parse_imports(text, PLUGIN_URL).is_empty());
    }

    #[test]
    fn test_no_imports_is_empty() {
        assert!(parse_imports("const plugin = {}", PLUGIN_URL).is_empty());
    }

    #[test]
    fn test_source_extension() {
        assert_eq!(source_extension(PLUGIN_URL), Some("js"));
        assert_eq!(source_extension("https://github.com/org/repo"), None);
        assert_eq!(source_extension("https://x.test/.hidden"), None);
    }

    #[test]
    fn test_strip_imports() {
        let text = "import { a, b } from \"./util\"\nimport fetch from 'isomorphic-fetch';\nimport \"./side-effect\";\nconst plugin = {\n  run() {}\n}\n";
        assert_eq!(strip_imports(text), "const plugin = {\n  run() {}\n}\n");
    }

    #[test]
    fn test_strip_multiline_import() {
        let text = "import {\n  a,\n  b,\n} from \"./util\";\nconst plugin = {}\n";
        assert_eq!(strip_imports(text), "const plugin = {}\n");
    }
}
