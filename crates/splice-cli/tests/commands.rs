//! Command pipelines run against an in-memory fetcher.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use splice::{DocumentError, EntryError, MemoryFetcher};
use splice_cli::CliError;
use splice_cli::cli::{InlineArgs, SyncArgs};
use splice_cli::commands::{inline, sync};
use splice_config::SpliceConfig;
use tempfile::TempDir;

const ENTRY_URL: &str = "https://github.com/org/repo/blob/main/lib/plugin.js";
const UTIL_URL: &str = "https://github.com/org/repo/blob/main/lib/util.js";

const NOTE: &str = "# Word counter\n\
\n\
repo: org/repo\n\
\n\
## Notes\n\
\n\
```text\n\
not this one\n\
```\n\
\n\
## Code\n\
\n\
```js\n\
old code\n\
```\n\
\n\
Trailing prose.\n";

fn config() -> SpliceConfig {
    let mut config = SpliceConfig::default();
    config.fetch.retries = 1;
    config.fetch.timeout_seconds = 1;
    config
}

fn plugin_fetcher() -> Arc<MemoryFetcher> {
    Arc::new(
        MemoryFetcher::new()
            .with_file(
                ENTRY_URL,
                "import { count } from './util'\nconst plugin = {\n  run: (text) => count(text)\n}\nexport default plugin;\n",
            )
            .with_file(UTIL_URL, "export const count = (text) => text.split(' ').length;\n"),
    )
}

fn write_note(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("plugin.md");
    fs::write(&path, text).expect("write note");
    path
}

fn sync_args(note: &Path, heading: Option<&str>, dry_run: bool) -> SyncArgs {
    SyncArgs {
        note: note.to_path_buf(),
        heading: heading.map(str::to_string),
        dry_run,
    }
}

#[tokio::test]
async fn test_sync_writes_code_under_heading() {
    let dir = TempDir::new().unwrap();
    let note = write_note(&dir, NOTE);
    let mut config = config();
    config.output.heading = Some("Code".to_string());

    let outcome = sync::run(&sync_args(&note, None, false), &config, plugin_fetcher())
        .await
        .unwrap();

    assert!(outcome.written);
    let on_disk = fs::read_to_string(&note).unwrap();
    assert_eq!(on_disk, outcome.updated);
    assert!(on_disk.contains("// Synced from org/repo at "));
    assert!(on_disk.contains("run: (text) => this._inlined_util_js_count(text)"));
    assert!(on_disk.contains("```text\nnot this one\n```"));
    assert!(!on_disk.contains("old code"));
    assert!(on_disk.ends_with("```\n\nTrailing prose.\n"));
    assert_eq!(outcome.output.translations.len(), 1);
}

#[tokio::test]
async fn test_sync_without_heading_uses_first_block() {
    let dir = TempDir::new().unwrap();
    let note = write_note(&dir, NOTE);

    let outcome = sync::run(&sync_args(&note, None, false), &config(), plugin_fetcher())
        .await
        .unwrap();

    assert!(!outcome.updated.contains("not this one"));
    assert!(outcome.updated.contains("old code"));
}

#[tokio::test]
async fn test_sync_dry_run_leaves_note_alone() {
    let dir = TempDir::new().unwrap();
    let note = write_note(&dir, NOTE);

    let outcome = sync::run(&sync_args(&note, Some("Code"), true), &config(), plugin_fetcher())
        .await
        .unwrap();

    assert!(!outcome.written);
    assert!(outcome.updated.contains("_inlined_util_js_count"));
    assert_eq!(fs::read_to_string(&note).unwrap(), NOTE);
}

#[tokio::test]
async fn test_sync_note_without_reference() {
    let dir = TempDir::new().unwrap();
    let note = write_note(&dir, "# Plugin\n\n```js\nold\n```\n");
    let fetcher = plugin_fetcher();

    let err = sync::run(&sync_args(&note, None, false), &config(), fetcher.clone())
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::Document(DocumentError::NoSourceReference)));
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn test_sync_note_without_code_block_fetches_nothing() {
    let dir = TempDir::new().unwrap();
    let note = write_note(&dir, "# Plugin\n\nrepo: org/repo\n");
    let fetcher = plugin_fetcher();

    let err = sync::run(&sync_args(&note, None, false), &config(), fetcher.clone())
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::Document(DocumentError::NoInsertLocation)));
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn test_sync_unresolvable_repository_keeps_note() {
    let dir = TempDir::new().unwrap();
    let note = write_note(&dir, &NOTE.replace("org/repo", "org/missing"));

    let err = sync::run(&sync_args(&note, None, false), &config(), plugin_fetcher())
        .await
        .unwrap_err();

    match err {
        CliError::Entry(EntryError::NotFound { tried, .. }) => assert_eq!(tried.len(), 3),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(
        fs::read_to_string(&note).unwrap(),
        NOTE.replace("org/repo", "org/missing")
    );
}

#[tokio::test]
async fn test_sync_too_large_output_keeps_note() {
    let dir = TempDir::new().unwrap();
    let note = write_note(&dir, NOTE);
    let mut config = config();
    config.output.max_chars = 20;

    let err = sync::run(&sync_args(&note, None, false), &config, plugin_fetcher())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CliError::Document(DocumentError::OutputTooLarge { max: 20, .. })
    ));
    assert_eq!(fs::read_to_string(&note).unwrap(), NOTE);
}

#[tokio::test]
async fn test_sync_missing_note() {
    let dir = TempDir::new().unwrap();
    let note = dir.path().join("absent.md");

    let err = sync::run(&sync_args(&note, None, false), &config(), plugin_fetcher())
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::FileNotFound(path) if path == note));
}

#[tokio::test]
async fn test_inline_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("plugin.js");
    let args = InlineArgs {
        reference: "org/repo".to_string(),
        output: Some(out.clone()),
        json: false,
    };

    inline::run(&args, &config(), plugin_fetcher(), true)
        .await
        .unwrap();

    let code = fs::read_to_string(&out).unwrap();
    assert!(code.starts_with("const plugin = {"));
    assert!(code.contains("_inlined_util_js_count: (text) => text.split(' ').length,"));
    assert!(!code.contains("import"));
    assert!(!code.contains("export default"));
}

#[tokio::test]
async fn test_inline_file_reference_skips_discovery() {
    let fetcher = plugin_fetcher();
    let dir = TempDir::new().unwrap();
    let args = InlineArgs {
        reference: "org/repo/lib/plugin.js".to_string(),
        output: Some(dir.path().join("out.js")),
        json: false,
    };

    inline::run(&args, &config(), fetcher.clone(), true)
        .await
        .unwrap();

    assert_eq!(fetcher.requests(), vec![ENTRY_URL.to_string(), UTIL_URL.to_string()]);
}

#[tokio::test]
async fn test_inline_rejects_bad_reference() {
    let args = InlineArgs {
        reference: "just-a-name".to_string(),
        output: None,
        json: false,
    };

    let err = inline::run(&args, &config(), plugin_fetcher(), true)
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::Entry(EntryError::InvalidReference(_))));
}

#[tokio::test]
async fn test_inline_empty_entry() {
    let fetcher = Arc::new(MemoryFetcher::new().with_file(
        "https://github.com/org/repo/blob/main/plugin.js",
        "   \n",
    ));
    let args = InlineArgs {
        reference: "org/repo/plugin.js".to_string(),
        output: None,
        json: false,
    };

    let err = inline::run(&args, &config(), fetcher, true)
        .await
        .unwrap_err();

    assert!(matches!(err, CliError::EmptyEntry(url) if url.ends_with("/plugin.js")));
}
