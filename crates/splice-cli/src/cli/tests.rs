#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_inline_command() {
        let cli = Cli::try_parse_from(["splice", "inline", "org/repo", "-o", "out.js"]).unwrap();
        match cli.command {
            Command::Inline(args) => {
                assert_eq!(args.reference, "org/repo");
                assert_eq!(args.output, Some(PathBuf::from("out.js")));
                assert!(!args.json);
            }
            other => panic!("expected inline, got {other:?}"),
        }
    }

    #[test]
    fn test_sync_command_with_heading() {
        let cli = Cli::try_parse_from([
            "splice",
            "sync",
            "note.md",
            "--heading",
            "Code block",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Command::Sync(args) => {
                assert_eq!(args.note, PathBuf::from("note.md"));
                assert_eq!(args.heading.as_deref(), Some("Code block"));
                assert!(args.dry_run);
            }
            other => panic!("expected sync, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "splice",
            "inline",
            "org/repo",
            "--retries",
            "4",
            "--timeout",
            "5",
            "--strict",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(cli.retries, Some(4));
        assert_eq!(cli.timeout, Some(5));
        assert!(cli.strict);
        assert!(cli.no_color);

        let overrides = cli.global_options().overrides(None);
        assert_eq!(overrides.retries, Some(4));
        assert_eq!(overrides.timeout_seconds, Some(5));
        assert_eq!(overrides.strict, Some(true));
    }

    #[test]
    fn test_strict_absent_leaves_config_alone() {
        let cli = Cli::try_parse_from(["splice", "config"]).unwrap();
        assert_eq!(cli.global_options().overrides(None).strict, None);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["splice", "-v", "-q", "config"]).is_err());
    }

    #[test]
    fn test_json_conflicts_with_output() {
        assert!(Cli::try_parse_from(["splice", "inline", "org/repo", "--json", "-o", "x.js"]).is_err());
    }

    #[test]
    fn test_inline_requires_reference() {
        assert!(Cli::try_parse_from(["splice", "inline"]).is_err());
    }
}
