use clap::Parser;
use kegdex::config::KegConfig;
use kegdex::tooling::cli::{Cli, CliContext, Commands, OutputFormat};
use std::fs;

use crate::integration::support::{corpus_with, set_mtime};

#[test]
fn parse_valid_command_matrix() {
    let cases: Vec<Vec<&str>> = vec![
        vec!["kegdex", "rebuild"],
        vec!["kegdex", "rebuild", "--sequential"],
        vec!["kegdex", "create", "--no-edit"],
        vec!["kegdex", "create", "--editor", "vi"],
        vec!["kegdex", "edit", "3"],
        vec!["kegdex", "import", "./draft"],
        vec!["kegdex", "delete", "3"],
        vec!["kegdex", "changes", "-n", "5"],
        vec!["kegdex", "changes", "--format", "json"],
        vec!["kegdex", "changes", "--from", "3", "--to", "9"],
        vec!["kegdex", "changes", "--from", "3"],
        vec!["kegdex", "titles"],
        vec!["kegdex", "titles", "rust", "--format", "includes"],
        vec!["kegdex", "lookup", "2", "--format", "tsv"],
        vec!["kegdex", "random"],
        vec!["kegdex", "last"],
        vec!["kegdex", "first", "--format", "tsv"],
        vec!["kegdex", "latest"],
        vec!["kegdex", "next"],
        vec!["kegdex", "tag", "5", "foo,bar"],
        vec!["kegdex", "untag", "5", "foo"],
        vec!["kegdex", "grep", "foo"],
        vec!["kegdex", "info"],
        vec!["kegdex", "--corpus", "/tmp/keg", "--config", "/tmp/c.toml", "rebuild"],
        vec!["kegdex", "-v", "--log-format", "json", "changes"],
    ];

    for args in cases {
        let parsed = Cli::try_parse_from(args.clone());
        assert!(parsed.is_ok(), "expected valid parse for args: {args:?}");
    }
}

#[test]
fn parse_rejects_invalid_usage() {
    assert!(Cli::try_parse_from(["kegdex"]).is_err());
    assert!(Cli::try_parse_from(["kegdex", "lookup"]).is_err());
    assert!(Cli::try_parse_from(["kegdex", "changes", "--format", "yaml"]).is_err());
    assert!(Cli::try_parse_from(["kegdex", "create", "--no-edit", "--editor", "vi"]).is_err());
}

#[test]
fn log_flags_override_config() {
    let cli = Cli::try_parse_from(["kegdex", "-v", "--log-output", "stdout", "info"]).unwrap();
    let logging = cli.logging_config(&KegConfig::default().logging);
    assert_eq!(logging.level, "debug");
    assert_eq!(logging.output, "stdout");
    assert_eq!(logging.format, "text");
}

#[test]
fn rebuild_and_query_through_cli() {
    let (temp, corpus) = corpus_with(&[(0, "# Zero\n"), (1, "# One\n"), (2, "")]);
    set_mtime(corpus.content_path(0), "2022-12-10T06:10:04Z");
    set_mtime(corpus.content_path(1), "2023-01-02T03:04:05Z");

    let cli = CliContext::from_config(Some(temp.path().to_path_buf()), KegConfig::default()).unwrap();

    let output = cli.execute(&Commands::Rebuild { sequential: true }).unwrap();
    assert!(output.starts_with("Rebuilt index: 2 entries"));
    assert!(output.contains("Removed empty nodes: 2"));

    let output = cli
        .execute(&Commands::Changes {
            n: 1,
            from: None,
            to: None,
            format: OutputFormat::Md,
        })
        .unwrap();
    assert_eq!(output, "* 2023-01-02 03:04:05Z [One](../1)");

    let output = cli
        .execute(&Commands::Lookup {
            id: "0".to_string(),
            format: OutputFormat::Tsv,
        })
        .unwrap();
    assert_eq!(output, "0\t2022-12-10 06:10:04Z\tZero");

    let output = cli
        .execute(&Commands::Titles {
            keyword: Some("zero".to_string()),
            format: OutputFormat::Json,
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed[0]["N"], 0);
    assert_eq!(parsed[0]["T"], "Zero");

    let output = cli.execute(&Commands::Last { format: OutputFormat::Includes }).unwrap();
    assert_eq!(output, "* [One](../1)");

    assert_eq!(cli.execute(&Commands::Next).unwrap(), "2");

    let info = cli.execute(&Commands::Info).unwrap();
    assert!(info.contains("entries: 2"));
    assert!(info.contains("updated: 2023-01-02 03:04:05Z"));
}

#[test]
fn range_and_end_queries_through_cli() {
    let (temp, corpus) = corpus_with(&[
        (0, "# Zero\n"),
        (1, "# One\n"),
        (2, "# Two\n"),
        (3, "# Three\n"),
    ]);
    set_mtime(corpus.content_path(0), "2024-01-04T00:00:00Z");
    set_mtime(corpus.content_path(1), "2024-01-01T00:00:00Z");
    set_mtime(corpus.content_path(2), "2024-01-02T00:00:00Z");
    set_mtime(corpus.content_path(3), "2024-01-03T00:00:00Z");

    let cli = CliContext::from_config(Some(temp.path().to_path_buf()), KegConfig::default()).unwrap();
    cli.execute(&Commands::Rebuild { sequential: true }).unwrap();

    let output = cli
        .execute(&Commands::Changes {
            n: 10,
            from: Some("1".to_string()),
            to: Some("2".to_string()),
            format: OutputFormat::Includes,
        })
        .unwrap();
    assert_eq!(output, "* [Two](../2)\n* [One](../1)");

    let output = cli
        .execute(&Commands::Changes {
            n: 1,
            from: Some("2".to_string()),
            to: None,
            format: OutputFormat::Includes,
        })
        .unwrap();
    assert_eq!(output, "* [Three](../3)");

    assert!(cli
        .execute(&Commands::Changes {
            n: 1,
            from: Some("+2".to_string()),
            to: None,
            format: OutputFormat::Md,
        })
        .is_err());

    let output = cli.execute(&Commands::First { format: OutputFormat::Tsv }).unwrap();
    assert_eq!(output, "0\t2024-01-04 00:00:00Z\tZero");

    let output = cli.execute(&Commands::Latest { format: OutputFormat::Md }).unwrap();
    assert_eq!(output, "* 2024-01-04 00:00:00Z [Zero](../0)");
}

#[test]
fn lookup_of_bad_id_fails() {
    let (temp, _corpus) = corpus_with(&[(0, "# Zero\n")]);
    let cli = CliContext::from_config(Some(temp.path().to_path_buf()), KegConfig::default()).unwrap();
    cli.execute(&Commands::Rebuild { sequential: false }).unwrap();
    assert!(cli
        .execute(&Commands::Lookup {
            id: "01".to_string(),
            format: OutputFormat::Md,
        })
        .is_err());
    assert!(cli
        .execute(&Commands::Lookup {
            id: "7".to_string(),
            format: OutputFormat::Md,
        })
        .is_err());
}

#[test]
fn tag_commands_through_cli() {
    let (temp, _corpus) = corpus_with(&[(5, "# Five\n")]);
    let cli = CliContext::from_config(Some(temp.path().to_path_buf()), KegConfig::default()).unwrap();

    let output = cli
        .execute(&Commands::Tag {
            id: "5".to_string(),
            tags: "foo,bar".to_string(),
        })
        .unwrap();
    assert_eq!(output, "bar,foo");

    let output = cli
        .execute(&Commands::Grep {
            tags: "foo".to_string(),
        })
        .unwrap();
    assert_eq!(output, "foo 5");
}

#[test]
fn context_resolves_configured_corpus() {
    let (temp, _corpus) = corpus_with(&[(0, "# Zero\n")]);
    let config_dir = tempfile::tempdir().unwrap();
    let config_path = config_dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "current = \"notes\"\n\n[corpora]\nnotes = {:?}\n",
            temp.path().display().to_string()
        ),
    )
    .unwrap();

    let cli = CliContext::new(None, Some(config_path)).unwrap();
    assert_eq!(cli.corpus().root(), temp.path());
    assert_eq!(cli.config().current.as_deref(), Some("notes"));
}

#[test]
fn context_resolves_mixed_case_corpus_name() {
    let (temp, _corpus) = corpus_with(&[(0, "# Zero\n")]);
    let config_dir = tempfile::tempdir().unwrap();
    let config_path = config_dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "current = \"Notes\"\n\n[corpora]\nNotes = {:?}\n",
            temp.path().display().to_string()
        ),
    )
    .unwrap();

    let cli = CliContext::new(None, Some(config_path)).unwrap();
    assert_eq!(cli.corpus().root(), temp.path());
}

#[test]
fn context_without_corpus_fails() {
    assert!(CliContext::from_config(None, KegConfig::default()).is_err());
}
