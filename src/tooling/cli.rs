//! CLI Tooling
//!
//! Command-line interface over one corpus: rebuild the index, create, edit,
//! import and delete nodes, query the index, and manage tags. Every command
//! renders its result as plain text.

use crate::config::{
    ConfigCorpusResolver, ConfigLoader, CorpusResolver, FixedCorpusResolver, KegConfig,
};
use crate::corpus::Corpus;
use crate::dex::{has_dex, Dex, DexCodec, DexEntry, IndexBuilder};
use crate::error::KegError;
use crate::lifecycle;
use crate::logging::LoggingConfig;
use crate::meta::read_meta;
use crate::tags;
use crate::tooling::editor::CommandEditor;
use crate::types::{parse_node_id, NodeID};
use crate::views::{EntryFilter, IndexQuery, ViewPolicy};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// kegdex - index and manage a keg of numbered knowledge nodes
#[derive(Parser, Debug)]
#[command(name = "kegdex")]
#[command(about = "Index and manage a corpus of numbered knowledge nodes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Corpus root directory (overrides the configured current corpus)
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply the command-line log flags over the configured logging table.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

/// Rendering for commands that list index entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Change-log lines: `* <updated> [<title>](<link>)`
    #[default]
    Md,
    /// Tab-separated `id updated title`
    Tsv,
    Json,
    /// `* [<title>](<link>)` without timestamps
    Includes,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild both index files from the node directories
    Rebuild {
        /// Inspect nodes one at a time instead of in parallel
        #[arg(long)]
        sequential: bool,
    },
    /// Create a node and open it in an editor
    Create {
        /// Editor command (default: $VISUAL, then $EDITOR)
        #[arg(long)]
        editor: Option<String>,
        /// Only allocate the node with an empty content file
        #[arg(long, conflicts_with = "editor")]
        no_edit: bool,
    },
    /// Open an existing node in an editor and refresh its entry
    Edit {
        id: String,
        /// Editor command (default: $VISUAL, then $EDITOR)
        #[arg(long)]
        editor: Option<String>,
    },
    /// Move a directory into the corpus as a new node
    Import { dir: PathBuf },
    /// Remove a node and its index entry
    Delete { id: String },
    /// Most recently changed nodes
    Changes {
        #[arg(short = 'n', long, default_value = "10")]
        n: usize,
        /// Lowest node id to include
        #[arg(long)]
        from: Option<String>,
        /// Highest node id to include
        #[arg(long)]
        to: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Md)]
        format: OutputFormat,
    },
    /// Nodes whose title contains a keyword (all nodes without one)
    Titles {
        keyword: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Md)]
        format: OutputFormat,
    },
    /// Show the index entry of one node
    Lookup {
        id: String,
        #[arg(long, value_enum, default_value_t = OutputFormat::Md)]
        format: OutputFormat,
    },
    /// Show a random node
    Random {
        #[arg(long, value_enum, default_value_t = OutputFormat::Md)]
        format: OutputFormat,
    },
    /// Show the node with the highest id
    Last {
        #[arg(long, value_enum, default_value_t = OutputFormat::Md)]
        format: OutputFormat,
    },
    /// Show the node with the lowest id
    First {
        #[arg(long, value_enum, default_value_t = OutputFormat::Md)]
        format: OutputFormat,
    },
    /// Show the most recently changed node
    Latest {
        #[arg(long, value_enum, default_value_t = OutputFormat::Md)]
        format: OutputFormat,
    },
    /// Show the id the next created node would get
    Next,
    /// Tag a node with comma-separated tags
    Tag { id: String, tags: String },
    /// Remove comma-separated tags from a node
    Untag { id: String, tags: String },
    /// Show the tags-file lines for comma-separated tags
    Grep { tags: String },
    /// Show corpus root, entry count, and last update
    Info,
}

/// Resolved corpus and configuration for one invocation
pub struct CliContext {
    corpus: Corpus,
    config: KegConfig,
}

impl CliContext {
    /// Load configuration and resolve the corpus.
    pub fn new(corpus_root: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, KegError> {
        let config = ConfigLoader::load_or_default(config_path.as_deref())?;
        Self::from_config(corpus_root, config)
    }

    /// Resolve the corpus from an explicit root, else the configured current one.
    pub fn from_config(corpus_root: Option<PathBuf>, config: KegConfig) -> Result<Self, KegError> {
        let resolver: Box<dyn CorpusResolver> = match corpus_root {
            Some(root) => Box::new(FixedCorpusResolver::new(root, config.clone())),
            None => Box::new(ConfigCorpusResolver::new(config.clone())),
        };
        let corpus = resolver.resolve()?;
        Ok(Self { corpus, config })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn config(&self) -> &KegConfig {
        &self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, KegError> {
        let started = Instant::now();
        let result = self.execute_inner(command);
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, KegError> {
        match command {
            Commands::Rebuild { sequential } => self.handle_rebuild(*sequential),
            Commands::Create { editor, no_edit } => self.handle_create(editor.as_deref(), *no_edit),
            Commands::Edit { id, editor } => {
                let id = parse_node_id(id)?;
                let editor = self.editor(editor.as_deref())?;
                let entry = lifecycle::edit(&self.corpus, id, &editor)?;
                Ok(format!("Updated node {}: {}", entry.id, entry.title))
            }
            Commands::Import { dir } => {
                let entry = lifecycle::import_node(&self.corpus, dir)?;
                Ok(format!(
                    "Imported {} as node {}: {}",
                    dir.display(),
                    entry.id,
                    entry.title
                ))
            }
            Commands::Delete { id } => {
                let id = parse_node_id(id)?;
                match lifecycle::delete(&self.corpus, id)? {
                    Some(entry) => Ok(format!("Deleted node {}: {}", id, entry.title)),
                    None => Ok(format!("Deleted node {}", id)),
                }
            }
            Commands::Changes { n, from, to, format } => {
                let query = IndexQuery::new(&self.corpus)?;
                let dex = if from.is_none() && to.is_none() {
                    query.changes(*n)?
                } else {
                    let from = from.as_deref().map(parse_node_id).transpose()?.unwrap_or(0);
                    let to = to.as_deref().map(parse_node_id).transpose()?.unwrap_or(NodeID::MAX);
                    let policy = ViewPolicy::recent(*n).with_filter(EntryFilter::IdRange { from, to });
                    query.view(&policy)?
                };
                self.render(&dex, *format)
            }
            Commands::Titles { keyword, format } => {
                let query = IndexQuery::new(&self.corpus)?;
                let dex = match keyword {
                    Some(k) => query.titles(k)?,
                    None => query.dex()?,
                };
                self.render(&dex, *format)
            }
            Commands::Lookup { id, format } => {
                let entry = IndexQuery::new(&self.corpus)?.lookup(parse_node_id(id)?)?;
                self.render_entry(Some(entry), *format)
            }
            Commands::Random { format } => {
                let entry = IndexQuery::new(&self.corpus)?.random(&mut rand::thread_rng())?;
                self.render_entry(entry, *format)
            }
            Commands::Last { format } => {
                let entry = IndexQuery::new(&self.corpus)?.last()?;
                self.render_entry(entry, *format)
            }
            Commands::First { format } => {
                let entry = IndexQuery::new(&self.corpus)?.first()?;
                self.render_entry(entry, *format)
            }
            Commands::Latest { format } => {
                let entry = IndexQuery::new(&self.corpus)?.last_changed()?;
                self.render_entry(entry, *format)
            }
            Commands::Next => Ok(lifecycle::allocate(&self.corpus)?.to_string()),
            Commands::Tag { id, tags: csv } => {
                let map = tags::tag(&self.corpus, id, csv)?;
                Ok(map.tags_for(parse_node_id(id)?).join(","))
            }
            Commands::Untag { id, tags: csv } => {
                let map = tags::untag(&self.corpus, id, csv)?;
                Ok(map.tags_for(parse_node_id(id)?).join(","))
            }
            Commands::Grep { tags: csv } => Ok(tags::grep(&self.corpus, csv)?.join("\n")),
            Commands::Info => self.handle_info(),
        }
    }

    fn handle_rebuild(&self, sequential: bool) -> Result<String, KegError> {
        let parallel = self.config.rebuild.parallel && !sequential;
        let report = IndexBuilder::new(&self.corpus)?
            .with_parallel(parallel)
            .rebuild()?;

        let mut lines = vec![format!(
            "Rebuilt index: {} entries in {}ms",
            report.dex.len(),
            report.duration_ms
        )];
        if !report.removed_empty.is_empty() {
            lines.push(format!("Removed empty nodes: {}", join_ids(&report.removed_empty)));
        }
        if !report.untitled.is_empty() {
            lines.push(format!("Nodes without a valid title: {}", join_ids(&report.untitled)));
        }
        if !report.skipped.is_empty() {
            lines.push(format!("Skipped unreadable nodes: {}", join_ids(&report.skipped)));
        }
        Ok(lines.join("\n"))
    }

    fn handle_create(&self, editor: Option<&str>, no_edit: bool) -> Result<String, KegError> {
        if no_edit {
            let entry = lifecycle::create(&self.corpus)?;
            return Ok(entry.id.to_string());
        }
        let editor = self.editor(editor)?;
        match lifecycle::create_with_editor(&self.corpus, &editor)? {
            Some(entry) => Ok(format!("Created node {}: {}", entry.id, entry.title)),
            None => Ok("Node left empty; nothing created".to_string()),
        }
    }

    fn handle_info(&self) -> Result<String, KegError> {
        let root = self.corpus.root();
        let mut lines = vec![format!("root: {}", root.display())];
        if has_dex(&self.corpus) {
            let dex = IndexQuery::new(&self.corpus)?.dex()?;
            lines.push(format!("entries: {}", dex.len()));
        } else {
            lines.push("entries: not indexed".to_string());
        }
        let meta_path = self.corpus.meta_path();
        if meta_path.is_file() {
            let meta = read_meta(&meta_path)?;
            if let Some(updated) = meta.get("updated") {
                let updated = match updated {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => serde_yaml::to_string(other)
                        .map_err(|e| KegError::ConfigError(e.to_string()))?
                        .trim()
                        .to_string(),
                };
                lines.push(format!("updated: {}", updated));
            }
        }
        lines.push(format!("tags: {}", tags::load_tags(&self.corpus)?.len()));
        Ok(lines.join("\n"))
    }

    fn editor(&self, command: Option<&str>) -> Result<CommandEditor, KegError> {
        match command {
            Some(c) => CommandEditor::new(c),
            None => CommandEditor::from_env(),
        }
    }

    fn render(&self, dex: &Dex, format: OutputFormat) -> Result<String, KegError> {
        let prefix = &self.corpus.layout().link_prefix;
        let out = match format {
            OutputFormat::Md => DexCodec::new(prefix.clone())?.serialize_changes(dex),
            OutputFormat::Tsv => DexCodec::new(prefix.clone())?.serialize_tsv(dex),
            OutputFormat::Json => dex.to_json()?,
            OutputFormat::Includes => dex.to_includes(prefix),
        };
        Ok(out.trim_end().to_string())
    }

    fn render_entry(&self, entry: Option<DexEntry>, format: OutputFormat) -> Result<String, KegError> {
        let dex: Dex = entry.into_iter().collect();
        self.render(&dex, format)
    }
}

fn join_ids(ids: &[NodeID]) -> String {
    ids.iter().map(NodeID::to_string).collect::<Vec<_>>().join(", ")
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Rebuild { .. } => "rebuild",
        Commands::Create { .. } => "create",
        Commands::Edit { .. } => "edit",
        Commands::Import { .. } => "import",
        Commands::Delete { .. } => "delete",
        Commands::Changes { .. } => "changes",
        Commands::Titles { .. } => "titles",
        Commands::Lookup { .. } => "lookup",
        Commands::Random { .. } => "random",
        Commands::Last { .. } => "last",
        Commands::First { .. } => "first",
        Commands::Latest { .. } => "latest",
        Commands::Next => "next",
        Commands::Tag { .. } => "tag",
        Commands::Untag { .. } => "untag",
        Commands::Grep { .. } => "grep",
        Commands::Info => "info",
    }
}
