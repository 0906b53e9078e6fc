use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mjv::config;
use mjv::fetch::ApiClient;
use mjv::ingest;
use mjv::link;
use mjv::model::Snapshot;
use mjv::output::{json as json_out, table};
use mjv::search::{self, FilterType};
use mjv::summary;
use mjv::timeline;

#[derive(Parser)]
#[command(name = "mjv", version, about = "Member Journey Viewer — correlate coaching episodes, conversations, and decisions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding snapshot files (default: ./data)
    #[arg(long, global = true, env = "MJV_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Fetch live from this API base URL instead of local files
    #[arg(long, global = true, env = "MJV_API_URL")]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the merged chronological timeline of episodes and decisions
    Timeline {
        /// Show only episodes, sorted by start date
        #[arg(long)]
        episodes_only: bool,
    },

    /// List journey episodes in chronological order
    Episodes,

    /// Search conversations by free text
    Search {
        /// Search query (case-insensitive substring)
        query: String,

        /// Categorical filter: all, decisions, team
        #[arg(long, default_value = "all")]
        filter: String,

        /// Show at most this many results (display cap of 100 still applies)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List conversations, optionally filtered
    Conversations {
        /// Categorical filter: all, decisions, team
        #[arg(long, default_value = "all")]
        filter: String,
    },

    /// List extracted decisions
    Decisions {
        /// Only decisions behind this conversation id
        #[arg(long)]
        conversation: Option<String>,
    },

    /// Show full traceability detail for one decision
    Show {
        /// Decision ID
        id: String,
    },

    /// Show aggregate journey counters
    Summary,

    /// Create the default config file
    Init,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json_output = cli.json;

    if let Commands::Init = cli.command {
        let created = config::init_config()?;
        let path = config::config_path()?;
        if created {
            println!("Created config: {}", path.display());
        } else {
            println!("Config already exists: {}", path.display());
        }
        return Ok(());
    }

    let snapshot = load_snapshot(&cli)?;

    match cli.command {
        Commands::Timeline { episodes_only } => {
            if episodes_only {
                let sorted = timeline::sorted_episodes(&snapshot.episodes);
                if json_output {
                    let rows: Vec<_> = sorted
                        .iter()
                        .map(|(index, ep)| {
                            serde_json::json!({ "index": index, "episode": ep })
                        })
                        .collect();
                    json_out::print_json(&rows)?;
                } else {
                    table::print_episode_list(&sorted);
                }
            } else {
                let entries = timeline::compose(&snapshot.episodes, &snapshot.decisions);
                if json_output {
                    json_out::print_json(&entries)?;
                } else {
                    table::print_timeline(&entries);
                }
            }
        }

        Commands::Episodes => {
            let sorted = timeline::sorted_episodes(&snapshot.episodes);
            if json_output {
                let episodes: Vec<_> = sorted.iter().map(|(_, ep)| ep).collect();
                json_out::print_json(&episodes)?;
            } else {
                table::print_episode_list(&sorted);
            }
        }

        Commands::Search { query, filter, limit } => {
            let filter = parse_filter(&filter)?;
            let refs = link::build(&snapshot);
            let mut results = search::filter_conversations(
                &snapshot.conversations,
                &snapshot.decisions,
                filter,
                Some(&query),
            );
            if let Some(limit) = limit {
                results.truncate(limit);
            }
            if json_output {
                json_out::print_json(&serde_json::json!({
                    "query": query,
                    "filter": filter.as_str(),
                    "total": results.len(),
                    "conversations": results,
                }))?;
            } else {
                table::print_conversations(&results, &refs, Some(&query));
            }
        }

        Commands::Conversations { filter } => {
            let filter = parse_filter(&filter)?;
            let refs = link::build(&snapshot);
            let results = search::filter_conversations(
                &snapshot.conversations,
                &snapshot.decisions,
                filter,
                None,
            );
            if json_output {
                json_out::print_json(&serde_json::json!({
                    "filter": filter.as_str(),
                    "total": results.len(),
                    "conversations": results,
                }))?;
            } else {
                table::print_conversations(&results, &refs, None);
            }
        }

        Commands::Decisions { conversation } => {
            let refs = link::build(&snapshot);
            let results: Vec<&mjv::model::Decision> = match conversation.as_deref() {
                Some(conv_id) => refs.decisions_for(conv_id).to_vec(),
                None => snapshot.decisions.iter().collect(),
            };
            if json_output {
                json_out::print_json(&results)?;
            } else {
                table::print_decision_list(&results);
            }
        }

        Commands::Show { id } => {
            let decision = snapshot
                .decisions
                .iter()
                .find(|d| d.id == id)
                .with_context(|| format!("Decision not found: {id}"))?;

            let refs = link::build(&snapshot);
            let conversation = decision.conversation_ref().and_then(|conv_id| {
                snapshot
                    .all_conversations()
                    .into_iter()
                    .find(|c| c.id == conv_id)
            });
            let episode_id = refs.episode_for_decision(decision);

            if json_output {
                json_out::print_json(&serde_json::json!({
                    "decision": decision,
                    "conversation": conversation,
                    "episode_id": episode_id,
                }))?;
            } else {
                table::print_decision_detail(decision, conversation, episode_id);
            }
        }

        Commands::Summary => {
            let summary = summary::summarize(&snapshot.episodes, &snapshot.decisions);
            if json_output {
                json_out::print_json(&summary)?;
            } else {
                table::print_summary(&summary);
            }
        }

        Commands::Init => unreachable!("handled above"),
    }

    Ok(())
}

/// Load the snapshot: live API when a base URL resolves, local files otherwise.
fn load_snapshot(cli: &Cli) -> Result<Snapshot> {
    let config = config::MjvConfig::load()?;

    if let Some(base_url) = config::resolve_base_url(cli.base_url.as_deref(), &config) {
        let client = ApiClient::new(base_url);
        return Ok(client.fetch_snapshot()?);
    }

    let data_dir = config::resolve_data_dir(cli.data_dir.clone(), &config);
    ingest::load_dir(&data_dir)
}

fn parse_filter(s: &str) -> Result<FilterType> {
    match FilterType::from_str(s) {
        Some(f) => Ok(f),
        None => bail!("Unknown filter: {s}. Use: all, decisions, team"),
    }
}
