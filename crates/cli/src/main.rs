mod echo;

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use replytree_core::{
    Forum, ForumConfig, JsonConfig, JsonFormatter, RulesLoader, TextConfig, TextFormatter, Topic, fetch_file,
    fetch_stdin, find_replies_to, reply_thread,
};
use url::Url;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for extracted records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

/// Read forum topics and reconstruct their @mention reply threads
#[derive(Parser, Debug)]
#[command(name = "replytree")]
#[command(version)]
#[command(about = "Read forum topics and their reply threads", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output file (default: stdout)
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, global = true, value_name = "UA")]
    user_agent: Option<String>,

    /// Selector rules file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Wrap text output at this width (0 disables wrapping)
    #[arg(long, global = true, default_value = "80", value_name = "NUM")]
    width: usize,

    /// Omit topic bodies and reply contents from text output
    #[arg(long, global = true)]
    no_content: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Include reply graph edges in JSON topic output
    #[arg(long, global = true)]
    edges: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List topics from a listing page
    List {
        /// Listing URL, local HTML file, or "-" for stdin (default: the site's listing page)
        #[arg(value_name = "INPUT")]
        input: Option<String>,
    },
    /// Show a topic with its replies and reply counts
    Topic {
        /// Topic URL, local HTML file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Topic URL to record when reading from a file or stdin
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },
    /// Show the replies addressed to an author or to one reply
    Replies {
        /// Topic URL, local HTML file, or "-" for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Author whose mentions to collect
        #[arg(long, value_name = "AUTHOR", required_unless_present = "reply", conflicts_with = "reply")]
        to: Option<String>,

        /// Reply position (1-based) to use as the focus
        #[arg(long, value_name = "N")]
        reply: Option<usize>,

        /// Topic URL to record when reading from a file or stdin
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },
}

/// Where page HTML comes from
enum Source {
    Url(String),
    Stdin,
    File(String),
}

impl Source {
    fn from_arg(input: &str) -> Self {
        if input == "-" {
            Source::Stdin
        } else if Url::parse(input).is_ok_and(|u| matches!(u.scheme(), "http" | "https")) {
            Source::Url(input.to_string())
        } else {
            Source::File(input.to_string())
        }
    }

    fn describe(&self) -> String {
        match self {
            Source::Url(url) => format!("Fetching {}", url.bright_white().underline()),
            Source::Stdin => "Reading from stdin".to_string(),
            Source::File(path) => format!("Reading from file {}", path.bright_white()),
        }
    }

    /// Reads local HTML. Returns None for URL sources.
    fn read_local(&self, verbose: bool) -> anyhow::Result<Option<String>> {
        let html = match self {
            Source::Url(_) => return Ok(None),
            Source::Stdin => fetch_stdin().context("Failed to read from stdin")?,
            Source::File(path) => fetch_file(path).with_context(|| format!("Failed to read file: {}", path))?,
        };

        if verbose {
            echo::print_field("Size", &echo::format_size(html.len()));
        }

        Ok(Some(html))
    }
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "replytree=debug,replytree_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize tracing: {e}"))
}

fn build_forum(args: &Args) -> anyhow::Result<Forum> {
    let mut loader = RulesLoader::new();
    if let Some(path) = &args.rules {
        loader = loader.custom_path(path);
    }
    let rules = loader.load().context("Failed to load selector rules")?;
    tracing::debug!(origin = %rules.origin, custom = args.rules.is_some(), "loaded selector rules");

    let mut builder = ForumConfig::builder().timeout(args.timeout).rules(rules);
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }

    Ok(Forum::with_config(builder.build()))
}

async fn load_topic(forum: &Forum, input: &str, url: Option<&str>, verbose: bool) -> anyhow::Result<Topic> {
    let source = Source::from_arg(input);
    if verbose {
        echo::print_step(1, 3, &source.describe());
    }

    let topic = match source.read_local(verbose)? {
        None => forum.fetch_topic(input).await.context("Failed to fetch topic")?,
        Some(html) => {
            if verbose {
                echo::print_step(2, 3, "Extracting topic and replies");
            }
            forum
                .parse_topic(&html, url.unwrap_or(input))
                .context("Failed to extract topic")?
        }
    };

    if verbose {
        echo::print_topic_summary(&topic);
    }

    Ok(topic)
}

async fn run(args: &Args, forum: &Forum) -> anyhow::Result<String> {
    let text = TextFormatter::new(TextConfig {
        line_width: args.width,
        include_content: !args.no_content,
        ..Default::default()
    });
    let json = JsonFormatter::new(JsonConfig { pretty: args.pretty, include_edges: args.edges });

    match &args.command {
        Command::List { input } => {
            let input = input.clone().unwrap_or_else(|| forum.config().rules.listing_url.clone());
            let source = Source::from_arg(&input);
            if args.verbose {
                echo::print_step(1, 3, &source.describe());
            }

            let topics = match source.read_local(args.verbose)? {
                None => forum.fetch_topics_from(&input).await.context("Failed to fetch topic list")?,
                Some(html) => {
                    if args.verbose {
                        echo::print_step(2, 3, "Extracting topic cards");
                    }
                    forum.parse_topics(&html).context("Failed to extract topic list")?
                }
            };

            if args.verbose {
                echo::print_field("Topics", &topics.len().to_string());
                eprintln!();
                if topics.is_empty() {
                    echo::print_warning("No topic cards matched the listing rules");
                }
            }

            match args.format {
                OutputFormat::Text => Ok(text.topic_list(&topics)),
                OutputFormat::Json => json.topic_list(&topics).context("Failed to serialize topics"),
            }
        }
        Command::Topic { input, url } => {
            let topic = load_topic(forum, input, url.as_deref(), args.verbose).await?;

            match args.format {
                OutputFormat::Text => Ok(text.topic(&topic)),
                OutputFormat::Json => json.topic(&topic).context("Failed to serialize topic"),
            }
        }
        Command::Replies { input, to, reply, url } => {
            let topic = load_topic(forum, input, url.as_deref(), args.verbose).await?;

            if let Some(position) = reply {
                let thread = position
                    .checked_sub(1)
                    .and_then(|index| reply_thread(&topic.replies, index))
                    .ok_or_else(|| anyhow!("Reply {} not found (topic has {} replies)", position, topic.replies.len()))?;

                match args.format {
                    OutputFormat::Text => Ok(text.thread(&thread)),
                    OutputFormat::Json => json.thread(&thread).context("Failed to serialize reply thread"),
                }
            } else {
                let target = to.as_deref().unwrap_or_default();
                let replies = find_replies_to(&topic.replies, target);

                match args.format {
                    OutputFormat::Text => Ok(text.mentions(target, &replies)),
                    OutputFormat::Json => json.mentions(target, &replies).context("Failed to serialize replies"),
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let forum = build_forum(&args)?;
    let output = run(&args, &forum).await?;

    if args.verbose {
        echo::print_step(3, 3, "Writing output");
        echo::print_field("Format", &format!("{:?}", args.format));
        eprintln!();
    }

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", output))
                .with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
