use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use tastelist::{
    cli, config, error,
    types::{CreatePlaylistPayload, RawLimit},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the web application
    Serve,

    #[clap(about = "Log in through the browser and create a playlist")]
    Create(CreateOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CreateOptions {
    /// Track source: liked or top
    #[clap(long)]
    source: Option<String>,

    /// Time range for top tracks: short_term, medium_term or long_term
    #[clap(long)]
    time_range: Option<String>,

    /// Maximum number of tracks (1-10000)
    #[clap(long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Playlist name
    #[clap(long)]
    name: Option<String>,

    /// Make the playlist public (true/false)
    #[clap(long)]
    public: Option<bool>,

    /// Playlist description
    #[clap(long)]
    description: Option<String>,
}

impl From<CreateOptions> for CreatePlaylistPayload {
    fn from(opt: CreateOptions) -> Self {
        CreatePlaylistPayload {
            source: opt.source,
            time_range: opt.time_range,
            limit: opt.limit.map(RawLimit::from),
            name: opt.name,
            public: opt.public,
            description: opt.description,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    };

    match cli.command {
        Command::Serve => cli::serve(config).await,
        Command::Create(opt) => cli::create(config, opt.into()).await,
        Command::Completions(_) => {}
    }
}
