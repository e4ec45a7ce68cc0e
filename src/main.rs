use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use tvmaze_widget::{
    ClickEvent, DEFAULT_BASE_URL, Episode, HandlerOutcome, MISSING_IMAGE_URL, SearchForm,
    SearchWidget, Show, ShowLookup, SubmitEvent, TvMazeClient, WidgetRegions, display_value,
    generate_episode_html, generate_show_html, render_document,
};

/// Search TV shows on TVMaze and browse their episodes
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Root URL of the TVMaze API
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Image URL used for shows without a poster
    #[arg(long, global = true, default_value = MISSING_IMAGE_URL)]
    missing_image_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search shows matching a term
    Search {
        term: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List all episodes of a show
    Episodes {
        show_id: u64,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Render the widget page for a search, optionally with a show's episodes
    Page {
        term: String,

        /// Open the episode list of this show from the search results
        #[arg(long)]
        episodes: Option<u64>,

        /// Write the page to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human readable listing
    Text,
    /// The widget's markup fragments
    Html,
    /// Normalized records as JSON
    Json,
}

fn print_shows(shows: &[Show], format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Text => {
            if shows.is_empty() {
                println!("No shows found.");
            }
            for show in shows {
                println!("[{}] {} ({})", show.id, show.name, show.network);
                let summary = nanohtml2text::html2text(&show.summary);
                let summary = summary.trim();
                if !summary.is_empty() {
                    println!("  {}", summary);
                }
                println!("  Image: {}", show.image);
                println!();
            }
        }
        OutputFormat::Html => {
            for show in shows {
                print!("{}", generate_show_html(show)?);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(shows)?),
    }
    Ok(())
}

fn print_episodes(
    episodes: &[Episode],
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Text => {
            if episodes.is_empty() {
                println!("No episodes found.");
            }
            for episode in episodes {
                println!(
                    "{} (Season {}, Episode {})",
                    episode.name,
                    display_value(&episode.season),
                    display_value(&episode.number)
                );
            }
        }
        OutputFormat::Html => {
            for episode in episodes {
                print!("{}", generate_episode_html(episode)?);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(episodes)?),
    }
    Ok(())
}

/// Drives the widget like a user would and returns the resulting page
fn render_page(
    client: TvMazeClient,
    term: &str,
    episodes_of: Option<u64>,
) -> Result<String, Box<dyn std::error::Error>> {
    let widget = SearchWidget::new(client, WidgetRegions::new());

    let mut submit = SubmitEvent::new();
    widget.on_search_submit(&SearchForm::new(term), &mut submit)?;

    if let Some(show_id) = episodes_of {
        let outcome = widget.on_shows_list_click(&ClickEvent::on_episodes_control(show_id))?;
        if outcome == HandlerOutcome::Ignored {
            return Err(format!("Show {} is not among the results for '{}'", show_id, term).into());
        }
    }

    Ok(render_document(term, &widget.into_regions())?)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = TvMazeClient::new()
        .with_base_url(cli.base_url)
        .with_missing_image_url(cli.missing_image_url);

    match cli.command {
        Command::Search { term, format } => {
            let shows = client.search_shows(&term)?;
            print_shows(&shows, format)?;
        }
        Command::Episodes { show_id, format } => {
            let episodes = client.episodes_of_show(show_id)?;
            print_episodes(&episodes, format)?;
        }
        Command::Page {
            term,
            episodes,
            output,
        } => {
            let page = render_page(client, &term, episodes)?;
            match output {
                Some(path) => {
                    fs::write(&path, page)?;
                    eprintln!("Wrote {}", path.display());
                }
                None => print!("{}", page),
            }
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
