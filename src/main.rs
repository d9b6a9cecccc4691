use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neural_canvas::config::Config;
use neural_canvas::error::GalleryError;
use neural_canvas::media::draft::{MediaInput, WorkDraft};
use neural_canvas::media::inline::read_upload;
use neural_canvas::sources::defaults::preset_works;
use neural_canvas::sources::remote::source_for;
use neural_canvas::state::data::{is_inline_media, Filter, MediaType, WorkRecord};
use neural_canvas::state::gallery::Gallery;
use neural_canvas::state::library::Library;
use neural_canvas::state::session::{LoginOutcome, Mode};
use neural_canvas::state::store::{FlagStore, UnavailableStore, WorkStore};

/// Terminal front end for the gallery
#[derive(Debug, Parser)]
#[command(name = "neural-canvas", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List works, newest first
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
    },
    /// Show one work with its generated insight
    Show { id: String },
    /// Show profile, mode and catalog size
    Status,
    /// Enter admin mode
    Login { password: String },
    /// Return to public mode
    Logout,
    /// Publish a new work
    Add {
        #[command(flatten)]
        fields: WorkFields,
        #[arg(long, value_enum, default_value_t = MediaKind::Image)]
        media_type: MediaKind,
    },
    /// Edit an existing work; omitted fields keep their current value
    Edit {
        id: String,
        #[command(flatten)]
        fields: WorkFields,
    },
    /// Delete a work
    Delete { id: String },
    /// Export the catalog as a manifest file
    Export {
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Debug, Args)]
struct WorkFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    prompt: Option<String>,
    /// Comma-separated tool names
    #[arg(long)]
    tools: Option<String>,
    /// External media URL or relative path
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,
    /// Media file to embed inline
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long, conflicts_with = "cover_file")]
    cover_url: Option<String>,
    #[arg(long)]
    cover_file: Option<PathBuf>,
    /// Let the enrichment service rewrite the description first
    #[arg(long)]
    polish: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Image,
    Video,
}

impl From<FilterArg> for Filter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Filter::All,
            FilterArg::Image => Filter::Only(MediaType::Image),
            FilterArg::Video => Filter::Only(MediaType::Video),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MediaKind {
    Image,
    Video,
}

impl From<MediaKind> for MediaType {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => MediaType::Image,
            MediaKind::Video => MediaType::Video,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neural_canvas=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let outcome = match Library::open(&config.data_dir) {
        Ok(library) => serve(library, &config, cli.command).await,
        Err(e) => {
            tracing::error!("Failed to open work store in {}: {}", config.data_dir.display(), e);
            serve(UnavailableStore::new(e.to_string()), &config, cli.command).await
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load the gallery on top of `store` and run one command
async fn serve<S: WorkStore + FlagStore>(
    store: S,
    config: &Config,
    command: Command,
) -> Result<(), GalleryError> {
    let remote = config.manifest_location.as_deref().map(source_for);
    let mut gallery = Gallery::load(
        store,
        config.enricher(),
        preset_works(),
        remote.as_deref(),
        &config.admin_password,
    )
    .await;

    run(&mut gallery, command).await
}

async fn run<S: WorkStore + FlagStore>(
    gallery: &mut Gallery<S>,
    command: Command,
) -> Result<(), GalleryError> {
    match command {
        Command::List { filter } => {
            gallery.set_filter(filter.into());
            let works = gallery.visible();
            if works.is_empty() {
                println!("No works found.");
            }
            for work in works {
                print_summary(work);
            }
        }
        Command::Show { id } => {
            gallery.open_detail(&id).await?;
            if let Some((work, insight)) = gallery.detail() {
                print_detail(work, insight);
            }
        }
        Command::Status => {
            let profile = gallery.profile();
            println!("{} / {}", profile.name, profile.role);
            println!("{}", profile.bio);
            println!(
                "Mode: {}",
                match gallery.mode() {
                    Mode::Admin => "admin (read/write)",
                    Mode::Public => "public (read only)",
                }
            );
            println!("{}", gallery.status());
        }
        Command::Login { password } => match gallery.login(&password).await? {
            LoginOutcome::Granted => println!("🔓 {}", gallery.status()),
            LoginOutcome::Denied => eprintln!("{}", gallery.status()),
        },
        Command::Logout => {
            gallery.logout().await?;
            println!("🔒 {}", gallery.status());
        }
        Command::Add { fields, media_type } => {
            gallery.open_creator()?;
            let mut draft = WorkDraft::new(media_type.into());
            apply_fields(&mut draft, &fields).await?;
            if fields.polish {
                gallery.polish(&mut draft).await;
            }
            let work = gallery.submit(draft, None).await?;
            println!("{} (id {})", gallery.status(), work.id);
        }
        Command::Edit { id, fields } => {
            let mut draft = gallery.open_editor(&id)?;
            apply_fields(&mut draft, &fields).await?;
            if fields.polish {
                gallery.polish(&mut draft).await;
            }
            gallery.submit(draft, Some(&id)).await?;
            println!("{}", gallery.status());
        }
        Command::Delete { id } => {
            gallery.remove(&id).await?;
            println!("{}", gallery.status());
        }
        Command::Export { out } => {
            gallery.export_snapshot(&out).await?;
            println!("{}", gallery.status());
        }
    }

    Ok(())
}

/// Copy the supplied command-line fields onto a draft
async fn apply_fields(draft: &mut WorkDraft, fields: &WorkFields) -> Result<(), GalleryError> {
    if let Some(title) = &fields.title {
        draft.title = title.clone();
    }
    if let Some(description) = &fields.description {
        draft.description = description.clone();
    }
    if let Some(prompt) = &fields.prompt {
        draft.prompt = Some(prompt.clone());
    }
    if let Some(tools) = &fields.tools {
        draft.tools = tools.clone();
    }

    draft.media = media_input(&fields.url, &fields.file).await?;
    draft.cover = media_input(&fields.cover_url, &fields.cover_file).await?;

    Ok(())
}

async fn media_input(
    url: &Option<String>,
    file: &Option<PathBuf>,
) -> Result<Option<MediaInput>, GalleryError> {
    if let Some(path) = file {
        let blob = read_upload(path).await.map_err(GalleryError::Media)?;
        return Ok(Some(MediaInput::Upload(blob)));
    }
    Ok(url.clone().map(MediaInput::Url))
}

fn print_summary(work: &WorkRecord) {
    let created = chrono::DateTime::from_timestamp_millis(work.created_at)
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "?".to_string());

    println!(
        "{:<38} {:<6} {}  {}",
        work.id, work.media_type, created, work.title
    );
}

fn print_detail(work: &WorkRecord, insight: &str) {
    println!("{}", work.title);
    println!("id:      {}", work.id);
    println!("type:    {}", work.media_type);
    if is_inline_media(&work.media_url) {
        println!("media:   inline ({} bytes encoded)", work.media_url.len());
    } else {
        println!("media:   {}", work.media_url);
    }
    if let Some(cover) = &work.cover_url {
        println!("cover:   {}", cover);
    }
    if !work.tools.is_empty() {
        println!("tools:   {}", work.tools.join(", "));
    }
    if let Some(prompt) = &work.prompt {
        println!("prompt:  {}", prompt);
    }
    println!();
    println!("{}", work.description);
    if !insight.is_empty() {
        println!();
        println!("AI insight: {}", insight);
    }
}
