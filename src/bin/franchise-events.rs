//! Command-line front end for the franchise event engine

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use franchise_events_core::config::load_events_file;
use franchise_events_core::{
    init_engine, Catalog, CatalogSources, HistoryRecord, HistoryStore, JsonlHistory, PresentedOption,
    ResolvedEvent, RolledEvent, Settings,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "franchise-events", version)]
#[command(about = "Roll, validate and review random franchise events")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check every catalog entry and list all problems
    Validate {
        #[command(flatten)]
        catalog: CatalogArgs,
    },
    /// Roll one event for the franchise described by a settings file
    Roll(RollArgs),
    /// Print the recorded events of one season
    History {
        /// JSON-lines history file
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        season: i32,

        #[arg(long)]
        week: Option<u32>,
    },
    /// Count the distinct outcomes each event can produce
    Scenarios {
        #[command(flatten)]
        catalog: CatalogArgs,
    },
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Events file with `events` and optionally `unrealistic_events`
    #[arg(long, default_value = "events.json")]
    events: PathBuf,

    /// Separate file for the unrealistic pool
    #[arg(long)]
    unrealistic: Option<PathBuf>,

    /// User-authored events merged into the standard pool
    #[arg(long)]
    custom: Option<PathBuf>,
}

impl CatalogArgs {
    fn sources(&self) -> Result<CatalogSources> {
        let mut sources = CatalogSources::from_files(&self.events, self.unrealistic.as_deref())
            .with_context(|| format!("reading catalog {}", self.events.display()))?;
        if let Some(path) = &self.custom {
            let custom = load_events_file(path)
                .with_context(|| format!("reading custom events {}", path.display()))?;
            sources = sources.with_custom(custom.events.unwrap_or_default());
        }
        Ok(sources)
    }
}

#[derive(Debug, Args)]
struct RollArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// Franchise settings (difficulty, stage, roster)
    #[arg(long, default_value = "franchise.json")]
    settings: PathBuf,

    /// Option path to choose, e.g. `1.0` for the first sub-option of the second option
    #[arg(long)]
    choose: Option<String>,

    /// Append the outcome to this JSON-lines history file
    #[arg(long)]
    history: Option<PathBuf>,

    /// Seed the generator for a repeatable roll
    #[arg(long)]
    seed: Option<u64>,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Validate { catalog } => validate(&catalog),
        Command::Roll(args) => roll(&args),
        Command::History { file, season, week } => history(file, season, week),
        Command::Scenarios { catalog } => scenarios(&catalog),
    }
}

fn validate(args: &CatalogArgs) -> Result<()> {
    let report = Catalog::inspect(&args.sources()?);
    println!(
        "{} standard, {} unrealistic events valid",
        report.catalog.standard().len(),
        report.catalog.unrealistic().len()
    );
    if report.is_clean() {
        return Ok(());
    }
    for issue in &report.issues {
        println!("  {}", issue);
    }
    bail!("{} catalog entries failed validation", report.issues.len())
}

fn roll(args: &RollArgs) -> Result<()> {
    let engine = init_engine(&args.catalog.sources()?).context("loading catalog")?;
    let settings = Settings::load(&args.settings)
        .with_context(|| format!("reading settings {}", args.settings.display()))?;
    let request = settings.roll_request()?;
    let roster = settings.roster();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let Some(rolled) = engine.roll_with(&request, &roster, &mut rng)? else {
        println!("No event this roll ({} at {})", request.difficulty, request.stage);
        return Ok(());
    };

    let resolved = match &args.choose {
        Some(path) => rolled.choose_with(&parse_path(path)?, &roster, &mut rng)?,
        None if rolled.has_options() => {
            print_rolled(&rolled);
            println!("Re-run with --choose <path> to pick an option");
            return Ok(());
        }
        None => rolled.accept()?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        print_resolved(&resolved);
    }

    if let Some(path) = &args.history {
        let info = &settings.franchise_info;
        let record = HistoryRecord::new(&resolved, info.current_year, info.current_week);
        JsonlHistory::new(path)
            .append(record)
            .with_context(|| format!("writing history {}", path.display()))?;
    }
    Ok(())
}

fn history(file: PathBuf, season: i32, week: Option<u32>) -> Result<()> {
    let store = JsonlHistory::new(file);
    let records = match week {
        Some(week) => store.load_week(season, week)?,
        None => store.load(season)?,
    };
    if records.is_empty() {
        println!("No events recorded for season {}", season);
    }
    for record in records {
        println!(
            "Week {:>2}  {}  {}",
            record.week,
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.title
        );
        println!("          {}", record.description);
        if !record.option_path.is_empty() {
            println!("          chose: {}", record.option_path.join(" > "));
        }
        println!("          impact: {}", record.impact);
    }
    Ok(())
}

fn scenarios(args: &CatalogArgs) -> Result<()> {
    let catalog = Catalog::load(&args.sources()?)?;
    let mut total: u64 = 0;
    for event in catalog.pool(true) {
        let count = event.scenario_count();
        total = total.saturating_add(count);
        println!("{:>6}  {:>8}  {}", event.id, count, event.title);
    }
    println!("{} events, {} scenarios", catalog.len(), total);
    Ok(())
}

fn parse_path(text: &str) -> Result<Vec<usize>> {
    text.split('.')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .with_context(|| format!("invalid option path `{}`", text))
        })
        .collect()
}

fn print_rolled(rolled: &RolledEvent) {
    println!("{}", rolled.title);
    println!("{}", rolled.description);
    if !rolled.impact.is_empty() {
        println!("Impact: {}", rolled.impact);
    }
    print_options(&rolled.options, "");
}

fn print_options(options: &[PresentedOption], prefix: &str) {
    for (index, option) in options.iter().enumerate() {
        let path = if prefix.is_empty() {
            index.to_string()
        } else {
            format!("{}.{}", prefix, index)
        };
        println!("  [{}] {}", path, option.description);
        print_options(&option.options, &path);
    }
}

fn print_resolved(resolved: &ResolvedEvent) {
    println!("{}", resolved.title);
    println!("{}", resolved.description);
    if !resolved.option_path.is_empty() {
        println!("Chose: {}", resolved.option_path.join(" > "));
    }
    println!("Impact: {}", resolved.impact);
    if let Some(target) = &resolved.selected_target {
        println!("Target: {}", target);
    }
    if resolved.is_temporary {
        println!("(temporary)");
    }
}
