//! story-browse - query the annotated story collection from the terminal.
//!
//! Loads the story and Wikisource link files, applies the filters given on
//! the command line and prints the matching stories as a table.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use story_catalog::{BrowserConfig, Category, FieldKey, ListField, SortDirection};
use story_query::{
    acquire, columns, header_row, render_rows, sort_options, text_table, Catalog, FilterGroup,
    FilterState, LinkFilter, SortSpec,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "story-browse", version, about = "Filter and sort the annotated story collection")]
struct Cli {
    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Story annotations (overrides the config)
    #[arg(long, value_name = "FILE")]
    stories: Option<PathBuf>,
    /// Wikisource link file (overrides the config)
    #[arg(long, value_name = "FILE")]
    wikisource_file: Option<PathBuf>,

    /// Case-insensitive substring over title and notes
    #[arg(short, long, default_value = "")]
    search: String,
    #[arg(long)]
    min_rating: Option<f64>,
    #[arg(long)]
    max_darkness: Option<f64>,

    #[arg(long)]
    tone: Vec<String>,
    #[arg(long)]
    setting: Vec<String>,
    #[arg(long)]
    ending_type: Vec<String>,
    #[arg(long)]
    mechanism: Vec<String>,
    #[arg(long)]
    protagonist: Vec<String>,
    #[arg(long)]
    agency: Vec<String>,
    #[arg(long)]
    social_target: Vec<String>,
    #[arg(long)]
    constraint: Vec<String>,
    /// Theme flag that must be set, with or without the `theme_` prefix
    #[arg(long)]
    theme: Vec<String>,
    /// Wikisource link presence: any, yes or no
    #[arg(long, default_value = "any")]
    wikisource: LinkFilter,

    /// Sort field name, e.g. `title` or `darkness_level`
    #[arg(long)]
    sort: Option<String>,
    #[arg(long, value_enum)]
    direction: Option<DirectionArg>,

    #[arg(long, value_enum, default_value_t = Output::Table)]
    output: Output,
    /// Print the filter groups with option counts instead of stories
    #[arg(long)]
    options: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    Asc,
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Asc => SortDirection::Asc,
            DirectionArg::Desc => SortDirection::Desc,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    Table,
    Json,
}

impl Cli {
    fn filter_state(&self, config: &BrowserConfig) -> FilterState {
        let mut state = FilterState::from_defaults(&config.defaults)
            .with_search(self.search.clone())
            .with_wikisource(self.wikisource);
        if let Some(min) = self.min_rating {
            state = state.with_min_rating(min);
        }
        if let Some(max) = self.max_darkness {
            state = state.with_max_darkness(max);
        }

        let categories = [
            (Category::Tone, &self.tone),
            (Category::Setting, &self.setting),
            (Category::EndingType, &self.ending_type),
            (Category::CentralMechanism, &self.mechanism),
            (Category::ProtagonistType, &self.protagonist),
            (Category::AgencyDriver, &self.agency),
        ];
        for (category, values) in categories {
            for value in values {
                state = state.toggle_category(category, value.as_str(), true);
            }
        }
        let lists = [
            (ListField::SocialTarget, &self.social_target),
            (ListField::ConstraintPressure, &self.constraint),
        ];
        for (field, values) in lists {
            for value in values {
                state = state.toggle_list(field, value.as_str(), true);
            }
        }
        for theme in &self.theme {
            let key = if story_catalog::is_theme_key(theme) {
                theme.clone()
            } else {
                format!("{}{}", story_catalog::THEME_PREFIX, theme)
            };
            state = state.toggle_theme(key, true);
        }

        if let Some(sort) = &self.sort {
            let key = FieldKey::parse(sort);
            let direction = self
                .direction
                .map(SortDirection::from)
                .unwrap_or_else(|| SortSpec::initial_direction(&key));
            state = state.with_sort(SortSpec { key, direction });
        } else if let Some(direction) = self.direction {
            state.sort.direction = direction.into();
        }
        state
    }
}

fn print_groups(groups: &[FilterGroup]) {
    for group in groups {
        println!("{}", group.title);
        for option in &group.options {
            println!("  {:<40} {:>4}", option.label, option.count);
        }
    }
}

fn load_config(cli: &Cli) -> Result<BrowserConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => BrowserConfig::load(path)?,
        None => BrowserConfig::default(),
    };
    if let Some(stories) = &cli.stories {
        config.data.stories = stories.clone();
    }
    if let Some(wikisource) = &cli.wikisource_file {
        config.data.wikisource = wikisource.clone();
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;
    let catalog: Catalog = acquire(&config.data).await?;
    if let story_query::JoinStatus::Degraded(reason) = catalog.join_status() {
        eprintln!("warning: {reason}; Wikisource links unavailable");
    }

    if cli.options {
        print_groups(catalog.filter_groups());
        return Ok(());
    }

    let state = cli.filter_state(&config);
    let cols = columns();
    if !sort_options(&cols).iter().any(|(key, _)| *key == state.sort.key) {
        tracing::warn!(sort = %state.sort.key, "sorting by a field that has no column");
    }

    let result = catalog.query(&state);
    let rows = render_rows(&result.stories, &cols, &config.artifact_base);
    match cli.output {
        Output::Table => {
            print!("{}", text_table(&header_row(&cols, &state.sort), &rows));
            println!("{}", result.status_line());
        }
        Output::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "story-browse failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
