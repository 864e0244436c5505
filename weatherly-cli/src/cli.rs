use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use tracing::debug;
use weatherly_core::{
    Config, Coordinates, Dashboard, DataSource, SearchOutcome, SearchSession, Sources,
    SuggestionCursor, SuggestionEngine, TemperatureUnit, sources_from_config,
};

use crate::display;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherly", version, about = "Weather at a glance")]
pub struct Cli {
    /// Log more (-v, -vv). RUST_LOG overrides this.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, units and home location.
    Configure,

    /// Suggest places matching a partial name.
    Search {
        /// Partial place name; omit to search interactively.
        query: Option<String>,

        /// Maximum number of suggestions.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show current conditions and the forecast.
    Show {
        /// City name; omit to use the home location.
        city: Option<String>,

        /// Choose among suggestions for CITY before loading.
        #[arg(long, requires = "city")]
        pick: bool,

        /// Override the configured units ("metric" or "imperial").
        #[arg(long)]
        units: Option<String>,
    },

    /// Current conditions in a few well-known cities.
    Cities {
        /// Refresh number; each one shows the next few cities.
        #[arg(long, default_value_t = 0)]
        rotation: usize,

        #[arg(long, default_value_t = 3)]
        count: usize,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        debug!(units = %config.units, source = %config.data_source(), "configuration loaded");

        match self.command {
            Command::Configure => configure(config)?,
            Command::Search { query, limit } => {
                if let Some(limit) = limit {
                    config.search_limit = limit;
                    config.validate()?;
                }
                let sources = sources_from_config(&config)?;
                warn_if_static(sources.data_source);

                let session = SearchSession::from_config(sources.places, &config);
                match query {
                    Some(query) => {
                        let outcome = session
                            .search(&query)
                            .await
                            .context("search was superseded")?;
                        print!("{}", display::suggestions(&outcome, None));
                    }
                    None => interactive_search(&session).await?,
                }
            }
            Command::Show { city, pick, units } => {
                let units = match units {
                    Some(u) => TemperatureUnit::try_from(u.as_str())?,
                    None => config.units,
                };
                let sources = sources_from_config(&config)?;
                warn_if_static(sources.data_source);

                let city = match (city, pick) {
                    (Some(city), true) => Some(pick_place(&sources, &config, &city).await?),
                    (city, _) => city,
                };

                let dashboard = Dashboard::from_config(&sources, &config);
                let now = Local::now();
                let view = match &city {
                    Some(city) => dashboard.load_city(city, &now).await?,
                    None => dashboard.load_here(&now).await?,
                }
                .context("weather request was superseded")?;

                print!("{}", display::dashboard(&view, units, &Local));
            }
            Command::Cities { rotation, count } => {
                let sources = sources_from_config(&config)?;
                warn_if_static(sources.data_source);

                let dashboard = Dashboard::from_config(&sources, &config);
                let cities = dashboard.featured(rotation, count).await;
                print!("{}", display::featured(&cities, config.units));
            }
        }

        Ok(())
    }
}

fn warn_if_static(source: DataSource) {
    if source == DataSource::Static {
        eprintln!("{}", display::DEMO_NOTICE);
    }
}

/// Line-based autocomplete: a query refreshes the list, `+`/`-` move the
/// highlight and an empty line picks it.
async fn interactive_search(session: &SearchSession) -> anyhow::Result<()> {
    let mut outcome = SearchOutcome::Matches(Vec::new());
    let mut cursor = SuggestionCursor::default();

    loop {
        let Some(input) = Text::new("Search:")
            .with_help_message("+/- to move, Enter on an empty line to pick, Esc to quit")
            .prompt_skippable()?
        else {
            return Ok(());
        };

        match input.trim() {
            "+" => cursor.down(),
            "-" => cursor.up(),
            "" => {
                if let Some(place) = cursor.pick(outcome.places()) {
                    let label = place.label();
                    session.set_query_external(&label);
                    println!("{label}\n{}", place.coordinates().maps_url());
                    return Ok(());
                }
            }
            query => {
                // Sequential input never supersedes itself.
                outcome = session.search(query).await.unwrap_or(SearchOutcome::Failed);
                cursor.reset(outcome.places().len());
            }
        }

        print!("{}", display::suggestions(&outcome, cursor.selected()));
    }
}

async fn pick_place(sources: &Sources, config: &Config, query: &str) -> anyhow::Result<String> {
    let engine = SuggestionEngine::new(sources.places.clone());
    let places = match engine.suggest(query, config.search_limit).await {
        SearchOutcome::Matches(places) if !places.is_empty() => places,
        SearchOutcome::Matches(_) => bail!("No places match \"{query}\"."),
        SearchOutcome::Failed => {
            bail!("Place search failed. Try again or pass the city without --pick.")
        }
    };

    let labels: Vec<String> = places.iter().map(|p| p.label()).collect();
    let chosen = Select::new("Which place?", labels).prompt()?;
    Ok(chosen)
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let key = Text::new("OpenWeather API key (leave empty for demo data):")
        .with_default(config.api_key.as_deref().unwrap_or_default())
        .prompt()?;
    config.set_api_key(&key);

    let choices = vec![TemperatureUnit::Metric, TemperatureUnit::Imperial];
    config.units = Select::new("Temperature units:", choices)
        .with_starting_cursor(usize::from(config.units == TemperatureUnit::Imperial))
        .prompt()?;

    config.default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()?;

    let set_home = inquire::Confirm::new("Set a fixed home location?")
        .with_default(config.home.is_some())
        .prompt()?;
    config.home = if set_home {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a number, e.g. 51.5074")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a number, e.g. -0.1278")
            .prompt()?;
        Some(Coordinates::new(latitude, longitude))
    } else {
        None
    };

    config.validate()?;
    config.save()?;

    let path = Config::config_file_path()?;
    println!("Saved configuration to {}", path.display());
    if config.data_source() == DataSource::Static {
        println!("No API key set; demo data will be shown.");
    }
    Ok(())
}
