use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use champ_sim::cache::{build_cache, cached_progression, clear_cache, CacheConfig};
use champ_sim::config::{get_data_dir, load_config, Config};
use champ_sim::output;
use champ_sim::rules::{validate_custom_rules, Ruleset};
use champ_sim::season::{available_seasons, load_season};
use champ_sim::simulate::{progression_drivers, simulate, simulated_standings};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 2;
const EXIT_CONFIG: i32 = 4;

const DEFAULT_SEASON: u16 = 2025;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare simulated and official standings (default if no subcommand)
    Standings,
    /// Show cumulative points after every round
    Progression {
        /// Driver to chart; repeat for several (defaults to the top scorers)
        #[arg(long = "driver")]
        drivers: Vec<String>,
        /// Number of top simulated scorers to chart
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Describe the ruleset of a year
    Rules {
        /// Rule year (defaults to the active rule year)
        year: Option<u16>,
    },
    /// List seasons with a data file
    Seasons,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "champ-sim")]
#[command(about = "Replay championship seasons under another era's scoring rules", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/champ-sim/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Season to replay
    #[arg(short, long, global = true)]
    season: Option<u16>,

    /// Year whose rules are applied (defaults to the season)
    #[arg(short, long, global = true)]
    rules_year: Option<u16>,

    /// Apply custom_rules from the config file
    #[arg(long, global = true)]
    custom: bool,

    /// Directory holding season_<year>.json files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table, global = true)]
    format: Format,

    /// Write output to a file instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Disable the progression cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Clear the progression cache before running
    #[arg(long, global = true)]
    clear_cache: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Settings after merging CLI flags over the config file.
struct Settings {
    season: u16,
    rules_year: u16,
    data_dir: PathBuf,
    cache_enabled: bool,
}

impl Settings {
    fn merge(cli: &Cli, config: &Config) -> Self {
        let season = cli.season.or(config.season).unwrap_or(DEFAULT_SEASON);
        Self {
            season,
            rules_year: cli.rules_year.or(config.rules_year).unwrap_or(season),
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| config.data_dir.clone())
                .unwrap_or_else(get_data_dir),
            cache_enabled: !(cli.no_cache || config.no_cache.unwrap_or(false)),
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn build_ruleset(cli: &Cli, config: &Config, rule_year: u16, season: u16) -> Result<Ruleset> {
    if cli.custom {
        let custom = config
            .custom_rules
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("--custom given but the config has no custom_rules section"))?;
        return Ruleset::from_custom(custom, season);
    }
    Ok(Ruleset::resolve(rule_year, season)?)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    let config = match load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate custom rules at startup
    if let Some(ref custom) = config.custom_rules {
        if let Err(errors) = validate_custom_rules(custom) {
            eprintln!("Custom rules errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    }

    let settings = Settings::merge(&cli, &config);
    log::debug!(
        "Season {}, rule year {}, data in {}",
        settings.season,
        settings.rules_year,
        settings.data_dir.display()
    );

    if cli.clear_cache {
        if let Err(e) = clear_cache() {
            eprintln!("Failed to clear cache: {:#}", e);
        } else {
            log::debug!("Progression cache cleared");
        }
    }

    let use_colors = cli.output.is_none() && output::should_use_colors();
    let default_command = Commands::Standings;
    let command = cli.command.as_ref().unwrap_or(&default_command);

    let rendered = match command {
        Commands::Seasons => match available_seasons(&settings.data_dir) {
            Ok(years) => match cli.format {
                Format::Json => output::to_json(&years),
                Format::Table | Format::Tsv => Ok(output::format_seasons(&years)),
            },
            Err(e) => {
                eprintln!("Data error: {:#}", e);
                std::process::exit(EXIT_DATA);
            }
        },
        Commands::Rules { year } => {
            let rule_year = year.unwrap_or(settings.rules_year);
            match build_ruleset(&cli, &config, rule_year, settings.season) {
                Ok(rules) => match cli.format {
                    Format::Json => output::to_json(&rules),
                    Format::Table | Format::Tsv => Ok(output::format_ruleset(&rules)),
                },
                Err(e) => {
                    eprintln!("Rules error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::Standings | Commands::Progression { .. } => {
            let rules = match build_ruleset(&cli, &config, settings.rules_year, settings.season) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Rules error: {:#}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let season = match load_season(&settings.data_dir, settings.season) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Data error: {:#}", e);
                    std::process::exit(EXIT_DATA);
                }
            };
            if season.is_empty() {
                eprintln!(
                    "No data for season {} in {}",
                    settings.season,
                    settings.data_dir.display()
                );
            }

            match command {
                Commands::Progression { drivers, top } => {
                    let cache = build_cache(&CacheConfig {
                        enabled: settings.cache_enabled,
                    });
                    let progression = match cached_progression(cache.as_ref(), &season.records, &rules) {
                        Ok(p) => p,
                        Err(e) => {
                            eprintln!("Data error: {}", e);
                            std::process::exit(EXIT_DATA);
                        }
                    };
                    let standings = simulated_standings(&season.records, &rules);
                    let selected = progression_drivers(&progression, &standings, drivers, *top);

                    match cli.format {
                        Format::Table => Ok(output::format_progression_table(&progression, &selected, use_colors)),
                        Format::Tsv => Ok(output::format_progression_tsv(&progression, &selected)),
                        Format::Json => output::to_json(&progression),
                    }
                }
                _ => {
                    let simulation = match simulate(&season, &rules) {
                        Ok(s) => s,
                        Err(e) => {
                            eprintln!("Data error: {}", e);
                            std::process::exit(EXIT_DATA);
                        }
                    };

                    match cli.format {
                        Format::Table => {
                            let mut table = output::format_comparison_table(&simulation.comparison, use_colors);
                            if let Some(note) = output::historical_note(settings.season) {
                                table.push_str(&format!("\n\nNote: {}", note));
                            }
                            Ok(table)
                        }
                        Format::Tsv => Ok(output::format_comparison_tsv(&simulation.comparison)),
                        Format::Json => output::to_json(&simulation.comparison),
                    }
                }
            }
        }
    };

    let rendered = match rendered {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Output error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    match cli.output {
        Some(ref path) => {
            if let Err(e) = output::write_output(path, &rendered) {
                eprintln!("Output error: {:#}", e);
                std::process::exit(EXIT_DATA);
            }
            log::debug!("Wrote {}", path.display());
        }
        None => {
            if !rendered.is_empty() {
                println!("{}", rendered);
            }
        }
    }

    log::debug!(
        "Done in {}",
        humantime::format_duration(std::time::Duration::from_millis(
            start_time.elapsed().as_millis() as u64
        ))
    );
    std::process::exit(EXIT_SUCCESS);
}
