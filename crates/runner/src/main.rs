//! TSP-GA runner CLI

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tsp_ga_core::{
    BreedingPoolPolicy, Crossover, DistanceMatrix, EvolutionConfig, EvolutionProgress,
    EvolutionResult, EvolutionRunner, ReplacementPolicy,
};
use tsp_ga_runner::{load_config, logger, Comparison, Dataset, RunReport};

#[derive(Parser)]
#[command(name = "tsp-runner")]
#[command(about = "Genetic algorithm TSP solver for the capitals of the Americas")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve a tour and print the best one found
    Run {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        ga: GaArgs,

        /// Crossover operator (pmx, ox, cx)
        #[arg(short, long)]
        crossover: Option<Crossover>,

        /// Output file for the run report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for the best-length history (CSV)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// List the capitals of the dataset
    List {
        #[command(flatten)]
        dataset: DatasetArgs,
    },

    /// Run every crossover operator with the same settings
    Compare {
        #[command(flatten)]
        dataset: DatasetArgs,

        #[command(flatten)]
        ga: GaArgs,

        /// Output file for the comparison (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct DatasetArgs {
    /// Capitals JSON file (bundled Americas dataset when omitted)
    #[arg(long)]
    capitals: Option<PathBuf>,
}

#[derive(Args)]
struct GaArgs {
    /// Base configuration file (TOML); explicit flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of tours in the population
    #[arg(short, long, alias = "population_size")]
    population_size: Option<usize>,

    /// Number of generations
    #[arg(short, long, alias = "generations_count")]
    generations_count: Option<usize>,

    /// Per-member mutation probability (0.0 - 1.0)
    #[arg(short, long, alias = "mutation_factor")]
    mutation_factor: Option<f64>,

    /// Breeding pool sizing (log2, sqrt)
    #[arg(long)]
    breeding_pool: Option<BreedingPoolPolicy>,

    /// Replacement policy (elitist, generational)
    #[arg(long)]
    replacement: Option<ReplacementPolicy>,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Evaluate tour lengths in parallel
    #[arg(long)]
    parallel: bool,
}

impl GaArgs {
    /// Loads the base configuration and applies explicit flags on top.
    fn to_config(&self) -> anyhow::Result<EvolutionConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => EvolutionConfig::default(),
        };

        if let Some(size) = self.population_size {
            config.population_size = size;
        }
        if let Some(count) = self.generations_count {
            config.generations_count = count;
        }
        if let Some(factor) = self.mutation_factor {
            config.mutation_factor = factor;
        }
        if let Some(policy) = self.breeding_pool {
            config.breeding_pool = policy;
        }
        if let Some(policy) = self.replacement {
            config.replacement = policy;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.parallel {
            config.parallel_evaluation = true;
        }

        config.validate()?;
        Ok(config)
    }
}

fn load_dataset(args: &DatasetArgs) -> anyhow::Result<Dataset> {
    let dataset = Dataset::load_or_bundled(args.capitals.as_deref())
        .context("failed to load capitals")?;
    log::info!("{} capitals loaded from {}", dataset.len(), dataset.source);
    Ok(dataset)
}

fn progress_line(progress: &EvolutionProgress) -> String {
    format!(
        "generation {}/{} ({:.0}%): best {:.1} km, average {:.1} km",
        progress.generation,
        progress.generations_count,
        progress.progress_percent() * 100.0,
        progress.best_length,
        progress.avg_length
    )
}

fn log_progress(progress: EvolutionProgress) {
    let step = (progress.generations_count / 10).max(1);
    if progress.running && progress.generation % step == 0 {
        log::info!("{}", progress_line(&progress));
    }
}

fn evolve(config: &EvolutionConfig, distances: &DistanceMatrix) -> anyhow::Result<EvolutionResult> {
    let runner = EvolutionRunner::new(config.clone(), distances)?;
    Ok(runner.run_with_progress(log_progress)?)
}

fn saved(kind: &str, path: &Path) {
    log::info!("{} saved to: {}", kind, path.display());
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose)?;

    if let Err(e) = dispatch(cli.command) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn dispatch(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            dataset,
            ga,
            crossover,
            output,
            csv,
        } => {
            let mut config = ga.to_config()?;
            if let Some(crossover) = crossover {
                config.crossover = crossover;
            }

            let ds = load_dataset(&dataset)?;
            let distances = ds.distance_matrix()?;
            let result = evolve(&config, &distances)?;

            let report = RunReport::new(&ds, config, result);
            report.print_summary();

            if let Some(path) = output {
                report.save_json(&path)?;
                saved("Report", &path);
            }

            if let Some(path) = csv {
                report.save_history_csv(&path)?;
                saved("History", &path);
            }
        }

        Commands::List { dataset } => {
            let ds = load_dataset(&dataset)?;
            println!("Capitals ({}):", ds.source);
            println!("{:=<72}", "");
            for (i, capital) in ds.capitals.iter().enumerate() {
                println!(
                    "  {:>3} {:<28} {:<24} {:>9.4} {:>10.4}",
                    i,
                    capital.name,
                    capital.country,
                    capital.point.lat_degrees(),
                    capital.point.lon_degrees()
                );
            }
        }

        Commands::Compare {
            dataset,
            ga,
            output,
        } => {
            let base = ga.to_config()?;
            let ds = load_dataset(&dataset)?;
            let distances = ds.distance_matrix()?;

            let mut comparison = Comparison::new(ds.source.clone(), base.seed);
            for crossover in Crossover::ALL {
                let config = base.clone().with_crossover(crossover);
                let result = evolve(&config, &distances)?;
                comparison.add(&result);
            }

            comparison.print_table();

            if let Some(path) = output {
                comparison.save_json(&path)?;
                saved("Comparison", &path);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["tsp-runner", "run"]).unwrap();
        let Commands::Run { ga, crossover, .. } = cli.command else {
            panic!("expected run");
        };
        assert!(crossover.is_none());
        let config = ga.to_config().unwrap();
        assert_eq!(config, EvolutionConfig::default());
    }

    #[test]
    fn test_run_flags_override() {
        let cli = Cli::try_parse_from([
            "tsp-runner",
            "-v",
            "run",
            "--population-size",
            "50",
            "--generations-count",
            "20",
            "--mutation-factor",
            "0.3",
            "--crossover",
            "ox",
            "--breeding-pool",
            "sqrt",
            "--replacement",
            "generational",
            "--seed",
            "5",
            "--parallel",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);

        let Commands::Run { ga, crossover, .. } = cli.command else {
            panic!("expected run");
        };
        assert_eq!(crossover, Some(Crossover::Ox));

        let config = ga.to_config().unwrap();
        assert_eq!(config.population_size, 50);
        assert_eq!(config.generations_count, 20);
        assert_eq!(config.breeding_pool, BreedingPoolPolicy::Sqrt);
        assert_eq!(config.replacement, ReplacementPolicy::Generational);
        assert_eq!(config.seed, Some(5));
        assert!(config.parallel_evaluation);
    }

    #[test]
    fn test_underscore_aliases() {
        let cli =
            Cli::try_parse_from(["tsp-runner", "run", "--population_size", "12"]).unwrap();
        let Commands::Run { ga, .. } = cli.command else {
            panic!("expected run");
        };
        assert_eq!(ga.population_size, Some(12));
    }

    #[test]
    fn test_progress_line_shows_percent() {
        let progress = EvolutionProgress {
            generation: 250,
            generations_count: 1000,
            best_length: 41234.56,
            avg_length: 45000.0,
            elapsed: std::time::Duration::ZERO,
            running: true,
        };
        assert_eq!(
            progress_line(&progress),
            "generation 250/1000 (25%): best 41234.6 km, average 45000.0 km"
        );
    }

    #[test]
    fn test_unknown_crossover_rejected() {
        assert!(Cli::try_parse_from(["tsp-runner", "run", "--crossover", "erx"]).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cli = Cli::try_parse_from(["tsp-runner", "compare", "--population-size", "1"]).unwrap();
        let Commands::Compare { ga, .. } = cli.command else {
            panic!("expected compare");
        };
        assert!(ga.to_config().is_err());
    }
}
