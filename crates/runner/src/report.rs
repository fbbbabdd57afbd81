//! Run reports: JSON export, CSV history and console tables.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tsp_ga_core::{EvolutionConfig, EvolutionResult};

use crate::dataset::Dataset;

/// A stop on the best tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourStop {
    pub index: usize,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Everything needed to reproduce and inspect one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Dataset source (path or `"bundled"`)
    pub dataset: String,
    /// Configuration used
    pub config: EvolutionConfig,
    /// Best tour as capitals, in visiting order
    pub tour: Vec<TourStop>,
    /// Raw engine result
    pub result: EvolutionResult,
}

impl RunReport {
    /// Builds a report for `result`, resolving tour indices against `dataset`.
    pub fn new(dataset: &Dataset, config: EvolutionConfig, result: EvolutionResult) -> Self {
        let tour = result
            .best
            .cities()
            .iter()
            .filter_map(|&index| {
                dataset.capitals.get(index).map(|c| TourStop {
                    index,
                    name: c.name.clone(),
                    country: c.country.clone(),
                    latitude: c.point.lat_degrees(),
                    longitude: c.point.lon_degrees(),
                })
            })
            .collect();

        Self {
            dataset: dataset.source.clone(),
            config,
            tour,
            result,
        }
    }

    /// Saves the report as pretty JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Saves the best-length history as CSV.
    pub fn save_history_csv(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut file = File::create(path)?;
        self.write_history_csv(&mut file)
    }

    /// Writes `generation,best_length` rows.
    pub fn write_history_csv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "generation,best_length")?;
        for (generation, length) in self.result.history.iter().enumerate() {
            writeln!(out, "{},{:.3}", generation, length)?;
        }
        Ok(())
    }

    /// Prints the run summary and the tour to stdout.
    pub fn print_summary(&self) {
        let result = &self.result;
        println!("\n{:=<72}", "");
        println!("TSP-GA RESULT ({})", self.dataset);
        println!("{:=<72}", "");
        println!(
            "  crossover={}  pool={}  replacement={}  population={}  generations={}",
            self.config.crossover,
            self.config.breeding_pool,
            self.config.replacement,
            self.config.population_size,
            result.generations
        );
        println!(
            "  initial={:.1} km  best={:.1} km  improvement={:.1}%  time={}ms",
            result.initial_length(),
            result.best_length,
            result.improvement_ratio() * 100.0,
            result.elapsed_ms
        );
        println!("{:-<72}", "");
        for (step, stop) in self.tour.iter().enumerate() {
            println!("  {:>3}. {:<28} {}", step + 1, stop.name, stop.country);
        }
        if let Some(first) = self.tour.first() {
            println!("  {:>3}. {}", "", first.name);
        }
        println!("{:=<72}\n", "");
    }
}

/// One row of a crossover comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub crossover: String,
    pub initial_length: f64,
    pub best_length: f64,
    pub improvement_percent: f64,
    pub time_ms: u64,
}

impl From<&EvolutionResult> for ComparisonRow {
    fn from(result: &EvolutionResult) -> Self {
        Self {
            crossover: result.crossover.to_string(),
            initial_length: result.initial_length(),
            best_length: result.best_length,
            improvement_percent: result.improvement_ratio() * 100.0,
            time_ms: result.elapsed_ms,
        }
    }
}

/// Results of running every crossover operator on the same dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Comparison {
    pub dataset: String,
    pub seed: Option<u64>,
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    pub fn new(dataset: impl Into<String>, seed: Option<u64>) -> Self {
        Self {
            dataset: dataset.into(),
            seed,
            rows: Vec::new(),
        }
    }

    pub fn add(&mut self, result: &EvolutionResult) {
        self.rows.push(ComparisonRow::from(result));
    }

    /// Row with the shortest best length.
    pub fn winner(&self) -> Option<&ComparisonRow> {
        self.rows
            .iter()
            .min_by(|a, b| a.best_length.total_cmp(&b.best_length))
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Prints a comparison table to stdout.
    pub fn print_table(&self) {
        println!("\n{:=<72}", "");
        println!("CROSSOVER COMPARISON ({})", self.dataset);
        println!("{:=<72}", "");
        println!(
            "{:<10} {:>14} {:>14} {:>12} {:>10}",
            "Operator", "Initial(km)", "Best(km)", "Improve%", "Time(ms)"
        );
        println!("{:-<72}", "");
        for row in &self.rows {
            println!(
                "{:<10} {:>14.1} {:>14.1} {:>12.1} {:>10}",
                row.crossover,
                row.initial_length,
                row.best_length,
                row.improvement_percent,
                row.time_ms
            );
        }
        println!("{:=<72}", "");
        if let Some(winner) = self.winner() {
            println!("Shortest tour: {} ({:.1} km)\n", winner.crossover, winner.best_length);
        }
    }
}
