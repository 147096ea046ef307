//! Console summaries of run records.

use colored::Colorize;

use crate::records::{BenchmarkRecord, FitRecord, ReconstitutionRecord};

pub fn print_heading(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", "=".repeat(title.len()));
}

/// One line per row, each terminated by a newline
fn table(header: String, rows: impl IntoIterator<Item = String>) -> String {
    let mut out = header;
    out.push('\n');
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    out
}

pub fn benchmark_table(record: &BenchmarkRecord) -> String {
    let header = format!("{:>12} {:>14} {:>14} {:>8}", "generators", "mean (s)", "std (s)", "repeats");
    let rows = record.entries().iter().map(|entry| {
        format!(
            "{:>12} {:>14.6} {:>14.6} {:>8}",
            entry.generator_count, entry.mean_seconds, entry.std_seconds, entry.repeats
        )
    });
    table(header, rows)
}

pub fn reconstitution_table(record: &ReconstitutionRecord) -> String {
    let header = format!("{:>12} {:>16} {:>12}", "generators", "% reconstituted", "degenerate");
    let rows = record.entries().iter().map(|entry| {
        format!(
            "{:>12} {:>16.10} {:>12}",
            entry.generator_count, entry.percent_reconstituted, entry.degenerate_polygons
        )
    });
    table(header, rows)
}

pub fn fit_table(record: &FitRecord) -> String {
    let header = format!("{:>8} {:>14} {:>14} {:>14} {:>10}", "model", "K", "var(K)", "rss", "converged");
    let rows = record.fits.iter().map(|fit| {
        let variance = fit.k_variance.map_or_else(|| "n/a".to_string(), |v| format!("{v:.6e}"));
        format!(
            "{:>8} {:>14.6e} {:>14} {:>14.6e} {:>10}",
            fit.model.label(),
            fit.k,
            variance,
            fit.residual_sum_squares,
            fit.converged
        )
    });
    table(header, rows)
}

/// Mean times of two benchmarks side by side, for counts both measured
pub fn comparison_table(baseline: &BenchmarkRecord, candidate: &BenchmarkRecord) -> String {
    let header = format!(
        "{:>12} {:>18} {:>18} {:>10}",
        "generators",
        baseline.engine(),
        candidate.engine(),
        "speedup"
    );
    let rows = baseline.entries().iter().filter_map(|entry| {
        let other = candidate.entry_for(entry.generator_count)?;
        let speedup = entry.mean_seconds / other.mean_seconds;
        Some(format!(
            "{:>12} {:>18.6} {:>18.6} {:>9.1}x",
            entry.generator_count, entry.mean_seconds, other.mean_seconds, speedup
        ))
    });
    table(header, rows)
}

pub fn print_benchmark(record: &BenchmarkRecord) {
    print_heading(&format!("Benchmark: {}", record.engine()));
    print!("{}", benchmark_table(record));
}

pub fn print_reconstitution(record: &ReconstitutionRecord) {
    print_heading(&format!(
        "Surface area reconstitution: {} (r = {})",
        record.engine(),
        record.radius()
    ));
    print!("{}", reconstitution_table(record));
}

pub fn print_fit(record: &FitRecord) {
    print_heading(&format!("Time complexity fit: {}", record.engine));
    print!("{}", fit_table(record));
}

pub fn print_comparison(baseline: &BenchmarkRecord, candidate: &BenchmarkRecord) {
    print_heading(&format!("{} vs {}", baseline.engine(), candidate.engine()));
    print!("{}", comparison_table(baseline, candidate));
}
