use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::rules::{FastestLapRule, Ruleset, SprintScoring};
use crate::scoring::{Change, ComparisonRow, Progression, ProgressionPoint};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Format points without trailing zeros: "43", "12.5", "0.14"
pub fn format_points(points: f64) -> String {
    if points == 0.0 {
        "0".to_string()
    } else {
        format!("{}", points)
    }
}

/// Truncate a driver name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn color_change(change: Change, text: &str) -> String {
    match change {
        Change::Improved(_) => text.green().to_string(),
        Change::Worsened(_) => text.red().to_string(),
        Change::Unchanged => text.dimmed().to_string(),
    }
}

/// Format the comparison as a table with columns: Rank, Driver, Simulated,
/// Official, Change. The leader's row is bold when colors are on.
pub fn format_comparison_table(rows: &[ComparisonRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No drivers classified.".to_string();
    }

    let rank_width = 4;
    let points_width = 9;
    let separator = "  ";

    let longest = rows
        .iter()
        .map(|r| r.driver.chars().count())
        .max()
        .unwrap_or(0)
        .max("Driver".len());
    // Rank, name, two points columns, change ("▼ 99")
    let fixed_width = rank_width + points_width * 2 + 4 + separator.len() * 4;
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest.min(width - fixed_width),
        Some(_) => longest.min(20),
        None => longest,
    };

    let header = format!(
        "{:>rank$}{sep}{:<name$}{sep}{:>pts$}{sep}{:>pts$}{sep}{}",
        "Rank",
        "Driver",
        "Simulated",
        "Official",
        "Change",
        rank = rank_width,
        name = name_width,
        pts = points_width,
        sep = separator,
    );

    let lines = rows.iter().enumerate().map(|(i, row)| {
        let rank = format!("{:>width$}", format!("{}.", row.rank), width = rank_width);
        let name = format!(
            "{:<width$}",
            truncate_name(&row.driver, name_width),
            width = name_width
        );
        let simulated = format!("{:>width$}", format_points(row.simulated_points), width = points_width);
        let official = format!("{:>width$}", format_points(row.official_points), width = points_width);
        let change = row.change.to_string();

        if use_colors {
            let body = format!("{}{sep}{}{sep}{}", name, simulated, official, sep = separator);
            let body = if i == 0 { body.bold().to_string() } else { body };
            format!(
                "{}{sep}{}{sep}{}",
                rank.dimmed(),
                body,
                color_change(row.change, &change),
                sep = separator
            )
        } else {
            format!(
                "{}{sep}{}{sep}{}{sep}{}{sep}{}",
                rank,
                name,
                simulated,
                official,
                change,
                sep = separator
            )
        }
    });

    let header = if use_colors {
        header.bold().to_string()
    } else {
        header
    };
    std::iter::once(header)
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the comparison as tab-separated values for scripting
/// Columns: rank, driver, simulated, official, delta (no headers, no colors)
pub fn format_comparison_tsv(rows: &[ComparisonRow]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                row.rank,
                row.driver,
                format_points(row.simulated_points),
                format_points(row.official_points),
                row.delta
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn points_for(series: &[ProgressionPoint], driver: &str, round: u32) -> Option<f64> {
    series
        .iter()
        .find(|p| p.round == round && p.driver == driver)
        .map(|p| p.points)
}

fn format_series(
    title: &str,
    series: &[ProgressionPoint],
    rounds: &[u32],
    drivers: &[String],
    use_colors: bool,
) -> String {
    let column_width = drivers
        .iter()
        .map(|d| d.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(6, 16);

    let mut header = format!("{:>5}", "Round");
    for driver in drivers {
        header.push_str(&format!("  {:>width$}", truncate_name(driver, column_width), width = column_width));
    }

    let mut lines = vec![
        if use_colors {
            title.bold().to_string()
        } else {
            title.to_string()
        },
        header,
    ];
    for round in rounds {
        let mut line = format!("{:>5}", round);
        for driver in drivers {
            let cell = points_for(series, driver, *round)
                .map(format_points)
                .unwrap_or_else(|| "-".to_string());
            line.push_str(&format!("  {:>width$}", cell, width = column_width));
        }
        lines.push(line);
    }
    lines.join("\n")
}

/// Format the progression as two round-by-driver tables, simulated first.
pub fn format_progression_table(progression: &Progression, drivers: &[String], use_colors: bool) -> String {
    if progression.is_empty() || drivers.is_empty() {
        return "No scoring drivers to show.".to_string();
    }
    let rounds = progression.rounds();
    format!(
        "{}\n\n{}",
        format_series("Simulated", &progression.simulated, &rounds, drivers, use_colors),
        format_series("Official", &progression.official, &rounds, drivers, use_colors)
    )
}

/// Format the progression as tab-separated values for scripting
/// Columns: series, driver, round, points (no headers)
pub fn format_progression_tsv(progression: &Progression, drivers: &[String]) -> String {
    let selected = |p: &&ProgressionPoint| drivers.iter().any(|d| *d == p.driver);
    progression
        .simulated
        .iter()
        .filter(selected)
        .map(|p| ("simulated", p))
        .chain(progression.official.iter().filter(selected).map(|p| ("official", p)))
        .map(|(series, p)| format!("{}\t{}\t{}\t{}", series, p.driver, p.round, format_points(p.points)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_table(points: &[f64]) -> String {
    points
        .iter()
        .map(|p| format_points(*p))
        .collect::<Vec<_>>()
        .join("-")
}

fn format_rounds(rounds: &[u32]) -> String {
    if rounds.is_empty() {
        "none".to_string()
    } else {
        rounds
            .iter()
            .map(|r| format!("round {}", r))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Describe a ruleset, one parameter per line
pub fn format_ruleset(rules: &Ruleset) -> String {
    let sprint = match &rules.sprint {
        SprintScoring::None => "no points".to_string(),
        SprintScoring::Table(points) => format_table(points),
    };
    let fastest_lap = match &rules.fastest_lap {
        FastestLapRule::None => "no bonus".to_string(),
        FastestLapRule::SharedPoint => "1 point, shared between joint setters".to_string(),
        FastestLapRule::TopFinisher {
            max_position,
            voided_rounds,
        } => {
            let mut text = format!("1 point for a top-{} finisher", max_position);
            if !voided_rounds.is_empty() {
                text.push_str(&format!(" (not paid in {})", format_rounds(voided_rounds)));
            }
            text
        }
    };

    [
        format!("{} applied to {}", rules.source, rules.season),
        format!("  Points:        {}", format_table(&rules.points)),
        format!("  Counting:      {}", rules.drop_policy),
        format!("  Sprint:        {}", sprint),
        format!("  Fastest lap:   {}", fastest_lap),
        format!(
            "  Double final:  {}",
            if rules.double_points_final { "yes" } else { "no" }
        ),
        format!("  Half points:   {}", format_rounds(&rules.half_points_rounds)),
    ]
    .join("\n")
}

/// List seasons, one per line
pub fn format_seasons(years: &[u16]) -> String {
    if years.is_empty() {
        return "No season files found.".to_string();
    }
    years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{compare, StandingsRow};

    fn comparison() -> Vec<ComparisonRow> {
        let simulated = vec![
            StandingsRow { driver: "Alpha".to_string(), points: 100.0 },
            StandingsRow { driver: "Bravo".to_string(), points: 90.5 },
            StandingsRow { driver: "Charlie".to_string(), points: 0.0 },
        ];
        let official = vec![
            StandingsRow { driver: "Bravo".to_string(), points: 120.0 },
            StandingsRow { driver: "Alpha".to_string(), points: 80.0 },
        ];
        compare(&simulated, &official)
    }

    fn progression() -> Progression {
        let point = |driver: &str, round, points| ProgressionPoint {
            driver: driver.to_string(),
            round,
            points,
        };
        Progression {
            official: vec![point("A", 1, 9.0), point("A", 2, 15.0), point("B", 2, 6.0)],
            simulated: vec![point("A", 1, 25.0), point("A", 2, 43.0), point("B", 2, 18.0)],
        }
    }

    #[test]
    fn test_format_points() {
        assert_eq!(format_points(43.0), "43");
        assert_eq!(format_points(12.5), "12.5");
        assert_eq!(format_points(0.14), "0.14");
        assert_eq!(format_points(0.0), "0");
        assert_eq!(format_points(-0.0), "0");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Hunt", 10), "Hunt");
        assert_eq!(truncate_name("Emerson Fittipaldi", 10), "Emerson...");
        assert_eq!(truncate_name("Jochen Rindt", 3), "Joc");
    }

    #[test]
    fn test_comparison_table_empty() {
        assert_eq!(format_comparison_table(&[], false), "No drivers classified.");
    }

    #[test]
    fn test_comparison_table_rows() {
        let output = format_comparison_table(&comparison(), false);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Rank"));
        assert!(lines[0].contains("Change"));
        assert!(lines[1].starts_with("  1."));
        assert!(lines[1].contains("Alpha"));
        assert!(lines[1].contains("100"));
        assert!(lines[1].ends_with("▲ 1"));
        assert!(lines[2].contains("90.5"));
        assert!(lines[2].ends_with("▼ 1"));
        assert!(lines[3].contains("Charlie"));
        assert!(lines[3].ends_with("-"));
    }

    #[test]
    fn test_comparison_tsv() {
        let output = format_comparison_tsv(&comparison());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "1\tAlpha\t100\t80\t1");
        assert_eq!(lines[1], "2\tBravo\t90.5\t120\t-1");
        assert_eq!(lines[2], "3\tCharlie\t0\t0\t0");
        assert_eq!(format_comparison_tsv(&[]), "");
    }

    #[test]
    fn test_progression_table() {
        let drivers = vec!["A".to_string(), "B".to_string()];
        let output = format_progression_table(&progression(), &drivers, false);
        let blocks: Vec<&str> = output.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("Simulated"));
        assert!(blocks[1].starts_with("Official"));

        let simulated: Vec<&str> = blocks[0].lines().collect();
        assert_eq!(simulated.len(), 4);
        assert!(simulated[2].trim_start().starts_with('1'));
        assert!(simulated[2].contains("25"));
        assert!(simulated[2].trim_end().ends_with('-'));
        assert!(simulated[3].contains("43"));
        assert!(simulated[3].contains("18"));
    }

    #[test]
    fn test_progression_table_no_drivers() {
        let output = format_progression_table(&progression(), &[], false);
        assert_eq!(output, "No scoring drivers to show.");
    }

    #[test]
    fn test_progression_tsv() {
        let drivers = vec!["B".to_string()];
        let output = format_progression_tsv(&progression(), &drivers);
        assert_eq!(output, "simulated\tB\t2\t18\nofficial\tB\t2\t6");
    }

    #[test]
    fn test_format_ruleset() {
        let rules = Ruleset::resolve(2021, 2021).unwrap();
        let output = format_ruleset(&rules);
        assert!(output.starts_with("2021 rules applied to 2021"));
        assert!(output.contains("25-18-15-12-10-8-6-4-2-1"));
        assert!(output.contains("all results count"));
        assert!(output.contains("Sprint:        3-2-1"));
        assert!(output.contains("top-10 finisher (not paid in round 12)"));
        assert!(output.contains("Half points:   round 12"));
    }

    #[test]
    fn test_format_ruleset_vintage() {
        let rules = Ruleset::resolve(1954, 1976).unwrap();
        let output = format_ruleset(&rules);
        assert!(output.contains("8-6-4-3-2"));
        assert!(output.contains("best 5 results"));
        assert!(output.contains("shared between joint setters"));
        assert!(output.contains("Half points:   none"));
    }

    #[test]
    fn test_format_seasons() {
        assert_eq!(format_seasons(&[]), "No season files found.");
        assert_eq!(format_seasons(&[1954, 1976]), "1954\n1976");
    }
}
