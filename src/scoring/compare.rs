use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use super::aggregate::StandingsRow;

/// How a driver's championship position moves under simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    Improved(u32),
    Worsened(u32),
    Unchanged,
}

impl Change {
    /// `delta` is official rank minus simulated rank.
    pub fn from_delta(delta: i64) -> Self {
        match delta.cmp(&0) {
            Ordering::Greater => Change::Improved(delta as u32),
            Ordering::Less => Change::Worsened(delta.unsigned_abs() as u32),
            Ordering::Equal => Change::Unchanged,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Improved(n) => write!(f, "▲ {}", n),
            Change::Worsened(n) => write!(f, "▼ {}", n),
            Change::Unchanged => write!(f, "-"),
        }
    }
}

/// One driver's simulated and official result side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Dense rank on simulated points, 1-based
    pub rank: u32,
    pub driver: String,
    pub simulated_points: f64,
    pub official_points: f64,
    pub simulated_rank: u32,
    pub official_rank: u32,
    /// Official rank minus simulated rank; positive means the driver gains places
    pub delta: i64,
    pub change: Change,
}

/// Dense ranks for `points`, highest first. Equal points share a rank and the
/// next distinct value is one rank lower.
pub fn dense_ranks(points: &[f64]) -> Vec<u32> {
    let mut distinct = points.to_vec();
    distinct.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    distinct.dedup();

    points
        .iter()
        .map(|p| {
            distinct
                .iter()
                .position(|d| d == p)
                .map(|i| i as u32 + 1)
                .unwrap_or(distinct.len() as u32)
        })
        .collect()
}

/// Join simulated and official standings on driver and rank both.
///
/// A driver missing from either side counts 0 points there. Rows come back
/// sorted by simulated points, highest first.
pub fn compare(simulated: &[StandingsRow], official: &[StandingsRow]) -> Vec<ComparisonRow> {
    let mut drivers: Vec<(String, f64, f64)> = Vec::with_capacity(simulated.len());
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in simulated {
        index.insert(row.driver.as_str(), drivers.len());
        drivers.push((row.driver.clone(), row.points, 0.0));
    }
    for row in official {
        match index.get(row.driver.as_str()) {
            Some(&i) => drivers[i].2 = row.points,
            None => {
                index.insert(row.driver.as_str(), drivers.len());
                drivers.push((row.driver.clone(), 0.0, row.points));
            }
        }
    }

    let simulated_points: Vec<f64> = drivers.iter().map(|d| d.1).collect();
    let official_points: Vec<f64> = drivers.iter().map(|d| d.2).collect();
    let simulated_ranks = dense_ranks(&simulated_points);
    let official_ranks = dense_ranks(&official_points);

    let mut rows: Vec<ComparisonRow> = drivers
        .into_iter()
        .enumerate()
        .map(|(i, (driver, simulated_points, official_points))| {
            let delta = official_ranks[i] as i64 - simulated_ranks[i] as i64;
            let change = if simulated_points == 0.0 && official_points == 0.0 {
                Change::Unchanged
            } else {
                Change::from_delta(delta)
            };
            ComparisonRow {
                rank: simulated_ranks[i],
                driver,
                simulated_points,
                official_points,
                simulated_rank: simulated_ranks[i],
                official_rank: official_ranks[i],
                delta,
                change,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.simulated_points
            .partial_cmp(&a.simulated_points)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(driver: &str, points: f64) -> StandingsRow {
        StandingsRow {
            driver: driver.to_string(),
            points,
        }
    }

    #[test]
    fn test_dense_ranks() {
        assert_eq!(dense_ranks(&[10.0, 8.0, 8.0, 5.0]), vec![1, 2, 2, 3]);
        assert_eq!(dense_ranks(&[0.0, 3.0, 0.0]), vec![2, 1, 2]);
        assert!(dense_ranks(&[]).is_empty());
    }

    #[test]
    fn test_two_driver_swap() {
        let simulated = vec![row("A", 100.0), row("B", 90.0)];
        let official = vec![row("B", 120.0), row("A", 80.0)];
        let rows = compare(&simulated, &official);

        assert_eq!(rows[0].driver, "A");
        assert_eq!(rows[0].simulated_rank, 1);
        assert_eq!(rows[0].official_rank, 2);
        assert_eq!(rows[0].delta, 1);
        assert_eq!(rows[0].change, Change::Improved(1));
        assert_eq!(rows[0].change.to_string(), "▲ 1");

        assert_eq!(rows[1].driver, "B");
        assert_eq!(rows[1].simulated_rank, 2);
        assert_eq!(rows[1].official_rank, 1);
        assert_eq!(rows[1].delta, -1);
        assert_eq!(rows[1].change, Change::Worsened(1));
        assert_eq!(rows[1].change.to_string(), "▼ 1");
    }

    #[test]
    fn test_outer_join_keeps_everyone() {
        let simulated = vec![row("A", 10.0), row("B", 4.0)];
        let official = vec![row("A", 9.0), row("C", 6.0)];
        let rows = compare(&simulated, &official);
        assert_eq!(rows.len(), 3);

        let c = rows.iter().find(|r| r.driver == "C").unwrap();
        assert_eq!(c.simulated_points, 0.0);
        assert_eq!(c.official_points, 6.0);
        assert_eq!(c.change, Change::Worsened(1));

        let b = rows.iter().find(|r| r.driver == "B").unwrap();
        assert_eq!(b.official_points, 0.0);
        assert_eq!(b.change, Change::Improved(1));
    }

    #[test]
    fn test_pointless_drivers_neutral() {
        let simulated = vec![row("A", 10.0), row("B", 0.0), row("C", 0.0)];
        let official = vec![row("A", 10.0), row("C", 0.0)];
        let rows = compare(&simulated, &official);
        assert!(rows.iter().all(|r| r.change == Change::Unchanged));
        assert_eq!(rows[1].change.to_string(), "-");
    }

    #[test]
    fn test_tied_drivers_share_rank() {
        let simulated = vec![row("A", 12.0), row("B", 12.0), row("C", 3.0)];
        let official = vec![row("A", 12.0), row("B", 10.0), row("C", 3.0)];
        let rows = compare(&simulated, &official);
        let ranks: Vec<u32> = rows.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 2]);
        // B: official 2nd, simulated joint 1st
        let b = rows.iter().find(|r| r.driver == "B").unwrap();
        assert_eq!(b.change, Change::Improved(1));
        // C: official 3rd, simulated 2nd under dense ranking
        let c = rows.iter().find(|r| r.driver == "C").unwrap();
        assert_eq!(c.official_rank, 3);
        assert_eq!(c.simulated_rank, 2);
    }

    #[test]
    fn test_sorted_by_simulated_points() {
        let simulated = vec![row("A", 5.0)];
        let official = vec![row("B", 50.0), row("C", 40.0)];
        let rows = compare(&simulated, &official);
        let drivers: Vec<&str> = rows.iter().map(|r| r.driver.as_str()).collect();
        assert_eq!(drivers, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_compare_empty() {
        assert!(compare(&[], &[]).is_empty());
    }
}
