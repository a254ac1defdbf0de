//! K-means clustering of yearly frequency shapes
//!
//! Each phrase's yearly percentage series is standardized row-wise
//! (z-score), then grouped into a fixed number of clusters with Lloyd's
//! algorithm. Initial centers are distinct rows chosen by a seeded RNG,
//! so a fixed seed on the same input always yields the same assignment.
//! Outputs: cluster centers, per-phrase membership, and the concatenated
//! member-phrase list per cluster.

use std::collections::HashSet;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use npt_common::tsv::{fmt_pct, write_table, TsvTable};
use npt_common::{Error, Result};

use crate::widetable::WideTable;

const MAX_ITERATIONS: usize = 100;

/// Result of one k-means run
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    pub centers: Vec<Vec<f64>>,
    /// Cluster id per input row, aligned with the input order
    pub assignments: Vec<usize>,
    pub iterations: usize,
}

/// Standardize each row to zero mean and unit variance (population
/// variance). A constant row, whose deviation is zero, maps to all zeros
/// rather than dividing by zero.
pub fn zscore_rows(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    rows.iter()
        .map(|row| {
            let n = row.len() as f64;
            if n == 0.0 {
                return Vec::new();
            }
            let mean = row.iter().sum::<f64>() / n;
            let variance = row.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std_dev = variance.sqrt();
            if std_dev == 0.0 {
                vec![0.0; row.len()]
            } else {
                row.iter().map(|v| (v - mean) / std_dev).collect()
            }
        })
        .collect()
}

/// Lloyd's k-means with seeded Forgy initialization
pub fn kmeans(data: &[Vec<f64>], k: usize, seed: u64) -> Result<KMeans> {
    if k == 0 {
        return Err(Error::InvalidInput("cluster count must be positive".into()));
    }
    if data.len() < k {
        return Err(Error::InvalidInput(format!(
            "{} series cannot fill {} clusters",
            data.len(),
            k
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut chosen: HashSet<usize> = HashSet::with_capacity(k);
    while chosen.len() < k {
        chosen.insert(rng.gen_range(0..data.len()));
    }
    let mut center_rows: Vec<usize> = chosen.into_iter().collect();
    center_rows.sort_unstable();
    let mut centers: Vec<Vec<f64>> = center_rows.iter().map(|&i| data[i].clone()).collect();

    let mut assignments = vec![0usize; data.len()];
    let mut iterations = 0;
    for _ in 0..MAX_ITERATIONS {
        iterations += 1;
        let mut changed = false;
        for (i, row) in data.iter().enumerate() {
            let nearest = nearest_center(row, &centers);
            if assignments[i] != nearest {
                assignments[i] = nearest;
                changed = true;
            }
        }
        if !changed && iterations > 1 {
            break;
        }

        // Recompute centers; an emptied cluster keeps its previous center
        let dims = data[0].len();
        let mut sums = vec![vec![0.0; dims]; k];
        let mut counts = vec![0usize; k];
        for (row, &cluster) in data.iter().zip(&assignments) {
            counts[cluster] += 1;
            for (d, value) in row.iter().enumerate() {
                sums[cluster][d] += value;
            }
        }
        for cluster in 0..k {
            if counts[cluster] > 0 {
                centers[cluster] = sums[cluster]
                    .iter()
                    .map(|sum| sum / counts[cluster] as f64)
                    .collect();
            }
        }
    }

    Ok(KMeans {
        centers,
        assignments,
        iterations,
    })
}

fn nearest_center(row: &[f64], centers: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (cluster, center) in centers.iter().enumerate() {
        let distance: f64 = row
            .iter()
            .zip(center)
            .map(|(a, b)| (a - b).powi(2))
            .sum();
        if distance < best_distance {
            best_distance = distance;
            best = cluster;
        }
    }
    best
}

/// Cluster a wide table (optionally restricted to an allowlist of
/// phrases) and write centers, assignments, and member lists
pub fn run(
    table: &WideTable,
    allowlist: Option<&HashSet<String>>,
    k: usize,
    seed: u64,
    output_folder: &Path,
    subfolder: &str,
) -> Result<KMeans> {
    let rows: Vec<&crate::widetable::WideRow> = table
        .rows
        .iter()
        .filter(|row| allowlist.map_or(true, |allowed| allowed.contains(&row.phrase)))
        .collect();
    if rows.is_empty() {
        return Err(Error::InvalidInput("no series left to cluster".into()));
    }

    let series: Vec<Vec<f64>> = rows.iter().map(|row| row.percentages.clone()).collect();
    let standardized = zscore_rows(&series);
    let result = kmeans(&standardized, k, seed)?;
    info!(
        series = rows.len(),
        clusters = k,
        iterations = result.iterations,
        "k-means converged"
    );

    let dir = output_folder.join(subfolder);

    let mut centers_table = TsvTable::new(
        std::iter::once("cluster".to_string())
            .chain(table.years.iter().map(|y| y.to_string()))
            .collect::<Vec<_>>(),
    );
    for (cluster, center) in result.centers.iter().enumerate() {
        let mut cells = vec![cluster.to_string()];
        cells.extend(center.iter().map(|&v| fmt_pct(v)));
        centers_table.push_row(cells);
    }
    write_table(&dir, "cluster_centers.tsv", &centers_table)?;

    let mut assignments_table = TsvTable::new(vec!["phrase", "cluster"]);
    for (row, &cluster) in rows.iter().zip(&result.assignments) {
        assignments_table.push_row(vec![row.phrase.clone(), cluster.to_string()]);
    }
    write_table(&dir, "cluster_assignments.tsv", &assignments_table)?;

    let mut members_table = TsvTable::new(vec!["cluster", "phrases"]);
    for cluster in 0..k {
        let members: Vec<&str> = rows
            .iter()
            .zip(&result.assignments)
            .filter(|(_, &c)| c == cluster)
            .map(|(row, _)| row.phrase.as_str())
            .collect();
        members_table.push_row(vec![cluster.to_string(), members.join("\t")]);
    }
    write_table(&dir, "cluster_members.tsv", &members_table)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zscore_standardizes_each_row() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![5.0, 5.0, 5.0]];
        let standardized = zscore_rows(&rows);
        let mean: f64 = standardized[0].iter().sum::<f64>() / 3.0;
        assert!(mean.abs() < 1e-12);
        assert!(standardized[0][2] > 0.0 && standardized[0][0] < 0.0);
        // constant row maps to zeros instead of NaN
        assert_eq!(standardized[1], vec![0.0, 0.0, 0.0]);
    }

    fn two_shapes() -> Vec<Vec<f64>> {
        // two obvious shape groups: rising and falling
        vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![0.1, 1.1, 2.1, 3.2],
            vec![3.0, 2.0, 1.0, 0.0],
            vec![3.1, 2.2, 1.1, 0.1],
        ]
    }

    #[test]
    fn separates_obvious_shape_groups() {
        let data = zscore_rows(&two_shapes());
        let result = kmeans(&data, 2, 7).unwrap();
        assert_eq!(result.assignments[0], result.assignments[1]);
        assert_eq!(result.assignments[2], result.assignments[3]);
        assert_ne!(result.assignments[0], result.assignments[2]);
    }

    #[test]
    fn fixed_seed_is_deterministic() {
        let data = zscore_rows(&two_shapes());
        let first = kmeans(&data, 2, 42).unwrap();
        let second = kmeans(&data, 2, 42).unwrap();
        assert_eq!(first.assignments, second.assignments);
        assert_eq!(first.centers, second.centers);
    }

    #[test]
    fn rejects_more_clusters_than_series() {
        let data = vec![vec![1.0, 2.0]];
        assert!(kmeans(&data, 3, 1).is_err());
        assert!(kmeans(&data, 0, 1).is_err());
    }
}
