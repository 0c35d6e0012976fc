//! Equal-width histogram for continuous fields.
//!
//! Bin count comes from [`BinRule`] applied to the number of present values.
//! Edges are `min + i * (max - min) / k` with the last edge pinned to `max`.
//! A value belongs to the bin whose lower edge is the greatest edge `<= value`,
//! so bins are half-open `[lo, hi)` except the last, which is closed and holds
//! the maximum.

use crate::{
    classify::FieldKind,
    config::BinRule,
    data::MISSING_LABEL,
    error::{ProfileError, Result},
    report::{Bucket, FieldProfile},
};

pub fn profile_continuous(
    name: &str,
    values: &[Option<f64>],
    rule: BinRule,
) -> Result<FieldProfile> {
    if values.is_empty() {
        return Err(ProfileError::EmptyColumn {
            field: name.to_string(),
        });
    }
    let present = values.iter().flatten().copied().collect::<Vec<_>>();
    let missing = values.len() - present.len();

    let (min, max) = present
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if present.is_empty() || min == max {
        return Err(ProfileError::DegenerateRange {
            field: name.to_string(),
            value: if present.is_empty() { f64::NAN } else { min },
        });
    }

    let mut bins = rule.bin_count(present.len()).clamp(1, present.len());
    let mut edges = bin_edges(min, max, bins);
    // Bins narrower than an ulp collapse onto each other.
    while bins > 1 && !strictly_increasing(&edges) {
        bins /= 2;
        edges = bin_edges(min, max, bins);
    }
    let mut counts = vec![0usize; bins];
    for &value in &present {
        counts[bin_index(&edges, value)] += 1;
    }

    let labels = edge_labels(&edges, (max - min) / bins as f64);
    let mut buckets = Vec::with_capacity(bins + 1);
    if missing > 0 {
        buckets.push(Bucket::counted(MISSING_LABEL, missing));
    }
    for (idx, count) in counts.into_iter().enumerate() {
        let (lo, hi) = (&labels[idx], &labels[idx + 1]);
        let label = if idx + 1 == bins {
            format!("[{lo}, {hi}]")
        } else {
            format!("[{lo}, {hi})")
        };
        buckets.push(Bucket::counted(label, count));
    }

    Ok(FieldProfile {
        name: name.to_string(),
        kind: FieldKind::Continuous,
        row_count: values.len(),
        buckets,
    })
}

pub fn bin_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let width = (max - min) / bins as f64;
    (0..=bins)
        .map(|i| if i == bins { max } else { min + i as f64 * width })
        .collect()
}

/// Index of the bin holding `value`; values at or above the last edge land in
/// the final bin.
pub fn bin_index(edges: &[f64], value: f64) -> usize {
    let bins = edges.len().saturating_sub(1).max(1);
    edges
        .partition_point(|&edge| edge <= value)
        .saturating_sub(1)
        .min(bins - 1)
}

fn strictly_increasing(edges: &[f64]) -> bool {
    edges.windows(2).all(|pair| pair[0] < pair[1])
}

/// Printed edges, precise enough that no two adjacent edges read the same.
///
/// Fixed notation is tried first, starting two decimals past the first
/// significant digit of the bin width. Widths too small for fixed notation
/// fall through to scientific notation with growing precision.
fn edge_labels(edges: &[f64], width: f64) -> Vec<String> {
    let fixed = (edge_decimals(width)..=MAX_FIXED_DECIMALS)
        .map(|decimals| render_edges(edges, |edge| format_edge(edge, decimals)));
    let scientific = (1..=MAX_SCIENTIFIC_PRECISION)
        .map(|precision| render_edges(edges, |edge| format_scientific(edge, precision)));
    fixed
        .chain(scientific)
        .find(|labels| labels.windows(2).all(|pair| pair[0] != pair[1]))
        .unwrap_or_else(|| render_edges(edges, |edge| format!("{edge:e}")))
}

fn render_edges(edges: &[f64], format: impl Fn(f64) -> String) -> Vec<String> {
    edges.iter().map(|&edge| format(edge)).collect()
}

const MAX_FIXED_DECIMALS: usize = 15;
const MAX_SCIENTIFIC_PRECISION: usize = 16;

fn edge_decimals(width: f64) -> usize {
    let digits = (-width.log10()).floor() + 2.0;
    digits.clamp(0.0, MAX_FIXED_DECIMALS as f64) as usize
}

fn format_edge(edge: f64, decimals: usize) -> String {
    let mut text = format!("{edge:.decimals$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

fn format_scientific(edge: f64, precision: usize) -> String {
    if edge == 0.0 {
        return "0".to_string();
    }
    let text = format!("{edge:.precision$e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
            format!("{mantissa}e{exponent}")
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels_and_counts(profile: &FieldProfile) -> Vec<(String, usize)> {
        profile
            .buckets
            .iter()
            .map(|b| (b.label.clone(), b.measure.count().unwrap()))
            .collect()
    }

    #[test]
    fn fixed_bins_split_evenly() {
        let values = (0..10).map(|v| Some(v as f64)).collect::<Vec<_>>();
        let profile = profile_continuous("score", &values, BinRule::Fixed(5)).expect("histogram");
        assert_eq!(
            labels_and_counts(&profile),
            vec![
                ("[0, 1.8)".to_string(), 2),
                ("[1.8, 3.6)".to_string(), 2),
                ("[3.6, 5.4)".to_string(), 2),
                ("[5.4, 7.2)".to_string(), 2),
                ("[7.2, 9]".to_string(), 2),
            ]
        );
    }

    #[test]
    fn edge_values_are_counted_once() {
        let values = vec![Some(0.0), Some(5.0), Some(10.0)];
        let profile = profile_continuous("x", &values, BinRule::Fixed(2)).expect("histogram");
        assert_eq!(
            labels_and_counts(&profile),
            vec![("[0, 5)".to_string(), 1), ("[5, 10]".to_string(), 2)]
        );
    }

    #[test]
    fn sturges_bins_cover_every_value() {
        let values = (1..=200).map(|v| Some(v as f64 * 1.5)).collect::<Vec<_>>();
        let profile = profile_continuous("Gross", &values, BinRule::Sturges).expect("histogram");
        assert_eq!(profile.buckets.len(), 9);
        assert_eq!(profile.total_count(), Some(200));
        assert!(profile.buckets.last().unwrap().label.ends_with("300]"));
    }

    #[test]
    fn missing_bucket_comes_first() {
        let values = vec![None, Some(1.0), Some(2.0), None, Some(3.0)];
        let profile = profile_continuous("x", &values, BinRule::Fixed(2)).expect("histogram");
        assert_eq!(profile.buckets[0], Bucket::counted(MISSING_LABEL, 2));
        assert_eq!(profile.row_count, 5);
        assert_eq!(profile.total_count(), Some(5));
    }

    #[test]
    fn constant_values_are_degenerate() {
        let values = vec![Some(5.0); 12];
        let err = profile_continuous("flat", &values, BinRule::Sturges).unwrap_err();
        assert!(matches!(err, ProfileError::DegenerateRange { value, .. } if value == 5.0));
    }

    #[test]
    fn narrow_ranges_keep_labels_unique() {
        let values = (0..50)
            .map(|v| Some(1000.0 + v as f64 * 0.0001))
            .collect::<Vec<_>>();
        let profile = profile_continuous("x", &values, BinRule::Sqrt).expect("histogram");
        let mut labels = profile.buckets.iter().map(|b| b.label.clone()).collect::<Vec<_>>();
        let total = labels.len();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), total);
    }

    #[test]
    fn tiny_magnitudes_keep_labels_unique() {
        let values = (0..50).map(|i| Some(i as f64 * 1e-20)).collect::<Vec<_>>();
        let profile = profile_continuous("x", &values, BinRule::Sturges).expect("histogram");
        let mut labels = profile.buckets.iter().map(|b| b.label.clone()).collect::<Vec<_>>();
        assert_eq!(labels.len(), 7);
        assert_eq!(profile.total_count(), Some(50));
        assert!(labels[0].starts_with("[0, 7e-20)"), "{labels:?}");
        assert!(labels[6].ends_with("e-19]"), "{labels:?}");
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 7);
    }

    #[test]
    fn fixed_bins_never_exceed_present_values() {
        let values = (0..10).map(|v| Some(v as f64)).collect::<Vec<_>>();
        let profile = profile_continuous("x", &values, BinRule::Fixed(10_000)).expect("histogram");
        assert_eq!(profile.buckets.len(), 10);
        assert_eq!(profile.total_count(), Some(10));
    }

    #[test]
    fn sub_ulp_bins_collapse() {
        let values = vec![Some(1.0), Some(1.0 + f64::EPSILON)];
        let profile = profile_continuous("x", &values, BinRule::Fixed(2)).expect("histogram");
        assert_eq!(profile.buckets.len(), 1);
        assert_eq!(profile.total_count(), Some(2));
        let label = &profile.buckets[0].label;
        assert!(label.starts_with('[') && label.ends_with(']'), "{label}");
    }

    #[test]
    fn scientific_edges_trim_trailing_zeros() {
        assert_eq!(format_scientific(7e-20, 3), "7e-20");
        assert_eq!(format_scientific(-1.25e-18, 4), "-1.25e-18");
        assert_eq!(format_scientific(0.0, 2), "0");
    }

    #[test]
    fn bin_index_clamps_to_last_bin() {
        let edges = bin_edges(0.0, 1.0, 4);
        assert_eq!(bin_index(&edges, 0.0), 0);
        assert_eq!(bin_index(&edges, 0.25), 1);
        assert_eq!(bin_index(&edges, 1.0), 3);
    }
}
