use tracing::debug;

use super::error::LookupError;
use super::types::{Dataset, EffortRow, EffortTable, Metric, MetricValues, Projection};

pub const PROJECTION_LABEL: &str = "Projecao";

pub fn effort(dataset: &Dataset) -> EffortTable {
    let rows = dataset
        .rows()
        .iter()
        .map(|row| EffortRow {
            year_label: row.year_label.clone(),
            efforts: Metric::TIERS
                .into_iter()
                .map(|tier| (tier, row.value(tier) / row.minimum_wage))
                .collect(),
        })
        .collect();
    EffortTable { rows }
}

pub fn percentage_change(
    dataset: &Dataset,
    base_label: &str,
    compare_label: &str,
    metrics: &[Metric],
) -> Result<MetricValues, LookupError> {
    let base = dataset.find(base_label).ok_or_else(|| LookupError {
        label: base_label.to_string(),
    })?;
    let compare = dataset.find(compare_label).ok_or_else(|| LookupError {
        label: compare_label.to_string(),
    })?;

    Ok(metrics
        .iter()
        .map(|&metric| (metric, compare.value(metric) / base.value(metric) - 1.0))
        .collect())
}

pub fn percentage_change_all(
    dataset: &Dataset,
    base_label: &str,
    compare_label: &str,
) -> Result<MetricValues, LookupError> {
    percentage_change(dataset, base_label, compare_label, &Metric::ALL)
}

/// Year embedded in a label such as "iPhone 13 (2021)", or a bare "2021".
pub fn extract_year(label: &str) -> Option<i32> {
    let candidate = match label.rsplit_once('(') {
        Some((_, tail)) if label.ends_with(')') => tail.trim_end_matches(')'),
        _ => label,
    };
    let candidate = candidate.trim();
    if candidate.is_empty() || !candidate.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    candidate.parse().ok()
}

// Falls back to `row_count - 1` when the labels carry no usable years.
pub fn cagr_periods(dataset: &Dataset) -> f64 {
    let span = match (
        extract_year(&dataset.first().year_label),
        extract_year(&dataset.last().year_label),
    ) {
        (Some(first), Some(last)) if last > first => Some(last - first),
        _ => None,
    };
    let periods = span.unwrap_or_else(|| dataset.len() as i32 - 1);
    if periods <= 0 { 1.0 } else { periods as f64 }
}

pub fn cagr(dataset: &Dataset, metrics: &[Metric]) -> MetricValues {
    let periods = cagr_periods(dataset);
    let first = dataset.first();
    let last = dataset.last();

    metrics
        .iter()
        .map(|&metric| {
            let initial = first.value(metric);
            let growth = if initial == 0.0 {
                0.0
            } else {
                (last.value(metric) / initial).powf(1.0 / periods) - 1.0
            };
            (metric, growth)
        })
        .collect()
}

pub fn projection(dataset: &Dataset) -> Projection {
    let growth = cagr(dataset, &Metric::ALL);
    let last = dataset.last();
    let next_year = extract_year(&last.year_label)
        .filter(|&year| year != 0)
        .and_then(|year| year.checked_add(1));
    let label = match next_year {
        Some(year) => format!("{PROJECTION_LABEL} ({year})"),
        None => PROJECTION_LABEL.to_string(),
    };

    let values = Metric::ALL
        .into_iter()
        .map(|metric| (metric, last.value(metric) * (1.0 + growth[&metric])))
        .collect();

    debug!(label = %label, periods = cagr_periods(dataset), "computed projection");
    Projection {
        label,
        values,
        cagr: growth,
        next_year,
    }
}

/// Share of each tier in the summed tier prices of the last row.
pub fn cost_share(dataset: &Dataset) -> MetricValues {
    let last = dataset.last();
    let total: f64 = Metric::TIERS.into_iter().map(|tier| last.value(tier)).sum();
    Metric::TIERS
        .into_iter()
        .map(|tier| {
            let share = if total == 0.0 {
                0.0
            } else {
                last.value(tier) / total
            };
            (tier, share)
        })
        .collect()
}
