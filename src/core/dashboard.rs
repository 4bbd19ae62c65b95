use std::collections::BTreeMap;

use serde::Serialize;

use super::error::LookupError;
use super::format::{DEFAULT_DECIMALS, format_currency, format_decimal, format_percentage};
use super::metrics::{cost_share, effort, extract_year, percentage_change_all, projection};
use super::types::{CohortRow, Dataset, EffortTable, Metric, MetricValues, Projection};

const KPI_TIERS: [Metric; 2] = [Metric::PriceBase, Metric::PriceProMax];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "direction", content = "amount", rename_all = "lowercase")]
pub enum EffortTrend {
    Fell(f64),
    Rose(f64),
    Unchanged,
}

impl EffortTrend {
    pub fn between(reference: f64, value: f64) -> Self {
        let diff = value - reference;
        if diff < 0.0 {
            EffortTrend::Fell(diff.abs())
        } else if diff > 0.0 {
            EffortTrend::Rose(diff)
        } else {
            EffortTrend::Unchanged
        }
    }

    pub fn describe(self, reference_label: &str, decimals: usize) -> String {
        match self {
            EffortTrend::Fell(amount) => format!(
                "O esforco caiu {} salario(s) em relacao a {reference_label}.",
                format_decimal(amount, decimals)
            ),
            EffortTrend::Rose(amount) => format!(
                "O esforco subiu {} salario(s) em relacao a {reference_label}.",
                format_decimal(amount, decimals)
            ),
            EffortTrend::Unchanged => {
                format!("O esforco ficou igual ao observado em {reference_label}.")
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffortKpi {
    pub tier: Metric,
    pub year_label: String,
    pub year: Option<i32>,
    pub effort: f64,
    pub price: f64,
    pub minimum_wage: f64,
    pub effort_display: String,
    pub calculation: String,
    pub trend: Option<EffortTrend>,
    pub reference_label: Option<String>,
    pub insight: Option<String>,
}

impl EffortKpi {
    fn build(row: &CohortRow, tier: Metric, reference: Option<(&CohortRow, f64)>) -> Self {
        let price = row.value(tier);
        let effort = price / row.minimum_wage;
        let effort_display = format_decimal(effort, DEFAULT_DECIMALS);
        let trend = reference.map(|(_, reference_effort)| EffortTrend::between(reference_effort, effort));
        let reference_label = reference.map(|(reference_row, _)| year_or_label(reference_row));
        let insight = trend
            .zip(reference_label.as_deref())
            .map(|(trend, label)| trend.describe(label, DEFAULT_DECIMALS));

        Self {
            tier,
            year_label: row.year_label.clone(),
            year: extract_year(&row.year_label),
            effort,
            price,
            minimum_wage: row.minimum_wage,
            calculation: format!(
                "{} / {} = {effort_display} salarios",
                format_currency(price),
                format_currency(row.minimum_wage)
            ),
            effort_display,
            trend,
            reference_label,
            insight,
        }
    }
}

fn year_or_label(row: &CohortRow) -> String {
    extract_year(&row.year_label)
        .map(|year| year.to_string())
        .unwrap_or_else(|| row.year_label.clone())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonEntry {
    pub metric: Metric,
    pub title: &'static str,
    pub base_value: f64,
    pub compare_value: f64,
    pub change: f64,
    pub base_display: String,
    pub compare_display: String,
    pub change_display: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub base_label: String,
    pub compare_label: String,
    pub entries: Vec<ComparisonEntry>,
}

impl Comparison {
    pub fn build(
        dataset: &Dataset,
        base_label: &str,
        compare_label: &str,
    ) -> Result<Self, LookupError> {
        let change = percentage_change_all(dataset, base_label, compare_label)?;
        let base = dataset.find(base_label).ok_or_else(|| LookupError {
            label: base_label.to_string(),
        })?;
        let compare = dataset.find(compare_label).ok_or_else(|| LookupError {
            label: compare_label.to_string(),
        })?;

        let entries = Metric::ALL
            .into_iter()
            .map(|metric| ComparisonEntry {
                metric,
                title: metric.display_name(),
                base_value: base.value(metric),
                compare_value: compare.value(metric),
                change: change[&metric],
                base_display: format_currency(base.value(metric)),
                compare_display: format_currency(compare.value(metric)),
                change_display: format_percentage(change[&metric], DEFAULT_DECIMALS),
            })
            .collect();

        Ok(Self {
            base_label: base_label.to_string(),
            compare_label: compare_label.to_string(),
            entries,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstLastPrices {
    pub first_label: String,
    pub last_label: String,
    pub first: MetricValues,
    pub last: MetricValues,
}

impl FirstLastPrices {
    pub fn build(dataset: &Dataset) -> Self {
        let tiers_of = |row: &CohortRow| -> MetricValues {
            Metric::TIERS
                .into_iter()
                .map(|tier| (tier, row.value(tier)))
                .collect()
        };
        Self {
            first_label: dataset.first().year_label.clone(),
            last_label: dataset.last().year_label.clone(),
            first: tiers_of(dataset.first()),
            last: tiers_of(dataset.last()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    #[serde(flatten)]
    pub projection: Projection,
    pub cagr_display: BTreeMap<Metric, String>,
    pub values_display: BTreeMap<Metric, String>,
}

impl ProjectionSummary {
    pub fn build(dataset: &Dataset) -> Self {
        let projection = projection(dataset);
        let cagr_display = projection
            .cagr
            .iter()
            .map(|(metric, growth)| (*metric, format_percentage(*growth, DEFAULT_DECIMALS)))
            .collect();
        let values_display = projection
            .values
            .iter()
            .map(|(metric, value)| (*metric, format_currency(*value)))
            .collect();
        Self {
            projection,
            cagr_display,
            values_display,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub dataset: Dataset,
    pub year_labels: Vec<String>,
    pub effort: EffortTable,
    pub kpis: Vec<EffortKpi>,
    pub comparison: Comparison,
    pub first_last: FirstLastPrices,
    pub cost_share: MetricValues,
    pub projection: ProjectionSummary,
}

impl DashboardView {
    pub fn build(
        dataset: &Dataset,
        base_label: &str,
        compare_label: &str,
    ) -> Result<Self, LookupError> {
        let comparison = Comparison::build(dataset, base_label, compare_label)?;

        Ok(Self {
            dataset: dataset.clone(),
            year_labels: dataset.labels().into_iter().map(str::to_string).collect(),
            effort: effort(dataset),
            kpis: effort_kpis(dataset),
            comparison,
            first_last: FirstLastPrices::build(dataset),
            cost_share: cost_share(dataset),
            projection: ProjectionSummary::build(dataset),
        })
    }
}

// First cohort card, then the last cohort card with its trend, per tier.
pub fn effort_kpis(dataset: &Dataset) -> Vec<EffortKpi> {
    let first = dataset.first();
    let last = dataset.last();
    let mut kpis = Vec::with_capacity(KPI_TIERS.len() * 2);
    for tier in KPI_TIERS {
        let reference_effort = first.value(tier) / first.minimum_wage;
        kpis.push(EffortKpi::build(first, tier, None));
        kpis.push(EffortKpi::build(last, tier, Some((first, reference_effort))));
    }
    kpis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset::default_dataset;

    #[test]
    fn trend_classifies_direction() {
        assert_eq!(EffortTrend::between(6.9, 5.3), EffortTrend::Fell(6.9 - 5.3));
        assert_eq!(EffortTrend::between(5.0, 5.5), EffortTrend::Rose(0.5));
        assert_eq!(EffortTrend::between(5.0, 5.0), EffortTrend::Unchanged);
        assert_eq!(
            EffortTrend::Rose(0.34).describe("2021", 1),
            "O esforco subiu 0,3 salario(s) em relacao a 2021."
        );
        assert_eq!(
            EffortTrend::Fell(1.638).describe("2021", 2),
            "O esforco caiu 1,64 salario(s) em relacao a 2021."
        );
        assert_eq!(
            EffortTrend::Unchanged.describe("2021", 1),
            "O esforco ficou igual ao observado em 2021."
        );
    }

    #[test]
    fn kpis_cover_first_and_last_cohorts_for_base_and_pro_max() {
        let kpis = effort_kpis(&default_dataset());
        let summary: Vec<(Metric, &str, bool)> = kpis
            .iter()
            .map(|kpi| (kpi.tier, kpi.year_label.as_str(), kpi.trend.is_some()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Metric::PriceBase, "iPhone 13 (2021)", false),
                (Metric::PriceBase, "iPhone 17 (2025)", true),
                (Metric::PriceProMax, "iPhone 13 (2021)", false),
                (Metric::PriceProMax, "iPhone 17 (2025)", true),
            ]
        );

        let pro_max_2021 = &kpis[2];
        assert_eq!(pro_max_2021.effort_display, "9,5");
        assert_eq!(
            pro_max_2021.calculation,
            "R$ 10.499,00 / R$ 1.100,00 = 9,5 salarios"
        );
        assert_eq!(pro_max_2021.year, Some(2021));

        let base_2025 = &kpis[1];
        assert!(matches!(base_2025.trend, Some(EffortTrend::Fell(_))));
        assert_eq!(base_2025.reference_label.as_deref(), Some("2021"));
        assert_eq!(kpis[0].reference_label, None);
        assert!(
            base_2025
                .insight
                .as_deref()
                .is_some_and(|text| text.ends_with("em relacao a 2021."))
        );
    }

    #[test]
    fn dashboard_view_formats_comparison() {
        let view = DashboardView::build(&default_dataset(), "iPhone 13 (2021)", "iPhone 17 (2025)")
            .expect("labels exist");
        let wage = &view.comparison.entries[0];
        assert_eq!(wage.metric, Metric::MinimumWage);
        assert_eq!(wage.base_display, "R$ 1.100,00");
        assert_eq!(wage.compare_display, "R$ 1.518,00");
        assert_eq!(wage.change_display, "38,0%");
        assert_eq!(view.first_last.first[&Metric::PriceBase], 7599.0);
        assert_eq!(view.first_last.last[&Metric::PriceProMax], 12499.0);
        assert_eq!(view.projection.projection.label, "Projecao (2026)");
        assert_eq!(view.effort.rows.len(), 5);
    }

    #[test]
    fn dashboard_view_propagates_lookup_errors() {
        let err = DashboardView::build(&default_dataset(), "iPhone 13 (2021)", "missing")
            .expect_err("compare label missing");
        assert_eq!(err.label, "missing");
    }

    #[test]
    fn dashboard_view_serializes_canonical_metric_keys() {
        let view = DashboardView::build(&default_dataset(), "iPhone 13 (2021)", "iPhone 17 (2025)")
            .expect("labels exist");
        let json = serde_json::to_value(&view).expect("serialize");
        assert!(json["projection"]["cagr"]["salario_minimo"].is_number());
        assert!(json["projection"]["cagrDisplay"]["preco_pro"].is_string());
        assert_eq!(json["projection"]["nextYear"], 2026);
        assert_eq!(json["kpis"][1]["trend"]["direction"], "fell");
        assert!(json["costShare"]["preco_base"].is_number());
        assert_eq!(json["effort"][0]["yearLabel"], "iPhone 13 (2021)");
        assert_eq!(json["yearLabels"][4], "iPhone 17 (2025)");
        assert_eq!(json["yearLabels"].as_array().map(Vec::len), Some(5));
    }
}
