use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::DatasetError;

// Variant order is the display order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "salario_minimo")]
    MinimumWage,
    #[serde(rename = "preco_base")]
    PriceBase,
    #[serde(rename = "preco_pro")]
    PricePro,
    #[serde(rename = "preco_pro_max")]
    PriceProMax,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::MinimumWage,
        Metric::PriceBase,
        Metric::PricePro,
        Metric::PriceProMax,
    ];

    pub const TIERS: [Metric; 3] = [Metric::PriceBase, Metric::PricePro, Metric::PriceProMax];

    pub fn key(self) -> &'static str {
        match self {
            Metric::MinimumWage => "salario_minimo",
            Metric::PriceBase => "preco_base",
            Metric::PricePro => "preco_pro",
            Metric::PriceProMax => "preco_pro_max",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.key() == key)
    }
}

pub type MetricValues = BTreeMap<Metric, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortRow {
    #[serde(rename = "ano")]
    pub year_label: String,
    #[serde(rename = "salario_minimo")]
    pub minimum_wage: f64,
    #[serde(rename = "preco_base")]
    pub price_base: f64,
    #[serde(rename = "preco_pro")]
    pub price_pro: f64,
    #[serde(rename = "preco_pro_max")]
    pub price_pro_max: f64,
}

impl CohortRow {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::MinimumWage => self.minimum_wage,
            Metric::PriceBase => self.price_base,
            Metric::PricePro => self.price_pro,
            Metric::PriceProMax => self.price_pro_max,
        }
    }

    pub fn set_value(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::MinimumWage => self.minimum_wage = value,
            Metric::PriceBase => self.price_base = value,
            Metric::PricePro => self.price_pro = value,
            Metric::PriceProMax => self.price_pro_max = value,
        }
    }
}

// Never empty, labels unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<CohortRow>,
}

impl Dataset {
    pub fn new(rows: Vec<CohortRow>) -> Result<Self, DatasetError> {
        if rows.is_empty() {
            return Err(DatasetError::Empty);
        }
        for (idx, row) in rows.iter().enumerate() {
            if rows[..idx].iter().any(|r| r.year_label == row.year_label) {
                return Err(DatasetError::DuplicateLabel(row.year_label.clone()));
            }
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[CohortRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> &CohortRow {
        &self.rows[0]
    }

    pub fn last(&self) -> &CohortRow {
        &self.rows[self.rows.len() - 1]
    }

    pub fn find(&self, year_label: &str) -> Option<&CohortRow> {
        self.rows.iter().find(|row| row.year_label == year_label)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.year_label.as_str()).collect()
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<CohortRow>::deserialize(deserializer)?;
        Dataset::new(rows).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffortRow {
    pub year_label: String,
    pub efforts: MetricValues,
}

#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct EffortTable {
    pub rows: Vec<EffortRow>,
}

impl EffortTable {
    pub fn get(&self, year_label: &str, metric: Metric) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.year_label == year_label)
            .and_then(|row| row.efforts.get(&metric).copied())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub label: String,
    pub values: MetricValues,
    pub cagr: MetricValues,
    pub next_year: Option<i32>,
}
