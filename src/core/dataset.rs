use super::types::{CohortRow, Dataset, Metric};

pub const YEAR_COLUMN: &str = "ano";
pub const YEAR_COLUMN_DISPLAY: &str = "Ano";

const SEED_LABELS: [&str; 5] = [
    "iPhone 13 (2021)",
    "iPhone 14 (2022)",
    "iPhone 15 (2023)",
    "iPhone 16 (2024)",
    "iPhone 17 (2025)",
];
const SEED_MINIMUM_WAGE: [f64; 5] = [1100.00, 1212.00, 1302.00, 1412.00, 1518.00];
const SEED_PRICE_BASE: [f64; 5] = [7599.0, 7599.0, 7299.0, 7799.0, 7999.0];
const SEED_PRICE_PRO: [f64; 5] = [9499.0, 9499.0, 9299.0, 10499.0, 11499.0];
const SEED_PRICE_PRO_MAX: [f64; 5] = [10499.0, 10499.0, 10099.0, 12499.0, 12499.0];

pub const COLUMN_DISPLAY_NAMES: [(&str, &str); 5] = [
    (YEAR_COLUMN, YEAR_COLUMN_DISPLAY),
    ("salario_minimo", "Salario minimo (R$)"),
    ("preco_base", "iPhone (Base)"),
    ("preco_pro", "iPhone Pro"),
    ("preco_pro_max", "iPhone Pro Max"),
];

pub fn default_dataset() -> Dataset {
    let rows = SEED_LABELS
        .iter()
        .enumerate()
        .map(|(idx, label)| CohortRow {
            year_label: (*label).to_string(),
            minimum_wage: SEED_MINIMUM_WAGE[idx],
            price_base: SEED_PRICE_BASE[idx],
            price_pro: SEED_PRICE_PRO[idx],
            price_pro_max: SEED_PRICE_PRO_MAX[idx],
        })
        .collect();
    Dataset::new(rows).expect("seed dataset is well formed")
}

pub fn display_name(column: &str) -> Option<&'static str> {
    COLUMN_DISPLAY_NAMES
        .iter()
        .find(|(key, _)| *key == column)
        .map(|(_, display)| *display)
}

pub fn column_for_display(display: &str) -> Option<&'static str> {
    COLUMN_DISPLAY_NAMES
        .iter()
        .find(|(_, label)| *label == display)
        .map(|(key, _)| *key)
}

impl Metric {
    pub fn display_name(self) -> &'static str {
        display_name(self.key()).expect("every metric has a display name")
    }

    pub fn from_display_name(display: &str) -> Option<Self> {
        column_for_display(display).and_then(Metric::from_key)
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Metric::MinimumWage => "Salario minimo",
            Metric::PriceBase => "Base",
            Metric::PricePro => "Pro",
            Metric::PriceProMax => "Pro Max",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_five_rows_with_expected_edges() {
        let dataset = default_dataset();
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.first().year_label, "iPhone 13 (2021)");
        assert_eq!(dataset.first().minimum_wage, 1100.0);
        assert_eq!(dataset.first().price_pro_max, 10499.0);
        assert_eq!(dataset.last().year_label, "iPhone 17 (2025)");
        assert_eq!(dataset.last().minimum_wage, 1518.0);
        assert_eq!(dataset.last().price_base, 7999.0);
    }

    #[test]
    fn mutating_a_copy_leaves_the_seed_alone() {
        let copy = default_dataset();
        let mut rows = copy.rows().to_vec();
        rows[0].minimum_wage = 1.0;
        let _edited = Dataset::new(rows).expect("valid rows");

        assert_eq!(default_dataset().first().minimum_wage, 1100.0);
        assert_eq!(copy.first().minimum_wage, 1100.0);
    }

    #[test]
    fn display_mapping_is_bidirectional() {
        for (key, display) in COLUMN_DISPLAY_NAMES {
            assert_eq!(display_name(key), Some(display));
            assert_eq!(column_for_display(display), Some(key));
        }
        assert_eq!(display_name("preco_mini"), None);
        assert_eq!(column_for_display("iPhone Mini"), None);
    }

    #[test]
    fn metrics_round_trip_through_display_names() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_display_name(metric.display_name()), Some(metric));
        }
        assert_eq!(Metric::from_display_name(YEAR_COLUMN_DISPLAY), None);
    }

    #[test]
    fn dataset_rejects_duplicate_labels() {
        let mut rows = default_dataset().rows().to_vec();
        rows[1].year_label = rows[0].year_label.clone();
        let err = Dataset::new(rows).expect_err("must reject duplicates");
        assert!(err.to_string().contains("iPhone 13 (2021)"));
    }

    #[test]
    fn dataset_serializes_with_canonical_keys() {
        let json = serde_json::to_string(&default_dataset()).expect("serialize");
        assert!(json.starts_with('['));
        assert!(json.contains("\"ano\":\"iPhone 13 (2021)\""));
        assert!(json.contains("\"salario_minimo\":1100.0"));
        assert!(json.contains("\"preco_pro_max\":12499.0"));
    }

    #[test]
    fn dataset_deserialization_enforces_row_rules() {
        let json = serde_json::to_string(&default_dataset()).expect("serialize");
        let parsed: Dataset = serde_json::from_str(&json).expect("seed json is valid");
        assert_eq!(parsed, default_dataset());
        assert_eq!(parsed.labels()[2], "iPhone 15 (2023)");

        let err = serde_json::from_str::<Dataset>("[]").expect_err("empty table");
        assert!(err.to_string().contains("pelo menos uma linha"));

        let row = r#"{"ano":"2021","salario_minimo":1100,"preco_base":1,"preco_pro":2,"preco_pro_max":3}"#;
        let err = serde_json::from_str::<Dataset>(&format!("[{row},{row}]")).expect_err("repeated label");
        assert!(err.to_string().contains("ano duplicado: 2021"));
    }
}
