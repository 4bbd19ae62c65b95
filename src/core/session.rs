use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::dataset::{YEAR_COLUMN_DISPLAY, default_dataset};
use super::error::EditError;
use super::types::{CohortRow, Dataset, Metric};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorRow {
    pub year_label: String,
    pub cells: BTreeMap<String, Option<Cell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorTable {
    pub index_column: String,
    pub columns: Vec<String>,
    pub rows: Vec<EditorRow>,
}

impl EditorTable {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let rows = dataset
            .rows()
            .iter()
            .map(|row| EditorRow {
                year_label: row.year_label.clone(),
                cells: Metric::ALL
                    .into_iter()
                    .map(|metric| {
                        (
                            metric.display_name().to_string(),
                            Some(Cell::Number(row.value(metric))),
                        )
                    })
                    .collect(),
            })
            .collect();

        Self {
            index_column: YEAR_COLUMN_DISPLAY.to_string(),
            columns: Metric::ALL
                .into_iter()
                .map(|metric| metric.display_name().to_string())
                .collect(),
            rows,
        }
    }

    pub fn set_cell(
        &mut self,
        year_label: &str,
        column: &str,
        value: Option<Cell>,
    ) -> Result<(), EditError> {
        if Metric::from_display_name(column).is_none() {
            return Err(EditError::Shape(format!("coluna desconhecida {column:?}")));
        }
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.year_label == year_label)
            .ok_or_else(|| EditError::Shape(format!("linha desconhecida {year_label:?}")))?;
        row.cells.insert(column.to_string(), value);
        Ok(())
    }

    // Coercion failures win over missing values, which win over range checks.
    pub fn to_dataset(&self, current: &Dataset) -> Result<Dataset, EditError> {
        if self.rows.len() != current.len() {
            return Err(EditError::Shape(format!(
                "esperadas {} linhas, recebidas {}",
                current.len(),
                self.rows.len()
            )));
        }
        for (edited, existing) in self.rows.iter().zip(current.rows()) {
            if edited.year_label != existing.year_label {
                return Err(EditError::Shape(format!(
                    "esperada a linha {:?}, recebida {:?}",
                    existing.year_label, edited.year_label
                )));
            }
        }

        let mut coerced = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            coerced.push(coerce_row(row)?);
        }

        let mut rows = Vec::with_capacity(coerced.len());
        for (row, values) in self.rows.iter().zip(coerced) {
            let mut restored = CohortRow {
                year_label: row.year_label.clone(),
                minimum_wage: 0.0,
                price_base: 0.0,
                price_pro: 0.0,
                price_pro_max: 0.0,
            };
            for metric in Metric::ALL {
                let value = values.get(&metric).copied().flatten().ok_or_else(|| {
                    EditError::MissingValue {
                        year_label: row.year_label.clone(),
                        column: metric.display_name().to_string(),
                    }
                })?;
                restored.set_value(metric, value);
            }
            rows.push(restored);
        }

        for row in &rows {
            check_ranges(row)?;
        }

        Dataset::new(rows).map_err(|e| EditError::Shape(e.to_string()))
    }
}

fn coerce_row(row: &EditorRow) -> Result<BTreeMap<Metric, Option<f64>>, EditError> {
    let mut values = BTreeMap::new();
    for (column, cell) in &row.cells {
        let Some(metric) = Metric::from_display_name(column) else {
            debug!(column = %column, "ignoring unknown editor column");
            continue;
        };
        let value = match cell {
            None => None,
            Some(cell) => coerce_cell(cell).map_err(|raw| EditError::Conversion {
                year_label: row.year_label.clone(),
                column: column.clone(),
                value: raw,
            })?,
        };
        values.insert(metric, value);
    }
    Ok(values)
}

fn coerce_cell(cell: &Cell) -> Result<Option<f64>, String> {
    match cell {
        Cell::Number(value) => Ok((!value.is_nan()).then_some(*value)),
        Cell::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            parse_number(trimmed)
                .map(|value| (!value.is_nan()).then_some(value))
                .ok_or_else(|| text.clone())
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    if let Ok(value) = text.parse::<f64>() {
        return Some(value);
    }
    if !text.contains('.') && text.matches(',').count() == 1 {
        return text.replace(',', ".").parse().ok();
    }
    None
}

fn check_ranges(row: &CohortRow) -> Result<(), EditError> {
    for metric in Metric::ALL {
        let value = row.value(metric);
        let reason = if !value.is_finite() {
            Some("o valor precisa ser finito")
        } else if value < 0.0 {
            Some("o valor nao pode ser negativo")
        } else if metric == Metric::MinimumWage && value == 0.0 {
            Some("o salario minimo precisa ser positivo")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(EditError::InvalidValue {
                year_label: row.year_label.clone(),
                column: metric.display_name().to_string(),
                value,
                reason,
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Viewing,
    Editing,
}

#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    editor: Option<EditorTable>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_dataset(default_dataset())
    }

    pub fn with_dataset(dataset: Dataset) -> Self {
        Self {
            dataset,
            editor: None,
        }
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset.clone()
    }

    pub fn view(&self) -> View {
        match self.editor {
            Some(_) => View::Editing,
            None => View::Viewing,
        }
    }

    pub fn working_copy(&self) -> Option<&EditorTable> {
        self.editor.as_ref()
    }

    pub fn open_editor(&mut self) -> &EditorTable {
        self.editor_mut()
    }

    fn editor_mut(&mut self) -> &mut EditorTable {
        self.editor.get_or_insert_with(|| {
            info!(rows = self.dataset.len(), "opening editor");
            EditorTable::from_dataset(&self.dataset)
        })
    }

    // Uncommitted cell edits are dropped.
    pub fn close_editor(&mut self) {
        if self.editor.take().is_some() {
            info!("closing editor, uncommitted edits discarded");
        }
    }

    pub fn edit_cell(
        &mut self,
        year_label: &str,
        column: &str,
        value: Option<Cell>,
    ) -> Result<(), EditError> {
        self.editor_mut().set_cell(year_label, column, value)
    }

    pub fn apply(&mut self) -> Result<(), EditError> {
        let table = self.open_editor().clone();
        self.commit_edit(&table)
    }

    // A rejected table stays open as the working copy so it can be fixed.
    pub fn commit_edit(&mut self, edited: &EditorTable) -> Result<(), EditError> {
        match edited.to_dataset(&self.dataset) {
            Ok(dataset) => {
                self.dataset = dataset;
                self.editor = Some(EditorTable::from_dataset(&self.dataset));
                info!(rows = self.dataset.len(), "dataset updated from editor");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "rejected editor commit");
                self.editor = Some(edited.clone());
                Err(err)
            }
        }
    }

    pub fn reset(&mut self) {
        info!("restoring default dataset");
        self.dataset = default_dataset();
        self.editor = None;
    }
}
