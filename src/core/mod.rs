mod dashboard;
mod dataset;
mod error;
mod format;
mod metrics;
mod session;
mod types;

pub use dashboard::{
    Comparison, ComparisonEntry, DashboardView, EffortKpi, EffortTrend, FirstLastPrices,
    ProjectionSummary, effort_kpis,
};
pub use dataset::{
    COLUMN_DISPLAY_NAMES, YEAR_COLUMN, YEAR_COLUMN_DISPLAY, column_for_display, default_dataset,
    display_name,
};
pub use error::{DatasetError, EditError, LookupError};
pub use format::{
    CURRENCY_PREFIX, DEFAULT_DECIMALS, format_currency, format_decimal, format_percentage,
};
pub use metrics::{
    PROJECTION_LABEL, cagr, cagr_periods, cost_share, effort, extract_year, percentage_change,
    percentage_change_all, projection,
};
pub use session::{Cell, EditorRow, EditorTable, Session, View};
pub use types::{CohortRow, Dataset, EffortRow, EffortTable, Metric, MetricValues, Projection};
