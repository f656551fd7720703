use super::Renderer;
use super::table::format_grid;
use crate::curator::parse_amount;
use crate::error::{CexError, RenderStage, Result};
use crate::types::{Cost, GetCostForecastResponse};
use async_trait::async_trait;
use std::io::Write;

const HEADER: [&str; 5] = ["Start", "End", "Mean", "Lower Bound", "Upper Bound"];

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub start: String,
    pub end: String,
    pub mean: Cost,
    pub lower: Option<Cost>,
    pub upper: Option<Cost>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastTable {
    pub rows: Vec<ForecastRow>,
    pub total: Option<Cost>,
}

/// Forecast table printed to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastRenderer;

fn parse_cost(field: &str, amount: &str) -> Result<Cost> {
    parse_amount(field, amount).map(Cost::new)
}

fn parse_optional(field: &str, amount: Option<&str>) -> Result<Option<Cost>> {
    amount.map(|a| parse_cost(field, a)).transpose()
}

#[async_trait]
impl Renderer<GetCostForecastResponse> for ForecastRenderer {
    type Output = ForecastTable;

    fn transform(&self, input: &GetCostForecastResponse) -> Result<ForecastTable> {
        let rows = input
            .forecast_results_by_time
            .iter()
            .map(|result| {
                Ok(ForecastRow {
                    start: result.time_period.start.clone(),
                    end: result.time_period.end.clone(),
                    mean: parse_cost("MeanValue", &result.mean_value)?,
                    lower: parse_optional(
                        "PredictionIntervalLowerBound",
                        result.prediction_interval_lower_bound.as_deref(),
                    )?,
                    upper: parse_optional(
                        "PredictionIntervalUpperBound",
                        result.prediction_interval_upper_bound.as_deref(),
                    )?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let total = parse_optional("Total", input.total.as_ref().map(|t| t.amount.as_str()))?;

        Ok(ForecastTable { rows, total })
    }

    async fn render(&self, table: ForecastTable) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(format_forecast(&table).as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| CexError::render(RenderStage::Forecast, e))
    }
}

pub fn format_forecast(table: &ForecastTable) -> String {
    let optional = |cost: &Option<Cost>| cost.map(|c| c.to_string()).unwrap_or_default();

    let body: Vec<Option<Vec<String>>> = table
        .rows
        .iter()
        .map(|row| {
            Some(vec![
                row.start.clone(),
                row.end.clone(),
                row.mean.to_string(),
                optional(&row.lower),
                optional(&row.upper),
            ])
        })
        .collect();

    let footer = table.total.map(|total| {
        vec![
            "TOTAL".to_string(),
            String::new(),
            total.to_string(),
            String::new(),
            String::new(),
        ]
    });

    format_grid(&HEADER, &body, footer.as_deref())
}
