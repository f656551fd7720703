use super::{ReportInput, Renderer};
use crate::constants::TABLE_DIVIDER_EVERY;
use crate::error::{CexError, RenderStage, Result};
use crate::formatting::{format_rounded, pad_right};
use crate::types::Cost;
use async_trait::async_trait;
use colored::Colorize;
use std::io::Write;
use tracing::debug;

const HEADER: [&str; 10] = [
    "Rank",
    "Dimension/Tag",
    "Dimension/Tag",
    "Metric",
    "Amount",
    "Rounded",
    "Unit",
    "Granularity",
    "Start",
    "End",
];

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub rank: usize,
    pub primary_key: String,
    pub secondary_key: String,
    pub metric_name: String,
    pub amount: String,
    pub rounded: String,
    pub unit: String,
    pub granularity: String,
    pub start: String,
    pub end: String,
}

impl TableRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.rank.to_string(),
            self.primary_key.clone(),
            self.secondary_key.clone(),
            self.metric_name.clone(),
            self.amount.clone(),
            self.rounded.clone(),
            self.unit.clone(),
            self.granularity.clone(),
            self.start.clone(),
            self.end.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableLine {
    Row(TableRow),
    Divider,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableOutput {
    pub lines: Vec<TableLine>,
    /// Sum of every USD-denominated metric
    pub total: Cost,
}

impl TableOutput {
    pub fn rows(&self) -> impl Iterator<Item = &TableRow> {
        self.lines.iter().filter_map(|line| match line {
            TableLine::Row(row) => Some(row),
            TableLine::Divider => None,
        })
    }
}

/// Cost table printed to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer;

#[async_trait]
impl Renderer for TableRenderer {
    type Output = TableOutput;

    fn transform(&self, input: &ReportInput) -> Result<TableOutput> {
        let granularity = input.granularity.to_string();
        let mut lines = Vec::new();
        let mut total = Cost::default();
        let mut rows = 0;

        for (rank, service) in input.sorted().into_iter().enumerate() {
            for metric in &service.metrics {
                if divider_before(rows, TABLE_DIVIDER_EVERY) {
                    lines.push(TableLine::Divider);
                }

                if metric.is_usd() {
                    total += metric.amount_float;
                }

                lines.push(TableLine::Row(TableRow {
                    rank: rank + 1,
                    primary_key: service.primary_key().to_string(),
                    secondary_key: service.secondary_key().to_string(),
                    metric_name: metric.name.clone(),
                    amount: metric.amount.clone(),
                    rounded: format_rounded(metric.amount_float),
                    unit: metric.unit.clone(),
                    granularity: granularity.clone(),
                    start: service.start.clone(),
                    end: service.end.clone(),
                }));
                rows += 1;
            }
        }

        debug!(rows, "built table rows");
        Ok(TableOutput { lines, total })
    }

    async fn render(&self, output: TableOutput) -> Result<()> {
        let table = format_table(&output);
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(table.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| CexError::render(RenderStage::Table, e))
    }
}

// A zero interval disables dividers
fn divider_before(row: usize, every: usize) -> bool {
    row > 0 && row.checked_rem(every) == Some(0)
}

/// Lay out the table with aligned columns and a total footer
pub fn format_table(output: &TableOutput) -> String {
    let footer = footer_cells(&output.total);
    let body: Vec<Option<Vec<String>>> = output
        .lines
        .iter()
        .map(|line| match line {
            TableLine::Row(row) => Some(row.cells()),
            TableLine::Divider => None,
        })
        .collect();

    format_grid(&HEADER, &body, Some(footer.as_slice()))
}

fn footer_cells(total: &Cost) -> Vec<String> {
    let mut cells = vec![String::new(); HEADER.len()];
    cells[3] = "TOTAL".to_string();
    cells[5] = total.to_formatted_string();
    cells[6] = "USD".to_string();
    cells
}

/// Render a grid; `None` body entries become divider lines
pub(crate) fn format_grid(
    header: &[&str],
    body: &[Option<Vec<String>>],
    footer: Option<&[String]>,
) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    let sized = body.iter().flatten().map(Vec::as_slice).chain(footer);
    for cells in sized {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let join = |cells: Vec<String>| format!("| {} |\n", cells.join(" | "));
    let divider = format!(
        "+-{}-+\n",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );

    let mut out = String::new();
    out.push_str(&divider);
    out.push_str(&join(
        header
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad_right(h, *w).bold().to_string())
            .collect(),
    ));
    out.push_str(&divider);

    for line in body {
        match line {
            Some(cells) => out.push_str(&join(
                cells
                    .iter()
                    .zip(&widths)
                    .map(|(c, w)| pad_right(c, *w))
                    .collect(),
            )),
            None => out.push_str(&divider),
        }
    }

    if let Some(footer) = footer {
        out.push_str(&divider);
        out.push_str(&join(
            footer
                .iter()
                .zip(&widths)
                .map(|(c, w)| pad_right(c, *w).green().bold().to_string())
                .collect(),
        ));
    }

    out.push_str(&divider);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::{input, metric, service};

    #[test]
    fn test_rows_are_ranked_by_cost() {
        let input = input(vec![
            service(
                &["Amazon S3", "team$web"],
                "2024-01-01",
                vec![metric("UnblendedCost", 2.0, "USD")],
            ),
            service(
                &["Amazon EC2", ""],
                "2024-01-01",
                vec![metric("UnblendedCost", 12.346, "USD")],
            ),
        ]);

        let output = TableRenderer.transform(&input).unwrap();
        let rows: Vec<_> = output.rows().collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].primary_key, "Amazon EC2");
        assert_eq!(rows[0].rounded, "12.35");
        assert_eq!(rows[0].granularity, "MONTHLY");
        assert_eq!(rows[1].secondary_key, "team$web");
        assert_eq!(output.total.to_formatted_string(), "$14.35");
    }

    #[test]
    fn test_total_only_counts_usd() {
        let input = input(vec![service(
            &["Amazon EC2"],
            "2024-01-01",
            vec![
                metric("UnblendedCost", 5.0, "USD"),
                metric("UsageQuantity", 720.0, "Hrs"),
            ],
        )]);

        let output = TableRenderer.transform(&input).unwrap();
        assert_eq!(output.rows().count(), 2);
        assert_eq!(output.rows().nth(1).unwrap().rank, 1);
        assert_eq!(output.total.value(), 5.0);
    }

    #[test]
    fn test_divider_every_ten_rows() {
        let services = (0..25)
            .map(|i| {
                service(
                    &["svc"],
                    "2024-01-01",
                    vec![metric("UnblendedCost", i as f64, "USD")],
                )
            })
            .collect();

        let output = TableRenderer.transform(&input(services)).unwrap();
        let dividers: Vec<usize> = output
            .lines
            .iter()
            .enumerate()
            .filter(|(_, line)| matches!(line, TableLine::Divider))
            .map(|(i, _)| i)
            .collect();

        assert_eq!(output.rows().count(), 25);
        assert_eq!(dividers, vec![10, 21]);
    }

    #[test]
    fn test_divider_placement() {
        assert!(!divider_before(0, 10));
        assert!(divider_before(10, 10));
        assert!(!divider_before(11, 10));
        assert!(!divider_before(10, 0));
    }

    #[test]
    fn test_format_table_has_footer() {
        let input = input(vec![service(
            &["Amazon EC2"],
            "2024-01-01",
            vec![metric("UnblendedCost", 3.5, "USD")],
        )]);

        let table = format_table(&TableRenderer.transform(&input).unwrap());
        assert!(table.contains("Amazon EC2"));
        assert!(table.contains("TOTAL"));
        assert!(table.contains("$3.50"));
    }
}
