use super::{ReportInput, Renderer};
use crate::constants::CSV_HEADER;
use crate::error::{CexError, RenderFailure, RenderStage, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// One CSV data row, one per metric per service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvRecord {
    pub primary_key: String,
    pub secondary_key: String,
    pub metric: String,
    pub granularity: String,
    pub start: String,
    pub end: String,
    pub amount: String,
    pub unit: String,
}

/// Writes one CSV file per invocation
#[derive(Debug, Clone)]
pub struct CsvRenderer {
    path: PathBuf,
}

impl CsvRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn csv_error(source: impl Into<RenderFailure>) -> CexError {
    CexError::render(RenderStage::Csv, source)
}

#[async_trait]
impl Renderer for CsvRenderer {
    type Output = Vec<CsvRecord>;

    fn transform(&self, input: &ReportInput) -> Result<Vec<CsvRecord>> {
        let granularity = input.granularity.to_string();

        Ok(input
            .sorted()
            .into_iter()
            .flat_map(|service| {
                let granularity = &granularity;
                service.metrics.iter().map(move |metric| CsvRecord {
                    primary_key: service.primary_key().to_string(),
                    secondary_key: service.secondary_key().to_string(),
                    metric: metric.name.clone(),
                    granularity: granularity.clone(),
                    start: service.start.clone(),
                    end: service.end.clone(),
                    amount: metric.amount.clone(),
                    unit: metric.unit.clone(),
                })
            })
            .collect())
    }

    async fn render(&self, records: Vec<CsvRecord>) -> Result<()> {
        let file = File::create(&self.path).map_err(csv_error)?;
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer.write_record(CSV_HEADER).map_err(csv_error)?;
        for record in &records {
            writer.serialize(record).map_err(csv_error)?;
        }
        writer.flush().map_err(csv_error)?;

        info!(rows = records.len(), path = %self.path.display(), "wrote CSV report");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::{input, metric, service};

    fn sample() -> ReportInput {
        input(vec![
            service(
                &["Amazon S3", "team$web"],
                "2024-01-01",
                vec![
                    metric("UnblendedCost", 1.5, "USD"),
                    metric("UsageQuantity", 300.0, "GB-Mo"),
                ],
            ),
            service(
                &["Amazon EC2"],
                "2024-01-01",
                vec![metric("UnblendedCost", 99.0, "USD")],
            ),
            service(
                &["AWS Lambda"],
                "2024-01-01",
                vec![
                    metric("UnblendedCost", 0.25, "USD"),
                    metric("UsageQuantity", 1000.0, "Requests"),
                ],
            ),
        ])
    }

    #[test]
    fn test_transform_sorts_and_flattens() {
        let records = CsvRenderer::new("unused.csv").transform(&sample()).unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(records[0].primary_key, "Amazon EC2");
        assert_eq!(records[0].secondary_key, "");
        assert_eq!(records[1].secondary_key, "team$web");
        assert_eq!(records[2].metric, "UsageQuantity");
        assert_eq!(records[2].unit, "GB-Mo");
    }

    #[tokio::test]
    async fn test_file_has_header_and_one_row_per_metric() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        CsvRenderer::new(&path).write(&sample()).await.unwrap();

        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        let rows: Vec<::csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 5 + 1);
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), CSV_HEADER.to_vec());
        assert_eq!(
            rows[1].iter().collect::<Vec<_>>(),
            vec![
                "Amazon EC2",
                "",
                "UnblendedCost",
                "MONTHLY",
                "2024-01-01",
                "2024-02-01",
                "99",
                "USD"
            ]
        );
    }

    #[tokio::test]
    async fn test_unwritable_path_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.csv");

        let err = CsvRenderer::new(path).write(&sample()).await.unwrap_err();
        assert!(matches!(
            err,
            CexError::Render {
                stage: RenderStage::Csv,
                source: RenderFailure::Io(_)
            }
        ));
    }
}
