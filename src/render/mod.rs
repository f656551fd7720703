//! Output backends sharing one transform → render contract.
//!
//! Every backend turns the same [`ReportInput`] into its own output shape in
//! [`Renderer::transform`], then hands it to a sink in [`Renderer::render`].

pub mod chart;
pub mod csv;
pub mod forecast;
pub mod table;
pub mod vector;

pub use chart::{ChartRenderer, PieChart, PieSlice};
pub use self::csv::{CsvRecord, CsvRenderer};
pub use forecast::{ForecastRenderer, ForecastRow, ForecastTable};
pub use table::{TableLine, TableOutput, TableRenderer, TableRow};
pub use vector::VectorRenderer;

use crate::clients::{OpenAIProvider, PineconeStore};
use crate::compiler::compile_group_by;
use crate::config::OutputConfig;
use crate::error::{CexError, Result};
use crate::sorter::{SortBy, sort_services};
use crate::types::{Granularity, GroupDefinition, OutputFormat, Request, Service, ServiceMap};
use async_trait::async_trait;
use std::sync::Arc;

/// Normalized data every renderer consumes
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub services: ServiceMap,
    pub granularity: Granularity,
    pub start: String,
    pub end: String,
    pub dimensions: Vec<String>,
    pub tags: Vec<String>,
    pub sort_by: SortBy,
}

impl ReportInput {
    pub fn new(request: &Request, services: ServiceMap) -> Self {
        Self {
            services,
            granularity: request.granularity,
            start: request.time_start.clone(),
            end: request.time_end.clone(),
            dimensions: request.group_by_dimensions.clone(),
            tags: request.group_by_tags.clone(),
            sort_by: SortBy::from_flag(request.sort_by_date),
        }
    }

    pub fn sorted(&self) -> Vec<&Service> {
        sort_services(&self.services, self.sort_by)
    }

    /// Group definitions the services' keys line up with
    pub fn group_definitions(&self) -> Vec<GroupDefinition> {
        compile_group_by(&self.dimensions, &self.tags)
    }
}

#[async_trait]
pub trait Renderer<I: Sync + ?Sized = ReportInput>: Send + Sync {
    type Output: Send;

    fn transform(&self, input: &I) -> Result<Self::Output>;

    async fn render(&self, output: Self::Output) -> Result<()>;

    async fn write(&self, input: &I) -> Result<()> {
        let output = self.transform(input)?;
        self.render(output).await
    }
}

/// The renderer selected for one invocation
pub enum ReportWriter {
    Table(TableRenderer),
    Csv(CsvRenderer),
    Chart(ChartRenderer),
    Vector(VectorRenderer),
}

impl ReportWriter {
    pub fn for_request(request: &Request, output: &OutputConfig) -> Result<Self> {
        let path = |extension: &str| {
            output.report_path(
                request.granularity,
                &request.time_start,
                &request.time_end,
                extension,
            )
        };

        Ok(match request.output_format {
            OutputFormat::Table => ReportWriter::Table(TableRenderer),
            OutputFormat::Csv => ReportWriter::Csv(CsvRenderer::new(path("csv"))),
            OutputFormat::Chart => ReportWriter::Chart(ChartRenderer::new(path("html"))),
            OutputFormat::Vector => {
                let config = request.vector_store.as_ref().ok_or_else(|| {
                    CexError::compilation("vector output requires vector store credentials")
                })?;
                ReportWriter::Vector(VectorRenderer::new(
                    Arc::new(OpenAIProvider::new(config)),
                    Arc::new(PineconeStore::new(config)),
                ))
            }
        })
    }

    pub async fn write(&self, input: &ReportInput) -> Result<()> {
        match self {
            ReportWriter::Table(renderer) => renderer.write(input).await,
            ReportWriter::Csv(renderer) => renderer.write(input).await,
            ReportWriter::Chart(renderer) => renderer.write(input).await,
            ReportWriter::Vector(renderer) => renderer.write(input).await,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_report_input_from_request() {
        let request = Request::new(Granularity::Daily, "2024-01-01", "2024-01-08")
            .with_dimensions(["SERVICE"])
            .with_tags(["team"])
            .sorted_by_date(true);

        let input = ReportInput::new(&request, ServiceMap::new());
        assert_eq!(input.sort_by, SortBy::Date);
        assert_eq!(input.group_definitions().len(), 2);
        assert!(input.sorted().is_empty());
    }

    #[test]
    fn test_writer_selection() {
        let output = OutputConfig {
            output_dir: PathBuf::from("/tmp"),
        };
        let request = Request::new(Granularity::Monthly, "2024-01-01", "2024-02-01");

        let csv_request = request.clone().with_output(OutputFormat::Csv);
        let writer = ReportWriter::for_request(&csv_request, &output).unwrap();
        match writer {
            ReportWriter::Csv(renderer) => assert_eq!(
                renderer.path(),
                PathBuf::from("/tmp/ccexplorer-MONTHLY-2024-01-01-2024-02-01.csv").as_path()
            ),
            _ => panic!("expected CSV writer"),
        }

        assert!(matches!(
            ReportWriter::for_request(&request.clone(), &output).unwrap(),
            ReportWriter::Table(_)
        ));
        assert!(
            ReportWriter::for_request(&request.with_output(OutputFormat::Vector), &output).is_err()
        );
    }
}
