use super::{ReportInput, Renderer};
use crate::constants::CHART_TOP_N;
use crate::error::{CexError, RenderFailure, RenderStage, Result};
use crate::formatting::format_period;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
}

/// One pie per group-by key position
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub subtitle: String,
    pub slices: Vec<PieSlice>,
}

/// Writes an HTML page of pie charts
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    path: PathBuf,
}

impl ChartRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn chart_error(source: impl Into<RenderFailure>) -> CexError {
    CexError::render(RenderStage::Chart, source)
}

#[async_trait]
impl Renderer for ChartRenderer {
    type Output = Vec<PieChart>;

    fn transform(&self, input: &ReportInput) -> Result<Vec<PieChart>> {
        let sorted = input.sorted();
        let top = &sorted[..sorted.len().min(CHART_TOP_N)];
        let subtitle = format_period(input.granularity.as_str(), &input.start, &input.end);

        let charts = input
            .group_definitions()
            .into_iter()
            .enumerate()
            .map(|(position, group)| {
                let mut slices: Vec<PieSlice> = Vec::new();
                for service in top {
                    let name = service.keys.get(position).cloned().unwrap_or_default();
                    let value = service.primary_amount();
                    // Repeated key values share one slice
                    match slices.iter_mut().find(|slice| slice.name == name) {
                        Some(slice) => slice.value += value,
                        None => slices.push(PieSlice { name, value }),
                    }
                }

                PieChart {
                    title: group.key,
                    subtitle: subtitle.clone(),
                    slices,
                }
            })
            .collect();

        Ok(charts)
    }

    async fn render(&self, charts: Vec<PieChart>) -> Result<()> {
        let file = File::create(&self.path).map_err(chart_error)?;
        let mut writer = BufWriter::new(file);

        writer
            .write_all(chart_page(&charts)?.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(chart_error)?;

        info!(charts = charts.len(), path = %self.path.display(), "wrote chart report");
        Ok(())
    }
}

fn chart_page(charts: &[PieChart]) -> Result<String> {
    let mut page = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Cost Explorer</title>\n<script src=\"{}\"></script>\n</head>\n<body>\n",
        ECHARTS_CDN
    );

    for (index, chart) in charts.iter().enumerate() {
        let option = json!({
            "title": {"text": chart.title, "subtext": chart.subtitle, "left": "center"},
            "tooltip": {"trigger": "item", "formatter": "{b}: ${c} ({d}%)"},
            "legend": {"orient": "vertical", "left": "left", "type": "scroll"},
            "series": [{
                "name": chart.title,
                "type": "pie",
                "radius": "55%",
                "data": chart.slices,
            }],
        });
        let option = script_safe(&serde_json::to_string(&option).map_err(chart_error)?);

        page.push_str(&format!(
            "<div id=\"chart-{index}\" style=\"width:900px;height:600px;\"></div>\n<script>echarts.init(document.getElementById('chart-{index}')).setOption({option});</script>\n"
        ));
    }

    page.push_str("</body>\n</html>\n");
    Ok(page)
}

// Group keys carry user-defined tag values; keep them from closing the
// inline script element. The escapes are still valid JSON string content.
fn script_safe(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}
