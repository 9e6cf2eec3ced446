//! Declarative chart descriptions.
//!
//! A [`ChartSpec`] is inert data: a chart kind, the arrays to plot, axis
//! labels and a few layout hints. Rendering is left to the client.

use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Pie,
    Bar,
    Histogram,
    Heatmap,
    Box,
}

/// One histogram bin; `start` is inclusive, `end` is exclusive except for
/// the last bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Five-number summary plus Tukey fences for a box plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// Most extreme values still inside the fences.
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outlier_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Pie {
        labels: Vec<String>,
        values: Vec<usize>,
    },
    Bar {
        x: Vec<String>,
        y: Vec<usize>,
    },
    Histogram {
        values: Vec<f64>,
        bin_count: usize,
        bins: Vec<HistogramBin>,
    },
    Heatmap {
        x: Vec<String>,
        y: Vec<String>,
        z: Vec<Vec<Option<f64>>>,
    },
    Box {
        values: Vec<f64>,
        summary: BoxSummary,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub height: u32,
    pub font_size: u32,
    pub show_legend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_tick_angle: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<String>,
    /// Print cell values on the chart.
    pub text_auto: bool,
}

impl ChartLayout {
    pub fn new(height: u32, font_size: u32) -> Self {
        Self {
            height,
            font_size,
            show_legend: false,
            x_tick_angle: None,
            color_scale: None,
            text_auto: false,
        }
    }

    pub fn with_legend(mut self) -> Self {
        self.show_legend = true;
        self
    }

    pub fn with_x_tick_angle(mut self, angle: i32) -> Self {
        self.x_tick_angle = Some(angle);
        self
    }

    pub fn with_color_scale(mut self, scale: impl Into<String>) -> Self {
        self.color_scale = Some(scale.into());
        self
    }

    pub fn with_text_auto(mut self) -> Self {
        self.text_auto = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub data: ChartData,
    pub layout: ChartLayout,
}

impl ChartSpec {
    pub fn pie(title: impl Into<String>, labels: Vec<String>, values: Vec<usize>) -> Self {
        Self {
            kind: ChartKind::Pie,
            title: title.into(),
            x_label: None,
            y_label: None,
            data: ChartData::Pie { labels, values },
            layout: ChartLayout::new(400, 14).with_legend(),
        }
    }

    pub fn bar(title: impl Into<String>, x: Vec<String>, y: Vec<usize>) -> Self {
        Self {
            kind: ChartKind::Bar,
            title: title.into(),
            x_label: None,
            y_label: None,
            data: ChartData::Bar { x, y },
            layout: ChartLayout::new(400, 12).with_x_tick_angle(-45),
        }
    }

    pub fn histogram(title: impl Into<String>, values: Vec<f64>, bins: Vec<HistogramBin>) -> Self {
        Self {
            kind: ChartKind::Histogram,
            title: title.into(),
            x_label: None,
            y_label: Some("Frequency".to_string()),
            data: ChartData::Histogram {
                bin_count: bins.len(),
                values,
                bins,
            },
            layout: ChartLayout::new(350, 12),
        }
    }

    pub fn heatmap(
        title: impl Into<String>,
        labels: Vec<String>,
        z: Vec<Vec<Option<f64>>>,
    ) -> Self {
        Self {
            kind: ChartKind::Heatmap,
            title: title.into(),
            x_label: None,
            y_label: None,
            data: ChartData::Heatmap {
                x: labels.clone(),
                y: labels,
                z,
            },
            layout: ChartLayout::new(500, 12)
                .with_color_scale("RdBu")
                .with_text_auto(),
        }
    }

    pub fn box_plot(title: impl Into<String>, values: Vec<f64>, summary: BoxSummary) -> Self {
        Self {
            kind: ChartKind::Box,
            title: title.into(),
            x_label: None,
            y_label: None,
            data: ChartData::Box { values, summary },
            layout: ChartLayout::new(400, 12),
        }
    }

    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }
}

/// Ordered mapping of chart id to chart.
///
/// Failures of individual charts are folded into one `error` entry that
/// serializes next to the charts that did succeed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartCatalog {
    #[serde(flatten)]
    pub charts: IndexMap<String, ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChartCatalog {
    pub fn insert(&mut self, id: impl Into<String>, spec: ChartSpec) {
        self.charts.insert(id.into(), spec);
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.error = Some(match self.error.take() {
            Some(existing) => format!("{existing}; {message}"),
            None => message,
        });
    }

    pub fn get(&self, id: &str) -> Option<&ChartSpec> {
        self.charts.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.charts.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    /// Ids starting with `prefix`, in insertion order.
    pub fn ids_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.ids().filter(move |id| id.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_serializes_flat_with_error() {
        let mut catalog = ChartCatalog::default();
        catalog.insert(
            "data_types_pie",
            ChartSpec::pie("Data Types Distribution", vec!["i64".into()], vec![2]),
        );
        catalog.record_error("histogram failed");
        catalog.record_error("boxplot failed");

        let json = serde_json::to_value(&catalog).unwrap();
        assert_eq!(json["data_types_pie"]["kind"], "pie");
        assert_eq!(json["data_types_pie"]["data"]["labels"][0], "i64");
        assert_eq!(json["data_types_pie"]["layout"]["height"], 400);
        assert_eq!(json["error"], "histogram failed; boxplot failed");
    }

    #[test]
    fn test_catalog_without_error_has_no_error_key() {
        let catalog = ChartCatalog::default();
        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_bar_layout_hints() {
        let spec = ChartSpec::bar("Missing Values by Column", vec!["a".into()], vec![3])
            .with_x_label("Columns")
            .with_y_label("Missing Count");
        assert_eq!(spec.layout.x_tick_angle, Some(-45));
        assert_eq!(spec.layout.font_size, 12);
        assert_eq!(spec.x_label.as_deref(), Some("Columns"));
    }
}
