//! Plotly-compatible figure model
//!
//! Figures serialize to the JSON shape plotly.js expects
//! (`{"data": [...], "layout": {...}}`), so the browser can draw them with
//! `Plotly.newPlot` unchanged.

use serde::Serialize;
use serde_json::Value;

/// A scalar or per-point value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

/// Axis data: numbers (gaps as null) or category labels
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Series {
    Numbers(Vec<Option<f64>>),
    Labels(Vec<String>),
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Series::Numbers(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<f64>>> for Series {
    fn from(values: Vec<Option<f64>>) -> Self {
        Series::Numbers(values)
    }
}

impl From<Vec<String>> for Series {
    fn from(labels: Vec<String>) -> Self {
        Series::Labels(labels)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Bar,
    Pie,
    Histogram,
    Heatmap,
    Scatterpolar,
    Scattermapbox,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Line {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

impl Line {
    pub fn new(width: f64, color: impl Into<String>) -> Self {
        Self {
            width: Some(width),
            color: Some(color.into()),
            dash: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<OneOrMany<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<OneOrMany<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
}

/// One plotted series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<Vec<Vec<Option<f64>>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theta: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<OneOrMany<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertext: Option<OneOrMany<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customdata: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbinsx: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hole: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
}

impl Trace {
    pub fn new(kind: TraceKind) -> Self {
        Self {
            kind,
            name: None,
            mode: None,
            x: None,
            y: None,
            z: None,
            r: None,
            theta: None,
            labels: None,
            values: None,
            lat: None,
            lon: None,
            text: None,
            textposition: None,
            hovertext: None,
            hoverinfo: None,
            customdata: None,
            marker: None,
            line: None,
            fill: None,
            orientation: None,
            nbinsx: None,
            colorscale: None,
            hole: None,
            showlegend: None,
        }
    }

    pub fn scatter() -> Self {
        Self::new(TraceKind::Scatter)
    }

    pub fn bar() -> Self {
        Self::new(TraceKind::Bar)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn mode(mut self, mode: &str) -> Self {
        self.mode = Some(mode.to_string());
        self
    }

    pub fn xy(mut self, x: impl Into<Series>, y: impl Into<Series>) -> Self {
        self.x = Some(x.into());
        self.y = Some(y.into());
        self
    }

    pub fn text(mut self, text: Vec<String>) -> Self {
        self.text = Some(OneOrMany::Many(text));
        self
    }

    pub fn hovertext(mut self, text: Vec<String>) -> Self {
        self.hovertext = Some(OneOrMany::Many(text));
        self.hoverinfo = Some("text".to_string());
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn marker_color(mut self, color: impl Into<String>) -> Self {
        let marker = self.marker.get_or_insert_with(Marker::default);
        marker.color = Some(OneOrMany::One(color.into()));
        self
    }

    pub fn hide_legend(mut self) -> Self {
        self.showlegend = Some(false);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zeroline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showticklabels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticktext: Option<Vec<String>>,
}

impl Axis {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Axis with no grid, zero line or tick labels
    pub fn hidden() -> Self {
        Self {
            title: None,
            showgrid: Some(false),
            zeroline: Some(false),
            showticklabels: Some(false),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub showarrow: bool,
    pub xref: String,
    pub yref: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xanchor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yanchor: Option<String>,
}

impl Annotation {
    /// Text anchored in paper coordinates
    pub fn paper(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            showarrow: false,
            xref: "paper".to_string(),
            yref: "paper".to_string(),
            x,
            y,
            xanchor: Some("left".to_string()),
            yanchor: Some("bottom".to_string()),
        }
    }

    /// Centred text at data coordinates
    pub fn data(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            showarrow: false,
            xref: "x".to_string(),
            yref: "y".to_string(),
            x,
            y,
            xanchor: None,
            yanchor: None,
        }
    }
}

/// Figure-level layout
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Margins, passed through as-is (`{"b":20,"l":5,...}`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Value>,
    /// Polar subplot settings for radar charts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polar: Option<Value>,
    /// Map settings for `scattermapbox` traces
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapbox: Option<Value>,
    /// Reference lines and regions
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Value>,
}

impl Layout {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

/// A complete figure
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn new(layout: Layout) -> Self {
        Self {
            data: Vec::new(),
            layout,
        }
    }

    pub fn add_trace(&mut self, trace: Trace) {
        self.data.push(trace);
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.data.push(trace);
        self
    }

    /// Traces with the given name
    pub fn traces_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Trace> {
        self.data.iter().filter(move |t| t.name.as_deref() == Some(name))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_to_plotly_shape() {
        let figure = Figure::new(Layout::titled("Teste")).with_trace(
            Trace::scatter()
                .name("Actors")
                .mode("markers")
                .xy(vec![Some(0.0), None], vec![1.0, 2.0])
                .marker(Marker {
                    size: Some(OneOrMany::Many(vec![10.0, 20.0])),
                    ..Marker::default()
                }),
        );

        let json = figure.to_json();
        assert_eq!(json["data"][0]["type"], "scatter");
        assert_eq!(json["data"][0]["x"][1], Value::Null);
        assert_eq!(json["data"][0]["marker"]["size"][1], 20.0);
        assert!(json["data"][0].get("hovertext").is_none());
        assert_eq!(json["layout"]["title"], "Teste");
        assert!(json["layout"].get("annotations").is_none());
    }
}
