//! Chart builders for the indicator, risk and opportunity pages

use super::figure::{Axis, Figure, Layout, Marker, OneOrMany, Series, Trace, TraceKind};
use serde_json::json;

/// A named numeric series
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl NamedSeries {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Grouped bar chart: one trace per series over shared categories
pub fn bar_chart(title: &str, categories: &[String], series: &[NamedSeries], x_title: &str, y_title: &str) -> Figure {
    let mut figure = Figure::new(Layout {
        barmode: Some("group".to_string()),
        xaxis: Some(Axis::titled(x_title)),
        yaxis: Some(Axis::titled(y_title)),
        ..Layout::titled(title)
    });
    for s in series {
        figure.add_trace(
            Trace::bar()
                .name(s.name.clone())
                .xy(categories.to_vec(), s.values.clone())
                .text(s.values.iter().map(|v| format!("{:.1}", v)).collect()),
        );
    }
    figure
}

/// Horizontal bars, largest first as given
pub fn ranking_chart(title: &str, labels: &[String], values: &[f64], x_title: &str) -> Figure {
    let mut trace = Trace::bar().xy(values.to_vec(), labels.to_vec());
    trace.orientation = Some("h".to_string());
    trace.text = Some(OneOrMany::Many(values.iter().map(|v| format!("{:.1}", v)).collect()));
    Figure::new(Layout {
        xaxis: Some(Axis::titled(x_title)),
        ..Layout::titled(title)
    })
    .with_trace(trace)
}

pub fn pie_chart(title: &str, labels: &[String], values: &[f64], hole: Option<f64>) -> Figure {
    let mut trace = Trace::new(TraceKind::Pie);
    trace.labels = Some(labels.to_vec());
    trace.values = Some(values.to_vec());
    trace.hole = hole;
    Figure::new(Layout::titled(title)).with_trace(trace)
}

/// Radar chart; each series closes its polygon
pub fn radar_chart(title: &str, axes: &[String], series: &[NamedSeries]) -> Figure {
    let mut figure = Figure::new(Layout {
        polar: Some(json!({"radialaxis": {"visible": true}})),
        showlegend: Some(true),
        ..Layout::titled(title)
    });
    for s in series {
        let mut theta = axes.to_vec();
        let mut r = s.values.clone();
        if let (Some(first_axis), Some(&first_value)) = (axes.first(), s.values.first()) {
            theta.push(first_axis.clone());
            r.push(first_value);
        }
        let mut trace = Trace::new(TraceKind::Scatterpolar).name(s.name.clone());
        trace.theta = Some(theta);
        trace.r = Some(r);
        trace.fill = Some("toself".to_string());
        figure.add_trace(trace);
    }
    figure
}

pub fn histogram(title: &str, values: &[f64], bins: usize, x_title: &str, y_title: &str) -> Figure {
    let mut trace = Trace::new(TraceKind::Histogram);
    trace.x = Some(Series::from(values.to_vec()));
    trace.nbinsx = Some(bins);
    Figure::new(Layout {
        xaxis: Some(Axis::titled(x_title)),
        yaxis: Some(Axis::titled(y_title)),
        ..Layout::titled(title)
    })
    .with_trace(trace)
}

/// Heat map; `None` cells are left blank
pub fn heatmap(title: &str, x: &[String], y: &[String], z: Vec<Vec<Option<f64>>>, colorscale: &str) -> Figure {
    let mut trace = Trace::new(TraceKind::Heatmap).xy(x.to_vec(), y.to_vec());
    trace.z = Some(z);
    trace.colorscale = Some(colorscale.to_string());
    Figure::new(Layout::titled(title)).with_trace(trace)
}

/// Line chart with markers over shared x labels
pub fn line_chart(title: &str, x: &[String], series: &[NamedSeries], y_title: &str) -> Figure {
    let mut figure = Figure::new(Layout {
        yaxis: Some(Axis::titled(y_title)),
        hovermode: Some("x unified".to_string()),
        ..Layout::titled(title)
    });
    for s in series {
        figure.add_trace(
            Trace::scatter()
                .name(s.name.clone())
                .mode("lines+markers")
                .xy(x.to_vec(), s.values.clone()),
        );
    }
    figure
}

/// One labelled point in a scatter group
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub hover: String,
    pub size: f64,
}

/// Scatter with one trace per group (priority and risk matrices, quadrants)
pub fn grouped_scatter(
    title: &str,
    groups: &[(String, Vec<ScatterPoint>)],
    x_title: &str,
    y_title: &str,
    axis_range: Option<[f64; 2]>,
) -> Figure {
    let mut figure = Figure::new(Layout {
        xaxis: Some(Axis {
            range: axis_range,
            ..Axis::titled(x_title)
        }),
        yaxis: Some(Axis {
            range: axis_range,
            ..Axis::titled(y_title)
        }),
        hovermode: Some("closest".to_string()),
        ..Layout::titled(title)
    });
    for (name, points) in groups {
        if points.is_empty() {
            continue;
        }
        let trace = Trace::scatter()
            .name(name.clone())
            .mode("markers+text")
            .xy(
                points.iter().map(|p| p.x).collect::<Vec<f64>>(),
                points.iter().map(|p| p.y).collect::<Vec<f64>>(),
            )
            .text(points.iter().map(|p| p.label.clone()).collect())
            .hovertext(points.iter().map(|p| p.hover.clone()).collect())
            .marker(Marker {
                size: Some(OneOrMany::Many(points.iter().map(|p| p.size).collect())),
                opacity: Some(0.8),
                ..Marker::default()
            });
        figure.add_trace(trace);
    }
    figure
}

/// Dashed reference line across the plot at x or y
pub fn reference_line(vertical: bool, at: f64) -> serde_json::Value {
    if vertical {
        json!({"type": "line", "xref": "x", "yref": "paper", "x0": at, "x1": at, "y0": 0, "y1": 1,
               "line": {"dash": "dash", "color": "gray"}})
    } else {
        json!({"type": "line", "xref": "paper", "yref": "y", "x0": 0, "x1": 1, "y0": at, "y1": at,
               "line": {"dash": "dash", "color": "gray"}})
    }
}

/// A city marker on the map
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub size: f64,
    pub hover: String,
}

/// OpenStreetMap scatter centred on `center` (lat, lon)
pub fn city_map(title: &str, points: &[MapPoint], center: (f64, f64), zoom: f64) -> Figure {
    let mut trace = Trace::new(TraceKind::Scattermapbox)
        .name("Cidades")
        .mode("markers+text")
        .text(points.iter().map(|p| p.name.clone()).collect())
        .hovertext(points.iter().map(|p| p.hover.clone()).collect())
        .marker(Marker {
            size: Some(OneOrMany::Many(points.iter().map(|p| p.size).collect())),
            opacity: Some(0.8),
            ..Marker::default()
        });
    trace.lat = Some(points.iter().map(|p| p.lat).collect());
    trace.lon = Some(points.iter().map(|p| p.lon).collect());

    Figure::new(Layout {
        mapbox: Some(json!({
            "style": "open-street-map",
            "center": {"lat": center.0, "lon": center.1},
            "zoom": zoom
        })),
        margin: Some(json!({"r": 0, "t": 40, "l": 0, "b": 0})),
        height: Some(500),
        ..Layout::titled(title)
    })
    .with_trace(trace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radar_closes_polygon() {
        let figure = radar_chart(
            "Radar",
            &["a".to_string(), "b".to_string()],
            &[NamedSeries::new("s", vec![1.0, 2.0])],
        );
        assert_eq!(figure.data[0].r, Some(vec![1.0, 2.0, 1.0]));
        assert_eq!(figure.data[0].theta.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_grouped_scatter_skips_empty_groups() {
        let point = ScatterPoint {
            x: 1.0,
            y: 2.0,
            label: "r".to_string(),
            hover: "h".to_string(),
            size: 10.0,
        };
        let figure = grouped_scatter(
            "Matriz",
            &[("Crítica".to_string(), vec![point]), ("Moderada".to_string(), vec![])],
            "x",
            "y",
            Some([0.5, 5.5]),
        );
        assert_eq!(figure.data.len(), 1);
        assert_eq!(figure.layout.xaxis.as_ref().unwrap().range, Some([0.5, 5.5]));
    }

    #[test]
    fn test_city_map_serializes_coordinates() {
        let figure = city_map(
            "Mapa",
            &[MapPoint {
                name: "Caruaru".to_string(),
                lat: -8.28,
                lon: -35.97,
                size: 30.0,
                hover: String::new(),
            }],
            (-8.1, -36.0),
            8.0,
        );
        let json = figure.to_json();
        assert_eq!(json["data"][0]["type"], "scattermapbox");
        assert_eq!(json["data"][0]["lat"][0], -8.28);
        assert_eq!(json["layout"]["mapbox"]["style"], "open-street-map");
    }
}
