//! Rendered page content
//!
//! A page is a title, passive notices and an ordered list of sections. The
//! browser walks the sections and draws each one; figures are plotly JSON.

use super::PageId;
use crate::notice::Notice;
use crate::viz::{DetailView, Figure, LegendEntry};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            help: None,
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// A data table; cells are JSON scalars
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Browser may sort by clicking a header
    pub sortable: bool,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn push(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    /// Render as CSV (header plus rows)
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(cell_text))?;
        }
        let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Select,
    MultiSelect,
    Slider,
    Checkbox,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlOption {
    pub value: String,
    pub label: String,
}

impl ControlOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose label is its value
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// An input bound to one field of the page's filter record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    /// Field name in the filter record
    pub field: String,
    pub label: String,
    pub kind: ControlKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ControlOption>,
    /// Current value
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl Control {
    fn new(field: &str, label: &str, kind: ControlKind, value: Value) -> Self {
        Self {
            field: field.to_string(),
            label: label.to_string(),
            kind,
            options: Vec::new(),
            value,
            min: None,
            max: None,
            step: None,
        }
    }

    pub fn select(field: &str, label: &str, options: Vec<ControlOption>, value: impl Serialize) -> Self {
        Self {
            options,
            ..Self::new(field, label, ControlKind::Select, to_value(value))
        }
    }

    pub fn multi_select(field: &str, label: &str, options: Vec<ControlOption>, value: impl Serialize) -> Self {
        Self {
            options,
            ..Self::new(field, label, ControlKind::MultiSelect, to_value(value))
        }
    }

    pub fn slider(field: &str, label: &str, min: f64, max: f64, step: f64, value: impl Serialize) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            step: Some(step),
            ..Self::new(field, label, ControlKind::Slider, to_value(value))
        }
    }

    pub fn checkbox(field: &str, label: &str, value: bool) -> Self {
        Self::new(field, label, ControlKind::Checkbox, Value::Bool(value))
    }

    pub fn text(field: &str, label: &str, value: &str) -> Self {
        Self::new(field, label, ControlKind::Text, Value::String(value.to_string()))
    }
}

fn to_value(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// A content card with a comment thread
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub color: String,
    /// Headed bullet lists
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<(String, Vec<String>)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Comment location id
    pub comment_location: String,
}

/// One block of page content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Markdown { text: String },
    Metrics { items: Vec<Metric> },
    Chart { id: String, figure: Figure },
    Table { table: Table },
    Legend { title: String, entries: Vec<LegendEntry> },
    Detail { view: Box<DetailView> },
    Cards { cards: Vec<Card> },
    Controls { controls: Vec<Control> },
    Html { html: String },
    Download {
        label: String,
        file_name: String,
        mime: String,
        content: String,
    },
}

/// A rendered page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub page: PageId,
    pub title: String,
    pub notices: Vec<Notice>,
    pub sections: Vec<Section>,
}

impl PageView {
    pub fn new(page: PageId) -> Self {
        Self {
            page,
            title: page.label(),
            notices: Vec::new(),
            sections: Vec::new(),
        }
    }

    pub fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn markdown(&mut self, text: impl Into<String>) {
        self.sections.push(Section::Markdown { text: text.into() });
    }

    pub fn metrics(&mut self, items: Vec<Metric>) {
        self.sections.push(Section::Metrics { items });
    }

    pub fn chart(&mut self, id: &str, figure: Figure) {
        self.sections.push(Section::Chart {
            id: id.to_string(),
            figure,
        });
    }

    pub fn table(&mut self, table: Table) {
        self.sections.push(Section::Table { table });
    }

    pub fn controls(&mut self, controls: Vec<Control>) {
        self.sections.push(Section::Controls { controls });
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Chart with the given id, if rendered
    pub fn find_chart(&self, id: &str) -> Option<&Figure> {
        self.sections.iter().find_map(|s| match s {
            Section::Chart { id: chart_id, figure } if chart_id == id => Some(figure),
            _ => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.sections.iter().filter_map(|s| match s {
            Section::Table { table } => Some(table),
            _ => None,
        })
    }

    pub fn metric(&self, label: &str) -> Option<&Metric> {
        self.sections
            .iter()
            .filter_map(|s| match s {
                Section::Metrics { items } => Some(items),
                _ => None,
            })
            .flatten()
            .find(|m| m.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_to_csv() {
        let mut table = Table::new(["Risco", "Valor"]);
        table.push(vec![json!("Trabalho infantil, urbano"), json!(25)]);
        table.push(vec![json!("Sazonalidade"), Value::Null]);
        let csv = table.to_csv().unwrap();
        assert_eq!(csv, "Risco,Valor\n\"Trabalho infantil, urbano\",25\nSazonalidade,\n");
    }

    #[test]
    fn test_section_serialization_is_tagged() {
        let mut view = PageView::new(PageId::Risks);
        view.markdown("**x**");
        view.metrics(vec![Metric::new("Total", "3")]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["page"], "risks");
        assert_eq!(json["sections"][0]["kind"], "markdown");
        assert_eq!(json["sections"][1]["items"][0]["value"], "3");
        assert_eq!(view.metric("Total").map(|m| m.value.as_str()), Some("3"));
    }

    #[test]
    fn test_control_values() {
        let control = Control::slider("min_value", "Valor mínimo", 1.0, 25.0, 1.0, 5);
        assert_eq!(control.value, json!(5));
        assert_eq!(control.kind, ControlKind::Slider);
    }
}
