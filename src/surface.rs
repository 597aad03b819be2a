//! Drawing contract between the scene pipeline and whatever draws it.
//!
//! Scenes describe charts as data; a [`Surface`] decides how they look. The
//! terminal front-end draws a recorded [`SceneCanvas`] with ratatui, the
//! headless tools print it as text.

use std::fmt::Write as _;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavState {
    pub position: usize,
    pub total: usize,
    pub can_retreat: bool,
    pub can_advance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartData {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<BarDatum>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub label: String,
    /// Season on x; `None` marks a season with no value to plot.
    pub points: Vec<(i32, Option<f64>)>,
}

impl LineSeries {
    /// Contiguous runs of plotted points. A gap always starts a new run so
    /// nothing is interpolated across a missing season.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut out = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        for (season, value) in &self.points {
            match value.filter(|v| v.is_finite()) {
                Some(v) => current.push((f64::from(*season), v)),
                None => {
                    if !current.is_empty() {
                        out.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }

    pub fn plotted(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|(s, v)| v.filter(|v| v.is_finite()).map(|v| (*s, v)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChartData {
    pub title: String,
    pub y_label: String,
    pub series: Vec<LineSeries>,
}

impl LineChartData {
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut x: Option<[f64; 2]> = None;
        let mut y: Option<[f64; 2]> = None;
        for (s, v) in self.series.iter().flat_map(|s| s.plotted()) {
            let s = f64::from(s);
            x = Some(x.map_or([s, s], |[lo, hi]| [lo.min(s), hi.max(s)]));
            y = Some(y.map_or([v, v], |[lo, hi]| [lo.min(v), hi.max(v)]));
        }
        Some((x?, y?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableData {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub trait Surface {
    fn clear(&mut self);
    fn heading(&mut self, text: &str);
    fn note(&mut self, text: &str);
    fn bar_chart(&mut self, chart: BarChartData);
    fn line_chart(&mut self, chart: LineChartData);
    fn table(&mut self, table: TableData);
    fn navigation(&mut self, nav: NavState);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Element {
    Heading(String),
    Note(String),
    Bars(BarChartData),
    Lines(LineChartData),
    Table(TableData),
}

/// Records draw calls so they can be replayed by a real backend.
#[derive(Debug, Clone, Default)]
pub struct SceneCanvas {
    pub elements: Vec<Element>,
    pub nav: Option<NavState>,
    pub clears: usize,
}

impl SceneCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<&str> {
        self.elements.iter().find_map(|e| match e {
            Element::Heading(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn notes(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Note(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn line_charts(&self) -> Vec<&LineChartData> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Lines(chart) => Some(chart),
                _ => None,
            })
            .collect()
    }

    pub fn bar_charts(&self) -> Vec<&BarChartData> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Bars(chart) => Some(chart),
                _ => None,
            })
            .collect()
    }

    pub fn tables(&self) -> Vec<&TableData> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Table(table) => Some(table),
                _ => None,
            })
            .collect()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for element in &self.elements {
            match element {
                Element::Heading(text) => {
                    let _ = writeln!(out, "== {text} ==");
                }
                Element::Note(text) => {
                    let _ = writeln!(out, "{text}");
                }
                Element::Bars(chart) => write_bars(&mut out, chart),
                Element::Lines(chart) => write_lines(&mut out, chart),
                Element::Table(table) => write_table(&mut out, table),
            }
        }
        if let Some(nav) = self.nav {
            let _ = writeln!(
                out,
                "[{}] scene {}/{} [{}]",
                if nav.can_retreat { "< prev" } else { "      " },
                nav.position + 1,
                nav.total,
                if nav.can_advance { "next >" } else { "      " },
            );
        }
        out
    }
}

impl Surface for SceneCanvas {
    fn clear(&mut self) {
        self.elements.clear();
        self.clears += 1;
    }

    fn heading(&mut self, text: &str) {
        self.elements.push(Element::Heading(text.to_string()));
    }

    fn note(&mut self, text: &str) {
        self.elements.push(Element::Note(text.to_string()));
    }

    fn bar_chart(&mut self, chart: BarChartData) {
        self.elements.push(Element::Bars(chart));
    }

    fn line_chart(&mut self, chart: LineChartData) {
        self.elements.push(Element::Lines(chart));
    }

    fn table(&mut self, table: TableData) {
        self.elements.push(Element::Table(table));
    }

    fn navigation(&mut self, nav: NavState) {
        self.nav = Some(nav);
    }
}

fn write_bars(out: &mut String, chart: &BarChartData) {
    const WIDTH: f64 = 40.0;
    let _ = writeln!(out, "-- {} ({}) --", chart.title, chart.y_label);
    let max = chart.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    let label_w = chart.bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    for bar in &chart.bars {
        let len = if max > 0.0 {
            ((bar.value / max) * WIDTH).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:>label_w$} | {} {}",
            bar.label,
            "#".repeat(len),
            format_value(bar.value)
        );
    }
}

fn write_lines(out: &mut String, chart: &LineChartData) {
    let _ = writeln!(out, "-- {} ({}) --", chart.title, chart.y_label);
    let mut seasons: Vec<i32> = chart
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|(season, _)| *season))
        .collect();
    seasons.sort_unstable();
    seasons.dedup();

    let mut header = format!("{:>6}", "season");
    for s in &chart.series {
        let _ = write!(header, " | {:>12}", s.label);
    }
    let _ = writeln!(out, "{header}");
    for season in seasons {
        let mut line = format!("{season:>6}");
        for s in &chart.series {
            let cell = s
                .points
                .iter()
                .find(|(x, _)| *x == season)
                .and_then(|(_, v)| *v)
                .map(format_value)
                .unwrap_or_else(|| "-".to_string());
            let _ = write!(line, " | {cell:>12}");
        }
        let _ = writeln!(out, "{line}");
    }
}

fn write_table(out: &mut String, table: &TableData) {
    let _ = writeln!(out, "-- {} --", table.title);
    let _ = writeln!(out, "{}", table.headers.join(" | "));
    for row in &table.rows {
        let _ = writeln!(out, "{}", row.join(" | "));
    }
}

pub fn format_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}
