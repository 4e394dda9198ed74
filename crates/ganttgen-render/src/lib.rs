//! # ganttgen-render
//!
//! SVG Gantt chart rendering for ganttgen.
//!
//! Each task renders as two overlapping horizontal bars in its group color:
//! a half-opacity segment spanning the full planned duration and a
//! full-opacity overlay spanning the completed portion. Rows with a
//! milestone get a hollow diamond marker at the milestone date. The date
//! axis runs along the top of the chart.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ganttgen_render::SvgRenderer;
//!
//! let renderer = SvgRenderer::new().chart_width(1200).font_size(15);
//! let svg = renderer.render(&bars)?;
//! std::fs::write("gantt.svg", svg)?;
//! ```

use chrono::NaiveDate;
use ganttgen_core::TaskBar;
use svg::node::element::{Group, Line, Polygon, Rectangle, Text};
use svg::Document;
use thiserror::Error;

/// Opacity of the planned (background) segment; the completed overlay is
/// drawn fully opaque on top.
const PLANNED_OPACITY: f64 = 0.5;

/// Outline color of the milestone diamond.
const MILESTONE_OUTLINE: &str = "#394042";

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("format error: {0}")]
    Format(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// SVG Gantt chart renderer configuration
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    /// Width of the chart area (excluding labels) in pixels
    pub chart_width: u32,
    /// Height per task row in pixels
    pub row_height: u32,
    /// Width of the label column in pixels
    pub label_width: u32,
    /// Header height in pixels
    pub header_height: u32,
    /// Padding around the chart
    pub padding: u32,
    /// Background color
    pub background_color: String,
    /// Grid line color
    pub grid_color: String,
    /// Text color
    pub text_color: String,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            chart_width: 900,
            row_height: 28,
            label_width: 200,
            header_height: 50,
            padding: 20,
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure chart width
    pub fn chart_width(mut self, width: u32) -> Self {
        self.chart_width = width;
        self
    }

    /// Configure row height
    pub fn row_height(mut self, height: u32) -> Self {
        self.row_height = height;
        self
    }

    /// Configure label column width
    pub fn label_width(mut self, width: u32) -> Self {
        self.label_width = width;
        self
    }

    /// Configure font size
    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = size;
        self
    }

    /// Calculate the total width of the SVG
    fn total_width(&self) -> u32 {
        self.padding * 2 + self.label_width + self.chart_width
    }

    /// Calculate the total height based on number of tasks
    fn total_height(&self, task_count: usize) -> u32 {
        self.padding * 2 + self.header_height + (task_count as u32 * self.row_height)
    }

    /// Calculate pixels per day based on date range
    fn pixels_per_day(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        let days = (end - start).num_days().max(1) as f64;
        self.chart_width as f64 / days
    }

    /// Convert a date to x position
    fn date_to_x(&self, date: NaiveDate, chart_start: NaiveDate, px_per_day: f64) -> f64 {
        let days = (date - chart_start).num_days() as f64;
        self.padding as f64 + self.label_width as f64 + (days * px_per_day)
    }

    /// Date range covered by the chart: earliest start through the latest
    /// of planned end, completed end, and milestone, padded by one day.
    fn date_range(&self, bars: &[TaskBar]) -> Result<(NaiveDate, NaiveDate), RenderError> {
        let mut min_start: Option<NaiveDate> = None;
        let mut max_end: Option<NaiveDate> = None;

        for bar in bars {
            min_start = Some(match min_start {
                Some(current) => current.min(bar.start_date),
                None => bar.start_date,
            });
            let mut end = bar.planned_end();
            if let Some(completed_end) = bar.completed_end() {
                end = end.max(completed_end);
            }
            if let Some(milestone) = bar.milestone {
                end = end.max(milestone);
            }
            max_end = Some(match max_end {
                Some(current) => current.max(end),
                None => end,
            });
        }

        match (min_start, max_end) {
            (Some(start), Some(end)) => Ok((
                start - chrono::Duration::days(1),
                end + chrono::Duration::days(1),
            )),
            _ => Err(RenderError::InvalidData("no tasks to render".into())),
        }
    }

    /// Create the top date axis with tick marks and labels
    fn render_header(
        &self,
        chart_start: NaiveDate,
        chart_end: NaiveDate,
        px_per_day: f64,
    ) -> Group {
        let mut group = Group::new().set("class", "header");

        let header_bg = Rectangle::new()
            .set("x", self.padding)
            .set("y", self.padding)
            .set("width", self.label_width + self.chart_width)
            .set("height", self.header_height)
            .set("fill", "#f8f9fa");
        group = group.add(header_bg);

        // Calculate appropriate date interval
        let total_days = (chart_end - chart_start).num_days();
        let interval_days = if total_days <= 14 {
            1
        } else if total_days <= 60 {
            7
        } else if total_days <= 180 {
            14
        } else {
            30
        };

        let mut current = chart_start;
        while current <= chart_end {
            let x = self.date_to_x(current, chart_start, px_per_day);

            let tick = Line::new()
                .set("x1", x)
                .set("y1", self.padding + self.header_height - 10)
                .set("x2", x)
                .set("y2", self.padding + self.header_height)
                .set("stroke", self.text_color.as_str())
                .set("stroke-width", 1);
            group = group.add(tick);

            let label = if interval_days == 1 {
                current.format("%d").to_string()
            } else if interval_days < 30 {
                current.format("%b %d").to_string()
            } else {
                current.format("%b %Y").to_string()
            };

            let text = Text::new(label)
                .set("x", x)
                .set("y", self.padding + self.header_height - 15)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size.saturating_sub(1))
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "middle");
            group = group.add(text);

            current += chrono::Duration::days(interval_days);
        }

        group
    }

    /// Render grid lines
    fn render_grid(
        &self,
        task_count: usize,
        chart_start: NaiveDate,
        chart_end: NaiveDate,
        px_per_day: f64,
    ) -> Group {
        let mut group = Group::new().set("class", "grid");

        let chart_top = self.padding + self.header_height;
        let chart_bottom = chart_top + (task_count as u32 * self.row_height);

        // Horizontal lines for each row
        for i in 0..=task_count {
            let y = chart_top + (i as u32 * self.row_height);
            let line = Line::new()
                .set("x1", self.padding)
                .set("y1", y)
                .set("x2", self.padding + self.label_width + self.chart_width)
                .set("y2", y)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        // Vertical lines for days/weeks
        let total_days = (chart_end - chart_start).num_days();
        let interval = if total_days <= 30 { 1 } else { 7 };

        let mut current = chart_start;
        while current <= chart_end {
            let x = self.date_to_x(current, chart_start, px_per_day);
            let line = Line::new()
                .set("x1", x)
                .set("y1", chart_top)
                .set("x2", x)
                .set("y2", chart_bottom)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
            current += chrono::Duration::days(interval);
        }

        group
    }

    /// Render one task row: label, planned bar, completed overlay, and the
    /// optional milestone diamond.
    fn render_task(
        &self,
        bar: &TaskBar,
        row: usize,
        chart_start: NaiveDate,
        px_per_day: f64,
    ) -> Group {
        let mut group = Group::new().set("class", "task");

        let y = self.padding + self.header_height + (row as u32 * self.row_height);
        let bar_height = (self.row_height as f64 * 0.6) as u32;
        let bar_y = y + (self.row_height - bar_height) / 2;

        // Task label
        let label = Text::new(truncate(&bar.task_name, 26))
            .set("x", self.padding + 8)
            .set("y", y + self.row_height / 2 + 4)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", self.text_color.as_str());
        group = group.add(label);

        let x_start = self.date_to_x(bar.start_date, chart_start, px_per_day);

        // Planned segment: full duration at half opacity
        let planned_width = (bar.planned_length_days as f64 * px_per_day).max(2.0);
        let planned = Rectangle::new()
            .set("x", x_start)
            .set("y", bar_y)
            .set("width", planned_width)
            .set("height", bar_height)
            .set("rx", 3)
            .set("ry", 3)
            .set("fill", bar.color.as_str())
            .set("fill-opacity", PLANNED_OPACITY);
        group = group.add(planned);

        // Completed overlay: progress so far at full opacity
        if bar.completed_length_days > 0 {
            let completed_width = (bar.completed_length_days as f64 * px_per_day).max(2.0);
            let completed = Rectangle::new()
                .set("x", x_start)
                .set("y", bar_y)
                .set("width", completed_width)
                .set("height", bar_height)
                .set("rx", 3)
                .set("ry", 3)
                .set("fill", bar.color.as_str());
            group = group.add(completed);
        }

        // Milestone: hollow diamond centred on the milestone date
        if let Some(milestone) = bar.milestone {
            let cx = self.date_to_x(milestone, chart_start, px_per_day) + px_per_day / 2.0;
            let cy = f64::from(bar_y) + f64::from(bar_height) / 2.0;
            let size = f64::from(bar_height) / 2.0 + 2.0;

            let diamond = Polygon::new()
                .set(
                    "points",
                    format!(
                        "{},{} {},{} {},{} {},{}",
                        cx,
                        cy - size,
                        cx + size,
                        cy,
                        cx,
                        cy + size,
                        cx - size,
                        cy
                    ),
                )
                .set("fill", "none")
                .set("stroke", MILESTONE_OUTLINE)
                .set("stroke-width", 1.5);
            group = group.add(diamond);
        }

        group
    }

    /// Render the legend explaining the two bar opacities and the marker
    fn render_legend(&self, y_offset: u32, sample_color: &str) -> Group {
        let mut group = Group::new().set("class", "legend");
        let x_start = self.padding as f64;
        let y = f64::from(y_offset) + 15.0;
        let box_size = 12.0;
        let spacing = 110.0;

        let completed_box = Rectangle::new()
            .set("x", x_start)
            .set("y", y - box_size + 2.0)
            .set("width", box_size)
            .set("height", box_size)
            .set("rx", 2)
            .set("fill", sample_color);
        group = group.add(completed_box);

        let completed_label = Text::new("Completed")
            .set("x", x_start + box_size + 5.0)
            .set("y", y)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size.saturating_sub(1))
            .set("fill", self.text_color.as_str());
        group = group.add(completed_label);

        let planned_box = Rectangle::new()
            .set("x", x_start + spacing)
            .set("y", y - box_size + 2.0)
            .set("width", box_size)
            .set("height", box_size)
            .set("rx", 2)
            .set("fill", sample_color)
            .set("fill-opacity", PLANNED_OPACITY);
        group = group.add(planned_box);

        let planned_label = Text::new("Planned")
            .set("x", x_start + spacing + box_size + 5.0)
            .set("y", y)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size.saturating_sub(1))
            .set("fill", self.text_color.as_str());
        group = group.add(planned_label);

        let mx = x_start + spacing * 2.0 + box_size / 2.0;
        let my = y - box_size / 2.0 + 2.0;
        let msize = box_size / 2.0;

        let milestone = Polygon::new()
            .set(
                "points",
                format!(
                    "{},{} {},{} {},{} {},{}",
                    mx,
                    my - msize,
                    mx + msize,
                    my,
                    mx,
                    my + msize,
                    mx - msize,
                    my
                ),
            )
            .set("fill", "none")
            .set("stroke", MILESTONE_OUTLINE)
            .set("stroke-width", 1.5);
        group = group.add(milestone);

        let milestone_label = Text::new("Milestone")
            .set("x", x_start + spacing * 2.0 + box_size + 5.0)
            .set("y", y)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size.saturating_sub(1))
            .set("fill", self.text_color.as_str());
        group = group.add(milestone_label);

        group
    }

    /// Render the bar sequence to an SVG string.
    ///
    /// Bars draw top-to-bottom in input order; the caller is responsible
    /// for any sorting.
    pub fn render(&self, bars: &[TaskBar]) -> Result<String, RenderError> {
        let (chart_start, chart_end) = self.date_range(bars)?;
        let px_per_day = self.pixels_per_day(chart_start, chart_end);

        let task_count = bars.len();
        let width = self.total_width();
        let height = self.total_height(task_count) + 30; // extra space for legend

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        let background = Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", self.background_color.as_str());
        document = document.add(background);

        document = document.add(self.render_grid(task_count, chart_start, chart_end, px_per_day));
        document = document.add(self.render_header(chart_start, chart_end, px_per_day));

        for (row, bar) in bars.iter().enumerate() {
            document = document.add(self.render_task(bar, row, chart_start, px_per_day));
        }

        let legend_y =
            self.padding + self.header_height + (task_count as u32 * self.row_height) + 10;
        document = document.add(self.render_legend(legend_y, bars[0].color.as_str()));

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("failed to write SVG: {e}")))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("invalid UTF-8: {e}")))
    }

    /// Render and write the chart to a file.
    pub fn render_to_file(
        &self,
        path: impl AsRef<std::path::Path>,
        bars: &[TaskBar],
    ) -> Result<(), RenderError> {
        let svg = self.render(bars)?;
        std::fs::write(path, svg)?;
        Ok(())
    }
}

/// Truncate a label, appending an ellipsis when it does not fit
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{head}\u{2026}")
    }
}
