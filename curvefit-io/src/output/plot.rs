use curvefit::prelude::*;
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use std::{ops::Range, path::Path};
use tracing::warn;
use super::style::*;

/// Ground truth as dots, a fitted curve as a line, a title and free-form notes.
pub struct ScatterFit {
    pub points: Vec<(f32, f32)>,
    pub line: Vec<(f32, f32)>,
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub notes: Vec<String>,
    pub point_color: RGBColor,
    pub point_size: u32,
    pub line_color: RGBColor,
    pub line_width: u32,
    pub font_size: u32,
}

fn finite_points(x: &[f32], y: impl Iterator<Item = f32>) -> Vec<(f32, f32)> {
    x.iter()
        .copied()
        .zip(y)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect_vec()
}

fn padded(bounds: Option<(f32, f32)>) -> Range<f32> {
    let (l, u) = bounds.unwrap_or((0., 1.));
    let margin = ((u - l) * 0.05).max(1.);
    (l - margin)..(u + margin)
}

impl<T, N> From<(&[f32], T, N)> for ScatterFit
where
    T: IntoIterator<Item = f32>,
    N: IntoIterator<Item = f32>,
{
    fn from(value: (&[f32], T, N)) -> Self {
        ScatterFit {
            points: finite_points(value.0, value.1.into_iter()),
            line: finite_points(value.0, value.2.into_iter()),
            title: String::new(),
            x_desc: String::new(),
            y_desc: String::new(),
            notes: vec![],
            point_color: color_truth,
            point_size: 4,
            line_color: color_fit,
            line_width: 3,
            font_size: 24,
        }
    }
}

impl ScatterFit {
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_desc<S: Into<String>, K: Into<String>>(mut self, x_desc: S, y_desc: K) -> Self {
        self.x_desc = x_desc.into();
        self.y_desc = y_desc.into();
        self
    }

    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_colors(mut self, point_color: RGBColor, line_color: RGBColor) -> Self {
        self.point_color = point_color;
        self.line_color = line_color;
        self
    }

    pub fn with_sizes(mut self, point_size: u32, line_width: u32, font_size: u32) -> Self {
        self.point_size = point_size;
        self.line_width = line_width;
        self.font_size = font_size;
        self
    }

    fn ranges(&self) -> (Range<f32>, Range<f32>) {
        let all = || self.points.iter().chain(self.line.iter());
        let xs = all().map(|p| p.0).collect_vec();
        let ys = all().map(|p| p.1).collect_vec();
        (padded(xs.min_max()), padded(ys.min_max()))
    }

    /// Draws onto `area`. Returns `false` when some text could not be rendered;
    /// the data series are drawn either way.
    pub fn build_chart<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> ForecastResult<bool> {
        area.fill(&color_bg).map_err(render_err)?;
        let (x_range, y_range) = self.ranges();
        let title_band = self.font_size * 2;
        let mut chart = ChartBuilder::on(area)
            .margin(15)
            .margin_top(title_band)
            .x_label_area_size(self.font_size * 2)
            .y_label_area_size(self.font_size * 4)
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_err)?;
        chart
            .draw_series(
                self.points
                    .iter()
                    .map(|&p| Circle::new(p, self.point_size, self.point_color.filled())),
            )
            .map_err(render_err)?;
        chart
            .draw_series(LineSeries::new(
                self.line.iter().copied(),
                self.line_color.stroke_width(self.line_width),
            ))
            .map_err(render_err)?;

        let label_size = (self.font_size * 2 / 3).max(8);
        let mut full = soft(
            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc(self.x_desc.as_str())
                .y_desc(self.y_desc.as_str())
                .label_style((font, label_size).into_font().color(&color_axis))
                .axis_desc_style((font, self.font_size).into_font().color(&color_axis))
                .axis_style(color_axis)
                .draw(),
            "axes",
        );
        let (w, _) = area.dim_in_pixel();
        if !self.title.is_empty() {
            let style = (font, self.font_size + self.font_size / 2)
                .into_font()
                .color(&color_axis)
                .pos(Pos::new(HPos::Center, VPos::Top));
            full &= soft(area.draw(&Text::new(self.title.clone(), (w as i32 / 2, 4), style)), "title");
        }
        let note_style = (font, self.font_size).into_font().color(&color_note);
        for (i, note) in self.notes.iter().enumerate() {
            let posi = (self.font_size as i32 * 5, (title_band + 10) as i32 + i as i32 * (self.font_size as i32 + 6));
            full &= soft(area.draw(&Text::new(note.clone(), posi, note_style.clone())), "note");
        }
        Ok(full)
    }
}

/// Observed counts as dots against the model output as a line sorted by day,
/// written as SVG.
pub fn plot_forecast<P: AsRef<Path>>(
    path: P,
    name: &str,
    x: &[f32],
    y: &[i64],
    y_pred: &[f32],
) -> ForecastResult<()> {
    path.check_or_make_parent()?;
    let mut chart: ScatterFit = (x, y.iter().map(|&v| v as f32), y_pred.iter().copied()).into();
    chart.line.sort_by(|a, b| a.0.total_cmp(&b.0));
    let chart = chart
        .with_title(format!("Amount of {} in each day", name))
        .with_desc("Day", name)
        .with_colors(color_scatter, color_pred)
        .with_sizes(3, 2, 18);
    let root = SVGBackend::new(path.as_ref(), (1000, 600)).into_drawing_area();
    let full = chart.build_chart(&root)?;
    root.present().map_err(render_err)?;
    if !full {
        warn!(path = %path.as_ref().display(), "plot written without text, no usable font");
    }
    Ok(())
}

pub trait PlotForecast {
    fn plot_svg<P: AsRef<Path>>(&self, path: P) -> ForecastResult<()>;
}

impl PlotForecast for Forecast {
    fn plot_svg<P: AsRef<Path>>(&self, path: P) -> ForecastResult<()> {
        plot_forecast(path, self.kind.as_str(), &self.days(), &self.history, &self.fitted)
    }
}
