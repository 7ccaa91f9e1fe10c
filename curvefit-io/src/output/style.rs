use plotters::style::RGBColor;
use std::fmt::Display;
use tracing::debug;
use curvefit::prelude::ForecastError;

pub const color_bg: RGBColor = RGBColor(255, 255, 255);
pub const color_axis: RGBColor = RGBColor(40, 40, 40);
pub const color_truth: RGBColor = RGBColor(255, 165, 0);
pub const color_fit: RGBColor = RGBColor(0, 128, 0);
pub const color_scatter: RGBColor = RGBColor(31, 119, 180);
pub const color_pred: RGBColor = RGBColor(191, 0, 191);
pub const color_note: RGBColor = RGBColor(220, 0, 0);

pub const font: &str = "sans-serif";

pub fn render_err<E: Display>(e: E) -> ForecastError {
    ForecastError::Render(e.to_string())
}

/// Text and axes need a system font; a failure there leaves the frame undecorated.
pub fn soft<T, E: Display>(res: Result<T, E>, what: &str) -> bool {
    match res {
        Ok(_) => true,
        Err(e) => {
            debug!(what, error = %e, "decoration skipped");
            false
        }
    }
}
