use curvefit::prelude::*;
use plotters::{coord::Shift, prelude::*};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use super::{plot::ScatterFit, style::*};

/// Writes one GIF frame per training step: the ground truth scattered
/// against the current fit.
pub struct GifRecorder {
    path: PathBuf,
    root: Option<DrawingArea<BitMapBackend<'static>, Shift>>,
    frames: usize,
    warned: bool,
}

impl GifRecorder {
    pub fn create<P: AsRef<Path>>(path: P, size: (u32, u32), fps: u32) -> ForecastResult<Self> {
        path.check_or_make_parent()?;
        let delay_ms = 1000 / fps.max(1);
        let root = BitMapBackend::gif(path.as_ref(), size, delay_ms)
            .map_err(render_err)?
            .into_drawing_area();
        Ok(GifRecorder {
            path: path.as_ref().to_path_buf(),
            root: Some(root),
            frames: 0,
            warned: false,
        })
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl TrainObserver for GifRecorder {
    fn on_step(&mut self, frame: &StepFrame<'_>) -> ForecastResult<()> {
        let root = match self.root.as_ref() {
            Some(root) => root,
            None => return Err(ForecastError::Render(format!("{} is already closed", self.path.display()))),
        };
        let (w, _) = root.dim_in_pixel();
        let font_size = (w / 40).clamp(8, 24);
        let chart: ScatterFit = (frame.x, frame.y.iter().copied(), frame.prediction.iter().copied()).into();
        let full = chart
            .with_title("Regression Analysis")
            .with_desc("Independent variable", "Dependent variable")
            .with_notes(vec![
                format!("Step = {}", frame.step),
                format!("Loss = {:.4}", frame.loss),
            ])
            .with_sizes((font_size / 6).max(2), 3, font_size)
            .build_chart(root)?;
        root.present().map_err(render_err)?;
        self.frames += 1;
        if !full && !self.warned {
            warn!(path = %self.path.display(), "animation frames drawn without text, no usable font");
            self.warned = true;
        }
        Ok(())
    }

    fn finish(&mut self) -> ForecastResult<()> {
        drop(self.root.take());
        info!(path = %self.path.display(), frames = self.frames, "animation saved");
        Ok(())
    }
}
