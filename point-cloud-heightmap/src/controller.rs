/// Interactive re-run loop over one loaded point cloud
use crate::heightmap::HeightMapImage;
use crate::pipeline::{PipelineOutput, PipelineParameters, run_pipeline};
use crate::point::Point3D;
use constants::{SLIDERS, SliderPositions};
use log::{error, info, warn};
use std::io::BufRead;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// New slider positions
    Update(SliderPositions),
    /// Show the current image again without re-running
    Redraw,
    /// End the loop
    Cancel,
}

/// Supplies parameter changes; `poll` blocks until the next event.
pub trait ParameterSource {
    fn poll(&mut self) -> ControlEvent;
}

/// Receives every image the controller wants on screen.
pub trait DisplaySink {
    fn show(&mut self, image: &HeightMapImage);
}

/// Parameters and result of the most recent successful run
#[derive(Debug, Clone)]
pub struct LastRun {
    pub parameters: PipelineParameters,
    pub output: PipelineOutput,
}

/// Re-runs the pipeline on the same points whenever the sliders change and
/// hands each image to a display.
///
/// Runs are synchronous; cancelling stops further runs and returns the last
/// good result. A failed run is logged and the previous image stays on
/// screen, so a bad parameter combination never ends the loop.
pub struct InteractiveController<S, D> {
    source: S,
    display: D,
    /// Parameters of the next run
    parameters: PipelineParameters,
    /// Trackbar positions last reported by the source
    sliders: SliderPositions,
}

impl<S: ParameterSource, D: DisplaySink> InteractiveController<S, D> {
    /// The first run uses `parameters` exactly; later runs decode the slider
    /// positions reported by `source`.
    pub fn new(source: S, display: D, parameters: PipelineParameters) -> Self {
        Self {
            source,
            display,
            parameters,
            sliders: parameters.to_sliders(),
        }
    }

    /// Loop until the source cancels. Returns the last successful run, or
    /// `None` if every run failed.
    pub fn run(&mut self, points: &[Point3D]) -> Option<LastRun> {
        let mut last: Option<LastRun> = None;
        let mut pending = true;

        loop {
            if pending {
                let parameters = self.parameters;
                match run_pipeline(points, parameters) {
                    Ok(output) => last = Some(LastRun { parameters, output }),
                    Err(e) => error!("Pipeline run failed: {}", e),
                }
                self.redraw(last.as_ref());
                pending = false;
            }

            match self.source.poll() {
                ControlEvent::Update(sliders) => {
                    if sliders != self.sliders {
                        self.sliders = sliders;
                        self.parameters =
                            PipelineParameters::from_sliders(&sliders, self.parameters.fill_method);
                        pending = true;
                    }
                }
                ControlEvent::Redraw => self.redraw(last.as_ref()),
                ControlEvent::Cancel => return last,
            }
        }
    }

    fn redraw(&mut self, last: Option<&LastRun>) {
        match last {
            Some(run) => self.display.show(&run.output.image),
            None => self.display.show(&HeightMapImage::empty(1, 1)),
        }
    }
}

/// Reads `<slider> <position>` commands line by line.
///
/// `show` redraws, `q`, `quit`, `esc` or end of input cancels. Slider names
/// may be the full trackbar name or its short alias.
pub struct LineCommandSource<R> {
    reader: R,
    sliders: SliderPositions,
}

impl<R: BufRead> LineCommandSource<R> {
    pub fn new(reader: R, sliders: SliderPositions) -> Self {
        Self { reader, sliders }
    }

    fn parse(&mut self, line: &str) -> Option<ControlEvent> {
        let mut words = line.split_whitespace();
        let command = words.next()?;
        match command.to_ascii_lowercase().as_str() {
            "q" | "quit" | "esc" | "\u{1b}" => return Some(ControlEvent::Cancel),
            "show" => return Some(ControlEvent::Redraw),
            "help" => {
                for s in SLIDERS {
                    info!("  {:<10} {:<18} 0..={:<4} (default {})", s.alias, s.name, s.max, s.default);
                }
                return None;
            }
            _ => {}
        }

        let Some(position) = words.next().and_then(|w| w.parse::<u32>().ok()) else {
            warn!("Expected `<slider> <position>`, got `{}`", line.trim());
            return None;
        };
        match self.sliders.set(command, position) {
            Some(stored) => {
                info!("{} = {}", command, stored);
                Some(ControlEvent::Update(self.sliders))
            }
            None => {
                warn!("Unknown slider `{}` (try `help`)", command);
                None
            }
        }
    }
}

impl<R: BufRead> ParameterSource for LineCommandSource<R> {
    fn poll(&mut self) -> ControlEvent {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return ControlEvent::Cancel,
                Ok(_) => {
                    if let Some(event) = self.parse(&line) {
                        return event;
                    }
                }
                Err(e) => {
                    error!("Failed to read command: {}", e);
                    return ControlEvent::Cancel;
                }
            }
        }
    }
}

/// Display that rewrites a PNG preview after every run
pub struct PngPreviewSink {
    path: PathBuf,
}

impl PngPreviewSink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl DisplaySink for PngPreviewSink {
    fn show(&mut self, image: &HeightMapImage) {
        match image.save_png(&self.path) {
            Ok(()) => info!(
                "Preview {}x{} written to {}",
                image.rows(),
                image.cols(),
                self.path.display()
            ),
            Err(e) => error!("{}", e),
        }
    }
}
