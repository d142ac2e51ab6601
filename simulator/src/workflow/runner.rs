use crate::generator::profile::build_sweeps;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::info;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use sweepcore::radar::{AirborneRadar, ScanType};
use sweepcore::telemetry::Metrics;
use sweepcore::RadarDisplayAirborne;
use visualizer::ChartSurface;

/// What a render produced.
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub output: PathBuf,
    pub field: String,
    pub sweep: usize,
    pub scan_type: ScanType,
    pub vmin: f64,
    pub vmax: f64,
    pub metrics: Metrics,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Reads the configured JSON volume, or generates one.
    pub fn load_radar(&self) -> anyhow::Result<AirborneRadar> {
        let Some(path) = &self.config.input else {
            return build_sweeps(&self.config.generator).context("generating synthetic sweeps");
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading radar volume {}", path.display()))?;
        let radar: AirborneRadar = serde_json::from_str(&contents)
            .with_context(|| format!("parsing radar volume {}", path.display()))?;
        radar
            .validate()
            .with_context(|| format!("validating radar volume {}", path.display()))?;
        Ok(radar)
    }

    pub fn dump_radar<P: AsRef<Path>>(&self, radar: &AirborneRadar, path: P) -> anyhow::Result<()> {
        let path_ref = path.as_ref();
        let text = serde_json::to_string(radar).context("serializing radar volume")?;
        fs::write(path_ref, text)
            .with_context(|| format!("writing radar volume {}", path_ref.display()))
    }

    pub fn execute(&self) -> anyhow::Result<RenderSummary> {
        let radar = self.load_radar()?;
        self.render(&radar)
    }

    /// Plots the configured field and sweep of `radar` into a PNG.
    pub fn render(&self, radar: &AirborneRadar) -> anyhow::Result<RenderSummary> {
        let config = &self.config;
        let mut display = RadarDisplayAirborne::new(radar, config.shift)
            .context("building airborne display")?
            .with_limits(config.field_limits());
        let mut surface = ChartSurface::new();
        display
            .plot(&config.field, config.sweep, &config.options, &mut surface)
            .with_context(|| format!("plotting {} sweep {}", config.field, config.sweep))?;

        if let Some(parent) = config.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let root =
            BitMapBackend::new(&config.output, (config.width, config.height)).into_drawing_area();
        surface
            .present(&root)
            .with_context(|| format!("rendering {}", config.output.display()))?;

        let mesh = display
            .plots()
            .last()
            .context("display recorded no plot")?;
        let summary = RenderSummary {
            output: config.output.clone(),
            field: config.field.clone(),
            sweep: config.sweep,
            scan_type: display.scan_type()?,
            vmin: mesh.vmin,
            vmax: mesh.vmax,
            metrics: display.metrics(),
        };
        info!(
            "rendered {} sweep {} ({}) to {}",
            summary.field,
            summary.sweep,
            summary.scan_type,
            summary.output.display()
        );
        Ok(summary)
    }
}
