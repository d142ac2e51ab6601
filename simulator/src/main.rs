use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sweepcore::display::Colormap;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Renders airborne radar sweeps to PNG")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Radar volume in JSON; a synthetic volume is generated otherwise
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    field: Option<String>,
    #[arg(long)]
    sweep: Option<usize>,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long, allow_negative_numbers = true)]
    vmin: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    vmax: Option<f64>,
    /// jet, viridis, greys, or a listed map of `threshold:#rrggbb` lines
    #[arg(long)]
    cmap: Option<Colormap>,
    /// Scan type of the synthetic volume
    #[arg(long)]
    scan_type: Option<String>,
    #[arg(long, default_value_t = false)]
    no_colorbar: bool,
    /// Also write the loaded volume as JSON
    #[arg(long)]
    dump_sweep: Option<PathBuf>,
}

impl Args {
    /// Command-line values take precedence over the workflow file.
    fn apply(self, config: &mut WorkflowConfig) {
        if let Some(input) = self.input {
            config.input = Some(input);
        }
        if let Some(field) = self.field {
            config.field = field;
        }
        if let Some(sweep) = self.sweep {
            config.sweep = sweep;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(scan_type) = self.scan_type {
            config.generator.scan_type = scan_type;
        }
        if let Some(cmap) = self.cmap {
            config.options.cmap = cmap;
        }
        config.options.vmin = self.vmin.or(config.options.vmin);
        config.options.vmax = self.vmax.or(config.options.vmax);
        if self.no_colorbar {
            config.options.colorbar_flag = false;
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = match &args.workflow {
        Some(path) => WorkflowConfig::load(path)?,
        None => WorkflowConfig::default(),
    };
    let dump_path = args.dump_sweep.clone();
    args.apply(&mut workflow_config);

    let runner = Runner::new(workflow_config);
    let radar = runner.load_radar()?;
    if let Some(path) = dump_path {
        runner
            .dump_radar(&radar, &path)
            .with_context(|| format!("dumping sweep to {}", path.display()))?;
    }
    let summary = runner.render(&radar)?;

    println!(
        "Rendered {} sweep {} ({}) -> {} [limits {}..{}, {} gates masked]",
        summary.field,
        summary.sweep,
        summary.scan_type,
        summary.output.display(),
        summary.vmin,
        summary.vmax,
        summary.metrics.masked_gates
    );
    Ok(())
}
