use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use sweepcore::display::{FieldLimits, GridOptions};

use crate::generator::profile::SweepGeneratorConfig;

/// Everything needed to render one sweep image.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkflowConfig {
    pub field: String,
    pub sweep: usize,
    /// Radar volume in JSON; a synthetic volume is generated when absent.
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Horizontal offset in meters applied to every gate.
    pub shift: (f64, f64),
    pub options: GridOptions,
    pub generator: SweepGeneratorConfig,
    /// Per-field color limits layered over the built-in table.
    pub field_limits: BTreeMap<String, (f64, f64)>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            field: "reflectivity".into(),
            sweep: 0,
            input: None,
            output: PathBuf::from("sweep.png"),
            width: 900,
            height: 700,
            shift: (0.0, 0.0),
            options: GridOptions::default(),
            generator: SweepGeneratorConfig::default(),
            field_limits: BTreeMap::new(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn field_limits(&self) -> FieldLimits {
        FieldLimits::default().merged(&self.field_limits)
    }
}
