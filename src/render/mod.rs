//! Template rendering: dumps a finished [`Model`] into a minijinja context
//! and writes the configured output files. The resolution contract ends at
//! the model; this stage is deliberately mechanical.

use crate::config::{GenConfig, OutputConfig};
use crate::model::Model;
use anyhow::Context;
use minijinja::{context, path_loader, Environment};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Renders models through the configured template set.
pub struct Renderer {
    env: Environment<'static>,
    outputs: Vec<OutputConfig>,
    output_dir: PathBuf,
}

impl Renderer {
    pub fn new(config: &GenConfig) -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.set_loader(path_loader(&config.templates.dir));
        Renderer {
            env,
            outputs: config.templates.outputs.clone(),
            output_dir: config.output_dir.clone(),
        }
    }

    /// Render every configured output for one model, returning the files
    /// written. `{stem}` in a destination name is replaced with the source
    /// file stem.
    pub fn render_model(&self, model: &Model) -> anyhow::Result<Vec<PathBuf>> {
        let stem = Path::new(&model.src_filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("failed to create output dir {}", self.output_dir.display())
        })?;

        let mut written = Vec::with_capacity(self.outputs.len());
        for output in &self.outputs {
            let template = self
                .env
                .get_template(&output.template)
                .with_context(|| format!("failed to load template '{}'", output.template))?;
            let rendered = template
                .render(context! { model => model })
                .with_context(|| format!("failed to render template '{}'", output.template))?;

            let dst = self.output_dir.join(output.dst.replace("{stem}", &stem));
            fs::write(&dst, rendered)
                .with_context(|| format!("failed to write {}", dst.display()))?;
            info!(file = %dst.display(), template = %output.template, "rendered");
            written.push(dst);
        }
        Ok(written)
    }
}
