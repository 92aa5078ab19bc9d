use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Serialize;

use crate::{
    encoder::PngEncoder,
    ico,
    matrix::{Format, IconMatrix, Platform, ResolvedTarget},
    render::{render, Logo},
};

/// Writes every target of a matrix below `root`, one at a time. A failing
/// target is recorded and the rest are still attempted.
pub struct Generator {
    root: PathBuf,
    encoder: PngEncoder,
    logo: Option<Logo>,
}

impl Generator {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            encoder: PngEncoder::default(),
            logo: None,
        }
    }

    pub fn with_logo(mut self, logo: Logo) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_encoder(mut self, encoder: PngEncoder) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn run(&self, matrix: &IconMatrix) -> Report {
        self.run_with(matrix, |_| ())
    }

    /// Like `run`, calling `progress` after each target.
    pub fn run_with<F: FnMut(&Outcome)>(&self, matrix: &IconMatrix, mut progress: F) -> Report {
        if let (Some(logo), Some(largest)) = (&self.logo, matrix.largest_logo_size()) {
            let (width, height) = logo.dimensions();
            if width.max(height) < largest {
                log::warn!("source logo is {width}x{height}, icons up to {largest} px will be upscaled");
            }
        }

        let mut outcomes = Vec::with_capacity(matrix.len());
        for target in matrix.targets() {
            let path = target.target.path.clone();
            let size = target.target.size;
            let error = match self.write_target(&target) {
                Ok(written) => {
                    log::info!("created {} ({size}x{size})", written.display());
                    None
                }
                Err(e) => {
                    log::error!("failed {}: {e:#}", path.display());
                    Some(format!("{e:#}"))
                }
            };
            let outcome = Outcome {
                platform: target.platform,
                path,
                size,
                error,
            };
            progress(&outcome);
            outcomes.push(outcome);
        }
        Report { outcomes }
    }

    fn write_target(&self, target: &ResolvedTarget<'_>) -> anyhow::Result<PathBuf> {
        let bytes = self.encode_target(target)?;
        let path = self.root.join(&target.target.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    fn encode_target(&self, target: &ResolvedTarget<'_>) -> anyhow::Result<Vec<u8>> {
        let encode = |size| render(target.fill, size, self.logo.as_ref())?.encode(&self.encoder);
        match target.target.format() {
            Format::Png => encode(target.target.size),
            Format::Ico => {
                let images = target
                    .target
                    .sizes()
                    .into_iter()
                    .map(|size| -> anyhow::Result<(u32, Vec<u8>)> { Ok((size, encode(size)?)) })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                ico::pack(&images)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub platform: Platform,
    pub path: PathBuf,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn to_json(&self) -> anyhow::Result<serde_json::Value> {
        let now = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)?;
        let created: Vec<_> = self
            .outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| &o.path)
            .collect();
        let failures: Vec<_> = self.failures().collect();
        Ok(serde_json::json!({
            "date": now,
            "total": self.total(),
            "succeeded": self.succeeded(),
            "failed": self.failed(),
            "created": created,
            "failures": failures,
        }))
    }

    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.to_json()?)?;
        fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))
    }
}
