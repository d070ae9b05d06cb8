//! Optional on-disk copies of request HTML and generated CSS
//!
//! Files share a stem of `{YYYYmmdd_HHMMSS}_{prompt slug}` so one request's
//! artifacts sort together. Writes never affect the HTTP response: the
//! `spawn_*` helpers run them in the background and only log failures.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::utils::slugify_prompt;

/// Build the shared file-name stem for one request
#[must_use]
pub fn artifact_stem<Tz>(prompt: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}", at.format("%Y%m%d_%H%M%S"), slugify_prompt(prompt))
}

/// Stem for a request arriving now, in local time
#[must_use]
pub fn artifact_stem_now(prompt: &str) -> String {
    artifact_stem(prompt, &Local::now())
}

#[derive(Debug, Clone)]
pub struct ArtifactSaver {
    html_dir: PathBuf,
    css_dir: PathBuf,
}

impl ArtifactSaver {
    pub fn new(html_dir: impl Into<PathBuf>, css_dir: impl Into<PathBuf>) -> Self {
        Self {
            html_dir: html_dir.into(),
            css_dir: css_dir.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.html_log_dir(), config.css_log_dir())
    }

    #[must_use]
    pub fn html_dir(&self) -> &Path {
        &self.html_dir
    }

    #[must_use]
    pub fn css_dir(&self) -> &Path {
        &self.css_dir
    }

    /// Save the reduced HTML as `{stem}.html` and the submitted HTML as
    /// `{stem}.original.html`. Returns the reduced file's path.
    pub async fn save_html(&self, stem: &str, original: &str, reduced: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.html_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.html_dir.display()))?;

        let reduced_path = self.html_dir.join(format!("{stem}.html"));
        let original_path = self.html_dir.join(format!("{stem}.original.html"));

        tokio::fs::write(&reduced_path, reduced)
            .await
            .with_context(|| format!("Failed to write {}", reduced_path.display()))?;
        tokio::fs::write(&original_path, original)
            .await
            .with_context(|| format!("Failed to write {}", original_path.display()))?;

        log::info!("Saved HTML structure to {}", reduced_path.display());
        Ok(reduced_path)
    }

    /// Save generated CSS as `{stem}.css`
    pub async fn save_css(&self, stem: &str, css: &str) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.css_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.css_dir.display()))?;

        let path = self.css_dir.join(format!("{stem}.css"));
        tokio::fs::write(&path, css)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        log::info!("Saved CSS to {}", path.display());
        Ok(path)
    }
}

/// Write HTML artifacts in the background
pub fn spawn_save_html(
    saver: Arc<ArtifactSaver>,
    stem: String,
    original: String,
    reduced: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = saver.save_html(&stem, &original, &reduced).await {
            log::warn!("Failed to save HTML artifacts for {stem}: {e:#}");
        }
    })
}

/// Write the CSS artifact in the background
pub fn spawn_save_css(saver: Arc<ArtifactSaver>, stem: String, css: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = saver.save_css(&stem, &css).await {
            log::warn!("Failed to save CSS artifact for {stem}: {e:#}");
        }
    })
}
