use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{OverlayError, OverlayResult};

pub const DEFAULT_FALLBACK_BACKGROUND: &str = "data/halo-reach-map.png";
pub const DEFAULT_OUTPUT_PATH: &str = "final_map.png";

/// Resampling used when stretching the overlay onto the background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Lanczos3,
}

impl ResizeFilter {
    pub fn to_filter_type(self) -> image::imageops::FilterType {
        match self {
            ResizeFilter::Nearest => image::imageops::FilterType::Nearest,
            ResizeFilter::Triangle => image::imageops::FilterType::Triangle,
            ResizeFilter::CatmullRom => image::imageops::FilterType::CatmullRom,
            ResizeFilter::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Render settings, usually read from a JSON file.
///
/// Every field is optional in the file; missing fields take the defaults below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Background used when the requested one cannot be loaded.
    pub fallback_background: PathBuf,
    /// Where the composited image is written. The extension picks the format (PNG otherwise).
    pub output_path: PathBuf,
    /// Extra directories scanned for fonts.
    pub font_dirs: Vec<PathBuf>,
    /// Whether installed system fonts are available to text labels.
    pub system_fonts: bool,
    pub resize_filter: ResizeFilter,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fallback_background: PathBuf::from(DEFAULT_FALLBACK_BACKGROUND),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            font_dirs: Vec::new(),
            system_fonts: true,
            resize_filter: ResizeFilter::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_json(text: &str) -> OverlayResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| OverlayError::config(format!("invalid render config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> OverlayResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> OverlayResult<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(OverlayError::config("output_path must be non-empty"));
        }
        if self.output_path.file_name().is_none() {
            return Err(OverlayError::config(format!(
                "output_path '{}' must name a file",
                self.output_path.display()
            )));
        }
        if self.fallback_background.as_os_str().is_empty() {
            return Err(OverlayError::config("fallback_background must be non-empty"));
        }
        if let Some(dir) = self.font_dirs.iter().find(|d| d.as_os_str().is_empty()) {
            return Err(OverlayError::config(format!(
                "font_dirs entries must be non-empty (got '{}')",
                dir.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
