use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::{
    core::Flip,
    error::{SlideError, SlideResult},
};

/// Pacing and step parameters of a slideshow session.
///
/// Every field has a default, so a JSON config only names what it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideshowConfig {
    /// Minimum interval between presented frames of dissolves, fades, wipes and stretch-in.
    pub step_interval_us: u64,
    /// Minimum interval between presented frames of a push.
    pub push_interval_us: u64,
    /// Number of blend steps of a dissolve ramp before the final full-alpha frame.
    pub dissolve_steps: u16,
    /// Alpha added per dissolve step.
    pub dissolve_increment: u8,
    /// Pixels the edge moves per wipe or push step.
    pub edge_step_px: u16,
    /// Ken-Burns interpolation step, also the pacing interval between its frames.
    pub ken_burns_step_ms: u32,
    /// Ken-Burns duration used when a request gives 0.
    pub ken_burns_default_ms: u32,
    /// Longest wait for one pass to complete; `None` polls forever.
    pub poll_timeout_us: Option<u64>,
    /// Output flip applied to every pass.
    pub flip: Flip,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            step_interval_us: 50_000,
            push_interval_us: 5_000,
            dissolve_steps: 30,
            dissolve_increment: 8,
            edge_step_px: 8,
            ken_burns_step_ms: 50,
            ken_burns_default_ms: 4_000,
            poll_timeout_us: Some(1_000_000),
            flip: Flip::NONE,
        }
    }
}

impl SlideshowConfig {
    /// Parse and validate a JSON config.
    pub fn from_reader<R: std::io::Read>(r: R) -> SlideResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| SlideError::validation(format!("parse slideshow config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// [`SlideshowConfig::from_reader`] over a file.
    pub fn from_path(path: impl AsRef<Path>) -> SlideResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SlideError::validation(format!("open slideshow config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject values that would stall a transition or overflow the dissolve ramp.
    pub fn validate(&self) -> SlideResult<()> {
        if self.ken_burns_step_ms == 0 {
            return Err(SlideError::validation("ken_burns_step_ms must be > 0"));
        }
        if self.edge_step_px == 0 {
            return Err(SlideError::validation("edge_step_px must be > 0"));
        }
        if self.dissolve_steps == 0 {
            return Err(SlideError::validation("dissolve_steps must be > 0"));
        }
        let top = u32::from(self.dissolve_steps - 1) * u32::from(self.dissolve_increment);
        if top > 255 {
            return Err(SlideError::validation(format!(
                "dissolve ramp reaches {top}, alpha levels stop at 255"
            )));
        }
        if self.poll_timeout_us == Some(0) {
            return Err(SlideError::validation("poll_timeout_us must be > 0 when set"));
        }
        Ok(())
    }
}
