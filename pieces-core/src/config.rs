use serde::{Deserialize, Serialize};

use crate::error::PiecesError;
use crate::grid::GridConfig;

/// Page options, read from the container's `data-options` attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub pieces: GridConfig,
    /// Wait before the first mode switch after the grid is built.
    pub initial_delay_ms: u32,
    /// Quiet period before a window resize is applied.
    pub resize_debounce_ms: u32,
    pub tilt: TiltOptions,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            pieces: GridConfig::default(),
            initial_delay_ms: 1000,
            resize_debounce_ms: 10,
            tilt: TiltOptions::default(),
        }
    }
}

/// Main image tilt limits. Kept so existing `data-options` payloads parse.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TiltOptions {
    pub max_rotation_x: f64,
    pub max_rotation_y: f64,
    pub max_translation_x: f64,
    pub max_translation_y: f64,
}

impl Default for TiltOptions {
    fn default() -> Self {
        TiltOptions {
            max_rotation_x: -2.0,
            max_rotation_y: 3.0,
            max_translation_x: 6.0,
            max_translation_y: -2.0,
        }
    }
}

impl Options {
    pub fn from_json(text: &str) -> Result<Self, PiecesError> {
        let opts: Options = serde_json::from_str(text)?;
        opts.pieces.validate()?;
        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let opts = Options::from_json("{}").unwrap();
        assert_eq!(opts, Options::default());
        assert_eq!(opts.pieces, GridConfig { rows: 14, columns: 10 });
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let opts =
            Options::from_json(r#"{"pieces":{"rows":2,"columns":3},"tilt":{"maxRotationY":5}}"#)
                .unwrap();
        assert_eq!(opts.pieces, GridConfig { rows: 2, columns: 3 });
        assert_eq!(opts.initial_delay_ms, 1000);
        assert_eq!(opts.tilt.max_rotation_y, 5.0);
        assert_eq!(opts.tilt.max_rotation_x, -2.0);
    }

    #[test]
    fn rejects_bad_payloads() {
        assert!(matches!(
            Options::from_json("not json"),
            Err(PiecesError::Options(_))
        ));
        assert!(matches!(
            Options::from_json(r#"{"pieces":{"rows":0,"columns":3}}"#),
            Err(PiecesError::EmptyGrid { .. })
        ));
    }
}
