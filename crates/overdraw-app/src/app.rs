//! Headless application: replays a scripted session and exports a frame.

use crate::action::Action;
use overdraw_core::canvas::Canvas;
use overdraw_core::compose::Surface;
use overdraw_core::config::{CanvasConfig, ConfigError};
use overdraw_render::{Background, RasterRenderer, RenderContext, Renderer, RendererError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const USAGE: &str = "usage: overdraw <script.json> <out.png> [--preview]";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", USAGE)]
    Usage,
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RendererError),
}

/// Command line options.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub script: PathBuf,
    pub output: PathBuf,
    /// Export the preview surface instead of the editor.
    pub surface: Surface,
}

impl AppConfig {
    /// Parse arguments (without the program name).
    pub fn from_args<I, S>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positional = Vec::new();
        let mut surface = Surface::Editor;
        for arg in args {
            let arg = arg.into();
            match arg.as_str() {
                "--preview" => surface = Surface::Preview,
                _ if arg.starts_with("--") => return Err(AppError::Usage),
                _ => positional.push(PathBuf::from(arg)),
            }
        }
        let [script, output]: [PathBuf; 2] = positional.try_into().map_err(|_| AppError::Usage)?;
        Ok(Self { script, output, surface })
    }
}

/// A recorded session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub config: Option<CanvasConfig>,
    /// Background image path, relative to the script.
    pub background: Option<PathBuf>,
    pub actions: Vec<Action>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Canvas plus the optional background picture.
pub struct App {
    pub canvas: Canvas,
    background: Option<Background>,
}

impl App {
    /// Build the canvas for `script`. Background paths resolve against `base_dir`.
    pub fn new(script: &Script, base_dir: &Path) -> Result<Self, AppError> {
        let canvas = match &script.config {
            Some(config) => Canvas::with_config(config.clone())?,
            None => Canvas::new(),
        };
        let background = script
            .background
            .as_ref()
            .and_then(|path| load_background(&base_dir.join(path)));
        let mut app = Self { canvas, background };
        app.canvas.set_has_background(app.background.is_some());
        Ok(app)
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    /// Apply every action in order.
    pub fn replay(&mut self, actions: &[Action]) {
        for action in actions {
            log::trace!("Applying {:?}", action);
            action.apply(&mut self.canvas);
        }
    }

    /// Render one surface as PNG bytes.
    pub fn export_png(&self, surface: Surface) -> Result<Vec<u8>, AppError> {
        let ctx =
            RenderContext::for_canvas(&self.canvas, surface).with_background(self.background());
        let mut renderer = RasterRenderer::new();
        Ok(renderer.export_png(&ctx)?)
    }

    /// Replay `config.script` and write the frame to `config.output`.
    pub fn run(config: &AppConfig) -> Result<(), AppError> {
        let json = std::fs::read_to_string(&config.script).map_err(|source| AppError::Io {
            path: config.script.clone(),
            source,
        })?;
        let script = Script::from_json(&json)?;
        let base_dir = config.script.parent().unwrap_or_else(|| Path::new("."));

        let mut app = App::new(&script, base_dir)?;
        app.replay(&script.actions);
        log::info!(
            "Replayed {} actions, {} versions saved",
            script.actions.len(),
            app.canvas.history().len()
        );

        let png = app.export_png(config.surface)?;
        std::fs::write(&config.output, &png).map_err(|source| AppError::Io {
            path: config.output.clone(),
            source,
        })?;
        log::info!("Exported PNG to: {:?} ({} bytes)", config.output, png.len());
        Ok(())
    }
}

fn load_background(path: &Path) -> Option<Background> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Failed to read background {:?}: {}", path, e);
            return None;
        }
    };
    match Background::from_bytes(&bytes) {
        Ok(background) => {
            log::info!("Loaded background: {}x{}", background.width(), background.height());
            Some(background)
        }
        Err(e) => {
            log::warn!("Failed to decode background {:?}: {}", path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overdraw_core::compose::RenderLayer;

    const SESSION: &str = r#"{
        "actions": [
            { "action": "set_thickness", "value": 3 },
            { "action": "pointer", "event": { "kind": "down", "position": { "x": 10, "y": 10 } } },
            { "action": "pointer", "event": { "kind": "move", "position": { "x": 40, "y": 10 } } },
            { "action": "pointer", "event": { "kind": "up" } },
            { "action": "commit" },
            { "action": "set_color", "name": "blue" },
            { "action": "pointer", "event": { "kind": "down", "position": { "x": 10, "y": 50 } } },
            { "action": "pointer", "event": { "kind": "move", "position": null } },
            { "action": "pointer", "event": { "kind": "up" } },
            { "action": "commit" },
            { "action": "scrub", "version": 9 }
        ]
    }"#;

    #[test]
    fn test_args() {
        let config = AppConfig::from_args(["s.json", "out.png"]).unwrap();
        assert_eq!(config.script, PathBuf::from("s.json"));
        assert_eq!(config.surface, Surface::Editor);

        let config = AppConfig::from_args(["--preview", "s.json", "out.png"]).unwrap();
        assert_eq!(config.surface, Surface::Preview);

        assert!(matches!(AppConfig::from_args(["s.json"]), Err(AppError::Usage)));
        assert!(matches!(
            AppConfig::from_args(["s.json", "o.png", "--zoom"]),
            Err(AppError::Usage)
        ));
    }

    #[test]
    fn test_replay_session() {
        let script = Script::from_json(SESSION).unwrap();
        let mut app = App::new(&script, Path::new(".")).unwrap();
        app.replay(&script.actions);

        let history = app.canvas.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(1).unwrap().strokes().get(0).unwrap().len(), 2);
        // scrub clamps to the last version and recalls it
        assert_eq!(app.canvas.current_version(), 2);
        assert_eq!(app.canvas.live().len(), 1);
        assert!(app.canvas.live().get(0).unwrap().is_dot());
    }

    #[test]
    fn test_missing_background_is_skipped() {
        let script = Script::from_json(r#"{ "background": "does/not/exist.png" }"#).unwrap();
        let app = App::new(&script, Path::new(".")).unwrap();
        assert!(app.background().is_none());
        assert!(!app.canvas.has_background());
        assert!(
            !app.canvas
                .layers(Surface::Editor)
                .iter()
                .any(|l| matches!(l, RenderLayer::Background))
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let script = Script::from_json(r#"{ "config": { "default_color": "purple" } }"#).unwrap();
        assert!(matches!(
            App::new(&script, Path::new(".")),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_export_png() {
        let script = Script::from_json(SESSION).unwrap();
        let mut app = App::new(&script, Path::new(".")).unwrap();
        app.replay(&script.actions);
        let png = app.export_png(Surface::Preview).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
