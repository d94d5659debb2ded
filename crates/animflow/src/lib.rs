//! Animflow - animated, narrated flowcharts.
//!
//! Compiles Animflow documents into seekable timelines and plays them back
//! against a renderer, pausing at step boundaries while narration catches up.
//!
//! ```text
//! source ──parse──▶ Diagram ──layout──▶ positioned Diagram ──compile──▶ CompiledTimeline
//!                                                                            │
//!                        Renderer ◀── frames ── PlaybackController ◀─────────┘
//!                        Narrator ◀── speak / completion ──┘
//! ```

pub mod camera;
pub mod config;
pub mod layout;
pub mod playback;
pub mod scheduler;
pub mod session;
pub mod timeline;

mod error;

pub use animflow_core::{color, geometry, identifier, semantic};
pub use animflow_parser::{Diagnostic, ErrorCode, FailureKind, Parsed};

pub use error::{AnimflowError, NarrationError, RenderError};

use log::{debug, info, trace};

use config::AppConfig;
use layout::{LayeredLayout, LayoutEngine};
use playback::PlaybackController;
use semantic::{Diagram, Layout};
use timeline::{CompileOptions, CompiledTimeline};

/// Runs the pipeline stages with one application configuration.
///
/// # Examples
///
/// ```rust
/// use animflow::{DiagramBuilder, config::AppConfig};
///
/// let source = "flowchart LR\nA[Start] --> B[End]\n@animation\nstep 1: show A\nstep 2: connect A->B\n@end";
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// let parsed = builder.parse(source).expect("valid document");
/// let (diagram, _layout) = builder.layout(parsed.diagram()).expect("layout");
/// let timeline = builder.compile(&diagram).expect("compile");
/// assert_eq!(timeline.boundaries().len(), 2);
///
/// let mut player = builder.player(&diagram, timeline);
/// player.play();
/// player.tick(0.5);
/// assert_eq!(player.current_step(), Some(1));
/// ```
#[derive(Debug, Default, Clone)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parses a document, keeping non-fatal warnings next to the diagram.
    ///
    /// # Errors
    ///
    /// Returns [`AnimflowError::Parse`] for an empty document or one without
    /// nodes.
    pub fn parse(&self, source: &str) -> Result<Parsed, AnimflowError> {
        info!("Parsing document");
        let parsed = animflow_parser::parse(source).map_err(|err| AnimflowError::new_parse_error(err, source))?;
        debug!(warnings = parsed.warnings().len(); "Document parsed");
        trace!(diagram:? = parsed.diagram(); "Parsed diagram");
        Ok(parsed)
    }

    /// Positions the diagram with the built-in [`LayeredLayout`].
    ///
    /// # Errors
    ///
    /// Returns [`AnimflowError::Layout`] if the engine fails.
    pub fn layout(&self, diagram: &Diagram) -> Result<(Diagram, Layout), AnimflowError> {
        self.layout_with(&LayeredLayout::new(self.config.layout()), diagram)
    }

    /// Positions the diagram with any [`LayoutEngine`].
    ///
    /// # Errors
    ///
    /// Returns [`AnimflowError::Layout`] if the engine fails.
    pub fn layout_with(
        &self,
        engine: &dyn LayoutEngine,
        diagram: &Diagram,
    ) -> Result<(Diagram, Layout), AnimflowError> {
        let layout = engine.layout(diagram.nodes(), diagram.edges(), diagram.direction())?;
        debug!(bounds:? = layout.bounds(); "Layout calculated");
        Ok((diagram.with_layout(&layout), layout))
    }

    /// Compiles a diagram with the theme colors of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnimflowError::Config`] when a theme color is invalid.
    pub fn compile(&self, diagram: &Diagram) -> Result<CompiledTimeline, AnimflowError> {
        let options = CompileOptions::from_theme(self.config.theme()).map_err(AnimflowError::Config)?;
        Ok(timeline::compile(diagram, &options))
    }

    /// A stopped controller configured from the application configuration
    /// merged with the document's `@config` block.
    ///
    /// Renderer and narrator are attached by the host.
    pub fn player(&self, diagram: &Diagram, timeline: CompiledTimeline) -> PlaybackController {
        let playback = self.config.playback().merged_with(diagram.config());
        debug!(
            speed = playback.speed(),
            narration = playback.narration(),
            looping = playback.looping();
            "Creating player"
        );
        PlaybackController::new(diagram, timeline)
            .with_speed(playback.speed())
            .with_narration(playback.narration())
            .with_looping(playback.looping())
    }
}
