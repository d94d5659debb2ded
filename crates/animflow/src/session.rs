//! Editing sessions with non-destructive recovery.
//!
//! A [`Session`] turns each revision of a document into a [`Program`]. When a
//! revision fails to parse, the previous program stays current so a live
//! preview keeps showing the last good diagram instead of going blank.

use log::{info, warn};

use animflow_parser::Diagnostic;

use crate::{
    DiagramBuilder,
    error::AnimflowError,
    semantic::{Diagram, Layout},
    timeline::CompiledTimeline,
};

/// Everything needed to play one revision of a document.
#[derive(Debug, Clone)]
pub struct Program {
    diagram: Diagram,
    layout: Layout,
    timeline: CompiledTimeline,
    warnings: Vec<Diagnostic>,
}

impl Program {
    /// The positioned diagram.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn timeline(&self) -> &CompiledTimeline {
        &self.timeline
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

#[derive(Debug, Default)]
pub struct Session {
    builder: DiagramBuilder,
    program: Option<Program>,
    revision: u64,
}

impl Session {
    pub fn new(builder: DiagramBuilder) -> Self {
        Self {
            builder,
            program: None,
            revision: 0,
        }
    }

    /// Parses, lays out and compiles `source`.
    ///
    /// # Errors
    ///
    /// Returns the failure of whichever stage failed. The previous program,
    /// if any, remains current.
    pub fn update(&mut self, source: &str) -> Result<&Program, AnimflowError> {
        let program = match self.build(source) {
            Ok(program) => program,
            Err(err) => {
                warn!(
                    revision = self.revision,
                    kept_previous = self.program.is_some();
                    "Document update failed"
                );
                return Err(err);
            }
        };

        self.revision += 1;
        info!(
            revision = self.revision,
            steps = program.timeline.boundaries().len(),
            warnings = program.warnings.len();
            "Program updated"
        );
        Ok(self.program.insert(program))
    }

    /// The last successfully built program.
    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    /// Number of successful updates so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn builder(&self) -> &DiagramBuilder {
        &self.builder
    }

    fn build(&self, source: &str) -> Result<Program, AnimflowError> {
        let (diagram, warnings) = self.builder.parse(source)?.into_parts();
        let (diagram, layout) = self.builder.layout(&diagram)?;
        let timeline = self.builder.compile(&diagram)?;
        Ok(Program {
            diagram,
            layout,
            timeline,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use animflow_parser::FailureKind;

    use super::*;

    const GOOD: &str = "flowchart LR\nA[One] --> B[Two]\n@animation\nstep 1: show A\n@end";

    #[test]
    fn test_failed_update_keeps_previous_program() {
        let mut session = Session::default();
        session.update(GOOD).unwrap();
        assert_eq!(session.revision(), 1);

        let err = session.update("   \n").unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::Syntax));

        let program = session.program().unwrap();
        assert_eq!(program.diagram().nodes().len(), 2);
        assert_eq!(session.revision(), 1);
    }

    #[test]
    fn test_first_failure_leaves_no_program() {
        let mut session = Session::default();
        let err = session.update("flowchart LR\n").unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::Semantic));
        assert!(session.program().is_none());
    }

    #[test]
    fn test_program_is_positioned() {
        let mut session = Session::default();
        let program = session.update(GOOD).unwrap();
        assert!(program.layout().node(crate::identifier::Id::new("A")).is_some());
        assert!(program.diagram().nodes().iter().all(|node| node.bounds().is_some()));
    }
}
