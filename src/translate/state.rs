//! Parser state for a single translation run.

/// Kind of notebook cell currently being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Unexecuted source lines; the declared language is always Python.
    Code,
    /// Narrative text, escaped for embedding as Markdown source.
    Markdown,
}

impl CellKind {
    /// nbformat `cell_type` discriminator.
    pub(crate) fn cell_type(self) -> &'static str {
        match self {
            CellKind::Code => "code",
            CellKind::Markdown => "markdown",
        }
    }

    /// nbformat key holding the cell's content lines.
    pub(crate) fn content_key(self) -> &'static str {
        match self {
            CellKind::Code => "input",
            CellKind::Markdown => "source",
        }
    }
}

/// Mutable state threaded through one translation run.
///
/// Owned exclusively by a single [`Translator`](super::Translator), so
/// independent runs over different worksheets can proceed in parallel with
/// no coordination.
#[derive(Debug)]
pub(crate) struct ParserState {
    /// Cell currently accumulating lines; `None` before the first cell opens
    /// and between cells.
    pub cell: Option<CellKind>,
    /// The next code line written to the open cell needs no separator.
    pub first_line: bool,
    /// The next cell opened needs no separator in the document.
    pub first_cell: bool,
    /// Inside a transcript block; lines are dropped until a close marker.
    pub suppressing: bool,
}

impl ParserState {
    pub fn new() -> Self {
        Self {
            cell: None,
            first_line: true,
            first_cell: true,
            suppressing: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_kind_envelope_names() {
        assert_eq!(CellKind::Code.cell_type(), "code");
        assert_eq!(CellKind::Code.content_key(), "input");
        assert_eq!(CellKind::Markdown.cell_type(), "markdown");
        assert_eq!(CellKind::Markdown.content_key(), "source");
    }

    #[test]
    fn test_initial_state() {
        let state = ParserState::new();
        assert_eq!(state.cell, None);
        assert!(state.first_line);
        assert!(state.first_cell);
        assert!(!state.suppressing);
    }
}
