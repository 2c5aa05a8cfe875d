//! Streaming translation of worksheet lines into a notebook document.

use std::io::{BufRead, Write};

use crate::error::{Error, Result};
use crate::escape::{escape_code, escape_markdown};

use super::state::{CellKind, ParserState};

/// Opening delimiter of a worksheet code block.
const CODE_OPEN: &str = "{{{";
/// Closing delimiter of a worksheet code block.
const CODE_CLOSE: &str = "}}}";
/// Marker introducing a recorded transcript/output section.
const TRANSCRIPT: &str = "///";

/// Declared language of every code cell.
const CELL_LANGUAGE: &str = "python";
/// Target notebook format version.
const NBFORMAT: u32 = 3;
const NBFORMAT_MINOR: u32 = 0;

/// Indentation of content lines inside a cell envelope (13 spaces).
const LINE_INDENT: &str = "             ";

/// Single-pass translator from worksheet lines to a serialized notebook.
///
/// One translator owns one output destination and one parser state for the
/// duration of a run. Line order is preserved exactly; cells appear in the
/// order they were opened. Transcript blocks are dropped, and code cells are
/// emitted unexecuted with an empty outputs list.
///
/// # Example
///
/// ```
/// use unsage::Translator;
///
/// let source = "Intro text\n{{{\nx = 1\n}}}\n";
/// let out = Translator::new(Vec::new(), "tutorial")
///     .translate(source.as_bytes())
///     .unwrap();
/// let notebook = String::from_utf8(out).unwrap();
/// assert!(notebook.contains("\"cell_type\": \"markdown\""));
/// assert!(notebook.contains("\"cell_type\": \"code\""));
/// ```
pub struct Translator<W: Write> {
    out: W,
    name: String,
    state: ParserState,
    line_no: usize,
}

impl<W: Write> Translator<W> {
    /// Create a translator emitting a notebook named `name` to `out`.
    ///
    /// The name is supplied by the caller, never derived from worksheet
    /// content: worksheet exports do not carry their own title.
    pub fn new(out: W, name: impl Into<String>) -> Self {
        Self {
            out,
            name: name.into(),
            state: ParserState::new(),
            line_no: 0,
        }
    }

    /// Translate every line of `input` and finalize the document.
    ///
    /// Returns the output destination on success. On error the destination
    /// may hold a truncated document; nothing already written is retracted
    /// and no retry is attempted.
    pub fn translate<R: BufRead>(mut self, input: R) -> Result<W> {
        self.begin()?;
        for line in input.lines() {
            let line = line?;
            self.process_line(&line)?;
        }
        self.finish()
    }

    /// Write the document preamble.
    fn begin(&mut self) -> Result<()> {
        write!(
            self.out,
            "{{\n \"metadata\": {{\n  \"name\": \"{}\"\n }},\n \"nbformat\": {},\n \"nbformat_minor\": {},\n \"worksheets\": [\n  {{\n   \"cells\": [\n",
            escape_code(&self.name),
            NBFORMAT,
            NBFORMAT_MINOR,
        )?;
        Ok(())
    }

    /// Classify one source line and emit whatever it calls for.
    ///
    /// Classification priority: close marker, suppressed line, open marker,
    /// transcript marker, blank line, content line. A close marker applies
    /// even while suppressing and always ends suppression.
    fn process_line(&mut self, line: &str) -> Result<()> {
        self.line_no += 1;
        if line.starts_with(CODE_CLOSE) {
            self.close_cell()?;
        } else if self.state.suppressing {
            // Transcript lines are dropped wholesale.
        } else if line.starts_with(CODE_OPEN) {
            if self.state.cell == Some(CellKind::Code) {
                return Err(Error::NestedCodeCell { line: self.line_no });
            }
            if self.state.cell.is_some() {
                self.close_cell()?;
            }
            self.open_cell(CellKind::Code)?;
        } else if line.starts_with(TRANSCRIPT) {
            self.state.suppressing = true;
        } else if line.trim().is_empty() {
            // Blank lines never start, end, or populate a cell.
        } else {
            self.content_line(line)?;
        }
        Ok(())
    }

    /// Emit the opening envelope of a new cell.
    fn open_cell(&mut self, kind: CellKind) -> Result<()> {
        if !self.state.first_cell {
            self.out.write_all(b",")?;
        }
        self.out.write_all(b"\n")?;
        write!(
            self.out,
            "\n    {{\n     \"cell_type\": \"{}\",\n     \"metadata\": {{}},\n     \"{}\": [\n",
            kind.cell_type(),
            kind.content_key(),
        )?;
        self.state.cell = Some(kind);
        self.state.first_cell = false;
        self.state.first_line = true;
        Ok(())
    }

    /// Emit the closing envelope of the open cell, if any, and return to the
    /// between-cells state. Always ends transcript suppression.
    fn close_cell(&mut self) -> Result<()> {
        match self.state.cell {
            Some(CellKind::Code) => write!(
                self.out,
                "\n        ],\n         \"language\": \"{}\",\n         \"metadata\": {{}},\n         \"outputs\": []\n        }}",
                CELL_LANGUAGE,
            )?,
            Some(CellKind::Markdown) => self.out.write_all(b"\n        ]\n        }")?,
            None => {}
        }
        self.state.cell = None;
        self.state.suppressing = false;
        Ok(())
    }

    /// Append an ordinary content line, opening a markdown cell first when
    /// no cell is open.
    fn content_line(&mut self, line: &str) -> Result<()> {
        match self.state.cell {
            Some(CellKind::Code) => {
                if self.state.first_line {
                    self.state.first_line = false;
                } else {
                    self.out.write_all(b",\n")?;
                }
                write!(self.out, "{}\"{}\\n\"", LINE_INDENT, escape_code(line))?;
            }
            Some(CellKind::Markdown) => {
                // Markdown lines are separator-prefixed unconditionally; the
                // line that opens a markdown cell is written by the arm below
                // and never lands here.
                self.out.write_all(b",\n")?;
                write!(self.out, "{}\"{}\"", LINE_INDENT, escape_markdown(line))?;
            }
            None => {
                self.open_cell(CellKind::Markdown)?;
                write!(self.out, "{}\"{}\"", LINE_INDENT, escape_markdown(line))?;
            }
        }
        Ok(())
    }

    /// Write the document closer and flush.
    ///
    /// An open trailing cell stays unclosed: only an explicit close marker
    /// emits a cell's closing envelope, so a worksheet that ends mid-block
    /// yields a syntactically incomplete document.
    fn finish(mut self) -> Result<W> {
        self.out.write_all(b"\n   ]\n  }\n ]\n}\n")?;
        self.out.flush()?;
        Ok(self.out)
    }
}
