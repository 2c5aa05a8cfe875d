//! # unsage
//!
//! Convert legacy Sage notebook worksheets to IPython notebooks.
//!
//! The Sage notebook server exports each worksheet as `worksheet.html`:
//! narrative text interleaved with `{{{ ... }}}` code blocks and `///`
//! transcript sections holding recorded output. This library walks that
//! export line by line and emits an IPython notebook (nbformat 3) with one
//! markdown or code cell per worksheet block. Recorded output is always
//! dropped; code cells come out unexecuted with an empty outputs list.
//!
//! It does not read the binary `.sws` archives, only the HTML export kept
//! in the server's storage directory.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unsage::convert_file;
//!
//! fn main() -> unsage::Result<()> {
//!     convert_file("worksheet.html", "tutorial.ipynb", "tutorial")?;
//!     Ok(())
//! }
//! ```
//!
//! To convert every worksheet a user owns, see
//! [`batch::convert_user_worksheets`].

pub mod batch;
pub mod error;
pub mod escape;
pub mod translate;

// Re-export commonly used types
pub use batch::BatchOptions;
pub use error::{Error, Result};
pub use translate::{CellKind, Translator};

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// File name of the worksheet export inside a Sage worksheet directory.
pub const WORKSHEET_FILE: &str = "worksheet.html";

/// Translate worksheet lines from `input` into a notebook named `name`,
/// writing the document to `output`.
///
/// Returns the output destination on success.
pub fn convert_reader<R: BufRead, W: Write>(input: R, output: W, name: &str) -> Result<W> {
    Translator::new(output, name).translate(input)
}

/// Translate a worksheet held in memory and return the notebook text.
///
/// # Example
///
/// ```
/// let notebook = unsage::convert_str("x = 1", "scratch").unwrap();
/// assert!(notebook.contains("\"cell_type\": \"markdown\""));
/// ```
pub fn convert_str(input: &str, name: &str) -> Result<String> {
    let out = convert_reader(input.as_bytes(), Vec::new(), name)?;
    // Every emitted byte comes from a &str, so the buffer is valid UTF-8.
    Ok(String::from_utf8(out).expect("notebook output is UTF-8"))
}

/// Translate the worksheet file at `input` into a notebook file at `output`.
///
/// `name` becomes the notebook's metadata name; it is never derived from the
/// worksheet content (worksheet exports do not store their own title).
pub fn convert_file<P, Q>(input: P, output: Q, name: &str) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    convert_reader(reader, writer, name)?;
    Ok(())
}

/// Translate the `worksheet.html` export inside a Sage worksheet directory.
pub fn convert_worksheet_dir<P, Q>(dir: P, output: Q, name: &str) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    convert_file(dir.as_ref().join(WORKSHEET_FILE), output, name)
}
