//! Batch conversion of a user's Sage worksheet collection.
//!
//! The Sage notebook server keeps each worksheet in a numbered directory
//! under a per-user base path, next to a `worksheet_conf.pickle` record that
//! holds the display name (the worksheet file itself carries no title). This
//! module walks that layout, recovers each name, and runs one independent
//! translation per worksheet.
//!
//! Translation runs share no state, so the fan-out runs in parallel by
//! default; see [`BatchOptions::sequential`] to opt out.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use regex::Regex;

use crate::convert_worksheet_dir;
use crate::error::{Error, Result};

/// File name of the companion metadata record in a worksheet directory.
pub const WORKSHEET_CONF: &str = "worksheet_conf.pickle";

/// Options for batch conversion.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Base directory holding the numbered worksheet directories. When unset,
    /// the platform default for the given user is used.
    pub base_dir: Option<PathBuf>,

    /// Directory receiving the `.ipynb` files.
    pub output_dir: PathBuf,

    /// Whether to convert worksheets in parallel.
    pub parallel: bool,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the worksheet base directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Set the output directory for converted notebooks.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Convert worksheets one at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            base_dir: None,
            output_dir: PathBuf::from("."),
            parallel: true,
        }
    }
}

/// Convert every worksheet belonging to `user`.
///
/// Worksheet directories are the all-digit entries under the base path; each
/// is translated into `<name>.ipynb` in the output directory, where the name
/// comes from the worksheet's metadata record. Returns the paths written, in
/// worksheet-number order.
///
/// Errors are not caught or translated: a missing worksheet file, an
/// unreadable metadata record, or a structural error in any worksheet aborts
/// the batch. Notebooks already written stay on disk.
pub fn convert_user_worksheets(user: &str, options: &BatchOptions) -> Result<Vec<PathBuf>> {
    let base = options
        .base_dir
        .clone()
        .unwrap_or_else(|| default_worksheet_root(user));
    let worksheets = worksheet_dirs(&base)?;
    log::debug!(
        "found {} worksheets under {}",
        worksheets.len(),
        base.display()
    );

    let convert_one = |dir: &PathBuf| -> Result<PathBuf> {
        let name = worksheet_name(&dir.join(WORKSHEET_CONF))?;
        let dest = options
            .output_dir
            .join(format!("{}.ipynb", filename_safe(&name)));
        log::debug!("{} -> {}", dir.display(), dest.display());
        convert_worksheet_dir(dir, &dest, &name)?;
        Ok(dest)
    };

    if options.parallel {
        worksheets.par_iter().map(convert_one).collect()
    } else {
        worksheets.iter().map(convert_one).collect()
    }
}

/// Default Sage notebook storage path for `user`.
///
/// The server stores every account's worksheets under its own `admin` home
/// inside the user's `.sage` directory.
pub fn default_worksheet_root(user: &str) -> PathBuf {
    #[cfg(target_os = "macos")]
    let home = PathBuf::from("/Users").join(user);
    #[cfg(not(target_os = "macos"))]
    let home = PathBuf::from("/home").join(user);
    home.join(".sage/sage_notebook.sagenb/home/admin")
}

/// Recover the display name from a worksheet's companion metadata record.
///
/// The record is a Python protocol-0 pickle of the worksheet configuration.
/// Only the `name` entry is needed, and protocol 0 stores strings as plain
/// text, so a narrow scan is enough: the `S'name'` (or `Vname`) key opcode,
/// an optional memo opcode, then the value string.
pub fn worksheet_name(conf: &Path) -> Result<String> {
    let raw = fs::read(conf)?;
    let text = String::from_utf8_lossy(&raw);
    let pattern = Regex::new(r"(?:S'name'|Vname)\n(?:p\d+\n)?(?:S'((?:[^'\\]|\\.)*)'|V([^\n]*))")
        .expect("name pattern is valid");
    let name = pattern
        .captures(&text)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| unescape_pickle(m.as_str()))
        .unwrap_or_default();
    if name.is_empty() {
        return Err(Error::WorksheetName {
            path: conf.to_path_buf(),
        });
    }
    Ok(name)
}

/// Undo the repr-style escapes protocol 0 applies inside string values.
fn unescape_pickle(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(esc @ ('x' | 'u')) => {
                let len = if esc == 'x' { 2 } else { 4 };
                let mut digits = String::with_capacity(len);
                while digits.len() < len {
                    match chars.peek() {
                        Some(&d) if d.is_ascii_hexdigit() => {
                            digits.push(d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&digits, 16)
                    .ok()
                    .filter(|_| digits.len() == len)
                    .and_then(char::from_u32)
                {
                    Some(decoded) => out.push(decoded),
                    None => {
                        // Not a well-formed escape; keep it verbatim.
                        out.push(esc);
                        out.push_str(&digits);
                    }
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Numbered worksheet directories under `base`, in numeric order.
fn worksheet_dirs(base: &Path) -> Result<Vec<PathBuf>> {
    let mut numbered: Vec<(u64, PathBuf)> = Vec::new();
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().to_string_lossy().parse::<u64>() {
            Ok(number) => numbered.push((number, path)),
            Err(_) => log::debug!("skipping non-worksheet entry {}", path.display()),
        }
    }
    numbered.sort_by_key(|(number, _)| *number);
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}

/// Make a worksheet name usable as a file stem.
fn filename_safe(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if safe != name {
        log::warn!(
            "worksheet name {:?} contains path separators; writing {:?}",
            name,
            safe
        );
    }
    safe
}
