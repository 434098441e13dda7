//! Artifact output: the DXF drawing and the CSV summary.
//!
//! Both artifacts are written to fresh temporary files first. Nothing is
//! visible at the destination until both have been serialized, and the
//! temporaries are removed when an [`Artifacts`] value is dropped without
//! being persisted.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::drawing::DrawingDocument;
use crate::error::Result;
use crate::table::Table;

pub mod dxf_io;

pub use dxf_io::{to_drawing, write_dxf};

/// Default file name of the drawing download.
pub const DEFAULT_DXF_NAME: &str = "combined_output.dxf";
/// Default file name of the table download.
pub const DEFAULT_CSV_NAME: &str = "processed_points.csv";

/// A fully written drawing and summary table, held as temporary files.
#[derive(Debug)]
pub struct Artifacts {
    drawing: NamedTempFile,
    summary: NamedTempFile,
}

fn temp_file(dir: Option<&Path>, suffix: &str) -> Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("survey_dxf-").suffix(suffix);
    Ok(match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    })
}

/// Where each temporary lives. Use the destination directories so that
/// [`Artifacts::persist`] is a rename on the same file system. `None` means
/// the system temporary directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactDirs<'a> {
    pub drawing: Option<&'a Path>,
    pub summary: Option<&'a Path>,
}

impl<'a> ArtifactDirs<'a> {
    /// Both temporaries in one directory.
    pub fn shared(dir: Option<&'a Path>) -> Self {
        Self {
            drawing: dir,
            summary: dir,
        }
    }
}

/// Serializes both artifacts. On error no file is left behind.
pub fn write_artifacts(
    doc: &DrawingDocument,
    summary: &Table,
    dirs: ArtifactDirs<'_>,
) -> Result<Artifacts> {
    let mut drawing = temp_file(dirs.drawing, ".dxf")?;
    {
        let mut writer = BufWriter::new(drawing.as_file_mut());
        write_dxf(doc, &mut writer)?;
        writer.flush()?;
    }

    let mut table = temp_file(dirs.summary, ".csv")?;
    {
        let mut writer = BufWriter::new(table.as_file_mut());
        summary.write_csv(&mut writer)?;
        writer.flush()?;
    }

    Ok(Artifacts {
        drawing,
        summary: table,
    })
}

impl Artifacts {
    /// Temporary location of the drawing.
    pub fn drawing_path(&self) -> &Path {
        self.drawing.path()
    }

    /// Temporary location of the summary table.
    pub fn summary_path(&self) -> &Path {
        self.summary.path()
    }

    /// Moves both files to their destinations. If the second move fails the
    /// first destination is removed again.
    pub fn persist(self, drawing: &Path, summary: &Path) -> Result<(PathBuf, PathBuf)> {
        let Artifacts {
            drawing: dxf_tmp,
            summary: csv_tmp,
        } = self;
        dxf_tmp.persist(drawing)?;
        if let Err(e) = csv_tmp.persist(summary) {
            if let Err(cleanup) = std::fs::remove_file(drawing) {
                log::warn!("could not remove {}: {}", drawing.display(), cleanup);
            }
            return Err(e.into());
        }
        Ok((drawing.to_path_buf(), summary.to_path_buf()))
    }
}
