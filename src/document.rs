//! Documents: a zip archive plus its two property sheets.
//!
//! Opening a document reads `docProps/core.xml` (required) and
//! `docProps/app.xml` (optional) into sheets. Saving copies every other
//! entry of the source archive unchanged, then appends the committed
//! sheets.

use crate::constants::part;
use crate::error::{Error, Result};
use crate::sheet::{App, AppSheet, Core, CoreSheet};
use std::fs::{self, File};
use std::io::{Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Where a document's archive is read from.
///
/// The source is read once when the document is opened and again on every
/// save, so a path source must stay readable for the document's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Memory(Vec<u8>),
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Source::Path(PathBuf::from(path))
    }
}

impl From<String> for Source {
    fn from(path: String) -> Self {
        Source::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for Source {
    fn from(data: Vec<u8>) -> Self {
        Source::Memory(data)
    }
}

impl Source {
    /// The path this source reads from, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Source::Path(path) => Some(path),
            Source::Memory(_) => None,
        }
    }
}

/// Options applied when an archive is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Deflate level for the metadata parts; `None` uses the default.
    pub compression_level: Option<i64>,
    /// Copy the source archive's comment to the output.
    pub preserve_comment: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            compression_level: None,
            preserve_comment: true,
        }
    }
}

/// An office document opened for metadata editing.
///
/// The sheet types default to [`Core`] and [`App`]; sheets carrying extra
/// properties are used through [`Document::open_as`].
///
/// # Example
///
/// ```no_run
/// use docmeta::Document;
///
/// let mut doc = Document::open("report.docx")?;
/// doc.core_mut().set_creator(Some("Johnny Test"));
/// doc.app_mut()?.set_total_time(Some(127));
/// doc.save("report_copy.docx")?;
/// # Ok::<(), docmeta::Error>(())
/// ```
#[derive(Debug)]
pub struct Document<C: CoreSheet = Core, A: AppSheet = App> {
    source: Source,
    core: C,
    app: Option<A>,
}

impl Document {
    /// Open a document with the standard sheets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the source is not a zip archive
    /// or has no `docProps/core.xml`, and [`Error::Io`] if a path source
    /// cannot be read.
    pub fn open(source: impl Into<Source>) -> Result<Self> {
        Self::open_as(source)
    }

    /// Open a document held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::open_as(Source::Memory(data))
    }

    /// Read a whole archive from `reader` and open it.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }
}

impl<C: CoreSheet, A: AppSheet> Document<C, A> {
    /// Open a document, building its sheets as `C` and `A`.
    pub fn open_as(source: impl Into<Source>) -> Result<Self> {
        let source = source.into();
        let (core_xml, app_xml) = match &source {
            Source::Path(path) => read_metadata(File::open(path)?)?,
            Source::Memory(data) => read_metadata(Cursor::new(data.as_slice()))?,
        };

        let core = C::from_xml(&core_xml)?;
        let app = app_xml.as_deref().map(A::from_xml).transpose()?;
        debug!(source = ?source.path(), has_app = app.is_some(), "opened document");

        Ok(Self { source, core, app })
    }

    #[inline]
    pub fn source(&self) -> &Source {
        &self.source
    }

    #[inline]
    pub fn core(&self) -> &C {
        &self.core
    }

    #[inline]
    pub fn core_mut(&mut self) -> &mut C {
        &mut self.core
    }

    #[inline]
    pub fn has_app(&self) -> bool {
        self.app.is_some()
    }

    /// The application sheet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAppSheet`] if the archive had no
    /// `docProps/app.xml`.
    pub fn app(&self) -> Result<&A> {
        self.app.as_ref().ok_or(Error::MissingAppSheet)
    }

    pub fn app_mut(&mut self) -> Result<&mut A> {
        self.app.as_mut().ok_or(Error::MissingAppSheet)
    }

    /// Save to a new file with default options.
    pub fn save(&mut self, dest: impl AsRef<Path>) -> Result<()> {
        self.save_with(dest, &SaveOptions::default())
    }

    /// Save to a new file.
    ///
    /// The archive is assembled in memory and written in one go, so a
    /// failed save leaves no partial file behind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SameTarget`] if `dest` is the file the document was
    /// opened from.
    pub fn save_with(&mut self, dest: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        let dest = dest.as_ref();
        if let Some(path) = self.source.path()
            && same_file(path, dest)
        {
            return Err(Error::SameTarget(dest.to_path_buf()));
        }

        let data = self.to_bytes_with(options)?;
        fs::write(dest, data)?;
        debug!(dest = %dest.display(), "saved document");
        Ok(())
    }

    /// Write the archive to `writer`.
    pub fn save_to_writer<W: Write + Seek>(&mut self, writer: W, options: &SaveOptions) -> Result<W> {
        self.core.commit()?;
        let core = self.core.serialize()?;
        let app = match self.app.as_mut() {
            Some(app) => {
                app.commit()?;
                Some(app.serialize()?)
            },
            None => None,
        };

        match &self.source {
            Source::Path(path) => {
                write_archive(File::open(path)?, writer, &core, app.as_deref(), options)
            },
            Source::Memory(data) => write_archive(
                Cursor::new(data.as_slice()),
                writer,
                &core,
                app.as_deref(),
                options,
            ),
        }
    }

    /// Render the archive with default options.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.to_bytes_with(&SaveOptions::default())
    }

    pub fn to_bytes_with(&mut self, options: &SaveOptions) -> Result<Vec<u8>> {
        let cursor = self.save_to_writer(Cursor::new(Vec::new()), options)?;
        Ok(cursor.into_inner())
    }
}

const MAX_PREALLOC: u64 = 1 << 20;

fn open_archive<R: Read + Seek>(reader: R) -> Result<ZipArchive<R>> {
    ZipArchive::new(reader).map_err(|e| Error::InvalidFormat(format!("not a zip archive: {e}")))
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<Vec<u8>>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    // declared sizes are untrusted
    let mut data = Vec::with_capacity(entry.size().min(MAX_PREALLOC) as usize);
    entry.read_to_end(&mut data)?;
    Ok(Some(data))
}

/// Read the core and app parts of an archive.
fn read_metadata<R: Read + Seek>(reader: R) -> Result<(Vec<u8>, Option<Vec<u8>>)> {
    let mut archive = open_archive(reader)?;
    let core = read_entry(&mut archive, part::CORE)?
        .ok_or_else(|| Error::InvalidFormat(format!("{} not found in archive", part::CORE)))?;
    let app = read_entry(&mut archive, part::APP)?;
    trace!(entries = archive.len(), "read metadata parts");
    Ok((core, app))
}

/// Copy `source` into `dest`, replacing the metadata parts.
fn write_archive<R: Read + Seek, W: Write + Seek>(
    source: R,
    dest: W,
    core: &[u8],
    app: Option<&[u8]>,
    options: &SaveOptions,
) -> Result<W> {
    let mut archive = open_archive(source)?;
    let mut writer = ZipWriter::new(dest);

    let mut copied = 0usize;
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        if part::is_metadata(entry.name()) {
            continue;
        }
        trace!(name = entry.name(), "copying entry");
        writer.raw_copy_file(entry)?;
        copied += 1;
    }
    debug!(copied, "copied archive entries");

    if options.preserve_comment && !archive.comment().is_empty() {
        writer.set_raw_comment(archive.comment().into())?;
    }

    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(options.compression_level);

    writer.start_file(part::CORE, file_options)?;
    writer.write_all(core)?;
    if let Some(app) = app {
        writer.start_file(part::APP, file_options)?;
        writer.write_all(app)?;
    }

    Ok(writer.finish()?)
}

/// Whether two paths name the same file.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
