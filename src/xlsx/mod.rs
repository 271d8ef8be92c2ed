//! XLSX package reading and writing.
//!
//! Reading collects archive entries in any order into a raw model and then
//! reconciles it into a [`Workbook`]. Writing runs a prepare pass over the
//! workbook and emits parts in dependency order.
//!
//! # Example
//!
//! ```no_run
//! use xlsxpack::{Workbook, WriteOptions};
//!
//! # async fn demo() -> xlsxpack::Result<()> {
//! let mut workbook = Workbook::read_file("input.xlsx").await?;
//! for sheet in &workbook.worksheets {
//!     println!("{}: {} cells", sheet.name, sheet.cells.len());
//! }
//! workbook
//!     .write_file("output.xlsx", WriteOptions::default().with_styles(false))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod drawing;
mod parts;
mod props;
mod raw;
mod reader;
mod reconcile;
mod rels;
mod schedule;
mod shared_strings;
mod styles;
mod theme;
mod workbook_part;
mod worksheet;
mod writer;

pub use parts::PartKind;
pub use reader::read_package;
pub use schedule::{EmitGraph, EmitStep};
pub use writer::{write_package, WriteOptions, DEFAULT_AUTHOR};

use crate::container::{ArchiveSink, EntrySource, ZipEntrySource, ZipSink};
use crate::error::{Error, Result};
use crate::model::Workbook;
use base64::Engine;
use std::io::{Cursor, Write};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Options for [`Workbook::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// The input is base64 text rather than raw archive bytes
    pub base64: bool,
}

impl LoadOptions {
    /// Options for base64 input.
    pub fn base64() -> Self {
        Self { base64: true }
    }
}

impl Workbook {
    /// Read a workbook from archive bytes.
    pub async fn load(data: impl AsRef<[u8]>, options: LoadOptions) -> Result<Self> {
        let bytes = if options.base64 {
            base64::engine::general_purpose::STANDARD
                .decode(data.as_ref())
                .map_err(|e| Error::InvalidData(format!("invalid base64 input: {e}")))?
        } else {
            data.as_ref().to_vec()
        };
        let mut source = ZipEntrySource::from_bytes(bytes)?;
        read_package(&mut source).await
    }

    /// Read a workbook from a file.
    pub async fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
            _ => Error::Io(e),
        })?;
        Self::load(bytes, LoadOptions::default()).await
    }

    /// Read a workbook from a byte stream. The stream is buffered in full.
    pub async fn read<R: AsyncRead + Unpin>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        Self::load(bytes, LoadOptions::default()).await
    }

    /// Read a workbook from a custom entry source.
    pub async fn read_source<S: EntrySource + ?Sized>(source: &mut S) -> Result<Self> {
        read_package(source).await
    }

    /// Write the workbook as a ZIP archive into `writer` and hand the writer back.
    ///
    /// The archive is assembled in memory and copied into `writer` only once
    /// every part has been emitted, so a failed write leaves `writer` untouched.
    ///
    /// Writing fills default properties, assigns worksheet ids and relationship
    /// ids in place, which is why it takes `&mut self`. The exclusive borrow
    /// also means a workbook cannot be read into while it is being written.
    pub async fn write<W: Write>(&mut self, mut writer: W, options: WriteOptions) -> Result<W> {
        let bytes = self.write_buffer(options).await?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(writer)
    }

    /// Write the workbook into a custom sink.
    pub async fn write_to_sink<S: ArchiveSink + ?Sized>(
        &mut self,
        sink: &mut S,
        options: WriteOptions,
    ) -> Result<()> {
        write_package(self, sink, options).await
    }

    /// Write the workbook into a new buffer.
    pub async fn write_buffer(&mut self, options: WriteOptions) -> Result<Vec<u8>> {
        let mut sink = ZipSink::new(Cursor::new(Vec::new()));
        write_package(self, &mut sink, options).await?;
        let cursor = sink
            .into_inner()
            .ok_or_else(|| Error::InvalidData("archive was not finalized".to_string()))?;
        Ok(cursor.into_inner())
    }

    /// Write the workbook to a file. Nothing is created if the write fails.
    pub async fn write_file(&mut self, path: impl AsRef<Path>, options: WriteOptions) -> Result<()> {
        let bytes = self.write_buffer(options).await?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}
