//! CSV output for scraped rows.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use shelfscan_core::OutputRow;
use shelfscan_scraper::RowSink;

#[derive(Debug, thiserror::Error)]
pub(crate) enum OutputError {
    #[error("failed to create output file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write csv row: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush output: {0}")]
    Flush(#[from] std::io::Error),
}

/// Headerless CSV file with columns `town, offer_code, item_name,
/// retail_price, discount_price, is_available`.
///
/// The file is truncated on creation. A missing discount price is an empty
/// field; availability is `true` or `false`.
pub(crate) struct CsvSink {
    writer: Writer<BufWriter<File>>,
    rows_written: u64,
}

impl CsvSink {
    /// Creates (or truncates) the file at `path`, creating parent directories.
    pub(crate) fn create(path: &Path) -> Result<Self, OutputError> {
        let create_error = |source| OutputError::Create {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(create_error)?;
        }
        let file = File::create(path).map_err(create_error)?;
        tracing::info!(path = %path.display(), "writing rows");

        let writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }
}

impl RowSink for CsvSink {
    type Error = OutputError;

    fn write_row(&mut self, row: &OutputRow) -> Result<(), Self::Error> {
        self.writer.serialize(row)?;
        self.rows_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.writer.flush()?;
        tracing::debug!(rows = self.rows_written, "output flushed");
        Ok(())
    }
}
