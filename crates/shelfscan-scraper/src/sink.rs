use std::convert::Infallible;

use shelfscan_core::OutputRow;

/// Destination for output rows.
///
/// The scheduler calls this from a single consumer only, so implementations
/// need no internal locking.
///
/// Calls are synchronous and run on the async runtime's worker thread.
/// Implementations must not block for long: buffer writes (as `CsvSink` does
/// with a `BufWriter`) or hand them off, and do the slow work in `flush`.
pub trait RowSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Appends one row.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the row cannot be written.
    fn write_row(&mut self, row: &OutputRow) -> Result<(), Self::Error>;

    /// Pushes buffered rows to durable storage.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if buffered rows cannot be persisted.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// In-memory sink, mainly for tests and dry runs.
impl RowSink for Vec<OutputRow> {
    type Error = Infallible;

    fn write_row(&mut self, row: &OutputRow) -> Result<(), Self::Error> {
        self.push(row.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
