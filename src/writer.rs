//! Streaming writer for CVCF files
//!
//! [`Writer`] wraps any [`Write`] sink, emits the full header at
//! construction, and serializes markers in the order they are pushed.
//! End of file is simply the end of the last marker.
//!
//! A marker whose dense length disagrees with the header's
//! `samples * ploidy`, or an I/O failure from the sink, moves the writer
//! to a failed state; every later call reports
//! [`WriteError::FailedState`] without emitting bytes.

use std::io::Write;

use crate::error::{Result, WriteError};
use crate::header::FileHeader;
use crate::marker::Marker;

/// An append-only writer producing a CVCF stream
pub struct Writer<W: Write> {
    inner: W,
    header: FileHeader,
    failed: bool,
}

impl<W: Write> Writer<W> {
    /// Opens a writer, immediately serializing `header` onto `inner`
    pub fn new(mut inner: W, header: FileHeader) -> Result<Self> {
        header.write_to(&mut inner)?;
        Ok(Self {
            inner,
            header,
            failed: false,
        })
    }

    /// The header this writer was opened with
    #[must_use]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// True once a rejected marker or sink failure has poisoned the writer
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Serializes one marker
    ///
    /// The marker's haplotype count must equal the header's
    /// `samples * ploidy`; a mismatch poisons the writer before any of
    /// the marker's bytes reach the sink.
    pub fn write_marker(&mut self, marker: &Marker) -> Result<()> {
        if self.failed {
            return Err(WriteError::FailedState.into());
        }
        let expected = self.header.haplotype_count();
        if marker.haplotype_count() != expected {
            self.failed = true;
            return Err(WriteError::HaplotypeCountMismatch {
                expected,
                got: marker.haplotype_count(),
            }
            .into());
        }
        marker.write_to(&mut self.inner).map_err(|e| {
            self.failed = true;
            e
        })
    }

    /// Flushes the underlying sink
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying sink
    pub fn into_inner(self) -> W {
        self.inner
    }
}
