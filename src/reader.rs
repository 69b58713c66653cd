//! Streaming reader for CVCF files
//!
//! [`Reader`] wraps any [`Read`] source, validates the header at
//! construction, and then decodes markers one at a time in file order.
//! There is no random access; region queries are layered on top by
//! external indexing.
//!
//! A decode error is terminal: the reader moves to a failed state and
//! every later call reports [`ReadError::FailedState`]. A clean end of
//! stream is not an error.

use std::io::Read;

use crate::error::{ReadError, Result};
use crate::header::FileHeader;
use crate::marker::Marker;

/// A forward-only reader over the markers of a CVCF stream
#[derive(Debug)]
pub struct Reader<R> {
    inner: R,
    header: FileHeader,
    failed: bool,
}

impl<R: Read> Reader<R> {
    /// Opens a reader, consuming and validating the file header
    pub fn new(mut inner: R) -> Result<Self> {
        let header = FileHeader::read_from(&mut inner)?;
        Ok(Self {
            inner,
            header,
            failed: false,
        })
    }

    /// The decoded file header
    #[must_use]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Chromosome name from the header
    #[must_use]
    pub fn chromosome(&self) -> &str {
        self.header.chromosome()
    }

    /// Ploidy from the header
    #[must_use]
    pub fn ploidy(&self) -> u8 {
        self.header.ploidy()
    }

    /// Sample names from the header
    #[must_use]
    pub fn samples(&self) -> &[String] {
        self.header.samples()
    }

    #[must_use]
    pub fn sample_count(&self) -> u64 {
        self.header.sample_count()
    }

    /// True once a decode error has poisoned the reader
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Decodes the next marker
    ///
    /// Returns `Ok(None)` at a clean end of stream. Any decode error
    /// moves the reader to the failed state and is returned; subsequent
    /// calls return [`ReadError::FailedState`] without touching the
    /// stream.
    pub fn read_marker(&mut self) -> Result<Option<Marker>> {
        if self.failed {
            return Err(ReadError::FailedState.into());
        }
        match Marker::read_from(&mut self.inner, self.header.haplotype_count()) {
            Ok(marker) => Ok(marker),
            Err(e) => {
                self.failed = true;
                Err(e)
            }
        }
    }

    /// Borrowing iterator over the remaining markers
    ///
    /// Single-pass and fused: after the first error or the end of the
    /// stream the iterator yields nothing further.
    pub fn markers(&mut self) -> Markers<'_, R> {
        Markers {
            reader: self,
            done: false,
        }
    }

    /// Consumes the reader, returning the underlying source
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> IntoIterator for Reader<R> {
    type Item = Result<Marker>;
    type IntoIter = IntoMarkers<R>;

    fn into_iter(self) -> Self::IntoIter {
        IntoMarkers {
            reader: self,
            done: false,
        }
    }
}

/// Borrowing marker iterator returned by [`Reader::markers`]
pub struct Markers<'a, R> {
    reader: &'a mut Reader<R>,
    done: bool,
}

impl<R: Read> Iterator for Markers<'_, R> {
    type Item = Result<Marker>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_marker() {
            Ok(Some(marker)) => Some(Ok(marker)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Owning marker iterator created by `Reader::into_iter`
pub struct IntoMarkers<R> {
    reader: Reader<R>,
    done: bool,
}

impl<R: Read> Iterator for IntoMarkers<R> {
    type Item = Result<Marker>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_marker() {
            Ok(Some(marker)) => Some(Ok(marker)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
