/// Custom Result type for cvcf operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the cvcf library, encompassing all possible error
/// cases that can occur while encoding or decoding variant data.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Errors related to the file header
    #[error("Error processing header: {0}")]
    Header(#[from] HeaderError),

    /// Errors in the variable-length integer codecs
    #[error("Error decoding varint: {0}")]
    Varint(#[from] VarintError),

    /// Errors that occur while decoding markers from a stream
    #[error("Error reading file: {0}")]
    Read(#[from] ReadError),

    /// Errors that occur while writing markers to a stream
    #[error("Error writing file: {0}")]
    Write(#[from] WriteError),

    /// Errors that occur while constructing markers from caller input
    #[error("Error building marker: {0}")]
    Builder(#[from] BuilderError),

    /// Standard I/O errors
    #[error("Error with IO: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion errors
    #[error("Error with UTF8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Conversion errors from anyhow errors
    #[cfg(feature = "anyhow")]
    #[error("Generic error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Checks if the error is a terminal reader/writer state error
    ///
    /// Once a reader or writer reports a failure every subsequent call
    /// returns this error, so callers looping over markers can use this
    /// to tell a fresh failure from a repeated one.
    #[must_use]
    pub fn is_failed_state(&self) -> bool {
        matches!(
            self,
            Self::Read(ReadError::FailedState) | Self::Write(WriteError::FailedState)
        )
    }

    /// Checks if the error indicates a stream that ended mid-element
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            Self::Varint(VarintError::Truncated) | Self::Read(ReadError::UnexpectedEndOfStream(_))
        )
    }
}

/// Errors specific to the bit-prefixed varint codecs
#[derive(thiserror::Error, Debug)]
pub enum VarintError {
    /// The stream ended before the terminating byte of a varint
    #[error("Unexpected end of stream inside a varint")]
    Truncated,

    /// The encoded value does not fit in a u64
    #[error("Varint exceeds the representable range of a u64")]
    Overflow,
}

/// Errors specific to processing and validating the file header
#[derive(thiserror::Error, Debug)]
pub enum HeaderError {
    /// The magic number in the header does not match the expected value
    ///
    /// # Arguments
    /// * `[u8; 4]` - The invalid magic bytes that were found
    #[error("Invalid magic number: {0:?}")]
    InvalidMagicNumber([u8; 4]),

    /// The format version in the header is not supported
    ///
    /// # Arguments
    /// * `[u8; 4]` - The unsupported version bytes that were found
    #[error("Invalid format version: {0:?}")]
    InvalidFormatVersion([u8; 4]),

    /// The ploidy field does not fit in a single byte
    #[error("Ploidy {0} is out of range (expected 0..=255)")]
    PloidyOutOfRange(u64),
}

/// Errors that can occur while decoding markers from a stream
#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    /// A decoded haplotype offset falls outside the dense length
    ///
    /// # Fields
    /// * `offset` - The offset reconstructed from the delta stream
    /// * `haplotype_count` - The dense length declared by the header
    #[error("Haplotype offset {offset} is out of bounds for haplotype count {haplotype_count}")]
    OffsetOutOfBounds { offset: u64, haplotype_count: u64 },

    /// A zero delta after the first entry would repeat the previous offset
    #[error("Duplicate haplotype offset {0}")]
    DuplicateOffset(u64),

    /// The declared sparse entry count exceeds the dense length
    #[error("Entry count {count} exceeds haplotype count {haplotype_count}")]
    EntryCountExceedsHaplotypes { count: u64, haplotype_count: u64 },

    /// The stream ended in the middle of a fixed-length element
    #[error("Unexpected end of stream: {0}")]
    UnexpectedEndOfStream(std::io::Error),

    /// The reader previously failed and refuses further reads
    #[error("Reader is in a failed state")]
    FailedState,
}

/// Errors that can occur while writing markers to a stream
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    /// The marker's dense length disagrees with the file header
    ///
    /// # Fields
    /// * `expected` - Haplotype count of the file (samples x ploidy)
    /// * `got` - Haplotype count of the rejected marker
    #[error("Marker haplotype count ({got}) does not match the header ({expected})")]
    HaplotypeCountMismatch { expected: u64, got: u64 },

    /// The writer previously failed and refuses further writes
    #[error("Writer is in a failed state")]
    FailedState,
}

/// Errors that can occur while constructing markers from caller input
#[derive(thiserror::Error, Debug)]
pub enum BuilderError {
    /// Sparse input must only hold non-reference calls
    #[error("Sparse input contains a reference allele at offset {0}")]
    RefAlleleInSparseInput(u64),

    /// More sparse entries than haplotypes to put them in
    #[error("Sparse entry count ({entries}) exceeds haplotype count ({haplotype_count})")]
    TooManySparseEntries { entries: u64, haplotype_count: u64 },
}
