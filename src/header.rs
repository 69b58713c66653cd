//! File header for the CVCF container
//!
//! A file opens with a fixed 8-byte preamble (magic plus version), then the
//! variable-length header fields: chromosome name, ploidy, sample names,
//! and opaque metadata-field descriptors. Every length and count is a plain
//! varint. Marker records follow immediately after the last metadata field
//! and run until end of stream; there is no footer.

use std::io::{Read, Write};

use bytemuck::{Pod, Zeroable};

use crate::error::{Error, HeaderError, ReadError, Result};
use crate::varint;

/// File magic, the ASCII bytes `cvcf`
pub const FILE_MAGIC: [u8; 4] = *b"cvcf";

/// Format version bytes
pub const FILE_VERSION: [u8; 4] = [0x00, 0x01, 0x00, 0x00];

/// Size of the fixed preamble in bytes
pub const SIZE_PREAMBLE: usize = 8;

/// The fixed leading bytes of every CVCF file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroable, Pod)]
#[repr(C)]
pub(crate) struct Preamble {
    magic: [u8; 4],
    version: [u8; 4],
}

impl Default for Preamble {
    fn default() -> Self {
        Self {
            magic: FILE_MAGIC,
            version: FILE_VERSION,
        }
    }
}

impl Preamble {
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let preamble: Self = *bytemuck::from_bytes(bytes);
        if preamble.magic != FILE_MAGIC {
            return Err(HeaderError::InvalidMagicNumber(preamble.magic).into());
        }
        if preamble.version != FILE_VERSION {
            return Err(HeaderError::InvalidFormatVersion(preamble.version).into());
        }
        Ok(preamble)
    }
}

/// The decoded header of a CVCF file
///
/// Holds everything a reader needs before the first marker: which
/// chromosome the file covers, the cohort's sample names and ploidy, and
/// any metadata-field descriptors. The dense length of every marker in
/// the file is `sample_count * ploidy`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileHeader {
    chromosome: String,
    ploidy: u8,
    samples: Vec<String>,
    metadata: Vec<Vec<u8>>,
}

impl FileHeader {
    /// Creates a header with no metadata fields
    #[must_use]
    pub fn new(chromosome: impl Into<String>, ploidy: u8, samples: Vec<String>) -> Self {
        Self {
            chromosome: chromosome.into(),
            ploidy,
            samples,
            metadata: Vec::new(),
        }
    }

    /// Attaches metadata-field descriptors, kept as opaque byte blobs
    #[must_use]
    pub fn with_metadata(mut self, metadata: Vec<Vec<u8>>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Chromosome name the file covers
    #[must_use]
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Haplotypes per sample
    #[must_use]
    pub fn ploidy(&self) -> u8 {
        self.ploidy
    }

    /// Sample names in file order
    #[must_use]
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    #[must_use]
    pub fn sample_count(&self) -> u64 {
        self.samples.len() as u64
    }

    /// Metadata-field descriptors in file order
    #[must_use]
    pub fn metadata(&self) -> &[Vec<u8>] {
        &self.metadata
    }

    /// Dense length of every marker in the file: samples times ploidy
    #[must_use]
    pub fn haplotype_count(&self) -> u64 {
        self.sample_count() * u64::from(self.ploidy)
    }

    /// Serializes the preamble and all header fields onto `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(Preamble::default().as_bytes())?;

        varint::write_bytes(self.chromosome.as_bytes(), writer)?;
        varint::encode(u64::from(self.ploidy), writer)?;

        varint::encode(self.sample_count(), writer)?;
        for sample in &self.samples {
            varint::write_bytes(sample.as_bytes(), writer)?;
        }

        varint::encode(self.metadata.len() as u64, writer)?;
        for field in &self.metadata {
            varint::write_bytes(field, writer)?;
        }
        Ok(())
    }

    /// Reads and validates a header from the start of `reader`
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut preamble = [0u8; SIZE_PREAMBLE];
        reader.read_exact(&mut preamble).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                Error::Read(ReadError::UnexpectedEndOfStream(e))
            } else {
                Error::Io(e)
            }
        })?;
        Preamble::from_bytes(&preamble)?;

        let chromosome = varint::read_string(reader)?;
        let raw_ploidy = varint::decode(reader)?;
        let ploidy =
            u8::try_from(raw_ploidy).map_err(|_| HeaderError::PloidyOutOfRange(raw_ploidy))?;

        let sample_count = varint::decode(reader)?;
        let mut samples = Vec::with_capacity(sample_count as usize);
        for _ in 0..sample_count {
            samples.push(varint::read_string(reader)?);
        }

        let metadata_count = varint::decode(reader)?;
        let mut metadata = Vec::with_capacity(metadata_count as usize);
        for _ in 0..metadata_count {
            metadata.push(varint::read_bytes(reader)?);
        }

        Ok(Self {
            chromosome,
            ploidy,
            samples,
            metadata,
        })
    }
}
