//! Variant site records and their wire codec
//!
//! A [`Marker`] describes one genomic variant site: its 1-based position,
//! reference and alternate allele sequences, and the per-haplotype calls
//! across the cohort. Calls are held sparsely (only non-reference calls
//! are stored) since in population-scale data almost every haplotype
//! matches the reference.
//!
//! On the wire a marker is a run of varints (see [`crate::varint`]):
//!
//! ```text
//! [position][|ref| + bytes][|alt| + bytes][entry count][entries...]
//! ```
//!
//! Each entry is a 1-bit-prefixed varint: the prefix flags an alternate
//! (1) versus missing (0) call, and the value is the offset delta from the
//! previous entry (the first delta is the absolute offset).

use std::io::{Read, Write};

use crate::error::{BuilderError, ReadError, Result};
use crate::sparse::CompressedVector;
use crate::varint::{self, Prefixed};

/// One haplotype's call at a variant site
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlleleStatus {
    /// The haplotype matches the reference allele
    #[default]
    HasRef,
    /// The haplotype carries the alternate allele
    HasAlt,
    /// No call was made for this haplotype
    IsMissing,
}

/// A non-reference call paired with the haplotype offset it belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SparseAllele {
    /// Haplotype offset in `0..haplotype_count`
    pub offset: u64,
    /// Either [`AlleleStatus::HasAlt`] or [`AlleleStatus::IsMissing`]
    pub status: AlleleStatus,
}

impl SparseAllele {
    #[must_use]
    pub fn new(offset: u64, status: AlleleStatus) -> Self {
        Self { offset, status }
    }
}

/// One variant site with its per-haplotype calls
///
/// Markers are immutable once constructed, whether built from caller data
/// or decoded from a stream.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    position: u64,
    ref_allele: String,
    alt_allele: String,
    calls: CompressedVector<AlleleStatus>,
}

impl Marker {
    /// Builds a marker from one call per haplotype
    ///
    /// Reference calls are elided; the haplotype count is the length of
    /// `calls`.
    #[must_use]
    pub fn from_dense(
        position: u64,
        ref_allele: impl Into<String>,
        alt_allele: impl Into<String>,
        calls: &[AlleleStatus],
    ) -> Self {
        let mut calls = CompressedVector::from_dense(calls.iter().copied());
        calls.shrink_to_fit();
        Self {
            position,
            ref_allele: ref_allele.into(),
            alt_allele: alt_allele.into(),
            calls,
        }
    }

    /// Builds a marker from pre-filtered non-reference calls
    ///
    /// `entries` must be sorted by ascending offset with every offset below
    /// `haplotype_count`. Rejects entries holding a reference call and
    /// entry counts exceeding the haplotype count.
    pub fn from_sparse(
        position: u64,
        ref_allele: impl Into<String>,
        alt_allele: impl Into<String>,
        entries: &[SparseAllele],
        haplotype_count: u64,
    ) -> Result<Self> {
        if entries.len() as u64 > haplotype_count {
            return Err(BuilderError::TooManySparseEntries {
                entries: entries.len() as u64,
                haplotype_count,
            }
            .into());
        }
        let mut values = Vec::with_capacity(entries.len());
        let mut offsets = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.status == AlleleStatus::HasRef {
                return Err(BuilderError::RefAlleleInSparseInput(entry.offset).into());
            }
            values.push(entry.status);
            offsets.push(entry.offset as usize);
        }
        Ok(Self {
            position,
            ref_allele: ref_allele.into(),
            alt_allele: alt_allele.into(),
            calls: CompressedVector::from_parts(values, offsets, haplotype_count as usize),
        })
    }

    /// 1-based genomic coordinate of the site
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reference allele sequence
    #[must_use]
    pub fn ref_allele(&self) -> &str {
        &self.ref_allele
    }

    /// Alternate allele sequence
    #[must_use]
    pub fn alt_allele(&self) -> &str {
        &self.alt_allele
    }

    /// Dense logical length: samples times ploidy
    #[must_use]
    pub fn haplotype_count(&self) -> u64 {
        self.calls.len() as u64
    }

    /// Number of stored (non-reference) calls
    #[must_use]
    pub fn non_ref_count(&self) -> usize {
        self.calls.non_zero_len()
    }

    /// Iterates every haplotype's call, reference calls included
    pub fn alleles(&self) -> impl ExactSizeIterator<Item = AlleleStatus> + '_ {
        self.calls.iter_dense()
    }

    /// Iterates only the stored non-reference calls, ascending by offset
    pub fn non_ref(&self) -> impl ExactSizeIterator<Item = SparseAllele> + '_ {
        self.calls
            .iter()
            .map(|(offset, &status)| SparseAllele::new(offset as u64, status))
    }

    /// Frequency of the alternate allele among the called haplotypes
    ///
    /// Missing calls are excluded from the denominator. NaN when every
    /// haplotype is missing (or the marker has none).
    #[must_use]
    pub fn allele_frequency(&self) -> f64 {
        let mut alt = 0u64;
        let mut missing = 0u64;
        for (_, status) in self.calls.iter() {
            match status {
                AlleleStatus::HasAlt => alt += 1,
                AlleleStatus::IsMissing => missing += 1,
                AlleleStatus::HasRef => {}
            }
        }
        alt as f64 / (self.haplotype_count() - missing) as f64
    }

    /// Serializes the marker onto `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        varint::encode(self.position, writer)?;
        varint::write_bytes(self.ref_allele.as_bytes(), writer)?;
        varint::write_bytes(self.alt_allele.as_bytes(), writer)?;
        varint::encode(self.calls.non_zero_len() as u64, writer)?;

        let mut previous = 0u64;
        for (idx, entry) in self.non_ref().enumerate() {
            let delta = if idx == 0 {
                entry.offset
            } else {
                entry.offset - previous
            };
            let flag = u8::from(entry.status == AlleleStatus::HasAlt);
            Prefixed::<1>::encode(flag, delta, writer)?;
            previous = entry.offset;
        }
        Ok(())
    }

    /// Decodes one marker from `reader`
    ///
    /// `haplotype_count` comes from the container header. Returns
    /// `Ok(None)` on a clean end of stream (no bytes before the position
    /// field); a stream that ends anywhere later in the record is an
    /// error.
    pub fn read_from<R: Read>(reader: &mut R, haplotype_count: u64) -> Result<Option<Self>> {
        let Some(position) = varint::decode_opt(reader)? else {
            return Ok(None);
        };
        let ref_allele = varint::read_string(reader)?;
        let alt_allele = varint::read_string(reader)?;

        let count = varint::decode(reader)?;
        if count > haplotype_count {
            return Err(ReadError::EntryCountExceedsHaplotypes {
                count,
                haplotype_count,
            }
            .into());
        }

        let mut values = Vec::with_capacity(count as usize);
        let mut offsets = Vec::with_capacity(count as usize);
        let mut previous = 0u64;
        for idx in 0..count {
            let (flag, delta) = Prefixed::<1>::decode(reader)?;
            let offset = if idx == 0 {
                delta
            } else if delta == 0 {
                return Err(ReadError::DuplicateOffset(previous).into());
            } else {
                previous.saturating_add(delta)
            };
            if offset >= haplotype_count {
                return Err(ReadError::OffsetOutOfBounds {
                    offset,
                    haplotype_count,
                }
                .into());
            }
            values.push(if flag == 1 {
                AlleleStatus::HasAlt
            } else {
                AlleleStatus::IsMissing
            });
            offsets.push(offset as usize);
            previous = offset;
        }

        Ok(Some(Self {
            position,
            ref_allele,
            alt_allele,
            calls: CompressedVector::from_parts(values, offsets, haplotype_count as usize),
        }))
    }
}
