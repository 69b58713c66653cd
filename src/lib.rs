//! # CVCF
//!
//! The `cvcf` library provides efficient APIs for reading and writing the
//! CVCF file format: a compact binary container for population-scale
//! genetic variant data.
//!
//! Each record (a [`Marker`]) describes one variant site together with the
//! per-haplotype allele calls across the cohort. In realistic inputs the
//! vast majority of calls match the reference allele, so markers store
//! only the non-reference calls as `(offset, status)` pairs and
//! delta-encode the offsets with bit-prefixed varints; the prefix bit of
//! each delta carries whether the call is an alternate allele or missing.
//!
//! The crate offers:
//!
//! - Bit-prefixed variable-length integer codecs through [`varint`]
//! - A general sparse vector type, [`CompressedVector`], with sparse and
//!   dense iteration and sparse-sparse inner products
//! - [`Marker`] construction from dense or sparse call sets
//! - Streaming [`Reader`] and [`Writer`] types over any `Read`/`Write`
//!   source with iterator surfaces
//!
//! ## File Structure
//!
//! ```text
//! ┌────────────────────┐
//! │  Magic + Version   │ 8 bytes
//! ├────────────────────┤
//! │ Chromosome, Ploidy │
//! │ Samples, Metadata  │ varint-prefixed fields
//! ├────────────────────┤
//! │      Marker        │
//! ├────────────────────┤
//! │       ...          │ markers until end of stream
//! └────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//!
//! use cvcf::{AlleleStatus, FileHeader, Marker, Reader, Result, Writer};
//!
//! fn main() -> Result<()> {
//!     let header = FileHeader::new("20", 2, vec!["s1".to_string(), "s2".to_string()]);
//!     let mut writer = Writer::new(Cursor::new(Vec::new()), header)?;
//!
//!     let marker = Marker::from_dense(
//!         12345,
//!         "A",
//!         "G",
//!         &[
//!             AlleleStatus::HasRef,
//!             AlleleStatus::HasAlt,
//!             AlleleStatus::HasRef,
//!             AlleleStatus::IsMissing,
//!         ],
//!     );
//!     writer.write_marker(&marker)?;
//!
//!     let bytes = writer.into_inner().into_inner();
//!     let mut reader = Reader::new(Cursor::new(bytes))?;
//!     while let Some(marker) = reader.read_marker()? {
//!         println!("{}: af = {}", marker.position(), marker.allele_frequency());
//!     }
//!     Ok(())
//! }
//! ```

/// Error definitions
pub mod error;

/// File header: magic, version, chromosome, ploidy, samples, metadata
mod header;

/// Variant site records and their wire codec
mod marker;

/// Streaming marker reader
mod reader;

/// Sparse vector storage
pub mod sparse;

/// Bit-prefixed variable-length integer codecs
pub mod varint;

/// Streaming marker writer
mod writer;

pub use error::{Error, Result};
pub use header::{FileHeader, FILE_MAGIC, FILE_VERSION};
pub use marker::{AlleleStatus, Marker, SparseAllele};
pub use reader::{IntoMarkers, Markers, Reader};
pub use sparse::CompressedVector;
pub use writer::Writer;

#[cfg(test)]
mod testing {

    use super::*;
    use anyhow::Result;
    use std::io::Cursor;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn two_sample_header() -> FileHeader {
        FileHeader::new("20", 2, vec!["s1".to_string(), "s2".to_string()])
    }

    #[test]
    fn test_file_roundtrip() -> Result<()> {
        let header = two_sample_header();
        let mut writer = Writer::new(Cursor::new(Vec::new()), header.clone())?;

        let first = Marker::from_dense(
            100,
            "A",
            "G",
            &[
                AlleleStatus::HasRef,
                AlleleStatus::HasAlt,
                AlleleStatus::HasRef,
                AlleleStatus::HasRef,
            ],
        );
        let second = Marker::from_dense(
            250,
            "CT",
            "C",
            &[
                AlleleStatus::IsMissing,
                AlleleStatus::HasRef,
                AlleleStatus::HasAlt,
                AlleleStatus::HasAlt,
            ],
        );
        writer.write_marker(&first)?;
        writer.write_marker(&second)?;

        let bytes = writer.into_inner().into_inner();
        let mut reader = Reader::new(Cursor::new(bytes))?;
        assert_eq!(reader.header(), &header);
        assert_eq!(reader.chromosome(), "20");
        assert_eq!(reader.ploidy(), 2);
        assert_eq!(reader.samples(), ["s1", "s2"]);

        assert_eq!(reader.read_marker()?, Some(first));
        assert_eq!(reader.read_marker()?, Some(second));
        assert_eq!(reader.read_marker()?, None);
        assert!(!reader.is_failed());
        Ok(())
    }

    #[test]
    fn test_empty_file_roundtrip() -> Result<()> {
        let writer = Writer::new(Cursor::new(Vec::new()), two_sample_header())?;
        let bytes = writer.into_inner().into_inner();

        let mut reader = Reader::new(Cursor::new(bytes))?;
        assert_eq!(reader.read_marker()?, None);
        Ok(())
    }

    #[test]
    fn test_writer_rejects_haplotype_mismatch() -> Result<()> {
        let writer = Writer::new(Cursor::new(Vec::new()), two_sample_header())?;
        let header_len = writer.into_inner().get_ref().len();

        let mut writer = Writer::new(Cursor::new(Vec::new()), two_sample_header())?;
        let bad = Marker::from_dense(
            1,
            "A",
            "T",
            &[
                AlleleStatus::HasRef,
                AlleleStatus::HasRef,
                AlleleStatus::HasAlt,
            ],
        );
        let err = writer.write_marker(&bad).unwrap_err();
        assert!(matches!(
            err,
            Error::Write(error::WriteError::HaplotypeCountMismatch { expected: 4, got: 3 })
        ));
        assert!(writer.is_failed());

        // poisoned: a well-formed marker is refused too
        let good = Marker::from_dense(2, "A", "T", &[AlleleStatus::HasRef; 4]);
        let err = writer.write_marker(&good).unwrap_err();
        assert!(err.is_failed_state());

        // the sink holds the header and nothing else
        let bytes = writer.into_inner().into_inner();
        assert_eq!(bytes.len(), header_len);

        let mut reader = Reader::new(Cursor::new(bytes))?;
        assert_eq!(reader.read_marker()?, None);
        Ok(())
    }

    #[test]
    fn test_reader_fails_on_truncated_marker() -> Result<()> {
        let mut writer = Writer::new(Cursor::new(Vec::new()), two_sample_header())?;
        let marker = Marker::from_dense(
            77,
            "A",
            "T",
            &[
                AlleleStatus::HasAlt,
                AlleleStatus::HasRef,
                AlleleStatus::HasRef,
                AlleleStatus::HasAlt,
            ],
        );
        writer.write_marker(&marker)?;

        let mut bytes = writer.into_inner().into_inner();
        bytes.truncate(bytes.len() - 1);

        let mut reader = Reader::new(Cursor::new(bytes))?;
        assert!(reader.read_marker().is_err());
        assert!(reader.is_failed());

        let err = reader.read_marker().unwrap_err();
        assert!(err.is_failed_state());
        Ok(())
    }

    #[test]
    fn test_reader_rejects_garbage() {
        let err = Reader::new(Cursor::new(b"not a cvcf file!".to_vec())).unwrap_err();
        assert!(matches!(
            err,
            Error::Header(error::HeaderError::InvalidMagicNumber(_))
        ));
    }

    #[test]
    fn test_marker_iterator() -> Result<()> {
        let mut writer = Writer::new(Cursor::new(Vec::new()), two_sample_header())?;
        for position in 1..=5u64 {
            let marker = Marker::from_dense(
                position * 10,
                "A",
                "C",
                &[
                    AlleleStatus::HasAlt,
                    AlleleStatus::HasRef,
                    AlleleStatus::HasRef,
                    AlleleStatus::HasRef,
                ],
            );
            writer.write_marker(&marker)?;
        }
        let bytes = writer.into_inner().into_inner();

        let mut reader = Reader::new(Cursor::new(bytes.clone()))?;
        let positions: Vec<u64> = reader
            .markers()
            .map(|marker| Ok(marker?.position()))
            .collect::<Result<_>>()?;
        assert_eq!(positions, [10, 20, 30, 40, 50]);

        // owning iterator sees the same stream
        let reader = Reader::new(Cursor::new(bytes))?;
        assert_eq!(reader.into_iter().count(), 5);
        Ok(())
    }

    #[test]
    fn test_randomized_roundtrip() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let samples: Vec<String> = (0..25).map(|idx| format!("sample_{idx}")).collect();
        let header = FileHeader::new("11", 2, samples)
            .with_metadata(vec![b"ID".to_vec(), b"QUAL".to_vec()]);
        let haplotypes = header.haplotype_count() as usize;

        let mut markers = Vec::new();
        let mut position = 0u64;
        for _ in 0..100 {
            position += rng.random_range(1..5_000);
            let calls: Vec<AlleleStatus> = (0..haplotypes)
                .map(|_| {
                    if rng.random_bool(0.05) {
                        AlleleStatus::HasAlt
                    } else if rng.random_bool(0.01) {
                        AlleleStatus::IsMissing
                    } else {
                        AlleleStatus::HasRef
                    }
                })
                .collect();
            markers.push(Marker::from_dense(position, "A", "T", &calls));
        }

        let mut writer = Writer::new(Cursor::new(Vec::new()), header.clone())?;
        for marker in &markers {
            writer.write_marker(marker)?;
        }
        let bytes = writer.into_inner().into_inner();

        let mut reader = Reader::new(Cursor::new(bytes))?;
        assert_eq!(reader.header(), &header);
        let decoded = reader.markers().collect::<crate::Result<Vec<Marker>>>()?;
        assert_eq!(decoded, markers);
        Ok(())
    }
}
