//! Scatter-gather buffer sets.
//!
//! A [`SgList`] presents N fixed-size memory regions as one logical byte
//! stream, so a transform can consume or produce a stream that is split
//! across several physical allocations. Splitting is transparent: a
//! stream partitioned over one segment or many behaves identically.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};

/// A fixed-capacity memory region shared between the harness and the
/// offload worker.
///
/// Handles are cheap clones of the same underlying region. The region's
/// capacity is fixed at allocation time. While a request is in flight the
/// worker treats destination segments as write-once; that is a protocol
/// invariant, not a type-level guarantee.
#[derive(Debug, Clone)]
pub struct SegmentBuf {
    region: Arc<Mutex<Box<[u8]>>>,
}

impl SegmentBuf {
    /// Allocate a zero-initialized region of `capacity` bytes.
    ///
    /// Allocation is fallible; exhaustion reports
    /// [`Error::AllocationFailed`] instead of aborting.
    pub fn zeroed(capacity: usize) -> Result<Self> {
        let mut storage: Vec<u8> = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| Error::allocation_failed(capacity))?;
        storage.resize(capacity, 0);
        Ok(Self::from_vec(storage))
    }

    /// Wrap an existing buffer; capacity is the buffer's length.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            region: Arc::new(Mutex::new(data.into_boxed_slice())),
        }
    }

    /// Region capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.lock().len()
    }

    /// Overwrite the region, byte `i` receiving `f(i)`.
    pub fn fill_with(&self, mut f: impl FnMut(usize) -> u8) {
        let mut region = self.lock();
        for (i, byte) in region.iter_mut().enumerate() {
            *byte = f(i);
        }
    }

    /// Copy the region's contents out.
    pub fn copy_out(&self) -> Vec<u8> {
        self.lock().to_vec()
    }

    fn lock(&self) -> MutexGuard<'_, Box<[u8]>> {
        // A panicking writer leaves bytes, not broken invariants.
        self.region.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
struct SgEntry {
    buf: SegmentBuf,
    len: usize,
}

/// An ordered sequence of segments presented as one logical stream.
///
/// Construction is pure data assembly: the list holds handles to
/// caller-owned segments and never allocates regions itself. Zero-length
/// segments are permitted degenerate entries.
#[derive(Debug, Clone, Default)]
pub struct SgList {
    entries: Vec<SgEntry>,
}

impl SgList {
    /// Build a list over `bufs`, each contributing its full capacity.
    pub fn from_bufs(bufs: &[SegmentBuf]) -> Self {
        let entries = bufs
            .iter()
            .map(|buf| SgEntry {
                len: buf.capacity(),
                buf: buf.clone(),
            })
            .collect();
        Self { entries }
    }

    /// Number of physical segments backing the stream.
    pub fn segment_count(&self) -> usize {
        self.entries.len()
    }

    /// Total logical capacity: the sum of all segment capacities.
    pub fn total_capacity(&self) -> usize {
        self.entries.iter().map(|e| e.len).sum()
    }

    /// Copy the first `len` logical bytes into a contiguous buffer,
    /// walking segments in order.
    pub fn gather(&self, len: usize) -> Result<Vec<u8>> {
        let available = self.total_capacity();
        if len > available {
            return Err(Error::SrcOutOfRange {
                requested: len,
                available,
            });
        }
        let mut out = Vec::with_capacity(len);
        let mut remaining = len;
        for entry in &self.entries {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(entry.len);
            let region = entry.buf.lock();
            out.extend_from_slice(&region[..take]);
            remaining -= take;
        }
        Ok(out)
    }

    /// Write a contiguous byte run across the segments in order.
    pub fn scatter(&self, data: &[u8]) -> Result<()> {
        let offered = self.total_capacity();
        if data.len() > offered {
            return Err(Error::DstTooSmall {
                required: data.len(),
                offered,
            });
        }
        let mut offset = 0;
        for entry in &self.entries {
            if offset == data.len() {
                break;
            }
            let take = (data.len() - offset).min(entry.len);
            let mut region = entry.buf.lock();
            region[..take].copy_from_slice(&data[offset..offset + take]);
            offset += take;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    #[test]
    fn zeroed_segment_is_zero_filled() {
        let buf = SegmentBuf::zeroed(64).unwrap();
        assert_eq!(buf.capacity(), 64);
        assert!(buf.copy_out().iter().all(|&b| b == 0));
    }

    #[test]
    fn gather_walks_segment_boundaries() {
        let a = SegmentBuf::from_vec(ramp(10));
        let b = SegmentBuf::from_vec(ramp(10));
        let list = SgList::from_bufs(&[a, b]);

        let bytes = list.gather(15).unwrap();
        assert_eq!(bytes.len(), 15);
        assert_eq!(&bytes[..10], ramp(10).as_slice());
        assert_eq!(&bytes[10..], &ramp(10)[..5]);
    }

    #[test]
    fn gather_past_stream_end_is_rejected() {
        let list = SgList::from_bufs(&[SegmentBuf::zeroed(8).unwrap()]);
        let err = list.gather(9).unwrap_err();
        assert!(matches!(
            err,
            Error::SrcOutOfRange {
                requested: 9,
                available: 8
            }
        ));
    }

    #[test]
    fn scatter_splits_across_segments() {
        let a = SegmentBuf::zeroed(6).unwrap();
        let b = SegmentBuf::zeroed(6).unwrap();
        let list = SgList::from_bufs(&[a.clone(), b.clone()]);

        list.scatter(&ramp(9)).unwrap();
        assert_eq!(a.copy_out(), ramp(6));
        assert_eq!(&b.copy_out()[..3], &ramp(9)[6..]);
        // Untouched tail stays zeroed.
        assert_eq!(&b.copy_out()[3..], &[0, 0, 0]);
    }

    #[test]
    fn scatter_overflow_is_dst_too_small() {
        let list = SgList::from_bufs(&[SegmentBuf::zeroed(4).unwrap()]);
        let err = list.scatter(&ramp(5)).unwrap_err();
        assert!(matches!(err, Error::DstTooSmall { required: 5, offered: 4 }));
    }

    #[test]
    fn zero_length_segments_are_transparent() {
        let a = SegmentBuf::from_vec(ramp(4));
        let empty = SegmentBuf::from_vec(Vec::new());
        let b = SegmentBuf::from_vec(ramp(4));
        let list = SgList::from_bufs(&[a, empty, b]);

        assert_eq!(list.segment_count(), 3);
        assert_eq!(list.total_capacity(), 8);
        let bytes = list.gather(8).unwrap();
        assert_eq!(&bytes[..4], ramp(4).as_slice());
        assert_eq!(&bytes[4..], ramp(4).as_slice());
    }

    #[test]
    fn single_and_multi_segment_streams_agree() {
        let whole = SegmentBuf::from_vec(ramp(32));
        let halves = [
            SegmentBuf::from_vec(ramp(32)[..16].to_vec()),
            SegmentBuf::from_vec(ramp(32)[16..].to_vec()),
        ];
        let one = SgList::from_bufs(&[whole]);
        let two = SgList::from_bufs(&halves);
        assert_eq!(one.gather(32).unwrap(), two.gather(32).unwrap());
    }
}
