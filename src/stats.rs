//! In-memory model of the kernel's `struct gsostat` counter block
//!
//! The kernel exposes three `struct gsostat_proto` blocks back to back,
//! each made of seven native-endian `unsigned long` words. The snapshot is
//! decoded from, and encoded to, exactly that layout.

use std::convert::TryInto;
use std::mem::size_of;
use libc::c_ulong;
use crate::utils::{self, Ratio};

const WORD: usize = size_of::<c_ulong>();
const PROTO_WORDS: usize = 7;
const PROTO_SIZE: usize = PROTO_WORDS * WORD;

/// Counters for one traffic class
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GsoProtoStats {
    /// Input packets that were segmented (or fragmented)
    pub segmented: u64,
    /// Output segments (or fragments) created
    pub output_segments: u64,
    pub max_segmented: u64,
    /// Only meaningful when `segmented > 0`
    pub min_segmented: u64,
    pub total_bytes_segmented: u64,
    pub max_mss: u64,
    /// Only meaningful when `segmented > 0`
    pub min_mss: u64,
}

impl GsoProtoStats {
    pub fn has_samples(&self) -> bool {
        self.segmented > 0
    }

    pub fn mean_segments_per_packet(&self) -> Option<Ratio> {
        utils::mean(self.output_segments, self.segmented)
    }

    pub fn mean_packet_size(&self) -> Option<Ratio> {
        utils::mean(self.total_bytes_segmented, self.segmented)
    }

    pub fn mean_segment_size(&self) -> Option<Ratio> {
        utils::mean(self.total_bytes_segmented, self.output_segments)
    }

    fn words(&self) -> [u64; PROTO_WORDS] {
        [
            self.segmented,
            self.output_segments,
            self.max_segmented,
            self.min_segmented,
            self.total_bytes_segmented,
            self.max_mss,
            self.min_mss,
        ]
    }

    fn from_words(w: [u64; PROTO_WORDS]) -> Self {
        GsoProtoStats {
            segmented: w[0],
            output_segments: w[1],
            max_segmented: w[2],
            min_segmented: w[3],
            total_bytes_segmented: w[4],
            max_mss: w[5],
            min_mss: w[6],
        }
    }

    fn decode(buf: &[u8]) -> Self {
        let mut w = [0u64; PROTO_WORDS];
        for (slot, chunk) in w.iter_mut().zip(buf.chunks_exact(WORD)) {
            // chunks_exact guarantees WORD bytes
            *slot = c_ulong::from_ne_bytes(chunk.try_into().unwrap_or_default()) as u64;
        }
        GsoProtoStats::from_words(w)
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        for w in self.words().iter() {
            out.extend_from_slice(&(*w as c_ulong).to_ne_bytes());
        }
    }
}

/// Point-in-time copy of all GSO counters
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GsoStats {
    pub tcp: GsoProtoStats,
    pub ipv4_frag: GsoProtoStats,
    pub ipv6_frag: GsoProtoStats,
}

impl GsoStats {
    /// Byte length of `struct gsostat` on this target
    pub const SIZE: usize = 3 * PROTO_SIZE;

    /// Decodes a kernel buffer, or returns `None` if its length is wrong
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() != Self::SIZE {
            return None;
        }
        let mut protos = buf.chunks_exact(PROTO_SIZE).map(GsoProtoStats::decode);
        Some(GsoStats {
            tcp: protos.next()?,
            ipv4_frag: protos.next()?,
            ipv6_frag: protos.next()?,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIZE);
        self.tcp.encode_into(&mut out);
        self.ipv4_frag.encode_into(&mut out);
        self.ipv6_frag.encode_into(&mut out);
        out
    }

    /// Clears every counter
    pub fn reset(&mut self) {
        *self = GsoStats::default();
    }
}

#[cfg(test)]
pub fn sample_stats() -> GsoStats {
    GsoStats {
        tcp: GsoProtoStats {
            segmented: 10,
            output_segments: 25,
            max_segmented: 2896,
            min_segmented: 1448,
            total_bytes_segmented: 15000,
            max_mss: 1448,
            min_mss: 536,
        },
        ipv4_frag: GsoProtoStats {
            segmented: 3,
            output_segments: 7,
            max_segmented: 4000,
            min_segmented: 1600,
            total_bytes_segmented: 8000,
            max_mss: 1480,
            min_mss: 1480,
        },
        ipv6_frag: GsoProtoStats::default(),
    }
}

#[test]
fn test_proto_means() {
    let p = sample_stats().tcp;
    assert_eq!(p.mean_segments_per_packet().map(|r| r.to_f64()), Some(2.5));
    assert_eq!(p.mean_packet_size().map(|r| r.to_f64()), Some(1500.0));
    assert_eq!(p.mean_segment_size().map(|r| r.to_f64()), Some(600.0));
    let empty = GsoProtoStats::default();
    assert!(!empty.has_samples());
    assert_eq!(empty.mean_segments_per_packet(), None);
    assert_eq!(empty.mean_packet_size(), None);
    assert_eq!(empty.mean_segment_size(), None);
    // segment size divides by output segments, not by input packets
    let unsplit = GsoProtoStats { segmented: 4, total_bytes_segmented: 4000, ..Default::default() };
    assert_eq!(unsplit.mean_segments_per_packet().map(|r| r.to_f64()), Some(0.0));
    assert_eq!(unsplit.mean_packet_size().map(|r| r.to_f64()), Some(1000.0));
    assert_eq!(unsplit.mean_segment_size(), None);
}

#[test]
fn test_layout() {
    assert_eq!(GsoStats::SIZE, 21 * size_of::<c_ulong>());
    let stats = sample_stats();
    let bytes = stats.to_bytes();
    assert_eq!(bytes.len(), GsoStats::SIZE);
    // first word is tcp.segmented, native endian
    assert_eq!(&bytes[..WORD], &(10 as c_ulong).to_ne_bytes()[..]);
    // ipv4_frag block starts after the seven tcp words
    assert_eq!(&bytes[PROTO_SIZE..PROTO_SIZE + WORD], &(3 as c_ulong).to_ne_bytes()[..]);
    assert_eq!(GsoStats::from_bytes(&bytes), Some(stats));
}

#[test]
fn test_from_bytes_size_mismatch() {
    assert_eq!(GsoStats::from_bytes(&[]), None);
    assert_eq!(GsoStats::from_bytes(&vec![0u8; GsoStats::SIZE - 1]), None);
    assert_eq!(GsoStats::from_bytes(&vec![0u8; GsoStats::SIZE + WORD]), None);
    assert_eq!(GsoStats::from_bytes(&vec![0u8; GsoStats::SIZE]), Some(GsoStats::default()));
}

#[test]
fn test_reset() {
    let mut stats = sample_stats();
    stats.reset();
    assert_eq!(stats, GsoStats::default());
    assert!(stats.to_bytes().iter().all(|b| *b == 0));
}
