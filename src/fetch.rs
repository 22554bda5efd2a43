//! Retrieval and reset of the kernel GSO counters

use log::debug;
use crate::channel::{StatsChannel, GSO_SYSCTL_STATS};
use crate::error::{ChannelError, GsoError};
use crate::stats::GsoStats;


/// Reads a snapshot of `struct gsostat` from the kernel
pub fn fetch_stats(chan: &mut dyn StatsChannel) -> Result<GsoStats, GsoError> {
    let buf = chan.read(GSO_SYSCTL_STATS, GsoStats::SIZE)
        .map_err(GsoError::Fetch)?;
    debug!("read {} bytes from {}", buf.len(), GSO_SYSCTL_STATS);
    GsoStats::from_bytes(&buf).ok_or_else(|| {
        GsoError::Fetch(ChannelError::SizeMismatch {
            name: GSO_SYSCTL_STATS.to_string(),
            expected: GsoStats::SIZE,
            actual: buf.len(),
        })
    })
}

/// Clears the snapshot and pushes it to overwrite the kernel counters
pub fn reset_stats(chan: &mut dyn StatsChannel, mut stats: GsoStats) -> Result<(), GsoError> {
    stats.reset();
    let buf = stats.to_bytes();
    chan.write(GSO_SYSCTL_STATS, &buf).map_err(GsoError::Reset)?;
    debug!("wrote {} zeroed bytes to {}", buf.len(), GSO_SYSCTL_STATS);
    Ok(())
}

#[cfg(test)]
use crate::channel::fake::FakeChannel;
#[cfg(test)]
use crate::stats::sample_stats;

#[test]
fn test_fetch_stats() {
    let mut chan = FakeChannel::with_data(sample_stats().to_bytes());
    let stats = fetch_stats(&mut chan).unwrap();
    assert_eq!(stats, sample_stats());
    assert_eq!(chan.reads, 1);
}

#[test]
fn test_fetch_stats_errors() {
    let mut chan = FakeChannel::with_data(sample_stats().to_bytes());
    chan.fail_read = true;
    assert!(matches!(fetch_stats(&mut chan), Err(GsoError::Fetch(ChannelError::Io { .. }))));

    // kernel returns a shorter structure than expected
    let mut chan = FakeChannel::with_data(vec![0u8; GsoStats::SIZE / 2]);
    match fetch_stats(&mut chan) {
        Err(GsoError::Fetch(ChannelError::SizeMismatch { expected, actual, .. })) => {
            assert_eq!(expected, GsoStats::SIZE);
            assert_eq!(actual, GsoStats::SIZE / 2);
        },
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_reset_stats() {
    let mut chan = FakeChannel::with_data(sample_stats().to_bytes());
    reset_stats(&mut chan, sample_stats()).unwrap();
    assert_eq!(chan.writes.len(), 1);
    let (name, data) = &chan.writes[0];
    assert_eq!(name, GSO_SYSCTL_STATS);
    assert_eq!(data.len(), GsoStats::SIZE);
    assert!(data.iter().all(|b| *b == 0));
    assert_eq!(fetch_stats(&mut chan).unwrap(), GsoStats::default());

    let mut chan = FakeChannel::default();
    chan.fail_write = true;
    assert!(matches!(reset_stats(&mut chan, sample_stats()), Err(GsoError::Reset(_))));
    assert!(chan.writes.is_empty());
}
