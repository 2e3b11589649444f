//! Chunked sample timeline
//!
//! A `Timeline` holds one `Channel` per audio channel. Each channel stores
//! its samples in fixed-capacity chunks so that a loader can append audio
//! between frames without reallocating the whole buffer. The view reads the
//! timeline through the display downsampler (`display.rs`) and never
//! mutates it.

mod display;

use thiserror::Error;

use crate::types::Sample;

/// Samples per storage chunk
///
/// Every chunk except the last is always completely filled; appends go into
/// the final chunk until it fills, then a new chunk is allocated.
pub const CHUNK_CAPACITY: usize = 131_072;

// =============================================================================
// Errors
// =============================================================================

/// Errors from timeline construction and loading
#[derive(Error, Debug)]
pub enum TimelineError {
    /// A timeline must carry at least one channel
    #[error("Timeline must have at least one channel")]
    NoChannels,

    /// Append targeted a channel index the timeline doesn't have
    #[error("Unknown channel {index} (timeline has {channels})")]
    UnknownChannel { index: usize, channels: usize },
}

/// Result type for timeline operations
pub type TimelineResult<T> = Result<T, TimelineError>;

// =============================================================================
// Chunk storage
// =============================================================================

/// One fixed-capacity run of contiguous samples
#[derive(Debug, Clone)]
struct SampleChunk {
    samples: Vec<Sample>,
}

impl SampleChunk {
    fn new() -> Self {
        Self {
            samples: Vec::with_capacity(CHUNK_CAPACITY),
        }
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn remaining(&self) -> usize {
        CHUNK_CAPACITY - self.samples.len()
    }
}

/// Positional cursor into a channel's chunk list
///
/// Re-derivable from a raw sample index in O(chunks); incremental advance is
/// amortized O(1). Advance-only: a backward or random seek must rebuild the
/// cursor from scratch via [`ChunkPos::from_sample_idx`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChunkPos {
    pub(crate) chunk_idx: usize,
    pub(crate) offset: usize,
}

impl ChunkPos {
    /// Derive a cursor for an absolute sample index (clamped to channel end)
    pub(crate) fn from_sample_idx(channel: &Channel, sample_idx: u64) -> Self {
        let mut remaining = sample_idx;
        for (chunk_idx, chunk) in channel.chunks.iter().enumerate() {
            if remaining < chunk.len() as u64 {
                return Self {
                    chunk_idx,
                    offset: remaining as usize,
                };
            }
            remaining -= chunk.len() as u64;
        }

        // Past the end: park on the one-past-the-end position of the last chunk
        let chunk_idx = channel.chunks.len().saturating_sub(1);
        let offset = channel.chunks.last().map_or(0, SampleChunk::len);
        Self { chunk_idx, offset }
    }
}

// =============================================================================
// Channel
// =============================================================================

/// A single audio channel: an append-only list of sample chunks
#[derive(Debug, Clone)]
pub struct Channel {
    chunks: Vec<SampleChunk>,
    len: u64,
}

impl Channel {
    /// Create an empty channel
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            len: 0,
        }
    }

    /// Total number of samples in this channel
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the channel holds no samples yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append samples, filling the last chunk before allocating new ones
    pub fn append(&mut self, mut samples: &[Sample]) {
        while !samples.is_empty() {
            let needs_chunk = self
                .chunks
                .last()
                .map_or(true, |chunk| chunk.remaining() == 0);
            if needs_chunk {
                self.chunks.push(SampleChunk::new());
                log::debug!(
                    "Channel grew to {} chunks ({} samples)",
                    self.chunks.len(),
                    self.len
                );
            }

            let chunk = self.chunks.last_mut().unwrap();
            let take = samples.len().min(chunk.remaining());
            chunk.samples.extend_from_slice(&samples[..take]);
            samples = &samples[take..];
            self.len += take as u64;
        }
    }

    pub(crate) fn chunk_samples(&self, chunk_idx: usize) -> &[Sample] {
        &self.chunks[chunk_idx].samples
    }

    pub(crate) fn num_chunks(&self) -> usize {
        self.chunks.len()
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Timeline
// =============================================================================

/// A loaded sound: per-channel sample storage plus the authoritative
/// playback index supplied by an external playback engine
///
/// The timeline is read-only from the view's perspective. A loader may
/// append to it between frames; the caller guarantees it is stable for the
/// duration of one advance/render pair.
#[derive(Debug, Clone)]
pub struct Timeline {
    channels: Vec<Channel>,
    playback_idx: f64,
}

impl Timeline {
    /// Create an empty timeline with the given channel count
    pub fn new(num_channels: usize) -> TimelineResult<Self> {
        if num_channels == 0 {
            return Err(TimelineError::NoChannels);
        }
        Ok(Self {
            channels: vec![Channel::new(); num_channels],
            playback_idx: -1.0,
        })
    }

    /// Convenience constructor: a mono timeline from a sample slice
    pub fn from_mono(samples: &[Sample]) -> Self {
        let mut channel = Channel::new();
        channel.append(samples);
        Self {
            channels: vec![channel],
            playback_idx: -1.0,
        }
    }

    /// Number of channels
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// All channels, in order
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Timeline length in samples (all channels share one length; the
    /// first channel is authoritative)
    pub fn len(&self) -> u64 {
        self.channels.first().map_or(0, Channel::len)
    }

    /// Whether the timeline holds no samples yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append samples to one channel (loader API, between frames only)
    pub fn append(&mut self, channel: usize, samples: &[Sample]) -> TimelineResult<()> {
        let channels = self.channels.len();
        let chan = self
            .channels
            .get_mut(channel)
            .ok_or(TimelineError::UnknownChannel {
                index: channel,
                channels,
            })?;
        chan.append(samples);
        Ok(())
    }

    /// Authoritative playback sample index, negative when not playing
    pub fn playback_idx(&self) -> f64 {
        self.playback_idx
    }

    /// Update the authoritative playback index (playback engine API)
    pub fn set_playback_idx(&mut self, idx: f64) {
        self.playback_idx = idx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_spans_chunk_boundary() {
        let mut channel = Channel::new();
        let samples = vec![7i16; CHUNK_CAPACITY + 100];
        channel.append(&samples);

        assert_eq!(channel.len(), (CHUNK_CAPACITY + 100) as u64);
        assert_eq!(channel.num_chunks(), 2, "Second chunk holds the overflow");
        assert_eq!(channel.chunk_samples(0).len(), CHUNK_CAPACITY);
        assert_eq!(channel.chunk_samples(1).len(), 100);
    }

    #[test]
    fn append_fills_partial_chunk_first() {
        let mut channel = Channel::new();
        channel.append(&[1i16; 1000]);
        channel.append(&[2i16; 500]);

        assert_eq!(channel.num_chunks(), 1);
        assert_eq!(channel.len(), 1500);
        assert_eq!(channel.chunk_samples(0)[999], 1);
        assert_eq!(channel.chunk_samples(0)[1000], 2);
    }

    #[test]
    fn chunk_pos_derivation() {
        let mut channel = Channel::new();
        channel.append(&[0i16; CHUNK_CAPACITY * 2 + 10]);

        let pos = ChunkPos::from_sample_idx(&channel, 5);
        assert_eq!(pos, ChunkPos { chunk_idx: 0, offset: 5 });

        let pos = ChunkPos::from_sample_idx(&channel, CHUNK_CAPACITY as u64);
        assert_eq!(pos, ChunkPos { chunk_idx: 1, offset: 0 });

        let pos = ChunkPos::from_sample_idx(&channel, (CHUNK_CAPACITY * 2 + 3) as u64);
        assert_eq!(pos, ChunkPos { chunk_idx: 2, offset: 3 });

        // Past the end parks at one-past-the-end of the last chunk
        let pos = ChunkPos::from_sample_idx(&channel, u64::MAX);
        assert_eq!(pos, ChunkPos { chunk_idx: 2, offset: 10 });
    }

    #[test]
    fn timeline_requires_channels() {
        assert!(matches!(Timeline::new(0), Err(TimelineError::NoChannels)));
        assert!(Timeline::new(2).is_ok());
    }

    #[test]
    fn timeline_append_rejects_unknown_channel() {
        let mut timeline = Timeline::new(1).unwrap();
        let err = timeline.append(3, &[0i16; 4]).unwrap_err();
        assert!(matches!(
            err,
            TimelineError::UnknownChannel { index: 3, channels: 1 }
        ));
    }

    #[test]
    fn timeline_length_follows_first_channel() {
        let mut timeline = Timeline::new(2).unwrap();
        timeline.append(0, &[0i16; 300]).unwrap();
        timeline.append(1, &[0i16; 300]).unwrap();
        assert_eq!(timeline.len(), 300);
        assert_eq!(timeline.num_channels(), 2);
    }
}
