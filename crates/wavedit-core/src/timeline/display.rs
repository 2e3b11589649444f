//! Display downsampling
//!
//! Reduces a channel's samples to one (min, max) amplitude pair per screen
//! pixel column. Column boundaries land on the nearest sample index so that
//! adjacent columns are contiguous and non-overlapping even when the
//! samples-per-pixel ratio is fractional.
//!
//! The scan is a single monotonic forward pass over the chunk list; the
//! cursor is rebuilt from scratch only when a column does not start exactly
//! where the previous one ended (e.g. after leading out-of-range columns).

use super::{Channel, ChunkPos};
use crate::types::Sample;

impl Channel {
    /// Fill `mins`/`maxes` with one amplitude pair per pixel column
    ///
    /// Column `i` covers the half-open sample range
    /// `[start + round(i * samples_per_pixel), start + round((i + 1) * samples_per_pixel))`,
    /// truncated to the channel's valid range. Columns with no in-range
    /// samples yield `(0, 0)`.
    ///
    /// Pure and idempotent: repeated identical calls produce identical
    /// output. Out-of-range requests are clamped, never an error.
    pub fn calc_display_data(
        &self,
        start_sample_idx: i64,
        mins: &mut [Sample],
        maxes: &mut [Sample],
        samples_per_pixel: f64,
    ) {
        debug_assert_eq!(mins.len(), maxes.len());

        let len = self.len() as i64;
        let step = samples_per_pixel.max(0.0);

        // Cursor state: position plus the absolute sample index it sits at.
        let mut cursor: Option<(ChunkPos, i64)> = None;

        for col in 0..mins.len() {
            let col_start = start_sample_idx + (col as f64 * step).round() as i64;
            let col_end = start_sample_idx + ((col + 1) as f64 * step).round() as i64;

            let col_start = col_start.clamp(0, len);
            let col_end = col_end.clamp(0, len);
            let count = (col_end - col_start) as u64;
            if count == 0 {
                mins[col] = 0;
                maxes[col] = 0;
                continue;
            }

            let (mut pos, at) = match cursor {
                Some((pos, at)) if at == col_start => (pos, at),
                _ => (ChunkPos::from_sample_idx(self, col_start as u64), col_start),
            };
            debug_assert_eq!(at, col_start);

            let (min, max) = self.min_max_from(&mut pos, count);
            mins[col] = min;
            maxes[col] = max;
            cursor = Some((pos, col_end));
        }
    }

    /// Fold min/max over `count` samples starting at `pos`, advancing the
    /// cursor. The caller has already clamped the range to the channel.
    fn min_max_from(&self, pos: &mut ChunkPos, count: u64) -> (Sample, Sample) {
        let mut remaining = count;
        let mut min = Sample::MAX;
        let mut max = Sample::MIN;

        while remaining > 0 && pos.chunk_idx < self.num_chunks() {
            let chunk = self.chunk_samples(pos.chunk_idx);
            if pos.offset >= chunk.len() {
                if pos.chunk_idx + 1 >= self.num_chunks() {
                    break;
                }
                pos.chunk_idx += 1;
                pos.offset = 0;
                continue;
            }

            let take = (chunk.len() - pos.offset).min(remaining as usize);
            for &sample in &chunk[pos.offset..pos.offset + take] {
                min = min.min(sample);
                max = max.max(sample);
            }
            pos.offset += take;
            remaining -= take as u64;
        }

        if min > max {
            (0, 0)
        } else {
            (min, max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::CHUNK_CAPACITY;

    /// A channel whose sample value equals its index (small enough for i16)
    fn ramp_channel(len: usize) -> Channel {
        let samples: Vec<Sample> = (0..len).map(|i| i as Sample).collect();
        let mut channel = Channel::new();
        channel.append(&samples);
        channel
    }

    fn display(
        channel: &Channel,
        start: i64,
        width: usize,
        samples_per_pixel: f64,
    ) -> (Vec<Sample>, Vec<Sample>) {
        let mut mins = vec![0; width];
        let mut maxes = vec![0; width];
        channel.calc_display_data(start, &mut mins, &mut maxes, samples_per_pixel);
        (mins, maxes)
    }

    #[test]
    fn unit_zoom_is_identity() {
        let channel = ramp_channel(1000);
        let (mins, maxes) = display(&channel, 100, 50, 1.0);

        for col in 0..50 {
            assert_eq!(mins[col], (100 + col) as Sample);
            assert_eq!(maxes[col], (100 + col) as Sample);
        }
    }

    #[test]
    fn columns_partition_without_gaps_or_overlaps() {
        // With a strictly increasing ramp, column i's max is the last sample
        // it covers and column i+1's min is the first it covers; contiguous
        // coverage means they differ by exactly one.
        let channel = ramp_channel(30_000);
        for &step in &[1.0, 1.5, 3.7, 7.25, 16.0] {
            let (mins, maxes) = display(&channel, 500, 200, step);
            for col in 0..199 {
                assert_eq!(
                    maxes[col] + 1,
                    mins[col + 1],
                    "Adjacent columns must be contiguous at step {step}"
                );
            }
        }
    }

    #[test]
    fn fractional_step_matches_rounded_boundaries() {
        let channel = ramp_channel(30_000);
        let step = 2.6;
        let (mins, maxes) = display(&channel, 0, 100, step);

        for col in 0..100 {
            let expect_start = (col as f64 * step).round() as i64;
            let expect_end = ((col + 1) as f64 * step).round() as i64;
            assert_eq!(mins[col] as i64, expect_start);
            assert_eq!(maxes[col] as i64, expect_end - 1);
        }
    }

    #[test]
    fn idempotent_across_calls() {
        let channel = ramp_channel(20_000);
        let first = display(&channel, 1234, 300, 5.3);
        let second = display(&channel, 1234, 300, 5.3);
        assert_eq!(first, second, "Repeated identical calls must match");
    }

    #[test]
    fn request_past_end_is_all_zero() {
        let channel = ramp_channel(1000);
        let (mins, maxes) = display(&channel, 5000, 20, 4.0);
        assert!(mins.iter().all(|&v| v == 0));
        assert!(maxes.iter().all(|&v| v == 0));
    }

    #[test]
    fn tail_columns_truncate_to_channel_end() {
        let channel = ramp_channel(105);
        let (mins, maxes) = display(&channel, 0, 20, 10.0);

        // Columns 0-9 cover data, column 10 only half, the rest are empty.
        assert_eq!(maxes[9], 99);
        assert_eq!(mins[10], 100);
        assert_eq!(maxes[10], 104);
        for col in 11..20 {
            assert_eq!((mins[col], maxes[col]), (0, 0));
        }
    }

    #[test]
    fn negative_start_yields_leading_zero_columns() {
        let channel = ramp_channel(1000);
        let (mins, maxes) = display(&channel, -40, 20, 10.0);

        for col in 0..4 {
            assert_eq!((mins[col], maxes[col]), (0, 0), "Column {col} precedes sample 0");
        }
        assert_eq!(mins[4], 0);
        assert_eq!(maxes[4], 9);
    }

    #[test]
    fn scan_crosses_chunk_boundaries() {
        // Constant fill except one spike just past the first chunk boundary.
        let mut samples = vec![100 as Sample; CHUNK_CAPACITY + 4096];
        samples[CHUNK_CAPACITY + 7] = -3000;
        let mut channel = Channel::new();
        channel.append(&samples);

        let start = (CHUNK_CAPACITY - 512) as i64;
        let (mins, maxes) = display(&channel, start, 8, 256.0);

        assert_eq!(mins[2], -3000, "Spike sits in the third column");
        assert_eq!(maxes[2], 100);
        assert!(mins.iter().enumerate().all(|(i, &v)| i == 2 || v == 100));
    }

    #[test]
    fn min_and_max_capture_extremes_within_column() {
        let mut samples = vec![0 as Sample; 100];
        samples[13] = 900;
        samples[17] = -800;
        let mut channel = Channel::new();
        channel.append(&samples);

        let (mins, maxes) = display(&channel, 0, 10, 10.0);
        assert_eq!(mins[1], -800);
        assert_eq!(maxes[1], 900);
        assert_eq!((mins[0], maxes[0]), (0, 0));
    }
}
