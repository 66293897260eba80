//! Silence detection and segment splitting
//!
//! Splits a track into non-silent segments separated by silence lasting at
//! least the cutoff duration, keeping some of the original silence as padding
//! around each segment.
//!
//! Detection works at millisecond resolution. A window of `silence_cutoff_ms`
//! is placed at every millisecond offset; windows whose RMS is at or below the
//! threshold are silent. Overlapping silent windows merge into silent runs.
//! Window RMS comes from prefix sums of per-millisecond energy, so the scan
//! is linear in track length regardless of cutoff.

use sc_common::decibels::db_to_linear;
use std::iter::Peekable;
use std::ops::Range;

use crate::models::{Segment, SilenceParameters, Track};

/// Silence run in milliseconds (start inclusive, end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SilentRun {
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Splits tracks on silence
#[derive(Debug, Clone, Copy)]
pub struct SilenceTrimmer {
    params: SilenceParameters,
}

impl SilenceTrimmer {
    pub fn new(params: SilenceParameters) -> Self {
        Self { params }
    }

    /// Lazily split the track into padded non-silent segments
    ///
    /// A silence-free track yields one segment spanning the whole track. A
    /// track entirely at or below the threshold yields none.
    pub fn trim(&self, track: &Track) -> Segments {
        Segments {
            spans: NonSilentSpans::new(self.detect_silence(track)).peekable(),
            keep_ms: self.params.keep_silence_ms as i64,
            len_ms: track.duration_ms() as i64,
            carried_start: None,
        }
    }

    /// Lazily detect silent runs in the track
    pub fn detect_silence(&self, track: &Track) -> SilentRuns {
        SilentRuns::new(track, &self.params)
    }
}

/// Cumulative per-millisecond energy of a track
struct EnergyProfile {
    /// `sum_squares[i]` = sum of squared samples in [0ms, i ms)
    sum_squares: Vec<f64>,
    /// `counts[i]` = number of samples in [0ms, i ms)
    counts: Vec<u64>,
}

impl EnergyProfile {
    fn new(track: &Track) -> Self {
        let len_ms = track.duration_ms();
        let mut sum_squares = Vec::with_capacity(len_ms as usize + 1);
        let mut counts = Vec::with_capacity(len_ms as usize + 1);
        sum_squares.push(0.0);
        counts.push(0);

        let mut total = 0.0;
        let mut count = 0u64;
        for ms in 0..len_ms {
            let block = track.window(ms, ms + 1);
            total += block.iter().map(|&s| f64::from(s) * f64::from(s)).sum::<f64>();
            count += block.len() as u64;
            sum_squares.push(total);
            counts.push(count);
        }

        Self { sum_squares, counts }
    }

    /// RMS over [start_ms, end_ms)
    fn rms(&self, start_ms: u64, end_ms: u64) -> f64 {
        let (start, end) = (start_ms as usize, end_ms as usize);
        let count = self.counts[end] - self.counts[start];
        if count == 0 {
            return 0.0;
        }
        let energy = (self.sum_squares[end] - self.sum_squares[start]).max(0.0);
        (energy / count as f64).sqrt()
    }
}

/// Lazy iterator over silent runs, in time order
pub struct SilentRuns {
    profile: EnergyProfile,
    threshold: f64,
    cutoff_ms: u64,
    len_ms: u64,
    /// Next window start to examine
    next_window: u64,
    /// Last valid window start (`None` when the track is shorter than the cutoff)
    last_window: Option<u64>,
    short_track_checked: bool,
}

impl SilentRuns {
    fn new(track: &Track, params: &SilenceParameters) -> Self {
        let len_ms = track.duration_ms();
        let cutoff_ms = params.silence_cutoff_ms.max(1);

        Self {
            profile: EnergyProfile::new(track),
            threshold: db_to_linear(params.threshold_db),
            cutoff_ms,
            len_ms,
            next_window: 0,
            last_window: len_ms.checked_sub(cutoff_ms),
            short_track_checked: false,
        }
    }

    fn is_silent(&self, start_ms: u64, end_ms: u64) -> bool {
        self.profile.rms(start_ms, end_ms) <= self.threshold
    }
}

impl Iterator for SilentRuns {
    type Item = SilentRun;

    fn next(&mut self) -> Option<SilentRun> {
        let Some(last_window) = self.last_window else {
            // Shorter than the cutoff: the whole track is one window
            if self.short_track_checked || self.len_ms == 0 {
                return None;
            }
            self.short_track_checked = true;
            return self.is_silent(0, self.len_ms).then_some(SilentRun {
                start_ms: 0,
                end_ms: self.len_ms,
            });
        };

        // (first silent window start, latest silent window start)
        let mut run: Option<(u64, u64)> = None;

        while self.next_window <= last_window {
            let window = self.next_window;

            if let Some((first, latest)) = run {
                // No later window can overlap this run any more
                if window > latest + self.cutoff_ms {
                    return Some(SilentRun {
                        start_ms: first,
                        end_ms: latest + self.cutoff_ms,
                    });
                }
            }

            self.next_window += 1;
            if self.is_silent(window, window + self.cutoff_ms) {
                run = Some(match run {
                    Some((first, _)) => (first, window),
                    None => (window, window),
                });
            }
        }

        run.map(|(first, latest)| SilentRun {
            start_ms: first,
            end_ms: latest + self.cutoff_ms,
        })
    }
}

/// Lazy iterator over the non-silent gaps between silent runs
pub struct NonSilentSpans {
    runs: SilentRuns,
    len_ms: u64,
    prev_end: u64,
    finished: bool,
}

impl NonSilentSpans {
    fn new(runs: SilentRuns) -> Self {
        let len_ms = runs.len_ms;
        Self {
            runs,
            len_ms,
            prev_end: 0,
            finished: false,
        }
    }
}

impl Iterator for NonSilentSpans {
    type Item = Range<u64>;

    fn next(&mut self) -> Option<Range<u64>> {
        while !self.finished {
            match self.runs.next() {
                Some(run) => {
                    let span = self.prev_end..run.start_ms;
                    self.prev_end = run.end_ms;
                    if !span.is_empty() {
                        return Some(span);
                    }
                }
                None => {
                    self.finished = true;
                    if self.prev_end < self.len_ms {
                        return Some(self.prev_end..self.len_ms);
                    }
                }
            }
        }
        None
    }
}

/// Lazy, single-pass sequence of padded segments in time order
///
/// Each non-silent span is widened by the keep-silence amount on both sides.
/// When two widened neighbours would overlap they meet at the midpoint of the
/// overlap instead, so no audio appears in two segments.
pub struct Segments {
    spans: Peekable<NonSilentSpans>,
    keep_ms: i64,
    len_ms: i64,
    /// Start of the next segment when pulled back to a shared midpoint
    carried_start: Option<i64>,
}

impl Iterator for Segments {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let span = self.spans.next()?;

        let start = self
            .carried_start
            .take()
            .unwrap_or(span.start as i64 - self.keep_ms);
        let mut end = span.end as i64 + self.keep_ms;

        if let Some(next) = self.spans.peek() {
            let next_start = next.start as i64 - self.keep_ms;
            if next_start < end {
                let midpoint = (end + next_start).div_euclid(2);
                end = midpoint;
                self.carried_start = Some(midpoint);
            }
        }

        Some(Segment::new(
            start.clamp(0, self.len_ms) as u64,
            end.clamp(0, self.len_ms) as u64,
        ))
    }
}
