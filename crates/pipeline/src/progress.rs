//! Progress reporting for chunked runs.
//!
//! The number of chunks in a file is not known up front, so the driver is
//! handed an *expected* total and reports progress in tenths of it. The bar
//! may under- or over-fill when the estimate is off; that is cosmetic only.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;

/// Decides when a tick is due.
///
/// The watermark starts at 0.1 and advances by 0.1 per tick. After each
/// chunk, one tick is emitted for every watermark that
/// `processed / expected` has passed. Kept in integer tenths, so an exact
/// estimate yields exactly 9 ticks.
#[derive(Debug, Clone)]
pub struct ProgressWatermark {
    expected: usize,
    processed: usize,
    ticks: usize,
}

impl ProgressWatermark {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            processed: 0,
            ticks: 0,
        }
    }

    /// Count one processed chunk and return how many ticks are now due
    pub fn record_chunk(&mut self) -> usize {
        self.processed += 1;
        if self.expected == 0 {
            return 0;
        }
        let mut due = 0;
        while self.processed * 10 > self.expected * (self.ticks + 1) {
            self.ticks += 1;
            due += 1;
        }
        due
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn expected(&self) -> usize {
        self.expected
    }
}

/// Where progress ticks go. Purely observational: a sink never fails a run.
pub trait StatusSink {
    /// A new run starts
    fn begin(&mut self, label: &str, expected_chunks: usize);

    /// One tenth of the expected chunks has been processed
    fn tick(&mut self);

    /// The run is over (successfully or not)
    fn finish(&mut self);
}

/// Discards all progress
#[derive(Debug, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn begin(&mut self, _label: &str, _expected_chunks: usize) {}
    fn tick(&mut self) {}
    fn finish(&mut self) {}
}

/// A ten-cell box-drawing bar written to any `Write`:
///
/// ```text
/// Preprocessing ratings
/// ┌──────────┐
/// └─────────┘
/// ```
pub struct BoxBar<W: Write> {
    out: W,
}

impl<W: Write> BoxBar<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StatusSink for BoxBar<W> {
    fn begin(&mut self, label: &str, _expected_chunks: usize) {
        let _ = write!(self.out, "Preprocessing {}\n┌──────────┐\n└", label);
        let _ = self.out.flush();
    }

    fn tick(&mut self) {
        let _ = write!(self.out, "─");
        let _ = self.out.flush();
    }

    fn finish(&mut self) {
        let _ = writeln!(self.out, "┘");
        let _ = self.out.flush();
    }
}

/// Terminal progress bar backed by `indicatif`, ten steps per run
pub struct IndicatifBar {
    visible: bool,
    bar: Option<ProgressBar>,
}

impl IndicatifBar {
    pub fn new(visible: bool) -> Self {
        Self { visible, bar: None }
    }
}

impl StatusSink for IndicatifBar {
    fn begin(&mut self, label: &str, _expected_chunks: usize) {
        let bar = if self.visible {
            ProgressBar::new(10)
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::with_template("{msg:>10} [{bar:10.cyan/blue}] {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("─┤ ");
        bar.set_style(style);
        bar.set_message(label.to_string());
        self.bar = Some(bar);
    }

    fn tick(&mut self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}
