use std::fmt;

/// Timed phase a sample is folded into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Reading and converting a bitmap into a surface.
    Decode,
    /// One compositing pass, from start to completion.
    Convert,
    /// Handing the output surface to the sink.
    Present,
}

impl Phase {
    /// Every phase in report order.
    pub const ALL: [Phase; 3] = [Phase::Decode, Phase::Convert, Phase::Present];

    fn label(self) -> &'static str {
        match self {
            Phase::Decode => "file read",
            Phase::Convert => "compositor",
            Phase::Present => "output",
        }
    }
}

/// Running sum, count, min and max of one phase, in microseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseStats {
    /// Sum of all samples.
    pub sum_us: u64,
    /// Number of samples.
    pub count: u64,
    /// `u64::MAX` until the first sample.
    pub min_us: u64,
    /// Largest sample, 0 until the first one.
    pub max_us: u64,
}

impl Default for PhaseStats {
    fn default() -> Self {
        Self {
            sum_us: 0,
            count: 0,
            min_us: u64::MAX,
            max_us: 0,
        }
    }
}

impl PhaseStats {
    fn record(&mut self, micros: u64) {
        self.sum_us = self.sum_us.saturating_add(micros);
        self.count += 1;
        self.min_us = self.min_us.min(micros);
        self.max_us = self.max_us.max(micros);
    }

    /// `None` when no samples were recorded.
    pub fn mean_us(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum_us as f64 / self.count as f64)
    }

    fn summary(&self) -> Option<PhaseSummary> {
        let mean = self.mean_us()?;
        Some(PhaseSummary {
            count: self.count,
            min_ms: self.min_us as f64 / 1000.0,
            max_ms: self.max_us as f64 / 1000.0,
            avg_ms: mean / 1000.0,
        })
    }
}

/// Per-phase timing accumulators owned by one engine.
#[derive(Clone, Debug, Default)]
pub struct StatsCollector {
    decode: PhaseStats,
    convert: PhaseStats,
    present: PhaseStats,
}

impl StatsCollector {
    /// Collector with no samples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one `micros` sample into `phase`.
    pub fn record(&mut self, phase: Phase, micros: u64) {
        self.phase_mut(phase).record(micros);
    }

    /// Forget every sample.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Raw accumulator of `phase`.
    pub fn phase(&self, phase: Phase) -> &PhaseStats {
        match phase {
            Phase::Decode => &self.decode,
            Phase::Convert => &self.convert,
            Phase::Present => &self.present,
        }
    }

    fn phase_mut(&mut self, phase: Phase) -> &mut PhaseStats {
        match phase {
            Phase::Decode => &mut self.decode,
            Phase::Convert => &mut self.convert,
            Phase::Present => &mut self.present,
        }
    }

    /// Millisecond summary of every phase; phases without samples are `None`.
    pub fn report(&self) -> StatsReport {
        StatsReport {
            decode: self.decode.summary(),
            convert: self.convert.summary(),
            present: self.present.summary(),
        }
    }
}

/// One phase of a [`StatsReport`], in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PhaseSummary {
    /// Number of samples.
    pub count: u64,
    /// Fastest sample.
    pub min_ms: f64,
    /// Slowest sample.
    pub max_ms: f64,
    /// Mean of all samples.
    pub avg_ms: f64,
}

/// Timing report; renders as a small table with `Display`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StatsReport {
    /// Bitmap reads.
    pub decode: Option<PhaseSummary>,
    /// Compositor passes.
    pub convert: Option<PhaseSummary>,
    /// Sink hand-offs.
    pub present: Option<PhaseSummary>,
}

impl StatsReport {
    /// Summary of `phase`, if it has samples.
    pub fn get(&self, phase: Phase) -> Option<&PhaseSummary> {
        match phase {
            Phase::Decode => self.decode.as_ref(),
            Phase::Convert => self.convert.as_ref(),
            Phase::Present => self.present.as_ref(),
        }
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "slideshow timing in milliseconds")?;
        writeln!(
            f,
            "{:<12} {:>8} {:>10} {:>10} {:>10}",
            "phase", "count", "min", "max", "avg"
        )?;
        for phase in Phase::ALL {
            let Some(s) = self.get(phase) else {
                continue;
            };
            writeln!(
                f,
                "{:<12} {:>8} {:>10.3} {:>10.3} {:>10.3}",
                phase.label(),
                s.count,
                s.min_ms,
                s.max_ms,
                s.avg_ms
            )?;
        }
        Ok(())
    }
}
