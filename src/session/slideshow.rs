use crate::{
    assets::{bmp::load_qvga_bmp, source::SlideSource},
    effects::transitions::{
        KenBurns, STRETCH_STEPS, Transition, WipeDir, burns_frame, dissolve_level, edge_positions,
        push_frame, stretch_frame, wipe_frame,
    },
    encode::sink::FrameSink,
    foundation::{
        clock::{Clock, MonotonicClock},
        core::{Corner, CornerRect, Flip},
        error::{SlideError, SlideResult},
    },
    render::{
        pacer::FramePacer,
        passes::{CacheBarrier, Compositor},
        surface::{Surface, SurfaceRole, SurfaceSet},
    },
    session::{
        config::SlideshowConfig,
        stats::{Phase, StatsCollector, StatsReport},
    },
};

/// Transition engine: drives a [`Compositor`] through the parameter states of each effect and
/// hands every composited frame to a [`FrameSink`].
///
/// The processing surface always holds the last fully displayed image between transitions.
/// Incoming images are loaded into the alpha surface (or straight into the processing surface
/// for effects that only move one image) and copied over once the effect completes. A failed
/// load aborts the transition before any frame is produced and leaves the displayed image as
/// it was.
///
/// Every wait is a spin on the injected [`Clock`]; there is no sleeping and no cancellation.
pub struct Slideshow<'s, C: Compositor, O: FrameSink> {
    surfaces: SurfaceSet<'s>,
    compositor: C,
    sink: O,
    source: Option<Box<dyn SlideSource + 's>>,
    clock: Box<dyn Clock + 's>,
    config: SlideshowConfig,
    stats: StatsCollector,
}

impl<'s, C: Compositor, O: FrameSink> Slideshow<'s, C, O> {
    /// Engine over `surfaces` with the default config, a wall clock and no slide source.
    pub fn new(surfaces: SurfaceSet<'s>, compositor: C, sink: O) -> Self {
        Self {
            surfaces,
            compositor,
            sink,
            source: None,
            clock: Box::new(MonotonicClock::new()),
            config: SlideshowConfig::default(),
            stats: StatsCollector::new(),
        }
    }

    /// Where slides are opened by name. Without a source every load fails with an I/O error.
    pub fn with_source(mut self, source: impl SlideSource + 's) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Replace the time source used for pacing, timeouts and statistics.
    pub fn with_clock(mut self, clock: impl Clock + 's) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Validate and install `config`.
    pub fn with_config(mut self, config: SlideshowConfig) -> SlideResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Active config.
    pub fn config(&self) -> &SlideshowConfig {
        &self.config
    }

    /// Output flip for subsequent passes. Ken-Burns mirrors its window when `vertical` is set.
    pub fn set_flip(&mut self, flip: Flip) {
        self.config.flip = flip;
    }

    /// Raw timing accumulators.
    pub fn stats(&self) -> &StatsCollector {
        &self.stats
    }

    /// Forget all timing samples.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Millisecond summary of the timing samples.
    pub fn stats_report(&self) -> StatsReport {
        self.stats.report()
    }

    /// The three surfaces, read-only.
    pub fn surfaces(&self) -> &SurfaceSet<'s> {
        &self.surfaces
    }

    /// Software access to the processing surface, e.g. to draw a label before
    /// [`Slideshow::show_current`]. Writes mark the surface for cache reconciliation.
    pub fn processing_mut(&mut self) -> &mut Surface<'s> {
        &mut self.surfaces.processing
    }

    /// The compositing engine.
    pub fn compositor(&self) -> &C {
        &self.compositor
    }

    /// The frame sink.
    pub fn sink(&self) -> &O {
        &self.sink
    }

    /// The frame sink, mutably.
    pub fn sink_mut(&mut self) -> &mut O {
        &mut self.sink
    }

    /// Tear down the engine, returning the sink and releasing the surfaces.
    pub fn into_sink(self) -> O {
        self.sink
    }

    /// Run one parsed transition.
    pub fn run(&mut self, transition: &Transition) -> SlideResult<()> {
        let res = match transition {
            Transition::Display { file } => self.display(file),
            Transition::Show => self.show_current(),
            Transition::Dissolve { file } => self.dissolve_in(file),
            Transition::FadeIn { file } => self.fade_in(file),
            Transition::FadeOut => self.fade_out(),
            Transition::Stretch { file } => self.stretch_in(file),
            Transition::Wipe { file, dir } => self.wipe_in(file, *dir),
            Transition::Push { file, dir } => self.push_in(file, *dir),
            Transition::KenBurns { file, path } => self.ken_burns(file, path),
        };
        if let Err(e) = &res {
            tracing::debug!(transition = transition.name(), error = %e, "transition skipped");
        }
        res
    }

    /// Load `file` into the processing surface and present it once.
    #[tracing::instrument(skip(self))]
    pub fn display(&mut self, file: &str) -> SlideResult<()> {
        self.load(SurfaceRole::Processing, file)?;
        self.set_full_frame();
        self.compositor.set_alpha(0);
        self.step(0)
    }

    /// Present whatever the processing surface holds.
    #[tracing::instrument(skip(self))]
    pub fn show_current(&mut self) -> SlideResult<()> {
        self.set_full_frame();
        self.compositor.set_alpha(0);
        self.step(0)
    }

    /// Cross-dissolve from the current image to `file`.
    #[tracing::instrument(skip(self))]
    pub fn dissolve_in(&mut self, file: &str) -> SlideResult<()> {
        self.set_full_frame();
        self.load(SurfaceRole::Alpha, file)?;
        self.dissolve()
    }

    /// Dissolve from black to `file`.
    #[tracing::instrument(skip(self))]
    pub fn fade_in(&mut self, file: &str) -> SlideResult<()> {
        self.set_full_frame();
        self.load(SurfaceRole::Alpha, file)?;
        self.surfaces.processing.fill(0);
        self.dissolve()
    }

    /// Dissolve the current image to black.
    #[tracing::instrument(skip(self))]
    pub fn fade_out(&mut self) -> SlideResult<()> {
        self.set_full_frame();
        self.surfaces.alpha.fill(0);
        self.dissolve()
    }

    /// Pan and zoom over `file` along `path`. Frames are `ken_burns_step_ms` apart, both in
    /// path time and in pacing; `step_interval_us` does not apply.
    #[tracing::instrument(skip(self))]
    pub fn ken_burns(&mut self, file: &str, path: &KenBurns) -> SlideResult<()> {
        let out = self.surfaces.output.desc();
        let ps = self.surfaces.processing.desc();
        let out_lrc = Corner::new(out.width - 1, out.height - 1);
        path.validate(out_lrc, ps.width, ps.height)?;
        self.load(SurfaceRole::Processing, file)?;

        self.set_full_frame();
        self.compositor.set_alpha(0);
        let steps = path.steps(self.config.ken_burns_step_ms, self.config.ken_burns_default_ms);
        let pace = u64::from(self.config.ken_burns_step_ms) * 1000;
        let vflip = self.config.flip.vertical;
        tracing::debug!(steps, "ken-burns");
        for i in 0..=steps {
            let frame = burns_frame(path.window_at(i, steps), out_lrc, ps.height, vflip);
            self.compositor.set_ps_origin(frame.origin);
            self.compositor.set_scale(frame.scale);
            self.step(pace)?;
        }
        Ok(())
    }

    /// Zoom `file` in from the centre of the frame.
    #[tracing::instrument(skip(self))]
    pub fn stretch_in(&mut self, file: &str) -> SlideResult<()> {
        self.load(SurfaceRole::Processing, file)?;
        self.set_full_frame();
        self.compositor.set_alpha(0);
        let out = self.surfaces.output.desc();
        let pace = self.config.step_interval_us;
        for step in 1..=STRETCH_STEPS {
            let (rect, scale) = stretch_frame(step, out.width, out.height);
            self.compositor.set_ps_rect(rect);
            self.compositor.set_scale(scale);
            self.step(pace)?;
        }
        self.set_full_frame();
        self.step(0)
    }

    /// Sweep `file` over the unmoving current image.
    #[tracing::instrument(skip(self))]
    pub fn wipe_in(&mut self, file: &str, dir: WipeDir) -> SlideResult<()> {
        self.set_full_frame();
        self.load(SurfaceRole::Alpha, file)?;
        self.compositor.set_alpha(255);
        let out = self.surfaces.output.desc();
        let pace = self.config.step_interval_us;
        for pos in edge_positions(dir, out.width, out.height, self.config.edge_step_px) {
            let frame = wipe_frame(dir, pos, out.width, out.height);
            self.compositor.set_as_rect(frame.as_rect);
            self.compositor.set_as_origin(frame.as_origin);
            self.step(pace)?;
        }
        self.finalize()
    }

    /// Slide `file` in while the current image slides out the opposite edge.
    #[tracing::instrument(skip(self))]
    pub fn push_in(&mut self, file: &str, dir: WipeDir) -> SlideResult<()> {
        self.set_full_frame();
        self.load(SurfaceRole::Alpha, file)?;
        self.compositor.set_alpha(255);
        let out = self.surfaces.output.desc();
        let pace = self.config.push_interval_us;
        for pos in edge_positions(dir, out.width, out.height, self.config.edge_step_px) {
            let frame = push_frame(dir, pos, out.width, out.height);
            self.compositor.set_ps_rect(frame.ps_rect);
            self.compositor.set_ps_origin(frame.ps_origin);
            self.compositor.set_as_rect(frame.as_rect);
            self.compositor.set_as_origin(frame.as_origin);
            self.step(pace)?;
        }
        self.finalize()
    }

    fn dissolve(&mut self) -> SlideResult<()> {
        let pace = self.config.step_interval_us;
        for i in 0..self.config.dissolve_steps {
            let level = dissolve_level(i, self.config.dissolve_increment);
            self.compositor.set_alpha(level);
            self.step(pace)?;
        }
        self.finalize()
    }

    /// Full-alpha frame after copying the incoming image into the processing surface.
    fn finalize(&mut self) -> SlideResult<()> {
        self.set_full_frame();
        self.compositor.set_alpha(255);
        self.surfaces.copy_alpha_to_processing();
        self.step(0)
    }

    /// Full-frame geometry for all three surfaces at unit scale, no blend.
    fn set_full_frame(&mut self) {
        let out = self.surfaces.output.desc();
        let full = CornerRect::full(out.width, out.height);
        let c = &mut self.compositor;
        c.set_ps(self.surfaces.processing.desc());
        c.set_as(self.surfaces.alpha.desc());
        c.set_output(out);
        c.set_ps_rect(full);
        c.set_as_rect(full);
        c.set_ps_origin(Corner::ORIGIN);
        c.set_as_origin(Corner::ORIGIN);
        c.set_scale(1.0);
        c.set_alpha(0);
        c.set_flip(self.config.flip);
    }

    fn load(&mut self, role: SurfaceRole, file: &str) -> SlideResult<()> {
        let start = self.clock.now_micros();
        if let Err(e) = self.read_slide(role, file) {
            tracing::warn!(file, ?role, error = %e, "slide load failed");
            return Err(e);
        }
        let took = self.clock.elapsed_since(start);
        self.stats.record(Phase::Decode, took);
        tracing::debug!(file, ?role, took_us = took, "slide loaded");
        Ok(())
    }

    fn read_slide(&mut self, role: SurfaceRole, file: &str) -> SlideResult<()> {
        let source = self
            .source
            .as_mut()
            .ok_or_else(|| SlideError::io(format!("no slide source to open '{file}'")))?;
        let mut reader = source
            .open(file)
            .map_err(|e| SlideError::io(format!("open '{file}': {e}")))?;
        load_qvga_bmp(&mut reader, self.surfaces.get_mut(role), &mut self.compositor)
    }

    /// Composite, present, then hold until `pace_us` has passed since the step began.
    fn step(&mut self, pace_us: u64) -> SlideResult<()> {
        let start = self.clock.now_micros();
        self.run_pass()?;

        let t = self.clock.now_micros();
        self.sink.present(&self.surfaces.output);
        self.stats.record(Phase::Present, self.clock.elapsed_since(t));

        FramePacer::new(pace_us).wait(&*self.clock, start);
        Ok(())
    }

    /// One blocking pass: reconcile software writes, start, poll to completion (bounded by
    /// `poll_timeout_us`), stop, then reconcile the output for software reads.
    fn run_pass(&mut self) -> SlideResult<()> {
        let Self {
            surfaces,
            compositor,
            clock,
            config,
            stats,
            ..
        } = self;

        for s in [&mut surfaces.processing, &mut surfaces.alpha] {
            if s.take_dirty() {
                compositor.reconcile(s.pixels());
            }
        }

        let start = clock.now_micros();
        compositor.start(surfaces.pass_io())?;
        while !compositor.poll_done() {
            if let Some(limit) = config.poll_timeout_us {
                let waited = clock.elapsed_since(start);
                if waited >= limit {
                    compositor.stop();
                    return Err(SlideError::engine(format!(
                        "pass did not complete within {limit} us"
                    )));
                }
            }
            std::hint::spin_loop();
        }
        compositor.stop();
        let took = clock.elapsed_since(start);

        compositor.reconcile(surfaces.output.pixels());
        surfaces.output.mark_device_written();
        stats.record(Phase::Convert, took);
        tracing::trace!(took_us = took, "pass complete");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/slideshow.rs"]
mod tests;
