//! Reporters turn simulation state into text for a caller-supplied writer
//!
//! The core never writes output itself; the driver hands a `&Simulation` to
//! a `Reporter` at whatever cadence it likes.

use std::borrow::Cow;
use std::io::{self, Write};

use crate::simulation::engine::Simulation;

pub trait Reporter {
    /// Called once before the first step
    fn begin(&mut self, _sim: &Simulation) -> io::Result<()> {
        Ok(())
    }

    /// Called with the state after a step
    fn report(&mut self, sim: &Simulation) -> io::Result<()>;

    /// Called once after the run, successful or not
    fn finish(&mut self, _sim: &Simulation) -> io::Result<()> {
        Ok(())
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn begin(&mut self, sim: &Simulation) -> io::Result<()> {
        (**self).begin(sim)
    }

    fn report(&mut self, sim: &Simulation) -> io::Result<()> {
        (**self).report(sim)
    }

    fn finish(&mut self, sim: &Simulation) -> io::Result<()> {
        (**self).finish(sim)
    }
}

/// Forwards every `every`-th step to `inner`, plus the initial state and
/// whatever state the run ended on
pub struct EveryNth<R: Reporter> {
    inner: R,
    every: u64,
    last: Option<u64>, // step of the last forwarded report
}

impl<R: Reporter> EveryNth<R> {
    pub fn new(inner: R, every: u64) -> Self {
        Self {
            inner,
            every: every.max(1),
            last: None,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Reporter> Reporter for EveryNth<R> {
    fn begin(&mut self, sim: &Simulation) -> io::Result<()> {
        self.last = Some(sim.steps());
        self.inner.begin(sim)
    }

    fn report(&mut self, sim: &Simulation) -> io::Result<()> {
        if sim.steps() % self.every != 0 || self.last == Some(sim.steps()) {
            return Ok(());
        }
        self.last = Some(sim.steps());
        self.inner.report(sim)
    }

    fn finish(&mut self, sim: &Simulation) -> io::Result<()> {
        if self.last != Some(sim.steps()) {
            self.last = Some(sim.steps());
            self.inner.report(sim)?;
        }
        self.inner.finish(sim)
    }
}

/// Human readable dump built from `Body::render`
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn begin(&mut self, sim: &Simulation) -> io::Result<()> {
        self.report(sim)
    }

    fn report(&mut self, sim: &Simulation) -> io::Result<()> {
        writeln!(self.out, "--- step {} t = {:.6} ---", sim.steps(), sim.current_time())?;
        for body in sim.bodies() {
            writeln!(self.out, "{}", body.render())?;
        }
        Ok(())
    }

    fn finish(&mut self, _sim: &Simulation) -> io::Result<()> {
        self.out.flush()
    }
}

/// One CSV row per body per report, with a header line
pub struct CsvReporter<W: Write> {
    out: W,
}

impl<W: Write> CsvReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for CsvReporter<W> {
    fn begin(&mut self, sim: &Simulation) -> io::Result<()> {
        writeln!(self.out, "step,t,name,m,x,y,z,vx,vy,vz")?;
        // initial state as step 0
        self.report(sim)
    }

    fn report(&mut self, sim: &Simulation) -> io::Result<()> {
        let t = sim.current_time();
        for b in sim.bodies() {
            let (x, v) = (b.position(), b.velocity());
            writeln!(
                self.out,
                "{},{},{},{},{},{},{},{},{},{}",
                sim.steps(), t, csv_field(b.name()), b.mass(), x.x, x.y, x.z, v.x, v.y, v.z,
            )?;
        }
        Ok(())
    }

    fn finish(&mut self, _sim: &Simulation) -> io::Result<()> {
        self.out.flush()
    }
}

/// Quote a free-form field when it would break the row (RFC 4180)
fn csv_field(s: &str) -> Cow<'_, str> {
    if s.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(s)
    }
}
