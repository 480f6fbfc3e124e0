//! Timestamps with optional elapsed time since the previous timestamp.
//!
//! The "previous timestamp" is state. It lives in the [`Clock`] value owned
//! by a printer, so two printers never disturb each other's elapsed times.

use std::cell::Cell;

use chrono::{DateTime, FixedOffset, Local};

type TimeSource = Box<dyn Fn() -> DateTime<FixedOffset>>;

pub struct Clock {
    source: TimeSource,
    start: DateTime<FixedOffset>,
    last: Cell<DateTime<FixedOffset>>,
}

impl Default for Clock {
    fn default() -> Self {
        Clock::new()
    }
}

impl std::fmt::Debug for Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clock")
            .field("start", &self.start)
            .field("last", &self.last.get())
            .finish()
    }
}

impl Clock {
    /// Local wall-clock time.
    pub fn new() -> Self {
        Clock::with_source(|| Local::now().fixed_offset())
    }

    /// Any time source; tests use a scripted one.
    pub fn with_source(source: impl Fn() -> DateTime<FixedOffset> + 'static) -> Self {
        let start = source();
        Clock {
            source: Box::new(source),
            start,
            last: Cell::new(start),
        }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        (self.source)()
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    /// `#(zone) YYYY/MM/DD HH:MM:SS[.micros][ - elapsed]`.
    ///
    /// Showing elapsed time resets the reference point to now.
    pub fn stamp(&self, nanoseconds: bool, show_elapsed: bool) -> String {
        let now = self.now();
        let mut out = now.format("#(%Z) %Y/%m/%d %H:%M:%S").to_string();
        if nanoseconds {
            out.push_str(&format!(".{:06}", now.timestamp_subsec_micros()));
        }
        if show_elapsed {
            let elapsed = seconds_between(self.last.get(), now);
            self.last.set(now);
            out.push_str(" - ");
            out.push_str(&elapsed_text(elapsed, nanoseconds));
        }
        out
    }

    /// Seconds since the clock was created.
    pub fn runtime(&self) -> f64 {
        seconds_between(self.start, self.now())
    }
}

fn seconds_between(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> f64 {
    let delta = to.signed_duration_since(from);
    delta.num_microseconds().map_or_else(
        || delta.num_milliseconds() as f64 / 1e3,
        |us| us as f64 / 1e6,
    )
}

/// `%11.6f` with microseconds, otherwise whole seconds in `%4i`.
fn elapsed_text(seconds: f64, nanoseconds: bool) -> String {
    if nanoseconds {
        format!("{:11.6}", seconds)
    } else {
        format!("{:4}", seconds.trunc() as i64)
    }
}

/// A clock that returns `times` (seconds, nanoseconds) in order, then
/// repeats the last one.
#[cfg(test)]
pub(crate) fn scripted(times: &[(i64, u32)]) -> Clock {
    use chrono::TimeZone;
    use std::rc::Rc;

    let utc = FixedOffset::east_opt(0).expect("utc offset");
    let stamps: Vec<_> = times
        .iter()
        .map(|&(s, ns)| utc.timestamp_opt(s, ns).single().expect("valid time"))
        .collect();
    let next = Rc::new(Cell::new(0usize));
    Clock::with_source(move || {
        let ix = next.get();
        next.set(ix + 1);
        stamps[ix.min(stamps.len() - 1)]
    })
}
