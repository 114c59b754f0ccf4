/// Progress state for the bucket currently being reduced.
#[derive(Debug, Clone, Copy)]
pub struct ProgressTick<'a> {
    pub label: &'a str,
    pub final_label: &'a str,
    /// 1-based position of this bucket.
    pub ordinal: usize,
    pub total: usize,
}

impl ProgressTick<'_> {
    /// Integer percentage `ordinal * 100 / total`; reaches 100 on the last bucket.
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            return 100;
        }
        (self.ordinal as u64 * 100) / self.total as u64
    }
}

/// Observer of the aggregation loop. Called once per bucket, in bucket order.
pub trait ProgressReporter {
    fn report(&mut self, tick: &ProgressTick);

    fn finish(&mut self) {}
}

/// Reporter used with `--quiet` and in tests.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&mut self, _tick: &ProgressTick) {}
}

/// Terminal progress bar backed by `indicatif`.
pub struct BarReporter {
    bar: indicatif::ProgressBar,
}

impl BarReporter {
    /// Creates a bar; its length is taken from the first tick.
    pub fn new() -> Self {
        let style = indicatif::ProgressStyle::with_template(
            "Getting data for date: {prefix} [{bar:30.cyan/blue}] {msg}",
        )
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
        .progress_chars("=> ");
        let bar = indicatif::ProgressBar::new(0);
        bar.set_style(style);
        BarReporter { bar }
    }
}

impl ProgressReporter for BarReporter {
    fn report(&mut self, tick: &ProgressTick) {
        self.bar.set_length(tick.total as u64);
        self.bar.set_prefix(tick.label.to_string());
        self.bar
            .set_message(format!("last_date: {} {}%", tick.final_label, tick.percent()));
        self.bar.set_position(tick.ordinal as u64);
    }

    fn finish(&mut self) {
        self.bar.finish_with_message("==Finished organizing data==");
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub ticks: Vec<(usize, usize, u64)>,
    pub labels: Vec<(String, String)>,
    pub finished: bool,
}

#[cfg(test)]
impl RecordingReporter {
    pub fn ordinals(&self) -> Vec<usize> {
        self.ticks.iter().map(|t| t.0).collect()
    }

    pub fn percents(&self) -> Vec<u64> {
        self.ticks.iter().map(|t| t.2).collect()
    }
}

#[cfg(test)]
impl ProgressReporter for RecordingReporter {
    fn report(&mut self, tick: &ProgressTick) {
        self.ticks.push((tick.ordinal, tick.total, tick.percent()));
        self.labels
            .push((tick.label.to_string(), tick.final_label.to_string()));
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}
