//! Provide performance reporting utilities.

use std::time::Duration;

const PROMPT_LENGTH: usize = 15;

/// Format a time line. The `prompt` is put before the colon, after `tabs * 2` spaces.
/// If `div > 1`, the line shows an average time and the total time.
pub fn format_time(prompt: &str, tabs: usize, total_time: Duration, div: usize) -> String {
    let time = total_time / (div.max(1) as u32);
    let mut line = "  ".repeat(tabs);
    line.push_str(prompt);
    let used = prompt.len() + tabs * 2;
    if PROMPT_LENGTH > used {
        line.push_str(&" ".repeat(PROMPT_LENGTH - used));
    }
    line.push_str(&format!(": {}", format_duration(time)));
    if div > 1 {
        line.push_str(&format!(" (total {}, {} times)", format_duration(total_time), div));
    }
    line
}

fn format_duration(time: Duration) -> String {
    if time <= Duration::new(0, 1000) {
        format!("{:>9} ns", time.as_nanos())
    } else if time <= Duration::new(0, 1000000) {
        format!("{:>9.3} us", time.as_nanos() as f64 / 1000.0)
    } else if time <= Duration::new(0, 1000000000) {
        format!("{:>9.3} ms", time.as_micros() as f64 / 1000.0)
    } else {
        format!("{:>9.3} s ", time.as_millis() as f64 / 1000.0)
    }
}

/// Print a time line. See [format_time].
pub fn print_time(prompt: &str, tabs: usize, total_time: Duration, div: usize) {
    println!("{}", format_time(prompt, tabs, total_time, div));
}

/// A utility struct that allows measuring a time interval.
///
/// Create a new [`TimerOnce`] and call [`TimerOnce::finish`] to print the interval.
pub struct TimerOnce {
    start: std::time::Instant,
    tabs: usize,
}

impl Default for TimerOnce {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerOnce {
    /// Create a new timer.
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
            tabs: 0,
        }
    }
    /// Set the tabs of the timer. See [`print_time`] for more information.
    pub fn tabs(self, tabs: usize) -> Self {
        Self { tabs, ..self }
    }
    /// Print the time interval.
    pub fn finish(self, prompt: &str) -> Duration {
        let elapsed = self.start.elapsed();
        print_time(prompt, self.tabs, elapsed, 1);
        elapsed
    }
    /// Get the time duration.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
