// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::ut::track;

/// Named task timer scoped to a single run
///
/// # Examples
///
/// ```
/// use silhouette_core::ut::timer::Stopwatch;
///
/// let mut stopwatch = Stopwatch::new();
///
/// stopwatch.start("describe");
/// assert!(stopwatch.stop("describe").is_some());
/// assert!(stopwatch.elapsed("describe").is_some());
///
/// assert!(stopwatch.stop("classify").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    running: HashMap<String, Instant>,
    finished: Vec<(String, Duration)>,
    verbose: bool,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stopwatch that logs warnings for unmatched stops
    pub fn with_verbose(verbose: bool) -> Self {
        Stopwatch {
            verbose,
            ..Default::default()
        }
    }

    /// Start or restart timing a task
    pub fn start(&mut self, task: &str) {
        self.running.insert(task.to_string(), Instant::now());
    }

    /// Stop timing a task and return its duration
    pub fn stop(&mut self, task: &str) -> Option<Duration> {
        let Some(start) = self.running.remove(task) else {
            track::progress_warn(
                &format!("Timer '{}' was stopped before it was started.", task),
                self.verbose,
            );
            return None;
        };

        let duration = start.elapsed();
        self.finished.push((task.to_string(), duration));

        Some(duration)
    }

    /// Total recorded duration of a task across all of its stops
    pub fn elapsed(&self, task: &str) -> Option<Duration> {
        self.finished
            .iter()
            .filter(|(name, _)| name == task)
            .map(|(_, duration)| *duration)
            .reduce(|a, b| a + b)
    }

    /// Recorded tasks in the order they were stopped
    pub fn tasks(&self) -> Vec<&str> {
        self.finished.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Recorded task durations as `task: N milliseconds` lines
    pub fn summary(&self) -> Vec<String> {
        self.finished
            .iter()
            .map(|(task, duration)| format!("{}: {} milliseconds", task, duration.as_millis()))
            .collect()
    }

    /// Log every recorded task duration in milliseconds
    pub fn report(&self, verbose: bool) {
        self.report_with(track::progress_log, verbose);
    }

    /// Log every recorded task duration with the provided logger
    pub fn report_with(&self, log: fn(&str, bool), verbose: bool) {
        for line in self.summary() {
            log(&line, verbose);
        }
    }
}
