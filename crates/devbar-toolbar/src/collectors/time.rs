//! Timeline collector

use super::{DataCollector, format_duration};
use crate::error::{ToolbarError, ToolbarResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A finished measure on the timeline
#[derive(Debug, Clone)]
pub struct Measure {
	/// Display label
	pub label: String,
	/// Wall-clock start
	pub start: DateTime<Utc>,
	/// Elapsed time
	pub duration: Duration,
}

struct Running {
	label: String,
	started_at: Instant,
	start: DateTime<Utc>,
}

#[derive(Default)]
struct Timeline {
	running: HashMap<String, Running>,
	finished: Vec<Measure>,
}

/// Collects named time measures
///
/// Starting a measure under a name that is already running restarts it.
pub struct TimeDataCollector {
	timeline: Mutex<Timeline>,
}

impl TimeDataCollector {
	/// Create an empty timeline
	pub fn new() -> Self {
		Self {
			timeline: Mutex::new(Timeline::default()),
		}
	}

	/// Start a measure; `label` defaults to the name
	pub fn start_measure(&self, name: &str, label: Option<&str>) {
		let running = Running {
			label: label.unwrap_or(name).to_string(),
			started_at: Instant::now(),
			start: Utc::now(),
		};
		self.timeline.lock().running.insert(name.to_string(), running);
	}

	/// Whether a measure with this name is running
	pub fn has_started_measure(&self, name: &str) -> bool {
		self.timeline.lock().running.contains_key(name)
	}

	/// Stop a running measure and move it to the finished list
	///
	/// # Errors
	///
	/// Returns [`ToolbarError::MeasureNotStarted`] if no measure with this
	/// name is running, including when it was already stopped.
	pub fn stop_measure(&self, name: &str) -> ToolbarResult<Duration> {
		let mut timeline = self.timeline.lock();
		let running = timeline
			.running
			.remove(name)
			.ok_or_else(|| ToolbarError::MeasureNotStarted(name.to_string()))?;

		let duration = running.started_at.elapsed();
		timeline.finished.push(Measure {
			label: running.label,
			start: running.start,
			duration,
		});
		Ok(duration)
	}

	/// Record an already finished measure
	pub fn add_measure(&self, label: impl Into<String>, start: DateTime<Utc>, duration: Duration) {
		self.timeline.lock().finished.push(Measure {
			label: label.into(),
			start,
			duration,
		});
	}

	/// Run `f` and record how long it took
	pub fn measure<R>(&self, label: impl Into<String>, f: impl FnOnce() -> R) -> R {
		let start = Utc::now();
		let started_at = Instant::now();
		let result = f();
		self.add_measure(label, start, started_at.elapsed());
		result
	}

	/// Copy of the finished measures
	pub fn measures(&self) -> Vec<Measure> {
		self.timeline.lock().finished.clone()
	}
}

impl Default for TimeDataCollector {
	fn default() -> Self {
		Self::new()
	}
}

impl DataCollector for TimeDataCollector {
	fn name(&self) -> &str {
		"time"
	}

	fn collect(&self) -> ToolbarResult<Value> {
		let timeline = self.timeline.lock();

		let Some(origin) = timeline.finished.iter().map(|m| m.start).min() else {
			return Ok(json!({
				"duration": 0.0,
				"duration_str": format_duration(Duration::ZERO),
				"measures": [],
			}));
		};

		let relative = |at: DateTime<Utc>| {
			(at - origin)
				.to_std()
				.unwrap_or(Duration::ZERO)
		};

		let mut end = Duration::ZERO;
		let measures: Vec<Value> = timeline
			.finished
			.iter()
			.map(|m| {
				let relative_start = relative(m.start);
				let relative_end = relative_start + m.duration;
				end = end.max(relative_end);
				json!({
					"label": m.label,
					"start": m.start.to_rfc3339(),
					"relative_start": relative_start.as_secs_f64(),
					"relative_end": relative_end.as_secs_f64(),
					"duration": m.duration.as_secs_f64(),
					"duration_str": format_duration(m.duration),
				})
			})
			.collect();

		Ok(json!({
			"start": origin.to_rfc3339(),
			"duration": end.as_secs_f64(),
			"duration_str": format_duration(end),
			"measures": measures,
		}))
	}

	fn widgets(&self) -> Value {
		json!({
			"time": {
				"icon": "clock-o",
				"tooltip": "Request Duration",
				"map": "time.duration_str",
				"default": "'0ms'",
			},
			"timeline": {
				"icon": "tasks",
				"widget": "DevBar.Widgets.TimelineWidget",
				"map": "time",
				"default": "{}",
			},
		})
	}

	fn reset(&self) {
		self.timeline.lock().finished.clear();
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}
