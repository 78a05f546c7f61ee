//! Peak memory collector

use super::{DataCollector, format_bytes};
use crate::error::ToolbarResult;
use serde_json::{Value, json};
use std::any::Any;
use std::sync::Arc;

/// Reports the process's peak resident memory
///
/// The figure comes from `/proc/self/status` (`VmHWM`). On platforms without
/// procfs the collector reports `null`.
pub struct MemoryCollector;

impl MemoryCollector {
	/// Create the collector
	pub fn new() -> Self {
		Self
	}

	/// Peak resident set size in bytes, if the platform exposes it
	pub fn peak_usage(&self) -> Option<u64> {
		let status = std::fs::read_to_string("/proc/self/status").ok()?;
		parse_vm_hwm(&status)
	}
}

impl Default for MemoryCollector {
	fn default() -> Self {
		Self::new()
	}
}

fn parse_vm_hwm(status: &str) -> Option<u64> {
	let line = status.lines().find(|l| l.starts_with("VmHWM:"))?;
	let kib: u64 = line
		.trim_start_matches("VmHWM:")
		.split_whitespace()
		.next()?
		.parse()
		.ok()?;
	Some(kib * 1024)
}

impl DataCollector for MemoryCollector {
	fn name(&self) -> &str {
		"memory"
	}

	fn collect(&self) -> ToolbarResult<Value> {
		Ok(match self.peak_usage() {
			Some(bytes) => json!({
				"peak_usage": bytes,
				"peak_usage_str": format_bytes(bytes),
			}),
			None => json!({
				"peak_usage": null,
				"peak_usage_str": "n/a",
			}),
		})
	}

	fn widgets(&self) -> Value {
		json!({
			"memory": {
				"icon": "cogs",
				"tooltip": "Memory Usage",
				"map": "memory.peak_usage_str",
				"default": "'0B'",
			},
		})
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}
