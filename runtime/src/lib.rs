//! Host runtime for the conditions indicator.
//!
//! - `dispatcher`: applies events to the indicator on the calling thread.
//! - `schedule`: merges bars and ticks into delivery order.
//! - `HostRuntime`: bounded queue feeding one worker thread that owns a
//!   `Dispatcher`, mirroring a charting host's single dispatch loop.

mod dispatcher;
mod schedule;

use std::thread::{self, JoinHandle};

use conditions::{ConditionsError, IndicatorConfig};
use crossbeam::channel::{self, Receiver, Sender};
use tracing::{error, warn};

pub use dispatcher::{Dispatcher, HostEvent, RuntimeReport};
pub use schedule::{schedule_events, synthesize_ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
	/// Capacity of the host event queue.
	pub channel_capacity: usize,
}

impl Default for RuntimeConfig {
	fn default() -> Self {
		Self {
			channel_capacity: 4096,
		}
	}
}

impl RuntimeConfig {
	/// Defaults overridden by `CONDITIONS_CHANNEL_CAPACITY` when set.
	pub fn from_env() -> Self {
		let defaults = Self::default();
		Self {
			channel_capacity: env_usize("CONDITIONS_CHANNEL_CAPACITY")
				.unwrap_or(defaults.channel_capacity),
		}
	}
}

fn env_usize(key: &str) -> Option<usize> {
	std::env::var(key)
		.ok()
		.and_then(|value| value.parse::<usize>().ok())
		.filter(|value| *value > 0)
}

enum RuntimeMessage {
	Event(HostEvent),
	Shutdown,
}

pub struct HostRuntime {
	sender: Sender<RuntimeMessage>,
	worker: Option<JoinHandle<Result<RuntimeReport, ConditionsError>>>,
}

impl HostRuntime {
	/// Prepares the indicator on the caller's thread, then moves it onto the
	/// dispatch worker.
	pub fn spawn(config: IndicatorConfig, runtime: RuntimeConfig) -> Result<Self, ConditionsError> {
		let dispatcher = Dispatcher::new(config)?;
		let (tx, rx) = channel::bounded(runtime.channel_capacity.max(1));
		let worker = thread::Builder::new()
			.name("conditions-dispatch".to_string())
			.spawn(move || run_dispatch_loop(dispatcher, rx))
			.map_err(|error| ConditionsError::Runtime(error.to_string()))?;

		Ok(Self {
			sender: tx,
			worker: Some(worker),
		})
	}

	/// Queues an event, blocking while the queue is full.
	pub fn send(&self, event: HostEvent) -> Result<(), ConditionsError> {
		self.sender
			.send(RuntimeMessage::Event(event))
			.map_err(|_| ConditionsError::Runtime("dispatch worker is disconnected".to_string()))
	}

	/// Drains the queue, stops the worker and returns its report.
	pub fn shutdown(mut self) -> Result<RuntimeReport, ConditionsError> {
		self.join()
	}

	fn join(&mut self) -> Result<RuntimeReport, ConditionsError> {
		let Some(worker) = self.worker.take() else {
			return Err(ConditionsError::Runtime("dispatch worker already joined".to_string()));
		};
		if self.sender.send(RuntimeMessage::Shutdown).is_err() {
			warn!("dispatch worker exited before shutdown");
		}
		worker
			.join()
			.map_err(|_| ConditionsError::Runtime("dispatch worker panicked".to_string()))?
	}
}

impl Drop for HostRuntime {
	fn drop(&mut self) {
		if self.worker.is_some() {
			let _ = self.join();
		}
	}
}

fn run_dispatch_loop(
	mut dispatcher: Dispatcher,
	rx: Receiver<RuntimeMessage>,
) -> Result<RuntimeReport, ConditionsError> {
	while let Ok(message) = rx.recv() {
		match message {
			RuntimeMessage::Event(event) => {
				if let Err(err) = dispatcher.dispatch(event) {
					error!(%err, "dispatch failed");
					return Err(err);
				}
			}
			RuntimeMessage::Shutdown => break,
		}
	}
	dispatcher.finish()
}
