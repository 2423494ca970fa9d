//! High-level Haptic Sink Manager
//!
//! This module provides the composition root: it binds joysticks to sinks,
//! routes effect commands to the dispatcher, and runs the thread that
//! delivers queued rumble records to the backend.

use crate::backend::{rumble_queue, HapticBackend};
use crate::config::Config;
use crate::haptic::{EffectCommand, JoystickId, RumbleRequest};
use crate::sink::{Dispatch, EffectDispatcher, HapticSink, SinkContext};
use crate::wheel::DeviceTree;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Manager is already running")]
    AlreadyRunning,

    #[error("Failed to spawn delivery thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Manager for haptic sinks
pub struct SinkManager<B, T>
where
    B: HapticBackend + Clone + Send + 'static,
    T: DeviceTree,
{
    dispatcher: EffectDispatcher<B, Sender<RumbleRequest>, T>,
    /// Bound sinks by joystick
    sinks: BTreeMap<JoystickId, HapticSink>,
    rumble_receiver: Receiver<RumbleRequest>,
    /// Running flag
    running: Arc<AtomicBool>,
    delivery: Option<JoinHandle<()>>,
}

impl<B, T> SinkManager<B, T>
where
    B: HapticBackend + Clone + Send + 'static,
    T: DeviceTree,
{
    /// Create a new manager from configuration
    pub fn new(config: &Config, backend: B, tree: T) -> Self {
        Self::with_context(config.context(), config.settings.queue_capacity, backend, tree)
    }

    /// Create a new manager with an explicit context and rumble queue capacity
    pub fn with_context(context: SinkContext, queue_capacity: usize, backend: B, tree: T) -> Self {
        let (rumble_sender, rumble_receiver) = rumble_queue(queue_capacity.max(1));

        Self {
            dispatcher: EffectDispatcher::new(backend, rumble_sender, tree, context),
            sinks: BTreeMap::new(),
            rumble_receiver,
            running: Arc::new(AtomicBool::new(false)),
            delivery: None,
        }
    }

    /// Bind a joystick. Returns false when it has no supported capability.
    pub fn attach(&mut self, joystick: JoystickId) -> bool {
        match self.dispatcher.bind(joystick) {
            Some(sink) => {
                info!("✓ Haptic sink bound to {} ({:?})", joystick, sink.caps());
                self.sinks.insert(joystick, sink);
                true
            }
            None => {
                debug!("No haptic sink for {}", joystick);
                false
            }
        }
    }

    /// Release a joystick's sink
    pub fn detach(&mut self, joystick: JoystickId) -> Option<HapticSink> {
        let sink = self.sinks.remove(&joystick);
        if sink.is_some() {
            info!("Haptic sink released from {}", joystick);
        }
        sink
    }

    pub fn sink(&self, joystick: JoystickId) -> Option<&HapticSink> {
        self.sinks.get(&joystick)
    }

    /// Joysticks with a bound sink, in ascending order
    pub fn joysticks(&self) -> impl Iterator<Item = JoystickId> + '_ {
        self.sinks.keys().copied()
    }

    /// Route a command to the joystick's sink.
    ///
    /// Returns `None` when no sink is bound to the joystick.
    pub fn process(&self, joystick: JoystickId, command: &EffectCommand) -> Option<Dispatch> {
        match self.sinks.get(&joystick) {
            Some(sink) => Some(self.dispatcher.dispatch(sink, command)),
            None => {
                debug!("No haptic sink for {}, dropping {:?}", joystick, command.kind());
                None
            }
        }
    }

    /// Start the rumble delivery thread
    pub fn start(&mut self) -> Result<(), ManagerError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(ManagerError::AlreadyRunning);
        }

        self.running.store(true, Ordering::SeqCst);

        let receiver = self.rumble_receiver.clone();
        let backend = self.dispatcher.backend().clone();
        let running = Arc::clone(&self.running);

        let spawned = thread::Builder::new()
            .name("rumble-delivery".to_string())
            .spawn(move || {
                info!("Rumble delivery thread started");

                while running.load(Ordering::SeqCst) {
                    match receiver.recv_timeout(Duration::from_millis(16)) {
                        Ok(request) => deliver(&backend, &request),
                        Err(RecvTimeoutError::Timeout) => {}
                        Err(RecvTimeoutError::Disconnected) => {
                            warn!("Rumble queue disconnected");
                            break;
                        }
                    }
                }

                // Flush what was queued before stop
                for request in receiver.try_iter() {
                    deliver(&backend, &request);
                }

                info!("Rumble delivery thread stopped");
            });

        match spawned {
            Ok(handle) => {
                self.delivery = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(ManagerError::Spawn(e))
            }
        }
    }

    /// Stop the delivery thread, delivering anything still queued
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.delivery.take() {
            info!("Stopping Haptic Sink Manager...");
            if handle.join().is_err() {
                warn!("Rumble delivery thread panicked");
            }
        }
    }

    /// Check if the delivery thread is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl<B, T> Drop for SinkManager<B, T>
where
    B: HapticBackend + Clone + Send + 'static,
    T: DeviceTree,
{
    fn drop(&mut self) {
        self.stop();
    }
}

fn deliver<B: HapticBackend>(backend: &B, request: &RumbleRequest) {
    if let Err(e) = backend.rumble(request) {
        debug!("{}: rumble delivery failed: {}", request.joystick, e);
    }
}
