//! Haptic sink and effect dispatcher
//!
//! A [`HapticSink`] binds one joystick and the subset of supported haptic
//! capabilities it reports. The [`EffectDispatcher`] translates effect
//! commands for a sink into exactly one of:
//! - a synchronous activation call (constant, spring, damper),
//! - a queued rumble record,
//! - a range notice, with the G920 sysfs override when applicable.
//!
//! Delivery is fire-and-forget: backend failures are logged and dropped.

use crate::backend::{HapticBackend, RumbleQueue};
use crate::haptic::{
    Activation, ActivationRequest, Condition, EffectCommand, EffectKind, HapticCaps, JoystickId,
    RumbleRequest, G920_NAME, MSG_ADJUST_RANGE, MSG_RANGE_ADJUSTED, SINK_NAME,
};
use crate::wheel::{apply_range, DeviceTree, RangeReport};
use log::{debug, info};
use std::fmt;
use std::sync::Arc;

/// Static description of this sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkDescriptor {
    pub name: &'static str,
    pub caps: HapticCaps,
}

/// Generic OS sink: drives any joystick through the input layer
pub const OS_SINK: SinkDescriptor = SinkDescriptor {
    name: SINK_NAME,
    caps: HapticCaps::SUPPORTED,
};

/// One joystick bound to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HapticSink {
    joystick: JoystickId,
    caps: HapticCaps,
}

impl HapticSink {
    /// Bind a joystick.
    ///
    /// Returns `None` when the joystick reports none of the supported
    /// capabilities.
    pub fn new<B: HapticBackend + ?Sized>(backend: &B, joystick: JoystickId) -> Option<Self> {
        let caps = backend.joystick_haptic(joystick) & OS_SINK.caps;
        if caps.is_empty() {
            debug!("{} has no supported haptic capability", joystick);
            return None;
        }

        debug!("{}: bound {} with caps {:?}", OS_SINK.name, joystick, caps);
        Some(Self { joystick, caps })
    }

    pub fn joystick(&self) -> JoystickId {
        self.joystick
    }

    pub fn caps(&self) -> HapticCaps {
        self.caps
    }

    /// Whether a command of this kind may reach the backend
    pub fn accepts(&self, kind: EffectKind) -> bool {
        self.caps.contains(kind.required_caps())
    }
}

/// Injected dispatcher settings
#[derive(Clone)]
pub struct SinkContext {
    /// Trace every translated record
    pub debug: bool,

    /// Localize a message template
    pub translate: Arc<dyn Fn(&str) -> String + Send + Sync>,
}

impl SinkContext {
    pub fn new<F>(debug: bool, translate: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            debug,
            translate: Arc::new(translate),
        }
    }

    /// Translate `template` and substitute `value` for its `{}` placeholder
    pub fn message<V: fmt::Display>(&self, template: &str, value: V) -> String {
        (self.translate)(template).replacen("{}", &value.to_string(), 1)
    }
}

impl Default for SinkContext {
    fn default() -> Self {
        Self::new(false, |template: &str| template.to_string())
    }
}

impl fmt::Debug for SinkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkContext")
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

/// What a dispatch did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Activation request sent to the backend
    Activated(ActivationRequest),

    /// Rumble record handed to the queue
    Queued(RumbleRequest),

    /// Rumble record dropped because the queue was full or closed
    Dropped(RumbleRequest),

    /// Range notice shown; `report` is set when the G920 override ran
    Range {
        message: String,
        report: Option<RangeReport>,
    },

    /// Nothing sent
    Ignored,
}

/// Translates effect commands into backend calls
pub struct EffectDispatcher<B, Q, T>
where
    B: HapticBackend,
    Q: RumbleQueue,
    T: DeviceTree,
{
    backend: B,
    queue: Q,
    tree: T,
    context: SinkContext,
}

impl<B, Q, T> EffectDispatcher<B, Q, T>
where
    B: HapticBackend,
    Q: RumbleQueue,
    T: DeviceTree,
{
    /// Create a new dispatcher with the given backend, rumble queue and device tree
    pub fn new(backend: B, queue: Q, tree: T, context: SinkContext) -> Self {
        Self {
            backend,
            queue,
            tree,
            context,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Bind a joystick through this dispatcher's backend
    pub fn bind(&self, joystick: JoystickId) -> Option<HapticSink> {
        HapticSink::new(&self.backend, joystick)
    }

    /// Process one effect command for a sink
    pub fn dispatch(&self, sink: &HapticSink, command: &EffectCommand) -> Dispatch {
        let kind = command.kind();
        if !sink.accepts(kind) {
            debug!("{}: {} effect not supported, dropped", sink.joystick, kind);
            return Dispatch::Ignored;
        }

        match *command {
            EffectCommand::Constant { active, level } => {
                let level = if active { level } else { 0 };
                self.activate(sink, Activation::Constant { level })
            }
            EffectCommand::Spring { active, condition } => {
                self.activate(sink, Activation::Spring(stopped_unless(active, condition)))
            }
            EffectCommand::Damper { active, condition } => {
                self.activate(sink, Activation::Damper(stopped_unless(active, condition)))
            }
            EffectCommand::Range { value } => self.adjust_range(sink, value),
            EffectCommand::Rumble { weak, strong } => {
                let request = RumbleRequest {
                    joystick: sink.joystick,
                    weak,
                    strong,
                };
                if !self.queue.push(request) {
                    return Dispatch::Dropped(request);
                }
                self.trace(&request);
                Dispatch::Queued(request)
            }
            EffectCommand::None | EffectCommand::Led => Dispatch::Ignored,
        }
    }

    fn activate(&self, sink: &HapticSink, effect: Activation) -> Dispatch {
        let request = ActivationRequest::new(sink.joystick, effect);
        if let Err(e) = self.backend.set_haptic(&request) {
            debug!("{}: haptic request failed: {}", sink.joystick, e);
        }
        self.trace(&request);
        Dispatch::Activated(request)
    }

    fn adjust_range(&self, sink: &HapticSink, degrees: u16) -> Dispatch {
        let name = self.backend.joystick_name(sink.joystick);

        // Model recognized by name first; the override then matches USB ids
        let (message, report) = if name.as_deref() == Some(G920_NAME) {
            let report = apply_range(&self.tree, degrees);
            (self.context.message(MSG_RANGE_ADJUSTED, degrees), Some(report))
        } else {
            (self.context.message(MSG_ADJUST_RANGE, degrees), None)
        };

        info!("{}", message);
        Dispatch::Range { message, report }
    }

    fn trace(&self, record: &dyn fmt::Display) {
        if self.context.debug {
            info!(target: "haptic_sink::trace", "{}", record);
        }
    }
}

fn stopped_unless(active: bool, condition: Condition) -> Condition {
    if active { condition } else { Condition::default() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{rumble_queue, MockHapticBackend};
    use crate::haptic::Pair;
    use crate::wheel::{InterfaceNode, MemoryTree, UsbIdentity};
    use crossbeam_channel::{Receiver, Sender};

    type TestDispatcher = EffectDispatcher<MockHapticBackend, Sender<RumbleRequest>, MemoryTree>;

    fn dispatcher(backend: &MockHapticBackend, tree: &MemoryTree) -> (TestDispatcher, Receiver<RumbleRequest>) {
        let (sender, receiver) = rumble_queue(16);
        let dispatcher = EffectDispatcher::new(backend.clone(), sender, tree.clone(), SinkContext::default());
        (dispatcher, receiver)
    }

    fn condition() -> Condition {
        Condition {
            saturation: Pair::new(100, 100),
            coefficient: Pair::new(50, -50),
            center: 0,
            deadband: 5,
        }
    }

    #[test]
    fn test_sink_requires_a_capability() {
        let backend = MockHapticBackend::new()
            .with_joystick(JoystickId(0), "Pad", HapticCaps::RUMBLE)
            .with_joystick(JoystickId(1), "Keyboard", HapticCaps::empty());

        let sink = HapticSink::new(&backend, JoystickId(0)).unwrap();
        assert_eq!(sink.caps(), HapticCaps::RUMBLE);
        assert!(HapticSink::new(&backend, JoystickId(1)).is_none());
        assert!(HapticSink::new(&backend, JoystickId(9)).is_none());
    }

    #[test]
    fn test_spring_active() {
        let backend = MockHapticBackend::new().with_joystick(JoystickId(0), "Wheel", HapticCaps::SUPPORTED);
        let tree = MemoryTree::new();
        let (dispatcher, receiver) = dispatcher(&backend, &tree);
        let sink = dispatcher.bind(JoystickId(0)).unwrap();

        let outcome = dispatcher.dispatch(&sink, &EffectCommand::Spring { active: true, condition: condition() });

        let expected = ActivationRequest::new(JoystickId(0), Activation::Spring(condition()));
        assert_eq!(outcome, Dispatch::Activated(expected));
        assert_eq!(backend.activations(), vec![expected]);
        assert!(receiver.try_recv().is_err());
        assert_eq!(tree.scans(), 0);
    }

    #[test]
    fn test_stop_zeroes_fields() {
        let backend = MockHapticBackend::new().with_joystick(JoystickId(4), "Wheel", HapticCaps::SUPPORTED);
        let tree = MemoryTree::new();
        let (dispatcher, _receiver) = dispatcher(&backend, &tree);
        let sink = dispatcher.bind(JoystickId(4)).unwrap();

        dispatcher.dispatch(&sink, &EffectCommand::Constant { active: false, level: 3000 });
        dispatcher.dispatch(&sink, &EffectCommand::Damper { active: false, condition: condition() });

        assert_eq!(
            backend.activations(),
            vec![
                ActivationRequest::new(JoystickId(4), Activation::Constant { level: 0 }),
                ActivationRequest::new(JoystickId(4), Activation::Damper(Condition::default())),
            ]
        );
    }

    #[test]
    fn test_backend_failure_is_absorbed() {
        let backend = MockHapticBackend::new().with_joystick(JoystickId(0), "Wheel", HapticCaps::CONSTANT);
        backend.set_failing(true);
        let tree = MemoryTree::new();
        let (dispatcher, _receiver) = dispatcher(&backend, &tree);
        let sink = dispatcher.bind(JoystickId(0)).unwrap();

        let outcome = dispatcher.dispatch(&sink, &EffectCommand::Constant { active: true, level: 1 });
        assert!(matches!(outcome, Dispatch::Activated(_)));
        assert_eq!(backend.activations().len(), 1);
    }

    #[test]
    fn test_led_and_none_are_ignored() {
        let backend = MockHapticBackend::new().with_joystick(JoystickId(0), "Wheel", HapticCaps::SUPPORTED);
        let tree = MemoryTree::new();
        let (dispatcher, receiver) = dispatcher(&backend, &tree);
        let sink = dispatcher.bind(JoystickId(0)).unwrap();

        assert_eq!(dispatcher.dispatch(&sink, &EffectCommand::Led), Dispatch::Ignored);
        assert_eq!(dispatcher.dispatch(&sink, &EffectCommand::None), Dispatch::Ignored);
        assert!(backend.activations().is_empty());
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_range_on_other_wheel() {
        let backend = MockHapticBackend::new().with_joystick(JoystickId(0), "Logitech G29", HapticCaps::SUPPORTED);
        let tree = MemoryTree::new().with_node(
            InterfaceNode::new("/sys/hid/a").with_usb_parent(UsbIdentity::new(0x046D, 0xC262)),
        );
        let (dispatcher, _receiver) = dispatcher(&backend, &tree);
        let sink = dispatcher.bind(JoystickId(0)).unwrap();

        let outcome = dispatcher.dispatch(&sink, &EffectCommand::Range { value: 900 });

        assert_eq!(
            outcome,
            Dispatch::Range {
                message: "adjust your wheel range to 900 degrees".to_string(),
                report: None,
            }
        );
        assert_eq!(tree.scans(), 0);
        assert!(tree.writes().is_empty());
    }

    #[test]
    fn test_message_translation() {
        let context = SinkContext::new(false, |template: &str| template.to_uppercase());
        assert_eq!(context.message(MSG_RANGE_ADJUSTED, 540), "WHEEL RANGE ADJUSTED TO 540 DEGREES");
    }
}
