//! End-to-end tests: UDP datagrams in, recorded key events out.
//!
//! Each test starts a real listener on `127.0.0.1:0`, sends OSC packets
//! encoded with `rosc`, and inspects the mock keyboard, the mock script
//! runner, and the message records delivered to the pipeline's sink.

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use osckey::application::dispatch_message::{DispatchPipeline, MessageOutcome, MessageRecord};
use osckey::application::execute_action::{
    ActionExecutor, EmulatedKey, KeyboardEmulator, ScriptRunner,
};
use osckey::infrastructure::input_emulation::mock::MockKeyboardEmulator;
use osckey::infrastructure::network::osc_listener::{start_osc_listener, ListenerHandle};
use osckey::infrastructure::script_runner::mock::MockScriptRunner;
use osckey_core::{
    KeyCombination, KeyToken, MemoryStore, Modifier, ShortcutRegistry, UnresolvedReason,
};
use rosc::{OscBundle, OscMessage, OscPacket, OscTime, OscType};

// ── Harness ───────────────────────────────────────────────────────────────────

struct Harness {
    listener: ListenerHandle,
    registry: Arc<ShortcutRegistry>,
    keyboard: Arc<MockKeyboardEmulator>,
    scripts: Arc<MockScriptRunner>,
    records: Arc<Mutex<Vec<MessageRecord>>>,
    sender: UdpSocket,
}

impl Harness {
    fn start() -> Self {
        let registry = Arc::new(ShortcutRegistry::new(Arc::new(MemoryStore::new())).unwrap());
        let keyboard = Arc::new(MockKeyboardEmulator::new());
        let scripts = Arc::new(MockScriptRunner::new());
        let executor = ActionExecutor::new(
            Arc::clone(&keyboard) as Arc<dyn KeyboardEmulator>,
            Arc::clone(&scripts) as Arc<dyn ScriptRunner>,
        )
        .with_settle_delay(Duration::ZERO);

        let records = Arc::new(Mutex::new(Vec::new()));
        let sink_records = Arc::clone(&records);
        let pipeline = Arc::new(
            DispatchPipeline::new(Arc::clone(&registry), executor).with_sink(Arc::new(
                move |record: &MessageRecord| sink_records.lock().unwrap().push(record.clone()),
            )),
        );

        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let listener =
            start_osc_listener(addr, pipeline, Arc::new(AtomicBool::new(false))).unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();

        Self {
            listener,
            registry,
            keyboard,
            scripts,
            records,
            sender,
        }
    }

    fn send(&self, packet: &OscPacket) {
        let bytes = rosc::encoder::encode(packet).unwrap();
        self.send_raw(&bytes);
    }

    fn send_raw(&self, bytes: &[u8]) {
        self.sender
            .send_to(bytes, self.listener.local_addr())
            .unwrap();
    }

    /// Waits until at least `count` records arrived, then returns them.
    fn wait_for_records(&self, count: usize) -> Vec<MessageRecord> {
        let deadline = Instant::now() + Duration::from_secs(3);
        loop {
            let records = self.records.lock().unwrap().clone();
            if records.len() >= count || Instant::now() > deadline {
                return records;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

fn message(addr: &str, args: &[&str]) -> OscPacket {
    OscPacket::Message(OscMessage {
        addr: addr.to_string(),
        args: args.iter().map(|a| OscType::String(a.to_string())).collect(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_builtin_address_presses_chord_over_udp() {
    // Arrange
    let h = Harness::start();

    // Act
    h.send(&message("/key/save", &[]));
    let records = h.wait_for_records(1);

    // Assert
    assert_eq!(records.len(), 1);
    assert!(records[0].outcome.is_success());
    assert_eq!(
        h.keyboard.pressed_keys(),
        vec![
            EmulatedKey::Modifier(Modifier::Command),
            EmulatedKey::Key(KeyToken::Char('s')),
        ]
    );
    // Every press is matched by a release.
    assert_eq!(h.keyboard.events.lock().unwrap().len(), 4);
    h.listener.stop();
}

#[test]
fn test_generic_address_with_single_string_argument() {
    let h = Harness::start();

    h.send(&message("/key", &["command shift z"]));
    let records = h.wait_for_records(1);

    assert_eq!(records[0].args, vec!["command", "shift", "z"]);
    assert_eq!(
        h.keyboard.pressed_keys(),
        vec![
            EmulatedKey::Modifier(Modifier::Command),
            EmulatedKey::Modifier(Modifier::Shift),
            EmulatedKey::Key(KeyToken::Char('z')),
        ]
    );
    h.listener.stop();
}

#[test]
fn test_window_chord_goes_to_script_runner() {
    let h = Harness::start();

    h.send(&message("/key", &["control", "option", "left"]));
    h.wait_for_records(1);

    let chords = h.scripts.chords.lock().unwrap().clone();
    assert_eq!(
        chords,
        vec![KeyCombination::from_tokens(&["control", "option", "left"]).unwrap()]
    );
    assert!(h.keyboard.events.lock().unwrap().is_empty());
    h.listener.stop();
}

#[test]
fn test_bundle_messages_are_each_dispatched() {
    // Arrange
    let h = Harness::start();
    let bundle = OscPacket::Bundle(OscBundle {
        timetag: OscTime::from((0, 1)),
        content: vec![message("/key/copy", &[]), message("/key/paste", &[])],
    });

    // Act
    h.send(&bundle);
    let records = h.wait_for_records(2);

    // Assert
    let addresses: Vec<&str> = records.iter().map(|r| r.address.as_str()).collect();
    assert_eq!(addresses, vec!["/key/copy", "/key/paste"]);
    h.listener.stop();
}

#[test]
fn test_unknown_address_sends_no_key_events() {
    let h = Harness::start();

    h.send(&message("/key/unknown_xyz", &[]));
    let records = h.wait_for_records(1);

    assert_eq!(
        records[0].outcome,
        MessageOutcome::Unresolved(UnresolvedReason::UnknownAddress)
    );
    assert!(h.keyboard.events.lock().unwrap().is_empty());
    h.listener.stop();
}

#[test]
fn test_garbage_datagram_does_not_stop_the_listener() {
    // Arrange
    let h = Harness::start();

    // Act
    h.send_raw(b"definitely not osc");
    h.send(&message("/key", &["f5"]));
    let records = h.wait_for_records(1);

    // Assert
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].address, "/key");
    assert!(h.listener.is_running());
    h.listener.stop();
}

#[test]
fn test_custom_shortcut_added_while_running_is_used_immediately() {
    // Arrange
    let h = Harness::start();
    let chord = KeyCombination::from_tokens(&["command", "space"]).unwrap();
    h.registry
        .upsert_custom("/key/spotlight", chord, "Spotlight")
        .unwrap();

    // Act
    h.send(&message("/key/spotlight", &[]));
    let records = h.wait_for_records(1);

    // Assert
    assert!(records[0].outcome.is_success());
    assert_eq!(
        h.keyboard.pressed_keys(),
        vec![
            EmulatedKey::Modifier(Modifier::Command),
            EmulatedKey::Key(KeyToken::Special(osckey_core::SpecialKey::Space)),
        ]
    );
    h.listener.stop();
}

#[test]
fn test_numeric_arguments_are_rendered_as_words() {
    let h = Harness::start();
    let packet = OscPacket::Message(OscMessage {
        addr: "/key".to_string(),
        args: vec![OscType::String("command".into()), OscType::Int(1)],
    });

    h.send(&packet);
    let records = h.wait_for_records(1);

    assert_eq!(records[0].args, vec!["command", "1"]);
    assert_eq!(
        h.keyboard.pressed_keys(),
        vec![
            EmulatedKey::Modifier(Modifier::Command),
            EmulatedKey::Key(KeyToken::Char('1')),
        ]
    );
    h.listener.stop();
}
