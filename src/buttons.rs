//! Physical-button collaborator
//!
//! Hardware buttons emulate the keyboard: each pin is mapped 1:1 onto the
//! key code of the control it drives, so the simulation never learns whether
//! a press came from a key or a button.
//!
//! Button callbacks run in a foreign callback context. They must not block
//! and must not touch game state directly; [`ButtonBridge`] gives them a
//! fire-and-forget channel send, and the simulation thread drains the
//! receiving end once per tick.

use std::env;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::input::{self, ButtonEvent, KeyCode};

/// Pin identifiers for the four paddle controls, configurable through the
/// environment (`LEFT_UP`, `LEFT_DOWN`, `RIGHT_UP`, `RIGHT_DOWN`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinConfig {
    pub left_up: String,
    pub left_down: String,
    pub right_up: String,
    pub right_down: String,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            left_up: "22".to_string(),
            left_down: "24".to_string(),
            right_up: "27".to_string(),
            right_down: "23".to_string(),
        }
    }
}

impl PinConfig {
    /// Read pin names from the environment, falling back to the defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let defaults = Self::default();
        Self {
            left_up: lookup("LEFT_UP").unwrap_or(defaults.left_up),
            left_down: lookup("LEFT_DOWN").unwrap_or(defaults.left_down),
            right_up: lookup("RIGHT_UP").unwrap_or(defaults.right_up),
            right_down: lookup("RIGHT_DOWN").unwrap_or(defaults.right_down),
        }
    }

    /// Key code a pin emulates, or None for an unconfigured pin
    pub fn key_for_pin(&self, pin: &str) -> Option<KeyCode> {
        if pin == self.left_up {
            Some(input::LEFT_UP)
        } else if pin == self.left_down {
            Some(input::LEFT_DOWN)
        } else if pin == self.right_up {
            Some(input::RIGHT_UP)
        } else if pin == self.right_down {
            Some(input::RIGHT_DOWN)
        } else {
            None
        }
    }
}

/// Sending half handed to button callbacks. Cloneable so each of the four
/// buttons gets its own handle.
#[derive(Debug, Clone)]
pub struct ButtonBridge {
    tx: Sender<ButtonEvent>,
}

impl ButtonBridge {
    /// Create the bridge and the receiver the simulation thread drains
    pub fn channel() -> (Self, Receiver<ButtonEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    /// Non-blocking; a send after the game loop exits is silently dropped
    pub fn press(&self, key: KeyCode) {
        let _ = self.tx.send(ButtonEvent::pressed(key));
    }

    pub fn release(&self, key: KeyCode) {
        let _ = self.tx.send(ButtonEvent::released(key));
    }
}

/// Level-to-edge converter for one polled button. Hardware lines report a
/// level on every poll; the bridge wants transitions.
#[derive(Debug, Default)]
pub struct EdgeDetector {
    pressed: bool,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one level sample, sending an event on each transition
    pub fn update(&mut self, active: bool, key: KeyCode, bridge: &ButtonBridge) {
        if active != self.pressed {
            self.pressed = active;
            if active {
                bridge.press(key);
            } else {
                bridge.release(key);
            }
        }
    }
}

/// Raspberry Pi pin backend, enabled with the `gpio` cargo feature. Claims
/// the four configured pins and polls them on a dedicated thread; button
/// transitions reach the game through the bridge like any keyboard event.
#[cfg(feature = "gpio")]
pub mod gpio {
    use std::thread;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use rppal::gpio::{Gpio, InputPin};

    use super::{ButtonBridge, EdgeDetector, PinConfig};
    use crate::input::KeyCode;

    /// Poll period of the pin-reading thread; several samples per game tick
    const POLL_INTERVAL: Duration = Duration::from_millis(5);

    /// Claim the configured pins and spawn the polling thread
    pub fn attach(config: &PinConfig, bridge: ButtonBridge) -> Result<()> {
        let gpio = Gpio::new().context("opening GPIO peripheral")?;
        let mut pins: Vec<(InputPin, KeyCode)> = Vec::new();
        for name in [
            &config.left_up,
            &config.left_down,
            &config.right_up,
            &config.right_down,
        ] {
            let key = config
                .key_for_pin(name)
                .context("pin lost its key mapping")?;
            let number: u8 = name
                .parse()
                .with_context(|| format!("invalid pin number {name:?}"))?;
            let pin = gpio
                .get(number)
                .with_context(|| format!("claiming pin {number}"))?
                .into_input_pullup();
            pins.push((pin, key));
        }
        thread::spawn(move || poll(pins, bridge));
        Ok(())
    }

    fn poll(pins: Vec<(InputPin, KeyCode)>, bridge: ButtonBridge) {
        let mut edges: Vec<EdgeDetector> = pins.iter().map(|_| EdgeDetector::new()).collect();
        loop {
            for ((pin, key), edge) in pins.iter().zip(&mut edges) {
                // Pull-up wiring: a pressed button pulls its line low
                edge.update(pin.is_low(), *key, &bridge);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ButtonState;

    #[test]
    fn test_pin_defaults() {
        let config = PinConfig::from_lookup(|_| None);
        assert_eq!(config, PinConfig::default());
        assert_eq!(config.left_up, "22");
        assert_eq!(config.right_down, "23");
    }

    #[test]
    fn test_pin_overrides() {
        let config = PinConfig::from_lookup(|name| match name {
            "LEFT_UP" => Some("5".to_string()),
            _ => None,
        });
        assert_eq!(config.left_up, "5");
        assert_eq!(config.left_down, "24");
    }

    #[test]
    fn test_pin_to_key_mapping() {
        let config = PinConfig::default();
        assert_eq!(config.key_for_pin("22"), Some(input::LEFT_UP));
        assert_eq!(config.key_for_pin("24"), Some(input::LEFT_DOWN));
        assert_eq!(config.key_for_pin("27"), Some(input::RIGHT_UP));
        assert_eq!(config.key_for_pin("23"), Some(input::RIGHT_DOWN));
        assert_eq!(config.key_for_pin("99"), None);
    }

    #[test]
    fn test_edge_detector_reports_each_transition_once() {
        let (bridge, rx) = ButtonBridge::channel();
        let config = PinConfig::default();
        let key = config.key_for_pin("27").unwrap();

        // Held across several polls, then released across several polls
        let mut edge = EdgeDetector::new();
        for level in [false, true, true, true, false, false] {
            edge.update(level, key, &bridge);
        }

        let events: Vec<ButtonEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![ButtonEvent::pressed(key), ButtonEvent::released(key)]
        );
    }

    #[test]
    fn test_bridge_delivers_in_order() {
        let (bridge, rx) = ButtonBridge::channel();
        let clone = bridge.clone();
        bridge.press(input::LEFT_UP);
        clone.release(input::LEFT_UP);

        let events: Vec<ButtonEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                ButtonEvent::pressed(input::LEFT_UP),
                ButtonEvent {
                    key: input::LEFT_UP,
                    state: ButtonState::Released
                },
            ]
        );
    }
}
