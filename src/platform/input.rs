//! Keyboard input
//!
//! Key events are folded into an `InputState`; the engine reads it once per
//! update through an `InputBinding`, never from inside the player.

use crate::sim::TickInput;

/// Horizontal movement direction for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Map a `KeyboardEvent.key` value to a direction
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// Currently held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// Returns true if the key is a movement key
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set(key, true)
    }

    /// Returns true if the key is a movement key
    pub fn key_up(&mut self, key: &str) -> bool {
        self.set(key, false)
    }

    fn set(&mut self, key: &str, held: bool) -> bool {
        match direction_for_key(key) {
            Some(Direction::Left) => self.left = held,
            Some(Direction::Right) => self.right = held,
            None => return false,
        }
        true
    }

    /// Drop all held keys (focus lost, key-up never arrives)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    pub fn intent(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
        }
    }
}

/// A source of movement intent with listeners that must be released
pub trait InputBinding {
    fn intent(&self) -> TickInput;

    /// Remove any registered listeners
    fn detach(&mut self);
}

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use super::{InputBinding, InputState};
    use crate::sim::TickInput;

    type KeyListener = Closure<dyn FnMut(KeyboardEvent)>;

    /// `keydown`/`keyup` listeners on the window
    pub struct KeyboardBinding {
        window: web_sys::Window,
        state: Rc<RefCell<InputState>>,
        listeners: Option<(KeyListener, KeyListener)>,
    }

    impl KeyboardBinding {
        pub fn attach(window: &web_sys::Window) -> Result<Self, JsValue> {
            let state = Rc::new(RefCell::new(InputState::default()));

            let down_state = state.clone();
            let on_key_down = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if down_state.borrow_mut().key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", on_key_down.as_ref().unchecked_ref())?;

            let up_state = state.clone();
            let on_key_up = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                up_state.borrow_mut().key_up(&event.key());
            });
            window.add_event_listener_with_callback("keyup", on_key_up.as_ref().unchecked_ref())?;

            Ok(Self {
                window: window.clone(),
                state,
                listeners: Some((on_key_down, on_key_up)),
            })
        }

        /// Shared handle for the driver (e.g. to release keys on blur)
        pub fn state(&self) -> Rc<RefCell<InputState>> {
            self.state.clone()
        }
    }

    impl InputBinding for KeyboardBinding {
        fn intent(&self) -> TickInput {
            self.state.borrow().intent()
        }

        fn detach(&mut self) {
            if let Some((on_key_down, on_key_up)) = self.listeners.take() {
                let _ = self
                    .window
                    .remove_event_listener_with_callback("keydown", on_key_down.as_ref().unchecked_ref());
                let _ = self
                    .window
                    .remove_event_listener_with_callback("keyup", on_key_up.as_ref().unchecked_ref());
                log::debug!("Keyboard listeners removed");
            }
        }
    }

    impl Drop for KeyboardBinding {
        fn drop(&mut self) {
            self.detach();
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::KeyboardBinding;
