//! Translation of SDL events into [`InputEvent`]s.

use gltut_core::frame::{InputEvent, Key};
use sdl2::{event::Event, keyboard::Keycode};

fn translate_key(keycode: Keycode) -> Key {
    match keycode {
        Keycode::Escape => Key::Escape,
        Keycode::Num1 | Keycode::Kp1 => Key::Digit(1),
        Keycode::Num2 | Keycode::Kp2 => Key::Digit(2),
        Keycode::Num3 | Keycode::Kp3 => Key::Digit(3),
        Keycode::Num4 | Keycode::Kp4 => Key::Digit(4),
        _ => Key::Other,
    }
}

/// Returns `None` for events the frame loop ignores, including key repeats.
pub fn translate(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Quit { .. } => Some(InputEvent::CloseRequested),
        Event::KeyDown {
            keycode: Some(keycode),
            repeat: false,
            ..
        } => match translate_key(*keycode) {
            Key::Other => None,
            key => Some(InputEvent::KeyPressed(key)),
        },
        _ => None,
    }
}
