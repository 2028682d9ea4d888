//! Key position table
//!
//! Positions are Linux evdev scan codes, which gives every physical key on
//! a standard layout a small stable index for the heatmap.

use device_query::Keycode as DK;

/// (key, position, short label)
const KEY_TABLE: &[(DK, u32, &str)] = &[
    (DK::Escape, 1, "Esc"),
    (DK::Key1, 2, "1"),
    (DK::Key2, 3, "2"),
    (DK::Key3, 4, "3"),
    (DK::Key4, 5, "4"),
    (DK::Key5, 6, "5"),
    (DK::Key6, 7, "6"),
    (DK::Key7, 8, "7"),
    (DK::Key8, 9, "8"),
    (DK::Key9, 10, "9"),
    (DK::Key0, 11, "0"),
    (DK::Minus, 12, "-"),
    (DK::Equal, 13, "="),
    (DK::Backspace, 14, "Bksp"),
    (DK::Tab, 15, "Tab"),
    (DK::Q, 16, "Q"),
    (DK::W, 17, "W"),
    (DK::E, 18, "E"),
    (DK::R, 19, "R"),
    (DK::T, 20, "T"),
    (DK::Y, 21, "Y"),
    (DK::U, 22, "U"),
    (DK::I, 23, "I"),
    (DK::O, 24, "O"),
    (DK::P, 25, "P"),
    (DK::LeftBracket, 26, "["),
    (DK::RightBracket, 27, "]"),
    (DK::Enter, 28, "Enter"),
    (DK::LControl, 29, "LCtrl"),
    (DK::A, 30, "A"),
    (DK::S, 31, "S"),
    (DK::D, 32, "D"),
    (DK::F, 33, "F"),
    (DK::G, 34, "G"),
    (DK::H, 35, "H"),
    (DK::J, 36, "J"),
    (DK::K, 37, "K"),
    (DK::L, 38, "L"),
    (DK::Semicolon, 39, ";"),
    (DK::Apostrophe, 40, "'"),
    (DK::Grave, 41, "`"),
    (DK::LShift, 42, "LShift"),
    (DK::BackSlash, 43, "\\"),
    (DK::Z, 44, "Z"),
    (DK::X, 45, "X"),
    (DK::C, 46, "C"),
    (DK::V, 47, "V"),
    (DK::B, 48, "B"),
    (DK::N, 49, "N"),
    (DK::M, 50, "M"),
    (DK::Comma, 51, ","),
    (DK::Dot, 52, "."),
    (DK::Slash, 53, "/"),
    (DK::RShift, 54, "RShift"),
    (DK::NumpadMultiply, 55, "Num*"),
    (DK::LAlt, 56, "LAlt"),
    (DK::Space, 57, "Space"),
    (DK::CapsLock, 58, "Caps"),
    (DK::F1, 59, "F1"),
    (DK::F2, 60, "F2"),
    (DK::F3, 61, "F3"),
    (DK::F4, 62, "F4"),
    (DK::F5, 63, "F5"),
    (DK::F6, 64, "F6"),
    (DK::F7, 65, "F7"),
    (DK::F8, 66, "F8"),
    (DK::F9, 67, "F9"),
    (DK::F10, 68, "F10"),
    (DK::Numpad7, 71, "Num7"),
    (DK::Numpad8, 72, "Num8"),
    (DK::Numpad9, 73, "Num9"),
    (DK::NumpadSubtract, 74, "Num-"),
    (DK::Numpad4, 75, "Num4"),
    (DK::Numpad5, 76, "Num5"),
    (DK::Numpad6, 77, "Num6"),
    (DK::NumpadAdd, 78, "Num+"),
    (DK::Numpad1, 79, "Num1"),
    (DK::Numpad2, 80, "Num2"),
    (DK::Numpad3, 81, "Num3"),
    (DK::Numpad0, 82, "Num0"),
    (DK::F11, 87, "F11"),
    (DK::F12, 88, "F12"),
    (DK::RControl, 97, "RCtrl"),
    (DK::NumpadDivide, 98, "Num/"),
    (DK::RAlt, 100, "RAlt"),
    (DK::Home, 102, "Home"),
    (DK::Up, 103, "Up"),
    (DK::PageUp, 104, "PgUp"),
    (DK::Left, 105, "Left"),
    (DK::Right, 106, "Right"),
    (DK::End, 107, "End"),
    (DK::Down, 108, "Down"),
    (DK::PageDown, 109, "PgDn"),
    (DK::Insert, 110, "Ins"),
    (DK::Delete, 111, "Del"),
    (DK::LMeta, 125, "LMeta"),
    (DK::RMeta, 126, "RMeta"),
];

/// Heatmap position for a key, or `None` for keys without a fixed slot
pub fn key_position(key: DK) -> Option<u32> {
    KEY_TABLE
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, position, _)| *position)
}

/// Short display label for a position
pub fn key_label(position: u32) -> &'static str {
    KEY_TABLE
        .iter()
        .find(|(_, p, _)| *p == position)
        .map(|(_, _, label)| *label)
        .unwrap_or("?")
}
