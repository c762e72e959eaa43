//! Sprite tables
//!
//! Every sprite matches its hit box: the runner is 8x6, obstacles use
//! [`ObstacleKind::dimensions`]. Spaces are transparent.

use crate::sim::ObstacleKind;

type Sprite = &'static [&'static str];

// === Runner ===

const RUNNER_BODY_ASCII: [&str; 4] = [
    "    ___ ",
    "   / o_)",
    "_  | |  ",
    "\\\\_/ |_ ",
];

const RUNNER_LEGS_ASCII: [[&str; 2]; 4] = [
    ["  \\__/  ", "  /  \\  "],
    ["  \\__/  ", "  |  \\  "],
    ["  \\__/  ", "  |  |  "],
    ["  \\__/  ", "  /  |  "],
];

const RUNNER_JUMP_LEGS_ASCII: [&str; 2] = ["  \\__/  ", "  -  -  "];

const RUNNER_BODY_UNICODE: [&str; 4] = [
    "    ▄██▄",
    "    █▀██",
    "▄  ▄███ ",
    "▀█████▀ ",
];

const RUNNER_LEGS_UNICODE: [[&str; 2]; 4] = [
    ["  ▀██▀  ", "  ▌  ▐  "],
    ["  ▀██▀  ", "  ▐  ▐  "],
    ["  ▀██▀  ", "  ▐  ▌  "],
    ["  ▀██▀  ", "  ▌  ▌  "],
];

const RUNNER_JUMP_LEGS_UNICODE: [&str; 2] = ["  ▀██▀  ", "  ▀  ▀  "];

/// Runner rows for an animation frame. Legs freeze while airborne.
pub fn runner(frame: u8, jumping: bool, unicode: bool) -> [&'static str; 6] {
    let (body, legs) = if unicode {
        let legs = if jumping {
            RUNNER_JUMP_LEGS_UNICODE
        } else {
            RUNNER_LEGS_UNICODE[frame as usize % RUNNER_LEGS_UNICODE.len()]
        };
        (RUNNER_BODY_UNICODE, legs)
    } else {
        let legs = if jumping {
            RUNNER_JUMP_LEGS_ASCII
        } else {
            RUNNER_LEGS_ASCII[frame as usize % RUNNER_LEGS_ASCII.len()]
        };
        (RUNNER_BODY_ASCII, legs)
    };
    [body[0], body[1], body[2], body[3], legs[0], legs[1]]
}

// === Obstacles ===

const CACTUS_SMALL_ASCII: Sprite = &["(|)", " |)", " | "];
const CACTUS_MEDIUM_ASCII: Sprite = &[" | ", "(|)", "(|)", " | "];
const CACTUS_LARGE_ASCII: Sprite = &["  |  ", "| | |", "|_|_|", "  |  ", "  |  "];
const BIRD_ASCII: [Sprite; 2] = [&["\\v/ ", " <o="], &["    ", "/<o\\"]];

const CACTUS_SMALL_UNICODE: Sprite = &["▗█▖", "▐█▌", " █ "];
const CACTUS_MEDIUM_UNICODE: Sprite = &[" █ ", "▐█▌", "▝█▘", " █ "];
const CACTUS_LARGE_UNICODE: Sprite = &["  █  ", "█ █ █", "▀███▀", "  █  ", "  █  "];
const BIRD_UNICODE: [Sprite; 2] = [&["▚ ▞ ", " ▀█▄"], &["    ", "▄▀█▄"]];

pub fn obstacle(kind: ObstacleKind, frame: u8, unicode: bool) -> Sprite {
    let bird_frame = frame as usize % 2;
    match (kind, unicode) {
        (ObstacleKind::CactusSmall, false) => CACTUS_SMALL_ASCII,
        (ObstacleKind::CactusMedium, false) => CACTUS_MEDIUM_ASCII,
        (ObstacleKind::CactusLarge, false) => CACTUS_LARGE_ASCII,
        (ObstacleKind::CactusSmall, true) => CACTUS_SMALL_UNICODE,
        (ObstacleKind::CactusMedium, true) => CACTUS_MEDIUM_UNICODE,
        (ObstacleKind::CactusLarge, true) => CACTUS_LARGE_UNICODE,
        (_, false) => BIRD_ASCII[bird_frame],
        (_, true) => BIRD_UNICODE[bird_frame],
    }
}

// === Scenery ===

const CLOUDS_ASCII: [Sprite; 3] = [
    &["    .-~~~-.    ", "  .-~       ~-."],
    &["  .-~~~-.  ", " (       ) "],
    &["    .---.    ", "  .-~     ~-.", " (           )"],
];

const CLOUDS_UNICODE: [Sprite; 3] = [
    &["  ☁☁☁☁☁☁☁☁  ", "☁☁☁☁☁☁☁☁☁☁☁☁"],
    &["   ☁☁☁☁☁☁   ", "☁☁☁☁☁☁☁☁☁☁☁☁"],
    &["    ☁☁☁☁    ", "  ☁☁☁☁☁☁☁☁  ", "☁☁☁☁☁☁☁☁☁☁☁☁"],
];

pub fn cloud(variant: u8, unicode: bool) -> Sprite {
    let i = variant as usize % CLOUDS_ASCII.len();
    if unicode {
        CLOUDS_UNICODE[i]
    } else {
        CLOUDS_ASCII[i]
    }
}

/// Ground surface character
pub fn ground(unicode: bool) -> char {
    if unicode { '▀' } else { '=' }
}

/// Hill outline character for a column, from the neighbours' heights
pub fn hill(left: f32, here: f32, right: f32) -> char {
    let rising = right.round() > here.round();
    let falling = left.round() > here.round();
    match (rising, falling) {
        (true, false) => '/',
        (false, true) => '\\',
        _ => '_',
    }
}
