//! The catalog a fresh install starts with.

use crate::types::Record;

const STARTER: &[(&str, &str, &str, &str)] = &[
    ("😀", "Grinning Face", "A typical smiley face.", "happiness"),
    (
        "😕",
        "Confused Face",
        "A confused, puzzled face.",
        "unsure what to think; displeasure",
    ),
    (
        "😍",
        "Heart Eyes",
        "A smiley face with hearts for eyes.",
        "love of something; attractive",
    ),
    (
        "🧑‍💻",
        "Developer",
        "A person working on a MacBook (probably using Xcode to write iOS apps in Swift).",
        "apps, software, programming",
    ),
    ("🐢", "Turtle", "A cute turtle.", "Something slow"),
    ("🐘", "Elephant", "A gray elephant.", "good memory"),
    ("🍝", "Spaghetti", "A plate of spaghetti.", "spaghetti"),
    ("🎲", "Die", "A single die.", "taking a risk, chance; game"),
    ("⛺️", "Tent", "A small tent.", "camping"),
    (
        "📚",
        "Stack of Books",
        "Three colored books stacked on each other.",
        "homework, studying",
    ),
    ("💔", "Broken Heart", "A red, broken heart.", "extreme sadness"),
    ("💤", "Snore", "Three blue 'z's.", "tired, sleepiness"),
    (
        "🏁",
        "Checkered Flag",
        "A black-and-white checkered flag.",
        "completion",
    ),
];

/// Returns the starter records in their original order.
pub fn starter_catalog() -> Vec<Record> {
    STARTER
        .iter()
        .map(|&(symbol, name, description, usage)| Record::new(symbol, name, description, usage))
        .collect()
}
