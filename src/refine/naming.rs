//! County place names.
//!
//! Names are either a compound of prefix and suffix ("Ashford") or a short
//! syllable stem with an optional suffix ("Bramwick"). The stream is seeded
//! from the session generator, so a seed always yields the same names.

use std::collections::HashSet;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

const PREFIXES: &[&str] = &[
    "Ash", "Black", "Bram", "Cold", "Elder", "Fair", "Glen", "Green", "Hart", "High",
    "Kings", "Long", "Mar", "North", "Oak", "Red", "Salt", "Stone", "Thorn", "West",
];
const SUFFIXES: &[&str] = &[
    "ford", "wick", "ham", "ton", "mere", "dale", "moor", "field", "by", "stead",
    "haven", "bury", "holm", "wold",
];
const ONSETS: &[&str] = &[
    "b", "br", "c", "d", "dr", "f", "g", "h", "k", "l", "m", "n", "p", "r", "s", "st", "t", "th",
    "w",
];
const VOWELS: &[&str] = &["a", "e", "i", "o", "u", "ae", "ea", "ow"];
const CODAS: &[&str] = &["d", "l", "ll", "m", "n", "nd", "r", "rn", "s", "t", "x"];

/// Compound names are drawn with this probability.
const COMPOUND_CHANCE: f64 = 0.6;
/// Attempts before a numeral is appended to force uniqueness.
const MAX_ATTEMPTS: usize = 32;

/// Deterministic generator of county names, unique within one map.
pub struct CountyNamer {
    rng: ChaCha8Rng,
    used: HashSet<String>,
}

impl CountyNamer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            used: HashSet::new(),
        }
    }

    /// Seed a namer from the next draw of another stream.
    pub fn from_stream(source: &mut impl RngCore) -> Self {
        Self::new(source.next_u64())
    }

    pub fn next_name(&mut self) -> String {
        for _ in 0..MAX_ATTEMPTS {
            let name = place_name(&mut self.rng);
            if self.used.insert(name.clone()) {
                return name;
            }
        }

        let base = place_name(&mut self.rng);
        let mut n = 2;
        loop {
            let name = format!("{base} {}", roman(n));
            if self.used.insert(name.clone()) {
                return name;
            }
            n += 1;
        }
    }
}

fn pick<'a>(rng: &mut impl Rng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn place_name(rng: &mut impl Rng) -> String {
    if rng.gen_bool(COMPOUND_CHANCE) {
        return format!("{}{}", pick(rng, PREFIXES), pick(rng, SUFFIXES));
    }

    let mut stem = String::new();
    for i in 0..rng.gen_range(1..=2) {
        if i == 0 || rng.gen_bool(0.5) {
            stem.push_str(pick(rng, ONSETS));
        }
        stem.push_str(pick(rng, VOWELS));
        if rng.gen_bool(0.5) {
            stem.push_str(pick(rng, CODAS));
        }
    }
    if rng.gen_bool(0.5) {
        stem.push_str(pick(rng, SUFFIXES));
    }
    capitalize(&stem)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn roman(mut n: u32) -> String {
    #[rustfmt::skip]
    const NUMERALS: [(u32, &str); 9] = [
        (100, "C"), (90, "XC"), (50, "L"), (40, "XL"),
        (10, "X"), (9, "IX"), (5, "V"), (4, "IV"), (1, "I"),
    ];
    let mut out = String::new();
    for (value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}
