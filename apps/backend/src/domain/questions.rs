//! Arithmetic quiz generator for Question tiles.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A multiple-choice question. `correct_index` never leaves the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_index: usize,
}

pub const CHOICE_COUNT: usize = 4;

/// `a op b` with operands 1..=12 and op in {+, -, x}; three distinct wrong
/// answers near the right one, shuffled together.
pub fn generate_question(rng: &mut impl Rng) -> Question {
    let a: i32 = rng.random_range(1..=12);
    let b: i32 = rng.random_range(1..=12);
    let (symbol, answer) = match rng.random_range(0..3) {
        0 => ('+', a + b),
        1 => ('-', a - b),
        _ => ('×', a * b),
    };

    let mut values = vec![answer];
    while values.len() < CHOICE_COUNT {
        let delta: i32 = rng.random_range(1..=5);
        let candidate = if rng.random_bool(0.5) {
            answer + delta
        } else {
            answer - delta
        };
        if !values.contains(&candidate) {
            values.push(candidate);
        }
    }
    values.shuffle(rng);

    let correct_index = values.iter().position(|&v| v == answer).unwrap_or(0);
    Question {
        prompt: format!("{a} {symbol} {b} = ?"),
        choices: values.iter().map(|v| v.to_string()).collect(),
        correct_index,
    }
}
