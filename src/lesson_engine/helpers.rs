//! Render-time builders shared by the interaction screens.
//!
//! The engine hands out questions and dialogues as plain data; the pieces a
//! screen needs on top of that (word tiles for sentence assembly, option sets
//! for the learner's dialogue turns) are computed lazily here, from the
//! lesson vocabulary plus small fixed pools.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::lesson_engine::{
    evaluator::normalize,
    models::{Dialogue, Turn, Word},
    shuffle::{sample, shuffled},
};

/// Short function words mixed into assembly tiles as extra distractors.
pub const FILLER_WORDS: [&str; 6] = ["ja", "on", "ei", "se", "myös", "mutta"];

/// Generic replies used as decoys on the learner's dialogue turns.
pub const DIALOGUE_DECOYS: [&str; 10] = [
    "Kiitos, hyvää.",
    "En tiedä.",
    "Anteeksi, en ymmärrä.",
    "Hei hei!",
    "Mitä kuuluu?",
    "Kyllä, kiitos.",
    "Ei kiitos.",
    "Hyvää päivää!",
    "Nähdään huomenna.",
    "Puhutko englantia?",
];

/// Vocabulary words mixed into assembly tiles.
pub const VOCAB_TILE_DISTRACTORS: usize = 3;
/// Filler words mixed into assembly tiles.
pub const FILLER_TILE_DISTRACTORS: usize = 2;

/// Word tiles for an assemble question: the target split on whitespace, plus
/// vocabulary and filler distractors that do not already occur in the target.
pub fn assemble_tiles<R: Rng>(rng: &mut R, target: &str, words: &[Word]) -> Vec<String> {
    let target_tiles: Vec<String> = target.split_whitespace().map(str::to_string).collect();
    let mut taken: HashSet<String> = target_tiles
        .iter()
        .map(|t| normalize(t.trim_matches(|c: char| c.is_ascii_punctuation())))
        .collect();

    let vocab: Vec<String> = words
        .iter()
        .map(|w| w.finnish.trim())
        .filter(|w| !w.is_empty() && !w.contains(char::is_whitespace))
        .filter(|w| taken.insert(normalize(w)))
        .map(str::to_string)
        .collect();
    let fillers: Vec<String> = FILLER_WORDS
        .iter()
        .filter(|w| taken.insert(normalize(w)))
        .map(|w| w.to_string())
        .collect();

    let mut tiles = target_tiles;
    tiles.extend(sample(rng, &vocab, VOCAB_TILE_DISTRACTORS));
    tiles.extend(sample(rng, &fillers, FILLER_TILE_DISTRACTORS));
    shuffled(rng, tiles)
}

/// One line of a mini-dialogue as the screen plays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "turn", rename_all = "kebab-case")]
pub enum DialogueStep {
    Interlocutor {
        speaker: String,
        line: String,
        translation: String,
    },
    User {
        speaker: String,
        correct: String,
        options: Vec<String>,
        translation: String,
    },
}

/// Steps for a dialogue. Learner turns offer the real line plus decoys from
/// [`DIALOGUE_DECOYS`], `option_count` options in total, shuffled.
pub fn dialogue_steps<R: Rng>(rng: &mut R, dialogue: &Dialogue, option_count: usize) -> Vec<DialogueStep> {
    dialogue
        .lines
        .iter()
        .enumerate()
        .map(|(i, l)| match Dialogue::turn_of(i) {
            Turn::Interlocutor => DialogueStep::Interlocutor {
                speaker: l.speaker.clone(),
                line: l.line.clone(),
                translation: l.translation.clone(),
            },
            Turn::User => {
                let correct = l.line.trim().to_string();
                let key = normalize(&correct);
                let decoys: Vec<String> = DIALOGUE_DECOYS
                    .iter()
                    .filter(|d| normalize(d) != key)
                    .map(|d| d.to_string())
                    .collect();
                let mut options = sample(rng, &decoys, option_count.saturating_sub(1));
                options.push(correct.clone());
                DialogueStep::User {
                    speaker: l.speaker.clone(),
                    correct,
                    options: shuffled(rng, options),
                    translation: l.translation.clone(),
                }
            }
        })
        .collect()
}
