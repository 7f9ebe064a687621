//! Groups vocabulary into fixed-size study cycles with lag-1 review.

use std::collections::HashSet;

use log::debug;
use rand::Rng;

use crate::lesson_engine::{
    models::{Cycle, Dialogue, Question, Word},
    shuffle::pick,
};

/// Contiguous chunks of `size` words in original order. Always at least one
/// chunk, even for an empty vocabulary.
pub fn chunk_words(words: &[Word], size: usize) -> Vec<&[Word]> {
    if words.is_empty() {
        return vec![words];
    }
    words.chunks(size.max(1)).collect()
}

/// Questions whose resolved answer is the Finnish form of a word in `words`.
pub fn questions_for_words(questions: &[Question], words: &[Word]) -> Vec<Question> {
    let keys: HashSet<String> = words.iter().map(Word::key).collect();
    questions
        .iter()
        .filter(|q| keys.contains(&q.dedup_key()))
        .cloned()
        .collect()
}

/// Build the session's cycles.
///
/// Cycle `i > 0` gets one review word drawn uniformly from chunk `i - 1`,
/// unless that word already appears in chunk `i`. Dialogues attach by index.
pub fn partition<R: Rng>(
    rng: &mut R,
    words: &[Word],
    cycle_size: usize,
    questions: &[Question],
    dialogues: &[Dialogue],
) -> Vec<Cycle> {
    let chunks = chunk_words(words, cycle_size);
    let mut cycles = Vec::with_capacity(chunks.len());

    for (i, chunk) in chunks.iter().enumerate() {
        let mut cycle_words: Vec<Word> = chunk.to_vec();
        let new_word_count = cycle_words.len();

        if i > 0 {
            if let Some(review) = pick(rng, chunks[i - 1]) {
                let key = review.key();
                if cycle_words.iter().any(|w| w.key() == key) {
                    debug!("cycle {i}: review word '{}' already present, skipped", review.finnish);
                } else {
                    cycle_words.push(review.clone());
                }
            }
        }

        cycles.push(Cycle {
            questions: questions_for_words(questions, &cycle_words),
            words: cycle_words,
            new_word_count,
            dialogue: dialogues.get(i).cloned(),
        });
    }

    debug!("partitioned {} words into {} cycles of {}", words.len(), cycles.len(), cycle_size);
    cycles
}
