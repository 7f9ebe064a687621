//! Question synthesis: derives practice questions from vocabulary and
//! normalizes the lesson's static questions.
//!
//! Every function here is total. Content that cannot produce a sensible
//! question (no example sentence, empty options, an index pointing nowhere)
//! yields `None` and is silently dropped by the lesson-level builders.

use std::collections::HashSet;

use log::debug;
use rand::Rng;

use crate::lesson_engine::{
    config::SessionConfig,
    evaluator::{blank_out, normalize},
    models::{Lesson, Question, QuestionKind, RawCorrect, RawQuestion, RawQuestionType, Word},
    shuffle::{sample, shuffled},
};

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Distinct values of `field` across `pool`, skipping anything equal to `exclude`.
fn distractors<F>(pool: &[Word], exclude: &str, field: F) -> Vec<String>
where
    F: Fn(&Word) -> &str,
{
    let mut seen = HashSet::new();
    seen.insert(normalize(exclude));
    pool.iter()
        .map(|w| field(w).trim())
        .filter(|s| !s.is_empty() && seen.insert(normalize(s)))
        .map(str::to_string)
        .collect()
}

/// Correct answer plus up to `option_count - 1` sampled distractors, shuffled.
/// `None` when there is nothing to distract with.
fn options_with<R: Rng>(
    rng: &mut R,
    correct: &str,
    candidates: &[String],
    option_count: usize,
) -> Option<Vec<String>> {
    let picked = sample(rng, candidates, option_count.saturating_sub(1));
    if picked.is_empty() {
        return None;
    }
    let mut options = picked;
    options.push(correct.to_string());
    Some(shuffled(rng, options))
}

/// Four-option question asking for the Finnish form of a Russian word.
pub fn synthesize_choice_question<R: Rng>(
    rng: &mut R,
    word: &Word,
    pool: &[Word],
    option_count: usize,
) -> Option<Question> {
    if is_blank(&word.finnish) || is_blank(&word.russian) {
        return None;
    }
    let correct = word.finnish.trim();
    let candidates = distractors(pool, correct, |w| w.finnish.as_str());
    let options = options_with(rng, correct, &candidates, option_count)?;
    Some(Question::Choice {
        question: format!("Как будет «{}» по-фински?", word.russian.trim()),
        correct: correct.to_string(),
        options,
        translation: None,
    })
}

/// Sentence-assembly question targeting the word's full example sentence.
///
/// Tiles are not pre-populated; see [`crate::lesson_engine::helpers::assemble_tiles`].
pub fn synthesize_assemble_question(word: &Word) -> Option<Question> {
    let example = word.example_sentence.as_ref()?;
    if is_blank(&example.finnish) {
        return None;
    }
    let translation = (!is_blank(&example.russian)).then(|| example.russian.trim().to_string());
    Some(Question::Assemble {
        question: match &translation {
            Some(ru) => format!("Соберите предложение: «{ru}»"),
            None => "Соберите предложение".to_string(),
        },
        correct: example.finnish.trim().to_string(),
        translation,
    })
}

/// Blanks the word out of its own example sentence and offers it among distractors.
pub fn synthesize_fill_in_question<R: Rng>(
    rng: &mut R,
    word: &Word,
    pool: &[Word],
    option_count: usize,
) -> Option<Question> {
    let example = word.example_sentence.as_ref()?;
    if is_blank(&word.finnish) {
        return None;
    }
    let blanked = blank_out(&example.finnish, &word.finnish)?;
    let correct = word.finnish.trim();
    let candidates = distractors(pool, correct, |w| w.finnish.as_str());
    let options = options_with(rng, correct, &candidates, option_count)?;
    Some(Question::FillInChoice {
        question: blanked.trim().to_string(),
        correct: correct.to_string(),
        options,
        translation: (!is_blank(&example.russian)).then(|| example.russian.trim().to_string()),
    })
}

/// Listening question: the Finnish word is spoken, the learner picks its meaning.
pub fn synthesize_audio_question<R: Rng>(
    rng: &mut R,
    word: &Word,
    pool: &[Word],
    option_count: usize,
) -> Option<Question> {
    if is_blank(&word.finnish) || is_blank(&word.russian) {
        return None;
    }
    let correct = word.russian.trim();
    let candidates = distractors(pool, correct, |w| w.russian.as_str());
    let options = options_with(rng, correct, &candidates, option_count)?;
    Some(Question::AudioChoice {
        question: "Прослушайте и выберите перевод".to_string(),
        audio: word.finnish.trim().to_string(),
        correct: correct.to_string(),
        options,
    })
}

/// Options for a choice-like static question, with `correct` guaranteed present.
fn resolve_options<R: Rng>(rng: &mut R, options: &[String], correct: &str) -> Option<Vec<String>> {
    if options.is_empty() {
        return None;
    }
    let mut opts = options.to_vec();
    if !opts.iter().any(|o| o == correct) {
        opts.push(correct.to_string());
    }
    Some(shuffled(rng, opts))
}

/// Resolve a static question into its typed form.
///
/// Numeric `correct` values are looked up in `options`; a resolved literal
/// missing from `options` is appended; options are shuffled.
pub fn normalize_static_question<R: Rng>(rng: &mut R, raw: &RawQuestion) -> Option<Question> {
    let options: Vec<String> = raw
        .options
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    let correct = match raw.correct.as_ref()? {
        RawCorrect::Index(i) => raw.options.get(*i)?.trim().to_string(),
        RawCorrect::Text(s) => s.trim().to_string(),
        RawCorrect::Other(_) => return None,
    };
    if correct.is_empty() || is_blank(&raw.question) {
        return None;
    }
    let question = raw.question.trim().to_string();
    let translation = raw.translation.clone().filter(|t| !is_blank(t));

    match raw.kind {
        RawQuestionType::Choice => Some(Question::Choice {
            question,
            options: resolve_options(rng, &options, &correct)?,
            correct,
            translation,
        }),
        RawQuestionType::FillInChoice => Some(Question::FillInChoice {
            question,
            options: resolve_options(rng, &options, &correct)?,
            correct,
            translation,
        }),
        RawQuestionType::AudioChoice => Some(Question::AudioChoice {
            audio: raw.audio.clone().filter(|a| !is_blank(a))?,
            question,
            options: resolve_options(rng, &options, &correct)?,
            correct,
        }),
        RawQuestionType::Translate => Some(Question::Assemble { question, correct, translation }),
        RawQuestionType::FillIn => Some(Question::FillIn { question, correct, translation }),
        RawQuestionType::Unknown => None,
    }
}

/// Keep the first question for each distinct resolved answer, in input order.
pub fn deduplicate(questions: Vec<Question>) -> Vec<Question> {
    let mut seen = HashSet::new();
    questions
        .into_iter()
        .filter(|q| seen.insert(q.dedup_key()))
        .collect()
}

/// Full question pool for a cycle-based or random-mode lesson.
///
/// Static questions come first, then per word: choice, assemble, fill-in.
/// Answers are unique across the whole pool, so a generated fill-in only
/// survives when no earlier question already asks for the same word.
pub fn synthesize_lesson_questions<R: Rng>(
    rng: &mut R,
    lesson: &Lesson,
    config: &SessionConfig,
) -> Vec<Question> {
    let static_questions: Vec<Question> = lesson
        .questions
        .iter()
        .filter_map(|raw| normalize_static_question(rng, raw))
        .filter(|q| q.kind() != QuestionKind::AudioChoice)
        .collect();
    let static_count = static_questions.len();

    let mut all = static_questions;
    for word in &lesson.words {
        all.extend(synthesize_choice_question(rng, word, &lesson.words, config.choice_option_count));
        all.extend(synthesize_assemble_question(word));
        all.extend(synthesize_fill_in_question(rng, word, &lesson.words, config.choice_option_count));
    }
    let generated_count = all.len() - static_count;

    let deduped = deduplicate(all);
    debug!(
        "lesson {}: {} static + {} generated questions, {} after dedup",
        lesson.id, static_count, generated_count, deduped.len()
    );
    deduped
}

/// Question list for listening mode: static audio questions, then one per word.
pub fn synthesize_listening_questions<R: Rng>(
    rng: &mut R,
    lesson: &Lesson,
    config: &SessionConfig,
) -> Vec<Question> {
    let mut all: Vec<Question> = lesson
        .questions
        .iter()
        .filter(|raw| raw.kind == RawQuestionType::AudioChoice)
        .filter_map(|raw| normalize_static_question(rng, raw))
        .collect();
    for word in &lesson.words {
        all.extend(synthesize_audio_question(rng, word, &lesson.words, config.choice_option_count));
    }
    let deduped = deduplicate(all);
    debug!("lesson {}: {} listening questions", lesson.id, deduped.len());
    deduped
}
