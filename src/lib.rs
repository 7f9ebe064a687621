//! # suomi_lesson_engine
//!
//! The progression engine behind a Finnish-for-Russian-speakers lesson player.
//!
//! A lesson arrives as plain content (words, static quiz questions,
//! dialogues, theory text). The engine turns it into a structured session:
//! theory, then study cycles of four new words plus one review word, each
//! cycle walking through word study, a mini-test, a mini-dialogue and
//! exercises, and finally a sampled exam. It tracks the score and hands a
//! single completion record to whoever persists progress.
//!
//! ## How it works
//!
//! 1. Load a [`Lesson`] (for example with [`Lesson::from_json_str`]).
//! 2. Call [`LessonSession::start`] with a [`SessionConfig`], a
//!    [`ResumeStore`] and a [`ProgressSink`]. The engine synthesizes
//!    questions, partitions the vocabulary into cycles, plans each cycle's
//!    blocks, samples the exam, and resumes a stored position if it belongs
//!    to the same lesson.
//! 3. Render [`LessonSession::screen`], report answers with
//!    [`LessonSession::record_result`], move with
//!    [`LessonSession::advance`] / [`LessonSession::back`].
//! 4. Past the last exam task the session finalizes: the
//!    [`CompletionRecord`] goes to the sink and the resume state is cleared.
//!
//! ## Key features
//!
//! - **Reproducible**: `rng_seed: Some(u64)` fixes every random choice
//!   (distractors, review words, exam tasks).
//! - **Never stuck**: malformed content is dropped, empty blocks render as
//!   [`Screen::Empty`], and storage failures are logged, not raised.
//! - **Three modes**: cycle-based lessons, random mode (one flat pass over
//!   the whole vocabulary) and listening mode (audio questions only).
//!
//! ## Quick start
//!
//! ```rust
//! use suomi_lesson_engine::{
//!     Lesson, LessonSession, MemoryStore, RecordingSink, Screen, SessionConfig, Word,
//! };
//!
//! let words = vec![
//!     Word::new("talo", "дом", "🏠").with_example("Talo on iso.", "Дом большой."),
//!     Word::new("kissa", "кошка", "🐈"),
//!     Word::new("koira", "собака", "🐕"),
//!     Word::new("vesi", "вода", "💧"),
//! ];
//! let sink = RecordingSink::new();
//! let mut session = LessonSession::start(
//!     Lesson::new("lesson-1", words),
//!     SessionConfig::with_seed(42),
//!     Box::new(MemoryStore::new()),
//!     Box::new(sink.clone()),
//! );
//!
//! while !session.is_finished() {
//!     let answers: Vec<bool> = match session.screen() {
//!         Screen::MiniTest { questions, .. } => {
//!             questions.iter().map(|q| q.check(q.correct())).collect()
//!         }
//!         _ => Vec::new(),
//!     };
//!     for ok in answers {
//!         session.record_result(ok);
//!     }
//!     session.advance();
//! }
//!
//! let record = &sink.records()[0];
//! assert_eq!(record.lesson_id, "lesson-1");
//! assert_eq!(record.score, 100);
//! ```

pub mod lesson_engine;

// Convenience re-exports so callers can use `suomi_lesson_engine::LessonSession`
// directly without reaching into `lesson_engine::`.
pub use lesson_engine::{
    assemble_tiles, dialogue_steps, Block, CompletionRecord, Cycle, Dialogue, DialogueLine,
    DialogueStep, EngineError, EngineResult, ExamTask, ExampleSentence, JsonFileStore, Lesson,
    LessonSession, MemoryStore, Outcome, Position, ProgressSink, Question, QuestionKind,
    RawQuestion, RecordingSink, ResumeRecord, ResumeStore, ScoreStats, Screen, SessionConfig,
    SessionMode, TaskVariant, Turn, Word,
};

#[cfg(test)]
mod tests;
