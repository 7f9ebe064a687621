//! Lesson progression engine: question synthesis, cycles, block sequencing,
//! final exam and progress tracking.
//!
//! ## Module overview
//!
//! | Module        | Purpose |
//! |---------------|---------|
//! | `models`      | Lesson content, questions, cycles, blocks, result records |
//! | `shuffle`     | Fisher-Yates shuffle and sampling over an injected RNG |
//! | `evaluator`   | Answer normalization, checking and fill-in blanking |
//! | `synthesizer` | Derives and normalizes questions; deduplication |
//! | `partitioner` | Splits vocabulary into cycles with lag-1 review words |
//! | `sequencer`   | Block state machine within and across cycles |
//! | `exam`        | Samples the final exam, one task per category |
//! | `tracker`     | Score counters, resume persistence, completion record |
//! | `store`       | Resume-store and progress-sink collaborators |
//! | `helpers`     | Assembly tiles and dialogue option sets for screens |
//! | `session`     | `LessonSession`, the single entry point for a lesson player |
//! | `config`      | `SessionConfig` |
//! | `error`       | `EngineError` |

pub mod config;
pub mod error;
pub mod evaluator;
pub mod exam;
pub mod helpers;
pub mod models;
pub mod partitioner;
pub mod sequencer;
pub mod session;
pub mod shuffle;
pub mod store;
pub mod synthesizer;
pub mod tracker;

// Re-export the public API surface so callers can use
// `lesson_engine::LessonSession` without reaching into sub-modules.
pub use config::SessionConfig;
pub use error::{EngineError, EngineResult};
pub use exam::{ExamTask, TaskVariant};
pub use helpers::{assemble_tiles, dialogue_steps, DialogueStep};
pub use models::{
    Block, CompletionRecord, Cycle, Dialogue, DialogueLine, ExampleSentence, Lesson, Outcome,
    Question, QuestionKind, RawQuestion, ResumeRecord, ScoreStats, SessionMode, Turn, Word,
};
pub use session::{LessonSession, Position, Screen};
pub use store::{JsonFileStore, MemoryStore, ProgressSink, RecordingSink, ResumeStore};
