//! Score aggregation, resume-state persistence and the completion record.

use log::{info, warn};

use crate::lesson_engine::{
    models::{Block, CompletionRecord, Outcome, ResumeRecord, ScoreStats},
    store::{ProgressSink, ResumeStore},
};

impl ScoreStats {
    /// Count one answer. Skips are not graded.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Correct => {
                self.correct += 1;
                self.total += 1;
            }
            Outcome::Incorrect => self.total += 1,
            Outcome::Skip => {}
        }
    }

    /// Percentage rounded to the nearest integer; 100 when nothing was graded.
    pub fn score(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let pct = self.correct as f64 / self.total.max(1) as f64 * 100.0;
        pct.round().clamp(0.0, 100.0) as u8
    }
}

/// Owns the score counters and talks to the store and sink collaborators.
///
/// Collaborator failures are logged and swallowed.
pub struct ProgressTracker {
    lesson_id: String,
    stats: ScoreStats,
    store: Box<dyn ResumeStore>,
    sink: Box<dyn ProgressSink>,
}

impl ProgressTracker {
    pub fn new(
        lesson_id: impl Into<String>,
        store: Box<dyn ResumeStore>,
        sink: Box<dyn ProgressSink>,
    ) -> Self {
        ProgressTracker {
            lesson_id: lesson_id.into(),
            stats: ScoreStats::default(),
            store,
            sink,
        }
    }

    pub fn lesson_id(&self) -> &str {
        &self.lesson_id
    }

    pub fn stats(&self) -> ScoreStats {
        self.stats
    }

    pub fn record_result(&mut self, outcome: Outcome) {
        self.stats.record(outcome);
    }

    pub fn persist(&mut self, cycle_index: usize, block: Block) {
        let record = ResumeRecord {
            lesson_id: self.lesson_id.clone(),
            cycle_index,
            block,
        };
        if let Err(e) = self.store.save(&record) {
            warn!("lesson {}: could not persist position {cycle_index}/{block}: {e}", self.lesson_id);
        }
    }

    /// The stored position, if it belongs to this lesson.
    pub fn restore(&self) -> Option<ResumeRecord> {
        match self.store.load() {
            Ok(Some(record)) if record.lesson_id == self.lesson_id => {
                info!(
                    "lesson {}: resuming at cycle {} / {}",
                    self.lesson_id, record.cycle_index, record.block
                );
                Some(record)
            }
            Ok(Some(other)) => {
                info!(
                    "lesson {}: ignoring stored position of lesson {}",
                    self.lesson_id, other.lesson_id
                );
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("lesson {}: could not read resume state: {e}", self.lesson_id);
                None
            }
        }
    }

    /// Build the completion record, hand it to the sink and drop the resume state.
    pub fn finalize(&mut self, new_words: u32) -> CompletionRecord {
        let record = CompletionRecord {
            lesson_id: self.lesson_id.clone(),
            score: self.stats.score(),
            correct_answers: self.stats.correct,
            total_questions: self.stats.total,
            new_words,
        };
        info!(
            "lesson {} complete: {}% ({}/{})",
            self.lesson_id, record.score, record.correct_answers, record.total_questions
        );
        if let Err(e) = self.sink.submit(&record) {
            warn!("lesson {}: completion record not saved: {e}", self.lesson_id);
        }
        self.clear_store();
        record
    }

    /// Forget the stored position and zero the counters.
    pub fn restart(&mut self) {
        self.clear_store();
        self.stats = ScoreStats::default();
    }

    fn clear_store(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("lesson {}: could not clear resume state: {e}", self.lesson_id);
        }
    }
}
