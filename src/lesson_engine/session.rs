//! The lesson player: one [`LessonSession`] per lesson being studied.
//!
//! All state changes go through [`LessonSession::advance`],
//! [`LessonSession::back`], [`LessonSession::record_result`] and
//! [`LessonSession::restart`]. Each transition mutates in-memory state first,
//! then writes the resume record; [`LessonSession::screen`] reads the result.

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::lesson_engine::{
    config::SessionConfig,
    exam::{select_exam_tasks, ExamTask},
    models::{
        Block, CompletionRecord, Cycle, Dialogue, Lesson, Outcome, Question, ScoreStats,
        SessionMode, Word,
    },
    partitioner::partition,
    sequencer::{plan_blocks, BlockRules, BlockSequencer, Cursor},
    shuffle::shuffled,
    store::{ProgressSink, ResumeStore},
    synthesizer::{synthesize_lesson_questions, synthesize_listening_questions},
    tracker::ProgressTracker,
};

/// What the learner should see right now.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "screen", rename_all = "kebab-case")]
pub enum Screen<'a> {
    Theory { text: &'a str },
    WordStudy { cycle: usize, words: &'a [Word] },
    MiniTest { cycle: usize, questions: Vec<&'a Question> },
    MiniDialogue { cycle: usize, dialogue: &'a Dialogue },
    Exercises { cycle: usize, questions: Vec<&'a Question> },
    FinalExam { index: usize, count: usize, task: &'a ExamTask },
    /// One question of a random-mode or listening-mode run.
    Quiz { index: usize, count: usize, question: &'a Question },
    /// The block has nothing to show; the screen offers "continue".
    Empty { block: Block },
    Finished { stats: ScoreStats, score: u8 },
}

impl Screen<'_> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Screen::Empty { .. })
    }
}

/// Position as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "at", rename_all = "kebab-case")]
pub enum Position {
    Block { cycle: usize, block: Block },
    ExamTask { index: usize },
    Quiz { index: usize },
    Finished,
}

enum Flow {
    Cycles {
        cycles: Vec<Cycle>,
        exam: Vec<ExamTask>,
        sequencer: BlockSequencer,
    },
    /// Random and listening modes: a flat list played once.
    Flat {
        questions: Vec<Question>,
        index: usize,
    },
}

pub struct LessonSession {
    lesson: Lesson,
    config: SessionConfig,
    rng: StdRng,
    questions: Vec<Question>,
    flow: Flow,
    tracker: ProgressTracker,
    completion: Option<CompletionRecord>,
}

impl LessonSession {
    /// Build the session and resume from `store` if it holds this lesson's position.
    pub fn start(
        lesson: Lesson,
        config: SessionConfig,
        store: Box<dyn ResumeStore>,
        sink: Box<dyn ProgressSink>,
    ) -> Self {
        let mut rng: StdRng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let (questions, flow) = build_flow(&mut rng, &lesson, &config);
        let tracker = ProgressTracker::new(lesson.id.clone(), store, sink);

        let mut session = LessonSession {
            lesson,
            config,
            rng,
            questions,
            flow,
            tracker,
            completion: None,
        };
        info!(
            "lesson {}: started in {} mode, {} questions",
            session.lesson.id,
            session.lesson.mode(),
            session.questions.len()
        );
        session.resume();
        session.finish_if_done();
        session
    }

    fn resume(&mut self) {
        let Flow::Cycles { sequencer, .. } = &mut self.flow else {
            return;
        };
        let Some(record) = self.tracker.restore() else {
            return;
        };
        if !sequencer.jump_to(record.cycle_index, record.block) {
            info!(
                "lesson {}: stored cycle {} no longer exists, starting fresh",
                self.lesson.id, record.cycle_index
            );
        }
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> SessionMode {
        self.lesson.mode()
    }

    /// The lesson's full synthesized question pool.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Empty outside cycle mode.
    pub fn cycles(&self) -> &[Cycle] {
        match &self.flow {
            Flow::Cycles { cycles, .. } => cycles,
            Flow::Flat { .. } => &[],
        }
    }

    /// Empty outside cycle mode.
    pub fn exam_tasks(&self) -> &[ExamTask] {
        match &self.flow {
            Flow::Cycles { exam, .. } => exam,
            Flow::Flat { .. } => &[],
        }
    }

    /// Block list per cycle. Empty outside cycle mode.
    pub fn block_plan(&self) -> &[Vec<Block>] {
        match &self.flow {
            Flow::Cycles { sequencer, .. } => sequencer.plan(),
            Flow::Flat { .. } => &[],
        }
    }

    pub fn position(&self) -> Position {
        match &self.flow {
            Flow::Cycles { sequencer, .. } => match sequencer.cursor() {
                Cursor::Block { cycle, block, .. } => Position::Block { cycle, block },
                Cursor::Exam { task } => Position::ExamTask { index: task },
                Cursor::Finished => Position::Finished,
            },
            Flow::Flat { questions, index } if *index < questions.len() => {
                Position::Quiz { index: *index }
            }
            Flow::Flat { .. } => Position::Finished,
        }
    }

    pub fn current_block(&self) -> Option<Block> {
        match self.position() {
            Position::Block { block, .. } => Some(block),
            Position::ExamTask { .. } => Some(Block::FinalExam),
            Position::Quiz { .. } | Position::Finished => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.position() == Position::Finished
    }

    pub fn score_stats(&self) -> ScoreStats {
        self.tracker.stats()
    }

    /// Set once the session has finished.
    pub fn completion(&self) -> Option<&CompletionRecord> {
        self.completion.as_ref()
    }

    /// `(steps done, steps total)` for a progress bar.
    pub fn progress(&self) -> (usize, usize) {
        match &self.flow {
            Flow::Cycles { sequencer, .. } => sequencer.progress(),
            Flow::Flat { questions, index } => ((*index).min(questions.len()), questions.len()),
        }
    }

    pub fn screen(&self) -> Screen<'_> {
        match &self.flow {
            Flow::Flat { questions, index } => match questions.get(*index) {
                Some(question) => Screen::Quiz { index: *index, count: questions.len(), question },
                None => self.finished_screen(),
            },
            Flow::Cycles { cycles, exam, sequencer } => match sequencer.cursor() {
                Cursor::Block { cycle, block, .. } => {
                    block_screen(&self.lesson, &cycles[cycle], cycle, block)
                }
                Cursor::Exam { task } => match exam.get(task) {
                    Some(t) => Screen::FinalExam { index: task, count: exam.len(), task: t },
                    None => Screen::Empty { block: Block::FinalExam },
                },
                Cursor::Finished => self.finished_screen(),
            },
        }
    }

    fn finished_screen(&self) -> Screen<'_> {
        let stats = self.tracker.stats();
        Screen::Finished { stats, score: stats.score() }
    }

    /// Report one answer from the current screen. `true`/`false` or [`Outcome::Skip`].
    pub fn record_result(&mut self, outcome: impl Into<Outcome>) {
        let outcome = outcome.into();
        if self.completion.is_some() {
            debug!("lesson {}: result {:?} after completion ignored", self.lesson.id, outcome);
            return;
        }
        self.tracker.record_result(outcome);
    }

    /// Move forward one step.
    pub fn advance(&mut self) -> Position {
        match &mut self.flow {
            Flow::Cycles { sequencer, .. } => {
                sequencer.advance();
            }
            Flow::Flat { questions, index } => {
                *index = (*index + 1).min(questions.len());
            }
        }
        self.after_transition()
    }

    /// Move back one step; see [`BlockSequencer::back`] for cycle boundaries.
    pub fn back(&mut self) -> Position {
        if self.completion.is_some() {
            return Position::Finished;
        }
        match &mut self.flow {
            Flow::Cycles { sequencer, .. } => {
                sequencer.back();
            }
            Flow::Flat { index, .. } => {
                *index = index.saturating_sub(1);
            }
        }
        self.after_transition()
    }

    /// Wipe stored progress and counters and start over with freshly derived
    /// cycles, questions and exam.
    pub fn restart(&mut self) {
        self.tracker.restart();
        self.completion = None;
        let (questions, flow) = build_flow(&mut self.rng, &self.lesson, &self.config);
        self.questions = questions;
        self.flow = flow;
        info!("lesson {}: restarted", self.lesson.id);
        self.finish_if_done();
    }

    fn after_transition(&mut self) -> Position {
        let position = self.position();
        match position {
            Position::Block { cycle, block } => self.tracker.persist(cycle, block),
            Position::ExamTask { .. } => {
                let last_cycle = self.cycles().len().saturating_sub(1);
                self.tracker.persist(last_cycle, Block::FinalExam);
            }
            Position::Quiz { .. } => {}
            Position::Finished => self.finish_if_done(),
        }
        position
    }

    /// Finalize exactly once, when the flow has run out.
    fn finish_if_done(&mut self) {
        if self.completion.is_none() && self.is_finished() {
            let new_words = self.lesson.words.len() as u32;
            self.completion = Some(self.tracker.finalize(new_words));
        }
    }
}

fn build_flow(rng: &mut StdRng, lesson: &Lesson, config: &SessionConfig) -> (Vec<Question>, Flow) {
    match lesson.mode() {
        SessionMode::Listening => {
            let questions = synthesize_listening_questions(rng, lesson, config);
            let flow = Flow::Flat { questions: questions.clone(), index: 0 };
            (questions, flow)
        }
        SessionMode::Random => {
            let questions = synthesize_lesson_questions(rng, lesson, config);
            // Always one cycle, so no review word repeats a question in the pass.
            let cycle_size = config.random_mode_cycle_size.max(lesson.words.len());
            let cycles = partition(rng, &lesson.words, cycle_size, &questions, &lesson.dialogues);
            let pass: Vec<Question> = cycles.into_iter().flat_map(|c| c.questions).collect();
            let flow = Flow::Flat { questions: shuffled(rng, pass), index: 0 };
            (questions, flow)
        }
        SessionMode::Cycles => {
            let questions = synthesize_lesson_questions(rng, lesson, config);
            let cycles = partition(rng, &lesson.words, config.cycle_size, &questions, &lesson.dialogues);
            let rules = BlockRules {
                has_theory: lesson.has_theory(),
                intensive: lesson.is_intensive_mode,
            };
            let plan = plan_blocks(&cycles, rules);
            let exam = select_exam_tasks(rng, &questions, &lesson.dialogues);
            let sequencer = BlockSequencer::new(plan, exam.len());
            (questions, Flow::Cycles { cycles, exam, sequencer })
        }
    }
}

/// Screen for a per-cycle block; [`Screen::Empty`] when the block has no content.
fn block_screen<'a>(lesson: &'a Lesson, cycle: &'a Cycle, index: usize, block: Block) -> Screen<'a> {
    match block {
        Block::Theory if lesson.has_theory() => Screen::Theory { text: lesson.theory.trim() },
        Block::WordStudy if !cycle.words.is_empty() => {
            Screen::WordStudy { cycle: index, words: &cycle.words }
        }
        Block::MiniTest => {
            let questions: Vec<&Question> = cycle
                .questions
                .iter()
                .filter(|q| q.is_choice_like() && !q.is_exercise())
                .collect();
            if questions.is_empty() {
                Screen::Empty { block }
            } else {
                Screen::MiniTest { cycle: index, questions }
            }
        }
        Block::MiniDialogue => match &cycle.dialogue {
            Some(dialogue) if !dialogue.lines.is_empty() => Screen::MiniDialogue { cycle: index, dialogue },
            _ => Screen::Empty { block },
        },
        Block::Exercises => {
            let questions: Vec<&Question> = cycle.questions.iter().filter(|q| q.is_exercise()).collect();
            if questions.is_empty() {
                Screen::Empty { block }
            } else {
                Screen::Exercises { cycle: index, questions }
            }
        }
        _ => Screen::Empty { block },
    }
}
