//! Session-level tests for the `suomi_lesson_engine` crate.
//!
//! Included from `lib.rs` under `#[cfg(test)]`.
//!
//! # Coverage
//!
//! | Group | What is tested |
//! |-------|----------------|
//! | Standard run | Cycle count, block order per cycle, exam size, completion record |
//! | Terminal | `advance()` visits each planned block once, then the exam, then stops |
//! | Scoring | Skips excluded; boundary scores; empty exam finalizes with 100 |
//! | Resume | Matching, mismatched, stale-block and out-of-range stored positions |
//! | Persistence | Every transition writes the position; completion clears it |
//! | Navigation | `back()` within a cycle and across the cycle boundary |
//! | Modes | Random pass, listening run, intensive block plan |
//! | Content | Pool answers unique across kinds, block question kinds, JSON lesson parsing, empty-block screens |
//! | Collaborators | Failing store and sink never block progression |

use std::collections::HashSet;

use crate::lesson_engine::{
    error::{EngineError, EngineResult},
    models::{CompletionRecord, DialogueLine, RawCorrect, RawQuestion, RawQuestionType, ResumeRecord},
    Block, Dialogue, Lesson, LessonSession, MemoryStore, Outcome, Position, Question, QuestionKind,
    RecordingSink, ResumeStore, Screen, SessionConfig, SessionMode, TaskVariant, Word,
};

// ── helpers ──────────────────────────────────────────────────────────────────

fn words() -> Vec<Word> {
    vec![
        Word::new("talo", "дом", "🏠").with_example("Talo on iso.", "Дом большой."),
        Word::new("kissa", "кошка", "🐈").with_example("Kissa nukkuu sohvalla.", "Кошка спит на диване."),
        Word::new("koira", "собака", "🐕").with_example("Koira juoksee puistossa.", "Собака бегает в парке."),
        Word::new("omena", "яблоко", "🍎"),
        Word::new("vesi", "вода", "💧").with_example("Juon vettä.", "Я пью воду."),
        Word::new("kirja", "книга", "📖").with_example("Luen kirjaa.", "Я читаю книгу."),
        Word::new("auto", "машина", "🚗").with_example("Auto on punainen.", "Машина красная."),
        Word::new("kahvi", "кофе", "☕"),
    ]
}

fn dialogue(title: &str) -> Dialogue {
    let line = |speaker: &str, text: &str, ru: &str| DialogueLine {
        speaker: speaker.into(),
        line: text.into(),
        translation: ru.into(),
    };
    Dialogue {
        title: title.into(),
        lines: vec![
            line("Myyjä", "Hei! Mitä saisi olla?", "Привет! Что желаете?"),
            line("Sinä", "Yksi kahvi, kiitos.", "Один кофе, пожалуйста."),
            line("Myyjä", "Se on kaksi euroa.", "Это два евро."),
            line("Sinä", "Tässä, kiitos.", "Вот, спасибо."),
        ],
    }
}

/// Eight words, theory text, one static fill-in and two dialogues: the
/// standard two-cycle lesson.
fn standard_lesson(id: &str) -> Lesson {
    let mut lesson = Lesson::new(id, words());
    lesson.title = "Arki".into();
    lesson.theory = "В финском языке нет рода и артиклей.".into();
    lesson.questions = vec![RawQuestion {
        kind: RawQuestionType::FillIn,
        question: "___ juoksee puistossa.".into(),
        correct: Some(RawCorrect::Text("koira".into())),
        options: Vec::new(),
        translation: Some("Собака бегает в парке.".into()),
        audio: None,
    }];
    lesson.dialogues = vec![dialogue("Kahvilassa"), dialogue("Kaupassa")];
    lesson
}

fn assert_unique_answers<'a>(questions: impl IntoIterator<Item = &'a Question>) {
    let mut keys = HashSet::new();
    for q in questions {
        assert!(keys.insert(q.dedup_key()), "answer '{}' asked twice", q.correct());
    }
}

struct Harness {
    session: LessonSession,
    store: MemoryStore,
    sink: RecordingSink,
}

fn start_with(lesson: Lesson, seed: u64, store: MemoryStore) -> Harness {
    let sink = RecordingSink::new();
    let session = LessonSession::start(
        lesson,
        SessionConfig::with_seed(seed),
        Box::new(store.clone()),
        Box::new(sink.clone()),
    );
    Harness { session, store, sink }
}

fn start(lesson: Lesson, seed: u64) -> Harness {
    start_with(lesson, seed, MemoryStore::new())
}

/// Seeds that span different RNG states.
const SEEDS: [u64; 5] = [1, 42, 999, 0xDEAD_BEEF, 7];

// ── standard run ─────────────────────────────────────────────────────────────

#[test]
fn standard_run_plans_two_cycles() {
    for seed in SEEDS {
        let h = start(standard_lesson("L1"), seed);
        assert_eq!(h.session.mode(), SessionMode::Cycles);
        assert_eq!(h.session.cycles().len(), 2);
        assert_eq!(
            h.session.block_plan(),
            &[
                vec![Block::Theory, Block::WordStudy, Block::MiniTest],
                vec![Block::WordStudy, Block::MiniTest, Block::MiniDialogue],
            ]
        );
        assert_eq!(h.session.position(), Position::Block { cycle: 0, block: Block::Theory });
    }
}

#[test]
fn standard_run_samples_all_four_exam_categories() {
    for seed in SEEDS {
        let h = start(standard_lesson("L1"), seed);
        let tasks = h.session.exam_tasks();
        assert_eq!(tasks.len(), 4, "seed={seed}");
        assert_eq!(tasks.iter().filter(|t| t.variant() == TaskVariant::Dialogue).count(), 1);
        let mut kinds: Vec<QuestionKind> = tasks.iter().filter_map(|t| t.question()).map(|q| q.kind()).collect();
        kinds.sort_by_key(|k| k.to_string());
        assert_eq!(kinds, vec![QuestionKind::Choice, QuestionKind::FillIn, QuestionKind::Assemble]);
    }
}

#[test]
fn standard_run_walks_to_completion() {
    let mut h = start(standard_lesson("L1"), 42);
    let mut seen = Vec::new();
    while let Position::Block { cycle, block } = h.session.position() {
        seen.push((cycle, block));
        h.session.record_result(true);
        h.session.advance();
    }
    assert_eq!(
        seen,
        vec![
            (0, Block::Theory),
            (0, Block::WordStudy),
            (0, Block::MiniTest),
            (1, Block::WordStudy),
            (1, Block::MiniTest),
            (1, Block::MiniDialogue),
        ]
    );

    for i in 0..4 {
        assert_eq!(h.session.position(), Position::ExamTask { index: i });
        assert_eq!(h.session.current_block(), Some(Block::FinalExam));
        h.session.record_result(i % 2 == 0);
        h.session.advance();
    }
    assert!(h.session.is_finished());

    // 6 block answers (all correct) + 4 exam answers (2 correct).
    let records = h.sink.records();
    assert_eq!(records.len(), 1);
    let rec = &records[0];
    assert_eq!(rec.lesson_id, "L1");
    assert_eq!(rec.correct_answers, 8);
    assert_eq!(rec.total_questions, 10);
    assert_eq!(rec.score, 80);
    assert_eq!(rec.new_words, 8);
    assert_eq!(h.session.completion(), Some(rec));
}

#[test]
fn second_cycle_shows_review_word() {
    let mut h = start(standard_lesson("L1"), 3);
    while h.session.position() != (Position::Block { cycle: 1, block: Block::WordStudy }) {
        h.session.advance();
    }
    match h.session.screen() {
        Screen::WordStudy { cycle, words } => {
            assert_eq!(cycle, 1);
            assert_eq!(words.len(), 5);
            let first_chunk: Vec<String> = self::words()[..4].iter().map(|w| w.finnish.clone()).collect();
            assert!(first_chunk.contains(&words[4].finnish), "review word not from cycle 0");
        }
        other => panic!("expected word study, got {other:?}"),
    }
}

#[test]
fn same_seed_gives_identical_session() {
    let a = start(standard_lesson("L1"), 12345);
    let b = start(standard_lesson("L1"), 12345);
    assert_eq!(a.session.cycles(), b.session.cycles());
    assert_eq!(a.session.exam_tasks(), b.session.exam_tasks());
    assert_eq!(a.session.questions(), b.session.questions());
}

// ── question pool and block content ──────────────────────────────────────────

#[test]
fn pool_never_asks_for_the_same_answer_twice() {
    for seed in SEEDS {
        let h = start(standard_lesson("L1"), seed);
        let qs = h.session.questions();
        assert_unique_answers(qs);
        // The static fill-in claims "koira" ahead of the generated choice question.
        let koira: Vec<QuestionKind> = qs.iter().filter(|q| q.dedup_key() == "koira").map(Question::kind).collect();
        assert_eq!(koira, vec![QuestionKind::FillIn], "seed={seed}");
        for cycle in h.session.cycles() {
            assert_unique_answers(&cycle.questions);
        }
    }
}

#[test]
fn blocks_serve_only_their_question_kinds() {
    for seed in SEEDS {
        let mut lesson = standard_lesson("I");
        lesson.is_intensive_mode = true;
        let mut h = start(lesson, seed);
        let (mut mini_tests, mut exercises) = (0, 0);
        while let Position::Block { cycle, .. } = h.session.position() {
            let keys: HashSet<String> = h.session.cycles()[cycle].words.iter().map(Word::key).collect();
            match h.session.screen() {
                Screen::MiniTest { questions, .. } => {
                    mini_tests += 1;
                    assert!(questions.iter().all(|q| q.kind() == QuestionKind::Choice), "seed={seed}");
                    assert!(questions.iter().all(|q| keys.contains(&q.dedup_key())));
                    assert_unique_answers(questions.iter().copied());
                }
                Screen::Exercises { questions, .. } => {
                    exercises += 1;
                    assert!(questions.iter().all(|q| q.is_exercise()), "seed={seed}");
                    assert!(questions.iter().any(|q| q.dedup_key() == "koira"));
                }
                _ => {}
            }
            h.session.advance();
        }
        assert_eq!(mini_tests, 2, "seed={seed}");
        // Cycle 1 also gets exercises when "koira" is drawn as its review word.
        assert!(exercises >= 1, "seed={seed}");
    }
}

// ── terminal property ────────────────────────────────────────────────────────

#[test]
fn advance_always_terminates_after_exam() {
    for n in [1usize, 3, 4, 5, 8, 13, 20] {
        for seed in SEEDS {
            let mut lesson = standard_lesson("T");
            lesson.words = (0..n)
                .map(|i| Word::new(format!("sana{i}"), format!("слово{i}"), "").with_example(format!("Tämä on sana{i}."), "Это слово."))
                .collect();
            let mut h = start(lesson, seed);
            let (_, total) = h.session.progress();
            let mut steps = 0;
            let mut reached_exam = h.session.exam_tasks().is_empty();
            while !h.session.is_finished() {
                if matches!(h.session.position(), Position::ExamTask { .. }) {
                    reached_exam = true;
                }
                h.session.advance();
                steps += 1;
                assert!(steps <= total, "n={n} seed={seed}: more steps than planned");
            }
            assert_eq!(steps, total, "n={n} seed={seed}");
            assert!(reached_exam, "n={n} seed={seed}: exam skipped");
            assert_eq!(h.sink.records().len(), 1);
        }
    }
}

// ── scoring ──────────────────────────────────────────────────────────────────

#[test]
fn skips_are_excluded_from_score() {
    let mut h = start(standard_lesson("L1"), 1);
    for outcome in [Outcome::Correct, Outcome::Skip, Outcome::Incorrect, Outcome::Correct, Outcome::Skip] {
        h.session.record_result(outcome);
    }
    let stats = h.session.score_stats();
    assert_eq!((stats.correct, stats.total), (2, 3));
    while !h.session.is_finished() {
        h.session.advance();
    }
    assert_eq!(h.sink.records()[0].score, 67);
}

#[test]
fn empty_exam_finalizes_right_after_last_block() {
    // A single word has no distractors and no example sentence: no questions at all.
    let lesson = Lesson::new("tiny", vec![Word::new("hei", "привет", "👋")]);
    let mut h = start(lesson, 5);
    assert!(h.session.exam_tasks().is_empty());
    assert_eq!(h.session.block_plan(), &[vec![Block::WordStudy, Block::MiniTest]]);

    h.session.advance();
    assert!(h.session.screen().is_empty(), "mini-test without questions should be empty");
    assert_eq!(h.session.advance(), Position::Finished);

    let rec = &h.sink.records()[0];
    assert_eq!(rec.score, 100);
    assert_eq!(rec.total_questions, 0);
    assert!(matches!(h.session.screen(), Screen::Finished { score: 100, .. }));
}

#[test]
fn results_after_completion_are_ignored() {
    let mut h = start(Lesson::new("tiny", vec![Word::new("hei", "привет", "")]), 5);
    while !h.session.is_finished() {
        h.session.advance();
    }
    h.session.record_result(false);
    h.session.advance();
    assert_eq!(h.session.score_stats().total, 0);
    assert_eq!(h.sink.records().len(), 1, "completion emitted twice");
}

// ── resume ───────────────────────────────────────────────────────────────────

fn stored(lesson_id: &str, cycle_index: usize, block: Block) -> MemoryStore {
    MemoryStore::with_record(ResumeRecord { lesson_id: lesson_id.into(), cycle_index, block })
}

#[test]
fn resume_with_other_lesson_id_starts_fresh() {
    let h = start_with(standard_lesson("Y"), 1, stored("X", 1, Block::MiniTest));
    assert_eq!(h.session.position(), Position::Block { cycle: 0, block: Block::Theory });

    let mut no_theory = standard_lesson("Y");
    no_theory.theory = "   ".into();
    let h = start_with(no_theory, 1, stored("X", 1, Block::MiniTest));
    assert_eq!(h.session.position(), Position::Block { cycle: 0, block: Block::WordStudy });
}

#[test]
fn resume_with_matching_lesson_id_continues() {
    let h = start_with(standard_lesson("L1"), 1, stored("L1", 1, Block::MiniTest));
    assert_eq!(h.session.position(), Position::Block { cycle: 1, block: Block::MiniTest });
    assert_eq!(h.session.score_stats().total, 0);
}

#[test]
fn resume_with_stale_block_lands_on_cycle_start() {
    let h = start_with(standard_lesson("L1"), 1, stored("L1", 0, Block::Exercises));
    assert_eq!(h.session.position(), Position::Block { cycle: 0, block: Block::Theory });
}

#[test]
fn resume_with_missing_cycle_starts_fresh() {
    let h = start_with(standard_lesson("L1"), 1, stored("L1", 9, Block::MiniTest));
    assert_eq!(h.session.position(), Position::Block { cycle: 0, block: Block::Theory });
}

#[test]
fn resume_at_final_exam_restarts_exam() {
    let h = start_with(standard_lesson("L1"), 1, stored("L1", 1, Block::FinalExam));
    assert_eq!(h.session.position(), Position::ExamTask { index: 0 });
}

// ── persistence ──────────────────────────────────────────────────────────────

#[test]
fn every_transition_persists_position() {
    let mut h = start(standard_lesson("L1"), 8);
    assert!(h.store.snapshot().is_none(), "start is not a transition");
    loop {
        let position = h.session.advance();
        match position {
            Position::Block { cycle, block } => {
                let rec = h.store.snapshot().expect("position not persisted");
                assert_eq!((rec.lesson_id.as_str(), rec.cycle_index, rec.block), ("L1", cycle, block));
            }
            Position::ExamTask { .. } => {
                let rec = h.store.snapshot().expect("exam position not persisted");
                assert_eq!((rec.cycle_index, rec.block), (1, Block::FinalExam));
            }
            Position::Quiz { .. } => unreachable!("no flat run in cycle mode"),
            Position::Finished => break,
        }
    }
    assert!(h.store.snapshot().is_none(), "completion should clear resume state");
}

#[test]
fn persisted_position_resumes_a_new_session() {
    let store = MemoryStore::new();
    let mut first = start_with(standard_lesson("L1"), 4, store.clone());
    for _ in 0..4 {
        first.session.advance();
    }
    let expected = first.session.position();
    drop(first);

    let second = start_with(standard_lesson("L1"), 4, store);
    assert_eq!(second.session.position(), expected);
}

// ── navigation ───────────────────────────────────────────────────────────────

#[test]
fn back_across_cycle_boundary_lands_on_word_study() {
    let mut h = start(standard_lesson("L1"), 2);
    while h.session.position() != (Position::Block { cycle: 1, block: Block::WordStudy }) {
        h.session.advance();
    }
    assert_eq!(h.session.back(), Position::Block { cycle: 0, block: Block::WordStudy });
    assert_eq!(h.store.snapshot().unwrap().block, Block::WordStudy);
    assert_eq!(h.session.back(), Position::Block { cycle: 0, block: Block::Theory });
    assert_eq!(h.session.back(), Position::Block { cycle: 0, block: Block::Theory });
}

#[test]
fn restart_resets_everything() {
    let mut h = start(standard_lesson("L1"), 6);
    h.session.record_result(true);
    for _ in 0..3 {
        h.session.advance();
    }
    h.session.restart();
    assert_eq!(h.session.position(), Position::Block { cycle: 0, block: Block::Theory });
    assert_eq!(h.session.score_stats().total, 0);
    assert!(h.store.snapshot().is_none());
    assert_eq!(h.session.cycles().len(), 2);

    while !h.session.is_finished() {
        h.session.advance();
    }
    h.session.restart();
    assert!(h.session.completion().is_none());
    while !h.session.is_finished() {
        h.session.advance();
    }
    assert_eq!(h.sink.records().len(), 2);
}

// ── modes ────────────────────────────────────────────────────────────────────

#[test]
fn random_mode_is_a_single_flat_pass() {
    let mut lesson = standard_lesson("R");
    lesson.is_random_mode = true;
    let mut h = start(lesson, 17);
    assert_eq!(h.session.mode(), SessionMode::Random);
    assert!(h.session.cycles().is_empty());
    assert!(h.session.exam_tasks().is_empty());

    let (_, count) = h.session.progress();
    assert!(count > 0);
    for i in 0..count {
        assert_eq!(h.session.position(), Position::Quiz { index: i });
        match h.session.screen() {
            Screen::Quiz { question, count: c, .. } => {
                assert_eq!(c, count);
                assert!(h.session.lesson().words.iter().any(|w| w.key() == question.dedup_key()));
            }
            other => panic!("expected quiz screen, got {other:?}"),
        }
        h.session.record_result(true);
        h.session.advance();
    }
    assert!(h.session.is_finished());
    assert_eq!(h.sink.records().len(), 1);
    assert_eq!(h.sink.records()[0].total_questions as usize, count);
    assert!(h.store.snapshot().is_none(), "flat runs do not persist positions");
}

#[test]
fn random_mode_stays_one_cycle_past_the_configured_size() {
    let mut lesson = standard_lesson("R");
    lesson.is_random_mode = true;
    let config = SessionConfig { random_mode_cycle_size: 3, ..SessionConfig::with_seed(31) };
    let mut session = LessonSession::start(
        lesson,
        config,
        Box::new(MemoryStore::new()),
        Box::new(RecordingSink::new()),
    );
    let mut played = Vec::new();
    loop {
        let question = match session.screen() {
            Screen::Quiz { question, .. } => question.clone(),
            _ => break,
        };
        played.push(question);
        session.advance();
    }
    assert!(session.is_finished());
    assert_unique_answers(&played);
    // Every word-keyed question of the pool is played exactly once.
    let word_keyed = session
        .questions()
        .iter()
        .filter(|q| session.lesson().words.iter().any(|w| w.key() == q.dedup_key()))
        .count();
    assert_eq!(played.len(), word_keyed);
}

#[test]
fn listening_mode_plays_audio_questions_only() {
    let mut lesson = standard_lesson("A");
    lesson.is_listening_mode = true;
    lesson.is_random_mode = true;
    let mut h = start(lesson, 23);
    assert_eq!(h.session.mode(), SessionMode::Listening);
    assert_eq!(h.session.questions().len(), 8);
    assert!(h.session.questions().iter().all(|q| q.kind() == QuestionKind::AudioChoice));

    h.session.advance();
    assert_eq!(h.session.back(), Position::Quiz { index: 0 });
    while !h.session.is_finished() {
        h.session.record_result(Outcome::Skip);
        h.session.advance();
    }
    assert_eq!(h.sink.records()[0].score, 100);
}

#[test]
fn intensive_mode_opens_dialogue_and_exercises_early() {
    let mut lesson = standard_lesson("I");
    lesson.is_intensive_mode = true;
    let h = start(lesson, 1);
    let plan = h.session.block_plan();
    assert!(plan[0].contains(&Block::MiniDialogue));
    assert!(plan[0].contains(&Block::Exercises));
}

// ── content ──────────────────────────────────────────────────────────────────

const JSON_LESSON: &str = r#"{
    "id": "json-1",
    "title": "Perhe",
    "theory": "Семья по-фински.",
    "words": [
        {"finnish": "äiti", "russian": "мама", "emoji": "👩",
         "example_sentence": {"finnish": "Äiti on kotona.", "russian": "Мама дома."}},
        {"finnish": "isä", "russian": "папа", "emoji": "👨",
         "exampleSentence": {"finnish": "Isä lukee.", "russian": "Папа читает."}},
        {"finnish": "sisko", "russian": "сестра", "emoji": "👧"}
    ],
    "questions": [
        {"type": "choice", "question": "Кто такая «мама»?", "correct": 1, "options": ["isä", "äiti"]},
        {"type": "matching", "question": "??", "correct": "x"},
        {"type": "choice", "question": "broken", "correct": -1, "options": ["a"]},
        {"type": "fill-in", "question": "___ lukee.", "correct": "Isä"}
    ],
    "dialogues": [],
    "isIntensiveMode": true
}"#;

#[test]
fn json_lesson_parses_and_drops_malformed_questions() {
    let lesson = Lesson::from_json_str(JSON_LESSON).unwrap();
    assert_eq!(lesson.words.len(), 3);
    assert!(lesson.words[1].example_sentence.is_some());
    assert!(lesson.is_intensive_mode);
    assert_eq!(lesson.questions.len(), 4);

    let h = start(lesson, 3);
    let qs = h.session.questions();
    assert_eq!(qs[0].prompt(), "Кто такая «мама»?");
    assert_eq!(qs[0].correct(), "äiti");
    assert_eq!(qs[1].kind(), QuestionKind::FillIn);
    assert_eq!(qs[1].correct(), "Isä");
    assert!(qs.iter().all(|q| q.prompt() != "broken" && q.prompt() != "??"));
    // Static questions claim "äiti" and "isä"; only "sisko" gets a generated choice.
    assert_unique_answers(qs);
    let choices: Vec<&str> = qs.iter().filter(|q| q.kind() == QuestionKind::Choice).map(|q| q.correct()).collect();
    assert_eq!(choices, vec!["äiti", "sisko"]);
}

#[test]
fn malformed_json_is_reported() {
    assert!(matches!(Lesson::from_json_str("{\"words\": []}"), Err(EngineError::Json(_))));
}

#[test]
fn mini_dialogue_screen_carries_dialogue() {
    let mut h = start(standard_lesson("L1"), 9);
    while h.session.current_block() != Some(Block::MiniDialogue) {
        h.session.advance();
    }
    match h.session.screen() {
        Screen::MiniDialogue { cycle, dialogue } => {
            assert_eq!(cycle, 1);
            assert_eq!(dialogue.title, "Kaupassa");
        }
        other => panic!("expected mini-dialogue, got {other:?}"),
    }
}

// ── collaborators ────────────────────────────────────────────────────────────

struct OfflineStore;

impl ResumeStore for OfflineStore {
    fn load(&self) -> EngineResult<Option<ResumeRecord>> {
        Err(EngineError::Store("offline".into()))
    }
    fn save(&mut self, _: &ResumeRecord) -> EngineResult<()> {
        Err(EngineError::Store("offline".into()))
    }
    fn clear(&mut self) -> EngineResult<()> {
        Err(EngineError::Store("offline".into()))
    }
}

#[test]
fn failing_collaborators_never_block_progression() {
    let sink = |_: &CompletionRecord| -> EngineResult<()> { Err(EngineError::Sink("timeout".into())) };
    let mut session = LessonSession::start(
        standard_lesson("L1"),
        SessionConfig::with_seed(1),
        Box::new(OfflineStore),
        Box::new(sink),
    );
    while !session.is_finished() {
        session.record_result(true);
        session.advance();
    }
    assert_eq!(session.completion().map(|r| r.score), Some(100));
}
