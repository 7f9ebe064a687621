//! Plays one lesson from start to finish, answering every task.
//!
//! Run with: `RUST_LOG=debug cargo run --example walkthrough`
//!
//! The walkthrough:
//!
//! 1. Parses a lesson from JSON, the way a content loader would deliver it.
//! 2. Starts a seeded session backed by a JSON resume file in the temp dir,
//!    so a second run of the example resumes where the first one stopped.
//! 3. Prints every screen, answering mini-tests and exam questions
//!    correctly except for one deliberate mistake, and skipping exercises.
//! 4. Prints the completion record handed to the progress sink.

use rand::{rngs::StdRng, SeedableRng};
use suomi_lesson_engine::{
    assemble_tiles, dialogue_steps, CompletionRecord, DialogueStep, EngineResult, ExamTask,
    JsonFileStore, Lesson, LessonSession, Outcome, Question, Screen, SessionConfig,
};

const LESSON_JSON: &str = r#"{
    "id": "kahvila-1",
    "title": "Kahvilassa",
    "theory": "Партитив используется после чисел и для неопределённого количества: kaksi kahvia, vähän vettä.",
    "words": [
        {"finnish": "kahvi", "russian": "кофе", "emoji": "☕",
         "exampleSentence": {"finnish": "Yksi kahvi, kiitos.", "russian": "Один кофе, пожалуйста."}},
        {"finnish": "tee", "russian": "чай", "emoji": "🍵",
         "exampleSentence": {"finnish": "Haluan teetä.", "russian": "Я хочу чаю."}},
        {"finnish": "pulla", "russian": "булочка", "emoji": "🥐",
         "exampleSentence": {"finnish": "Pulla on tuore.", "russian": "Булочка свежая."}},
        {"finnish": "maito", "russian": "молоко", "emoji": "🥛"},
        {"finnish": "sokeri", "russian": "сахар", "emoji": "🧂",
         "exampleSentence": {"finnish": "Sokeri on pöydällä.", "russian": "Сахар на столе."}},
        {"finnish": "lasku", "russian": "счёт", "emoji": "🧾",
         "exampleSentence": {"finnish": "Saisinko laskun?", "russian": "Можно счёт?"}}
    ],
    "questions": [
        {"type": "choice", "question": "Что значит «kiitos»?", "correct": 0,
         "options": ["спасибо", "привет", "пока"]}
    ],
    "dialogues": [
        {"title": "Tiskillä", "lines": [
            {"speaker": "Myyjä", "line": "Hei! Mitä saisi olla?", "translation": "Привет! Что желаете?"},
            {"speaker": "Sinä", "line": "Kahvi ja pulla, kiitos.", "translation": "Кофе и булочку, пожалуйста."}
        ]},
        {"title": "Maksaminen", "lines": [
            {"speaker": "Myyjä", "line": "Se on viisi euroa.", "translation": "Это пять евро."},
            {"speaker": "Sinä", "line": "Tässä, kiitos.", "translation": "Вот, спасибо."}
        ]}
    ]
}"#;

fn print_question(rng: &mut StdRng, lesson: &Lesson, q: &Question) {
    println!("    [{}] {}", q.kind(), q.prompt());
    if let Question::Assemble { correct, .. } = q {
        println!("      tiles: {}", assemble_tiles(rng, correct, &lesson.words).join(" | "));
    } else if !q.options().is_empty() {
        println!("      options: {}", q.options().join(" / "));
    }
}

fn print_dialogue(title: &str, steps: &[DialogueStep]) {
    println!("    dialogue «{title}»");
    for step in steps {
        match step {
            DialogueStep::Interlocutor { speaker, line, .. } => println!("      {speaker}: {line}"),
            DialogueStep::User { options, .. } => println!("      > {}", options.join(" / ")),
        }
    }
}

fn main() -> EngineResult<()> {
    env_logger::init();

    let lesson = Lesson::from_json_str(LESSON_JSON)?;
    let store = JsonFileStore::new(std::env::temp_dir().join("suomi_lesson_engine").join("resume.json"));
    let sink = |record: &CompletionRecord| -> EngineResult<()> {
        println!("progress sink <- {}", serde_json::to_string(record)?);
        Ok(())
    };

    let config = SessionConfig { cycle_size: 3, ..SessionConfig::with_seed(2024) };
    let mut session = LessonSession::start(lesson, config, Box::new(store), Box::new(sink));
    let mut render_rng = StdRng::seed_from_u64(7);
    let mut mistake_made = false;

    println!("{} questions, {} cycles, plan {:?}",
        session.questions().len(), session.cycles().len(), session.block_plan());

    while !session.is_finished() {
        let (done, total) = session.progress();
        println!("── step {}/{} at {:?}", done + 1, total, session.position());

        let outcomes: Vec<Outcome> = match session.screen() {
            Screen::Theory { text } => {
                println!("    {text}");
                Vec::new()
            }
            Screen::WordStudy { words, .. } => {
                for w in words {
                    println!("    {} {} = {}", w.emoji, w.finnish, w.russian);
                }
                Vec::new()
            }
            Screen::MiniTest { questions, .. } => questions
                .iter()
                .map(|q| {
                    print_question(&mut render_rng, session.lesson(), q);
                    Outcome::from(q.check(q.correct()))
                })
                .collect(),
            Screen::Exercises { questions, .. } => {
                for q in &questions {
                    print_question(&mut render_rng, session.lesson(), q);
                }
                vec![Outcome::Skip; questions.len()]
            }
            Screen::MiniDialogue { dialogue, .. } => {
                let steps = dialogue_steps(&mut render_rng, dialogue, session.config().dialogue_option_count);
                print_dialogue(&dialogue.title, &steps);
                vec![Outcome::Correct]
            }
            Screen::FinalExam { index, count, task } => {
                println!("    exam task {}/{}", index + 1, count);
                match task {
                    ExamTask::Question { question } => {
                        print_question(&mut render_rng, session.lesson(), question);
                        if mistake_made {
                            vec![Outcome::from(question.check(question.correct()))]
                        } else {
                            mistake_made = true;
                            vec![Outcome::from(question.check("väärin"))]
                        }
                    }
                    ExamTask::Dialogue { dialogue } => {
                        let steps = dialogue_steps(&mut render_rng, dialogue, session.config().dialogue_option_count);
                        print_dialogue(&dialogue.title, &steps);
                        vec![Outcome::Correct]
                    }
                }
            }
            Screen::Quiz { question, .. } => {
                print_question(&mut render_rng, session.lesson(), question);
                vec![Outcome::from(question.check(question.correct()))]
            }
            Screen::Empty { block } => {
                println!("    ({block}: nothing to show)");
                Vec::new()
            }
            Screen::Finished { .. } => Vec::new(),
        };

        for outcome in outcomes {
            session.record_result(outcome);
        }
        session.advance();
    }

    if let Screen::Finished { stats, score } = session.screen() {
        println!("finished: {score}% ({}/{})", stats.correct, stats.total);
    }
    Ok(())
}
