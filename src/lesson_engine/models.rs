use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lesson_engine::{
    error::EngineResult,
    evaluator::{answers_match, assembled_matches, normalize},
};

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSentence {
    #[serde(default)]
    pub finnish: String,
    #[serde(default)]
    pub russian: String,
}

/// One vocabulary item. Loaded once with the lesson and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub finnish: String,
    pub russian: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default, alias = "exampleSentence", skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<ExampleSentence>,
}

impl Word {
    pub fn new(finnish: impl Into<String>, russian: impl Into<String>, emoji: impl Into<String>) -> Self {
        Word {
            finnish: finnish.into(),
            russian: russian.into(),
            emoji: emoji.into(),
            example_sentence: None,
        }
    }

    pub fn with_example(mut self, finnish: impl Into<String>, russian: impl Into<String>) -> Self {
        self.example_sentence = Some(ExampleSentence {
            finnish: finnish.into(),
            russian: russian.into(),
        });
        self
    }

    /// Case-insensitive, trimmed key used to compare words with question answers.
    pub fn key(&self) -> String {
        normalize(&self.finnish)
    }
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    Choice,
    Assemble,
    FillIn,
    FillInChoice,
    AudioChoice,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionKind::Choice       => "choice",
            QuestionKind::Assemble     => "translate",
            QuestionKind::FillIn       => "fill-in",
            QuestionKind::FillInChoice => "fill-in-choice",
            QuestionKind::AudioChoice  => "audio-choice",
        };
        write!(f, "{}", s)
    }
}

/// A practice question with its answer already resolved to a literal string.
///
/// Choice-like variants always carry `correct` inside `options`. Assemble and
/// typed fill-in questions carry no options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Question {
    Choice {
        question: String,
        correct: String,
        options: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translation: Option<String>,
    },
    /// Sentence assembly from word tiles; `correct` is the full target phrase.
    #[serde(rename = "translate")]
    Assemble {
        question: String,
        correct: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translation: Option<String>,
    },
    /// Typed answer into a blank.
    FillIn {
        question: String,
        correct: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translation: Option<String>,
    },
    FillInChoice {
        question: String,
        correct: String,
        options: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        translation: Option<String>,
    },
    /// Listen to `audio` (Finnish text handed to TTS) and pick its meaning.
    AudioChoice {
        question: String,
        audio: String,
        correct: String,
        options: Vec<String>,
    },
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::Choice { .. }       => QuestionKind::Choice,
            Question::Assemble { .. }     => QuestionKind::Assemble,
            Question::FillIn { .. }       => QuestionKind::FillIn,
            Question::FillInChoice { .. } => QuestionKind::FillInChoice,
            Question::AudioChoice { .. }  => QuestionKind::AudioChoice,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Question::Choice { question, .. }
            | Question::Assemble { question, .. }
            | Question::FillIn { question, .. }
            | Question::FillInChoice { question, .. }
            | Question::AudioChoice { question, .. } => question,
        }
    }

    pub fn correct(&self) -> &str {
        match self {
            Question::Choice { correct, .. }
            | Question::Assemble { correct, .. }
            | Question::FillIn { correct, .. }
            | Question::FillInChoice { correct, .. }
            | Question::AudioChoice { correct, .. } => correct,
        }
    }

    /// Empty for assemble and typed fill-in questions.
    pub fn options(&self) -> &[String] {
        match self {
            Question::Choice { options, .. }
            | Question::FillInChoice { options, .. }
            | Question::AudioChoice { options, .. } => options,
            Question::Assemble { .. } | Question::FillIn { .. } => &[],
        }
    }

    pub fn translation(&self) -> Option<&str> {
        match self {
            Question::Choice { translation, .. }
            | Question::Assemble { translation, .. }
            | Question::FillIn { translation, .. }
            | Question::FillInChoice { translation, .. } => translation.as_deref(),
            Question::AudioChoice { .. } => None,
        }
    }

    pub fn is_choice_like(&self) -> bool {
        matches!(
            self.kind(),
            QuestionKind::Choice | QuestionKind::FillInChoice | QuestionKind::AudioChoice
        )
    }

    /// Assemble and fill-in questions make up the exercises block.
    pub fn is_exercise(&self) -> bool {
        matches!(
            self.kind(),
            QuestionKind::Assemble | QuestionKind::FillIn | QuestionKind::FillInChoice
        )
    }

    /// Key under which two questions count as duplicates.
    pub fn dedup_key(&self) -> String {
        normalize(self.correct())
    }

    /// Check a learner's answer. Assemble answers are the tiles joined by spaces.
    pub fn check(&self, answer: &str) -> bool {
        match self {
            Question::Assemble { correct, .. } => {
                let tiles: Vec<String> = answer.split_whitespace().map(str::to_string).collect();
                assembled_matches(correct, &tiles)
            }
            _ => answers_match(self.correct(), answer),
        }
    }
}

/// `correct` as stored in lesson content: an index into `options` or the literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCorrect {
    Index(usize),
    Text(String),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RawQuestionType {
    #[default]
    Choice,
    Translate,
    FillIn,
    FillInChoice,
    AudioChoice,
    #[serde(other)]
    Unknown,
}

/// A static question exactly as the content collaborator delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuestion {
    #[serde(rename = "type", default)]
    pub kind: RawQuestionType,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub correct: Option<RawCorrect>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

// ---------------------------------------------------------------------------
// Dialogues
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    #[serde(default)]
    pub speaker: String,
    pub line: String,
    #[serde(default)]
    pub translation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Turn {
    /// Shown directly.
    Interlocutor,
    /// The learner picks this line from a small option set.
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dialogue {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub lines: Vec<DialogueLine>,
}

impl Dialogue {
    /// Even line indices belong to the interlocutor, odd ones to the learner.
    pub fn turn_of(line_index: usize) -> Turn {
        if line_index % 2 == 0 {
            Turn::Interlocutor
        } else {
            Turn::User
        }
    }

    pub fn user_lines(&self) -> impl Iterator<Item = &DialogueLine> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(i, _)| Dialogue::turn_of(*i) == Turn::User)
            .map(|(_, l)| l)
    }
}

// ---------------------------------------------------------------------------
// Lesson aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    /// Cycle-based progression ending in a final exam.
    Cycles,
    /// Whole vocabulary as one cycle, played as a single flat pass.
    Random,
    /// Flat list of audio-comprehension questions.
    Listening,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Cycles    => write!(f, "cycles"),
            SessionMode::Random    => write!(f, "random"),
            SessionMode::Listening => write!(f, "listening"),
        }
    }
}

/// Read-only lesson content, produced by the content-loading collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub theory: String,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
    #[serde(default)]
    pub dialogues: Vec<Dialogue>,
    #[serde(default)]
    pub is_random_mode: bool,
    #[serde(default)]
    pub is_listening_mode: bool,
    #[serde(default)]
    pub is_intensive_mode: bool,
}

impl Lesson {
    pub fn new(id: impl Into<String>, words: Vec<Word>) -> Self {
        Lesson {
            id: id.into(),
            title: String::new(),
            theory: String::new(),
            words,
            questions: Vec::new(),
            dialogues: Vec::new(),
            is_random_mode: false,
            is_listening_mode: false,
            is_intensive_mode: false,
        }
    }

    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn has_theory(&self) -> bool {
        !self.theory.trim().is_empty()
    }

    /// Listening takes precedence over random when both flags are set.
    pub fn mode(&self) -> SessionMode {
        if self.is_listening_mode {
            SessionMode::Listening
        } else if self.is_random_mode {
            SessionMode::Random
        } else {
            SessionMode::Cycles
        }
    }
}

// ---------------------------------------------------------------------------
// Cycles and blocks
// ---------------------------------------------------------------------------

/// A bounded study unit derived from the lesson once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    /// New words first, then the review word if one was injected.
    pub words: Vec<Word>,
    pub new_word_count: usize,
    pub questions: Vec<Question>,
    pub dialogue: Option<Dialogue>,
}

impl Cycle {
    pub fn new_words(&self) -> &[Word] {
        self.words.get(..self.new_word_count).unwrap_or(&self.words)
    }

    pub fn review_word(&self) -> Option<&Word> {
        self.words.get(self.new_word_count)
    }

    pub fn has_exercises(&self) -> bool {
        self.questions.iter().any(Question::is_exercise)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Block {
    Theory,
    WordStudy,
    MiniTest,
    MiniDialogue,
    Exercises,
    FinalExam,
}

impl Block {
    pub fn as_str(self) -> &'static str {
        match self {
            Block::Theory       => "theory",
            Block::WordStudy    => "word-study",
            Block::MiniTest     => "mini-test",
            Block::MiniDialogue => "mini-dialogue",
            Block::Exercises    => "exercises",
            Block::FinalExam    => "final-exam",
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Results and records
// ---------------------------------------------------------------------------

/// What an interactive block reports for one answer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Incorrect,
    Skip,
}

impl From<bool> for Outcome {
    fn from(correct: bool) -> Self {
        if correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreStats {
    pub correct: u32,
    pub total: u32,
}

/// The single keyed record used to resume a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub lesson_id: String,
    pub cycle_index: usize,
    pub block: Block,
}

/// Emitted once per finished session to the progress-persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub lesson_id: String,
    pub score: u8,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub new_words: u32,
}
