//! Final-exam assembly: one task per exercise category, shuffled.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::lesson_engine::{
    models::{Dialogue, Question, QuestionKind},
    shuffle::{pick, shuffle},
};

/// Which interaction renderer an exam task needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskVariant {
    Question,
    Dialogue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "kebab-case")]
pub enum ExamTask {
    Question { question: Question },
    Dialogue { dialogue: Dialogue },
}

impl ExamTask {
    pub fn variant(&self) -> TaskVariant {
        match self {
            ExamTask::Question { .. } => TaskVariant::Question,
            ExamTask::Dialogue { .. } => TaskVariant::Dialogue,
        }
    }

    pub fn question(&self) -> Option<&Question> {
        match self {
            ExamTask::Question { question } => Some(question),
            ExamTask::Dialogue { .. } => None,
        }
    }

    pub fn dialogue(&self) -> Option<&Dialogue> {
        match self {
            ExamTask::Dialogue { dialogue } => Some(dialogue),
            ExamTask::Question { .. } => None,
        }
    }
}

fn pick_question<R: Rng>(rng: &mut R, questions: &[Question], kinds: &[QuestionKind]) -> Option<ExamTask> {
    let eligible: Vec<&Question> = questions.iter().filter(|q| kinds.contains(&q.kind())).collect();
    pick(rng, &eligible).map(|q| ExamTask::Question { question: (*q).clone() })
}

/// Sample at most one task from each of fill-in, dialogue, choice and
/// assemble, drawing from the whole lesson. Empty categories are skipped.
pub fn select_exam_tasks<R: Rng>(
    rng: &mut R,
    questions: &[Question],
    dialogues: &[Dialogue],
) -> Vec<ExamTask> {
    let mut tasks = Vec::with_capacity(4);

    tasks.extend(pick_question(rng, questions, &[QuestionKind::FillIn, QuestionKind::FillInChoice]));

    let playable: Vec<&Dialogue> = dialogues.iter().filter(|d| !d.lines.is_empty()).collect();
    tasks.extend(pick(rng, &playable).map(|d| ExamTask::Dialogue { dialogue: (*d).clone() }));

    tasks.extend(pick_question(rng, questions, &[QuestionKind::Choice]));
    tasks.extend(pick_question(rng, questions, &[QuestionKind::Assemble]));

    shuffle(rng, &mut tasks);
    debug!("final exam: {} tasks", tasks.len());
    tasks
}
