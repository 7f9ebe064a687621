//! Block ordering within and across cycles, and the hand-off to the final exam.
//!
//! ```text
//! cycle 0:  [theory] → word-study → mini-test → [mini-dialogue] → [exercises]
//! cycle 1:             word-study → mini-test → [mini-dialogue] → [exercises]
//! ...
//! last cycle done → final-exam (task 0 .. n-1) → finished
//! ```
//!
//! Bracketed blocks depend on content and cycle index; see [`blocks_for_cycle`].

use log::debug;
use serde::{Deserialize, Serialize};

use crate::lesson_engine::models::{Block, Cycle};

/// Mini-dialogue is offered from this cycle index on.
pub const DIALOGUE_FROM_CYCLE: usize = 1;
/// Exercises are offered from this cycle index on.
pub const EXERCISES_FROM_CYCLE: usize = 2;

/// Lesson-wide switches that shape each cycle's block list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockRules {
    pub has_theory: bool,
    /// Drops the cycle-index thresholds for mini-dialogue and exercises.
    pub intensive: bool,
}

/// Ordered blocks for the cycle at `index`.
pub fn blocks_for_cycle(index: usize, cycle: &Cycle, rules: BlockRules) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(5);
    if index == 0 && rules.has_theory {
        blocks.push(Block::Theory);
    }
    blocks.push(Block::WordStudy);
    blocks.push(Block::MiniTest);
    if (rules.intensive || index >= DIALOGUE_FROM_CYCLE) && cycle.dialogue.is_some() {
        blocks.push(Block::MiniDialogue);
    }
    if (rules.intensive || index >= EXERCISES_FROM_CYCLE) && cycle.has_exercises() {
        blocks.push(Block::Exercises);
    }
    blocks
}

/// Block lists for every cycle, in order.
pub fn plan_blocks(cycles: &[Cycle], rules: BlockRules) -> Vec<Vec<Block>> {
    cycles
        .iter()
        .enumerate()
        .map(|(i, c)| blocks_for_cycle(i, c, rules))
        .collect()
}

/// Where the learner currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "at", rename_all = "kebab-case")]
pub enum Cursor {
    Block { cycle: usize, block: Block, index: usize },
    Exam { task: usize },
    Finished,
}

/// Drives a learner through the planned blocks, then the exam tasks.
#[derive(Debug, Clone)]
pub struct BlockSequencer {
    plan: Vec<Vec<Block>>,
    exam_len: usize,
    cursor: Cursor,
}

impl BlockSequencer {
    pub fn new(plan: Vec<Vec<Block>>, exam_len: usize) -> Self {
        let mut seq = BlockSequencer { plan, exam_len, cursor: Cursor::Finished };
        seq.cursor = seq.start();
        seq
    }

    /// First block of the first cycle.
    fn start(&self) -> Cursor {
        self.block_at(0, 0).unwrap_or_else(|| self.exam_entry())
    }

    fn block_at(&self, cycle: usize, index: usize) -> Option<Cursor> {
        let block = *self.plan.get(cycle)?.get(index)?;
        Some(Cursor::Block { cycle, block, index })
    }

    /// An empty exam finishes the session on entry.
    fn exam_entry(&self) -> Cursor {
        if self.exam_len == 0 {
            Cursor::Finished
        } else {
            Cursor::Exam { task: 0 }
        }
    }

    /// `word-study` of the given cycle, or its first block if it has none.
    fn word_study_of(&self, cycle: usize) -> Option<Cursor> {
        let blocks = self.plan.get(cycle)?;
        let index = blocks.iter().position(|b| *b == Block::WordStudy).unwrap_or(0);
        self.block_at(cycle, index)
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn plan(&self) -> &[Vec<Block>] {
        &self.plan
    }

    pub fn exam_len(&self) -> usize {
        self.exam_len
    }

    pub fn current_block(&self) -> Option<Block> {
        match self.cursor {
            Cursor::Block { block, .. } => Some(block),
            Cursor::Exam { .. } => Some(Block::FinalExam),
            Cursor::Finished => None,
        }
    }

    pub fn current_cycle(&self) -> Option<usize> {
        match self.cursor {
            Cursor::Block { cycle, .. } => Some(cycle),
            Cursor::Exam { .. } => self.plan.len().checked_sub(1),
            Cursor::Finished => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor == Cursor::Finished
    }

    /// Next block in the cycle, else the next cycle's first block, else the
    /// exam. Inside the exam it steps task by task; past the last one the
    /// session is finished.
    pub fn advance(&mut self) -> Cursor {
        let next = match self.cursor {
            Cursor::Block { cycle, index, .. } => self
                .block_at(cycle, index + 1)
                .or_else(|| self.block_at(cycle + 1, 0))
                .unwrap_or_else(|| self.exam_entry()),
            Cursor::Exam { task } if task + 1 < self.exam_len => Cursor::Exam { task: task + 1 },
            Cursor::Exam { .. } | Cursor::Finished => Cursor::Finished,
        };
        debug!("advance: {:?} -> {:?}", self.cursor, next);
        self.cursor = next;
        next
    }

    /// Previous block in the same cycle. From a cycle's first block the
    /// previous cycle is re-entered at `word-study`, not at its last block.
    pub fn back(&mut self) -> Cursor {
        let prev = match self.cursor {
            Cursor::Block { cycle, index, .. } if index > 0 => self.block_at(cycle, index - 1),
            Cursor::Block { cycle, .. } if cycle > 0 => self.word_study_of(cycle - 1),
            Cursor::Block { .. } => None,
            Cursor::Exam { task } if task > 0 => Some(Cursor::Exam { task: task - 1 }),
            Cursor::Exam { .. } => self
                .plan
                .len()
                .checked_sub(1)
                .and_then(|last| self.word_study_of(last)),
            Cursor::Finished => None,
        };
        if let Some(prev) = prev {
            debug!("back: {:?} -> {:?}", self.cursor, prev);
            self.cursor = prev;
        }
        self.cursor
    }

    /// Jump to a stored position. A block missing from that cycle's plan lands
    /// on the cycle's first block. Returns `false` (cursor untouched) when the
    /// cycle does not exist.
    pub fn jump_to(&mut self, cycle: usize, block: Block) -> bool {
        if block == Block::FinalExam {
            self.cursor = self.exam_entry();
            return true;
        }
        let Some(blocks) = self.plan.get(cycle) else {
            return false;
        };
        let index = blocks.iter().position(|b| *b == block).unwrap_or(0);
        match self.block_at(cycle, index) {
            Some(cursor) => {
                self.cursor = cursor;
                true
            }
            None => false,
        }
    }

    /// Back to the very first block.
    pub fn reset(&mut self) {
        self.cursor = self.start();
    }

    /// `(steps done, steps total)` over all blocks plus exam tasks.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.plan.iter().map(Vec::len).sum::<usize>() + self.exam_len;
        let done = match self.cursor {
            Cursor::Block { cycle, index, .. } => {
                self.plan[..cycle].iter().map(Vec::len).sum::<usize>() + index
            }
            Cursor::Exam { task } => total - self.exam_len + task,
            Cursor::Finished => total,
        };
        (done, total)
    }
}
