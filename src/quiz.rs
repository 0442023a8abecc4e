use std::collections::BTreeSet;

use rand::seq::{IteratorRandom, SliceRandom};

use super::types::{LexicalStore, Term};

/// Direction of a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizKind {
    /// Show a key, pick its definition.
    WordToDefinition,
    /// Show a definition, pick its key.
    DefinitionToWord,
}

/// One multiple-choice question drawn from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub kind: QuizKind,
    /// Key of the term the question is about.
    pub term_key: String,
    /// Text shown to the player.
    pub prompt: String,
    /// Distinct, shuffled answer texts.
    pub options: Vec<String>,
    /// Position of the expected answer in `options`.
    pub answer: usize,
    accepted: Vec<String>,
}

impl QuizQuestion {
    /// Whether `choice` answers the question. Any definition of the term counts
    /// for [`QuizKind::WordToDefinition`].
    pub fn is_correct(&self, choice: &str) -> bool {
        self.accepted.iter().any(|accepted| accepted == choice)
    }

    pub fn answer_text(&self) -> &str {
        &self.options[self.answer]
    }
}

fn option_text(term: &Term, kind: QuizKind) -> Option<&str> {
    match kind {
        QuizKind::WordToDefinition => term.definitions().first().map(String::as_str),
        QuizKind::DefinitionToWord => term.definitions().first().map(|_| term.key()),
    }
}

impl LexicalStore {
    /// Draw a question with `option_count` distinct options.
    ///
    /// Terms without definitions are skipped. Returns `None` when the store
    /// cannot supply enough distinct options.
    pub fn quiz_question(&mut self, kind: QuizKind, option_count: usize) -> Option<QuizQuestion> {
        let option_count = option_count.max(2);
        let terms = &self.terms;
        let rng = &mut self.rng;

        let correct = terms
            .values()
            .filter(|term| !term.definitions().is_empty())
            .choose(&mut *rng)?;
        let correct_text = option_text(correct, kind)?;

        let (prompt, accepted) = match kind {
            QuizKind::WordToDefinition => {
                (correct.key().to_string(), correct.definitions().to_vec())
            }
            QuizKind::DefinitionToWord => (
                correct.definitions().first()?.clone(),
                vec![correct.key().to_string()],
            ),
        };

        // no distractor may be another accepted answer
        let distractors: BTreeSet<&str> = terms
            .values()
            .filter_map(|term| option_text(term, kind))
            .filter(|text| !accepted.iter().any(|answer| answer == text))
            .collect();
        if distractors.len() < option_count - 1 {
            return None;
        }

        let mut options: Vec<String> = distractors
            .into_iter()
            .choose_multiple(&mut *rng, option_count - 1)
            .into_iter()
            .map(str::to_string)
            .collect();
        options.push(correct_text.to_string());
        options.shuffle(rng);
        let answer = options.iter().position(|option| option == correct_text)?;

        Some(QuizQuestion {
            kind,
            term_key: correct.key().to_string(),
            prompt,
            options,
            answer,
            accepted,
        })
    }
}
