// src/services/generator.rs

//! Derives quiz questions from curriculum concepts at request time.

use rand::{Rng, seq::SliceRandom};

use crate::{
    config::{
        CHAPTER_TEST_MAX_QUESTIONS, CHAPTER_TEST_MIN_QUESTIONS, MULTIPLE_CHOICE_RATIO,
        QUICK_TEST_MAX_QUESTIONS, QUICK_TEST_MIN_QUESTIONS,
    },
    models::{
        curriculum::{Concept, Topic},
        question::{Difficulty, Question, QuestionType},
    },
    services::curriculum::{CurriculumError, CurriculumIndex},
    utils::{ids::synthetic_id, text::naive_negation},
};

const MULTIPLE_CHOICE_OPTIONS: usize = 4;
const TRUE_FALSE_OPTIONS: [&str; 2] = ["True", "False"];

/// Upper bound on random draws while topping a chapter test up.
const MAX_BACKFILL_ATTEMPTS: usize = CHAPTER_TEST_MIN_QUESTIONS * 10;

/// Ids shared by every question generated for one request.
struct Scope<'a> {
    class_id: &'a str,
    subject_id: &'a str,
    chapter_id: &'a str,
}

pub struct QuestionGenerator<'a> {
    index: &'a CurriculumIndex,
}

impl<'a> QuestionGenerator<'a> {
    pub fn new(index: &'a CurriculumIndex) -> Self {
        Self { index }
    }

    /// Picks 3-5 concepts from one topic, one question each. Topics with
    /// fewer concepts yield one question per concept.
    pub fn quick_test<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        class_id: &str,
        subject_id: &str,
        chapter_id: &str,
        topic_id: &str,
    ) -> Result<Vec<Question>, CurriculumError> {
        let topic = self.index.topic(class_id, subject_id, chapter_id, topic_id)?;
        if topic.concepts.is_empty() {
            tracing::info!(topic_id, "topic has no concepts, nothing to generate");
            return Ok(Vec::new());
        }

        let scope = Scope {
            class_id,
            subject_id,
            chapter_id,
        };

        let wanted = rng
            .gen_range(QUICK_TEST_MIN_QUESTIONS..=QUICK_TEST_MAX_QUESTIONS)
            .min(topic.concepts.len());

        let mut concepts: Vec<&Concept> = topic.concepts.iter().collect();
        concepts.shuffle(rng);

        let questions = concepts
            .into_iter()
            .take(wanted)
            .map(|concept| question_for_concept(rng, &scope, topic, concept))
            .collect();

        Ok(questions)
    }

    /// Walks every concept of the chapter (capped at 15), then tops the
    /// set up to 10 with random concepts from non-empty topics.
    pub fn chapter_test<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        class_id: &str,
        subject_id: &str,
        chapter_id: &str,
    ) -> Result<Vec<Question>, CurriculumError> {
        let chapter = self.index.chapter(class_id, subject_id, chapter_id)?;
        let scope = Scope {
            class_id,
            subject_id,
            chapter_id,
        };

        let mut questions = Vec::new();
        'topics: for topic in &chapter.topics {
            for concept in &topic.concepts {
                if questions.len() >= CHAPTER_TEST_MAX_QUESTIONS {
                    break 'topics;
                }
                questions.push(question_for_concept(rng, &scope, topic, concept));
            }
        }

        let stocked: Vec<&Topic> = chapter
            .topics
            .iter()
            .filter(|t| !t.concepts.is_empty())
            .collect();

        let mut attempts = 0;
        while !stocked.is_empty()
            && questions.len() < CHAPTER_TEST_MIN_QUESTIONS
            && attempts < MAX_BACKFILL_ATTEMPTS
        {
            attempts += 1;
            let Some(topic) = stocked.choose(rng) else {
                break;
            };
            if let Some(concept) = topic.concepts.choose(rng) {
                questions.push(question_for_concept(rng, &scope, topic, concept));
            }
        }

        if questions.is_empty() {
            tracing::info!(chapter_id, "chapter has no concepts, nothing to generate");
        }

        Ok(questions)
    }
}

fn question_for_concept<R: Rng + ?Sized>(
    rng: &mut R,
    scope: &Scope<'_>,
    topic: &Topic,
    concept: &Concept,
) -> Question {
    let question_type = if rng.gen_bool(MULTIPLE_CHOICE_RATIO) {
        QuestionType::MultipleChoice
    } else {
        QuestionType::TrueFalse
    };
    let difficulty = Difficulty::ALL[rng.gen_range(0..Difficulty::ALL.len())];

    let (question, options, correct_answer, explanation) = match question_type {
        QuestionType::MultipleChoice => multiple_choice(rng, topic, concept),
        QuestionType::TrueFalse => true_false(rng, concept),
    };

    Question {
        id: synthetic_id("q", rng),
        topic_id: topic.id.clone(),
        chapter_id: scope.chapter_id.to_string(),
        subject_id: scope.subject_id.to_string(),
        class_id: scope.class_id.to_string(),
        question_type,
        question,
        options,
        correct_answer,
        explanation,
        difficulty,
        related_concept: Some(concept.id.clone()),
    }
}

/// One bullet of the concept is the answer; distractors are bullets of
/// sibling concepts in the same topic, padded with "Option N".
fn multiple_choice<R: Rng + ?Sized>(
    rng: &mut R,
    topic: &Topic,
    concept: &Concept,
) -> (String, Vec<String>, usize, String) {
    let correct_text = concept
        .bullets
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| concept.key_takeaway.clone());

    let mut distractors: Vec<&String> = topic
        .concepts
        .iter()
        .filter(|c| c.id != concept.id)
        .flat_map(|c| &c.bullets)
        .collect();
    distractors.shuffle(rng);

    let mut options = vec![correct_text.clone()];
    for candidate in distractors {
        if options.len() == MULTIPLE_CHOICE_OPTIONS {
            break;
        }
        if !options.contains(candidate) {
            options.push(candidate.clone());
        }
    }
    while options.len() < MULTIPLE_CHOICE_OPTIONS {
        options.push(format!("Option {}", options.len() + 1));
    }

    options.shuffle(rng);
    let correct_answer = options
        .iter()
        .position(|o| *o == correct_text)
        .unwrap_or_default();

    (
        format!("Which of the following is true about {}?", concept.title),
        options,
        correct_answer,
        concept.key_takeaway.clone(),
    )
}

/// Presents the key takeaway either verbatim (True) or naively negated
/// (False). When no negation rule applies the statement stays True.
fn true_false<R: Rng + ?Sized>(rng: &mut R, concept: &Concept) -> (String, Vec<String>, usize, String) {
    let takeaway = &concept.key_takeaway;
    let negated = if rng.gen_bool(0.5) {
        naive_negation(takeaway)
    } else {
        None
    };

    let options = TRUE_FALSE_OPTIONS.iter().map(|o| o.to_string()).collect();
    match negated {
        Some(statement) => (
            format!("True or False: {}", statement),
            options,
            1,
            format!("False. {}", takeaway),
        ),
        None => (
            format!("True or False: {}", takeaway),
            options,
            0,
            format!("True. {}", takeaway),
        ),
    }
}
