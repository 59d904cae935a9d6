// src/services/curriculum.rs

//! Read-only index over the Class -> Subject -> Chapter -> Topic -> Concept
//! tree. Loaded once at startup and shared behind an `Arc`.

use std::path::Path;

use thiserror::Error;

use crate::{
    models::curriculum::{
        Chapter, Class, ClassSummary, Concept, Curriculum, MatchKind, SearchMatch, Subject, Topic,
    },
    utils::text::{contains_ignore_case, snippet},
};

const SNIPPET_CHARS: usize = 120;

#[derive(Debug, Error)]
pub enum CurriculumError {
    #[error("Class '{0}' not found")]
    UnknownClass(String),
    #[error("Subject '{0}' not found")]
    UnknownSubject(String),
    #[error("Chapter '{0}' not found")]
    UnknownChapter(String),
    #[error("Topic '{0}' not found")]
    UnknownTopic(String),
    #[error("Concept '{0}' not found")]
    UnknownConcept(String),
    #[error("Failed to read curriculum: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse curriculum: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct CurriculumIndex {
    curriculum: Curriculum,
}

impl CurriculumIndex {
    pub fn new(curriculum: Curriculum) -> Self {
        Self { curriculum }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CurriculumError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, CurriculumError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn classes(&self) -> Vec<ClassSummary> {
        self.curriculum
            .classes
            .iter()
            .map(|c| ClassSummary {
                id: c.id.clone(),
                name: c.name.clone(),
                subject_count: c.subjects.len(),
            })
            .collect()
    }

    pub fn class(&self, class_id: &str) -> Result<&Class, CurriculumError> {
        self.curriculum
            .classes
            .iter()
            .find(|c| c.id == class_id)
            .ok_or_else(|| CurriculumError::UnknownClass(class_id.to_string()))
    }

    pub fn subject(&self, class_id: &str, subject_id: &str) -> Result<&Subject, CurriculumError> {
        self.class(class_id)?
            .subjects
            .iter()
            .find(|s| s.id == subject_id)
            .ok_or_else(|| CurriculumError::UnknownSubject(subject_id.to_string()))
    }

    pub fn chapter(
        &self,
        class_id: &str,
        subject_id: &str,
        chapter_id: &str,
    ) -> Result<&Chapter, CurriculumError> {
        self.subject(class_id, subject_id)?
            .chapters
            .iter()
            .find(|c| c.id == chapter_id)
            .ok_or_else(|| CurriculumError::UnknownChapter(chapter_id.to_string()))
    }

    pub fn topic(
        &self,
        class_id: &str,
        subject_id: &str,
        chapter_id: &str,
        topic_id: &str,
    ) -> Result<&Topic, CurriculumError> {
        self.chapter(class_id, subject_id, chapter_id)?
            .topics
            .iter()
            .find(|t| t.id == topic_id)
            .ok_or_else(|| CurriculumError::UnknownTopic(topic_id.to_string()))
    }

    /// Finds a concept anywhere in the tree.
    pub fn concept(&self, concept_id: &str) -> Result<&Concept, CurriculumError> {
        self.curriculum
            .classes
            .iter()
            .flat_map(|c| &c.subjects)
            .flat_map(|s| &s.chapters)
            .flat_map(|ch| &ch.topics)
            .flat_map(|t| &t.concepts)
            .find(|c| c.id == concept_id)
            .ok_or_else(|| CurriculumError::UnknownConcept(concept_id.to_string()))
    }

    /// Case-insensitive substring search across the whole tree.
    ///
    /// Blank queries yield no matches.
    pub fn search_content(&self, query: &str) -> Vec<SearchMatch> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches = Vec::new();
        for class in &self.curriculum.classes {
            for subject in &class.subjects {
                if contains_ignore_case(&subject.name, &needle) {
                    matches.push(SearchMatch {
                        kind: MatchKind::Subject,
                        id: subject.id.clone(),
                        title: subject.name.clone(),
                        class_id: class.id.clone(),
                        subject_id: subject.id.clone(),
                        chapter_id: None,
                        topic_id: None,
                        snippet: snippet(&subject.name, SNIPPET_CHARS),
                    });
                }

                for chapter in &subject.chapters {
                    if contains_ignore_case(&chapter.title, &needle) {
                        matches.push(SearchMatch {
                            kind: MatchKind::Chapter,
                            id: chapter.id.clone(),
                            title: chapter.title.clone(),
                            class_id: class.id.clone(),
                            subject_id: subject.id.clone(),
                            chapter_id: Some(chapter.id.clone()),
                            topic_id: None,
                            snippet: snippet(&chapter.title, SNIPPET_CHARS),
                        });
                    }

                    for topic in &chapter.topics {
                        if contains_ignore_case(&topic.title, &needle) {
                            matches.push(SearchMatch {
                                kind: MatchKind::Topic,
                                id: topic.id.clone(),
                                title: topic.title.clone(),
                                class_id: class.id.clone(),
                                subject_id: subject.id.clone(),
                                chapter_id: Some(chapter.id.clone()),
                                topic_id: Some(topic.id.clone()),
                                snippet: snippet(&topic.title, SNIPPET_CHARS),
                            });
                        }

                        for concept in &topic.concepts {
                            if let Some(hit) = concept_hit(concept, &needle) {
                                matches.push(SearchMatch {
                                    kind: MatchKind::Concept,
                                    id: concept.id.clone(),
                                    title: concept.title.clone(),
                                    class_id: class.id.clone(),
                                    subject_id: subject.id.clone(),
                                    chapter_id: Some(chapter.id.clone()),
                                    topic_id: Some(topic.id.clone()),
                                    snippet: snippet(hit, SNIPPET_CHARS),
                                });
                            }
                        }
                    }
                }
            }
        }

        tracing::debug!(query, hits = matches.len(), "curriculum search");
        matches
    }
}

/// Returns the first field of the concept that contains the needle.
fn concept_hit<'a>(concept: &'a Concept, needle: &str) -> Option<&'a str> {
    std::iter::once(concept.title.as_str())
        .chain(std::iter::once(concept.content.as_str()))
        .chain(concept.bullets.iter().map(String::as_str))
        .chain(std::iter::once(concept.key_takeaway.as_str()))
        .find(|field| contains_ignore_case(field, needle))
}
