// src/models/curriculum.rs

use serde::{Deserialize, Serialize};

/// Root of the static curriculum document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Curriculum {
    pub classes: Vec<Class>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub concepts: Vec<Concept>,
}

/// Leaf content unit. Questions are derived from these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    pub key_takeaway: String,
}

/// Lightweight listing entry for the class picker.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub id: String,
    pub name: String,
    pub subject_count: usize,
}

/// What part of the tree a search hit landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Subject,
    Chapter,
    Topic,
    Concept,
}

/// A single `search_content` hit, carrying the full id path so the
/// client can navigate straight to it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub kind: MatchKind,
    pub id: String,
    pub title: String,
    pub class_id: String,
    pub subject_id: String,
    pub chapter_id: Option<String>,
    pub topic_id: Option<String>,
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}
