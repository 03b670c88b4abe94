//! User feedback entries and the in-memory review store

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::ReviewValidationError;

/// Author name of the auto-generated review
pub const SYNTHETIC_REVIEWER: &str = "AI Assistant";

const AVATAR_BASE_URL: &str = "https://picsum.photos/seed";
const SYNTHETIC_AVATAR_SEED: &str = "ai";

fn avatar_url(seed: &str) -> String {
    let seed: String = url::form_urlencoded::byte_serialize(seed.as_bytes()).collect();
    format!("{AVATAR_BASE_URL}/{seed}/50/50")
}

/// Star rating, always within `1..=5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    pub const ONE: StarRating = StarRating(1);
    pub const THREE: StarRating = StarRating(3);
    pub const FIVE: StarRating = StarRating(5);

    pub fn new(value: i64) -> Result<Self, ReviewValidationError> {
        match value {
            1..=5 => Ok(Self(value as u8)),
            other => Err(ReviewValidationError::RatingOutOfRange(other)),
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Label shown next to the stars in the review form
    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "Very Bad / Toxic",
            2 => "Bad",
            3 => "Average",
            4 => "Good",
            _ => "Excellent / Healthy",
        }
    }
}

impl TryFrom<i64> for StarRating {
    type Error = ReviewValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.0
    }
}

/// Identifier of a review, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A review as typed by the user, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub author: String,
    pub rating: i64,
    pub comment: String,
}

impl ReviewDraft {
    pub fn new(author: impl Into<String>, rating: i64, comment: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            rating,
            comment: comment.into(),
        }
    }
}

/// An immutable review entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    id: ReviewId,
    author: String,
    rating: StarRating,
    comment: String,
    created_at: DateTime<Utc>,
    avatar_url: String,
}

impl ReviewEntry {
    /// The review written by the synthetic reviewer right after a successful analysis
    pub fn synthetic(result: &AnalysisResult) -> Self {
        Self {
            id: ReviewId::generate(),
            author: SYNTHETIC_REVIEWER.to_string(),
            rating: result.health_score.seeded_stars(),
            comment: format!(
                "Based on initial analysis, this product scores {}/100. {}",
                result.health_score, result.summary
            ),
            created_at: Utc::now(),
            avatar_url: avatar_url(SYNTHETIC_AVATAR_SEED),
        }
    }

    fn from_draft(draft: ReviewDraft) -> Result<Self, ReviewValidationError> {
        let author = draft.author.trim();
        if author.is_empty() {
            return Err(ReviewValidationError::EmptyAuthor);
        }
        let comment = draft.comment.trim();
        if comment.is_empty() {
            return Err(ReviewValidationError::EmptyComment);
        }
        let rating = StarRating::new(draft.rating)?;

        Ok(Self {
            id: ReviewId::generate(),
            author: author.to_string(),
            rating,
            comment: comment.to_string(),
            created_at: Utc::now(),
            avatar_url: avatar_url(author),
        })
    }

    pub fn id(&self) -> ReviewId {
        self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn rating(&self) -> StarRating {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }
}

/// Insertion-ordered review list, newest first. Append-only.
#[derive(Debug, Clone, Default)]
pub struct ReviewStore {
    entries: VecDeque<ReviewEntry>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a system-generated entry
    pub fn seed(&mut self, entry: ReviewEntry) {
        self.entries.push_front(entry);
    }

    /// Validate and prepend a user submission. A rejected draft leaves the store untouched.
    pub fn append(&mut self, draft: ReviewDraft) -> Result<&ReviewEntry, ReviewValidationError> {
        let entry = ReviewEntry::from_draft(draft)?;
        self.entries.push_front(entry);
        Ok(&self.entries[0])
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &ReviewEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&ReviewEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
