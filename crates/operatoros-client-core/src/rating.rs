use crate::api::{ConversationId, RatingSubmission};

pub const DEFAULT_STAR_COUNT: usize = 5;

/// Star row state for one rendered response.
///
/// Mouse-leave clears every star, including a committed rating. That matches
/// the behaviour pages already ship with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingControl {
    conversation_id: ConversationId,
    star_count: usize,
    committed: Option<u8>,
    lit: usize,
}

impl RatingControl {
    #[must_use]
    pub fn new(conversation_id: ConversationId, star_count: usize) -> Self {
        Self {
            conversation_id,
            star_count,
            committed: None,
            lit: 0,
        }
    }

    #[must_use]
    pub fn conversation_id(&self) -> &ConversationId {
        &self.conversation_id
    }

    #[must_use]
    pub fn committed(&self) -> Option<u8> {
        self.committed
    }

    /// Hovering star `index` lights stars `0..=index`.
    pub fn hover(&mut self, index: usize) {
        if index < self.star_count {
            self.lit = index + 1;
        }
    }

    pub fn leave(&mut self) {
        self.lit = 0;
    }

    /// Commits the 1-based rating for star `index`.
    pub fn click(&mut self, index: usize) -> Option<RatingSubmission> {
        if index >= self.star_count {
            return None;
        }
        let rating = u8::try_from(index + 1).ok()?;
        self.committed = Some(rating);
        self.lit = index + 1;
        Some(RatingSubmission {
            conversation_id: self.conversation_id.clone(),
            rating,
        })
    }

    #[must_use]
    pub fn is_lit(&self, index: usize) -> bool {
        index < self.lit
    }

    /// Highlight flags for every star, left to right.
    #[must_use]
    pub fn highlights(&self) -> Vec<bool> {
        (0..self.star_count).map(|index| self.is_lit(index)).collect()
    }
}
