//! Reviews and threaded comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use validator::Validate;

use crate::domain::events::{FeedbackEvent, StoreEvent};
use crate::domain::value_objects::{not_blank, Rating};
use crate::Id;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Id,
    pub model_id: Id,
    #[serde(default)] pub account_id: Option<Id>,
    #[serde(default)] pub user_name: Option<String>,
    pub rating: Rating,
    pub content: String,
    #[serde(default)] pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewForm {
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: u8,
    #[validate(length(min = 1, max = 1000), custom = "not_blank")]
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview { pub model_id: Id, pub rating: Rating, pub content: String }

impl ReviewForm {
    /// Upstream body; callers validate first.
    pub fn into_new(self, model_id: Id) -> Option<NewReview> {
        Some(NewReview { model_id, rating: Rating::new(self.rating).ok()?, content: self.content.trim().to_string() })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub count: u32,
    pub average: f32,
    /// Counts for one through five stars.
    pub histogram: [u32; 5],
}

impl RatingSummary {
    pub fn from_reviews<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Self {
        let mut summary = Self::default();
        let mut total = 0u32;
        for review in reviews {
            let stars = review.rating.value();
            summary.histogram[usize::from(stars - 1)] += 1;
            summary.count += 1;
            total += u32::from(stars);
        }
        if summary.count > 0 {
            summary.average = (total as f32 * 10.0 / summary.count as f32).round() / 10.0;
        }
        summary
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Id,
    pub model_id: Id,
    #[serde(default)] pub account_id: Option<Id>,
    #[serde(default)] pub user_name: Option<String>,
    pub content: String,
    #[serde(default)] pub parent_id: Option<Id>,
    #[serde(default)] pub replies: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommentForm {
    #[validate(length(min = 1, max = 500), custom = "not_blank")]
    pub content: String,
    #[serde(default)] pub parent_id: Option<Id>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment { pub model_id: Id, pub content: String, pub parent_id: Option<Id> }

impl CommentForm {
    pub fn into_new(self, model_id: Id) -> NewComment {
        NewComment { model_id, content: self.content.trim().to_string(), parent_id: self.parent_id }
    }
}

/// Two-level comment tree: top-level comments, each with a flat list of replies.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThread {
    roots: Vec<Comment>,
    #[serde(skip)]
    events: Vec<StoreEvent>,
}

impl CommentThread {
    /// Builds the tree from nested replies, flat `parentId` replies, or a mix.
    /// Deeper replies hang off their top-level ancestor; replies whose
    /// ancestor is not on this page are dropped.
    pub fn from_comments(comments: Vec<Comment>) -> Self {
        let mut flat = Vec::new();
        for comment in comments { flatten(comment, None, &mut flat); }

        let mut seen = HashSet::new();
        flat.retain(|c| seen.insert(c.id));

        let parents: HashMap<Id, Option<Id>> = flat.iter().map(|c| (c.id, c.parent_id)).collect();
        let root_of = |mut id: Id| -> Option<Id> {
            for _ in 0..=parents.len() {
                match parents.get(&id)? {
                    None => return Some(id),
                    Some(parent) => id = *parent,
                }
            }
            None
        };

        let (mut roots, replies): (Vec<Comment>, Vec<Comment>) = flat.into_iter().partition(|c| c.parent_id.is_none());
        let index: HashMap<Id, usize> = roots.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        for reply in replies {
            if let Some(pos) = root_of(reply.id).and_then(|root| index.get(&root)) {
                roots[*pos].replies.push(reply);
            }
        }

        roots.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        for root in &mut roots {
            root.replies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        }
        Self { roots, events: vec![] }
    }

    pub fn roots(&self) -> &[Comment] { &self.roots }
    pub fn total(&self) -> usize { self.roots.iter().map(|r| 1 + r.replies.len()).sum() }

    /// Mirrors a just-posted comment or reply.
    pub fn attach(&mut self, mut comment: Comment) -> Result<(), FeedbackError> {
        let event = FeedbackEvent::CommentPosted { model_id: comment.model_id, comment_id: comment.id, parent_id: comment.parent_id };
        match comment.parent_id {
            None => self.roots.insert(0, comment),
            Some(parent) => {
                let root = self.roots.iter_mut()
                    .find(|r| r.id == parent || r.replies.iter().any(|c| c.id == parent))
                    .ok_or(FeedbackError::ParentNotFound(parent))?;
                comment.replies.clear();
                root.replies.push(comment);
            }
        }
        self.events.push(StoreEvent::Feedback(event));
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<StoreEvent> { std::mem::take(&mut self.events) }
}

fn flatten(mut comment: Comment, parent: Option<Id>, out: &mut Vec<Comment>) {
    if comment.parent_id.is_none() { comment.parent_id = parent; }
    let replies = std::mem::take(&mut comment.replies);
    let id = comment.id;
    out.push(comment);
    for reply in replies { flatten(reply, Some(id), out); }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error("Comment {0} not found")]
    ParentNotFound(Id),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn comment(id: Id, parent_id: Option<Id>, minute: u32) -> Comment {
        Comment {
            id, model_id: 1, account_id: None, user_name: None, content: format!("c{id}"), parent_id,
            replies: vec![], created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap(),
        }
    }

    #[test]
    fn test_flat_comments_become_two_levels() {
        let thread = CommentThread::from_comments(vec![
            comment(1, None, 0), comment(2, None, 5), comment(3, Some(1), 6), comment(4, Some(3), 7), comment(5, Some(99), 8),
        ]);
        let ids: Vec<_> = thread.roots().iter().map(|c| c.id).collect();
        assert_eq!(ids, [2, 1]);
        let replies: Vec<_> = thread.roots()[1].replies.iter().map(|c| c.id).collect();
        assert_eq!(replies, [3, 4]);
        assert_eq!(thread.total(), 4);
    }

    #[test]
    fn test_nested_replies_are_kept() {
        let mut root = comment(1, None, 0);
        let mut reply = comment(2, None, 2);
        reply.replies.push(comment(3, None, 3));
        root.replies.push(reply);
        let thread = CommentThread::from_comments(vec![root]);
        assert_eq!(thread.roots().len(), 1);
        assert_eq!(thread.roots()[0].replies.iter().map(|c| c.id).collect::<Vec<_>>(), [2, 3]);
    }

    #[test]
    fn test_attach_reply_to_reply() {
        let mut thread = CommentThread::from_comments(vec![comment(1, None, 0), comment(2, Some(1), 1)]);
        thread.attach(comment(3, Some(2), 2)).unwrap();
        thread.attach(comment(4, None, 3)).unwrap();
        assert_eq!(thread.roots()[0].id, 4);
        assert_eq!(thread.roots()[1].replies.len(), 2);
        assert_eq!(thread.attach(comment(5, Some(42), 4)), Err(FeedbackError::ParentNotFound(42)));
        assert_eq!(thread.take_events().len(), 2);
    }

    #[test]
    fn test_rating_summary() {
        let review = |id, stars| Review { id, model_id: 1, account_id: None, user_name: None, rating: Rating::new(stars).unwrap(), content: "ok".into(), created_at: None };
        let reviews = [review(1, 5), review(2, 4), review(3, 4)];
        let summary = RatingSummary::from_reviews(&reviews);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average, 4.3);
        assert_eq!(summary.histogram, [0, 0, 0, 2, 1]);
    }

    #[test]
    fn test_review_form_rejects_blank_content() {
        let form = ReviewForm { rating: 5, content: "   ".into() };
        assert!(form.validate().is_err());
        let form = ReviewForm { rating: 0, content: "great".into() };
        assert!(form.validate().is_err());
    }
}
