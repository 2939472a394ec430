use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::api::{ApiError, FeedApi};
use sitefeed_types::{Author, Comment, CreateCommentRequest, Post, PostId};

use super::store::FeedStore;

/// Local validation failures, surfaced inline next to the offending
/// control before any network call.
#[derive(Error, Debug, PartialEq)]
pub enum MutationError {
    #[error("Comment text is empty")]
    EmptyComment,

    #[error("Unknown post: {0}")]
    UnknownPost(PostId),
}

/// Pre-mutation state captured when an optimistic change starts. The
/// sequence number lets a late rollback detect that a newer mutation has
/// touched the post in the meantime and defer to it.
pub(crate) struct Snapshot {
    post: Post,
    seq: u64,
}

/// Performs like/unlike, pin/unpin, delete and add-comment against the
/// store.
///
/// Every operation starts with an identity check: demo posts are mutated
/// purely locally and never reach the transport; real posts get the
/// optimistic change, the network call, and a sequence-checked rollback
/// plus a transient notice on failure.
pub struct MutationCoordinator {
    api: Arc<dyn FeedApi>,
    current_user: Author,
    seqs: HashMap<PostId, u64>,
    pending_delete: Option<PostId>,
}

impl MutationCoordinator {
    pub fn new(api: Arc<dyn FeedApi>, current_user: Author) -> Self {
        Self {
            api,
            current_user,
            seqs: HashMap::new(),
            pending_delete: None,
        }
    }

    pub fn current_user(&self) -> &Author {
        &self.current_user
    }

    /// Capture the revert point for an optimistic mutation and claim the
    /// next sequence number for this post.
    pub(crate) fn begin(&mut self, store: &FeedStore, id: &PostId) -> Option<Snapshot> {
        let post = store.post(id)?.clone();
        let seq = self.seqs.entry(id.clone()).or_insert(0);
        *seq += 1;
        Some(Snapshot { post, seq: *seq })
    }

    /// Revert to the snapshot unless a newer mutation has since claimed
    /// the post, in which case the newer state wins and the stale
    /// rollback is dropped.
    pub(crate) fn rollback(
        &mut self,
        store: &mut FeedStore,
        snapshot: Snapshot,
        op: &str,
        err: &ApiError,
    ) {
        let id = snapshot.post.id.clone();
        log::error!("{} failed for post {}: {}", op, id, err);

        let current = self.seqs.get(&id).copied().unwrap_or(0);
        if current != snapshot.seq {
            log::warn!("{} rollback for post {} superseded by a newer mutation", op, id);
            return;
        }

        if let Some(post) = store.post_mut(&id) {
            *post = snapshot.post;
        }
        store.set_notice(format!("Could not {} the post", op));
    }

    /// Toggle the current user's like. On a successful round trip the
    /// authoritative post replaces the local copy, reconciling concurrent
    /// server-side changes (e.g. another user's like).
    pub async fn toggle_like(
        &mut self,
        store: &mut FeedStore,
        id: &PostId,
    ) -> Result<(), MutationError> {
        let snapshot = self
            .begin(store, id)
            .ok_or_else(|| MutationError::UnknownPost(id.clone()))?;
        let user_id = self.current_user.id;
        let was_liked = snapshot.post.is_liked_by(user_id);

        if let Some(post) = store.post_mut(id) {
            if was_liked {
                post.likes.retain(|liker| *liker != user_id);
                post.like_count -= 1;
            } else if !post.likes.contains(&user_id) {
                post.likes.push(user_id);
                post.like_count += 1;
            }
        }

        let Some(remote) = id.as_remote().map(str::to_owned) else {
            log::debug!("like toggled locally on demo post {}", id);
            return Ok(());
        };

        let op = if was_liked { "unlike" } else { "like" };
        let api = Arc::clone(&self.api);
        let result = if was_liked {
            api.unlike_post(&remote).await
        } else {
            api.like_post(&remote).await
        };

        match result {
            Ok(()) => match api.fetch_post(&remote).await {
                Ok(fresh) => {
                    if let Some(post) = store.post_mut(id) {
                        *post = fresh;
                    }
                }
                Err(err) => {
                    // Optimistic state stands; the next full load reconciles
                    log::warn!("post refresh after {} failed for {}: {}", op, id, err);
                }
            },
            Err(err) => self.rollback(store, snapshot, op, &err),
        }
        Ok(())
    }

    /// Toggle the pinned flag. Pinning changes the global ordering, so a
    /// successful call reloads the whole first page.
    pub async fn toggle_pin(
        &mut self,
        store: &mut FeedStore,
        id: &PostId,
    ) -> Result<(), MutationError> {
        let snapshot = self
            .begin(store, id)
            .ok_or_else(|| MutationError::UnknownPost(id.clone()))?;
        let now_pinned = !snapshot.post.pinned;

        if let Some(post) = store.post_mut(id) {
            post.pinned = now_pinned;
        }

        let Some(remote) = id.as_remote().map(str::to_owned) else {
            log::debug!("pin toggled locally on demo post {}", id);
            return Ok(());
        };

        let op = if now_pinned { "pin" } else { "unpin" };
        let api = Arc::clone(&self.api);
        let result = if now_pinned {
            api.pin_post(&remote).await
        } else {
            api.unpin_post(&remote).await
        };

        match result {
            Ok(()) => store.load(api.as_ref(), 1).await,
            Err(err) => self.rollback(store, snapshot, op, &err),
        }
        Ok(())
    }

    /// First step of deletion: record which post awaits confirmation.
    pub fn request_delete(&mut self, store: &FeedStore, id: &PostId) -> Result<(), MutationError> {
        if store.post(id).is_none() {
            return Err(MutationError::UnknownPost(id.clone()));
        }
        self.pending_delete = Some(id.clone());
        Ok(())
    }

    pub fn pending_delete(&self) -> Option<&PostId> {
        self.pending_delete.as_ref()
    }

    /// Abandon the pending deletion; the collection is untouched.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Carry out the confirmed deletion. Demo posts are removed locally;
    /// real posts are deleted remotely first and only removed on success.
    pub async fn confirm_delete(&mut self, store: &mut FeedStore) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };

        let Some(remote) = id.as_remote().map(str::to_owned) else {
            store.remove_post(&id);
            log::debug!("demo post {} removed locally", id);
            return;
        };

        match self.api.delete_post(&remote).await {
            Ok(()) => {
                store.remove_post(&id);
            }
            Err(err) => {
                log::error!("delete failed for post {}: {}", id, err);
                store.set_notice("Could not delete the post");
            }
        }
    }

    /// Append a comment. Empty or whitespace-only content is rejected
    /// before any network call; demo posts take the same local path
    /// without a network hop, so their commentary is only locally
    /// visible.
    pub async fn add_comment(
        &mut self,
        store: &mut FeedStore,
        id: &PostId,
        content: &str,
    ) -> Result<(), MutationError> {
        let text = content.trim();
        if text.is_empty() {
            return Err(MutationError::EmptyComment);
        }
        if store.post(id).is_none() {
            return Err(MutationError::UnknownPost(id.clone()));
        }

        let Some(remote) = id.as_remote().map(str::to_owned) else {
            let comment = Comment {
                id: Uuid::new_v4(),
                content: text.to_string(),
                author: self.current_user.clone(),
                created_at: Utc::now(),
            };
            if let Some(post) = store.post_mut(id) {
                post.comments.push(comment);
            }
            return Ok(());
        };

        let request = CreateCommentRequest {
            content: text.to_string(),
        };
        match self.api.add_comment(&remote, request).await {
            Ok(updated) => {
                if let Some(post) = store.post_mut(id) {
                    post.comments = updated.comments;
                }
            }
            Err(err) => {
                log::error!("add_comment failed for post {}: {}", id, err);
                store.set_notice("Could not post the comment");
            }
        }
        Ok(())
    }
}
