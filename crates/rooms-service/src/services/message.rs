//! Message service
//!
//! Handles message posting, history queries, reaction toggles, and message
//! deletion. Every room broadcast happens after the store operation has
//! committed; a failed broadcast never rolls anything back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rooms_core::entities::{Group, Message, Reaction, User};
use rooms_core::{DomainError, GatewayEvent, ReactionKind, Snowflake};
use tracing::{debug, info, instrument};

use crate::dto::mappers::MessageWithSender;
use crate::dto::{CreateMessageRequest, DeletedResponse, MessageResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a message to a group
    ///
    /// Membership is checked at append time, so a user kicked between
    /// connecting and posting is rejected here. The `messageReceived`
    /// broadcast goes out only after the append has committed.
    #[instrument(skip(self, request))]
    pub async fn post_message(
        &self,
        group_id: Snowflake,
        sender_id: Snowflake,
        request: CreateMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        let group = self.find_group(group_id).await?;
        self.verify_membership(&group, sender_id).await?;

        let content = request.into_content();
        content.validate()?;

        let message = Message::new(self.ctx.generate_id(), group_id, sender_id, content);
        self.ctx.message_repo().create(&message).await?;

        let sender = self.ctx.user_repo().find_by_id(sender_id).await?;

        info!(message_id = %message.id, group_id = %group_id, "Message posted");

        let response = MessageResponse::from(MessageWithSender {
            message,
            sender,
            reactions: vec![],
        });

        self.broadcast_message_event(group_id, &response, |payload| {
            GatewayEvent::MessageReceived {
                group_id,
                message: payload,
            }
        })
        .await;

        Ok(response)
    }

    /// List group history in `(created_at, id)` order
    ///
    /// The group is resolved before authorization so a deleted group yields
    /// `GroupNotFound` rather than an empty history.
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        group_id: Snowflake,
        user_id: Snowflake,
        since: Option<DateTime<Utc>>,
    ) -> ServiceResult<Vec<MessageResponse>> {
        let group = self.find_group(group_id).await?;
        self.verify_membership(&group, user_id).await?;

        let messages = self.ctx.message_repo().find_by_group(group_id, since).await?;

        let message_ids: Vec<Snowflake> = messages.iter().map(|m| m.id).collect();
        let mut reactions = group_reactions_by_message(
            self.ctx.message_repo().reactions_for(&message_ids).await?,
        );

        let senders = self.resolve_senders(&messages).await?;

        let responses = messages
            .into_iter()
            .map(|message| {
                let sender = message
                    .sender_id
                    .and_then(|id| senders.get(&id))
                    .cloned();
                let reactions = reactions.remove(&message.id).unwrap_or_default();
                MessageResponse::from(MessageWithSender {
                    message,
                    sender,
                    reactions,
                })
            })
            .collect();

        Ok(responses)
    }

    /// Toggle one user's reaction of one kind on a message
    ///
    /// Returns the message with its refreshed reaction list; the same payload
    /// is broadcast to the message's room as `reactionUpdated`.
    #[instrument(skip(self))]
    pub async fn react(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> ServiceResult<MessageResponse> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound)?;

        let group = self.find_group(message.group_id).await?;
        self.verify_membership(&group, user_id).await?;

        let active = self
            .ctx
            .message_repo()
            .toggle_reaction(message_id, user_id, kind)
            .await?;

        let reactions = self
            .ctx
            .message_repo()
            .reactions_for(&[message_id])
            .await?;

        let sender = match message.sender_id {
            Some(id) => self.ctx.user_repo().find_by_id(id).await?,
            None => None,
        };

        info!(
            message_id = %message_id,
            user_id = %user_id,
            kind = %kind,
            active,
            "Reaction toggled"
        );

        let group_id = message.group_id;
        let response = MessageResponse::from(MessageWithSender {
            message,
            sender,
            reactions,
        });

        self.broadcast_message_event(group_id, &response, |payload| {
            GatewayEvent::ReactionUpdated {
                group_id,
                message: payload,
            }
        })
        .await;

        Ok(response)
    }

    /// Delete a message (group admin or system owner only)
    ///
    /// The sender cannot delete their own messages unless they also hold one
    /// of those roles.
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        message_id: Snowflake,
        requester_id: Snowflake,
    ) -> ServiceResult<DeletedResponse> {
        let message = self
            .ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound)?;

        let group = self.find_group(message.group_id).await?;

        if !group.is_admin(requester_id) && !self.ctx.user_repo().is_owner(requester_id).await? {
            return Err(DomainError::NotGroupAdmin.into());
        }

        self.ctx.message_repo().delete(message_id).await?;

        info!(message_id = %message_id, group_id = %group.id, "Message deleted");

        self.ctx
            .broadcaster()
            .broadcast_to_room(GatewayEvent::MessageDeleted {
                group_id: group.id,
                message_id,
            })
            .await;

        Ok(DeletedResponse {
            id: message_id.to_string(),
        })
    }

    // === Helpers ===

    async fn find_group(&self, group_id: Snowflake) -> ServiceResult<Group> {
        self.ctx
            .group_repo()
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound.into())
    }

    /// Authorize `user_id` against `group`: the owner and admin pass
    /// implicitly, regular users need a member list row, and a system owner
    /// passes everywhere.
    async fn verify_membership(&self, group: &Group, user_id: Snowflake) -> ServiceResult<()> {
        if group.is_privileged(user_id) {
            return Ok(());
        }
        if self.ctx.group_repo().is_member(group.id, user_id).await? {
            return Ok(());
        }
        if self.ctx.user_repo().is_owner(user_id).await? {
            return Ok(());
        }
        Err(DomainError::NotGroupMember.into())
    }

    async fn resolve_senders(
        &self,
        messages: &[Message],
    ) -> ServiceResult<HashMap<Snowflake, User>> {
        let mut senders = HashMap::new();
        for message in messages {
            let Some(sender_id) = message.sender_id else {
                continue;
            };
            if senders.contains_key(&sender_id) {
                continue;
            }
            if let Some(user) = self.ctx.user_repo().find_by_id(sender_id).await? {
                senders.insert(sender_id, user);
            }
        }
        Ok(senders)
    }

    /// Serialize a message response and hand it to the broadcaster.
    /// Fire-and-forget: a serialization failure is logged, never returned.
    async fn broadcast_message_event<F>(
        &self,
        group_id: Snowflake,
        response: &MessageResponse,
        build: F,
    ) where
        F: FnOnce(serde_json::Value) -> GatewayEvent,
    {
        match serde_json::to_value(response) {
            Ok(payload) => {
                self.ctx.broadcaster().broadcast_to_room(build(payload)).await;
            }
            Err(e) => {
                debug!(group_id = %group_id, error = %e, "Failed to serialize broadcast payload");
            }
        }
    }
}

fn group_reactions_by_message(
    reactions: Vec<Reaction>,
) -> HashMap<Snowflake, Vec<Reaction>> {
    let mut by_message: HashMap<Snowflake, Vec<Reaction>> = HashMap::new();
    for reaction in reactions {
        by_message.entry(reaction.message_id).or_default().push(reaction);
    }
    by_message
}
