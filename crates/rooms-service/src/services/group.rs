//! Group service
//!
//! Handles group lifecycle: creation, updates, joining, kicks, and cascade
//! deletion. Broadcasts for destructive operations go out after the store
//! change has committed; `groupDeleted` is delivered before the room is
//! closed so subscribers still receive it.

use rooms_core::entities::Group;
use rooms_core::{DomainError, GatewayEvent, Snowflake};
use tracing::{info, instrument};

use crate::dto::mappers::GroupWithCount;
use crate::dto::{CreateGroupRequest, DeletedResponse, GroupResponse, UpdateGroupRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Group service
pub struct GroupService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GroupService<'a> {
    /// Create a new GroupService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a group (system owner only)
    ///
    /// The creator becomes the group owner, its admin, and its first member.
    #[instrument(skip(self, request))]
    pub async fn create_group(
        &self,
        creator_id: Snowflake,
        request: CreateGroupRequest,
    ) -> ServiceResult<GroupResponse> {
        if !self.ctx.user_repo().is_owner(creator_id).await? {
            return Err(DomainError::NotOwner.into());
        }

        let mut group = Group::new(self.ctx.generate_id(), request.name, creator_id);
        group.set_description(request.description);

        self.ctx.group_repo().create(&group).await?;
        self.ctx.group_repo().add_member(group.id, creator_id).await?;

        info!(group_id = %group.id, owner_id = %creator_id, "Group created");

        self.group_response(group).await
    }

    /// List all groups, newest first
    #[instrument(skip(self))]
    pub async fn list_groups(&self) -> ServiceResult<Vec<GroupResponse>> {
        let groups = self.ctx.group_repo().find_all().await?;

        let mut responses = Vec::with_capacity(groups.len());
        for group in groups {
            responses.push(self.group_response(group).await?);
        }
        Ok(responses)
    }

    /// Get a group by ID
    #[instrument(skip(self))]
    pub async fn get_group(&self, group_id: Snowflake) -> ServiceResult<GroupResponse> {
        let group = self.find_group(group_id).await?;
        self.group_response(group).await
    }

    /// Update a group's description or transfer its admin role (admin only)
    #[instrument(skip(self, request))]
    pub async fn update_group(
        &self,
        group_id: Snowflake,
        requester_id: Snowflake,
        request: UpdateGroupRequest,
    ) -> ServiceResult<GroupResponse> {
        let mut group = self.find_group(group_id).await?;
        self.verify_admin(&group, requester_id).await?;

        if let Some(description) = request.description {
            group.set_description(Some(description));
        }

        if let Some(admin_id) = request.admin_id {
            let new_admin = Snowflake::parse(&admin_id)
                .map_err(|_| ServiceError::validation("Invalid admin_id"))?;
            if self.ctx.user_repo().find_by_id(new_admin).await?.is_none() {
                return Err(DomainError::UserNotFound.into());
            }
            group.transfer_admin(new_admin);
        }

        self.ctx.group_repo().update(&group).await?;

        info!(group_id = %group_id, "Group updated");

        self.group_response(group).await
    }

    /// Delete a group and its entire history (system owner only)
    ///
    /// Messages, reactions, and the member list go with it. Subscribers get
    /// `groupDeleted` and their connections are then detached from the room.
    #[instrument(skip(self))]
    pub async fn delete_group(
        &self,
        group_id: Snowflake,
        requester_id: Snowflake,
    ) -> ServiceResult<DeletedResponse> {
        let group = self.find_group(group_id).await?;

        if !self.ctx.user_repo().is_owner(requester_id).await? {
            return Err(DomainError::NotOwner.into());
        }

        self.ctx.group_repo().delete(group.id).await?;

        info!(group_id = %group_id, "Group deleted");

        self.ctx
            .broadcaster()
            .broadcast_to_room(GatewayEvent::GroupDeleted { group_id })
            .await;
        self.ctx.broadcaster().close_room(group_id).await;

        Ok(DeletedResponse {
            id: group_id.to_string(),
        })
    }

    /// Join a group (self-service, idempotent)
    #[instrument(skip(self))]
    pub async fn join_group(
        &self,
        group_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<GroupResponse> {
        let group = self.find_group(group_id).await?;

        if self.ctx.group_repo().is_member(group.id, user_id).await? {
            return self.group_response(group).await;
        }

        self.ctx.group_repo().add_member(group.id, user_id).await?;

        info!(group_id = %group_id, user_id = %user_id, "Member joined");

        self.ctx
            .broadcaster()
            .broadcast_to_room(GatewayEvent::MemberJoined { group_id, user_id })
            .await;

        self.group_response(group).await
    }

    /// Kick a member (group admin or system owner only)
    ///
    /// The target's live connections stay attached to the room, but every
    /// subsequent append re-checks membership, so they can no longer post.
    /// They receive a targeted `kicked` event.
    #[instrument(skip(self))]
    pub async fn kick_member(
        &self,
        group_id: Snowflake,
        requester_id: Snowflake,
        target_id: Snowflake,
    ) -> ServiceResult<GroupResponse> {
        let group = self.find_group(group_id).await?;
        self.verify_admin(&group, requester_id).await?;

        if target_id == group.owner_id {
            return Err(ServiceError::validation("The group owner cannot be kicked"));
        }

        self.ctx.group_repo().remove_member(group.id, target_id).await?;

        info!(group_id = %group_id, target_id = %target_id, "Member kicked");

        self.ctx
            .broadcaster()
            .broadcast_to_room(GatewayEvent::MemberKicked {
                group_id,
                user_id: target_id,
            })
            .await;
        self.ctx
            .broadcaster()
            .send_to_user(target_id, GatewayEvent::Kicked { group_id })
            .await;

        self.group_response(group).await
    }

    // === Helpers ===

    async fn find_group(&self, group_id: Snowflake) -> ServiceResult<Group> {
        self.ctx
            .group_repo()
            .find_by_id(group_id)
            .await?
            .ok_or_else(|| DomainError::GroupNotFound.into())
    }

    /// Group admins and system owners pass; everyone else is rejected.
    async fn verify_admin(&self, group: &Group, user_id: Snowflake) -> ServiceResult<()> {
        if group.is_admin(user_id) {
            return Ok(());
        }
        if self.ctx.user_repo().is_owner(user_id).await? {
            return Ok(());
        }
        Err(DomainError::NotGroupAdmin.into())
    }

    async fn group_response(&self, group: Group) -> ServiceResult<GroupResponse> {
        let member_count = self.ctx.group_repo().member_count(group.id).await?;
        Ok(GroupResponse::from(GroupWithCount {
            group,
            member_count,
        }))
    }
}
