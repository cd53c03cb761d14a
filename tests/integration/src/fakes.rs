//! In-memory repository fakes
//!
//! A single store backs all three repository traits so cross-table behavior
//! (membership checks, cascade deletes, FK failures) matches the real
//! Postgres implementation without a running database.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rooms_core::entities::{Group, Message, Reaction, User};
use rooms_core::traits::{GroupRepository, MessageRepository, RepoResult, UserRepository};
use rooms_core::{DomainError, ReactionKind, Snowflake};

#[derive(Default)]
struct StoreInner {
    users: HashMap<Snowflake, User>,
    groups: HashMap<Snowflake, Group>,
    members: HashMap<Snowflake, HashSet<Snowflake>>,
    messages: HashMap<Snowflake, Message>,
    reactions: Vec<Reaction>,
}

/// In-memory store implementing every repository trait
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user
    pub fn put_user(&self, user: User) {
        self.inner.lock().unwrap().users.insert(user.id, user);
    }

    /// Seed a group without going through the service layer
    pub fn put_group(&self, group: Group) {
        let mut inner = self.inner.lock().unwrap();
        inner.members.entry(group.id).or_default();
        inner.groups.insert(group.id, group);
    }

    pub fn message_count(&self, group_id: Snowflake) -> usize {
        self.inner
            .lock()
            .unwrap()
            .messages
            .values()
            .filter(|m| m.group_id == group_id)
            .count()
    }

    pub fn reaction_count(&self, message_id: Snowflake) -> usize {
        self.inner
            .lock()
            .unwrap()
            .reactions
            .iter()
            .filter(|r| r.message_id == message_id)
            .count()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.inner.lock().unwrap().users.get(&id).cloned())
    }

    async fn is_owner(&self, id: Snowflake) -> RepoResult<bool> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .get(&id)
            .is_some_and(|u| u.is_owner))
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Group>> {
        Ok(self.inner.lock().unwrap().groups.get(&id).cloned())
    }

    async fn find_all(&self) -> RepoResult<Vec<Group>> {
        let mut groups: Vec<Group> = self.inner.lock().unwrap().groups.values().cloned().collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(groups)
    }

    async fn create(&self, group: &Group) -> RepoResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.members.entry(group.id).or_default();
        inner.groups.insert(group.id, group.clone());
        Ok(())
    }

    async fn update(&self, group: &Group) -> RepoResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.groups.contains_key(&group.id) {
            return Err(DomainError::GroupNotFound);
        }
        inner.groups.insert(group.id, group.clone());
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.groups.remove(&id).is_none() {
            return Err(DomainError::GroupNotFound);
        }
        // Cascade, like the FK constraints do
        inner.members.remove(&id);
        let message_ids: HashSet<Snowflake> = inner
            .messages
            .values()
            .filter(|m| m.group_id == id)
            .map(|m| m.id)
            .collect();
        inner.messages.retain(|_, m| m.group_id != id);
        inner.reactions.retain(|r| !message_ids.contains(&r.message_id));
        Ok(())
    }

    async fn add_member(&self, group_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.groups.contains_key(&group_id) {
            return Err(DomainError::GroupNotFound);
        }
        inner.members.entry(group_id).or_default().insert(user_id);
        Ok(())
    }

    async fn remove_member(&self, group_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(members) = inner.members.get_mut(&group_id) {
            members.remove(&user_id);
        }
        Ok(())
    }

    async fn is_member(&self, group_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        let inner = self.inner.lock().unwrap();
        let implicit = inner
            .groups
            .get(&group_id)
            .is_some_and(|g| g.is_privileged(user_id));
        let listed = inner
            .members
            .get(&group_id)
            .is_some_and(|m| m.contains(&user_id));
        Ok(implicit || listed)
    }

    async fn member_count(&self, group_id: Snowflake) -> RepoResult<i64> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .members
            .get(&group_id)
            .map_or(0, |m| m.len() as i64))
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        Ok(self.inner.lock().unwrap().messages.get(&id).cloned())
    }

    async fn find_by_group(
        &self,
        group_id: Snowflake,
        since: Option<DateTime<Utc>>,
    ) -> RepoResult<Vec<Message>> {
        let inner = self.inner.lock().unwrap();
        let mut messages: Vec<Message> = inner
            .messages
            .values()
            .filter(|m| m.group_id == group_id)
            .filter(|m| since.is_none_or(|s| m.created_at >= s))
            .cloned()
            .collect();
        messages.sort_by_key(Message::order_key);
        Ok(messages)
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.groups.contains_key(&message.group_id) {
            return Err(DomainError::GroupNotFound);
        }
        inner.messages.insert(message.id, message.clone());
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.messages.remove(&id).is_none() {
            return Err(DomainError::MessageNotFound);
        }
        inner.reactions.retain(|r| r.message_id != id);
        Ok(())
    }

    async fn delete_by_group(&self, group_id: Snowflake) -> RepoResult<u64> {
        let mut inner = self.inner.lock().unwrap();
        let message_ids: HashSet<Snowflake> = inner
            .messages
            .values()
            .filter(|m| m.group_id == group_id)
            .map(|m| m.id)
            .collect();
        inner.messages.retain(|_, m| m.group_id != group_id);
        inner.reactions.retain(|r| !message_ids.contains(&r.message_id));
        Ok(message_ids.len() as u64)
    }

    async fn toggle_reaction(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.reactions.len();
        inner
            .reactions
            .retain(|r| !(r.message_id == message_id && r.user_id == user_id && r.kind == kind));
        if inner.reactions.len() < before {
            return Ok(false);
        }
        if !inner.messages.contains_key(&message_id) {
            return Err(DomainError::MessageNotFound);
        }
        inner.reactions.push(Reaction::new(message_id, user_id, kind));
        Ok(true)
    }

    async fn reactions_for(&self, message_ids: &[Snowflake]) -> RepoResult<Vec<Reaction>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .reactions
            .iter()
            .filter(|r| message_ids.contains(&r.message_id))
            .cloned()
            .collect())
    }
}
