//! End-to-end HTTP tests
//!
//! Each test spins up a full server on an ephemeral port and drives it over
//! HTTP with `reqwest`.

use reqwest::StatusCode;
use serde_json::json;

use integration_tests::fixtures::{regular_user, system_owner};
use integration_tests::helpers::{assert_json, assert_status, data_id};
use integration_tests::TestServer;

#[tokio::test]
async fn test_health_endpoint_is_open() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;

    let response = server.get_unauthenticated("/health").await?;
    let json = assert_json(response, StatusCode::OK).await?;
    assert_eq!(json["status"], "healthy");

    Ok(())
}

#[tokio::test]
async fn test_readiness_reports_database_state() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;

    // The test pool points at a port nothing listens on
    let response = server.get_unauthenticated("/health/ready").await?;
    let json = assert_json(response, StatusCode::SERVICE_UNAVAILABLE).await?;
    assert_eq!(json["status"], "not_ready");
    assert_eq!(json["database"], "unhealthy");

    Ok(())
}

#[tokio::test]
async fn test_api_requires_authentication() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;

    let response = server.get_unauthenticated("/api/groups").await?;
    assert_status(response, StatusCode::UNAUTHORIZED).await?;

    let response = server.get("/api/groups", "not-a-token").await?;
    assert_status(response, StatusCode::UNAUTHORIZED).await?;

    Ok(())
}

#[tokio::test]
async fn test_only_system_owner_creates_groups() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let member = regular_user();
    let owner = system_owner();
    let member_token = server.register(&member)?;
    let owner_token = server.register(&owner)?;

    let body = json!({"name": "general"});
    let response = server.post("/api/groups", &member_token, &body).await?;
    let json = assert_json(response, StatusCode::FORBIDDEN).await?;
    assert_eq!(json["error"]["code"], "NOT_OWNER");

    let response = server.post("/api/groups", &owner_token, &body).await?;
    let json = assert_json(response, StatusCode::CREATED).await?;
    assert_eq!(json["data"]["name"], "general");
    assert_eq!(json["data"]["ownerId"], owner.id.to_string());
    assert_eq!(json["data"]["adminId"], owner.id.to_string());
    // The creator is seeded as the first member
    assert_eq!(json["data"]["memberCount"], 1);

    Ok(())
}

#[tokio::test]
async fn test_group_name_is_validated() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let owner = system_owner();
    let token = server.register(&owner)?;

    let response = server.post("/api/groups", &token, &json!({"name": ""})).await?;
    let json = assert_json(response, StatusCode::BAD_REQUEST).await?;
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");

    Ok(())
}

#[tokio::test]
async fn test_join_is_idempotent() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let owner = system_owner();
    let member = regular_user();
    let owner_token = server.register(&owner)?;
    let member_token = server.register(&member)?;

    let response = server
        .post("/api/groups", &owner_token, &json!({"name": "lounge"}))
        .await?;
    let json = assert_json(response, StatusCode::CREATED).await?;
    let group_id = data_id(&json);

    let path = format!("/api/groups/{group_id}/join");
    let response = server.post_empty(&path, &member_token).await?;
    assert_status(response, StatusCode::OK).await?;

    // Joining again is a no-op, not an error
    let response = server.post_empty(&path, &member_token).await?;
    assert_status(response, StatusCode::OK).await?;

    let response = server.get(&format!("/api/groups/{group_id}"), &member_token).await?;
    let json = assert_json(response, StatusCode::OK).await?;
    assert_eq!(json["data"]["memberCount"], 2);

    Ok(())
}

#[tokio::test]
async fn test_post_and_list_messages() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let owner = system_owner();
    let token = server.register(&owner)?;

    let response = server
        .post("/api/groups", &token, &json!({"name": "dev"}))
        .await?;
    let group_id = data_id(&assert_json(response, StatusCode::CREATED).await?);

    let messages_path = format!("/api/groups/{group_id}/messages");
    let response = server
        .post(&messages_path, &token, &json!({"text": "first"}))
        .await?;
    let first = assert_json(response, StatusCode::CREATED).await?;
    assert_eq!(first["data"]["content"]["text"], "first");
    assert_eq!(first["data"]["sender"]["id"], owner.id.to_string());

    let response = server
        .post(&messages_path, &token, &json!({"text": "second"}))
        .await?;
    assert_status(response, StatusCode::CREATED).await?;

    let response = server.get(&messages_path, &token).await?;
    let json = assert_json(response, StatusCode::OK).await?;
    let listed = json["data"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    // Oldest first
    assert_eq!(listed[0]["content"]["text"], "first");
    assert_eq!(listed[1]["content"]["text"], "second");

    // A since cursor at the second message's timestamp excludes the first
    let since = listed[1]["createdAt"].as_str().unwrap();
    let response = server
        .get(&format!("{messages_path}?since={since}"), &token)
        .await?;
    let json = assert_json(response, StatusCode::OK).await?;
    let filtered = json["data"].as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["content"]["text"], "second");

    Ok(())
}

#[tokio::test]
async fn test_empty_message_is_rejected() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let owner = system_owner();
    let token = server.register(&owner)?;

    let response = server
        .post("/api/groups", &token, &json!({"name": "dev"}))
        .await?;
    let group_id = data_id(&assert_json(response, StatusCode::CREATED).await?);

    let response = server
        .post(&format!("/api/groups/{group_id}/messages"), &token, &json!({}))
        .await?;
    let json = assert_json(response, StatusCode::BAD_REQUEST).await?;
    assert_eq!(json["error"]["code"], "INVALID_CONTENT");

    Ok(())
}

#[tokio::test]
async fn test_non_members_cannot_post_or_read() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let owner = system_owner();
    let outsider = regular_user();
    let owner_token = server.register(&owner)?;
    let outsider_token = server.register(&outsider)?;

    let response = server
        .post("/api/groups", &owner_token, &json!({"name": "private"}))
        .await?;
    let group_id = data_id(&assert_json(response, StatusCode::CREATED).await?);

    let messages_path = format!("/api/groups/{group_id}/messages");
    let response = server
        .post(&messages_path, &outsider_token, &json!({"text": "hi"}))
        .await?;
    let json = assert_json(response, StatusCode::FORBIDDEN).await?;
    assert_eq!(json["error"]["code"], "NOT_GROUP_MEMBER");

    let response = server.get(&messages_path, &outsider_token).await?;
    assert_status(response, StatusCode::FORBIDDEN).await?;

    Ok(())
}

#[tokio::test]
async fn test_reaction_toggles_on_and_off() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let owner = system_owner();
    let token = server.register(&owner)?;

    let response = server
        .post("/api/groups", &token, &json!({"name": "emoji"}))
        .await?;
    let group_id = data_id(&assert_json(response, StatusCode::CREATED).await?);

    let response = server
        .post(
            &format!("/api/groups/{group_id}/messages"),
            &token,
            &json!({"text": "react to me"}),
        )
        .await?;
    let message_id = data_id(&assert_json(response, StatusCode::CREATED).await?);

    let reactions_path = format!("/api/messages/{message_id}/reactions");
    let body = json!({"kind": "like"});

    let response = server.post(&reactions_path, &token, &body).await?;
    let json = assert_json(response, StatusCode::OK).await?;
    let reactions = json["data"]["reactions"].as_array().unwrap();
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0]["kind"], "like");
    assert_eq!(reactions[0]["userId"], owner.id.to_string());

    // Same user, same kind: the reaction comes off again
    let response = server.post(&reactions_path, &token, &body).await?;
    let json = assert_json(response, StatusCode::OK).await?;
    assert!(json["data"]["reactions"].as_array().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_kicked_member_cannot_post() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let owner = system_owner();
    let member = regular_user();
    let owner_token = server.register(&owner)?;
    let member_token = server.register(&member)?;

    let response = server
        .post("/api/groups", &owner_token, &json!({"name": "team"}))
        .await?;
    let group_id = data_id(&assert_json(response, StatusCode::CREATED).await?);

    let response = server
        .post_empty(&format!("/api/groups/{group_id}/join"), &member_token)
        .await?;
    assert_status(response, StatusCode::OK).await?;

    let messages_path = format!("/api/groups/{group_id}/messages");
    let response = server
        .post(&messages_path, &member_token, &json!({"text": "still here"}))
        .await?;
    assert_status(response, StatusCode::CREATED).await?;

    let response = server
        .post(
            &format!("/api/groups/{group_id}/kick"),
            &owner_token,
            &json!({"userId": member.id.to_string()}),
        )
        .await?;
    assert_status(response, StatusCode::OK).await?;

    // Membership is re-checked on every append
    let response = server
        .post(&messages_path, &member_token, &json!({"text": "gone"}))
        .await?;
    let json = assert_json(response, StatusCode::FORBIDDEN).await?;
    assert_eq!(json["error"]["code"], "NOT_GROUP_MEMBER");

    Ok(())
}

#[tokio::test]
async fn test_group_owner_cannot_be_kicked() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let owner = system_owner();
    let token = server.register(&owner)?;

    let response = server
        .post("/api/groups", &token, &json!({"name": "team"}))
        .await?;
    let group_id = data_id(&assert_json(response, StatusCode::CREATED).await?);

    let response = server
        .post(
            &format!("/api/groups/{group_id}/kick"),
            &token,
            &json!({"userId": owner.id.to_string()}),
        )
        .await?;
    assert_status(response, StatusCode::BAD_REQUEST).await?;

    Ok(())
}

#[tokio::test]
async fn test_delete_group_removes_history() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let owner = system_owner();
    let token = server.register(&owner)?;

    let response = server
        .post("/api/groups", &token, &json!({"name": "doomed"}))
        .await?;
    let group_id = data_id(&assert_json(response, StatusCode::CREATED).await?);

    let response = server
        .post(
            &format!("/api/groups/{group_id}/messages"),
            &token,
            &json!({"text": "last words"}),
        )
        .await?;
    assert_status(response, StatusCode::CREATED).await?;
    assert_eq!(server.store.message_count(group_id), 1);

    let response = server.delete(&format!("/api/groups/{group_id}"), &token).await?;
    assert_status(response, StatusCode::OK).await?;
    assert_eq!(server.store.message_count(group_id), 0);

    // The history is gone, not empty
    let response = server
        .get(&format!("/api/groups/{group_id}/messages"), &token)
        .await?;
    let json = assert_json(response, StatusCode::NOT_FOUND).await?;
    assert_eq!(json["error"]["code"], "GROUP_NOT_FOUND");

    Ok(())
}

#[tokio::test]
async fn test_message_deletion_is_admin_only() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let owner = system_owner();
    let member = regular_user();
    let owner_token = server.register(&owner)?;
    let member_token = server.register(&member)?;

    let response = server
        .post("/api/groups", &owner_token, &json!({"name": "moderated"}))
        .await?;
    let group_id = data_id(&assert_json(response, StatusCode::CREATED).await?);

    let response = server
        .post_empty(&format!("/api/groups/{group_id}/join"), &member_token)
        .await?;
    assert_status(response, StatusCode::OK).await?;

    let response = server
        .post(
            &format!("/api/groups/{group_id}/messages"),
            &member_token,
            &json!({"text": "mine"}),
        )
        .await?;
    let message_id = data_id(&assert_json(response, StatusCode::CREATED).await?);

    // Authorship grants no delete right
    let message_path = format!("/api/messages/{message_id}");
    let response = server.delete(&message_path, &member_token).await?;
    let json = assert_json(response, StatusCode::FORBIDDEN).await?;
    assert_eq!(json["error"]["code"], "NOT_GROUP_ADMIN");

    let response = server.delete(&message_path, &owner_token).await?;
    let json = assert_json(response, StatusCode::OK).await?;
    assert_eq!(json["data"]["id"], message_id.to_string());

    let response = server.delete(&message_path, &owner_token).await?;
    let json = assert_json(response, StatusCode::NOT_FOUND).await?;
    assert_eq!(json["error"]["code"], "MESSAGE_NOT_FOUND");

    Ok(())
}

#[tokio::test]
async fn test_update_group_transfers_admin() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let owner = system_owner();
    let member = regular_user();
    let owner_token = server.register(&owner)?;
    let member_token = server.register(&member)?;

    let response = server
        .post("/api/groups", &owner_token, &json!({"name": "handover"}))
        .await?;
    let group_id = data_id(&assert_json(response, StatusCode::CREATED).await?);

    let response = server
        .post_empty(&format!("/api/groups/{group_id}/join"), &member_token)
        .await?;
    assert_status(response, StatusCode::OK).await?;

    let group_path = format!("/api/groups/{group_id}");
    let body = json!({"description": "handed over", "adminId": member.id.to_string()});
    let response = server.patch(&group_path, &owner_token, &body).await?;
    let json = assert_json(response, StatusCode::OK).await?;
    assert_eq!(json["data"]["description"], "handed over");
    assert_eq!(json["data"]["adminId"], member.id.to_string());

    // The new admin can moderate now
    let response = server
        .post(
            &format!("/api/groups/{group_id}/messages"),
            &owner_token,
            &json!({"text": "moderate me"}),
        )
        .await?;
    let message_id = data_id(&assert_json(response, StatusCode::CREATED).await?);

    let response = server
        .delete(&format!("/api/messages/{message_id}"), &member_token)
        .await?;
    assert_status(response, StatusCode::OK).await?;

    Ok(())
}

#[tokio::test]
async fn test_malformed_ids_are_rejected() -> anyhow::Result<()> {
    let server = TestServer::spawn().await?;
    let user = regular_user();
    let token = server.register(&user)?;

    let response = server.get("/api/groups/not-a-number", &token).await?;
    assert_status(response, StatusCode::BAD_REQUEST).await?;

    let response = server.delete("/api/messages/xyz", &token).await?;
    assert_status(response, StatusCode::BAD_REQUEST).await?;

    Ok(())
}
