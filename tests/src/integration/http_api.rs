//! # HTTP API Tests
//!
//! Drives the JSON:API surface through the assembled router, without binding
//! a socket.

#[cfg(test)]
use std::collections::HashMap;

#[cfg(test)]
use axum::body::Body;

#[cfg(test)]
use axum::http::{header, Request, StatusCode};

#[cfg(test)]
use axum::Router;

#[cfg(test)]
use chrono::Utc;

#[cfg(test)]
use http_body_util::BodyExt;

#[cfg(test)]
use serde_json::{json, Value};

#[cfg(test)]
use tower::ServiceExt;

#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
use collections_api::auth::{scopes, TokenRegistry};

#[cfg(test)]
use collections_api::{build_router, ApiConfig, AppState};

#[cfg(test)]
use collections_core::adapters::{
    ContributorGate, InMemoryCollectionStore, InMemoryLinkStore, InMemoryNodeStore,
    SystemTimeSource,
};

#[cfg(test)]
use collections_core::ports::outbound::NodeStore;

#[cfg(test)]
use collections_core::{CollectionService, Node, ServiceDependencies, TargetKind, UserId};

/// Bearer token granted every scope.
#[cfg(test)]
const OWNER_TOKEN: &str = "owner-token";

/// Bearer token granted read scopes only.
#[cfg(test)]
const READ_ONLY_TOKEN: &str = "read-only-token";

#[cfg(test)]
fn make_node(kind: TargetKind, is_public: bool) -> Node {
    let now = Utc::now();
    Node {
        id: Uuid::new_v4(),
        title: "seeded node".to_string(),
        kind,
        is_public,
        is_deleted: false,
        contributors: HashMap::new(),
        date_created: now,
        date_modified: now,
    }
}

#[cfg(test)]
fn make_api(nodes: Vec<Node>) -> (Router, UserId) {
    let owner = Uuid::new_v4();

    let mut node_store = InMemoryNodeStore::new();
    for node in nodes {
        node_store.put(node);
    }

    let service = CollectionService::new(ServiceDependencies {
        collections: InMemoryCollectionStore::new(),
        nodes: node_store,
        links: InMemoryLinkStore::new(),
        gate: ContributorGate::new(),
        time: SystemTimeSource,
    });

    let mut tokens = TokenRegistry::new();
    tokens.grant(OWNER_TOKEN, owner, scopes::ALL);
    tokens.grant(
        READ_ONLY_TOKEN,
        owner,
        &[scopes::COLLECTIONS_READ, scopes::NODE_LINKS_READ],
    );

    let state = AppState::new(service, tokens, ApiConfig::default());
    (build_router(state), owner)
}

#[cfg(test)]
async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[cfg(test)]
async fn create_collection(router: &Router, title: &str) -> String {
    let (status, body) = send(
        router,
        "POST",
        "/v1/collections/",
        Some(OWNER_TOKEN),
        Some(json!({
            "data": {"type": "collections", "attributes": {"title": title}}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[cfg(test)]
fn id_set(body: &Value) -> std::collections::HashSet<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collection_crud() {
        let (router, _) = make_api(Vec::new());

        let id = create_collection(&router, "my projects").await;
        let uri = format!("/v1/collections/{id}/");

        let (status, body) = send(&router, "GET", &uri, Some(OWNER_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["attributes"]["title"], "my projects");
        assert_eq!(body["data"]["type"], "collections");

        let (status, body) = send(
            &router,
            "PATCH",
            &uri,
            Some(OWNER_TOKEN),
            Some(json!({
                "data": {"type": "collections", "id": id, "attributes": {"title": "renamed"}}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["attributes"]["title"], "renamed");

        let (status, _) = send(&router, "DELETE", &uri, Some(OWNER_TOKEN), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&router, "GET", &uri, Some(OWNER_TOKEN), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_relationship_walkthrough() {
        let n1 = make_node(TargetKind::Project, true);
        let n2 = make_node(TargetKind::Project, true);
        let (id1, id2) = (n1.id.to_string(), n2.id.to_string());
        let (router, _) = make_api(vec![n1, n2]);

        let c = create_collection(&router, "walkthrough").await;
        let uri = format!("/v1/collections/{c}/relationships/linked_nodes/");

        // POST {N1}: the set becomes {N1}.
        let (status, body) = send(
            &router,
            "POST",
            &uri,
            Some(OWNER_TOKEN),
            Some(json!({"data": [{"type": "linked_nodes", "id": id1}]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(id_set(&body), std::collections::HashSet::from([id1.clone()]));

        // PUT {N1, N2}: N2 joins, N1 untouched.
        let (status, body) = send(
            &router,
            "PUT",
            &uri,
            Some(OWNER_TOKEN),
            Some(json!({"data": [
                {"type": "linked_nodes", "id": id1},
                {"type": "linked_nodes", "id": id2},
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            id_set(&body),
            std::collections::HashSet::from([id1.clone(), id2.clone()])
        );

        // DELETE {N1}: N2 remains.
        let (status, _) = send(
            &router,
            "DELETE",
            &uri,
            Some(OWNER_TOKEN),
            Some(json!({"data": [{"type": "linked_nodes", "id": id1}]})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&router, "GET", &uri, Some(OWNER_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(id_set(&body), std::collections::HashSet::from([id2]));
    }

    #[tokio::test]
    async fn test_empty_replace_clears_the_set() {
        let node = make_node(TargetKind::Project, true);
        let id = node.id.to_string();
        let (router, _) = make_api(vec![node]);

        let c = create_collection(&router, "to clear").await;
        let uri = format!("/v1/collections/{c}/relationships/linked_nodes/");

        send(
            &router,
            "POST",
            &uri,
            Some(OWNER_TOKEN),
            Some(json!({"data": [{"type": "linked_nodes", "id": id}]})),
        )
        .await;

        let (status, body) = send(
            &router,
            "PUT",
            &uri,
            Some(OWNER_TOKEN),
            Some(json!({"data": []})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scoped_views_split_a_mixed_set() {
        let project = make_node(TargetKind::Project, true);
        let registration = make_node(TargetKind::Registration, true);
        let (pid, rid) = (project.id.to_string(), registration.id.to_string());
        let (router, _) = make_api(vec![project, registration]);

        let c = create_collection(&router, "mixed").await;
        send(
            &router,
            "POST",
            &format!("/v1/collections/{c}/relationships/linked_nodes/"),
            Some(OWNER_TOKEN),
            Some(json!({"data": [{"type": "linked_nodes", "id": pid}]})),
        )
        .await;
        send(
            &router,
            "POST",
            &format!("/v1/collections/{c}/relationships/linked_registrations/"),
            Some(OWNER_TOKEN),
            Some(json!({"data": [{"type": "linked_registrations", "id": rid}]})),
        )
        .await;

        let (status, body) = send(
            &router,
            "GET",
            &format!("/v1/collections/{c}/linked_nodes/"),
            Some(OWNER_TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(id_set(&body), std::collections::HashSet::from([pid]));
        assert_eq!(body["data"][0]["type"], "nodes");

        let (status, body) = send(
            &router,
            "GET",
            &format!("/v1/collections/{c}/linked_registrations/"),
            Some(OWNER_TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(id_set(&body), std::collections::HashSet::from([rid]));
        assert_eq!(body["data"][0]["type"], "registrations");
        assert_eq!(body["data"][0]["attributes"]["registration"], true);
    }

    #[tokio::test]
    async fn test_anonymous_write_is_unauthorized() {
        let (router, _) = make_api(Vec::new());
        let (status, _) = send(
            &router,
            "POST",
            "/v1/collections/",
            None,
            Some(json!({
                "data": {"type": "collections", "attributes": {"title": "nope"}}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthorized() {
        let (router, _) = make_api(Vec::new());
        let (status, _) = send(&router, "GET", "/v1/collections/", Some("bogus"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_write_without_write_scope_is_forbidden() {
        let (router, _) = make_api(Vec::new());
        let (status, _) = send(
            &router,
            "POST",
            "/v1/collections/",
            Some(READ_ONLY_TOKEN),
            Some(json!({
                "data": {"type": "collections", "attributes": {"title": "nope"}}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_not_found() {
        let (router, _) = make_api(Vec::new());
        let (status, body) = send(
            &router,
            "GET",
            &format!("/v1/collections/{}/", Uuid::new_v4()),
            Some(OWNER_TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["status"], "404");
    }

    #[tokio::test]
    async fn test_wrong_relationship_type_is_a_conflict() {
        let node = make_node(TargetKind::Project, true);
        let id = node.id.to_string();
        let (router, _) = make_api(vec![node]);

        let c = create_collection(&router, "typed").await;
        let (status, _) = send(
            &router,
            "POST",
            &format!("/v1/collections/{c}/relationships/linked_nodes/"),
            Some(OWNER_TOKEN),
            Some(json!({"data": [{"type": "linked_registrations", "id": id}]})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_malformed_relationship_payload_is_bad_request() {
        let (router, _) = make_api(Vec::new());
        let c = create_collection(&router, "malformed").await;

        let (status, body) = send(
            &router,
            "PUT",
            &format!("/v1/collections/{c}/relationships/linked_nodes/"),
            Some(OWNER_TOKEN),
            Some(json!({"data": "not-a-list"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["status"], "400");
    }

    #[tokio::test]
    async fn test_dangling_addition_rolls_back_the_whole_write() {
        let node = make_node(TargetKind::Project, true);
        let id = node.id.to_string();
        let (router, _) = make_api(vec![node]);

        let c = create_collection(&router, "atomic").await;
        let uri = format!("/v1/collections/{c}/relationships/linked_nodes/");

        let (status, _) = send(
            &router,
            "PUT",
            &uri,
            Some(OWNER_TOKEN),
            Some(json!({"data": [
                {"type": "linked_nodes", "id": id},
                {"type": "linked_nodes", "id": Uuid::new_v4().to_string()},
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(&router, "GET", &uri, Some(OWNER_TOKEN), None).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filter_and_pagination() {
        let (router, _) = make_api(Vec::new());
        create_collection(&router, "alpha one").await;
        create_collection(&router, "alpha two").await;
        create_collection(&router, "beta").await;

        let (status, body) = send(
            &router,
            "GET",
            "/v1/collections/?filter%5Btitle%5D=alpha",
            Some(OWNER_TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total"], 2);

        let (status, body) = send(
            &router,
            "GET",
            "/v1/collections/?page=2&page%5Bsize%5D=2",
            Some(OWNER_TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["meta"]["total"], 3);
        assert_eq!(body["meta"]["page"], 2);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_update_and_delete() {
        let (router, _) = make_api(Vec::new());
        let a = create_collection(&router, "a").await;
        let b = create_collection(&router, "b").await;

        let (status, body) = send(
            &router,
            "PUT",
            "/v1/collections/",
            Some(OWNER_TOKEN),
            Some(json!({"data": [
                {"type": "collections", "id": a, "attributes": {"title": "a2"}},
                {"type": "collections", "id": b, "attributes": {"title": "b2"}},
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        // Missing id in a bulk payload is malformed.
        let (status, _) = send(
            &router,
            "PUT",
            "/v1/collections/",
            Some(OWNER_TOKEN),
            Some(json!({"data": [{"type": "collections", "attributes": {"title": "x"}}]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &router,
            "DELETE",
            "/v1/collections/",
            Some(OWNER_TOKEN),
            Some(json!({"data": [
                {"type": "collections", "id": a},
                {"type": "collections", "id": b},
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&router, "GET", "/v1/collections/", Some(OWNER_TOKEN), None).await;
        assert_eq!(body["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_node_link_lifecycle() {
        let node = make_node(TargetKind::Project, true);
        let target = node.id.to_string();
        let (router, _) = make_api(vec![node]);

        let c1 = create_collection(&router, "one").await;
        let c2 = create_collection(&router, "two").await;

        let (status, body) = send(
            &router,
            "POST",
            &format!("/v1/collections/{c1}/node_links/"),
            Some(OWNER_TOKEN),
            Some(json!({"data": {
                "type": "node_links",
                "relationships": {"target_node": {"data": {"type": "nodes", "id": target}}}
            }})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let link_id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(
            body["data"]["relationships"]["target_node"]["data"]["id"],
            target.as_str()
        );

        // Linking the same target again conflicts.
        let (status, _) = send(
            &router,
            "POST",
            &format!("/v1/collections/{c1}/node_links/"),
            Some(OWNER_TOKEN),
            Some(json!({"data": {
                "type": "node_links",
                "relationships": {"target_node": {"data": {"type": "nodes", "id": target}}}
            }})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        // Deleting through the wrong parent collection is a validation error.
        let (status, _) = send(
            &router,
            "DELETE",
            &format!("/v1/collections/{c2}/node_links/{link_id}/"),
            Some(OWNER_TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Deleting through the owning collection succeeds.
        let (status, _) = send(
            &router,
            "DELETE",
            &format!("/v1/collections/{c1}/node_links/{link_id}/"),
            Some(OWNER_TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(
            &router,
            "GET",
            &format!("/v1/collections/{c1}/node_links/"),
            Some(OWNER_TOKEN),
            None,
        )
        .await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_private_collection_is_hidden_from_other_principals() {
        let (router, _) = make_api(Vec::new());
        let c = create_collection(&router, "private").await;
        let uri = format!("/v1/collections/{c}/");

        // Anonymous read of someone's private collection: authentication is
        // the missing ingredient.
        let (status, _) = send(&router, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // The list view simply omits it.
        let (_, body) = send(&router, "GET", "/v1/collections/", None, None).await;
        assert_eq!(body["meta"]["total"], 0);
    }
}
