//! Permissions operations against a mock CredHub server.

use credhub_client::{
    Actor, CredHubConfig, CredHubError, CredHubPermissionsOperations, CredHubTemplate,
    CredentialName, CredentialPermission, Operation,
};
use serde_json::json;
use test_utils::fixtures;
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn template(server: &MockServer) -> CredHubTemplate {
    CredHubTemplate::new(&CredHubConfig::new(server.uri())).unwrap()
}

#[tokio::test]
async fn test_add_permissions_posts_single_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/permissions"))
        .and(body_json(json!({
            "credential_name": "/db/pw",
            "permissions": [{"actor": "user:alice", "operations": ["read", "write"]}]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let credhub = template(&server);
    credhub
        .permissions()
        .add_permissions(
            &CredentialName::new("/db/pw"),
            vec![CredentialPermission::new(
                Actor::new("user:alice"),
                [Operation::Read, Operation::Write],
            )],
        )
        .await
        .unwrap();

    assert_eq!(credhub.rest().active_leases(), 0);
}

#[tokio::test]
async fn test_add_several_permissions_in_one_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/permissions"))
        .and(body_json(json!({
            "credential_name": "/db/pw",
            "permissions": [
                {"actor": "uaa-user:alice", "operations": ["read"]},
                {"actor": "mtls-app:5f4d5c8a", "operations": ["read", "write", "delete"]}
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(fixtures::credential_permissions(
            "/db/pw",
            &[
                ("uaa-user:alice", vec!["read"]),
                ("mtls-app:5f4d5c8a", vec!["read", "write", "delete"]),
            ],
        )))
        .expect(1)
        .mount(&server)
        .await;

    template(&server)
        .permissions()
        .add_permissions(
            &CredentialName::new("/db/pw"),
            vec![
                CredentialPermission::new(Actor::uaa_user("alice"), [Operation::Read]),
                CredentialPermission::new(
                    Actor::mtls_app("5f4d5c8a"),
                    [Operation::Delete, Operation::Write, Operation::Read],
                ),
            ],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_permissions_keeps_server_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/permissions"))
        .and(query_param("credential_name", "/db/pw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::credential_permissions(
            "/db/pw",
            &[
                ("uaa-user:zed", vec!["read"]),
                ("uaa-client:app", vec!["read", "write", "read_acl"]),
            ],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let permissions = template(&server)
        .permissions()
        .get_permissions(&CredentialName::new("/db/pw"))
        .await
        .unwrap();

    assert_eq!(permissions.len(), 2);
    assert_eq!(permissions[0].actor().identity(), "uaa-user:zed");
    assert_eq!(permissions[1].actor().actor_type(), Some("uaa-client"));
    assert!(permissions[1].allows(Operation::ReadAcl));
    assert!(!permissions[1].allows(Operation::WriteAcl));
}

#[tokio::test]
async fn test_delete_permission() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/permissions"))
        .and(query_param("credential_name", "/db/pw"))
        .and(query_param("actor", "uaa-user:alice"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    template(&server)
        .permissions()
        .delete_permission(&CredentialName::new("/db/pw"), &Actor::uaa_user("alice"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_missing_permission_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/permissions"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(fixtures::error_body("The request includes a permission that does not exist.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let credhub = template(&server);
    let err = credhub
        .permissions()
        .delete_permission(&CredentialName::new("/db/pw"), &Actor::uaa_user("nobody"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(credhub.rest().active_leases(), 0);
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_server() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let permissions = template(&server).permissions();
    let empty = CredentialName::new("");
    let name = CredentialName::new("/db/pw");

    let results = [
        permissions.get_permissions(&empty).await.map(|_| ()),
        permissions
            .add_permissions(
                &empty,
                vec![CredentialPermission::new(Actor::new("user:alice"), [Operation::Read])],
            )
            .await,
        permissions.delete_permission(&empty, &Actor::new("user:alice")).await,
        permissions.delete_permission(&name, &Actor::new("")).await,
    ];

    for result in results {
        assert!(matches!(result, Err(CredHubError::InvalidArgument(_))));
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}
