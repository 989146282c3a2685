use appsvc_cloud::{Authenticator, CloudError, ManagementClient, SessionToken, Sku};
use appsvc_cloud_azure::{
    AzureError, AzureManagementClient, ClientSecretCredential, RESOURCES_API_VERSION,
    WEB_API_VERSION,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GROUP: &str = "sample-dotnet-app-service-group";

fn session() -> SessionToken {
    SessionToken::new("test-token", None)
}

fn web_path(kind: &str, name: &str) -> String {
    format!(
        "/subscriptions/sub1/resourceGroups/{}/providers/Microsoft.Web/{}/{}",
        GROUP, kind, name
    )
}

/// client-credentials フローでトークンを取得できることを確認
#[tokio::test]
async fn test_client_secret_credential_issues_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/t1/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=c1"))
        .and(body_string_contains("client_secret=s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "eyJ0eXAi"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credential = ClientSecretCredential::new(
        server.uri(),
        "t1",
        "c1",
        "s1",
        "https://management.azure.com/.default",
    );
    let token = credential.authenticate().await.unwrap();

    assert_eq!(token.bearer(), "eyJ0eXAi");
    assert!(token.expires_at().is_some());
    assert!(!token.is_expired());
}

/// 認証失敗は AuthenticationFailed として返ることを確認
#[tokio::test]
async fn test_client_secret_credential_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/t1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;

    let credential = ClientSecretCredential::new(server.uri(), "t1", "c1", "bad", "scope");

    let err = credential.request_token().await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    let err = credential.authenticate().await.unwrap_err();
    match err {
        CloudError::AuthenticationFailed(msg) => assert!(msg.contains("invalid_client")),
        other => panic!("Expected AuthenticationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_resource_group() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/subscriptions/sub1/resourcegroups/{}", GROUP)))
        .and(query_param("api-version", RESOURCES_API_VERSION))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({ "location": "westus" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": format!("/subscriptions/sub1/resourceGroups/{}", GROUP),
            "name": GROUP,
            "location": "westus",
            "properties": { "provisioningState": "Succeeded" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AzureManagementClient::new(server.uri(), "sub1").unwrap();
    let group = client
        .create_or_update_resource_group(&session(), GROUP, "westus")
        .await
        .unwrap();

    assert_eq!(group.name, GROUP);
    assert_eq!(group.location, "westus");
}

#[tokio::test]
async fn test_create_hosting_plan_returns_id() {
    let server = MockServer::start().await;
    let plan_path = web_path("serverfarms", "sample-server-farm");

    Mock::given(method("PUT"))
        .and(path(plan_path.clone()))
        .and(query_param("api-version", WEB_API_VERSION))
        .and(body_json(json!({
            "location": "westus",
            "sku": { "name": "S1", "tier": "Standard", "capacity": 1 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": plan_path,
            "name": "sample-server-farm",
            "location": "West US",
            "sku": { "name": "S1", "tier": "Standard", "size": "S1", "family": "S", "capacity": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AzureManagementClient::new(server.uri(), "sub1").unwrap();
    let plan = client
        .create_or_update_hosting_plan(
            &session(),
            GROUP,
            "sample-server-farm",
            "westus",
            &Sku::new("S1", "Standard", 1),
        )
        .await
        .unwrap();

    assert_eq!(plan.id, plan_path);
    assert_eq!(plan.sku, Some(Sku::new("S1", "Standard", 1)));
}

/// 202 Accepted (本文なし) でもプランIDが得られることを確認
#[tokio::test]
async fn test_create_hosting_plan_accepted_without_body() {
    let server = MockServer::start().await;
    let plan_path = web_path("serverfarms", "sample-server-farm");

    Mock::given(method("PUT"))
        .and(path(plan_path.clone()))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let client = AzureManagementClient::new(server.uri(), "sub1").unwrap();
    let plan = client
        .put_server_farm(
            &session(),
            GROUP,
            "sample-server-farm",
            "westus",
            &Sku::new("S1", "Standard", 1),
        )
        .await
        .unwrap();

    assert_eq!(plan.id, plan_path);
}

#[tokio::test]
async fn test_create_and_get_site() {
    let server = MockServer::start().await;
    let site_path = web_path("sites", "sample-site-name-42");
    let plan_id = web_path("serverfarms", "sample-server-farm");

    Mock::given(method("PUT"))
        .and(path(site_path.clone()))
        .and(body_json(json!({
            "location": "westus",
            "properties": { "serverFarmId": plan_id }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "sample-site-name-42",
            "location": "West US",
            "properties": { "serverFarmId": plan_id, "hostNames": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(site_path))
        .and(query_param("api-version", WEB_API_VERSION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "sample-site-name-42",
            "location": "West US",
            "properties": {
                "serverFarmId": plan_id,
                "hostNames": ["sample-site-name-42.azurewebsites.net"],
                "defaultHostName": "sample-site-name-42.azurewebsites.net"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AzureManagementClient::new(server.uri(), "sub1").unwrap();
    let created = client
        .create_or_update_site(&session(), GROUP, "sample-site-name-42", "westus", &plan_id)
        .await
        .unwrap();
    assert_eq!(created.plan_id.as_deref(), Some(plan_id.as_str()));

    let site = client
        .get_site(&session(), GROUP, "sample-site-name-42")
        .await
        .unwrap();
    assert_eq!(site.name, "sample-site-name-42");
    assert_eq!(
        site.primary_hostname(),
        Some("sample-site-name-42.azurewebsites.net")
    );
}

#[tokio::test]
async fn test_delete_site_and_group() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(web_path("sites", "sample-site-name-42")))
        .and(query_param("api-version", WEB_API_VERSION))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/subscriptions/sub1/resourcegroups/{}", GROUP)))
        .and(query_param("api-version", RESOURCES_API_VERSION))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = AzureManagementClient::new(server.uri(), "sub1").unwrap();
    client
        .delete_site(&session(), GROUP, "sample-site-name-42")
        .await
        .unwrap();
    client.delete_resource_group(&session(), GROUP).await.unwrap();
}

/// ARM のエラー本文から code/message を取り出して分類することを確認
#[tokio::test]
async fn test_conflict_is_mapped() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(web_path("sites", "taken")))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": {
                "code": "WebsiteAlreadyExists",
                "message": "Website with given name taken already exists."
            }
        })))
        .mount(&server)
        .await;

    let client = AzureManagementClient::new(server.uri(), "sub1").unwrap();

    let err = client
        .put_site(&session(), GROUP, "taken", "westus", "plan")
        .await
        .unwrap_err();
    match &err {
        AzureError::Api { status, code, .. } => {
            assert_eq!(*status, 409);
            assert_eq!(code, "WebsiteAlreadyExists");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }

    let err = client
        .create_or_update_site(&session(), GROUP, "taken", "westus", "plan")
        .await
        .unwrap_err();
    assert!(matches!(err, CloudError::Conflict(_)));
}

#[tokio::test]
async fn test_non_json_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(web_path("sites", "missing")))
        .respond_with(ResponseTemplate::new(404).set_body_string("gone"))
        .mount(&server)
        .await;

    let client = AzureManagementClient::new(server.uri(), "sub1").unwrap();
    let err = client
        .get_site(&session(), GROUP, "missing")
        .await
        .unwrap_err();

    match err {
        CloudError::ResourceNotFound(msg) => {
            assert!(msg.contains("Not Found"));
            assert!(msg.contains("gone"));
        }
        other => panic!("Expected ResourceNotFound, got {:?}", other),
    }
}
