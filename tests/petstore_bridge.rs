//! Drives the bridge through its public API against an in-process backend.

use std::io::Write;

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::HeaderMap,
    routing::get,
};
use openapi_mcp_server::core::{Config, McpServer};
use serde_json::{Value, json};
use std::collections::HashMap;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;

const PETSTORE: &str = r#"
openapi: 3.0.3
info:
  title: Petstore
  version: "2.1"
paths:
  /pets:
    get:
      operationId: listPets
      summary: List pets
      tags: [pets]
      parameters:
        - name: limit
          in: query
          required: false
          schema: { type: integer }
      responses:
        "200":
          description: A page of pets
    post:
      summary: Create a pet
      tags: [pets]
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
              required: [name]
              properties:
                name: { type: string }
      responses:
        "201":
          description: Created
  /pets/{petId}:
    get:
      operationId: showPetById
      summary: Info for a specific pet
      tags: [pets]
      parameters:
        - name: petId
          in: path
          required: true
          schema: { type: string }
      responses:
        "200":
          description: Expected response to a valid request
          content:
            application/json:
              example: { id: "7", name: Rex }
"#;

async fn backend() -> String {
    let app = Router::new()
        .route(
            "/pets",
            get(
                |Query(query): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    Json(json!({ "query": query, "authorization": auth }))
                },
            )
            .post(|Json(body): Json<Value>| async move { Json(json!({ "created": body })) }),
        )
        .route(
            "/pets/{pet_id}",
            get(|Path(pet_id): Path<String>| async move { Json(json!({ "id": pet_id })) }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn server(base_url: &str) -> (McpServer, NamedTempFile) {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PETSTORE.as_bytes()).unwrap();

    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.spec_source = file.path().display().to_string();

    (McpServer::new(config).await.unwrap(), file)
}

#[tokio::test]
async fn test_tools_are_generated_per_operation() {
    let (server, _file) = server("http://127.0.0.1:9").await;

    let names = server.registry().tool_names();
    for expected in ["listPets", "post_pets", "showPetById", "list_operations", "dispatch"] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }

    let (listing, is_error) = server
        .registry()
        .call_tool("list_operations", json!({}))
        .await
        .unwrap();
    assert!(!is_error);
    assert_eq!(listing["total"], 3);
    assert_eq!(listing["operations"][0]["full_url"], "http://127.0.0.1:9/pets");
}

#[tokio::test]
async fn test_generated_tools_call_the_backend() {
    let base = backend().await;
    let (server, _file) = server(&base).await;
    let registry = server.registry();

    let (shown, is_error) = registry
        .call_tool("showPetById", json!({ "petId": "42" }))
        .await
        .unwrap();
    assert!(!is_error);
    assert_eq!(shown["status_code"], 200);
    assert_eq!(shown["body"]["value"]["id"], "42");

    let (created, _) = registry
        .call_tool("post_pets", json!({ "body": { "name": "Rex" } }))
        .await
        .unwrap();
    assert_eq!(created["body"]["value"]["created"]["name"], "Rex");

    let (missing, is_error) = registry.call_tool("showPetById", json!({})).await.unwrap();
    assert!(is_error);
    assert_eq!(missing["kind"], "invalid_arguments");
    assert_eq!(missing["field"], "petId");
}

#[tokio::test]
async fn test_bearer_token_reaches_backend() {
    let base = backend().await;
    let (server, _file) = server(&base).await;
    let registry = server.registry();

    let (set, _) = registry
        .call_tool("set_bearer_token", json!({ "token": "aaa.bbb.ccc" }))
        .await
        .unwrap();
    assert_eq!(set["success"], true);

    let (listed, _) = registry
        .call_tool("listPets", json!({ "limit": 3 }))
        .await
        .unwrap();
    assert_eq!(listed["body"]["value"]["query"]["limit"], "3");
    assert_eq!(listed["body"]["value"]["authorization"], "Bearer aaa.bbb.ccc");

    let (anonymous, _) = registry
        .call_tool(
            "dispatch",
            json!({ "path": "pets", "use_credential": false }),
        )
        .await
        .unwrap();
    assert_eq!(anonymous["body"]["value"]["authorization"], Value::Null);
}
