//! Integration tests for the Snowflake client and table owner extractor
//!
//! Uses wiremock to stand in for the Snowflake SQL API.

use catalog_extract::client::{
    SnowflakeAuth, SnowflakeClient, SnowflakeConfig, SqlSource, TokenType,
};
use catalog_extract::etl::Extractor;
use catalog_extract::extractor::{
    RoleMapping, SnowflakeTableOwnerConfig, SnowflakeTableOwnerExtractor,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SnowflakeClient {
    let config = SnowflakeConfig {
        account_url: server.uri(),
        warehouse: Some("CATALOG_WH".to_string()),
        role: Some("CATALOG_READER".to_string()),
        database: None,
        timeout_secs: 60,
        token: None,
        token_type: TokenType::Oauth,
    };
    SnowflakeClient::try_new(&config, SnowflakeAuth::Oauth("abc".to_string())).unwrap()
}

fn row_type() -> serde_json::Value {
    json!([
        {"name": "CLUSTER", "type": "text"},
        {"name": "SCHEMA", "type": "text"},
        {"name": "TABLE_NAME", "type": "text"},
        {"name": "TABLE_OWNER", "type": "text"}
    ])
}

#[tokio::test]
async fn test_execute_reads_all_partitions() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/statements"))
        .and(header("authorization", "Bearer abc"))
        .and(header("x-snowflake-authorization-token-type", "OAUTH"))
        .and(body_partial_json(json!({
            "warehouse": "CATALOG_WH",
            "role": "CATALOG_READER",
            "timeout": 60
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultSetMetaData": {
                "numRows": 3,
                "rowType": row_type(),
                "partitionInfo": [{"rowCount": 2}, {"rowCount": 1}]
            },
            "data": [
                ["prod", "sales", "orders", "sysadmin"],
                ["prod", "sales", "refunds", "analyst"]
            ],
            "code": "090001",
            "statementHandle": "h-1",
            "message": "Statement executed successfully."
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/statements/h-1"))
        .and(query_param("partition", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [["prod", "hr", "employees", "hr_admin"]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rows = client(&server)
        .execute("SELECT 1")
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["table_name"], "orders");
    assert_eq!(rows[2]["schema"], "hr");
    assert_eq!(rows[2]["table_owner"], "hr_admin");
}

#[tokio::test]
async fn test_execute_still_running_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/statements"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "code": "333334",
            "message": "Asynchronous execution in progress.",
            "statementHandle": "h-2"
        })))
        .mount(&server)
        .await;

    let err = client(&server).execute("SELECT 1").await.unwrap_err();
    assert!(err.to_string().contains("did not finish"));
}

#[tokio::test]
async fn test_execute_failure_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/statements"))
        .respond_with(ResponseTemplate::new(422).set_body_string("SQL compilation error"))
        .mount(&server)
        .await;

    let err = client(&server).execute("SELEC 1").await.unwrap_err();
    assert!(err.to_string().contains("SQL compilation error"));
}

#[tokio::test]
async fn test_table_owner_extractor_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/statements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultSetMetaData": {
                "rowType": row_type(),
                "partitionInfo": [{"rowCount": 3}]
            },
            "data": [
                ["analytics", "sales", "orders", "sysadmin"],
                ["analytics", "sales", "staging", null],
                ["analytics", "hr", "employees", "hr_admin"]
            ],
            "statementHandle": "h-3"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = SnowflakeTableOwnerConfig {
        snowflake_database: "ANALYTICS".to_string(),
        role_user_mapping: RoleMapping::template("{role}@example.com"),
        ..Default::default()
    };
    let mut extractor = SnowflakeTableOwnerExtractor::new(client(&server), config);
    assert!(extractor.sql().contains("ANALYTICS.INFORMATION_SCHEMA.TABLES"));

    let owners = extractor.extract_all().await.unwrap();
    assert_eq!(owners.len(), 2);
    assert_eq!(owners[0].table_key(), "snowflake://analytics.sales/orders");
    assert_eq!(owners[0].owners, vec!["sysadmin@example.com"]);
    assert_eq!(owners[1].table_name, "employees");
    assert!(extractor.extract().await.unwrap().is_none());
}
