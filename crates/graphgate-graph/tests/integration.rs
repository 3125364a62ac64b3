//! Integration tests for graphgate-graph against a live FalkorDB instance.
//!
//! These tests require a FalkorDB server (e.g. `docker run -p 6379:6379 falkordb/falkordb`).
//! Run with: cargo test --package graphgate-graph --test integration -- --ignored
//!
//! Skipped automatically if FalkorDB is not available. The construction
//! failure test needs no server and always runs.

use serde_json::json;

use graphgate_core::{ConnectionOptions, QueryOutput};
use graphgate_graph::{GraphError, GraphGateway, ToolFlags, Toolkit};

fn unique_graph(test: &str) -> String {
    format!("graphgate_it_{}_{test}", std::process::id())
}

async fn connect_or_skip(graph: &str) -> Option<GraphGateway> {
    let options = ConnectionOptions::new().graph_name(graph);
    match GraphGateway::connect(&options, ToolFlags::default()).await {
        Ok(gateway) => Some(gateway),
        Err(e) => {
            eprintln!("Skipping integration test (FalkorDB not available): {e}");
            None
        }
    }
}

async fn cleanup(gateway: &GraphGateway) {
    gateway.run_cypher_query("MATCH (n) DETACH DELETE n").await;
}

async fn seed_movies(gateway: &GraphGateway) {
    gateway
        .try_run_cypher_query(
            "CREATE (:Person {name: 'Keanu', born: 1964})-[:ACTED_IN]->(:Movie {title: 'The Matrix'}),
                    (:Person {name: 'Lana'})-[:DIRECTED]->(:Movie {title: 'Cloud Atlas'})",
        )
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "requires live FalkorDB"]
async fn test_schema_round_trip() {
    let graph = unique_graph("schema");
    let Some(gateway) = connect_or_skip(&graph).await else {
        return;
    };
    cleanup(&gateway).await;
    seed_movies(&gateway).await;

    let mut labels = gateway.list_labels().await;
    labels.sort();
    assert_eq!(labels, vec!["Movie", "Person"]);

    let mut rel_types = gateway.list_relationship_types().await;
    rel_types.sort();
    assert_eq!(rel_types, vec!["ACTED_IN", "DIRECTED"]);

    let schema = gateway.get_schema().await;
    assert_eq!(schema.len(), 1);
    assert_eq!(schema[0].labels.len(), 2);

    cleanup(&gateway).await;
}

#[tokio::test]
#[ignore = "requires live FalkorDB"]
async fn test_run_cypher_query_records() {
    let graph = unique_graph("records");
    let Some(gateway) = connect_or_skip(&graph).await else {
        return;
    };
    cleanup(&gateway).await;
    seed_movies(&gateway).await;

    let output = gateway
        .run_cypher_query("MATCH (p:Person {name: 'Keanu'}) RETURN p.name AS name, p.born AS born")
        .await;
    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!([{"name": "Keanu", "born": 1964}])
    );

    cleanup(&gateway).await;
}

#[tokio::test]
#[ignore = "requires live FalkorDB"]
async fn test_scalar_types_survive() {
    let graph = unique_graph("scalars");
    let Some(gateway) = connect_or_skip(&graph).await else {
        return;
    };

    let output = gateway
        .try_run_cypher_query(
            "RETURN 1.5 AS score, true AS ok, 'true' AS s, null AS missing, [1, 2.5] AS list",
        )
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!([{"score": 1.5, "ok": true, "s": "true", "missing": null, "list": [1, 2.5]}])
    );
}

#[tokio::test]
#[ignore = "requires live FalkorDB"]
async fn test_nodes_and_edges_are_objects() {
    let graph = unique_graph("entities");
    let Some(gateway) = connect_or_skip(&graph).await else {
        return;
    };
    cleanup(&gateway).await;
    seed_movies(&gateway).await;

    let output = gateway
        .try_run_cypher_query(
            "MATCH (p:Person {name: 'Keanu'})-[r:ACTED_IN]->(m:Movie) RETURN p, r, m.title AS title",
        )
        .await
        .unwrap();
    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value[0]["p"]["labels"], json!(["Person"]));
    assert_eq!(value[0]["p"]["properties"], json!({"name": "Keanu", "born": 1964}));
    assert_eq!(value[0]["r"]["type"], json!("ACTED_IN"));
    assert_eq!(value[0]["r"]["src_node"], value[0]["p"]["id"]);
    assert_eq!(value[0]["title"], json!("The Matrix"));

    cleanup(&gateway).await;
}

#[tokio::test]
#[ignore = "requires live FalkorDB"]
async fn test_write_without_return_has_no_rows() {
    let graph = unique_graph("write");
    let Some(gateway) = connect_or_skip(&graph).await else {
        return;
    };
    cleanup(&gateway).await;

    let output = gateway.run_cypher_query("CREATE (:Tag {name: 'x'})").await;
    assert_eq!(output, QueryOutput::Rows(Vec::new()));

    cleanup(&gateway).await;
}

#[tokio::test]
#[ignore = "requires live FalkorDB"]
async fn test_invalid_cypher_returns_empty() {
    let graph = unique_graph("invalid");
    let Some(gateway) = connect_or_skip(&graph).await else {
        return;
    };

    assert!(gateway.run_cypher_query("THIS IS NOT CYPHER").await.is_empty());
    assert!(gateway.try_run_cypher_query("THIS IS NOT CYPHER").await.is_err());
    assert_eq!(
        gateway
            .call("run_cypher_query", json!({"query": "THIS IS NOT CYPHER"}))
            .await
            .unwrap(),
        json!([])
    );
}

#[tokio::test]
async fn test_unreachable_server_fails_construction() {
    let options = ConnectionOptions::new()
        .host("127.0.0.1")
        .port(1)
        .connect_timeout_ms(500);
    let result = GraphGateway::connect(&options, ToolFlags::default()).await;
    assert!(matches!(
        result,
        Err(GraphError::Connection(_)) | Err(GraphError::ConnectTimeout { .. })
    ));
}
