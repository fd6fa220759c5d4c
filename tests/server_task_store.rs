//! Concurrent access to the in-memory task store and the server on top of it.

mod common;

use std::sync::Arc;

use agentforge_a2a::server::{A2AServer, InMemoryTaskStore, TaskListParams, TaskStore};
use agentforge_a2a::types::{Task, TaskStatus};
use common::{message, obj, test_agent_card};
use serde_json::{json, Map, Value};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_modifications_are_not_lost() {
    let store = InMemoryTaskStore::new();
    let task = Task::new("agent", Map::new());
    let id = task.id.clone();
    store.save(task).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let store = store.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            store
                .modify(
                    &id,
                    Box::new(|task: &mut Task| {
                        let n = task
                            .metadata
                            .get("hits")
                            .and_then(Value::as_u64)
                            .unwrap_or(0);
                        task.metadata.insert("hits".into(), json!(n + 1));
                    }),
                )
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let task = store.get(&id).await.unwrap().unwrap();
    assert_eq!(task.metadata["hits"], 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sends_each_get_a_task() {
    let server = Arc::new(A2AServer::new(test_agent_card()));
    server.register_fn("echo", |input| async move { Ok(Value::Object(input)) });

    let mut handles = Vec::new();
    for i in 0..20 {
        let server = Arc::clone(&server);
        handles.push(tokio::spawn(async move {
            server
                .handle_message(message(
                    "tasks/send",
                    json!({"capability": "echo", "input": {"i": i}}),
                ))
                .await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        let response = handle.await.unwrap();
        let task: Task = serde_json::from_value(response.result.unwrap()).unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        ids.push(task.id);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);

    let list = server.list_tasks(None, None).await.unwrap();
    assert_eq!(list.total, 20);
}

#[tokio::test]
async fn cancel_racing_completion_keeps_one_terminal_state() {
    let store = InMemoryTaskStore::new();
    let mut task = Task::new("agent", Map::new());
    task.start();
    let id = task.id.clone();
    store.save(task).await.unwrap();

    let cancelled = store
        .modify(
            &id,
            Box::new(|task: &mut Task| {
                task.cancel();
            }),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, TaskStatus::Cancelled);

    // A handler finishing afterwards cannot overwrite the cancellation.
    let after = store
        .modify(
            &id,
            Box::new(|task: &mut Task| {
                task.complete(obj(json!({"late": true})));
            }),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status, TaskStatus::Cancelled);
    assert!(after.output.is_none());
}

#[tokio::test]
async fn server_over_shared_store() {
    let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
    let server = A2AServer::with_store(test_agent_card(), Arc::clone(&store));
    server.register_fn("echo", |input| async move { Ok(Value::Object(input)) });

    server
        .handle_message(message("tasks/send", json!({"capability": "echo"})))
        .await;

    assert_eq!(store.len().await.unwrap(), 1);
    let listed = store
        .list(&TaskListParams::default().with_status(TaskStatus::Completed))
        .await
        .unwrap();
    assert_eq!(listed.tasks.len(), 1);
}

#[tokio::test]
async fn list_is_ordered_by_creation() {
    let store = InMemoryTaskStore::new();
    let mut ids = Vec::new();
    for i in 0..3 {
        let mut task = Task::new("agent", Map::new());
        task.created_at = format!("2026-01-0{}T00:00:00.000000Z", 3 - i);
        ids.push(task.id.clone());
        store.save(task).await.unwrap();
    }
    ids.reverse();

    let listed = store.list(&TaskListParams::default()).await.unwrap();
    let listed_ids: Vec<String> = listed.tasks.into_iter().map(|t| t.id).collect();
    assert_eq!(listed_ids, ids);
}
