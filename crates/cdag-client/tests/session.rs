//! Session behavior against an in-process mock backend.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use cdag_client::{ClientConfig, Session, SyncClient, SyncError};
use cdag_core::graph::model::{Edge, Id, Node};
use cdag_core::papers::PaperEntry;
use cdag_core::{EffectType, NodeRole};
use serde_json::{json, Value};

#[derive(Clone, Default)]
struct Backend {
    hits: Arc<AtomicUsize>,
    saved: Arc<Mutex<Vec<Value>>>,
    last_adjustment: Arc<Mutex<Option<Value>>>,
    adjustment_delay_ms: Arc<AtomicU64>,
}

impl Backend {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

async fn save(State(b): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    b.hit();
    let mut saved = b.saved.lock().unwrap();
    saved.retain(|p| p["name"] != body["name"]);
    saved.push(body);
    Json(json!({"success": true}))
}

async fn list(State(b): State<Backend>) -> Json<Value> {
    b.hit();
    let saved = b.saved.lock().unwrap();
    let projects: Vec<Value> = saved
        .iter()
        .enumerate()
        .map(|(i, p)| json!({"id": i + 1, "name": p["name"], "content": p["content"]}))
        .collect();
    Json(Value::Array(projects))
}

async fn suggestions(State(b): State<Backend>) -> Json<Value> {
    b.hit();
    Json(json!({"nodes": [{"label": "Age", "annotation": "Common confounder"}]}))
}

async fn export(State(b): State<Backend>, body: Bytes) -> Bytes {
    b.hit();
    body
}

async fn import(State(b): State<Backend>, body: Bytes) -> Json<Value> {
    b.hit();
    let text = String::from_utf8_lossy(&body);
    if text.contains("bad.json") {
        return Json(json!({"success": false, "error": "Invalid JSON file"}));
    }
    if text.contains("slow.json") {
        tokio::time::sleep(Duration::from_millis(200)).await;
        return Json(json!({"success": true, "content": {
            "nodes": [{"id": "slow", "label": "Slow"}], "edges": []
        }}));
    }
    Json(json!({"success": true, "content": {
        "nodes": [{"id": 1, "label": "Imported A"}, {"id": 2, "label": "Imported B"}],
        "edges": [{"id": "e1", "from": 1, "to": 2}]
    }}))
}

async fn generate(State(b): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    b.hit();
    if body["prompt"] == "forbidden" {
        return Json(json!({"success": false, "error": "Access denied"}));
    }
    Json(json!({
        "success": true,
        "graph_data": {
            "nodes": [{"id": 1, "label": "Policy X"}, {"id": 2, "label": "Outcome Y"}],
            "edges": [{"from": 1, "to": 2}]
        },
        "papers": []
    }))
}

async fn adjustment(State(b): State<Backend>, Json(body): Json<Value>) -> Json<Value> {
    b.hit();
    *b.last_adjustment.lock().unwrap() = Some(body);
    let delay = b.adjustment_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    Json(json!({"success": true, "adjustment_sets": [[3], [4]]}))
}

async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/save_project", post(save))
        .route("/get_projects", get(list))
        .route("/get_node_suggestions", get(suggestions))
        .route("/export_graph", post(export))
        .route("/import_graph", post(import))
        .route("/admin/generate_graph", post(generate))
        .route("/get_adjustment_sets", post(adjustment))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn session() -> (Session, Backend) {
    let backend = Backend::default();
    let url = spawn_backend(backend.clone()).await;
    let client = SyncClient::new(&ClientConfig::with_url(&url)).unwrap();
    (Session::new(client), backend)
}

fn seed(session: &Session) {
    session.store(|s| {
        s.replace_all(
            vec![
                Node::new(1, "Smoking"),
                Node::new(2, "Tar"),
                Node::new(3, "Age"),
                Node::new(4, "Cancer"),
            ],
            vec![
                Edge::new("e1", 1, 2),
                Edge::new("e2", 2, 4),
                Edge::new("e3", 3, 1),
                Edge::new("e4", 3, 4),
            ],
        )
        .unwrap()
    });
}

#[tokio::test]
async fn test_save_with_blank_name_sends_nothing() {
    let (session, backend) = session().await;
    seed(&session);

    let err = session.save(Some("   ")).await.unwrap_err();
    assert!(err.is_local());
    assert_eq!(err.user_message(), "Please provide a project name");
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn test_generate_with_empty_prompt_sends_nothing() {
    let (session, backend) = session().await;
    let err = session.generate("").await.unwrap_err();
    assert!(err.is_local());
    assert_eq!(backend.hits(), 0);
}

#[tokio::test]
async fn test_highlight_without_selection_sends_nothing() {
    let (session, backend) = session().await;
    seed(&session);
    session.selectors(|s| s.set_outcome(Some(Id::Int(4)))).unwrap();

    let err = session.highlight().await.unwrap_err();
    assert!(err.is_local());
    assert_eq!(backend.hits(), 0);
    assert!(session.store(|s| s.colors().is_empty()));
}

#[tokio::test]
async fn test_save_then_list_roundtrip() {
    let (session, backend) = session().await;
    seed(&session);

    let msg = session.save(Some("smoking")).await.unwrap();
    assert_eq!(msg, "Project saved successfully");
    assert_eq!(session.current_project().as_deref(), Some("smoking"));

    // Saving again without a name overwrites the current project.
    session.save(None).await.unwrap();

    let projects = session.refresh_projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "smoking");
    assert_eq!(projects[0].content.nodes.len(), 4);
    assert_eq!(backend.hits(), 3);
}

#[tokio::test]
async fn test_saved_content_has_no_overlay() {
    let (session, backend) = session().await;
    seed(&session);
    session.selectors(|s| {
        s.set_outcome(Some(Id::Int(4))).unwrap();
        s.toggle_cause(&Id::Int(1)).unwrap();
    });
    session.highlight().await.unwrap();
    assert!(session.store(|s| !s.colors().is_empty()));
    session.save(Some("smoking")).await.unwrap();

    let saved = backend.saved.lock().unwrap();
    let nodes = saved[0]["content"]["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    for node in nodes {
        assert!(node.get("color").is_none(), "overlay leaked into {}", node);
    }
}

#[tokio::test]
async fn test_load_project_replaces_graph() {
    let (session, _backend) = session().await;
    seed(&session);
    session.save(Some("first")).await.unwrap();
    session.store(|s| s.clear());

    let projects = session.refresh_projects().await.unwrap();
    session.load_project(&projects[0]).await.unwrap();
    assert_eq!(session.store(|s| s.nodes().len()), 4);
    assert_eq!(session.current_project().as_deref(), Some("first"));
}

#[tokio::test]
async fn test_import_failure_leaves_graph_untouched() {
    let (session, _backend) = session().await;
    seed(&session);
    let before = session.store(|s| s.content());

    let err = session.import("bad.json", b"{not json".to_vec()).await.unwrap_err();
    assert_eq!(err.user_message(), "Error importing graph: Invalid JSON file");
    assert_eq!(session.store(|s| s.content()), before);
}

#[tokio::test]
async fn test_import_replaces_graph() {
    let (session, _backend) = session().await;
    seed(&session);

    let msg = session.import("graph.json", b"{}".to_vec()).await.unwrap();
    assert_eq!(msg, "Graph imported successfully");
    session.store(|s| {
        let labels: Vec<&str> = s.nodes().iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Imported A", "Imported B"]);
        assert_eq!(s.edges().len(), 1);
        assert!(s.get_node(&Id::Int(3)).is_none());
    });
}

#[tokio::test]
async fn test_overlapping_imports_apply_in_issue_order() {
    let (session, _backend) = session().await;

    let (slow, fast) = tokio::join!(
        session.import("slow.json", b"{}".to_vec()),
        session.import("fast.json", b"{}".to_vec()),
    );
    slow.unwrap();
    fast.unwrap();

    // The slow response resolves last on the wire but was issued first.
    assert_eq!(session.store(|s| s.nodes().len()), 2);
    assert!(session.store(|s| s.get_node(&Id::from("slow")).is_none()));
}

#[tokio::test]
async fn test_generate_replaces_graph_and_renders_papers() {
    let (session, _backend) = session().await;
    seed(&session);

    let generated = session.generate("policy x effects").await.unwrap();
    assert_eq!(generated.nodes, 2);
    assert_eq!(generated.edges, 1);
    assert_eq!(generated.papers, vec![PaperEntry::Placeholder]);
    assert_eq!(session.store(|s| s.nodes()[0].label.clone()), "Policy X");
}

#[tokio::test]
async fn test_generate_backend_failure_surfaces_message() {
    let (session, _backend) = session().await;
    seed(&session);

    let err = session.generate("forbidden").await.unwrap_err();
    assert_eq!(err.user_message(), "Error generating graph: Access denied");
    assert_eq!(session.store(|s| s.nodes().len()), 4);
}

#[tokio::test]
async fn test_highlight_uses_first_adjustment_set() {
    let (session, backend) = session().await;
    seed(&session);
    session.selectors(|s| {
        s.set_outcome(Some(Id::Int(4))).unwrap();
        s.toggle_cause(&Id::Int(1)).unwrap();
        s.set_effect_type(EffectType::Direct);
    });

    let set = session.highlight().await.unwrap();
    assert_eq!(set.as_slice(), &[Id::Int(3)]);

    let request = backend.last_adjustment.lock().unwrap().clone().unwrap();
    assert_eq!(request["outcome"], 4);
    assert_eq!(request["causes"], json!([1]));
    assert_eq!(request["effect_type"], "direct");

    session.store(|s| {
        assert_eq!(s.color_of(&Id::Int(1)), Some(&NodeRole::Cause.color()));
        assert_eq!(s.color_of(&Id::Int(2)), Some(&NodeRole::Default.color()));
        assert_eq!(s.color_of(&Id::Int(3)), Some(&NodeRole::Adjustment.color()));
        assert_eq!(s.color_of(&Id::Int(4)), Some(&NodeRole::Outcome.color()));
    });
}

#[tokio::test]
async fn test_highlight_dropped_when_graph_replaced_in_flight() {
    let (session, backend) = session().await;
    seed(&session);
    session.selectors(|s| {
        s.set_outcome(Some(Id::Int(4))).unwrap();
        s.toggle_cause(&Id::Int(1)).unwrap();
    });
    backend.adjustment_delay_ms.store(300, Ordering::SeqCst);

    let (highlight, generated) =
        tokio::join!(session.highlight(), session.generate("policy x effects"));
    generated.unwrap();
    assert!(matches!(highlight.unwrap_err(), SyncError::Stale));

    // The generated graph reuses ids 1 and 2; none of them may be painted.
    session.store(|s| {
        assert_eq!(s.nodes()[0].label, "Policy X");
        assert!(s.colors().is_empty());
        assert_eq!(s.color_of(&Id::Int(1)), None);
    });
}

#[tokio::test]
async fn test_selection_follows_node_removal() {
    let (session, _backend) = session().await;
    seed(&session);
    session.selectors(|s| {
        s.set_outcome(Some(Id::Int(4))).unwrap();
        s.set_causes(vec![Id::Int(1), Id::Int(2)]).unwrap();
    });

    session.store(|s| s.remove(&[Id::Int(4)]));
    session.selectors(|s| {
        assert_eq!(s.outcome(), None);
        assert_eq!(s.causes(), &[Id::Int(1), Id::Int(2)]);
    });
}

#[tokio::test]
async fn test_suggestion_adds_annotated_node() {
    let (session, _backend) = session().await;
    let suggestions = session.suggestions().await.unwrap();
    let id = session.add_suggestion(&suggestions[0]).unwrap();
    session.store(|s| {
        let node = s.get_node(&id).unwrap();
        assert_eq!(node.label, "Age");
        assert_eq!(node.title.as_deref(), Some("Common confounder"));
    });
}

#[tokio::test]
async fn test_export_returns_raw_payload() {
    let (session, _backend) = session().await;
    seed(&session);
    let bytes = session.export().await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["nodes"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_transport_failure_is_generic_and_harmless() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SyncClient::new(&ClientConfig::with_url(&format!("http://{}", addr))).unwrap();
    let session = Session::new(client);
    seed(&session);

    let err = session.import("graph.json", b"{}".to_vec()).await.unwrap_err();
    assert!(!err.is_local());
    assert_eq!(err.user_message(), cdag_client::error::GENERIC_FAILURE);
    assert_eq!(session.store(|s| s.nodes().len()), 4);
}
