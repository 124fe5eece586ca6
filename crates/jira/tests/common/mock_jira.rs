//! In-process stand-in for the Jira issue API
//!
//! Implements the endpoints the suite uses with the same status codes as the
//! real service. The search index trails writes by a configurable number of
//! search calls so polling code sees real eventual consistency.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};

pub const TEST_TOKEN: &str = "dGVzdDp0b2tlbg==";

#[derive(Default)]
struct Store {
    project_key: String,
    index_lag: usize,
    next_id: u64,
    search_calls: usize,
    issues: BTreeMap<String, StoredIssue>,
}

struct StoredIssue {
    id: String,
    fields: Map<String, Value>,
    /// What search currently returns for this issue
    indexed: Option<Map<String, Value>>,
    /// Latest write and the search call from which it becomes visible
    pending: Option<(Map<String, Value>, usize)>,
}

impl StoredIssue {
    fn stage(&mut self, visible_from: usize) {
        self.pending = Some((self.fields.clone(), visible_from));
    }
}

type Shared = Arc<Mutex<Store>>;

pub struct MockJira {
    pub base_url: String,
    store: Shared,
}

impl MockJira {
    /// Serve on an ephemeral port. Writes reach search after `index_lag`
    /// further search calls.
    pub async fn start(project_key: &str, index_lag: usize) -> Self {
        let store: Shared = Arc::new(Mutex::new(Store {
            project_key: project_key.to_string(),
            index_lag,
            next_id: 10000,
            ..Default::default()
        }));

        let app = Router::new()
            .route("/rest/api/3/issue", axum::routing::post(create_issue))
            .route(
                "/rest/api/3/issue/:key",
                get(get_issue).put(update_issue).delete(delete_issue),
            )
            .route("/rest/api/3/search/jql", get(search))
            .route("/test/not-json", get(|| async { (StatusCode::OK, "<html>upstream error</html>") }))
            .route("/test/empty", get(|| async { StatusCode::OK }))
            .route("/test/no-content", get(|| async { StatusCode::NO_CONTENT }))
            .with_state(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock jira");
        let addr = listener.local_addr().expect("mock jira addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock jira server");
        });

        Self {
            base_url: format!("http://{}", addr),
            store,
        }
    }

    pub fn issue_count(&self) -> usize {
        self.store.lock().issues.len()
    }

    pub fn search_calls(&self) -> usize {
        self.store.lock().search_calls
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Basic {}", TEST_TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Client must be authenticated").into_response()
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "errorMessages": [message], "errors": {} }))).into_response()
}

fn now() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string()
}

fn issue_json(key: &str, issue: &StoredIssue, fields: &Map<String, Value>) -> Value {
    json!({
        "id": issue.id,
        "key": key,
        "self": format!("/rest/api/3/issue/{}", issue.id),
        "fields": fields,
    })
}

async fn create_issue(State(store): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut store = store.lock();

    let Some(fields) = body.get("fields").and_then(Value::as_object) else {
        return error(StatusCode::BAD_REQUEST, "fields is required");
    };
    let project = body.pointer("/fields/project/key").and_then(Value::as_str).unwrap_or_default();
    if project != store.project_key {
        return error(StatusCode::BAD_REQUEST, "valid project is required");
    }
    if fields.get("summary").and_then(Value::as_str).map_or(true, str::is_empty) {
        return error(StatusCode::BAD_REQUEST, "summary is required");
    }

    store.next_id += 1;
    let id = store.next_id.to_string();
    let key = format!("{}-{}", store.project_key, store.next_id - 10000);

    let mut stored = fields.clone();
    stored.entry("priority").or_insert_with(|| json!({ "name": "Medium" }));
    stored.entry("labels").or_insert_with(|| json!([]));
    stored.entry("description").or_insert(Value::Null);
    stored.insert("status".to_string(), json!({ "name": "To Do" }));
    stored.insert("created".to_string(), json!(now()));
    stored.insert("updated".to_string(), json!(now()));

    let visible_from = store.search_calls + store.index_lag;
    let mut issue = StoredIssue {
        id: id.clone(),
        fields: stored,
        indexed: None,
        pending: None,
    };
    issue.stage(visible_from);
    store.issues.insert(key.clone(), issue);

    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "key": key, "self": format!("/rest/api/3/issue/{}", id) })),
    )
        .into_response()
}

async fn get_issue(State(store): State<Shared>, headers: HeaderMap, Path(key): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let store = store.lock();
    match store.issues.get(&key) {
        Some(issue) => Json(issue_json(&key, issue, &issue.fields)).into_response(),
        None => error(StatusCode::NOT_FOUND, "Issue does not exist or you do not have permission to see it."),
    }
}

async fn update_issue(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(key): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut store = store.lock();
    let visible_from = store.search_calls + store.index_lag;

    let Some(issue) = store.issues.get_mut(&key) else {
        return error(StatusCode::NOT_FOUND, "Issue does not exist or you do not have permission to see it.");
    };
    let Some(fields) = body.get("fields").and_then(Value::as_object) else {
        return error(StatusCode::BAD_REQUEST, "fields is required");
    };

    for (name, value) in fields {
        issue.fields.insert(name.clone(), value.clone());
    }
    issue.fields.insert("updated".to_string(), json!(now()));
    issue.stage(visible_from);

    StatusCode::NO_CONTENT.into_response()
}

async fn delete_issue(State(store): State<Shared>, headers: HeaderMap, Path(key): Path<String>) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    match store.lock().issues.remove(&key) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => error(StatusCode::NOT_FOUND, "Issue does not exist or you do not have permission to see it."),
    }
}

/// Supports `field = value` clauses joined by `AND` on `project` and `key`.
fn parse_jql(jql: &str) -> Option<Vec<(String, String)>> {
    jql.split(" AND ")
        .map(|clause| {
            let (field, value) = clause.split_once('=')?;
            let field = field.trim().to_ascii_lowercase();
            let value = value.trim().trim_matches('"').to_string();
            matches!(field.as_str(), "project" | "key").then_some((field, value))
        })
        .collect()
}

async fn search(
    State(store): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut store = store.lock();
    store.search_calls += 1;
    let calls = store.search_calls;

    for issue in store.issues.values_mut() {
        let ready = matches!(&issue.pending, Some((_, from)) if calls > *from);
        if ready {
            issue.indexed = issue.pending.take().map(|(fields, _)| fields);
        }
    }

    let Some(clauses) = params.get("jql").and_then(|jql| parse_jql(jql)) else {
        return error(StatusCode::BAD_REQUEST, "Unsupported JQL");
    };
    let max_results: usize = params
        .get("maxResults")
        .and_then(|m| m.parse().ok())
        .unwrap_or(50);
    let offset: usize = params
        .get("nextPageToken")
        .and_then(|t| t.parse().ok())
        .unwrap_or(0);
    let wanted: Vec<&str> = params
        .get("fields")
        .map(|f| f.split(',').collect())
        .unwrap_or_default();

    let matches: Vec<Value> = store
        .issues
        .iter()
        .filter_map(|(key, issue)| {
            let indexed = issue.indexed.as_ref()?;
            let project = indexed.get("project").and_then(|p| p.get("key")).and_then(Value::as_str);
            let keep = clauses.iter().all(|(field, value)| match field.as_str() {
                "project" => project == Some(value.as_str()),
                _ => key == value,
            });
            if !keep {
                return None;
            }
            let fields: Map<String, Value> = indexed
                .iter()
                .filter(|(name, _)| wanted.is_empty() || wanted.contains(&name.as_str()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            Some(issue_json(key, issue, &fields))
        })
        .collect();

    let page: Vec<Value> = matches.iter().skip(offset).take(max_results).cloned().collect();
    let end = offset + page.len();
    let mut body = json!({ "issues": page, "isLast": end >= matches.len() });
    if end < matches.len() {
        body["nextPageToken"] = json!(end.to_string());
    }

    Json(body).into_response()
}
