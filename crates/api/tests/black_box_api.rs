use std::path::PathBuf;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;
use stockroom_api::app::{self, services::AppServices};
use stockroom_infra::{CatalogStore, FlatFileStore, InMemoryCatalogStore};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(store: Arc<dyn CatalogStore>) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let services = AppServices::bootstrap(store, 50).expect("bootstrap failed");
        let app = app::build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn in_memory() -> Self {
        Self::spawn(Arc::new(InMemoryCatalogStore::new())).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct TempDb(PathBuf);

impl TempDb {
    fn new() -> Self {
        let name = format!("stockroom-api-{}.txt", uuid::Uuid::now_v7());
        Self(std::env::temp_dir().join(name))
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

async fn action(
    client: &reqwest::Client,
    srv: &TestServer,
    form: &[(&str, &str)],
) -> reqwest::Response {
    client
        .post(srv.url("/api/action"))
        .form(form)
        .send()
        .await
        .unwrap()
}

async fn get_json(client: &reqwest::Client, srv: &TestServer, path: &str) -> Value {
    let res = client.get(srv.url(path)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    res.json().await.unwrap()
}

fn find_product<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    if node["type"] == "product" && node["name"] == name {
        return Some(node);
    }
    node["children"]
        .as_array()?
        .iter()
        .find_map(|child| find_product(child, name))
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::in_memory().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn seeded_tree_is_served() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let tree = get_json(&client, &srv, "/api/inventory").await;
    assert_eq!(tree["type"], "category");
    assert_eq!(tree["name"], "Global Inventory");

    let headphones = find_product(&tree, "Headphones").unwrap();
    assert_eq!(headphones["quantity"], 2);
    assert_eq!(headphones["state"], "LowStock");
    assert_eq!(headphones["kind"], "electronic");

    let types = get_json(&client, &srv, "/api/types").await;
    let expected = serde_json::json!(["apparel", "electronic", "generic"]);
    assert_eq!(types, expected);
}

#[tokio::test]
async fn buy_then_undo_roundtrip() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let form = [("type", "buy"), ("product", "laptop"), ("amount", "3")];
    let res = action(&client, &srv, &form).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["persisted"], true);

    let tree = get_json(&client, &srv, "/api/inventory").await;
    let laptop = find_product(&tree, "Laptop").unwrap();
    assert_eq!(laptop["quantity"], 7);

    let history = get_json(&client, &srv, "/api/history").await;
    assert_eq!(history["commands"], serde_json::json!(["RemoveStock"]));

    let res = action(&client, &srv, &[("type", "undo")]).await;
    assert_eq!(res.status(), StatusCode::OK);
    let tree = get_json(&client, &srv, "/api/inventory").await;
    let laptop = find_product(&tree, "Laptop").unwrap();
    assert_eq!(laptop["quantity"], 10);

    let res = action(&client, &srv, &[("type", "undo")]).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "empty_history");
}

#[tokio::test]
async fn history_downloads_as_text() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/history/export"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let text = res.text().await.unwrap();
    assert!(text.contains("No commands executed yet."));

    let form = [("type", "restock"), ("product", "Jeans"), ("amount", "0")];
    let res = action(&client, &srv, &form).await;
    assert_eq!(res.status(), StatusCode::OK);
    let form = [("type", "buy"), ("product", "Jeans")];
    action(&client, &srv, &form).await;

    let res = client
        .get(srv.url("/api/history/export"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        res.headers()[reqwest::header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    let text = res.text().await.unwrap();
    assert!(text.contains("Total Commands Executed: 2"));
    assert!(text.contains("[1]  RemoveStock\n[2]  AddStock\n"));
}

#[tokio::test]
async fn blocked_sale_is_422_and_logged() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let form = [("type", "buy"), ("product", "Headphones"), ("amount", "5")];
    let res = action(&client, &srv, &form).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");

    let logs = get_json(&client, &srv, "/api/logs").await;
    let lines: Vec<&str> = logs
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    let failed = "COMMAND FAILED: RemoveStock";
    assert!(lines.iter().any(|l| l.contains(failed)));

    // The blocked sale stays in history; undoing it restocks.
    let history = get_json(&client, &srv, "/api/history").await;
    assert_eq!(history["commands"], serde_json::json!(["RemoveStock"]));
    action(&client, &srv, &[("type", "undo")]).await;
    let tree = get_json(&client, &srv, "/api/inventory").await;
    let headphones = find_product(&tree, "Headphones").unwrap();
    assert_eq!(headphones["quantity"], 7);
}

#[tokio::test]
async fn create_category_and_product() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let form = [
        ("type", "create_category"),
        ("name", "Garden"),
        ("parentCategory", "Global Inventory"),
    ];
    let res = action(&client, &srv, &form).await;
    assert_eq!(res.status(), StatusCode::OK);

    let form = [
        ("type", "create_product"),
        ("name", "Shovel"),
        ("price", "25"),
        ("stock", "3"),
        ("threshold", "4"),
        ("productType", "generic"),
        ("parentCategory", "Garden"),
    ];
    let res = action(&client, &srv, &form).await;
    assert_eq!(res.status(), StatusCode::OK);

    let tree = get_json(&client, &srv, "/api/inventory").await;
    let shovel = find_product(&tree, "Shovel").unwrap();
    assert_eq!(shovel["state"], "LowStock");
    assert_eq!(shovel["price"], 25);

    let report = get_json(&client, &srv, "/api/report").await;
    assert_eq!(report["item_count"], 6);
    let low_stock = report["low_stock"].as_array().unwrap();
    assert!(low_stock.iter().any(|e| e["name"] == "Shovel"));
}

#[tokio::test]
async fn bad_requests_map_to_4xx() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let res = action(&client, &srv, &[("type", "teleport")]).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let form = [("type", "buy"), ("product", "Laptop"), ("amount", "many")];
    let res = action(&client, &srv, &form).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let form = [("type", "restock"), ("product", "Unicorn")];
    let res = action(&client, &srv, &form).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let form = [
        ("type", "create_category"),
        ("name", "a,b"),
        ("parentCategory", "Apparel"),
    ];
    let res = action(&client, &srv, &form).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let history = get_json(&client, &srv, "/api/history").await;
    assert_eq!(history["commands"], serde_json::json!([]));
}

#[tokio::test]
async fn product_types_can_be_registered_and_removed() {
    let srv = TestServer::in_memory().await;
    let client = reqwest::Client::new();

    let form = [
        ("type", "register_product_type"),
        ("typeName", "Gadget"),
        ("baseType", "electronic"),
    ];
    let res = action(&client, &srv, &form).await;
    assert_eq!(res.status(), StatusCode::OK);
    let types = get_json(&client, &srv, "/api/types").await;
    assert!(types.as_array().unwrap().iter().any(|t| *t == "gadget"));

    let form = [("type", "remove_product_type"), ("typeName", "apparel")];
    let res = action(&client, &srv, &form).await;
    assert_eq!(res.status(), StatusCode::OK);
    let types = get_json(&client, &srv, "/api/types").await;
    let expected = serde_json::json!(["electronic", "gadget", "generic"]);
    assert_eq!(types, expected);
}

#[tokio::test]
async fn state_survives_restart_on_disk() {
    let db = TempDb::new();
    let client = reqwest::Client::new();

    {
        let store = Arc::new(FlatFileStore::new(&db.0));
        let srv = TestServer::spawn(store).await;
        let form = [("type", "remove_category"), ("category", "Apparel")];
        let res = action(&client, &srv, &form).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let store = Arc::new(FlatFileStore::new(&db.0));
    let srv = TestServer::spawn(store).await;
    let tree = get_json(&client, &srv, "/api/inventory").await;
    assert!(find_product(&tree, "Jeans").is_none());
    assert!(find_product(&tree, "Laptop").is_some());
}
