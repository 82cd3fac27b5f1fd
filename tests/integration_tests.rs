use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use ecommerce_catalog::config::Config;
use ecommerce_catalog::{build_app, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "catalog-test-boundary";

struct TestApp {
    router: Router,
    images: TempDir,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(Config::default())
    }

    fn with_config(config: Config) -> Self {
        let images = tempfile::tempdir().unwrap();
        let router = build_app(AppState::in_memory(images.path()), &config);
        Self { router, images }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("{} returned a non-JSON body: {}", status, String::from_utf8_lossy(&bytes))
            })
        };
        (status, body)
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn upload(&self, uri: &str, field: &str, file_name: &str, bytes: &[u8]) -> (StatusCode, Value) {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn create_category(&self, name: &str) -> i64 {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/public/categories",
                Some(json!({ "categoryName": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["categoryId"].as_i64().unwrap()
    }

    async fn add_product(&self, category_id: i64, body: Value) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            &format!("/api/admin/categories/{}/product", category_id),
            Some(body),
        )
        .await
    }
}

fn product_body(name: &str, price: f64, discount: f64) -> Value {
    json!({
        "productName": name,
        "description": format!("{} for testing", name),
        "quantity": 5,
        "price": price,
        "discount": discount
    })
}

fn names(body: &Value) -> Vec<String> {
    body["content"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["productName"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_empty_catalog_lists_are_empty() {
    let app = TestApp::new();
    let (status, body) = app.call(Method::GET, "/api/public/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "content": [] }));

    let (status, body) = app.call(Method::GET, "/api/public/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "content": [] }));
}

#[tokio::test]
async fn test_duplicate_category_returns_conflict() {
    let app = TestApp::new();
    app.create_category("Electronics").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/public/categories",
            Some(json!({ "categoryName": "Electronics" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
    assert_eq!(body["code"], 409);

    let (_, body) = app.call(Method::GET, "/api/public/categories", None).await;
    assert_eq!(body["content"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_category_name_validation() {
    let app = TestApp::new();
    let (status, body) = app
        .call(
            Method::POST,
            "/api/public/categories",
            Some(json!({ "categoryName": "Toy" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Category name must contain at least 5 characters"
    );
}

#[tokio::test]
async fn test_update_category() {
    let app = TestApp::new();
    let id = app.create_category("Sporting").await;

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/api/public/categories/{}", id),
            Some(json!({ "categoryId": 777, "categoryName": "Sporting Goods" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "categoryId": id, "categoryName": "Sporting Goods" }));

    let (status, body) = app
        .call(
            Method::PUT,
            "/api/public/categories/99999",
            Some(json!({ "categoryName": "Xylophones" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found with categoryId: 99999");
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app
        .call(Method::DELETE, "/api/admin/products/abc", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_malformed_json_bodies_use_error_shape() {
    let app = TestApp::new();

    let (status, body) = app
        .call(Method::POST, "/api/public/categories", Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(body["timestamp"].is_string());

    let id = app.create_category("Stationery").await;
    let (status, body) = app
        .add_product(
            id,
            json!({ "productName": "Pencil", "price": 1.5, "discount": 0.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/public/categories")
        .body(Body::from(r#"{"categoryName":"Stationery"}"#))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");

    let (_, listed) = app.call(Method::GET, "/api/public/products", None).await;
    assert_eq!(listed, json!({ "content": [] }));
}

#[tokio::test]
async fn test_add_product_then_list_by_category() {
    let app = TestApp::new();
    let id = app.create_category("Audio Gear").await;

    let (status, created) = app
        .add_product(
            id,
            json!({
                "productName": "Headphones",
                "description": "Closed back",
                "quantity": 4,
                "price": 200.0,
                "discount": 15.0,
                "specialPrice": 1.0
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["image"], "default");
    assert_eq!(created["specialPrice"], 170.0);
    assert_eq!(created["categoryId"], id);

    let (status, listed) = app
        .call(
            Method::GET,
            &format!("/api/public/categories/{}/products", id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["content"], json!([created]));
}

#[tokio::test]
async fn test_add_product_to_missing_category() {
    let app = TestApp::new();
    let (status, body) = app.add_product(31337, product_body("Widget", 1.0, 0.0)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found with categoryId: 31337");
}

#[tokio::test]
async fn test_product_discount_out_of_range() {
    let app = TestApp::new();
    let id = app.create_category("Clearance").await;
    let (status, body) = app.add_product(id, product_body("Widget", 10.0, 150.0)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Discount must be between 0 and 100");
}

#[tokio::test]
async fn test_product_uniqueness_is_per_category() {
    let app = TestApp::new();
    let a = app.create_category("Category A").await;
    let b = app.create_category("Category B").await;

    let (status, _) = app.add_product(a, product_body("Widget", 5.0, 0.0)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.add_product(a, product_body("Widget", 6.0, 0.0)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.add_product(b, product_body("Widget", 5.0, 0.0)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, all) = app.call(Method::GET, "/api/public/products", None).await;
    assert_eq!(names(&all), vec!["Widget", "Widget"]);
}

#[tokio::test]
async fn test_products_by_category_sorted_by_price() {
    let app = TestApp::new();
    let id = app.create_category("Stationery").await;
    for (name, price) in [("Notebook", 4.5), ("Fountain Pen", 60.0), ("Eraser", 0.5)] {
        let (status, _) = app.add_product(id, product_body(name, price, 0.0)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, listed) = app
        .call(
            Method::GET,
            &format!("/api/public/categories/{}/products", id),
            None,
        )
        .await;
    assert_eq!(names(&listed), vec!["Eraser", "Notebook", "Fountain Pen"]);

    let (status, _) = app
        .call(Method::GET, "/api/public/categories/4242/products", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_keyword_search_returns_ok() {
    let app = TestApp::new();
    let id = app.create_category("Gizmos and more").await;
    app.add_product(id, product_body("Widget", 5.0, 0.0)).await;
    app.add_product(id, product_body("Gadget", 5.0, 0.0)).await;

    let (status, found) = app
        .call(Method::GET, "/api/public/products/keyword/wid", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&found), vec!["Widget"]);

    let (status, found) = app
        .call(Method::GET, "/api/public/products/keyword/nothing", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!({ "content": [] }));
}

#[tokio::test]
async fn test_update_product() {
    let app = TestApp::new();
    let id = app.create_category("Furniture").await;
    let (_, created) = app.add_product(id, product_body("Chair", 100.0, 0.0)).await;
    let product_id = created["productId"].as_i64().unwrap();

    let (status, updated) = app
        .call(
            Method::PUT,
            &format!("/api/admin/products/{}", product_id),
            Some(product_body("Armchair", 250.0, 20.0)),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["productId"], product_id);
    assert_eq!(updated["productName"], "Armchair");
    assert_eq!(updated["specialPrice"], 200.0);
    assert_eq!(updated["image"], "default");

    let (status, _) = app
        .call(
            Method::PUT,
            "/api/admin/products/5555",
            Some(product_body("Armchair", 1.0, 0.0)),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_product_and_category() {
    let app = TestApp::new();
    let id = app.create_category("Seasonal").await;
    let (_, created) = app.add_product(id, product_body("Snow Shovel", 25.0, 0.0)).await;
    let product_id = created["productId"].as_i64().unwrap();

    // 仍有商品时不能删除分类
    let (status, body) = app
        .call(Method::DELETE, &format!("/api/admin/categories/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");

    let (status, deleted) = app
        .call(
            Method::DELETE,
            &format!("/api/admin/products/{}", product_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, created);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/admin/products/{}", product_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = app
        .call(
            Method::GET,
            &format!("/api/public/categories/{}/products", id),
            None,
        )
        .await;
    assert_eq!(listed, json!({ "content": [] }));

    let (status, deleted) = app
        .call(Method::DELETE, &format!("/api/admin/categories/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["categoryName"], "Seasonal");

    let (_, categories) = app.call(Method::GET, "/api/public/categories", None).await;
    assert_eq!(categories, json!({ "content": [] }));
}

#[tokio::test]
async fn test_update_product_image() {
    let app = TestApp::new();
    let id = app.create_category("Footwear").await;
    let (_, created) = app.add_product(id, product_body("Sneaker", 90.0, 10.0)).await;
    let product_id = created["productId"].as_i64().unwrap();
    let uri = format!("/api/product/{}/image", product_id);

    let (status, updated) = app.upload(&uri, "image", "sneaker.png", b"\x89PNG").await;
    assert_eq!(status, StatusCode::OK);
    let image = updated["image"].as_str().unwrap();
    assert_ne!(image, "default");
    assert!(image.ends_with(".png"));
    assert_eq!(updated["specialPrice"], created["specialPrice"]);
    assert!(app.images.path().join(image).exists());

    let (status, _) = app.upload(&uri, "document", "notes.txt", b"hello").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .upload("/api/product/8080/image", "image", "sneaker.png", b"\x89PNG")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_image_is_payload_too_large() {
    let mut config = Config::default();
    config.storage.max_upload_bytes = 64;
    let app = TestApp::with_config(config);

    let (status, body) = app
        .upload("/api/product/1/image", "image", "huge.png", &[0u8; 4096])
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "PAYLOAD_TOO_LARGE");
    assert_eq!(body["code"], 413);
    assert_eq!(std::fs::read_dir(app.images.path()).unwrap().count(), 0);
}
