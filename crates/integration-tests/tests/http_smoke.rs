//! Smoke tests against a running server seeded with `qresto-cli seed demo`.
//!
//! Set `QRESTO_TEST_URL` to target something other than `http://localhost:3000`.
//! Some tests change the demo tenant and restore it, so run them with
//! `--test-threads=1`.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;

fn base_url() -> String {
    std::env::var("QRESTO_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

#[tokio::test]
#[ignore = "Requires running server: cargo run -p qresto-server"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server seeded with the demo tenant"]
async fn test_demo_menu_renders() {
    let resp = client()
        .get(format!("{}/el-faro", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Pizza"));
    assert!(body.contains("$8.500"));
    assert!(!body.contains("Sopa"));
}

#[tokio::test]
#[ignore = "Requires running server: cargo run -p qresto-server"]
async fn test_unknown_menu_is_not_found() {
    let resp = client()
        .get(format!("{}/no-existe", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("Menú no disponible"));
}

#[tokio::test]
#[ignore = "Requires running server: cargo run -p qresto-server"]
async fn test_dashboard_redirects_anonymous_to_login() {
    let resp = client()
        .get(format!("{}/dashboard", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/login");
}

#[tokio::test]
#[ignore = "Requires running server: cargo run -p qresto-server"]
async fn test_provisioning_api_requires_session() {
    let resp = client()
        .post(format!("{}/api/shops", base_url()))
        .json(&serde_json::json!({
            "name": "El Puerto",
            "slug": "el-puerto",
            "email": "duenio@elpuerto.com",
            "password": "puerto-2026",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

async fn login_as_owner(client: &reqwest::Client) -> reqwest::Response {
    client
        .post(format!("{}/login", base_url()))
        .form(&[("email", "duenio@elfaro.demo"), ("password", "elfaro-demo")])
        .send()
        .await
        .unwrap()
}

/// The 36-character uuid that follows the last `prefix` before `anchor`.
fn id_before(html: &str, anchor: &str, prefix: &str) -> String {
    let end = html.find(anchor).unwrap();
    let start = html[..end].rfind(prefix).unwrap() + prefix.len();
    html[start..start + 36].to_string()
}

/// The 36-character uuid that follows the first `prefix` after `anchor`.
fn id_after(html: &str, anchor: &str, prefix: &str) -> String {
    let from = html.find(anchor).unwrap();
    let start = from + html[from..].find(prefix).unwrap() + prefix.len();
    html[start..start + 36].to_string()
}

#[tokio::test]
#[ignore = "Requires running server seeded with the demo tenant"]
async fn test_owner_login_reaches_dashboard() {
    let client = client();
    let resp = login_as_owner(&client).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/dashboard");

    let resp = client
        .get(format!("{}/dashboard", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("El Faro"));
}

#[tokio::test]
#[ignore = "Requires running server seeded with the demo tenant"]
async fn test_category_with_products_cannot_be_deleted() {
    let client = client();
    login_as_owner(&client).await;

    let page = client
        .get(format!("{}/dashboard/categories", base_url()))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let platos = id_before(&page, "<span>Platos</span>", "id=\"category-");

    let resp = client
        .delete(format!("{}/dashboard/categories/{platos}", base_url()))
        .header("HX-Request", "true")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(
        resp.text().await.unwrap(),
        "No se puede eliminar una categoría con productos"
    );

    let page = client
        .get(format!("{}/dashboard/categories", base_url()))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("<span>Platos</span>"));
}

#[tokio::test]
#[ignore = "Requires running server seeded with the demo tenant"]
async fn test_hiding_product_persists_to_public_menu() {
    let client = client();
    login_as_owner(&client).await;

    let page = client
        .get(format!("{}/dashboard/products", base_url()))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    let pizza = id_after(&page, "<td>Pizza</td>", "data-visibility=\"/dashboard/products/");
    let toggle = |visible: bool| {
        client
            .post(format!("{}/dashboard/products/{pizza}/visibility", base_url()))
            .header("Accept", "application/json")
            .json(&serde_json::json!({ "visible": visible }))
            .send()
    };

    let resp = toggle(false).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["is_visible"], false);

    let menu = reqwest::get(format!("{}/el-faro", base_url()))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(menu.contains("Este restaurante todavía no cargó su menú."));
    assert!(!menu.contains("$8.500"));

    let resp = toggle(true).await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["is_visible"], true);
}
