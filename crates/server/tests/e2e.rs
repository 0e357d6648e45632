use std::net::SocketAddr;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::appointments::Appointment;
use tokio::net::TcpListener;
use uuid::Uuid;

use configs::AppConfig;

struct TestApp {
    base_url: String,
    dir: std::path::PathBuf,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Use isolated temp files per test run
    let dir = std::env::temp_dir().join(format!("server_e2e_{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join("config.json"), r#"{"stylists":["Diego","Jose Luís"]}"#).await?;

    let mut cfg = AppConfig::default();
    cfg.storage.data_file = dir.join("data").join("citas.json").to_string_lossy().into_owned();
    cfg.storage.salon_config = dir.join("config.json").to_string_lossy().into_owned();
    cfg.storage.frontend_dir = dir.join("frontend").to_string_lossy().into_owned();

    let app = server::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, dir })
}

#[tokio::test]
async fn e2e_booking_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let url = format!("{}/api/appointments", app.base_url);

    // Create
    let res = c.post(&url)
        .json(&json!({"nombre": "Marta", "telefono": "600 111 222", "fecha": "2024-07-01", "hora": "17:00"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created: Appointment = res.json().await?;
    assert_eq!(created.peluquero, "Diego");

    // Same slot, same stylist
    let res = c.post(&url)
        .json(&json!({"nombre": "Otra", "telefono": "600 333 444", "fecha": "2024-07-01", "hora": "17:00", "peluquero": "Diego"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    // Mark as paid
    let res = c.patch(format!("{}/{}", url, created.id))
        .json(&json!({"estado": "Pagado"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // List shows the update
    let listed: Vec<Appointment> = c.get(&url).query(&[("fecha", "2024-07-01")]).send().await?.json().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].estado, service::appointments::Estado::Pagado);

    // Delete, then it is gone
    let res = c.delete(format!("{}/{}", url, created.id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    let res = c.delete(format!("{}/{}", url, created.id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let _ = tokio::fs::remove_dir_all(&app.dir).await;
    Ok(())
}

#[tokio::test]
async fn e2e_cors_allows_any_origin() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::Client::new()
        .get(format!("{}/api/stylists", app.base_url))
        .header("Origin", "http://example.com")
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.headers().get("access-control-allow-origin").is_some());
    let _ = tokio::fs::remove_dir_all(&app.dir).await;
    Ok(())
}
