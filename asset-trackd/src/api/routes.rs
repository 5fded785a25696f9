use std::sync::Arc;
use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, FromRef, Multipart, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use chrono::Utc;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use shared::protocol::{
    view_path, FORM_QR_FILE, FORM_UNIQUE_ID, HEALTH_PATH, HOME_PATH, INSPECT_PREFIX,
    INSTALL_PREFIX, SCAN_PATH, VIEW_PREFIX,
};
use crate::config::Config;
use crate::lifecycle::{inspect_update, install_update};
use crate::scanner::{self, OpenCamera, ScanOutcome};
use crate::store_manager::StoreHandle;
use super::error::AppError;
use super::flash::{self, Notice};
use super::pages;
use super::record_view::RecordView;

/// Uploaded QR photos from phones routinely exceed axum's 2 MiB default
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Everything a handler needs, built once in `main` and cloned per request
#[derive(Clone)]
pub struct AppState {
    pub store: StoreHandle,
    pub config: Arc<Config>,
    pub key: Key,
    /// Parent of every live-scan token; cancelled on server shutdown
    pub shutdown: CancellationToken,
    /// Frame source for `/scan_qr`, normally [`scanner::open_camera`]
    pub camera: Arc<OpenCamera>,
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}

#[derive(Deserialize)]
pub struct InspectForm {
    #[serde(default)]
    pub health: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(HOME_PATH, get(home).post(lookup))
        .route(SCAN_PATH, get(scan_qr))
        .route(&format!("{VIEW_PREFIX}/:unique_id"), get(view_record))
        .route(&format!("{INSTALL_PREFIX}/:unique_id"), post(install))
        .route(&format!("{INSPECT_PREFIX}/:unique_id"), get(inspect_form).post(inspect))
        .route(HEALTH_PATH, get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn home(jar: SignedCookieJar) -> (SignedCookieJar, Html<String>) {
    let (jar, notices) = flash::take(jar);
    (jar, Html(pages::home(&notices)))
}

/// Manual ID and/or uploaded QR image. A decoded QR wins over the typed ID.
async fn lookup(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut unique_id: Option<String> = None;
    let mut upload: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FORM_UNIQUE_ID) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                unique_id = Some(text).filter(|id| !id.is_empty());
            }
            Some(FORM_QR_FILE) => {
                let named = field.file_name().is_some_and(|name| !name.is_empty());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                if named && !bytes.is_empty() {
                    upload = Some(bytes);
                }
            }
            _ => {}
        }
    }

    if let Some(bytes) = upload {
        match decode_upload(bytes).await? {
            Some(payload) => {
                tracing::info!("Decoded QR from upload: {}", payload);
                unique_id = Some(payload);
            }
            None if unique_id.is_none() => {
                return Ok(redirect_with(jar, Notice::NoQr, HOME_PATH));
            }
            None => {}
        }
    }

    match unique_id {
        Some(unique_id) => resolve(&state, jar, unique_id, Notice::NoRecord).await,
        None => Ok(home(jar).await.into_response()),
    }
}

async fn decode_upload(bytes: Bytes) -> Result<Option<String>, AppError> {
    let result = tokio::task::spawn_blocking(move || scanner::decode_image_bytes(&bytes))
        .await
        .context("QR decode task failed")?;

    match result {
        Ok(payload) => Ok(payload),
        Err(e) => {
            tracing::warn!("Uploaded file could not be decoded: {}", e);
            Ok(None)
        }
    }
}

/// Live camera scan. Runs on the blocking pool until a code is read, the scan
/// times out, or the request goes away.
async fn scan_qr(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let cancel = state.shutdown.child_token();
    // Fires if this future is dropped, e.g. the client disconnects mid-scan
    let _guard = cancel.clone().drop_guard();

    let scanner_config = state.config.scanner.clone();
    let open = state.camera.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        scanner::scan_camera(&*open, &scanner_config, &cancel)
    })
    .await
    .context("Camera scan task failed")?;

    match outcome {
        Ok(ScanOutcome::Decoded(unique_id)) => {
            tracing::info!("Decoded QR from camera: {}", unique_id);
            resolve(&state, jar, unique_id, Notice::NoRecordForQr).await
        }
        Ok(other) => {
            tracing::info!("Camera scan ended without a code: {:?}", other);
            Ok(redirect_with(jar, Notice::NoQr, HOME_PATH))
        }
        Err(e) => {
            tracing::warn!("Camera scan failed: {}", e);
            Ok(redirect_with(jar, Notice::NoQr, HOME_PATH))
        }
    }
}

/// Redirect to the record if it exists, otherwise home with `missing`
async fn resolve(
    state: &AppState,
    jar: SignedCookieJar,
    unique_id: String,
    missing: Notice,
) -> Result<Response, AppError> {
    if state.store.find(unique_id.clone()).await?.is_some() {
        Ok(Redirect::to(&view_path(&unique_id)).into_response())
    } else {
        tracing::info!("No record for {:?}", unique_id);
        Ok(redirect_with(jar, missing, HOME_PATH))
    }
}

async fn view_record(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let Some(record) = state.store.find(unique_id).await? else {
        return Ok(redirect_with(jar, Notice::RecordNotFound, HOME_PATH));
    };

    let view = RecordView::new(&record, Utc::now())
        .with_context(|| format!("Record {:?} has a malformed date", record.unique_id))?;

    let (jar, notices) = flash::take(jar);
    Ok((jar, Html(pages::view(&notices, &view))).into_response())
}

/// No existence check: installing an unknown ID touches nothing and still
/// lands on its view page, which reports it missing.
async fn install(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let touched = state
        .store
        .update(unique_id.clone(), install_update(Utc::now()))
        .await?;
    tracing::info!("Install recorded for {:?} ({} updated)", unique_id, touched);

    Ok(redirect_with(jar, Notice::Installed, &view_path(&unique_id)))
}

async fn inspect_form(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
    jar: SignedCookieJar,
) -> Result<Response, AppError> {
    let Some(record) = state.store.find(unique_id).await? else {
        return Ok(redirect_with(jar, Notice::RecordNotFound, HOME_PATH));
    };

    let (jar, notices) = flash::take(jar);
    Ok((jar, Html(pages::inspect(&notices, &record))).into_response())
}

async fn inspect(
    State(state): State<AppState>,
    Path(unique_id): Path<String>,
    jar: SignedCookieJar,
    Form(form): Form<InspectForm>,
) -> Result<Response, AppError> {
    if state.store.find(unique_id.clone()).await?.is_none() {
        return Ok(redirect_with(jar, Notice::RecordNotFound, HOME_PATH));
    }

    state
        .store
        .update(unique_id.clone(), inspect_update(&form.health, Utc::now()))
        .await?;
    tracing::info!("Inspection recorded for {:?}: {:?}", unique_id, form.health);

    Ok(redirect_with(jar, Notice::Inspected, &view_path(&unique_id)))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn redirect_with(jar: SignedCookieJar, notice: Notice, to: &str) -> Response {
    (flash::push(jar, notice), Redirect::to(to)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::{DateTime, Duration, FixedOffset};
    use http_body_util::BodyExt;
    use shared::dates::parse_date;
    use shared::types::AssetRecord;
    use tower::ServiceExt;
    use crate::config::ScannerConfig;
    use crate::scanner::camera::FrameSource;
    use crate::scanner::decode::tests::{png_bytes, qr_frame};
    use crate::scanner::ScanError;
    use image::GrayImage;
    use std::collections::VecDeque;
    use crate::store::db::AssetDb;

    const BOUNDARY: &str = "asset-track-test-boundary";

    fn abc123() -> AssetRecord {
        AssetRecord {
            unique_id: "ABC123".to_string(),
            dom: Some("2020-03-01T00:00:00".to_string()),
            expiry_date: Some("2021-03-01T00:00:00Z".to_string()),
            warranty_date: Some("2099-03-01T00:00:00Z".to_string()),
            ..AssetRecord::default()
        }
    }

    fn test_app(records: &[AssetRecord]) -> (Router, StoreHandle) {
        test_app_with_camera(records, Arc::new(scanner::open_camera))
    }

    fn test_app_with_camera(
        records: &[AssetRecord],
        camera: Arc<OpenCamera>,
    ) -> (Router, StoreHandle) {
        let db = AssetDb::open(":memory:").unwrap();
        for record in records {
            db.insert_record(record).unwrap();
        }
        let store = StoreHandle::spawn(db);
        let state = AppState {
            store: store.clone(),
            config: Arc::new(Config::default()),
            key: flash::signing_key("test-secret"),
            shutdown: CancellationToken::new(),
            camera,
        };
        (router(state), store)
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// (name, filename, content)
    fn post_multipart(parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, filename, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: image/png\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::post("/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// `notice=<signed value>` from a response that queued a notice
    fn notice_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with("notice=") && pair.len() > "notice=".len())
            .map(str::to_string)
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    /// Follow a redirect that carried a notice and return the rendered page
    async fn follow(app: &Router, response: Response) -> String {
        let cookie = notice_cookie(&response).expect("redirect should queue a notice");
        let page = send(app, get(location(&response), Some(&cookie))).await;
        assert_eq!(page.status(), StatusCode::OK);
        body_text(page).await
    }

    struct Frames(VecDeque<GrayImage>);

    impl FrameSource for Frames {
        fn next_frame(&mut self) -> Result<Option<GrayImage>, ScanError> {
            Ok(self.0.pop_front())
        }
    }

    /// A camera that shows each frame once, then stops
    fn camera_showing(frames: fn() -> Vec<GrayImage>) -> Arc<OpenCamera> {
        Arc::new(move |_: &ScannerConfig| -> Result<Box<dyn FrameSource>, ScanError> {
            Ok(Box::new(Frames(frames().into())))
        })
    }

    fn assert_close(actual: DateTime<FixedOffset>, expected: DateTime<Utc>) {
        let drift = (actual.with_timezone(&Utc) - expected).num_milliseconds().abs();
        assert!(drift < 5_000, "{actual} not within tolerance of {expected}");
    }

    #[tokio::test]
    async fn test_lookup_existing_redirects_to_view() {
        let (app, _) = test_app(&[abc123()]);

        let response = send(&app, post_multipart(&[("unique_id", None, b"ABC123")])).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/view/ABC123");
    }

    #[tokio::test]
    async fn test_lookup_missing_redirects_home_with_notice() {
        let (app, _) = test_app(&[abc123()]);

        let response = send(&app, post_multipart(&[("unique_id", None, b"NOPE")])).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let page = follow(&app, response).await;
        assert!(page.contains("No record found."));
        assert!(page.contains("notice-danger"));
    }

    #[tokio::test]
    async fn test_notice_shown_once() {
        let (app, _) = test_app(&[]);

        let response = send(&app, post_multipart(&[("unique_id", None, b"NOPE")])).await;
        let cookie = notice_cookie(&response).unwrap();

        let first = send(&app, get("/", Some(&cookie))).await;
        let removal = first
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.starts_with("notice=;") || v.starts_with("notice=\"\""));
        assert!(removal, "Rendering the notice should clear the cookie");
        assert!(body_text(first).await.contains("No record found."));
    }

    #[tokio::test]
    async fn test_tampered_notice_ignored() {
        let (app, _) = test_app(&[]);

        let page = send(&app, get("/", Some("notice=no-record"))).await;
        assert_eq!(page.status(), StatusCode::OK);
        assert!(!body_text(page).await.contains("No record found."));
    }

    #[tokio::test]
    async fn test_uploaded_qr_takes_precedence() {
        let (app, _) = test_app(&[abc123()]);
        let png = png_bytes(qr_frame("ABC123"));

        let response = send(
            &app,
            post_multipart(&[
                ("unique_id", None, b"NOPE"),
                ("qr_file", Some("qr.png"), &png),
            ]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/view/ABC123");
    }

    #[tokio::test]
    async fn test_upload_without_code_falls_back_to_typed_id() {
        let (app, _) = test_app(&[abc123()]);
        let blank = png_bytes(image::GrayImage::from_pixel(120, 120, image::Luma([255])));

        let response = send(
            &app,
            post_multipart(&[
                ("unique_id", None, b"ABC123"),
                ("qr_file", Some("blank.png"), &blank),
            ]),
        )
        .await;
        assert_eq!(location(&response), "/view/ABC123");
    }

    #[tokio::test]
    async fn test_upload_without_code_and_no_id() {
        let (app, _) = test_app(&[abc123()]);

        let response = send(
            &app,
            post_multipart(&[
                ("unique_id", None, b""),
                ("qr_file", Some("notes.txt"), b"not an image"),
            ]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        assert!(follow(&app, response).await.contains("No QR detected."));
    }

    #[tokio::test]
    async fn test_empty_submission_renders_home() {
        let (app, _) = test_app(&[]);

        let response = send(
            &app,
            post_multipart(&[("unique_id", None, b""), ("qr_file", Some(""), b"")]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Find an asset"));
    }

    #[tokio::test]
    async fn test_view_renders_dates_and_flags() {
        let (app, _) = test_app(&[abc123()]);

        let response = send(&app, get("/view/ABC123", None)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let page = body_text(response).await;
        assert!(page.contains("<td>2020-03-01</td>"));
        assert!(page.contains("<td>N/A</td>"), "Missing DOI renders as N/A");
        assert!(page.contains("Expired"));
        assert!(page.contains("Under warranty"));
    }

    #[tokio::test]
    async fn test_view_missing_record() {
        let (app, _) = test_app(&[]);

        let response = send(&app, get("/view/NOPE", None)).await;
        assert_eq!(location(&response), "/");
        assert!(follow(&app, response).await.contains("Record not found."));
    }

    #[tokio::test]
    async fn test_view_malformed_date_is_server_error() {
        let mut record = abc123();
        record.expiry_date = Some("whenever".to_string());
        let (app, _) = test_app(&[record]);

        let response = send(&app, get("/view/ABC123", None)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_install_sets_dates() {
        let (app, store) = test_app(&[abc123()]);
        let before = Utc::now();

        let response = send(&app, Request::post("/install/ABC123").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/view/ABC123");

        let record = store.find("ABC123".to_string()).await.unwrap().unwrap();
        let doi = parse_date(record.doi.as_deref().unwrap()).unwrap();
        let next = parse_date(record.next_inspection_date.as_deref().unwrap()).unwrap();
        assert_close(doi, before);
        assert_eq!(next - doi, Duration::days(182));
        assert_eq!(record.expiry_date, abc123().expiry_date);

        let page = follow(&app, response).await;
        assert!(page.contains("Installation marked complete. Next inspection scheduled."));
    }

    #[tokio::test]
    async fn test_install_twice_overwrites() {
        let (app, store) = test_app(&[abc123()]);

        send(&app, Request::post("/install/ABC123").body(Body::empty()).unwrap()).await;
        let first = store.find("ABC123".to_string()).await.unwrap().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        send(&app, Request::post("/install/ABC123").body(Body::empty()).unwrap()).await;
        let second = store.find("ABC123".to_string()).await.unwrap().unwrap();

        let first_doi = parse_date(first.doi.as_deref().unwrap()).unwrap();
        let second_doi = parse_date(second.doi.as_deref().unwrap()).unwrap();
        let second_next = parse_date(second.next_inspection_date.as_deref().unwrap()).unwrap();
        assert!(second_doi > first_doi);
        assert_eq!(second_next - second_doi, Duration::days(182));
    }

    #[tokio::test]
    async fn test_install_unknown_id_is_silent() {
        let (app, store) = test_app(&[]);

        let response = send(&app, Request::post("/install/GHOST").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/view/GHOST");
        assert!(store.find("GHOST".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inspect_updates_health_and_schedule() {
        let mut record = abc123();
        record.doi = Some("2022-01-01T00:00:00+00:00".to_string());
        let (app, store) = test_app(&[record.clone()]);
        let before = Utc::now();

        let response = send(&app, post_form("/inspect/ABC123", "health=Good")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/view/ABC123");

        let updated = store.find("ABC123".to_string()).await.unwrap().unwrap();
        assert_eq!(updated.health.as_deref(), Some("Good"));
        let last = parse_date(updated.last_inspection_date.as_deref().unwrap()).unwrap();
        let next = parse_date(updated.next_inspection_date.as_deref().unwrap()).unwrap();
        assert_close(last, before);
        assert_eq!(next - last, Duration::days(182));
        assert_eq!(updated.doi, record.doi);
        assert_eq!(updated.expiry_date, record.expiry_date);

        assert!(follow(&app, response).await.contains("Inspection updated successfully."));
    }

    #[tokio::test]
    async fn test_inspect_form_page() {
        let mut record = abc123();
        record.health = Some("Needs Service".to_string());
        let (app, _) = test_app(&[record]);

        let response = send(&app, get("/inspect/ABC123", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("value=\"Needs Service\""));
    }

    #[tokio::test]
    async fn test_inspect_missing_record() {
        let (app, store) = test_app(&[]);

        let response = send(&app, get("/inspect/NOPE", None)).await;
        assert_eq!(location(&response), "/");

        let response = send(&app, post_form("/inspect/NOPE", "health=Good")).await;
        assert_eq!(location(&response), "/");
        assert!(follow(&app, response).await.contains("Record not found."));
        assert!(store.find("NOPE".to_string()).await.unwrap().is_none());
    }

    #[cfg(not(feature = "camera"))]
    #[tokio::test]
    async fn test_scan_without_camera_reports_no_detection() {
        let (app, _) = test_app(&[abc123()]);

        let response = send(&app, get("/scan_qr", None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let page = follow(&app, response).await;
        assert!(page.contains("No QR detected."));
        assert!(page.contains("notice-warning"));
    }

    #[tokio::test]
    async fn test_scan_decodes_known_record() {
        let camera = camera_showing(|| {
            vec![GrayImage::from_pixel(64, 64, image::Luma([255])), qr_frame("ABC123")]
        });
        let (app, _) = test_app_with_camera(&[abc123()], camera);

        let response = send(&app, get("/scan_qr", None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/view/ABC123");
        assert!(notice_cookie(&response).is_none());
    }

    #[tokio::test]
    async fn test_scan_decodes_unknown_record() {
        let (app, _) = test_app_with_camera(&[abc123()], camera_showing(|| vec![qr_frame("NOPE")]));

        let response = send(&app, get("/scan_qr", None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let page = follow(&app, response).await;
        assert!(page.contains("No record found for this QR."));
        assert!(page.contains("notice-danger"));
    }

    #[tokio::test]
    async fn test_scan_stream_ends_without_code() {
        let camera = camera_showing(|| vec![GrayImage::from_pixel(64, 64, image::Luma([255]))]);
        let (app, _) = test_app_with_camera(&[abc123()], camera);

        let response = send(&app, get("/scan_qr", None)).await;
        assert_eq!(location(&response), "/");
        assert!(follow(&app, response).await.contains("No QR detected."));
    }

    #[tokio::test]
    async fn test_install_unknown_id_shows_both_notices() {
        let (app, _) = test_app(&[]);

        let installed = send(&app, Request::post("/install/GHOST").body(Body::empty()).unwrap()).await;
        let cookie = notice_cookie(&installed).unwrap();

        let view = send(&app, get(location(&installed), Some(&cookie))).await;
        assert_eq!(view.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&view), "/");

        let page = follow(&app, view).await;
        let success = page.find("Installation marked complete.").unwrap();
        let missing = page.find("Record not found.").unwrap();
        assert!(success < missing, "Notices render oldest first");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _) = test_app(&[]);

        let response = send(&app, get("/health", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, r#"{"status":"ok"}"#);
    }
}
