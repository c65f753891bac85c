#![allow(unused)]

use actix_http::{
    body::MessageBody,
    header::CONTENT_TYPE,
    Method, Request,
};
use actix_web::{
    dev::{Service, ServiceResponse},
    test::{call_service, read_body, TestRequest},
};
use anyhow::Result;
use kontrakanku::{auth::ROLE_HEADER, setting::Setting, AppState};
use migration::{Migrator, MigratorTrait};
use serde_json::Value;
use tempfile::TempDir;

/// App state over a fresh in-memory database and a temporary upload dir.
/// Keep the dir alive for the duration of the test.
pub async fn create_test_state() -> Result<(AppState, TempDir)> {
    let dir = tempfile::tempdir()?;
    let mut setting = Setting::default();
    setting.db_url = "sqlite::memory:".to_owned();
    // every connection to sqlite::memory: opens its own database
    setting.db_pool_size = Some(1);
    setting.upload.dir = dir.path().to_path_buf();
    let state = AppState::from_setting(setting).await?;
    Migrator::fresh(state.service.db()).await?;
    Ok((state, dir))
}

const BOUNDARY: &str = "----kontrakanku-test-boundary";

/// multipart/form-data body builder
#[derive(Debug, Default)]
pub struct Form {
    body: Vec<u8>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name, filename
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn request(mut self, method: Method, path: &str) -> TestRequest {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        TestRequest::with_uri(path)
            .method(method)
            .insert_header((
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(self.body)
    }

    pub fn post(self, path: &str) -> TestRequest {
        self.request(Method::POST, path)
    }

    pub fn put(self, path: &str) -> TestRequest {
        self.request(Method::PUT, path)
    }
}

pub fn get(path: &str) -> TestRequest {
    TestRequest::with_uri(path)
}

pub fn delete(path: &str) -> TestRequest {
    TestRequest::with_uri(path).method(Method::DELETE)
}

pub fn demo(req: TestRequest) -> TestRequest {
    req.insert_header((ROLE_HEADER, "demo"))
}

/// Send a request and decode the json body, `Null` for non json bodies.
pub async fn call<S, B>(app: &S, req: TestRequest) -> Result<(Value, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = call_service(app, req.to_request()).await;
    let status = res.status().as_u16();
    let body = read_body(res).await;
    let val = serde_json::from_slice(&body).unwrap_or(Value::Null);
    Ok((val, status))
}

/// Send a request and return the raw body.
pub async fn call_raw<S, B>(app: &S, req: TestRequest) -> Result<(Vec<u8>, u16)>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = call_service(app, req.to_request()).await;
    let status = res.status().as_u16();
    Ok((read_body(res).await.to_vec(), status))
}
