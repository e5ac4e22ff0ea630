//! Stub REST backend served on an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;

use actix_web::http::header;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

pub const GOOD_TOKEN: &str = "good-token";

fn authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {GOOD_TOKEN}"))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(json!({"message": "Unauthorized"}))
}

fn page(data: Vec<Value>, params: &HashMap<String, String>) -> HttpResponse {
    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(10);
    let total = data.len();
    let data: Vec<Value> = data.into_iter().take(limit).collect();
    HttpResponse::Ok().json(json!({
        "message": "ok",
        "data": data,
        "pagination": {
            "page": 1,
            "limit": limit,
            "totalItems": total,
            "totalPages": total.div_ceil(limit.max(1)),
            "hasNextPage": total > limit,
            "hasPrevPage": false,
        }
    }))
}

pub fn contexts() -> Vec<Value> {
    vec![
        json!({
            "id": "ctx-1",
            "name": "Operational 2025",
            "code": "OPS_2025",
            "periodStart": 2024,
            "periodEnd": 2025,
            "matrixSize": 5,
            "riskAppetiteLevel": "LOW",
            "isActive": true,
            "_count": {"riskCategories": 3, "riskMatrices": 1}
        }),
        json!({
            "id": "ctx-2",
            "name": "Strategic Plan",
            "code": "STRAT_2027",
            "periodStart": 2026,
            "periodEnd": 2027,
            "matrixSize": 4,
            "riskAppetiteLevel": "HIGH",
            "isActive": false
        }),
    ]
}

pub fn users() -> Vec<Value> {
    vec![
        json!({"id": "u-1", "username": "ana", "name": "Ana Putri", "email": "ana@example.com",
               "isActive": true, "isVerified": true, "roles": ["admin"]}),
        json!({"id": "u-2", "username": "budi", "name": "Budi Santoso", "email": "budi@example.com",
               "isActive": false, "isVerified": false, "roles": ["viewer"]}),
    ]
}

async fn list_contexts(
    req: HttpRequest,
    params: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    if !authorized(&req) {
        return unauthorized();
    }
    let data = contexts()
        .into_iter()
        .filter(|item| match params.get("isActive") {
            Some(flag) => item["isActive"]
                .as_bool()
                .is_some_and(|active| active.to_string() == *flag),
            None => true,
        })
        .collect();
    page(data, &params)
}

async fn list_users(req: HttpRequest, params: web::Query<HashMap<String, String>>) -> HttpResponse {
    if !authorized(&req) {
        return unauthorized();
    }
    let data = users()
        .into_iter()
        .filter(|item| match params.get("role") {
            Some(role) => item["roles"]
                .as_array()
                .is_some_and(|roles| roles.iter().any(|r| *r == role.as_str())),
            None => true,
        })
        .collect();
    page(data, &params)
}

async fn patch_context(
    req: HttpRequest,
    id: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    if !authorized(&req) {
        return unauthorized();
    }
    if body["code"] == "TAKEN" {
        return HttpResponse::Conflict().json(json!({"message": "Code already exists"}));
    }
    if body["name"] == "Boom" {
        return HttpResponse::InternalServerError().finish();
    }
    let mut updated = json!({"id": id.into_inner()});
    if let (Some(target), Some(fields)) = (updated.as_object_mut(), body.as_object()) {
        target.extend(fields.clone());
    }
    HttpResponse::Ok().json(json!({"message": "updated", "data": updated}))
}

/// Starts the stub and returns its base URL.
pub fn spawn_backend() -> String {
    let server = HttpServer::new(|| {
        App::new()
            .route("/api/konteks", web::get().to(list_contexts))
            .route("/api/konteks/{id}", web::patch().to(patch_context))
            .route("/api/users", web::get().to(list_users))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("bind stub backend");

    let addr: SocketAddr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}/api")
}
