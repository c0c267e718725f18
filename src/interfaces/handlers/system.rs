use std::{collections::BTreeMap, time::Duration};

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use humantime::format_duration;
use serde::Serialize;

use crate::{constants::START_TIME, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
    uptime: String,
    databases: BTreeMap<&'static str, &'static str>,
    mailer: &'static str,
}

/// Liveness plus per-store connectivity. Always 200; a missing or
/// unreachable store only degrades the reported status.
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now_utc = Utc::now();
    let uptime = now_utc.signed_duration_since(*START_TIME);
    let human_uptime = format_duration(Duration::from_secs(uptime.num_seconds().max(0) as u64));

    let (backend, store_status) = match &state.store {
        Some(store) => match store.check_connection().await {
            Ok(()) => (store.backend(), "connected"),
            Err(e) => {
                tracing::warn!("Health check could not reach the store: {}", e);
                (store.backend(), "disconnected")
            }
        },
        None => (state.storage_backend, "not configured"),
    };

    let mut databases = BTreeMap::new();
    databases.insert(backend.as_str(), store_status);

    HttpResponse::Ok().json(HealthCheckResponse {
        status: if store_status == "connected" { "OK" } else { "DEGRADED" },
        version: env!("CARGO_PKG_VERSION"),
        timestamp: now_utc.to_rfc3339(),
        uptime: human_uptime.to_string(),
        databases,
        mailer: if state.mailer_configured { "configured" } else { "not configured" },
    })
}
