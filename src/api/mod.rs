pub mod metrics;
pub mod processes;

pub use metrics::get_metrics;
pub use processes::{list_processes, MonitoredProcesses};

use actix_web::{web, HttpResponse, Responder};

/// 只说明 HTTP 服务可用，不反映被监控进程是否存在
pub async fn health(processes: web::Data<MonitoredProcesses>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "monitored": processes.0.len(),
    }))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", web::get().to(get_metrics))
        .route("/api/process/list", web::get().to(list_processes))
        .route("/health", web::get().to(health));
}
