use actix_web::{web, HttpResponse, Responder};

use crate::state::AppState;

/// 只读：渲染当前所有已注册的序列，不触发采集
pub async fn get_metrics(data: web::Data<AppState>) -> impl Responder {
    match data.metrics.render() {
        Ok(metrics_text) => HttpResponse::Ok()
            .content_type(prometheus::TEXT_FORMAT)
            .body(metrics_text),
        Err(e) => {
            log::error!("Failed to render metrics: {:#}", e);
            HttpResponse::InternalServerError().body("Failed to render metrics")
        }
    }
}
