use actix_web::{web, HttpResponse, Responder};

use crate::state::AppState;

/// 启动时传入的进程名，运行期间不变
#[derive(Debug, Clone)]
pub struct MonitoredProcesses(pub Vec<String>);

pub async fn list_processes(
    data: web::Data<AppState>,
    processes: web::Data<MonitoredProcesses>,
) -> impl Responder {
    let list = data.metrics.process_views(&processes.0);
    HttpResponse::Ok().json(list)
}
