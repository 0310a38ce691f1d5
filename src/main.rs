use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use std::time::Duration;

mod api;
mod cli;
mod error;
mod metrics;
mod models;
mod services;
mod state;

use api::MonitoredProcesses;
use cli::CommandArgs;
use metrics::MetricsRegistry;
use services::{Reporter, SysinfoResolver, SysinfoSampler, UpdateScheduler};
use state::new_state;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 日志和控制台打印输出到同一个流
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let args = CommandArgs::parse();
    let bind_address = format!("{}:{}", args.address, args.port);
    let names = args.process_names();
    let interval = Duration::from_secs(args.interval);

    let metrics = MetricsRegistry::new()
        .and_then(MetricsRegistry::with_self_metrics)
        .context("failed to register metrics")?;
    let state = new_state(metrics);

    let scheduler = UpdateScheduler::new(
        names.clone(),
        interval,
        args.on_sample_error,
        Box::new(SysinfoResolver::new()),
        Box::new(SysinfoSampler::new()),
        state.clone(),
    );
    let reporter = Reporter::new(state.clone(), args.internal_prefix.clone(), interval);

    let processes = MonitoredProcesses(names);
    let server = HttpServer::new({
        let state = state.clone();
        move || {
            App::new()
                .app_data(web::Data::new(state.clone()))
                .app_data(web::Data::new(processes.clone()))
                .configure(api::routes)
        }
    })
    .bind(&bind_address)
    .map_err(|e| {
        log::error!("Error starting HTTP server on {}: {}", bind_address, e);
        e
    })
    .with_context(|| format!("failed to bind {}", bind_address))?;

    print_banner(&args);

    actix_rt::spawn(scheduler.run());
    actix_rt::spawn(reporter.run());

    server.run().await.context("HTTP server terminated")?;
    Ok(())
}

fn print_banner(args: &CommandArgs) {
    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║      Procstat Exporter v{:<34}║", env!("CARGO_PKG_VERSION"));
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();
    println!("🚀 Server starting on http://{}:{}", args.address, args.port);
    println!();
    println!("📋 Available endpoints:");
    println!("  GET    /metrics                - Prometheus metrics");
    println!("  GET    /api/process/list       - Monitored processes");
    println!("  GET    /health                 - Health check");
    println!();
    println!("🔍 Monitoring: {}", args.process_names().join(", "));
    println!("⏱  Interval: {}s, on sample error: {:?}", args.interval, args.on_sample_error);
    println!("═══════════════════════════════════════════════════════════");
}
