// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 启动 Prometheus 导出器并登记指标说明
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.listen_address.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", settings.listen_address, e);
            return;
        }
    };

    // 端口被占用时只告警，不影响抓取
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_counter!("serpdiff_runs_total", "Finished runs by terminal status");
    describe_counter!("serpdiff_results_total", "Saved results by extraction status");
    describe_counter!("serpdiff_differences_total", "Saved differences by change flag");
    describe_histogram!(
        "serpdiff_fetch_duration_seconds",
        Unit::Seconds,
        "Page fetch duration by strategy"
    );

    info!("Metrics exporter listening on {}", addr);
}
