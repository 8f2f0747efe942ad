// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::settings::MetricsSettings;

/// 初始化指标系统
///
/// 未启用时不安装导出器，记录宏退化为空操作
pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        return;
    }

    let addr: SocketAddr = match settings.listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics listen address {}: {}", settings.listen_addr, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    describe_counter!("scans_started_total", "Total number of scans started");
    describe_counter!(
        "scans_completed_total",
        "Total number of scans finished, labelled by final status"
    );
    describe_histogram!(
        "scan_detection_duration_seconds",
        "Duration of ingredient detection in seconds"
    );
    describe_histogram!(
        "recipe_request_duration_seconds",
        "Duration of recipe requests in seconds"
    );
    describe_counter!("recipes_generated_total", "Total number of recipes returned");
    describe_counter!(
        "recipe_request_failures_total",
        "Total number of recipe requests that failed"
    );

    info!("Metrics exporter listening on {}", addr);
}

pub fn record_scan_started() {
    counter!("scans_started_total").increment(1);
}

/// 记录一次扫描的识别结果
pub fn record_scan_completed(status: &str, elapsed: Duration) {
    counter!("scans_completed_total", "status" => status.to_string()).increment(1);
    histogram!("scan_detection_duration_seconds").record(elapsed.as_secs_f64());
}

/// 记录一次菜谱请求
///
/// # 参数
///
/// * `generator` - ai 或 fallback
/// * `count` - 返回的菜谱数量
pub fn record_recipe_request(generator: &str, count: usize, elapsed: Duration) {
    histogram!("recipe_request_duration_seconds", "generator" => generator.to_string())
        .record(elapsed.as_secs_f64());
    counter!("recipes_generated_total", "generator" => generator.to_string())
        .increment(count as u64);
}

pub fn record_recipe_failure() {
    counter!("recipe_request_failures_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_metrics_do_not_install_recorder() {
        init_metrics(&MetricsSettings {
            enabled: false,
            listen_addr: "0.0.0.0:9000".into(),
        });
        // Recording without a recorder is a no-op
        record_scan_started();
        record_recipe_request("fallback", 1, Duration::from_millis(5));
    }
}
