use std::time::Duration;

use eureka_client::{ClientConfig, EurekaClient};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH_ENV: &str = "EUREKA_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "eureka.toml";
const DEFAULT_LOG_FILTER: &str = "eureka_client=info";

// RUST_LOG 未设置或无法解析时使用默认级别
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(log_filter()).init();

    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = ClientConfig::load_or_env(&config_path)?;
    // 由客户端监听终止信号并在注销后通知这里退出
    config.shutdown_on_signal = true;

    let client = EurekaClient::new(config)?;
    client.start();

    let stopped = client.shutdown_token();
    let mut report = tokio::time::interval(client.config().fetch_interval());
    loop {
        tokio::select! {
            () = stopped.cancelled() => break,
            _ = report.tick() => {
                if let Some(apps) = client.applications() {
                    tracing::debug!(
                        applications = apps.len(),
                        instances = apps.instance_count(),
                        "Cached registry view"
                    );
                }
            }
        }
    }

    // 周期任务最多再执行一轮
    let _ = tokio::time::timeout(Duration::from_secs(5), client.join()).await;
    tracing::info!("Eureka client stopped");
    Ok(())
}
