use std::process::ExitCode;

use anyhow::Result;
use course_scraper::orchestrator::exit_status;
use course_scraper::utils::logging::init_tracing;
use course_scraper::{App, Config};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // 加载配置
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(false);
            error!("❌ {}", e);
            return ExitCode::from(course_scraper::orchestrator::EXIT_FATAL);
        }
    };

    // 初始化日志
    init_tracing(config.verbose_logging);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {:#}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

async fn run(config: Config) -> Result<()> {
    // 初始化并运行应用
    App::initialize(config).await?.run().await?;
    Ok(())
}
