use diner_server::{Config, Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment();

    print_banner();

    // 2. 加载并校验配置
    let config = Config::from_env();
    config.validate()?;

    tracing::info!(
        port = config.http_port,
        backend = ?config.store_backend,
        environment = %config.environment,
        "🍽️ Diner server starting..."
    );

    // 3. 启动 HTTP 服务器
    let server = Server::new(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
