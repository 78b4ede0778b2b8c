use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod admin;
mod autosave;
mod config;
mod content;
mod error;
mod repository;
mod service;
mod state;

#[derive(Parser)]
#[command(name = "mdblog", about = "个人博客写作后端", version = long_version())]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动写作后台服务
    Serve {
        /// 项目根目录（默认当前目录）
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// 监听地址
        #[arg(long)]
        host: Option<String>,

        /// 监听端口
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // None 等同于 Serve { root: ".", host: None, port: None }
    let Commands::Serve { root, host, port } = cli.command.unwrap_or(Commands::Serve {
        root: PathBuf::from("."),
        host: None,
        port: None,
    });

    let root = root.canonicalize().unwrap_or(root);
    let site_config = config::SiteConfig::load(&root)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(&site_config.server.log_level)
            }),
        )
        .init();

    let host = host.unwrap_or_else(|| site_config.server.host.clone());
    let port = port.unwrap_or(site_config.server.port);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async move { run_server(root, site_config, &host, port).await })
}

async fn run_server(
    root: PathBuf,
    site_config: config::SiteConfig,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    let app_state = state::AppState::new(&root, site_config).await?;
    let app = admin::router(app_state);

    let addr = format!("{host}:{port}");
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            tracing::error!("端口 {port} 已被占用");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!("写作后台服务启动：http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

const fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\ncommit:  ",
        env!("MDBLOG_GIT_COMMIT"),
        "\nbuild:   ",
        env!("MDBLOG_BUILD_TIME"),
        "\nprofile: ",
        env!("MDBLOG_BUILD_PROFILE"),
    )
}
