//! 维护管理系统命令行客户端

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mms_client::models::PageQuery;
use mms_client::{
    telemetry, ApiClient, ClientConfig, FileCredentialStore, IdlePolicy, Session, SessionOptions,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mms-client", version, about = "Maintenance management system client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 登录并保存凭据
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// 显示当前登录用户
    Whoami,
    /// 设备列表
    Equipments {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
    /// 维护记录列表
    Maintenances {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },
    /// 登出并清除凭据
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = ClientConfig::from_env().context("Failed to load configuration")?;
    telemetry::init_telemetry(&config);
    telemetry::init_metrics();

    let store = FileCredentialStore::open(&config.storage.credentials_file)
        .context("Failed to open credential store")?;
    let api = Arc::new(ApiClient::new(&config, Arc::new(store))?);

    // 一次性命令也走完整的会话协调，401 会被合并刷新拦截
    let session = Session::start(
        api.clone(),
        IdlePolicy::from_config(&config.session),
        SessionOptions::default(),
    );

    let result = run_command(&api, cli.command).await;

    session.shutdown().await;
    result
}

async fn run_command(api: &ApiClient, command: Commands) -> Result<()> {
    match command {
        Commands::Login { username, password } => {
            let response = api
                .login(&username, &password)
                .await
                .context("Login failed")?;
            println!("Logged in as {} (role: {})", username, response.role);
        }
        Commands::Whoami => {
            let info = api.user_info().await.context("Failed to fetch user info")?;
            println!("{} (id {})", info.username, info.id);
            if !info.groups.is_empty() {
                println!("groups: {}", info.groups.join(", "));
            }
            if let Some(role) = api.credentials().role() {
                println!("role: {role}");
            }
        }
        Commands::Equipments { page, page_size } => {
            let result = api
                .list_equipments(&PageQuery::new(page, page_size))
                .await
                .context("Failed to list equipments")?;
            println!("{} equipments (page {page})", result.count);
            for equipment in result.results {
                println!(
                    "  [{}] {} - {} ({})",
                    equipment.id,
                    equipment.code,
                    equipment.name,
                    equipment.location.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Maintenances { page, page_size } => {
            let result = api
                .list_maintenances(&PageQuery::new(page, page_size))
                .await
                .context("Failed to list maintenances")?;
            println!("{} maintenance records (page {page})", result.count);
            for record in result.results {
                println!(
                    "  [{}] {} equipment={} by {}{}",
                    record.id,
                    record.maintenance_date,
                    record.equipment,
                    record.performed_by,
                    if record.is_incident { " [incident]" } else { "" }
                );
            }
        }
        Commands::Logout => {
            api.logout().await.context("Logout failed")?;
            println!("Logged out");
        }
    }
    Ok(())
}
