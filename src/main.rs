use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ref_batch::{logger, App, Config, Job};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ref_batch")]
#[command(about = "文献库批处理：投票推送、全文导出、关键词统计", long_about = None)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, global = true, default_value = "ref_batch.toml")]
    config: PathBuf,

    /// 输出 debug 日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 把票数达标的条目加入目标分组
    Promote,
    /// 导出清洗并格式化后的全文
    Extract,
    /// 统计关键词命中数及均值/标准差
    Stats,
}

impl From<Commands> for Job {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Promote => Job::Promote,
            Commands::Extract => Job::Extract,
            Commands::Stats => Job::Stats,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(&cli.config)
        .with_context(|| format!("加载配置失败: {}", cli.config.display()))?;

    // 初始化日志
    logger::init(cli.verbose || config.verbose_logging);

    // 初始化并运行作业
    let app = App::initialize(config)?;
    app.run(cli.command.into()).await?;

    Ok(())
}
