use anyhow::Result;
use clap::Parser;
use webpeditor_client::cli::{Cli, Command, EditCommand};
use webpeditor_client::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load()?;
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化应用
    let app = App::initialize(config).await?;

    match cli.command {
        Command::Convert {
            files,
            format,
            quality,
        } => {
            let outcome = app.convert(&files, format, quality).await?;
            if !outcome.is_success() {
                anyhow::bail!("{}", outcome.message());
            }
        }
        Command::List => {
            app.list().await?;
        }
        Command::Download { short_name } => {
            app.download(&short_name).await?;
        }
        Command::DownloadAll { zip: true } => {
            app.download_zip().await?;
        }
        Command::DownloadAll { zip: false } => {
            let stats = app.download_all().await?;
            if stats.failed > 0 {
                anyhow::bail!("{} 张图片下载失败", stats.failed);
            }
        }
        Command::Delete { short_name } => {
            app.delete(&short_name).await?;
        }
        Command::Edit(EditCommand::Download { file, mime }) => {
            app.edit_download(&file, &mime).await?;
        }
        Command::Edit(EditCommand::Save { file }) => {
            app.edit_save(&file).await?;
        }
        Command::Edit(EditCommand::Original) => {
            app.edit_original().await?;
        }
    }

    Ok(())
}
