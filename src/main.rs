use anyhow::Result;
use clap::Parser;
use docsmith::{cli, generator::workflow::Pipeline, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let topic = args.topic.trim().to_string();
    let json = args.json;
    let config = args.into_config()?;

    logging::init(config.verbose);
    config.validate()?;

    if topic.is_empty() {
        anyhow::bail!("topic must not be empty");
    }

    if config.stand_in {
        println!("🧪 替身模式：不会访问任何外部服务");
    }
    println!(
        "🚀 正在为主题生成文档: {} ({})",
        topic,
        config.language.display_name()
    );

    // 流水线在独立任务中运行，主任务只负责等待和展示结果
    let pipeline = Pipeline::new(config)?;
    let result = match pipeline.spawn(topic, None).await? {
        Ok(result) => result,
        Err(e) => {
            eprintln!("❌ 文档生成失败: {}", e);
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("📄 文章标题: {}", result.article.title);
        println!("🔎 检索步骤: {}", result.collected.len());
        match &result.image_url {
            Some(url) => println!("🖼️ 配图: {}", url),
            None => println!("🖼️ 未找到配图"),
        }
        println!("💾 已保存文档: {}", result.file_path.display());
    }

    Ok(())
}
