use clap::Parser;
use pricing_matrix::config::{CliCommand, EditArgs, ServeArgs};
use pricing_matrix::utils::{logger, validation::Validate};
use pricing_matrix::{
    run_session, serve, AppState, CliConfig, ConsoleNotifier, HttpPricingApi, LocalStorage,
    MatrixEditor,
};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.command {
        CliCommand::Serve(args) => run_server(args, cli.verbose).await,
        CliCommand::Edit(args) => run_editor(args, cli.verbose).await,
    }
}

async fn run_server(args: ServeArgs, verbose: bool) -> anyhow::Result<()> {
    let config = args.resolve()?;

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    tracing::info!("Starting pricing-matrix server");
    if verbose {
        tracing::debug!("Server config: {:?}", config);
    }

    let state = AppState::new(
        LocalStorage::new(".".to_string()),
        config.pricing_file().to_string(),
        config.default_pricing_file().map(str::to_string),
    );
    serve(config.bind_addr()?, state).await?;
    Ok(())
}

async fn run_editor(args: EditArgs, verbose: bool) -> anyhow::Result<()> {
    let config = args.resolve()?;
    logger::init_cli_logger(verbose);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    tracing::info!("Editing pricing matrix from {}", config.api_base());

    let api = HttpPricingApi::new(config.api_base());
    let mut editor =
        MatrixEditor::new(api, ConsoleNotifier, None).with_pricing_file(config.pricing_file());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run_session(&mut editor, stdin, &mut stdout).await?;

    println!("👋 Bye");
    Ok(())
}
