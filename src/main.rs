use clap::Parser;
use insurance_premium::app::display;
use insurance_premium::config::{ClientArgs, Command};
use insurance_premium::core::ConfigProvider;
use insurance_premium::utils::error::ErrorSeverity;
use insurance_premium::utils::{logger, validation::Validate};
use insurance_premium::{
    AdvisoryEngine, AppConfig, CliConfig, FeatureDeriver, LocalStorage, ModelStore, PremiumError,
    QuoteEngine,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match cli.load_app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let level = config.logging.level.as_deref();
    if config.logging.json {
        logger::init_json_logger(cli.verbose, level);
    } else {
        logger::init_cli_logger(cli.verbose, level);
    }

    tracing::info!("Starting insurance-premium CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
        tracing::debug!("App config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(cli: &CliConfig, config: &AppConfig) -> Result<(), PremiumError> {
    let deriver = FeatureDeriver::new(config.bmi_policy());

    match &cli.command {
        Command::Advise(args) => {
            let record = deriver.canonicalize(&args.to_input())?;
            let tips = AdvisoryEngine::new().advise(&record);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&tips)?);
            } else {
                print!("{}", display::render_tips(&tips));
            }
        }
        Command::Predict(args) => {
            let store = ModelStore::from_config(LocalStorage::new(".".to_string()), config);
            let dataset = config.dataset_source()?;
            let model = store.load_or_train(dataset.as_ref()).await?;
            predict(QuoteEngine::new(model, deriver), args)?;
        }
        Command::Train { force } => {
            let store = ModelStore::from_config(LocalStorage::new(".".to_string()), config);
            let dataset = config.dataset_source()?;
            let model = if *force {
                store.train(dataset.as_ref()).await?
            } else {
                store.load_or_train(dataset.as_ref()).await?
            };
            print!("{}", display::render_leaderboard(model.metadata()));
            println!("📁 Model artifact: {}", store.artifact_path());
        }
    }

    Ok(())
}

fn predict(
    engine: QuoteEngine<insurance_premium::ModelHandle>,
    args: &ClientArgs,
) -> Result<(), PremiumError> {
    let quote = engine.quote(&args.to_input())?;
    if args.json {
        println!("{}", display::render_quote_json(&quote)?);
    } else {
        print!("{}", display::render_quote(&quote));
    }
    Ok(())
}
