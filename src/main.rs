use clap::Parser;
use rocket_cart::app::build_cart_store;
use rocket_cart::core::ConfigProvider;
use rocket_cart::utils::{logger, validation::Validate};
use rocket_cart::{
    use_cart, CartProvider, CliConfig, Command, ConsoleNotifier, TomlConfig, UpdateProductAmount,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.config.clone() {
        Some(path) => {
            let file_config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load {}: {}", path, e);
                    std::process::exit(1);
                }
            };
            init_logging(
                cli.verbose || file_config.verbose(),
                cli.json_logs || file_config.json_logs(),
            );
            run(&file_config, cli.command).await
        }
        None => {
            init_logging(cli.verbose, cli.json_logs);
            run(&cli, cli.command.clone()).await
        }
    }
}

fn init_logging(verbose: bool, json: bool) {
    if json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
}

async fn run<C: ConfigProvider + Validate>(config: &C, command: Command) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let store = build_cart_store(config, Arc::new(ConsoleNotifier))?;
    let provider = CartProvider::new(store);

    provider.scope(execute(command)).await
}

async fn execute(command: Command) -> anyhow::Result<()> {
    let cart = use_cart()?;
    tracing::debug!("Running {:?}", command);

    match command {
        Command::List => {}
        Command::Add { product_id } => cart.add_product(product_id).await,
        Command::Remove { product_id } => cart.remove_product(product_id).await,
        Command::Update { product_id, amount } => {
            cart.update_product_amount(UpdateProductAmount { product_id, amount })
                .await
        }
        Command::Reconcile => cart.reconcile_with_stock().await,
    }

    println!("{}", serde_json::to_string_pretty(&cart.cart())?);
    tracing::info!(
        "Cart holds {} products, {} items",
        cart.cart().len(),
        cart.total_items()
    );
    Ok(())
}
