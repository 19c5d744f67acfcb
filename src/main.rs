use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paypal_usd::application::rewriter::RequestRewriter;
use paypal_usd::config::Settings;
use paypal_usd::domain::currency::CurrencyAllowList;
use paypal_usd::domain::ports::ConversionRegistry;
use paypal_usd::infrastructure::in_memory::{
    FixedRateConverter, InMemoryRegistry, StaticStoreContext,
};
use paypal_usd::interfaces::csv::request_reader::{RequestReader, collect_request};
use paypal_usd::interfaces::csv::request_writer::RequestWriter;
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Shows how an NVP request would leave the store after currency rewriting.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// NVP request as a `field,value` CSV file
    input: PathBuf,

    /// NVP method name, e.g. DoExpressCheckoutPayment
    #[arg(long)]
    method: String,

    /// Exchange rate from the store's base currency to the target currency
    #[arg(long)]
    rate: Decimal,

    /// Store base currency. Defaults to the configured source currency.
    #[arg(long)]
    base_currency: Option<String>,

    /// Settings file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "paypal_usd=info".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).into_diagnostic()?;
    let base_currency = cli
        .base_currency
        .unwrap_or_else(|| settings.source_currency.clone());

    let allow_list = CurrencyAllowList::default().extended_with(&settings.source_currency);
    if !allow_list.is_supported(&base_currency) {
        warn!(%base_currency, "PayPal methods are not offered for this currency");
    }

    let registry = InMemoryRegistry::new();
    let converter = FixedRateConverter::new(&base_currency)
        .with_rate(settings.target_currency.clone(), cli.rate);
    let rewriter = RequestRewriter::new(
        settings.clone(),
        Box::new(converter),
        Box::new(StaticStoreContext::new(base_currency)),
        Arc::new(registry.clone()),
    );

    let file = File::open(&cli.input).into_diagnostic()?;
    let mut fields = Vec::new();
    for field in RequestReader::new(file).fields() {
        match field {
            Ok(field) => fields.push(field),
            Err(e) => warn!("Error reading field: {}", e),
        }
    }

    let (_, rewritten) = rewriter
        .before_call(cli.method, collect_request(fields))
        .into_diagnostic()?;

    if let Some(record) = registry.get(&settings.registry_key) {
        let record = serde_json::to_string(&record).into_diagnostic()?;
        info!(%record, "conversion recorded");
    }

    let stdout = io::stdout();
    let mut writer = RequestWriter::new(stdout.lock());
    writer.write_request(&rewritten).into_diagnostic()?;

    Ok(())
}
