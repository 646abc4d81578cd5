use clap::Parser;
use yps_functions::config::cli::{parse_headers, Cli, Command};
use yps_functions::core::schedule::{format_iso, next_service_date_from_str};
use yps_functions::utils::{logger, validation::Validate};
use yps_functions::{
    quote_for_input, FunctionName, FunctionRequest, Functions, StripeClient, YpsError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!("❌ {} (HTTP status {})", e, e.status_code());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: &Cli) -> Result<(), YpsError> {
    match &cli.command {
        Command::Quote { dogs, frequency } => {
            let quote = quote_for_input(dogs, frequency);
            tracing::debug!("Quote for {} dog(s) at {}: {:?}", dogs, frequency, quote);
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        Command::NextDate { frequency, today } => {
            let fallback = chrono::Local::now().date_naive();
            let today = today.clone().unwrap_or_else(|| format_iso(fallback));
            println!("{}", next_service_date_from_str(frequency, &today, fallback));
        }
        Command::Invoke {
            function,
            method,
            body,
            headers,
        } => {
            let name: FunctionName = function.parse().map_err(|e: String| {
                YpsError::InvalidConfigValueError {
                    field: "function".to_string(),
                    value: function.clone(),
                    reason: e,
                }
            })?;

            let config = cli.load_config()?;
            config.validate()?;

            let mut request = FunctionRequest::new(method.clone());
            request.path = format!("/.netlify/functions/{}", name);
            request.headers = parse_headers(headers)?;
            request.body = body.clone();

            let provider = StripeClient::new(&config.stripe_api_base, &config.stripe_secret_key);
            let functions = Functions::new(config, provider);

            tracing::info!("🚀 Invoking {} locally", name);
            let response = functions.invoke(name, request).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
