use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use yps_functions::utils::{logger, validation::Validate};
use yps_functions::{
    FunctionName, FunctionRequest, FunctionResponse, Functions, FunctionsConfig, StripeClient,
};

/// 單一函式部署時固定的函式名稱，未設定則依路徑路由
const FUNCTION_VAR: &str = "YPS_FUNCTION";

async fn function_handler(
    functions: &Functions<StripeClient>,
    fixed: Option<FunctionName>,
    event: LambdaEvent<FunctionRequest>,
) -> Result<FunctionResponse, Error> {
    let (request, context) = event.into_parts();
    tracing::info!("Request {} for {:?}", context.request_id, request.path);

    let response = match fixed {
        Some(name) => functions.invoke(name, request).await,
        None => functions.invoke_path(request).await,
    };
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = FunctionsConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let fixed = match std::env::var(FUNCTION_VAR) {
        Ok(name) => Some(name.parse::<FunctionName>()?),
        Err(_) => None,
    };

    let provider = StripeClient::new(&config.stripe_api_base, &config.stripe_secret_key);
    let functions = Arc::new(Functions::new(config, provider));
    tracing::info!("Function runtime ready (fixed function: {:?})", fixed);

    run(service_fn(move |event: LambdaEvent<FunctionRequest>| {
        let functions = Arc::clone(&functions);
        async move { function_handler(&functions, fixed, event).await }
    }))
    .await
}
