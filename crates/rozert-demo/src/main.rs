/*
[INPUT]:  CLI arguments and ROZERT_* environment variables
[OUTPUT]: Transactions created or fetched through the Rozert API, or dry-run request dumps
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, or startup flow
*/

mod showcase;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use rozert_client::{
    deposit_route, DepositRequest, MerchantCredentials, RozertClient, SignedRequest,
    StpCodiDepositType, StpCodiRequest, TransactionData, UserData, WithdrawRequest,
};

#[derive(Parser, Debug)]
#[command(name = "rozert-demo", version, about = "Rozert payment API demo client")]
struct Cli {
    #[arg(long, env = "ROZERT_HOST", default_value = "https://ps-stage.rozert.cloud")]
    host: String,
    #[arg(long = "merchant-id", env = "ROZERT_MERCHANT_ID")]
    merchant_id: String,
    #[arg(long = "secret-key", env = "ROZERT_SECRET_KEY", hide_env_values = true)]
    secret_key: String,
    /// Send X-Sandbox-Mode; pass `--sandbox false` for production
    #[arg(long, env = "ROZERT_SANDBOX", default_value_t = true, action = ArgAction::Set)]
    sandbox: bool,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Print the signed request instead of sending it
    #[arg(long = "dry-run")]
    dry_run: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a deposit with a provider (paypal, paycash, ...)
    Deposit(DepositArgs),
    /// Start an STP CoDi deposit
    StpCodi(StpCodiArgs),
    /// Start a withdrawal routed by system
    Withdraw(WithdrawArgs),
    /// Fetch a transaction by id
    Transaction { id: String },
    /// Run the sample PayPal and PayCash deposits concurrently
    Showcase(showcase::ShowcaseArgs),
}

#[derive(Args, Debug)]
struct PaymentArgs {
    #[arg(long = "wallet-id")]
    wallet_id: Uuid,
    #[arg(long)]
    amount: Decimal,
    #[arg(long, default_value = "MXN")]
    currency: String,
    #[arg(long = "callback-url")]
    callback_url: Option<String>,
}

#[derive(Args, Debug)]
struct DepositArgs {
    #[arg(long)]
    provider: String,
    #[command(flatten)]
    payment: PaymentArgs,
    #[arg(long = "redirect-url")]
    redirect_url: Option<String>,
    /// Payer data as key=value, repeatable
    #[arg(long = "user-data", value_parser = parse_key_value)]
    user_data: Vec<(String, String)>,
}

#[derive(Args, Debug)]
struct StpCodiArgs {
    #[command(flatten)]
    payment: PaymentArgs,
    #[arg(long)]
    phone: String,
    #[arg(long = "deposit-type", default_value = "app")]
    deposit_type: StpCodiDepositType,
}

#[derive(Args, Debug)]
struct WithdrawArgs {
    #[command(flatten)]
    payment: PaymentArgs,
    #[arg(long)]
    system: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let credentials = MerchantCredentials::new(&args.host, &args.merchant_id, &args.secret_key)
        .sandbox(args.sandbox);
    let client = RozertClient::new(credentials).context("create rozert client")?;

    info!(
        host = %client.host(),
        sandbox = client.is_sandbox(),
        dry_run = args.dry_run,
        "starting rozert-demo"
    );

    match args.command {
        Command::Deposit(deposit) => {
            let mut request = DepositRequest::new(
                deposit.payment.wallet_id,
                deposit.payment.amount,
                deposit.payment.currency,
            );
            request.callback_url = deposit.payment.callback_url;
            request.redirect_url = deposit.redirect_url;
            if !deposit.user_data.is_empty() {
                request.user_data = Some(deposit.user_data.into_iter().collect::<UserData>());
            }
            let route = deposit_route(&deposit.provider);

            let signed = client
                .prepare_deposit(&request, &route, None)
                .context("prepare deposit")?;
            dispatch(&client, signed, args.dry_run).await
        }
        Command::StpCodi(stp) => {
            let mut request = StpCodiRequest::new(
                stp.payment.wallet_id,
                stp.payment.amount,
                stp.payment.currency,
                stp.phone,
            )
            .with_deposit_type(stp.deposit_type);
            request.callback_url = stp.payment.callback_url;

            let signed = client
                .prepare_stp_codi_deposit(&request)
                .context("prepare stp codi deposit")?;
            dispatch(&client, signed, args.dry_run).await
        }
        Command::Withdraw(withdraw) => {
            let mut request = WithdrawRequest::new(
                withdraw.payment.wallet_id,
                withdraw.payment.amount,
                withdraw.payment.currency,
                withdraw.system,
            );
            request.callback_url = withdraw.payment.callback_url;

            let signed = client
                .prepare_withdraw(&request)
                .context("prepare withdraw")?;
            dispatch(&client, signed, args.dry_run).await
        }
        Command::Transaction { id } => {
            let signed = client
                .prepare_transaction_query(&id)
                .context("prepare transaction query")?;
            dispatch(&client, signed, args.dry_run).await
        }
        Command::Showcase(showcase_args) => {
            showcase::run(client, showcase_args, args.dry_run).await
        }
    }
}

async fn dispatch(client: &RozertClient, signed: SignedRequest, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("{}", serde_json::to_string_pretty(&request_summary(&signed))?);
        return Ok(());
    }

    let data = client.execute(signed).await.context("rozert request")?;
    print_transaction(&data)
}

pub(crate) fn print_transaction(data: &TransactionData) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

pub(crate) fn request_summary(signed: &SignedRequest) -> Value {
    let headers: Map<String, Value> = signed
        .headers
        .iter()
        .map(|(name, value)| (name.to_string(), Value::String(value.clone())))
        .collect();
    json!({
        "method": signed.method.as_str(),
        "url": signed.url.as_str(),
        "headers": headers,
        "body": signed.body,
    })
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
