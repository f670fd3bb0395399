/*
[INPUT]:  Sandbox wallet ids for PayPal and PayCash
[OUTPUT]: Sample deposits issued concurrently from one shared client
[POS]:    Demo layer - concurrent usage of RozertClient
[UPDATE]: When sample payloads or providers change
*/

use anyhow::{bail, Context, Result};
use clap::Args;
use rust_decimal::Decimal;
use tokio::task::JoinSet;
use tracing::{error, info};
use uuid::Uuid;

use rozert_client::{
    deposit_route, DepositRequest, RozertClient, SignedRequest, TransactionData, UserData,
};

use crate::{print_transaction, request_summary};

#[derive(Args, Debug)]
pub struct ShowcaseArgs {
    #[arg(long = "paypal-wallet-id", env = "ROZERT_PAYPAL_SANDBOX_WALLET_ID")]
    paypal_wallet_id: Uuid,
    #[arg(long = "paycash-wallet-id", env = "ROZERT_PAYCASH_SANDBOX_WALLET_ID")]
    paycash_wallet_id: Uuid,
    #[arg(long = "callback-url", default_value = "https://merchant.com/callback")]
    callback_url: String,
}

enum Outcome {
    Prepared(SignedRequest),
    Created(TransactionData),
}

fn paypal_request(args: &ShowcaseArgs) -> DepositRequest {
    let user_data = UserData::new()
        .with("email", "test@test.com")
        .with("phone", "+12345678910")
        .with("first_name", "John")
        .with("last_name", "Doe")
        .with("post_code", "12345")
        .with("city", "City")
        .with("state", "State")
        .with("address", "Address")
        .with("country", "Country");

    DepositRequest::new(args.paypal_wallet_id, Decimal::from(100), "MXN")
        .with_callback_url(args.callback_url.as_str())
        .with_user_data(user_data)
}

fn paycash_request(args: &ShowcaseArgs) -> DepositRequest {
    DepositRequest::new(args.paycash_wallet_id, Decimal::from(100), "MXN")
        .with_callback_url(args.callback_url.as_str())
}

pub async fn run(client: RozertClient, args: ShowcaseArgs, dry_run: bool) -> Result<()> {
    let samples = [
        ("paypal", paypal_request(&args)),
        ("paycash", paycash_request(&args)),
    ];

    let mut tasks = JoinSet::new();
    for (provider, request) in samples {
        let client = client.clone();
        tasks.spawn(async move {
            let route = deposit_route(provider);
            let outcome = if dry_run {
                client
                    .prepare_deposit(&request, &route, None)
                    .map(Outcome::Prepared)
            } else {
                client
                    .start_deposit(&request, &route, None)
                    .await
                    .map(Outcome::Created)
            };
            (provider, outcome)
        });
    }

    let mut failures = 0_usize;
    while let Some(joined) = tasks.join_next().await {
        let (provider, outcome) = joined.context("showcase task panicked")?;
        match outcome {
            Ok(Outcome::Prepared(signed)) => {
                println!("{}", serde_json::to_string_pretty(&request_summary(&signed))?);
            }
            Ok(Outcome::Created(data)) => {
                info!(provider, id = %data.id, status = %data.status, "deposit created");
                print_transaction(&data)?;
            }
            Err(err) => {
                failures += 1;
                error!(provider, error = %err, "deposit failed");
            }
        }
    }

    if failures > 0 {
        bail!("{failures} showcase deposit(s) failed");
    }
    Ok(())
}
