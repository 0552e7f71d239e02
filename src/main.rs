use apicall::prelude::*;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Issue a single HTTP request and print the response.
///
/// When several auth options are present the most explicit one wins:
/// `--oauth2`, then `--basic`, then `--api-key`, then `--bearer`.
#[derive(Parser, Debug)]
#[command(name = "apicall", version)]
struct Cli {
    /// HTTP method: GET, POST, PUT, DELETE, PATCH, HEAD or OPTIONS
    method: Method,

    /// Base URL of the request
    url: String,

    /// Request header, repeatable
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Query parameter, repeatable
    #[arg(short = 'q', long = "query", value_name = "NAME=VALUE", value_parser = parse_pair)]
    query: Vec<(String, String)>,

    /// Request body, ignored for methods without one
    #[arg(short = 'd', long = "data", value_name = "BODY")]
    data: Option<String>,

    /// HTTP Basic credentials
    #[arg(long, value_name = "USER:PASS", value_parser = parse_basic)]
    basic: Option<(String, String)>,

    /// Bearer token
    #[arg(long, value_name = "TOKEN", env = "APICALL_BEARER_TOKEN", hide_env_values = true)]
    bearer: Option<String>,

    /// API key sent in the named header
    #[arg(
        long = "api-key",
        value_name = "HEADER=KEY",
        env = "APICALL_API_KEY",
        hide_env_values = true,
        value_parser = parse_pair
    )]
    api_key: Option<(String, String)>,

    /// OAuth2 form parameter (grant_type, client_id, client_secret, username,
    /// password, scope, token_url), repeatable
    #[arg(long, value_name = "KEY=VALUE", value_parser = parse_pair)]
    oauth2: Vec<(String, String)>,

    /// Post the OAuth2 form to `token_url` instead of the request URL
    #[arg(long, requires = "oauth2")]
    token_request: bool,

    /// Print the response as JSON after the summary
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn parse_split(s: &str, sep: char, expected: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(sep)
        .ok_or_else(|| format!("expected {expected}, got `{s}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty name in `{s}`"));
    }
    Ok((name.to_owned(), value.trim_start().to_owned()))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    parse_split(s, ':', "NAME:VALUE")
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    parse_split(s, '=', "NAME=VALUE")
}

fn parse_basic(s: &str) -> Result<(String, String), String> {
    let (user, pass) = s
        .split_once(':')
        .ok_or_else(|| "expected USER:PASS".to_string())?;
    Ok((user.to_owned(), pass.to_owned()))
}

fn configure<C: Configure>(mut call: C, cli: &Cli) -> C {
    for (name, value) in &cli.headers {
        call = call.header(name, value);
    }
    for (name, value) in &cli.query {
        call = call.query_param(name, value);
    }

    if !cli.oauth2.is_empty() {
        call.oauth2(cli.oauth2.iter().cloned())
    } else if let Some((user, pass)) = &cli.basic {
        call.basic_auth(user, pass)
    } else if let Some((header, key)) = &cli.api_key {
        call.api_key_auth(header, key)
    } else if let Some(token) = &cli.bearer {
        call.bearer_auth(token)
    } else {
        call
    }
}

async fn run<C: Configure>(call: C, token_request: bool) -> apicall::Result<Response> {
    if token_request {
        call.execute_oauth2_token_request().await
    } else {
        call.execute().await
    }
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "warn,apicall=info",
            2 => "info,apicall=debug",
            _ => "debug,apicall=trace",
        })
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let rs = match ApiCall::new(&cli.url).request(cli.method).handle() {
        Handle::WithBody(call) => {
            let mut call = configure(call, &cli);
            if let Some(data) = &cli.data {
                call = call.body(data);
            }
            run(call, cli.token_request).await
        }
        Handle::Plain(call) => {
            if cli.data.is_some() {
                tracing::warn!(method = %cli.method, "--data ignored, method carries no body");
            }
            run(configure(call, &cli), cli.token_request).await
        }
    }
    .wrap_err_with(|| format!("{} {} failed", cli.method, cli.url))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rs)?);
    }
    Ok(())
}
