// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
use euro_denomination::ui;

use anyhow::{bail, Context, Result};
use euro_denomination::changes::format_delta;
use euro_denomination::config::{LogFormat, LOG_FORMAT_VAR};
use euro_denomination::logging::init_tracing;
use euro_denomination::{CalculationRequest, CalculationResult, Calculator, Cents, LocalCalculator};
use std::env;

#[derive(Debug, Default, PartialEq)]
struct CalcArgs {
    amount: String,
    previous: Option<String>,
    remote: bool,
    json: bool,
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        None => run_ui_mode(),
        Some("calc") => {
            init_cli_tracing();
            run_calc(parse_calc_args(&args[2..])?)
        }
        Some("health") => {
            init_cli_tracing();
            run_health()
        }
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            print_usage();
            bail!("unknown command '{}'", other)
        }
    }
}

fn init_cli_tracing() {
    let format = env::var(LOG_FORMAT_VAR)
        .ok()
        .and_then(|raw| raw.parse::<LogFormat>().ok())
        .unwrap_or_default();
    init_tracing(format, "warn");
}

fn print_usage() {
    println!("Euro Denomination Calculator {}", euro_denomination::VERSION);
    println!();
    println!("Usage:");
    println!("  denomination                                    interactive calculator");
    println!("  denomination calc <amount> [--previous <amount>] [--remote] [--json]");
    println!("  denomination health                             check the API server");
}

fn parse_calc_args(args: &[String]) -> Result<CalcArgs> {
    let mut parsed = CalcArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--previous" | "-p" => {
                let value = iter.next().context("--previous needs an amount")?;
                parsed.previous = Some(value.clone());
            }
            "--remote" => parsed.remote = true,
            "--json" => parsed.json = true,
            value if parsed.amount.is_empty() => parsed.amount = value.to_string(),
            value => bail!("unexpected argument '{}'", value),
        }
    }

    if parsed.amount.is_empty() {
        bail!("missing amount, e.g. `denomination calc 234.23`");
    }
    Ok(parsed)
}

fn run_calc(args: CalcArgs) -> Result<()> {
    let amount: Cents = args.amount.parse()?;
    let previous = args
        .previous
        .as_deref()
        .map(str::parse::<Cents>)
        .transpose()?;

    let request = CalculationRequest::new(amount, previous);
    let calculator = build_calculator(args.remote)?;
    let result = calculator
        .calculate(&request)
        .with_context(|| format!("{} calculation failed", calculator.mode().as_str()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result, previous);
    }
    Ok(())
}

#[cfg(feature = "remote")]
fn build_calculator(remote: bool) -> Result<Box<dyn Calculator>> {
    use euro_denomination::client::RemoteCalculator;
    use euro_denomination::config::ClientConfig;

    if remote {
        let calculator = RemoteCalculator::new(&ClientConfig::from_env())?;
        Ok(Box::new(calculator))
    } else {
        Ok(Box::new(LocalCalculator))
    }
}

#[cfg(not(feature = "remote"))]
fn build_calculator(remote: bool) -> Result<Box<dyn Calculator>> {
    if remote {
        bail!("remote calculation not available, rebuild with --features remote");
    }
    Ok(Box::new(LocalCalculator))
}

fn print_result(result: &CalculationResult, previous: Option<Cents>) {
    println!("💶 Breakdown for €{:.2}", result.amount);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for (denom, count) in result.breakdown.non_zero() {
        println!("  €{:>7}  {:<4}  × {}", denom.key(), denom.kind().as_str(), count);
    }
    println!("  {} pieces", result.breakdown.piece_count());

    if let (Some(previous), true) = (previous, result.changes.is_some()) {
        println!();
        println!("🔀 Changes since €{}", previous);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        let rows = result.change_rows();
        if rows.is_empty() {
            println!("  no change");
        }
        for row in rows {
            println!(
                "  €{:>7}  {} → {}  ({})",
                row.denomination.key(),
                row.previous,
                row.current,
                format_delta(row.delta)
            );
        }
    }
}

#[cfg(feature = "remote")]
fn run_health() -> Result<()> {
    use euro_denomination::client::RemoteCalculator;
    use euro_denomination::config::ClientConfig;

    let config = ClientConfig::from_env();
    let calculator = RemoteCalculator::new(&config)?;
    let message = calculator.health()?;
    println!("✓ {} is up: {}", config.api_url, message);
    Ok(())
}

#[cfg(not(feature = "remote"))]
fn run_health() -> Result<()> {
    bail!("health check needs the remote feature, rebuild with --features remote")
}

#[cfg(feature = "tui")]
fn run_ui_mode() -> Result<()> {
    let mut app = ui::App::new();

    #[cfg(feature = "remote")]
    {
        use euro_denomination::client::RemoteCalculator;
        use euro_denomination::config::ClientConfig;

        match RemoteCalculator::new(&ClientConfig::from_env()) {
            Ok(remote) => app = app.with_remote(Box::new(remote)),
            Err(e) => eprintln!("⚠️  Remote mode disabled: {}", e),
        }
    }

    ui::run_ui(&mut app)?;
    println!("\n✅ Calculator closed");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode() -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: denomination calc <amount>");
    std::process::exit(1);
}
