//! Application entry point and dispatch.

use std::time::Instant;

use anyhow::{Context, Result};
use arbcore_ball::{ball_binary_op, global, BinaryOp, ConstantId};
use arbcore_float::{Float, Round, Rounded};
use arbcore_memory::{HeapProvider, LimbProvider, SharedCacheProvider, ThreadLocalProvider};
use arbcore_poly::{evaluate_many, BallPoly};
use tracing::debug;

use crate::config::{Action, AppConfig, ProviderKind};
use crate::input::{parse_ball, parse_list};
use crate::output::{format_duration, write_to_file, Presenter};

/// Run the application.
///
/// # Errors
///
/// Returns configuration errors for bad flags or operands and propagates
/// arithmetic and I/O failures.
pub fn run(config: &AppConfig) -> Result<()> {
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        clap_complete::generate(shell, &mut cmd, "arbcore", &mut std::io::stdout());
        return Ok(());
    }

    let presenter = Presenter::new(config.verbose, config.quiet);
    let start = Instant::now();
    let mut text = match config.action()? {
        Action::Constant(name) => run_constant(config, &presenter, name)?,
        Action::Binary { op, lhs, rhs } if config.float => {
            run_float_op(config, &presenter, op, lhs, rhs)?
        }
        Action::Binary { op, lhs, rhs } => run_ball_op(config, &presenter, op, lhs, rhs)?,
        Action::Evaluate { poly, points } => run_evaluate(config, &presenter, poly, points)?,
    };
    text.push_str(&presenter.detail("elapsed", format_duration(start.elapsed())));

    match &config.output {
        Some(path) => {
            write_to_file(path, &text).with_context(|| format!("writing {path}"))?;
            if !config.quiet {
                println!("Result written to {path}");
            }
        }
        None => print!("{text}"),
    }
    Ok(())
}

fn run_constant(config: &AppConfig, presenter: &Presenter, name: &str) -> Result<String> {
    let id: ConstantId = name.parse()?;
    let cache = global();
    let value = cache.get_or_compute(id, config.prec)?;
    let mut text = presenter.ball(id.as_str(), &value);
    text.push_str(&presenter.detail("precision", format!("{} bits", config.prec)));
    text.push_str(&presenter.detail("algorithm", id.evaluator().name().to_string()));
    if let Some(cached) = cache.cached_precision(id) {
        text.push_str(&presenter.detail("cached at", format!("{cached} bits")));
    }
    Ok(text)
}

fn run_ball_op(
    config: &AppConfig,
    presenter: &Presenter,
    op: &str,
    lhs: &str,
    rhs: &str,
) -> Result<String> {
    let op: BinaryOp = op.parse()?;
    let a = parse_ball(lhs, config.prec).context("reading --lhs")?;
    let b = parse_ball(rhs, config.prec).context("reading --rhs")?;
    debug!(%op, prec = config.prec, "ball operation");
    let value = ball_binary_op(op, &a, &b, config.prec)?;
    let mut text = presenter.ball(&format!("{} {op} {}", lhs.trim(), rhs.trim()), &value);
    text.push_str(&presenter.detail("precision", format!("{} bits", config.prec)));
    Ok(text)
}

/// Scratch provider for the float path.
fn provider(kind: ProviderKind) -> Box<dyn LimbProvider> {
    match kind {
        ProviderKind::ThreadLocal => Box::new(ThreadLocalProvider::new()),
        ProviderKind::Shared => Box::new(SharedCacheProvider::new()),
        ProviderKind::Heap => Box::new(HeapProvider),
    }
}

fn float_op(
    op: BinaryOp,
    x: &Float,
    y: &Float,
    prec: u64,
    rnd: Round,
    provider: &dyn LimbProvider,
) -> Result<Rounded> {
    Ok(match op {
        BinaryOp::Add => x.add(y, prec, rnd)?,
        BinaryOp::Sub => x.sub(y, prec, rnd)?,
        BinaryOp::Mul => x.mul_with(provider, y, prec, rnd)?,
        BinaryOp::Div => x.div(y, prec, rnd)?,
    })
}

fn run_float_op(
    config: &AppConfig,
    presenter: &Presenter,
    op: &str,
    lhs: &str,
    rhs: &str,
) -> Result<String> {
    let op: BinaryOp = op.parse()?;
    let rnd: Round = config.rounding.parse()?;
    // Operands are read at a generous precision and only their midpoints used.
    let read_prec = config.prec.saturating_mul(2).max(64);
    let x = parse_ball(lhs, read_prec).context("reading --lhs")?;
    let y = parse_ball(rhs, read_prec).context("reading --rhs")?;
    let provider = provider(config.provider);
    debug!(%op, rounding = %rnd, provider = provider.name(), "float operation");

    let value = float_op(op, x.mid(), y.mid(), config.prec, rnd, provider.as_ref())?;
    let mut text = presenter.rounded(&format!("{} {op} {}", lhs.trim(), rhs.trim()), &value);
    text.push_str(&presenter.detail("rounding", rnd));
    text.push_str(&presenter.detail("provider", provider.name().to_string()));
    Ok(text)
}

fn run_evaluate(
    config: &AppConfig,
    presenter: &Presenter,
    poly: &str,
    points: &str,
) -> Result<String> {
    let poly = BallPoly::new(parse_list(poly, config.prec).context("reading --poly")?);
    let xs = parse_list(points, config.prec).context("reading --points")?;
    debug!(degree = ?poly.degree(), points = xs.len(), "multipoint evaluation");
    let values = evaluate_many(&poly, &xs, config.prec)?;

    let labels: Vec<String> = if xs.is_empty() {
        Vec::new()
    } else {
        points.split(',').map(str::to_string).collect()
    };
    let mut text = presenter.values(&labels, &values);
    let degree = poly
        .degree()
        .map_or_else(|| "none".to_string(), |d| d.to_string());
    text.push_str(&presenter.detail("degree", degree));
    text.push_str(&presenter.detail("points", xs.len()));
    Ok(text)
}
