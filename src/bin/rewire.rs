//! Command-line front end for the AIG rewriter.
use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};
use rewire::aiger::{self, Aig};
use rewire::{rewire, Params};

/// Performs AIG re-wiring: stochastic expand/share/reduce rewriting that
/// lowers the two-input AND count while preserving every output function.
#[derive(Parser)]
#[command(name = "rewire", version)]
struct Args {
  /// the input file name (binary AIGER)
  input: String,
  /// the number of iterations
  #[arg(short = 'I', default_value_t = 1000)]
  iters: usize,
  /// the number of fanins to add per iteration
  #[arg(short = 'E', default_value_t = 100)]
  expands: usize,
  /// the number of fanins that can be added to one node
  #[arg(short = 'G', default_value_t = 3)]
  growth: usize,
  /// the number of shared divisors to extract per iteration
  #[arg(short = 'D', default_value_t = 4)]
  divs: usize,
  /// the limit on the fanin count at a node
  #[arg(short = 'F', default_value_t = 4)]
  fanin_max: usize,
  /// the random seed
  #[arg(short = 'S', default_value_t = 1)]
  seed: u64,
  /// the timeout in seconds (0 disables it)
  #[arg(short = 'T', default_value_t = 0)]
  timeout: u64,
  /// the verbosity level
  #[arg(short = 'V', default_value_t = 0)]
  verbose: u8,
}

fn main()->anyhow::Result<()> {
  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(e) => { e.print().ok(); std::process::exit(1) }};
  let level = match args.verbose {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace };
  simplelog::TermLogger::init(
    level,
    simplelog::Config::default(),
    simplelog::TerminalMode::Mixed,
    simplelog::ColorChoice::Auto)?;
  let ps = Params {
    iters: args.iters, expands: args.expands, growth: args.growth,
    divs: args.divs, fanin_max: args.fanin_max,
    seed: args.seed, timeout: args.timeout };
  info!("parameters:  iters = {}  expands = {}  growth = {}  divs = {}  fanin max = {}  seed = {}  timeout = {}",
    ps.iters, ps.expands, ps.growth, ps.divs, ps.fanin_max, ps.seed, ps.timeout);
  let aig = Aig::read(&args.input).with_context(|| format!("reading {}", args.input))?;
  aig.log_stats("input");
  let out = rewire(&aig, &ps)?;
  out.log_stats("output");
  let path = aiger::out_path(&args.input);
  out.write(&path).with_context(|| format!("writing {}", path))?;
  info!("wrote {}", path);
  Ok(()) }
