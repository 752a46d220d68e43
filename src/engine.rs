//! The outer optimization loop.
//!
//! Each iteration draws one of the best graphs seen so far, regroups it
//! into multi-input nodes with fresh random widths, expands, shares, and
//! reduces it, and keeps the result only when the two-input AND count did
//! not get worse. Ties accumulate in a small pool so later iterations can
//! restart from structurally different graphs of the same size.
use std::time::{Duration, Instant};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use crate::aiger::Aig;
use crate::error::Result;
use crate::expand;
use crate::maig::Maig;
use crate::reduce;
use crate::share;

/// how many graphs tied at the best size the pool retains
pub const SAVE_NUM:usize = 8;

#[derive(Clone, Debug)]
pub struct Params {
  /// iterations of the expand/share/reduce cycle
  pub iters: usize,
  /// total fanins the expander may add per iteration
  pub expands: usize,
  /// per-node cap on added fanins
  pub growth: usize,
  /// shared pairs to extract per iteration
  pub divs: usize,
  /// widest multi-input node the splitter may form
  pub fanin_max: usize,
  pub seed: u64,
  /// wall-clock budget in seconds, 0 to disable
  pub timeout: u64,
}

impl Default for Params {
  fn default()->Params {
    Params { iters: 1000, expands: 100, growth: 3, divs: 4, fanin_max: 4, seed: 1, timeout: 0 }}}

/// counts reported whenever the best size improves
#[derive(Clone, Copy, Debug)]
pub struct Progress {
  pub iter: usize,
  pub added: i64,
  pub shared: i64,
  pub removed: i64,
  pub best: usize,
}

/// run with default reporting: one log line per new best
pub fn rewire(aig:&Aig, ps:&Params)->Result<Aig> {
  rewire_with(aig, ps, |p| info!(
    "iteration {:5} :  added = {:4}  shared = {:4}  removed = {:4}  best = {:5}",
    p.iter, p.added, p.shared, p.removed, p.best)) }

/// run, handing every new best to the caller's emitter
pub fn rewire_with<F:FnMut(&Progress)>(aig:&Aig, ps:&Params, mut emit:F)->Result<Aig> {
  let rng = &mut SmallRng::seed_from_u64(ps.seed);
  let start = Instant::now();
  let mut times = [Duration::ZERO; 3];
  let g0 = Maig::from_aig(aig)?;
  let mut prev_best = g0.and2_count();
  let mut pool = vec![g0];
  for iter in 0..ps.iters {
    if ps.timeout > 0 && start.elapsed() >= Duration::from_secs(ps.timeout) {
      info!("timeout after {} iterations", iter);
      break }
    let best = pool[0].and2_count();
    let bi = rng.random_range(0..pool.len());
    // expand
    let clk = Instant::now();
    let multi = pool[bi].dup_multi(ps.fanin_max, ps.growth, rng);
    let n0 = multi.and2_count() as i64;
    let g = expand::expand(multi, ps.expands, rng)?;
    let added = g.and2_count() as i64 - n0;
    times[0] += clk.elapsed();
    // share
    let clk = Instant::now();
    let n0 = g.and2_count() as i64;
    let g = share::share(g, ps.divs)?;
    let shared = n0 - g.and2_count() as i64;
    times[1] += clk.elapsed();
    // reduce
    let clk = Instant::now();
    let n0 = g.and2_count() as i64;
    let g = reduce::reduce(g, rng)?;
    let removed = n0 - g.and2_count() as i64;
    times[2] += clk.elapsed();
    // compare against the pool
    let count = g.and2_count();
    if count < best {
      pool.clear();
      pool.push(g); }
    else if count == best {
      if pool.len() < SAVE_NUM { pool.push(g) }
      else { let k = rng.random_range(0..SAVE_NUM); pool[k] = g; }}
    if count < prev_best {
      prev_best = count;
      emit(&Progress { iter, added, shared, removed, best: count }); }}
  let total = start.elapsed();
  info!("total solving time = {:.2} sec  (expand = {:.1}%  share = {:.1}%  reduce = {:.1}%)",
    total.as_secs_f64(), pct(times[0], total), pct(times[1], total), pct(times[2], total));
  let best = pool.swap_remove(0);
  Ok(best.to_aig()) }

fn pct(part:Duration, total:Duration)->f64 {
  if total.is_zero() { 0.0 } else { 100.0 * part.as_secs_f64() / total.as_secs_f64() }}


#[cfg(test)]
mod test {
  use super::*;
  use crate::lit::{Lit, O};
  use crate::sim::output_truths;

  fn small()->Params { Params { iters: 20, ..Params::default() }}

  fn truths(aig:&Aig)->Vec<Vec<u64>> {
    output_truths(&Maig::from_aig(aig).unwrap()) }

  #[test] fn test_identity_wire() {
    let mut aig = Aig::new(1);
    let a = aig.input(0);
    aig.output(a);
    let out = rewire(&aig, &small()).unwrap();
    assert_eq!(out.num_ands(), 0);
    assert_eq!(out.outputs(), &[a]); }

  #[test] fn test_self_and_becomes_wire() {
    let mut aig = Aig::new(1);
    let a = aig.input(0);
    let n = aig.and(a, a);
    aig.output(n);
    let out = rewire(&aig, &small()).unwrap();
    assert_eq!(out.num_ands(), 0);
    assert_eq!(out.outputs(), &[a]); }

  #[test] fn test_contradiction_becomes_const() {
    let mut aig = Aig::new(1);
    let a = aig.input(0);
    let n = aig.and(a, !a);
    aig.output(n);
    let out = rewire(&aig, &small()).unwrap();
    assert_eq!(out.num_ands(), 0);
    assert_eq!(out.outputs(), &[O]); }

  #[test] fn test_duplicate_and_merges() {
    let mut aig = Aig::new(2);
    let (a, b) = (aig.input(0), aig.input(1));
    let n1 = aig.and(a, b);
    let n2 = aig.and(n1, n1);
    aig.output(n2);
    let out = rewire(&aig, &small()).unwrap();
    assert_eq!(out.num_ands(), 1);
    assert_eq!(truths(&out), truths(&aig)); }

  #[test] fn test_shared_triple() {
    // both outputs compute a & b & c through different pairings
    let mut aig = Aig::new(3);
    let (a, b, c) = (aig.input(0), aig.input(1), aig.input(2));
    let ab = aig.and(a, b);
    let abc = aig.and(ab, c);
    let bc = aig.and(b, c);
    let abc2 = aig.and(a, bc);
    aig.output(abc);
    aig.output(abc2);
    let out = rewire(&aig, &small()).unwrap();
    assert_eq!(out.num_ands(), 2, "the two cones collapse onto one chain");
    assert_eq!(truths(&out), truths(&aig)); }

  /// a reproducible random graph with no dangling nodes: each new node
  /// takes the previous one as a fanin and a random earlier literal
  fn random_aig(nins:usize, nands:usize, nouts:usize, seed:u64)->Aig {
    let rng = &mut SmallRng::seed_from_u64(seed);
    let mut aig = Aig::new(nins);
    let mut lits:Vec<Lit> = (1..=nins).map(|i| Lit::new(i, false)).collect();
    for _ in 0..nands {
      let l0 = *lits.last().unwrap();
      let l1 = lits[rng.random_range(0..lits.len())];
      let n = aig.and(
        if rng.random_range(0..2) == 0 { l0 } else { !l0 },
        if rng.random_range(0..2) == 0 { l1 } else { !l1 });
      lits.push(n); }
    for k in 0..nouts {
      let l = lits[lits.len() - 1 - k];
      aig.output(l); }
    aig }

  #[test] fn test_random_graph_shrinks_and_verifies() {
    let aig = random_aig(8, 50, 4, 42);
    let want = truths(&aig);
    let out = rewire(&aig, &Params { iters: 30, ..Params::default() }).unwrap();
    assert!(out.num_ands() <= aig.num_ands(), "the rewriter never returns a bigger graph");
    assert_eq!(truths(&out), want, "all 256 minterms agree on every output"); }

  #[test] fn test_best_is_monotone() {
    let aig = random_aig(6, 30, 2, 7);
    let mut bests:Vec<usize> = vec![];
    rewire_with(&aig, &small(), |p| bests.push(p.best)).unwrap();
    for w in bests.windows(2) {
      assert!(w[1] < w[0], "reported bests strictly improve") }}

  #[test] fn test_fixed_seed_reproduces() {
    let aig = random_aig(6, 25, 2, 3);
    let ps = Params { iters: 10, seed: 5, ..Params::default() };
    let out1 = rewire(&aig, &ps).unwrap();
    let out2 = rewire(&aig, &ps).unwrap();
    assert_eq!(out1.num_ands(), out2.num_ands());
    assert_eq!(out1.outputs(), out2.outputs());
    assert_eq!(out1.ands(), out2.ands(), "same seed, same graph"); }
}
