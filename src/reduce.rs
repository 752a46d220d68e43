//! Fanin reduction: shrink each node's conjunction to a minimal subset
//! that agrees with it on the care set, then lower back to hashed
//! two-input nodes.
use rand::rngs::SmallRng;
use crate::error::Result;
use crate::expand::random_order;
use crate::lit::Lit;
use crate::maig::Maig;
use crate::sim::Sim;
use crate::tt;

/// Rewrite a node as a constant if the care set never observes it.
/// Returns true when the node was collapsed (the cone is already
/// re-simulated and verified in that case).
pub(crate) fn check_const(g:&mut Maig, sim:&mut Sim, target:usize)->Result<bool> {
  let zero = !tt::intersect_c(sim.care(), sim.func(target), false);
  let one = !zero && !tt::intersect_c(sim.care(), sim.func(target), true);
  if zero || one {
    debug!("node {} is constant {} on its care set", target, one as u32);
    g.collapse_const(target, one);
    sim.update(g)?;
    return Ok(true) }
  Ok(false) }

/// Reduce every node in random order and canonicalize the survivors.
pub fn reduce(mut g:Maig, rng:&mut SmallRng)->Result<Maig> {
  let order = random_order(&g, rng);
  let mut sim = Sim::new(&g);
  g.init_refs();
  for i in order { reduce_one(&mut g, &mut sim, i)?; }
  debug_assert!(g.verify_refs());
  Ok(g.dup_strash()) }

fn reduce_one(g:&mut Maig, sim:&mut Sim, target:usize)->Result<usize> {
  let nfans = g.fanins(target).len();
  sim.compute_care(g, target);
  if check_const(g, sim, target)? { return Ok(nfans) }
  if nfans == 1 { return Ok(0) }
  // a single fanin that matches on care replaces the whole conjunction
  for k in 0..nfans {
    let l = g.fanins(target)[k];
    sim.sim_lits(&[l]);
    if tt::equal_on_care(sim.care(), sim.func(target), sim.prod()) {
      debug!("node {} reduced to a buffer of {}", target, l);
      g.replace_fanins(target, &[l]);
      sim.update(g)?;
      return Ok(nfans - 1) }}
  // order fanins by external reference count, then drop from the back;
  // high-fanout fanins survive, cheap private cones go first
  let mut keep:Vec<Lit> = Vec::with_capacity(nfans);
  for bucket in [3, 2, 1] {
    for &l in g.fanins(target) {
      let r = g.refs(l.var());
      if (bucket == 3 && r > 2) || (bucket < 3 && r == bucket) { keep.push(l) }}}
  debug_assert_eq!(keep.len(), nfans);
  let mut n = keep.len();
  while n > 0 {
    n -= 1;
    let l = keep.remove(n);
    sim.sim_lits(&keep);
    if !tt::equal_on_care(sim.care(), sim.func(target), sim.prod()) { keep.push(l) }}
  assert!(!keep.is_empty());
  if keep.len() < nfans {
    debug!("node {} fanin count {} -> {}", target, nfans, keep.len());
    g.replace_fanins(target, &keep);
    sim.update(g)?;
    return Ok(nfans - keep.len()) }
  Ok(0) }
