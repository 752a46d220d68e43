//! Fanin expansion: AND extra literals into nodes wherever the care set
//! cannot tell the difference.
//!
//! A literal can join a node's conjunction exactly when it already holds
//! everywhere the node must be 1 (the onset restricted to the care set).
//! The additions are useless on their own, but they hand the sharing and
//! reduction passes more material to work with.
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use crate::error::Result;
use crate::lit::Lit;
use crate::maig::Maig;
use crate::reduce::check_const;
use crate::sim::Sim;
use crate::tt;

/// randomized node visit order, shared with the reduce pass
pub(crate) fn random_order(g:&Maig, rng:&mut SmallRng)->Vec<usize> {
  let mut order:Vec<usize> = g.nodes().collect();
  order.shuffle(rng);
  order }

/// Expand nodes in random order until `limit` fanins were added, then
/// rebuild in DFS order (collapsed cones drop out here).
pub fn expand(mut g:Maig, limit:usize, rng:&mut SmallRng)->Result<Maig> {
  assert!(limit > 0);
  let order = random_order(&g, rng);
  let mut sim = Sim::new(&g);
  g.init_refs();
  let mut added = 0;
  for i in order {
    let cap = g.room(i).min(limit - added);
    if cap == 0 { continue }
    added += expand_one(&mut g, &mut sim, i, cap, rng)?;
    if added >= limit { break }}
  debug_assert!(g.verify_refs());
  g.dup_dfs() }

fn expand_one(g:&mut Maig, sim:&mut Sim, target:usize, cap:usize, rng:&mut SmallRng)->Result<usize> {
  sim.compute_care(g, target);
  if check_const(g, sim, target)? { return Ok(0) }
  // candidates: inputs, and referenced multi-input nodes outside the
  // target's fanout cone (a cone member would close a cycle)
  let mut banned = vec![false; g.num_objs()];
  for &l in g.fanins(target) { banned[l.var()] = true }
  let mut cands:Vec<usize> = g.input_nodes()
    .filter(|&i| !sim.in_tfo(i) && !banned[i]
      && (g.is_pi(i) || (g.fanins(i).len() > 1 && g.refs(i) > 0)))
    .collect();
  cands.shuffle(rng);
  let mut onset = sim.func(target).to_vec();
  tt::sharp(&mut onset, sim.care(), false);
  let mut added = 0;
  for c in cands {
    for n in 0..2 {
      if !tt::intersect_c(&onset, sim.func(c), n == 0) {
        debug!("adding fanin {} to node {}", Lit::new(c, n == 1), target);
        g.append_fanin(target, Lit::new(c, n == 1));
        g.bump_ref(c);
        added += 1;
        break; }}
    if added == cap { break }}
  g.take_room(target, added);
  sim.update(g)?;
  Ok(added) }
