//! Shared logic extraction: pull fanin pairs that several conjunctions
//! repeat into fresh two-input nodes.
//!
//! Each extraction of a pair used k times trades k pair occurrences for
//! one new node, saving k-1 two-input ANDs once the graph is lowered.
use std::ops::Range;
use fxhash::FxHashMap;
use crate::error::Result;
use crate::lit::Lit;
use crate::maig::Maig;

/// pair occurrence counts, first-seen order preserved for tie-breaks
struct Pairs {
  list: Vec<(Lit, Lit, u32)>,
  index: FxHashMap<(Lit, Lit), usize>,
}

impl Pairs {
  fn count(g:&Maig, nodes:Range<usize>)->Pairs {
    let mut p = Pairs { list: vec![], index: FxHashMap::default() };
    for i in nodes {
      let fans = g.fanins(i);
      for f1 in 0..fans.len() {
        for f2 in f1+1..fans.len() {
          let key = (fans[f1], fans[f2]);
          debug_assert!(key.0 < key.1, "fanin lists are sorted and duplicate-free");
          match p.index.get(&key) {
            Some(&k) => p.list[k].2 += 1,
            None => {
              p.index.insert(key, p.list.len());
              p.list.push((key.0, key.1, 1)); }}}}}
    p }

  /// the first pair with the highest count, if any pair repeats
  fn best(&self)->Option<(Lit, Lit, u32)> {
    let mut best:Option<(Lit, Lit, u32)> = None;
    for &e in &self.list {
      if e.2 >= 2 && best.map_or(true, |b| e.2 > b.2) { best = Some(e) }}
    best }}

/// replace the pair inside one fanin list, if present
fn rewrite_list(fans:&mut Vec<Lit>, f1:Lit, f2:Lit, l:Lit)->usize {
  let p1 = fans.iter().position(|&x| x == f1);
  let p2 = fans.iter().position(|&x| x == f2);
  if let (Some(p1), Some(p2)) = (p1, p2) {
    debug_assert!(p1 < p2);
    fans.remove(p2);
    fans.remove(p1);
    // the new node has the highest index, so pushing keeps the sort
    fans.push(l);
    1 }
  else { 0 }}

/// Extract up to `divs` best repeated pairs. New nodes are appended past
/// the output block and rewoven into place by a DFS rebuild at the end.
pub fn share(mut g:Maig, divs:usize)->Result<Maig> {
  let base_nodes = g.nodes();
  let mut extracted = 0;
  for _ in 0..divs {
    let pairs = Pairs::count(&g, base_nodes.clone());
    let best = pairs.best();
    let Some((f1, f2, count)) = best else { break };
    let id = g.append_obj();
    g.append_fanin(id, f1);
    g.append_fanin(id, f2);
    let l = Lit::new(id, false);
    let mut hits = 0;
    for i in base_nodes.clone() { hits += rewrite_list(g.fanins_mut(i), f1, f2, l) }
    debug_assert_eq!(hits, count as usize);
    debug!("extracted pair ({}, {}) used {} times as node {}", f1, f2, count, id);
    extracted += 1; }
  if extracted == 0 { return Ok(g) }
  g.hide_objs(extracted);
  g.dup_dfs() }


#[cfg(test)]
mod test {
  use super::*;
  use crate::aiger::Aig;
  use crate::sim::output_truths;

  /// two outputs, each a three-literal conjunction of a, b, c
  fn two_paths()->Maig {
    let mut g = Maig::new(3, 2);
    let lits = [Lit::new(1, false), Lit::new(2, false), Lit::new(3, false)];
    let n1 = g.append_obj();
    for &l in &lits { g.append_fanin(n1, l) }
    let n2 = g.append_obj();
    for &l in &lits { g.append_fanin(n2, l) }
    let p1 = g.append_obj();
    g.append_fanin(p1, Lit::new(n1, false));
    let p2 = g.append_obj();
    g.append_fanin(p2, Lit::new(n2, false));
    g }

  #[test] fn test_share_extracts_pair() {
    let g = two_paths();
    let want = output_truths(&g);
    assert_eq!(g.and2_count(), 4);
    let s = share(g, 4).unwrap();
    assert_eq!(output_truths(&s), want, "extraction preserves the outputs");
    assert!(s.and2_count() < 4, "a repeated pair was extracted");
    let out = s.dup_strash();
    assert_eq!(out.and2_count(), 2, "both cones share one pair node"); }

  #[test] fn test_share_counts_savings() {
    let g = two_paths();
    let before = g.and2_count();
    let s = share(g, 1).unwrap();
    assert!(before - s.and2_count() >= 1, "a pair used twice saves at least one and"); }

  #[test] fn test_share_nothing_to_do() {
    let mut aig = Aig::new(2);
    let (a, b) = (aig.input(0), aig.input(1));
    let n = aig.and(a, b);
    aig.output(n);
    let g = Maig::from_aig(&aig).unwrap();
    let s = share(g, 4).unwrap();
    assert_eq!(s.and2_count(), 1, "a single pair occurrence is left alone"); }
}
