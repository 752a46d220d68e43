//! Multi-input AND graphs.
//!
//! A `Maig` is a single arena of objects indexed by position: object 0 is
//! the constant, then the inputs, then the internal nodes in topological
//! order, then the outputs. Every internal node holds a sorted list of
//! fanin literals and denotes their conjunction; a one-literal list is a
//! buffer (or inverter, through the edge), `[O]` is constant 0 and `[I]`
//! constant 1. Outputs hold exactly one fanin literal.
//!
//! Cross-references are plain integers, so duplication is the unit of
//! structure change: the duplicators at the bottom rebuild a graph in
//! index order, in DFS order (restoring topological order and dropping
//! dangling cones), with structural hashing down to two-input nodes, or
//! split up into multi-input nodes with randomized widths.
use std::fmt;
use std::ops::Range;
use fxhash::FxHashMap;
use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use crate::error::{Error, Result};
use crate::lit::{Lit, O, I};
use crate::aiger::Aig;

#[derive(Clone, Debug)]
pub struct Maig {
  nins: usize,
  nouts: usize,
  nobjs: usize,        // logical object count; fans may hold more (see share)
  fans: Vec<Vec<Lit>>,
  refs: Vec<i32>,
  room: Vec<u32>,      // per-node budget of fanins the expander may still add
}

/// insert keeping the list sorted ascending
fn push_order(v:&mut Vec<Lit>, e:Lit) {
  v.push(e);
  for i in (1..v.len()).rev() {
    if v[i-1] > v[i] { v.swap(i-1, i) } else { break }}}

/// Canonicalize a conjunction of literals: sort, collapse duplicates,
/// drop constant 1, absorb into constant 0 on a complementary pair.
/// The list always stays non-empty.
pub(crate) fn reduce_fanins(v:&mut Vec<Lit>) {
  assert!(!v.is_empty(), "empty fanin list");
  v.sort();
  if v[0] == O { v.truncate(1); return }
  while !v.is_empty() && v[0] == I { v.remove(0); }
  if v.is_empty() { v.push(I); return }
  let mut i = 1;
  while i < v.len() {
    if v[i-1] == !v[i] { v.clear(); v.push(O); return }
    if v[i-1] == v[i] { v.remove(i); } else { i += 1 }}}

impl Maig {

  /// an empty graph: constant plus `nins` inputs, no nodes or outputs yet
  pub fn new(nins:usize, nouts:usize)->Maig {
    Maig { nins, nouts, nobjs: 1 + nins,
           fans: vec![vec![]; 1 + nins],
           refs: vec![0; 1 + nins],
           room: vec![0; 1 + nins] }}

  pub fn num_ins(&self)->usize { self.nins }
  pub fn num_outs(&self)->usize { self.nouts }
  pub fn num_objs(&self)->usize { self.nobjs }
  pub fn num_nodes(&self)->usize { self.nobjs - self.nouts - self.nins - 1 }

  pub fn is_pi(&self, i:usize)->bool { i > 0 && i <= self.nins }
  pub fn is_po(&self, i:usize)->bool { i >= self.nobjs - self.nouts && i < self.nobjs }
  pub fn is_node(&self, i:usize)->bool { i > self.nins && i < self.nobjs - self.nouts }

  /// internal nodes, in index (topological) order
  pub fn nodes(&self)->Range<usize> { 1 + self.nins .. self.nobjs - self.nouts }
  /// the output objects
  pub fn outputs(&self)->Range<usize> { self.nobjs - self.nouts .. self.nobjs }
  /// inputs and internal nodes (everything an expander may wire in)
  pub fn input_nodes(&self)->Range<usize> { 1 .. self.nobjs - self.nouts }
  /// internal nodes and outputs
  pub fn node_outputs(&self)->Range<usize> { 1 + self.nins .. self.nobjs }

  pub fn fanins(&self, i:usize)->&[Lit] { &self.fans[i] }
  pub(crate) fn fanins_mut(&mut self, i:usize)->&mut Vec<Lit> { &mut self.fans[i] }

  pub(crate) fn append_obj(&mut self)->usize {
    let id = self.fans.len();
    self.fans.push(vec![]);
    self.refs.push(0);
    self.room.push(0);
    self.nobjs += 1;
    id }

  pub(crate) fn append_fanin(&mut self, i:usize, l:Lit) { push_order(&mut self.fans[i], l) }

  /// hide the last `k` objects from the logical count (they stay
  /// reachable through fanin literals until the next DFS duplication)
  pub(crate) fn hide_objs(&mut self, k:usize) { self.nobjs -= k }

  /// the two-input AND count this graph lowers to
  pub fn and2_count(&self)->usize {
    self.nodes().map(|i| self.fans[i].len() - 1).sum() }

  // -- reference counting ---

  pub(crate) fn refs(&self, v:usize)->i32 { self.refs[v] }
  pub(crate) fn bump_ref(&mut self, v:usize) { self.refs[v] += 1 }
  pub(crate) fn room(&self, i:usize)->usize { self.room[i] as usize }
  pub(crate) fn take_room(&mut self, i:usize, n:usize) { self.room[i] -= n as u32 }

  fn ref_obj(&mut self, i:usize) {
    for k in 0..self.fans[i].len() { let v = self.fans[i][k].var(); self.refs[v] += 1 }}
  fn deref_obj(&mut self, i:usize) {
    for k in 0..self.fans[i].len() { let v = self.fans[i][k].var(); self.refs[v] -= 1 }}

  /// dereference a node's cone; nodes that lose their last reference are
  /// cleared down to `[O]` so they count nothing when lowered
  fn deref_rec(&mut self, i:usize) {
    for k in 0..self.fans[i].len() {
      let v = self.fans[i][k].var();
      self.refs[v] -= 1;
      if self.refs[v] == 0 && self.is_node(v) {
        self.deref_rec(v);
        self.fans[v].clear();
        self.fans[v].push(O);
        self.ref_obj(v); }}}

  pub(crate) fn init_refs(&mut self) {
    self.refs = vec![0; self.fans.len()];
    for i in self.node_outputs() {
      for k in 0..self.fans[i].len() { let v = self.fans[i][k].var(); self.refs[v] += 1 }}}

  /// recount from scratch and compare; logs any disagreement
  pub(crate) fn verify_refs(&self)->bool {
    let mut count = vec![0i32; self.fans.len()];
    for i in self.node_outputs() {
      for &l in &self.fans[i] { count[l.var()] += 1 }}
    let mut ok = true;
    for i in 0..self.nobjs {
      if count[i] != self.refs[i] {
        error!("ref count of node {} is {} but should be {}", i, self.refs[i], count[i]);
        ok = false; }}
    ok }

  /// rewrite a node in place as a constant, releasing its old cone
  pub(crate) fn collapse_const(&mut self, i:usize, one:bool) {
    self.deref_rec(i);
    self.fans[i].clear();
    self.fans[i].push(if one { I } else { O });
    self.ref_obj(i); }

  /// install a new fanin list for a node, keeping the refs in step
  pub(crate) fn replace_fanins(&mut self, i:usize, lits:&[Lit]) {
    self.deref_obj(i);
    self.fans[i].clear();
    for &l in lits { push_order(&mut self.fans[i], l) }
    self.ref_obj(i); }

  // -- conversions ---

  pub fn from_aig(aig:&Aig)->Result<Maig> {
    let nvars = 1 + aig.num_ins() + aig.num_ands();
    let mut g = Maig::new(aig.num_ins(), aig.num_outs());
    for &(l0, l1) in aig.ands() {
      let id = g.append_obj();
      for &l in &[l0, l1] {
        if l.var() >= id {
          return Err(Error::InvalidAig(format!("fanin {} of node {} not topological", l, id))) }
        g.append_fanin(id, l); }}
    for &l in aig.outputs() {
      if l.var() >= nvars {
        return Err(Error::InvalidAig(format!("output literal {} out of range", l))) }
      let id = g.append_obj();
      g.append_fanin(id, l); }
    Ok(g) }

  /// lower to a two-input AIG by left-folding each fanin list
  pub fn to_aig(&self)->Aig {
    let mut aig = Aig::new(self.nins);
    let mut copy = vec![O; self.nobjs];
    for i in 1..=self.nins { copy[i] = Lit::new(i, false) }
    for i in self.nodes() {
      debug_assert!(!self.fans[i].is_empty());
      let mut cur = self.fans[i][0].map_lit(&copy);
      for &l in &self.fans[i][1..] { cur = aig.and(cur, l.map_lit(&copy)) }
      copy[i] = cur; }
    for po in self.outputs() { aig.output(self.fans[po][0].map_lit(&copy)) }
    aig }

  // -- duplicators ---

  fn mark_rec(&self, seen:&mut Vec<bool>, i:usize) {
    if seen[i] { return }
    seen[i] = true;
    for &l in &self.fans[i] { self.mark_rec(seen, l.var()) }}

  /// mark the constant, inputs, outputs, and every node some output reaches
  fn mark_dfs(&self)->Vec<bool> {
    let mut seen = vec![false; self.fans.len()];
    for i in 0..=self.nins { seen[i] = true }
    for po in self.outputs() { self.mark_rec(&mut seen, self.fans[po][0].var()) }
    for po in self.outputs() { seen[po] = true }
    seen }

  /// copy in index order, optionally dropping nodes no output reaches
  pub fn dup(&self, rem_dangle:bool)->Maig {
    let keep = if rem_dangle { Some(self.mark_dfs()) } else { None };
    let mut new = Maig::new(self.nins, self.nouts);
    let mut copy = vec![0usize; self.nobjs];
    for i in 0..=self.nins { copy[i] = i }
    for i in self.node_outputs() {
      debug_assert!(!self.fans[i].is_empty());
      if let Some(seen) = &keep { if !seen[i] { continue }}
      let id = new.append_obj();
      copy[i] = id;
      for &l in &self.fans[i] { new.append_fanin(id, l.map_var(&copy)) }}
    new }

  fn dup_dfs_rec(&self, new:&mut Maig, copy:&mut Vec<Option<Lit>>, active:&mut Vec<bool>, i:usize)->Result<()> {
    if copy[i].is_some() { return Ok(()) }
    if active[i] {
      return Err(Error::InvalidAig(format!("combinational loop through node {}", i))) }
    active[i] = true;
    for k in 0..self.fans[i].len() {
      self.dup_dfs_rec(new, copy, active, self.fans[i][k].var())?; }
    debug_assert!(!self.fans[i].is_empty());
    let id = new.append_obj();
    for &l in &self.fans[i] {
      let c = copy[l.var()].expect("fanin mapped before its node");
      new.append_fanin(id, Lit::new(c.var(), c.is_inv() ^ l.is_inv())); }
    copy[i] = Some(Lit::new(id, false));
    active[i] = false;
    Ok(()) }

  /// Rebuild in DFS order from the outputs. Restores topological order
  /// when nodes are listed out of place (extraction parks new nodes past
  /// the outputs) and silently drops unreachable cones. A cycle is an
  /// `InvalidAig` error.
  pub fn dup_dfs(&self)->Result<Maig> {
    let n = self.fans.len();
    let mut new = Maig::new(self.nins, self.nouts);
    let mut copy:Vec<Option<Lit>> = vec![None; n];
    let mut active = vec![false; n];
    for i in 0..=self.nins { copy[i] = Some(Lit::new(i, false)) }
    for po in self.outputs() {
      self.dup_dfs_rec(&mut new, &mut copy, &mut active, self.fans[po][0].var())?; }
    for po in self.outputs() {
      let l = self.fans[po][0];
      let c = copy[l.var()].expect("output cone mapped");
      let id = new.append_obj();
      new.append_fanin(id, Lit::new(c.var(), c.is_inv() ^ l.is_inv())); }
    Ok(new) }

  /// Lower to two-input nodes with constant propagation and structural
  /// hashing, then prune whatever became unreachable.
  pub fn dup_strash(&self)->Maig {
    let mut new = Maig::new(self.nins, self.nouts);
    let mut table:FxHashMap<(Lit, Lit), Lit> = FxHashMap::default();
    let mut copy = vec![O; self.nobjs];
    for i in 1..=self.nins { copy[i] = Lit::new(i, false) }
    for i in self.nodes() {
      debug_assert!(!self.fans[i].is_empty());
      let mut cur = self.fans[i][0].map_lit(&copy);
      for &l in &self.fans[i][1..] { cur = build_and(&mut new, &mut table, cur, l.map_lit(&copy)) }
      copy[i] = cur; }
    for po in self.outputs() {
      let l = self.fans[po][0].map_lit(&copy);
      let id = new.append_obj();
      new.append_fanin(id, l); }
    new.dup(true) }

  fn stop_counts(&self)->Vec<i32> {
    let mut stops = vec![0i32; self.nobjs];
    for i in 0..=self.nins { stops[i] = 2 }
    for i in self.nodes() {
      debug_assert_eq!(self.fans[i].len(), 2, "splitter wants a two-input graph");
      for &l in &self.fans[i] { stops[l.var()] += 1 + l.is_inv() as i32 }}
    for po in self.outputs() { stops[self.fans[po][0].var()] += 2 }
    stops }

  fn collect_super(&self, l:Lit, stops:&[i32], copy:&[Lit], out:&mut Vec<Lit>) {
    if stops[l.var()] > 1 { out.push(l.map_lit(copy)) }
    else {
      debug_assert!(!l.is_inv(), "pass-through edge must be positive");
      self.collect_super(self.fans[l.var()][0], stops, copy, out);
      self.collect_super(self.fans[l.var()][1], stops, copy, out); }}

  /// Regroup a two-input graph into multi-input nodes. A node referenced
  /// exactly once through a positive edge dissolves into its parent's
  /// list; every other node gathers the frontier of such chains. Lists
  /// wider than a per-node random cap cascade into a chain, and each new
  /// node is granted a random expansion budget.
  pub fn dup_multi(&self, fanin_max:usize, growth:usize, rng:&mut SmallRng)->Maig {
    assert!(fanin_max >= 2 && growth >= 1);
    let stops = self.stop_counts();
    let mut new = Maig::new(self.nins, self.nouts);
    let mut copy = vec![O; self.nobjs];
    for i in 0..=self.nins { copy[i] = Lit::new(i, false) }
    let mut bucket:Vec<Lit> = vec![];
    for i in self.nodes() {
      if stops[i] == 1 { continue }
      debug_assert!(stops[i] > 1, "dangling node {}", i);
      bucket.clear();
      self.collect_super(self.fans[i][0], &stops, &copy, &mut bucket);
      self.collect_super(self.fans[i][1], &stops, &copy, &mut bucket);
      debug_assert!(bucket.len() > 1);
      reduce_fanins(&mut bucket);
      copy[i] = if bucket.len() == 1 { bucket[0] }
      else {
        let local = 2 + rng.random_range(0..fanin_max - 1);
        let grow = 1 + rng.random_range(0..growth);
        if bucket.len() > local { bucket.shuffle(rng) }
        while bucket.len() > local {
          let id = new.append_obj();
          for &l in &bucket[..local] { new.append_fanin(id, l) }
          new.room[id] = grow as u32;
          bucket.drain(..local);
          bucket.push(Lit::new(id, false)); }
        let id = new.append_obj();
        for &l in &bucket { new.append_fanin(id, l) }
        new.room[id] = grow as u32;
        Lit::new(id, false) }}
    for po in self.outputs() {
      let l = self.fans[po][0].map_lit(&copy);
      let id = new.append_obj();
      new.append_fanin(id, l); }
    new }
}

/// two-input AND with constant propagation and table lookup
fn build_and(new:&mut Maig, table:&mut FxHashMap<(Lit, Lit), Lit>, l0:Lit, l1:Lit)->Lit {
  if l0 == O || l1 == O || l0 == !l1 { return O }
  if l0 == l1 || l1 == I { return l0 }
  if l0 == I { return l1 }
  let key = if l0 < l1 { (l0, l1) } else { (l1, l0) };
  if let Some(&l) = table.get(&key) { return l }
  let id = new.append_obj();
  new.append_fanin(id, key.0);
  new.append_fanin(id, key.1);
  let l = Lit::new(id, false);
  table.insert(key, l);
  l }

impl fmt::Display for Maig {
  fn fmt(&self, f:&mut fmt::Formatter)->fmt::Result {
    writeln!(f, "maig: {} ins, {} outs, {} nodes, {} and2", self.nins, self.nouts, self.num_nodes(), self.and2_count())?;
    for i in self.nodes() {
      write!(f, "  node {} {{", i)?;
      for &l in &self.fans[i] { write!(f, " {}", l)? }
      writeln!(f, " }}")?; }
    for po in self.outputs() { writeln!(f, "  po {} <- {}", po, self.fans[po][0])? }
    Ok(()) }}


#[cfg(test)]
mod test {
  use super::*;
  use rand::SeedableRng;

  fn lits(codes:&[u32])->Vec<Lit> { codes.iter().map(|&c| Lit::from_code(c)).collect() }

  #[test] fn test_reduce_fanins() {
    let mut v = lits(&[7, 4, 4]);
    reduce_fanins(&mut v);
    assert_eq!(v, lits(&[4, 7]), "sorted, duplicate dropped");
    let mut v = lits(&[4, 5, 9]);
    reduce_fanins(&mut v);
    assert_eq!(v, lits(&[0]), "complement pair collapses to O");
    let mut v = lits(&[1, 1, 6]);
    reduce_fanins(&mut v);
    assert_eq!(v, lits(&[6]), "constant 1 drops out");
    let mut v = lits(&[1, 1]);
    reduce_fanins(&mut v);
    assert_eq!(v, lits(&[1]), "all-ones list is constant 1");
    let mut v = lits(&[0, 6, 9]);
    reduce_fanins(&mut v);
    assert_eq!(v, lits(&[0]), "constant 0 absorbs"); }

  fn two_and_tree()->Aig {
    // (a & b) twice, fed to one output
    let mut aig = Aig::new(2);
    let (a, b) = (aig.input(0), aig.input(1));
    let n1 = aig.and(a, b);
    let n2 = aig.and(n1, n1);
    aig.output(n2);
    aig }

  #[test] fn test_from_to_aig() {
    let aig = two_and_tree();
    let g = Maig::from_aig(&aig).unwrap();
    assert_eq!(g.num_nodes(), 2);
    assert_eq!(g.and2_count(), 2);
    let back = g.to_aig();
    assert_eq!(back.num_ands(), 2);
    assert_eq!(back.outputs(), aig.outputs()); }

  #[test] fn test_strash_collapses_twins() {
    let g = Maig::from_aig(&two_and_tree()).unwrap();
    let s = g.dup_strash();
    assert_eq!(s.and2_count(), 1, "and(x,x) folds into x, twin and is shared");
    assert_eq!(s.fanins(s.outputs().start)[0], Lit::new(3, false)); }

  #[test] fn test_strash_idempotent() {
    let mut aig = Aig::new(3);
    let (a, b, c) = (aig.input(0), aig.input(1), aig.input(2));
    let ab = aig.and(a, !b);
    let abc = aig.and(ab, c);
    aig.output(abc); aig.output(!ab);
    let s1 = Maig::from_aig(&aig).unwrap().dup_strash();
    let s2 = s1.dup_strash();
    assert_eq!(s1.num_objs(), s2.num_objs());
    assert_eq!(s1.and2_count(), s2.and2_count()); }

  #[test] fn test_dup_dfs_restores_order() {
    let mut aig = Aig::new(2);
    let (a, b) = (aig.input(0), aig.input(1));
    let n = aig.and(a, b);
    aig.output(n);
    let g = Maig::from_aig(&aig).unwrap();
    let d = g.dup_dfs().unwrap();
    assert_eq!(d.num_objs(), g.num_objs());
    for i in d.nodes() {
      for &l in d.fanins(i) { assert!(l.var() < i, "topological order") }}}

  #[test] fn test_dup_prunes_dangling() {
    let mut aig = Aig::new(2);
    let (a, b) = (aig.input(0), aig.input(1));
    let n1 = aig.and(a, b);
    let _dead = aig.and(a, !b);
    aig.output(n1);
    let g = Maig::from_aig(&aig).unwrap();
    assert_eq!(g.num_nodes(), 2);
    assert_eq!(g.dup(true).num_nodes(), 1, "unreferenced node dropped"); }

  #[test] fn test_multi_split() {
    // chain a & b & c & d as three two-input ands
    let mut aig = Aig::new(4);
    let (a, b, c, d) = (aig.input(0), aig.input(1), aig.input(2), aig.input(3));
    let n1 = aig.and(a, b);
    let n2 = aig.and(n1, c);
    let n3 = aig.and(n2, d);
    aig.output(n3);
    let g = Maig::from_aig(&aig).unwrap();
    let rng = &mut SmallRng::seed_from_u64(1);
    let m = g.dup_multi(4, 3, rng);
    assert_eq!(m.and2_count(), 3, "regrouping keeps the two-input count");
    let total:usize = m.nodes().map(|i| m.fanins(i).len()).sum();
    assert_eq!(total, 3 + m.num_nodes(), "chain gathered into wider lists");
    for i in m.nodes() {
      let f = m.fanins(i);
      let mut sorted = f.to_vec(); sorted.sort();
      assert_eq!(f, &sorted[..], "fanin lists stay sorted"); }}

  #[test] fn test_refs() {
    let mut aig = Aig::new(2);
    let (a, b) = (aig.input(0), aig.input(1));
    let n1 = aig.and(a, b);
    let n2 = aig.and(n1, b);
    aig.output(n2);
    let mut g = Maig::from_aig(&aig).unwrap();
    g.init_refs();
    assert!(g.verify_refs());
    assert_eq!(g.refs(b.var()), 2);
    assert_eq!(g.refs(n1.var()), 1); }
}
