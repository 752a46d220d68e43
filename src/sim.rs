//! Truth-table simulation over the full input space.
//!
//! Every object owns three table rows: `cur` holds its function, `alt`
//! holds the perturbed function while a care set is being computed, and
//! `gold` holds the output snapshot taken at construction. The snapshot is
//! never written again; after each rewrite the affected cone is
//! re-simulated and the outputs are checked against it.
//!
//! Which of `cur`/`alt` is live for an object is an explicit per-object
//! flag: `in_alt[i]` is set exactly while `i` sits in the transitive
//! fanout of the node whose care set is under construction.
use crate::error::{Error, Result};
use crate::lit::Lit;
use crate::maig::Maig;
use crate::tt;

pub struct Sim {
  nwords: usize,
  cur: Vec<u64>,
  alt: Vec<u64>,
  gold: Vec<u64>,
  care: Vec<u64>,
  prod: Vec<u64>,
  tmp: Vec<u64>,
  in_alt: Vec<bool>,
  mark: Vec<u32>,
  stamp: u32,
  tfo: Vec<usize>,
}

impl Sim {

  /// allocate the tables and simulate the whole graph once
  pub fn new(g:&Maig)->Sim {
    let nwords = tt::word_count(g.num_ins());
    let n = g.num_objs();
    debug!("simulating {} objects, {} words per table", n, nwords);
    let mut sim = Sim {
      nwords,
      cur: vec![0; nwords*n], alt: vec![0; nwords*n], gold: vec![0; nwords*n],
      care: vec![0; nwords], prod: vec![0; nwords], tmp: vec![0; nwords],
      in_alt: vec![false; n], mark: vec![0; n], stamp: 0, tfo: vec![] };
    for i in 1..=g.num_ins() {
      tt::var_init(&mut sim.cur[i*nwords..(i+1)*nwords], i-1) }
    for i in g.node_outputs() { sim.sim_node(g, i) }
    for po in g.outputs() {
      debug_assert_eq!(g.fanins(po).len(), 1, "output {} has one fanin", po);
      sim.gold[po*nwords..(po+1)*nwords]
        .copy_from_slice(&sim.cur[po*nwords..(po+1)*nwords]); }
    sim }

  /// the function of object i (the unperturbed table)
  pub fn func(&self, i:usize)->&[u64] { &self.cur[i*self.nwords..(i+1)*self.nwords] }
  /// the snapshot taken for output object i at construction
  pub fn gold(&self, i:usize)->&[u64] { &self.gold[i*self.nwords..(i+1)*self.nwords] }
  pub fn care(&self)->&[u64] { &self.care }
  pub fn prod(&self)->&[u64] { &self.prod }
  /// is i inside the cone of the current care session?
  pub fn in_tfo(&self, i:usize)->bool { self.in_alt[i] }
  /// the cone of the current care session, target first, topological
  pub fn tfo(&self)->&[usize] { &self.tfo }

  /// AND the fanin literals of node i into its live table row
  fn sim_node(&mut self, g:&Maig, i:usize) {
    let nw = self.nwords;
    for (k, &l) in g.fanins(i).iter().enumerate() {
      let v = l.var();
      let src = if self.in_alt[v] { &self.alt[v*nw..(v+1)*nw] } else { &self.cur[v*nw..(v+1)*nw] };
      if k == 0 { tt::copy_c(&mut self.tmp, src, l.is_inv()) }
      else { tt::sharp(&mut self.tmp, src, l.is_inv()) }}
    if self.in_alt[i] { self.alt[i*nw..(i+1)*nw].copy_from_slice(&self.tmp) }
    else { self.cur[i*nw..(i+1)*nw].copy_from_slice(&self.tmp) }}

  /// AND an arbitrary literal list into the product scratch table
  pub fn sim_lits(&mut self, lits:&[Lit]) {
    debug_assert!(!lits.is_empty());
    let nw = self.nwords;
    for (k, &l) in lits.iter().enumerate() {
      let src = &self.cur[l.var()*nw..(l.var()+1)*nw];
      if k == 0 { tt::copy_c(&mut self.prod, src, l.is_inv()) }
      else { tt::sharp(&mut self.prod, src, l.is_inv()) }}}

  fn tfo_rec(g:&Maig, mark:&mut [u32], stamp:u32, tfo:&mut Vec<usize>, i:usize)->bool {
    if mark[i] == stamp { return true }
    if mark[i] == stamp-1 { return false }
    let mut hit = false;
    for &l in g.fanins(i) {
      let r = Self::tfo_rec(g, mark, stamp, tfo, l.var());
      hit = hit || r; }
    mark[i] = stamp - 1 + hit as u32;
    if hit { tfo.push(i) }
    hit }

  /// Compute the observability care set of `target` into `care`.
  ///
  /// The target's `alt` row gets its complemented function, the cone above
  /// it is re-simulated into `alt` rows, and every input pattern where some
  /// output changed joins the care set. The cone stays flagged until
  /// `update` runs (or the next care session replaces it).
  pub fn compute_care(&mut self, g:&Maig, target:usize) {
    debug_assert!(g.is_node(target));
    for k in 0..self.tfo.len() { let i = self.tfo[k]; self.in_alt[i] = false }
    self.tfo.clear();
    self.stamp += 2;
    self.mark[target] = self.stamp;
    self.tfo.push(target);
    for i in 0..=g.num_ins() { self.mark[i] = self.stamp - 1 }
    let mut tfo = std::mem::take(&mut self.tfo);
    for po in g.outputs() { Self::tfo_rec(g, &mut self.mark, self.stamp, &mut tfo, po); }
    self.tfo = tfo;
    for k in 0..self.tfo.len() { let i = self.tfo[k]; self.in_alt[i] = true }
    let nw = self.nwords;
    tt::copy_c(&mut self.alt[target*nw..(target+1)*nw],
               &self.cur[target*nw..(target+1)*nw], true);
    tt::fill(&mut self.care, false);
    let tfo = std::mem::take(&mut self.tfo);
    for &i in tfo.iter().skip(1) {
      self.sim_node(g, i);
      if g.is_po(i) {
        tt::or_xor(&mut self.care, &self.cur[i*nw..(i+1)*nw], &self.alt[i*nw..(i+1)*nw]); }}
    self.tfo = tfo; }

  /// Re-simulate the current cone into the live tables after a rewrite and
  /// check every output in it against the golden snapshot.
  pub fn update(&mut self, g:&Maig)->Result<()> {
    let tfo = std::mem::take(&mut self.tfo);
    for &i in &tfo { self.in_alt[i] = false }
    let mut res = Ok(());
    for &i in &tfo {
      self.sim_node(g, i);
      if g.is_po(i) && !tt::equal(self.gold(i), self.func(i)) {
        let out = i - (g.num_objs() - g.num_outs());
        debug!("output {} diverged after updating node {}", out, tfo[0]);
        res = Err(Error::SimulationMismatch { output: out });
        break; }}
    self.tfo = tfo;
    res }
}

/// truth tables of every output, in order
pub fn output_truths(g:&Maig)->Vec<Vec<u64>> {
  let sim = Sim::new(g);
  g.outputs().map(|po| sim.func(po).to_vec()).collect() }


#[cfg(test)]
mod test {
  use super::*;
  use crate::aiger::Aig;

  const A:u64 = 0xAAAA_AAAA_AAAA_AAAA;
  const B:u64 = 0xCCCC_CCCC_CCCC_CCCC;
  const C:u64 = 0xF0F0_F0F0_F0F0_F0F0;

  fn chain3()->Maig {
    // n1 = a & b, n2 = n1 & c, single output n2
    let mut aig = Aig::new(3);
    let (a, b, c) = (aig.input(0), aig.input(1), aig.input(2));
    let n1 = aig.and(a, b);
    let n2 = aig.and(n1, c);
    aig.output(n2);
    Maig::from_aig(&aig).unwrap() }

  #[test] fn test_sim() {
    let g = chain3();
    let sim = Sim::new(&g);
    assert_eq!(sim.func(1), &[A]);
    assert_eq!(sim.func(4), &[A & B]);
    assert_eq!(sim.func(5), &[A & B & C]);
    let po = g.outputs().start;
    assert_eq!(sim.func(po), sim.gold(po), "snapshot equals the initial function"); }

  #[test] fn test_inverted_fanin() {
    let mut aig = Aig::new(2);
    let (a, b) = (aig.input(0), aig.input(1));
    let n = aig.and(a, !b);
    aig.output(!n);
    let g = Maig::from_aig(&aig).unwrap();
    let truths = output_truths(&g);
    assert_eq!(truths[0], vec![!(A & !B)]); }

  #[test] fn test_care() {
    let g = chain3();
    let mut sim = Sim::new(&g);
    sim.compute_care(&g, 4);
    assert_eq!(sim.care(), &[C], "n1 is observable only where c holds");
    assert!(sim.in_tfo(4));
    assert!(sim.in_tfo(5));
    assert!(!sim.in_tfo(1));
    assert_eq!(sim.tfo()[0], 4, "cone starts at the target");
    sim.compute_care(&g, 5);
    assert_eq!(sim.care(), &[!0u64], "n2 feeds the output directly");
    assert!(!sim.in_tfo(4), "previous session retired"); }

  #[test] fn test_update_checks_outputs() {
    let mut g = chain3();
    let mut sim = Sim::new(&g);
    g.init_refs();
    // dropping b from n1 changes n1 off the care set only when c is low,
    // so the outputs still match the snapshot
    sim.compute_care(&g, 4);
    let care = sim.care().to_vec();
    assert_eq!(care, vec![C]);
    sim.compute_care(&g, 4);
    g.replace_fanins(4, &[Lit::new(1, false), Lit::new(2, false), Lit::new(3, false)]);
    assert!(sim.update(&g).is_ok(), "adding c to n1 is invisible at the output");
    assert_eq!(sim.func(4), &[A & B & C]); }

  #[test] fn test_update_catches_breakage() {
    let mut g = chain3();
    let mut sim = Sim::new(&g);
    g.init_refs();
    sim.compute_care(&g, 4);
    g.replace_fanins(4, &[Lit::new(3, false)]);
    let err = sim.update(&g).unwrap_err();
    match err {
      Error::SimulationMismatch { output } => assert_eq!(output, 0),
      other => panic!("expected a mismatch, got {:?}", other) }}

  #[test] fn test_sim_lits() {
    let g = chain3();
    let mut sim = Sim::new(&g);
    sim.sim_lits(&[Lit::new(1, false), Lit::new(2, true)]);
    assert_eq!(sim.prod(), &[A & !B]); }
}
