//! Two-input AIGs and the binary AIGER file format.
//!
//! Objects are numbered like everywhere else in this crate: 0 is the
//! constant, 1..=nins are the inputs, and the ANDs follow in topological
//! order. Only combinational files are handled (the latch count must be 0).
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use crate::error::{Error, Result};
use crate::lit::Lit;

/// A plain and-inverter graph: a list of two-input ANDs plus output literals.
#[derive(Clone, Debug, Default)]
pub struct Aig {
  nins: usize,
  ands: Vec<(Lit, Lit)>,
  outs: Vec<Lit>,
}

impl Aig {
  pub fn new(nins:usize)->Aig { Aig { nins, ands: vec![], outs: vec![] }}

  pub fn num_ins(&self)->usize { self.nins }
  pub fn num_outs(&self)->usize { self.outs.len() }
  pub fn num_ands(&self)->usize { self.ands.len() }
  pub fn ands(&self)->&[(Lit, Lit)] { &self.ands }
  pub fn outputs(&self)->&[Lit] { &self.outs }

  /// literal of input i (zero-based)
  pub fn input(&self, i:usize)->Lit {
    assert!(i < self.nins, "input {} of {}", i, self.nins);
    Lit::new(1+i, false) }

  /// append a two-input AND and return its literal
  pub fn and(&mut self, l0:Lit, l1:Lit)->Lit {
    let id = 1 + self.nins + self.ands.len();
    debug_assert!(l0.var() < id && l1.var() < id, "fanin out of order");
    self.ands.push(if l0 < l1 { (l0, l1) } else { (l1, l0) });
    Lit::new(id, false) }

  pub fn output(&mut self, l:Lit) { self.outs.push(l) }

  /// log the M I O A header counts
  pub fn log_stats(&self, name:&str) {
    info!("{}: ins = {}  outs = {}  ands = {}", name, self.nins, self.outs.len(), self.ands.len()); }

  /// Read a binary AIGER file. Latches are not supported.
  pub fn read(path:&str)->Result<Aig> {
    let mut r = BufReader::new(File::open(path)?);
    let header = read_line(&mut r)?;
    let fields:Vec<&str> = header.split_whitespace().collect();
    if fields.len() != 6 || fields[0] != "aig" {
      return Err(Error::InvalidAig(format!("bad header {:?} in {}", header, path))) }
    let nums:Vec<usize> = fields[1..].iter()
      .map(|s| s.parse().map_err(|_| Error::InvalidAig(format!("bad header number {:?}", s))))
      .collect::<Result<_>>()?;
    let (m, i, l, o, a) = (nums[0], nums[1], nums[2], nums[3], nums[4]);
    if l != 0 { return Err(Error::InvalidAig(format!("{} has {} latches", path, l))) }
    if m != i + a { return Err(Error::InvalidAig(format!("header M={} != I={} + A={}", m, i, a))) }
    let mut aig = Aig::new(i);
    for _ in 0..o {
      let line = read_line(&mut r)?;
      let code:u32 = line.trim().parse()
        .map_err(|_| Error::InvalidAig(format!("bad output literal {:?}", line)))?;
      if code as usize > 2*m + 1 {
        return Err(Error::InvalidAig(format!("output literal {} exceeds 2M+1", code))) }
      aig.outs.push(Lit::from_code(code)); }
    for k in 0..a {
      let lhs = 2*(1 + i + k) as u32;
      let d0 = read_delta(&mut r)?;
      let d1 = read_delta(&mut r)?;
      if d0 == 0 || d0 > lhs || d1 > lhs - d0 {
        return Err(Error::InvalidAig(format!("bad delta pair at and {}", k))) }
      let rhs0 = lhs - d0;
      let rhs1 = rhs0 - d1;
      aig.ands.push((Lit::from_code(rhs1), Lit::from_code(rhs0))); }
    Ok(aig) }

  /// Write in binary AIGER format.
  pub fn write(&self, path:&str)->Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let (i, a) = (self.nins, self.ands.len());
    writeln!(w, "aig {} {} 0 {} {}", i + a, i, self.outs.len(), a)?;
    for &out in &self.outs { writeln!(w, "{}", out.code())? }
    for (k, &(lo, hi)) in self.ands.iter().enumerate() {
      let lhs = 2*(1 + i + k) as u32;
      write_delta(&mut w, lhs - hi.code())?;
      write_delta(&mut w, hi.code() - lo.code())?; }
    w.flush()?;
    Ok(()) }
}

fn read_line<R:Read>(r:&mut R)->Result<String> {
  let mut s = String::new();
  let mut b = [0u8];
  loop {
    if r.read(&mut b)? == 0 { break }
    if b[0] == b'\n' { break }
    s.push(b[0] as char) }
  Ok(s) }

// the AND section stores deltas as 7-bit groups, low first, high bit = more
fn read_delta<R:Read>(r:&mut R)->Result<u32> {
  let mut x:u64 = 0; let mut shift = 0;
  loop {
    let mut b = [0u8];
    if r.read(&mut b)? == 0 {
      return Err(Error::InvalidAig("truncated and section".to_string())) }
    x |= ((b[0] & 0x7f) as u64) << shift;
    if b[0] & 0x80 == 0 { break }
    shift += 7;
    if shift > 28 {
      return Err(Error::InvalidAig("delta overflows 32 bits".to_string())) }}
  if x > u32::MAX as u64 {
    return Err(Error::InvalidAig("delta overflows 32 bits".to_string())) }
  Ok(x as u32) }

fn write_delta<W:Write>(w:&mut W, mut x:u32)->Result<()> {
  while x >= 0x80 {
    w.write_all(&[(x & 0x7f) as u8 | 0x80])?;
    x >>= 7; }
  w.write_all(&[x as u8])?;
  Ok(()) }

/// derive the output file name by inserting `_out` before the extension
pub fn out_path(p:&str)->String {
  match p.rfind('.') {
    Some(dot) => format!("{}_out{}", &p[..dot], &p[dot..]),
    None => format!("{}_out", p) }}


#[test] fn test_out_path() {
  assert_eq!(out_path("foo.aig"), "foo_out.aig");
  assert_eq!(out_path("a/b.c/foo"), "a/b.c/foo_out"); }

#[test] fn test_build() {
  let mut g = Aig::new(2);
  let (a, b) = (g.input(0), g.input(1));
  let n = g.and(a, b);
  g.output(!n);
  assert_eq!(g.num_ands(), 1);
  assert_eq!(n.var(), 3);
  assert_eq!(g.outputs()[0], !n); }

#[test] fn test_roundtrip() {
  let mut g = Aig::new(3);
  let (a, b, c) = (g.input(0), g.input(1), g.input(2));
  let ab = g.and(a, !b);
  let abc = g.and(ab, c);
  g.output(abc);
  g.output(!ab);
  let path = std::env::temp_dir().join("rewire_roundtrip.aig");
  let path = path.to_str().unwrap();
  g.write(path).unwrap();
  let h = Aig::read(path).unwrap();
  assert_eq!(h.num_ins(), 3);
  assert_eq!(h.num_ands(), 2);
  assert_eq!(h.outputs(), g.outputs());
  assert_eq!(h.ands(), g.ands(), "deltas decode back to the same fanin pairs"); }

#[test] fn test_reject_latches() {
  let path = std::env::temp_dir().join("rewire_latched.aig");
  std::fs::write(&path, b"aig 2 1 1 1 0\n2\n").unwrap();
  assert!(Aig::read(path.to_str().unwrap()).is_err()); }
