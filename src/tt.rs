//! Truth tables as packed 64-bit words.
//!
//! A function of `n` inputs occupies `word_count(n)` words. The helpers
//! below operate on word slices of equal length; callers own the storage
//! (one flat slab per table set, see the simulator).

/// The canonical tables for the first six input variables.
const VARS6:[u64; 6] = [
  0xAAAA_AAAA_AAAA_AAAA,
  0xCCCC_CCCC_CCCC_CCCC,
  0xF0F0_F0F0_F0F0_F0F0,
  0xFF00_FF00_FF00_FF00,
  0xFFFF_0000_FFFF_0000,
  0xFFFF_FFFF_0000_0000];

/// number of words in a table over n inputs
#[inline] pub fn word_count(n:usize)->usize { if n > 6 { 1 << (n-6) } else { 1 }}

pub fn fill(out:&mut [u64], v:bool) {
  let w = if v { !0u64 } else { 0 };
  for x in out.iter_mut() { *x = w }}

/// out = src, complemented when c is set
pub fn copy_c(out:&mut [u64], src:&[u64], c:bool) {
  if c { for (x, &s) in out.iter_mut().zip(src) { *x = !s }}
  else { out.copy_from_slice(src) }}

/// out = a & b
pub fn and(out:&mut [u64], a:&[u64], b:&[u64]) {
  for (x, (&a, &b)) in out.iter_mut().zip(a.iter().zip(b)) { *x = a & b }}

/// out &= src (or its complement when c is set)
pub fn sharp(out:&mut [u64], src:&[u64], c:bool) {
  if c { for (x, &s) in out.iter_mut().zip(src) { *x &= !s }}
  else { for (x, &s) in out.iter_mut().zip(src) { *x &= s }}}

/// out |= a ^ b
pub fn or_xor(out:&mut [u64], a:&[u64], b:&[u64]) {
  for (x, (&a, &b)) in out.iter_mut().zip(a.iter().zip(b)) { *x |= a ^ b }}

pub fn equal(a:&[u64], b:&[u64])->bool { a == b }

/// do a and b agree wherever care is set?
pub fn equal_on_care(care:&[u64], a:&[u64], b:&[u64])->bool {
  care.iter().zip(a.iter().zip(b)).all(|(&c, (&a, &b))| c & (a ^ b) == 0) }

/// does a intersect b (or its complement when c is set)?
pub fn intersect_c(a:&[u64], b:&[u64], c:bool)->bool {
  if c { a.iter().zip(b).any(|(&a, &b)| a & !b != 0) }
  else { a.iter().zip(b).any(|(&a, &b)| a & b != 0) }}

pub fn is_const0(a:&[u64])->bool { a.iter().all(|&w| w == 0) }

pub fn count_ones(a:&[u64])->usize {
  a.iter().map(|w| w.count_ones() as usize).sum() }

/// write the canonical table of input variable `ivar` (zero-based)
pub fn var_init(out:&mut [u64], ivar:usize) {
  if ivar < 6 { for w in out.iter_mut() { *w = VARS6[ivar] }}
  else { for (k, w) in out.iter_mut().enumerate() {
    *w = if k & (1 << (ivar-6)) != 0 { !0 } else { 0 }}}}

// single bits of a long bit string
#[inline] pub fn get_bit(p:&[u64], k:usize)->bool { p[k>>6] >> (k & 63) & 1 != 0 }
#[inline] pub fn set_bit(p:&mut [u64], k:usize) { p[k>>6] |= 1u64 << (k & 63) }


#[test] fn test_words() {
  assert_eq!(word_count(0), 1);
  assert_eq!(word_count(6), 1);
  assert_eq!(word_count(7), 2);
  assert_eq!(word_count(10), 16); }

#[test] fn test_ops() {
  let a = [0b1100u64]; let b = [0b1010u64];
  let mut x = [0u64];
  and(&mut x, &a, &b);      assert_eq!(x[0], 0b1000);
  copy_c(&mut x, &a, true); assert_eq!(x[0], !0b1100u64);
  copy_c(&mut x, &a, false);
  sharp(&mut x, &b, true);  assert_eq!(x[0], 0b0100, "a & !b");
  x = [0];
  or_xor(&mut x, &a, &b);   assert_eq!(x[0], 0b0110);
  assert!(intersect_c(&a, &b, false));
  assert!(!intersect_c(&[0b0100], &b, false));
  assert!(intersect_c(&[0b0100], &b, true));
  assert_eq!(count_ones(&[0b1011, !0u64]), 67);
  fill(&mut x, true);  assert!(!is_const0(&x));
  fill(&mut x, false); assert!(is_const0(&x)); }

#[test] fn test_on_care() {
  let f = [0b1100u64]; let g = [0b0100u64];
  assert!(!equal(&f, &g));
  assert!(equal_on_care(&[0b0111], &f, &g), "disagreement is outside the care set");
  assert!(!equal_on_care(&[0b1111], &f, &g)); }

#[test] fn test_var_tables() {
  let mut v = [0u64; 2];
  var_init(&mut v, 0); assert_eq!(v, [VARS6[0]; 2]);
  var_init(&mut v, 6); assert_eq!(v, [0, !0u64], "variable 6 splits on the word index"); }

#[test] fn test_bits() {
  let mut p = [0u64; 2];
  set_bit(&mut p, 3); set_bit(&mut p, 64);
  assert!(get_bit(&p, 3));
  assert!(get_bit(&p, 64));
  assert!(!get_bit(&p, 4)); }
