/* Bit layout:

   LIT
   ---+------------------
   0  | INV
   1+ | object index

*/
use std::fmt;

/// A literal: an object index packed with a complement bit.
/// Lit 0 is the constant false, lit 1 its inverse.
#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Lit(u32);

/// The constant-0 literal.
pub const O:Lit = Lit(0);
/// The constant-1 literal.
pub const I:Lit = Lit(1);

impl Lit {
  #[inline] pub fn new(var:usize, inv:bool)->Lit { Lit(((var as u32)<<1) | inv as u32) }
  /// the object this literal refers to
  #[inline] pub fn var(self)->usize { (self.0>>1) as usize }
  #[inline] pub fn is_inv(self)->bool { self.0 & 1 != 0 }
  /// does this literal refer to the constant object?
  #[inline] pub fn is_const(self)->bool { self.var() == 0 }
  /// the literal with the complement bit cleared
  #[inline] pub fn raw(self)->Lit { Lit(self.0 & !1) }
  /// the packed encoding (also the AIGER on-disk encoding)
  #[inline] pub fn code(self)->u32 { self.0 }
  #[inline] pub fn from_code(c:u32)->Lit { Lit(c) }

  /// remap through an object-to-object table, keeping polarity.
  #[inline] pub fn map_var(self, copy:&[usize])->Lit { Lit::new(copy[self.var()], self.is_inv()) }
  /// remap through an object-to-literal table, folding polarity in.
  #[inline] pub fn map_lit(self, copy:&[Lit])->Lit { Lit(copy[self.var()].0 ^ (self.0 & 1)) }}

impl std::ops::Not for Lit {
  type Output = Lit;
  fn not(self)->Lit { Lit(self.0 ^ 1) }}

impl fmt::Display for Lit {
  fn fmt(&self, f:&mut fmt::Formatter)->fmt::Result {
    if *self == O { write!(f, "O") }
    else if *self == I { write!(f, "I") }
    else { write!(f, "{}#{}", if self.is_inv() {"!"} else {""}, self.var()) }}}

/// Same as fmt::Display. Mostly so it's easier to see the problem when an assertion fails.
impl fmt::Debug for Lit { // for test suite output
  fn fmt(&self, f:&mut fmt::Formatter)->fmt::Result { write!(f, "{}", self) }}

#[test] fn test_lits() {
  assert_eq!(O.code(), 0); assert_eq!(I.code(), 1);
  assert_eq!(!O, I, "I is the complement of O");
  let a = Lit::new(3, false);
  assert_eq!(a.code(), 6);
  assert_eq!(a.var(), 3);
  assert!(!a.is_inv());
  assert!((!a).is_inv());
  assert_eq!((!a).raw(), a);
  assert!(a < !a, "positive literal sorts before its complement"); }

#[test] fn test_maps() {
  let a = Lit::new(2, true);
  assert_eq!(a.map_var(&[0,0,5]), Lit::new(5, true));
  let copy = [O, O, Lit::new(7, true)];
  assert_eq!(a.map_lit(&copy), Lit::new(7, false), "complements cancel through the map"); }
