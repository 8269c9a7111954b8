//! 128/256/512-bit unsigned integers used as mul-div intermediates.
//! Plain `u128` overflows long before a `mul_div` result does; widening to
//! these before multiplying and narrowing back after dividing is what makes
//! `full_math` exact instead of merely "usually correct".
use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

construct_uint! {
    pub struct U512(8);
}
