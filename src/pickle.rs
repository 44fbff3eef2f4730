//! Pickling: values serialize as `(sign, big-endian magnitude bytes)` so
//! any host-side codec can persist and revive them.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};

use crate::int::Int;
use crate::rat::Rat;

impl Serialize for Int {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let bytes = self.magnitude_bytes().map_err(serde::ser::Error::custom)?;
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&(self.signum() as i8))?;
        tuple.serialize_element(&bytes)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Int {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IntVisitor;

        impl<'de> Visitor<'de> for IntVisitor {
            type Value = Int;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a (sign, magnitude bytes) pair")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Int, A::Error> {
                let sign: i8 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let bytes: Vec<u8> = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                if !matches!(sign, -1..=1) {
                    return Err(de::Error::custom("sign must be -1, 0 or 1"));
                }
                let mag = Int::from_bytes(&bytes, zz_core::ByteOrder::Big, false)
                    .map_err(de::Error::custom)?;
                if sign == 0 && !mag.is_zero() {
                    return Err(de::Error::custom("zero sign with a nonzero magnitude"));
                }
                Ok(if sign < 0 { -mag } else { mag })
            }
        }

        deserializer.deserialize_tuple(2, IntVisitor)
    }
}

impl Serialize for Rat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(self.numerator())?;
        tuple.serialize_element(self.denominator())?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Rat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (num, den) = <(Int, Int)>::deserialize(deserializer)?;
        Rat::new(num, den).map_err(de::Error::custom)
    }
}
