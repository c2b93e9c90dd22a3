//! Dialect-aware serialization adapter.
//!
//! [`DialectSerialize`] wraps any `Serialize` value and hands a
//! [`DialectSerializer`] to it instead of the real serializer.  The wrapper
//! forwards every call unchanged except:
//!
//! - unit enum variants become their ordinal when `enums_as_strings` is off;
//! - non-finite floats become `"NaN"` / `"Infinity"` / `"-Infinity"` when
//!   `permissive_numbers` is on (plain `serde_json` writes `null`).
//!
//! Nested values (struct fields, sequence elements, map entries) are wrapped
//! again on the way down, so the rules apply at every depth.

use serde::ser::{
    Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
};

use crate::Dialect;

/// A borrowed value paired with the dialect it must be written under.
pub(crate) struct DialectSerialize<'a, T: ?Sized> {
    value: &'a T,
    dialect: &'a Dialect,
}

impl<'a, T: ?Sized> DialectSerialize<'a, T> {
    pub(crate) fn new(value: &'a T, dialect: &'a Dialect) -> Self {
        Self { value, dialect }
    }
}

impl<T: ?Sized + Serialize> Serialize for DialectSerialize<'_, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.value.serialize(DialectSerializer {
            inner: serializer,
            dialect: self.dialect,
        })
    }
}

pub(crate) struct DialectSerializer<'d, S> {
    inner: S,
    dialect: &'d Dialect,
}

impl<'d, S> DialectSerializer<'d, S> {
    fn non_finite_name(&self, v: f64) -> Option<&'static str> {
        if !self.dialect.permissive_numbers || v.is_finite() {
            return None;
        }
        Some(if v.is_nan() {
            "NaN"
        } else if v.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        })
    }
}

macro_rules! forward_primitives {
    ($($method:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method(self, v: $ty) -> Result<Self::Ok, Self::Error> {
                self.inner.$method(v)
            }
        )*
    };
}

impl<'d, S: Serializer> Serializer for DialectSerializer<'d, S> {
    type Ok = S::Ok;
    type Error = S::Error;
    type SerializeSeq = Compound<'d, S::SerializeSeq>;
    type SerializeTuple = Compound<'d, S::SerializeTuple>;
    type SerializeTupleStruct = Compound<'d, S::SerializeTupleStruct>;
    type SerializeTupleVariant = Compound<'d, S::SerializeTupleVariant>;
    type SerializeMap = Compound<'d, S::SerializeMap>;
    type SerializeStruct = Compound<'d, S::SerializeStruct>;
    type SerializeStructVariant = Compound<'d, S::SerializeStructVariant>;

    forward_primitives! {
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_i128: i128,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_u128: u128,
        serialize_char: char,
        serialize_str: &str,
        serialize_bytes: &[u8],
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        match self.non_finite_name(f64::from(v)) {
            Some(name) => self.inner.serialize_str(name),
            None => self.inner.serialize_f32(v),
        }
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        match self.non_finite_name(v) {
            Some(name) => self.inner.serialize_str(name),
            None => self.inner.serialize_f64(v),
        }
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_none()
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_some(&DialectSerialize::new(value, self.dialect))
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_unit()
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok, Self::Error> {
        self.inner.serialize_unit_struct(name)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        if self.dialect.enums_as_strings {
            self.inner.serialize_unit_variant(name, variant_index, variant)
        } else {
            self.inner.serialize_u32(variant_index)
        }
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_newtype_struct(name, &DialectSerialize::new(value, self.dialect))
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner.serialize_newtype_variant(
            name,
            variant_index,
            variant,
            &DialectSerialize::new(value, self.dialect),
        )
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(Compound::new(self.inner.serialize_seq(len)?, self.dialect))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(Compound::new(self.inner.serialize_tuple(len)?, self.dialect))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(Compound::new(
            self.inner.serialize_tuple_struct(name, len)?,
            self.dialect,
        ))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(Compound::new(
            self.inner
                .serialize_tuple_variant(name, variant_index, variant, len)?,
            self.dialect,
        ))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(Compound::new(self.inner.serialize_map(len)?, self.dialect))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(Compound::new(
            self.inner.serialize_struct(name, len)?,
            self.dialect,
        ))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(Compound::new(
            self.inner
                .serialize_struct_variant(name, variant_index, variant, len)?,
            self.dialect,
        ))
    }

    fn is_human_readable(&self) -> bool {
        self.inner.is_human_readable()
    }
}

/// Wraps the inner serializer's compound state so every element is written
/// through the dialect as well.
pub(crate) struct Compound<'d, C> {
    inner: C,
    dialect: &'d Dialect,
}

impl<'d, C> Compound<'d, C> {
    fn new(inner: C, dialect: &'d Dialect) -> Self {
        Self { inner, dialect }
    }
}

impl<C: SerializeSeq> SerializeSeq for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_element(&DialectSerialize::new(value, self.dialect))
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTuple> SerializeTuple for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_element(&DialectSerialize::new(value, self.dialect))
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTupleStruct> SerializeTupleStruct for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_field(&DialectSerialize::new(value, self.dialect))
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

impl<C: SerializeTupleVariant> SerializeTupleVariant for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_field(&DialectSerialize::new(value, self.dialect))
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

impl<C: SerializeMap> SerializeMap for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_key(&DialectSerialize::new(key, self.dialect))
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_value(&DialectSerialize::new(value, self.dialect))
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

impl<C: SerializeStruct> SerializeStruct for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_field(key, &DialectSerialize::new(value, self.dialect))
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), Self::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

impl<C: SerializeStructVariant> SerializeStructVariant for Compound<'_, C> {
    type Ok = C::Ok;
    type Error = C::Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.inner
            .serialize_field(key, &DialectSerialize::new(value, self.dialect))
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), Self::Error> {
        self.inner.skip_field(key)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        self.inner.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    enum Mode {
        Off,
        Auto,
        #[allow(dead_code)]
        On,
    }

    #[derive(Serialize)]
    struct Nested {
        modes: Vec<Mode>,
        gain: f64,
    }

    fn to_value<T: Serialize>(value: &T, dialect: &Dialect) -> serde_json::Value {
        serde_json::to_value(DialectSerialize::new(value, dialect)).expect("serialize")
    }

    #[test]
    fn test_unit_variant_written_by_name_by_default() {
        let value = to_value(&Mode::Auto, &Dialect::default());
        assert_eq!(value, serde_json::json!("Auto"));
    }

    #[test]
    fn test_unit_variant_written_as_ordinal_when_names_disabled() {
        let dialect = Dialect {
            enums_as_strings: false,
            ..Dialect::default()
        };
        let value = to_value(&Mode::Auto, &dialect);
        assert_eq!(value, serde_json::json!(1));
    }

    #[test]
    fn test_rules_apply_to_nested_values() {
        let dialect = Dialect {
            enums_as_strings: false,
            ..Dialect::default()
        };
        let nested = Nested {
            modes: vec![Mode::Off, Mode::Auto],
            gain: f64::INFINITY,
        };
        let value = to_value(&nested, &dialect);
        assert_eq!(value, serde_json::json!({"modes": [0, 1], "gain": "Infinity"}));
    }

    #[test]
    fn test_non_finite_floats_named_when_permissive() {
        let dialect = Dialect::default();
        assert_eq!(to_value(&f64::NAN, &dialect), serde_json::json!("NaN"));
        assert_eq!(
            to_value(&f32::NEG_INFINITY, &dialect),
            serde_json::json!("-Infinity")
        );
    }

    #[test]
    fn test_non_finite_floats_null_when_strict() {
        assert_eq!(
            to_value(&f64::NAN, &Dialect::strict()),
            serde_json::Value::Null
        );
    }

    #[test]
    fn test_finite_floats_unchanged() {
        assert_eq!(to_value(&1.25f64, &Dialect::default()), serde_json::json!(1.25));
    }
}
