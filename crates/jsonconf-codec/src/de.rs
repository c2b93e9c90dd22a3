//! Dialect-aware deserializer over a parsed [`serde_json::Value`].
//!
//! The text is first parsed into a `Value` tree, then the target type is
//! driven from that tree through [`DialectDeserializer`].  Working from type
//! hints (rather than from the raw text) is what makes the field-level
//! switches possible:
//!
//! - `deserialize_struct` receives the declared field names, so object keys
//!   can be matched ignoring case.
//! - `deserialize_i64`, `deserialize_f64`, ... know a number is expected, so a
//!   quoted number or `"NaN"` can be accepted.
//! - `deserialize_enum` receives the variant names, so an ordinal can be
//!   mapped back to its variant.
//!
//! Everything else behaves exactly like `serde_json::from_value`, including
//! silently skipping unknown fields.

use std::vec;

use serde::de::{
    self, DeserializeSeed, Deserializer as _, EnumAccess, IntoDeserializer, MapAccess, SeqAccess,
    Unexpected, VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use serde_json::{Error, Map, Number, Value};

use crate::Dialect;

/// Deserializer driving a target type from a `Value` under a [`Dialect`].
pub(crate) struct DialectDeserializer<'d> {
    value: Value,
    dialect: &'d Dialect,
    /// Object keys are always strings in JSON; numeric map keys must be parsed
    /// out of them whatever the dialect says.
    is_key: bool,
}

impl<'d> DialectDeserializer<'d> {
    pub(crate) fn new(value: Value, dialect: &'d Dialect) -> Self {
        Self {
            value,
            dialect,
            is_key: false,
        }
    }

    fn key(key: String, dialect: &'d Dialect) -> Self {
        Self {
            value: Value::String(key),
            dialect,
            is_key: true,
        }
    }

    fn numeric_strings_allowed(&self) -> bool {
        self.is_key || self.dialect.permissive_numbers
    }

    fn deserialize_number<'de, V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(ref s) if self.numeric_strings_allowed() => {
                visit_numeric_str(s, self.dialect.permissive_numbers, visitor)
            }
            _ => self.deserialize_any(visitor),
        }
    }
}

/// Parses a quoted number.  Named float literals are only honoured when
/// `named_literals` is set.
fn visit_numeric_str<'de, V>(s: &str, named_literals: bool, visitor: V) -> Result<V::Value, Error>
where
    V: Visitor<'de>,
{
    let trimmed = s.trim();
    if named_literals {
        match trimmed {
            "NaN" => return visitor.visit_f64(f64::NAN),
            "Infinity" => return visitor.visit_f64(f64::INFINITY),
            "-Infinity" => return visitor.visit_f64(f64::NEG_INFINITY),
            _ => {}
        }
    }
    match trimmed.parse::<Number>() {
        Ok(n) => visit_number(&n, visitor),
        Err(_) => Err(de::Error::invalid_value(
            Unexpected::Str(s),
            &"a number or a quoted number",
        )),
    }
}

fn visit_number<'de, V>(n: &Number, visitor: V) -> Result<V::Value, Error>
where
    V: Visitor<'de>,
{
    if let Some(u) = n.as_u64() {
        visitor.visit_u64(u)
    } else if let Some(i) = n.as_i64() {
        visitor.visit_i64(i)
    } else if let Some(f) = n.as_f64() {
        visitor.visit_f64(f)
    } else {
        Err(de::Error::custom(format!("unrepresentable number {n}")))
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) => Unexpected::Float(f),
            None => Unexpected::Other("number"),
        },
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

/// Renames object keys to the declared field they match ignoring ASCII case.
/// Exact matches and unknown keys pass through untouched.
///
/// Keys differing only in case collapse onto one field instead of failing
/// as a duplicate: the exact spelling wins, otherwise the last key visited.
/// Object keys are visited in sorted order, not document order.
fn match_field_names(map: Map<String, Value>, fields: &'static [&'static str]) -> Vec<(String, Value)> {
    let mut entries: Vec<(String, Value, bool)> = Vec::with_capacity(map.len());
    for (key, value) in map {
        let (key, exact) = if fields.contains(&key.as_str()) {
            (key, true)
        } else {
            match fields.iter().find(|f| f.eq_ignore_ascii_case(&key)) {
                Some(field) => ((*field).to_string(), false),
                None => (key, true),
            }
        };
        match entries.iter_mut().find(|(k, _, _)| *k == key) {
            Some(slot) if exact || !slot.2 => *slot = (key, value, exact),
            Some(_) => {}
            None => entries.push((key, value, exact)),
        }
    }
    entries.into_iter().map(|(key, value, _)| (key, value)).collect()
}

/// Maps a string naming an enum variant onto the declared name.
///
/// An exact name wins, then a case-insensitive one.  A string holding an
/// in-range ordinal names that variant: ordinal enums used as map keys come
/// back quoted, since JSON object keys are always strings.  Anything else is
/// passed through for serde to reject.
fn resolve_variant_name(name: String, variants: &'static [&'static str], dialect: &Dialect) -> String {
    if variants.contains(&name.as_str()) {
        return name;
    }
    if dialect.case_insensitive_fields {
        if let Some(v) = variants.iter().find(|v| v.eq_ignore_ascii_case(&name)) {
            return (*v).to_string();
        }
    }
    match name.trim().parse::<usize>().ok().and_then(|i| variants.get(i)) {
        Some(v) => (*v).to_string(),
        None => name,
    }
}

macro_rules! deserialize_numbers {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Error>
            where
                V: Visitor<'de>,
            {
                self.deserialize_number(visitor)
            }
        )*
    };
}

impl<'de, 'd> de::Deserializer<'de> for DialectDeserializer<'d> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        let dialect = self.dialect;
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => visit_number(&n, visitor),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(items) => {
                let len = items.len();
                let mut seq = SeqDeserializer {
                    iter: items.into_iter(),
                    dialect,
                };
                let value = visitor.visit_seq(&mut seq)?;
                if seq.iter.len() == 0 {
                    Ok(value)
                } else {
                    Err(de::Error::invalid_length(len, &"fewer elements in array"))
                }
            }
            Value::Object(map) => visitor.visit_map(MapDeserializer::new(
                map.into_iter().collect(),
                dialect,
            )),
        }
    }

    deserialize_numbers! {
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
        deserialize_f32 deserialize_f64
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Object(map) if self.dialect.case_insensitive_fields => visitor.visit_map(
                MapDeserializer::new(match_field_names(map, fields), self.dialect),
            ),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        let dialect = self.dialect;
        match self.value {
            Value::String(name) => visitor.visit_enum(EnumDeserializer {
                variant: resolve_variant_name(name, variants, dialect),
                value: None,
                dialect,
            }),
            Value::Number(n) => {
                let variant = n
                    .as_u64()
                    .and_then(|i| usize::try_from(i).ok())
                    .and_then(|i| variants.get(i))
                    .ok_or_else(|| {
                        <Error as de::Error>::invalid_value(
                            Unexpected::Other(&format!("ordinal {n}")),
                            &format!("an ordinal below {}", variants.len()).as_str(),
                        )
                    })?;
                visitor.visit_enum(EnumDeserializer {
                    variant: (*variant).to_string(),
                    value: None,
                    dialect,
                })
            }
            Value::Object(map) => {
                let mut entries = map.into_iter();
                let (variant, value) = match (entries.next(), entries.next()) {
                    (Some(entry), None) => entry,
                    _ => {
                        return Err(de::Error::invalid_value(
                            Unexpected::Map,
                            &"a map with a single key",
                        ))
                    }
                };
                visitor.visit_enum(EnumDeserializer {
                    variant,
                    value: Some(value),
                    dialect,
                })
            }
            other => Err(de::Error::invalid_type(unexpected(&other), &"a string or a map")),
        }
    }

    forward_to_deserialize_any! {
        bool char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map identifier ignored_any
    }
}

struct SeqDeserializer<'d> {
    iter: vec::IntoIter<Value>,
    dialect: &'d Dialect,
}

impl<'de, 'd> SeqAccess<'de> for SeqDeserializer<'d> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed
                .deserialize(DialectDeserializer::new(value, self.dialect))
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapDeserializer<'d> {
    iter: vec::IntoIter<(String, Value)>,
    value: Option<Value>,
    dialect: &'d Dialect,
}

impl<'d> MapDeserializer<'d> {
    fn new(entries: Vec<(String, Value)>, dialect: &'d Dialect) -> Self {
        Self {
            iter: entries.into_iter(),
            value: None,
            dialect,
        }
    }
}

impl<'de, 'd> MapAccess<'de> for MapDeserializer<'d> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(DialectDeserializer::key(key, self.dialect))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(DialectDeserializer::new(value, self.dialect)),
            None => Err(de::Error::custom("value is missing")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumDeserializer<'d> {
    variant: String,
    value: Option<Value>,
    dialect: &'d Dialect,
}

impl<'de, 'd> EnumAccess<'de> for EnumDeserializer<'d> {
    type Error = Error;
    type Variant = VariantDeserializer<'d>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Error>
    where
        V: DeserializeSeed<'de>,
    {
        let key: de::value::StringDeserializer<Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(key)?;
        Ok((
            variant,
            VariantDeserializer {
                value: self.value,
                dialect: self.dialect,
            },
        ))
    }
}

struct VariantDeserializer<'d> {
    value: Option<Value>,
    dialect: &'d Dialect,
}

impl<'de, 'd> VariantAccess<'de> for VariantDeserializer<'d> {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Error> {
        match self.value {
            None | Some(Value::Null) => Ok(()),
            Some(other) => Err(de::Error::invalid_type(unexpected(&other), &"unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(DialectDeserializer::new(value, self.dialect)),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"newtype variant",
            )),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(value @ Value::Array(_)) => {
                de::Deserializer::deserialize_any(DialectDeserializer::new(value, self.dialect), visitor)
            }
            Some(other) => Err(de::Error::invalid_type(unexpected(&other), &"tuple variant")),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"tuple variant",
            )),
        }
    }

    fn struct_variant<V>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value, Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(value @ Value::Object(_)) => de::Deserializer::deserialize_struct(
                DialectDeserializer::new(value, self.dialect),
                "",
                fields,
                visitor,
            ),
            Some(other) => Err(de::Error::invalid_type(unexpected(&other), &"struct variant")),
            None => Err(de::Error::invalid_type(
                Unexpected::UnitVariant,
                &"struct variant",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Debug, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
    enum Level {
        Low,
        Medium,
        High,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        name: String,
        retries: u32,
        ratio: f64,
        level: Level,
        #[serde(default)]
        tags: Vec<String>,
    }

    fn decode<T: serde::de::DeserializeOwned>(value: Value, dialect: &Dialect) -> Result<T, Error> {
        T::deserialize(DialectDeserializer::new(value, dialect))
    }

    #[test]
    fn test_plain_object_decodes_like_from_value() {
        let value = json!({"name": "a", "retries": 3, "ratio": 0.5, "level": "High", "tags": ["x"]});
        let sample: Sample = decode(value, &Dialect::default()).expect("decode");
        assert_eq!(sample.name, "a");
        assert_eq!(sample.retries, 3);
        assert_eq!(sample.level, Level::High);
        assert_eq!(sample.tags, vec!["x".to_string()]);
    }

    #[test]
    fn test_field_names_match_ignoring_case() {
        let value = json!({"NAME": "a", "Retries": 3, "rAtIo": 0.5, "Level": "low"});
        let sample: Sample = decode(value, &Dialect::default()).expect("decode");
        assert_eq!(sample.name, "a");
        assert_eq!(sample.retries, 3);
        assert_eq!(sample.level, Level::Low);
    }

    #[test]
    fn test_field_names_case_sensitive_when_disabled() {
        let dialect = Dialect {
            case_insensitive_fields: false,
            ..Dialect::default()
        };
        let value = json!({"NAME": "a", "retries": 3, "ratio": 0.5, "level": "Low"});
        let err = decode::<Sample>(value, &dialect).expect_err("NAME must not match name");
        assert!(err.to_string().contains("missing field `name`"), "got {err}");
    }

    #[test]
    fn test_quoted_numbers_accepted_when_permissive() {
        let value = json!({"name": "a", "retries": "7", "ratio": "2.5", "level": "Low"});
        let sample: Sample = decode(value, &Dialect::default()).expect("decode");
        assert_eq!(sample.retries, 7);
        assert_eq!(sample.ratio, 2.5);
    }

    #[test]
    fn test_quoted_numbers_rejected_when_strict() {
        let value = json!({"name": "a", "retries": "7", "ratio": 1.0, "level": "Low"});
        assert!(decode::<Sample>(value, &Dialect::strict()).is_err());
    }

    #[test]
    fn test_named_float_literals_accepted() {
        let nan: f64 = decode(json!("NaN"), &Dialect::default()).expect("NaN");
        let inf: f64 = decode(json!("Infinity"), &Dialect::default()).expect("Infinity");
        let neg: f64 = decode(json!("-Infinity"), &Dialect::default()).expect("-Infinity");
        assert!(nan.is_nan());
        assert_eq!(inf, f64::INFINITY);
        assert_eq!(neg, f64::NEG_INFINITY);
    }

    #[test]
    fn test_non_numeric_string_for_number_is_rejected() {
        let err = decode::<u32>(json!("seven"), &Dialect::default()).expect_err("must fail");
        assert!(err.to_string().contains("seven"));
    }

    #[test]
    fn test_enum_ordinal_maps_to_variant() {
        let level: Level = decode(json!(1), &Dialect::default()).expect("ordinal");
        assert_eq!(level, Level::Medium);
    }

    #[test]
    fn test_enum_ordinal_out_of_range_is_rejected() {
        assert!(decode::<Level>(json!(3), &Dialect::default()).is_err());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let value = json!({"name": "a", "retries": 1, "ratio": 0.0, "level": "Low", "extra": 5});
        assert!(decode::<Sample>(value, &Dialect::default()).is_ok());
    }

    #[test]
    fn test_numeric_map_keys_parse_even_when_strict() {
        let value = json!({"1": "one", "2": "two"});
        let map: BTreeMap<u32, String> = decode(value, &Dialect::strict()).expect("decode");
        assert_eq!(map.get(&2).map(String::as_str), Some("two"));
    }

    #[test]
    fn test_data_carrying_variants_decode() {
        #[derive(Debug, Deserialize, PartialEq)]
        enum Shape {
            Circle(f64),
            Rect { w: u32, h: u32 },
        }
        let circle: Shape = decode(json!({"Circle": "1.5"}), &Dialect::default()).expect("newtype");
        let rect: Shape = decode(json!({"Rect": {"W": 2, "H": 3}}), &Dialect::default()).expect("struct");
        assert_eq!(circle, Shape::Circle(1.5));
        assert_eq!(rect, Shape::Rect { w: 2, h: 3 });
    }

    #[test]
    fn test_enum_quoted_ordinal_maps_to_variant() {
        let level: Level = decode(json!("2"), &Dialect::strict()).expect("quoted ordinal");
        assert_eq!(level, Level::High);
        assert!(decode::<Level>(json!("3"), &Dialect::default()).is_err());
    }

    #[test]
    fn test_enum_map_keys_accept_ordinals() {
        let value = json!({"0": "idle", "2": "busy"});
        let map: BTreeMap<Level, String> = decode(value, &Dialect::default()).expect("decode");
        assert_eq!(map.get(&Level::Low).map(String::as_str), Some("idle"));
        assert_eq!(map.get(&Level::High).map(String::as_str), Some("busy"));
    }

    #[test]
    fn test_mixed_case_duplicate_keys_prefer_exact_spelling() {
        let value = json!({"Name": "b", "name": "a", "retries": 1, "ratio": 0.0, "level": "Low"});
        let sample: Sample = decode(value, &Dialect::default()).expect("decode");
        assert_eq!(sample.name, "a");
    }

    #[test]
    fn test_mixed_case_duplicate_keys_without_exact_spelling_keep_one() {
        // Sorted key order visits "NAME" before "Name".
        let value = json!({"NAME": "x", "Name": "y", "retries": 1, "ratio": 0.0, "level": "Low"});
        let sample: Sample = decode(value, &Dialect::default()).expect("decode");
        assert_eq!(sample.name, "y");
    }

    #[test]
    fn test_option_null_is_none() {
        let value: Option<String> = decode(Value::Null, &Dialect::default()).expect("decode");
        assert_eq!(value, None);
    }
}
