//! Bridge from `serde::Serialize` into the crate's [`Value`], so typed
//! data encodes without passing through `serde_json` (which cannot
//! represent NaN or infinite floats).

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{self, Impossible, Serialize};

use crate::error::ToonError;
use crate::value::{Number, Value};

pub(crate) fn to_value<T: Serialize>(value: &T) -> Result<Value, ToonError> {
    value.serialize(ValueSerializer)
}

impl ser::Error for ToonError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        ToonError::Serialize(msg.to_string())
    }
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = ToonError;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeStruct;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value, ToonError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, ToonError> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Value, ToonError> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Value, ToonError> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Value, ToonError> {
        Ok(Value::Number(Number::from(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, ToonError> {
        if v >= i64::MIN as i128 && v <= i64::MAX as i128 {
            self.serialize_i64(v as i64)
        } else {
            Err(ToonError::UnsupportedType("i128 out of range".to_string()))
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Value, ToonError> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Value, ToonError> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Value, ToonError> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Value, ToonError> {
        Ok(Value::Number(Number::PosInt(v)))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, ToonError> {
        if v <= u64::MAX as u128 {
            self.serialize_u64(v as u64)
        } else {
            Err(ToonError::UnsupportedType("u128 out of range".to_string()))
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value, ToonError> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<Value, ToonError> {
        Ok(Value::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Value, ToonError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, ToonError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, ToonError> {
        let values = v
            .iter()
            .map(|b| Value::Number(Number::PosInt(*b as u64)))
            .collect();
        Ok(Value::Array(values))
    }

    fn serialize_none(self) -> Result<Value, ToonError> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, ToonError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, ToonError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, ToonError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, ToonError> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, ToonError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, ToonError>
    where
        T: ?Sized + Serialize,
    {
        let mut map = IndexMap::new();
        map.insert(variant.to_string(), value.serialize(ValueSerializer)?);
        Ok(Value::Object(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, ToonError> {
        Ok(SerializeVec::new(len))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, ToonError> {
        Ok(SerializeVec::new(Some(len)))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, ToonError> {
        Ok(SerializeVec::new(Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, ToonError> {
        Ok(SerializeTupleVariant {
            variant,
            elements: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, ToonError> {
        Ok(SerializeMap {
            entries: IndexMap::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, ToonError> {
        Ok(SerializeStruct {
            entries: IndexMap::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, ToonError> {
        Ok(SerializeStructVariant {
            variant,
            entries: IndexMap::with_capacity(len),
        })
    }
}

struct SerializeVec {
    elements: Vec<Value>,
}

impl SerializeVec {
    fn new(len: Option<usize>) -> Self {
        Self {
            elements: Vec::with_capacity(len.unwrap_or(0)),
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = ToonError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), ToonError>
    where
        T: ?Sized + Serialize,
    {
        self.elements.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, ToonError> {
        Ok(Value::Array(self.elements))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = ToonError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), ToonError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, ToonError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = ToonError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), ToonError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, ToonError> {
        ser::SerializeSeq::end(self)
    }
}

struct SerializeTupleVariant {
    variant: &'static str,
    elements: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = ToonError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), ToonError>
    where
        T: ?Sized + Serialize,
    {
        self.elements.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, ToonError> {
        let mut map = IndexMap::new();
        map.insert(self.variant.to_string(), Value::Array(self.elements));
        Ok(Value::Object(map))
    }
}

struct SerializeMap {
    entries: IndexMap<String, Value>,
    pending_key: Option<String>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = ToonError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), ToonError>
    where
        T: ?Sized + Serialize,
    {
        self.pending_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), ToonError>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| ToonError::Serialize("value before key".to_string()))?;
        self.entries.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, ToonError> {
        Ok(Value::Object(self.entries))
    }
}

struct SerializeStruct {
    entries: IndexMap<String, Value>,
}

impl ser::SerializeStruct for SerializeStruct {
    type Ok = Value;
    type Error = ToonError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), ToonError>
    where
        T: ?Sized + Serialize,
    {
        self.entries
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, ToonError> {
        Ok(Value::Object(self.entries))
    }
}

struct SerializeStructVariant {
    variant: &'static str,
    entries: IndexMap<String, Value>,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = ToonError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), ToonError>
    where
        T: ?Sized + Serialize,
    {
        self.entries
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, ToonError> {
        let mut map = IndexMap::new();
        map.insert(self.variant.to_string(), Value::Object(self.entries));
        Ok(Value::Object(map))
    }
}

/// Map keys must serialize as strings; anything else is a
/// `NonStringKey` error.
struct MapKeySerializer;

fn non_string_key(found: &str) -> ToonError {
    ToonError::NonStringKey(found.to_string())
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = ToonError;

    type SerializeSeq = Impossible<String, ToonError>;
    type SerializeTuple = Impossible<String, ToonError>;
    type SerializeTupleStruct = Impossible<String, ToonError>;
    type SerializeTupleVariant = Impossible<String, ToonError>;
    type SerializeMap = Impossible<String, ToonError>;
    type SerializeStruct = Impossible<String, ToonError>;
    type SerializeStructVariant = Impossible<String, ToonError>;

    fn serialize_str(self, v: &str) -> Result<String, ToonError> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String, ToonError> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, ToonError> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, ToonError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String, ToonError> {
        Err(non_string_key("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<String, ToonError> {
        Err(non_string_key("number"))
    }

    fn serialize_i16(self, _v: i16) -> Result<String, ToonError> {
        Err(non_string_key("number"))
    }

    fn serialize_i32(self, _v: i32) -> Result<String, ToonError> {
        Err(non_string_key("number"))
    }

    fn serialize_i64(self, _v: i64) -> Result<String, ToonError> {
        Err(non_string_key("number"))
    }

    fn serialize_u8(self, _v: u8) -> Result<String, ToonError> {
        Err(non_string_key("number"))
    }

    fn serialize_u16(self, _v: u16) -> Result<String, ToonError> {
        Err(non_string_key("number"))
    }

    fn serialize_u32(self, _v: u32) -> Result<String, ToonError> {
        Err(non_string_key("number"))
    }

    fn serialize_u64(self, _v: u64) -> Result<String, ToonError> {
        Err(non_string_key("number"))
    }

    fn serialize_f32(self, _v: f32) -> Result<String, ToonError> {
        Err(non_string_key("number"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String, ToonError> {
        Err(non_string_key("number"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, ToonError> {
        Err(non_string_key("bytes"))
    }

    fn serialize_none(self) -> Result<String, ToonError> {
        Err(non_string_key("null"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String, ToonError>
    where
        T: ?Sized + Serialize,
    {
        Err(non_string_key("option"))
    }

    fn serialize_unit(self) -> Result<String, ToonError> {
        Err(non_string_key("null"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, ToonError> {
        Err(non_string_key("unit struct"))
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, ToonError>
    where
        T: ?Sized + Serialize,
    {
        Err(non_string_key("enum variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, ToonError> {
        Err(non_string_key("array"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, ToonError> {
        Err(non_string_key("array"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, ToonError> {
        Err(non_string_key("array"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, ToonError> {
        Err(non_string_key("array"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, ToonError> {
        Err(non_string_key("object"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, ToonError> {
        Err(non_string_key("object"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, ToonError> {
        Err(non_string_key("object"))
    }
}
