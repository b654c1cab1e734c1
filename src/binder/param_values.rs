//! Conversion of path and query arguments to text.

use serde::ser::{self, Impossible, Serialize, Serializer};
use serde_json::Value;

use crate::error::BoxError;

/// Convert a parameter value to its text representations.
///
/// `None` and `()` produce no value, sequences produce one value per element.
pub(super) fn to_param_values<T: Serialize + ?Sized>(value: &T) -> Result<Vec<String>, BoxError> {
	match value.serialize(ParamSerializer)? {
		Value::Array(items) => {
			let mut values = Vec::with_capacity(items.len());
			for item in items {
				values.extend(scalar(item)?);
			}
			Ok(values)
		},
		value => Ok(scalar(value)?.into_iter().collect()),
	}
}

fn scalar(value: Value) -> Result<Option<String>, BoxError> {
	match value {
		Value::Null => Ok(None),
		Value::Bool(value) => Ok(Some(value.to_string())),
		Value::Number(value) => Ok(Some(value.to_string())),
		Value::String(value) => Ok(Some(value)),
		Value::Array(_) | Value::Object(_) => Err(not_a_scalar().into()),
	}
}

fn not_a_scalar() -> serde_json::Error {
	ser::Error::custom("parameter values must be scalars or sequences of scalars")
}

/// Serializer that produces JSON values like [`serde_json::value::Serializer`],
/// but fails on non-finite floats instead of turning them into null.
struct ParamSerializer;

macro_rules! forward_to_json {
	($($method:ident($ty:ty)),* $(,)?) => {
		$(
			fn $method(self, value: $ty) -> Result<Value, serde_json::Error> {
				serde_json::value::Serializer.$method(value)
			}
		)*
	};
}

impl Serializer for ParamSerializer {
	type Ok = Value;
	type Error = serde_json::Error;
	type SerializeSeq = SeqSerializer;
	type SerializeTuple = SeqSerializer;
	type SerializeTupleStruct = SeqSerializer;
	type SerializeTupleVariant = Impossible<Value, serde_json::Error>;
	type SerializeMap = Impossible<Value, serde_json::Error>;
	type SerializeStruct = Impossible<Value, serde_json::Error>;
	type SerializeStructVariant = Impossible<Value, serde_json::Error>;

	forward_to_json! {
		serialize_bool(bool),
		serialize_i8(i8),
		serialize_i16(i16),
		serialize_i32(i32),
		serialize_i64(i64),
		serialize_i128(i128),
		serialize_u8(u8),
		serialize_u16(u16),
		serialize_u32(u32),
		serialize_u64(u64),
		serialize_u128(u128),
		serialize_char(char),
		serialize_str(&str),
	}

	fn serialize_f32(self, value: f32) -> Result<Value, serde_json::Error> {
		self.serialize_f64(value.into())
	}

	fn serialize_f64(self, value: f64) -> Result<Value, serde_json::Error> {
		if value.is_finite() {
			serde_json::value::Serializer.serialize_f64(value)
		} else {
			Err(ser::Error::custom(format_args!("can not use non-finite number {} as parameter value", value)))
		}
	}

	fn serialize_bytes(self, value: &[u8]) -> Result<Value, serde_json::Error> {
		Ok(Value::Array(value.iter().map(|&byte| Value::from(byte)).collect()))
	}

	fn serialize_none(self) -> Result<Value, serde_json::Error> {
		Ok(Value::Null)
	}

	fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, serde_json::Error> {
		value.serialize(self)
	}

	fn serialize_unit(self) -> Result<Value, serde_json::Error> {
		Ok(Value::Null)
	}

	fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, serde_json::Error> {
		Ok(Value::Null)
	}

	fn serialize_unit_variant(self, _name: &'static str, _index: u32, variant: &'static str) -> Result<Value, serde_json::Error> {
		Ok(Value::String(variant.into()))
	}

	fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Result<Value, serde_json::Error> {
		value.serialize(self)
	}

	fn serialize_newtype_variant<T: ?Sized + Serialize>(
		self,
		_name: &'static str,
		_index: u32,
		_variant: &'static str,
		_value: &T,
	) -> Result<Value, serde_json::Error> {
		Err(not_a_scalar())
	}

	fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer, serde_json::Error> {
		Ok(SeqSerializer { items: Vec::with_capacity(len.unwrap_or(0)) })
	}

	fn serialize_tuple(self, len: usize) -> Result<SeqSerializer, serde_json::Error> {
		self.serialize_seq(Some(len))
	}

	fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqSerializer, serde_json::Error> {
		self.serialize_seq(Some(len))
	}

	fn serialize_tuple_variant(
		self,
		_name: &'static str,
		_index: u32,
		_variant: &'static str,
		_len: usize,
	) -> Result<Self::SerializeTupleVariant, serde_json::Error> {
		Err(not_a_scalar())
	}

	fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, serde_json::Error> {
		Err(not_a_scalar())
	}

	fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct, serde_json::Error> {
		Err(not_a_scalar())
	}

	fn serialize_struct_variant(
		self,
		_name: &'static str,
		_index: u32,
		_variant: &'static str,
		_len: usize,
	) -> Result<Self::SerializeStructVariant, serde_json::Error> {
		Err(not_a_scalar())
	}
}

struct SeqSerializer {
	items: Vec<Value>,
}

impl SeqSerializer {
	fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
		self.items.push(value.serialize(ParamSerializer)?);
		Ok(())
	}
}

impl ser::SerializeSeq for SeqSerializer {
	type Ok = Value;
	type Error = serde_json::Error;

	fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
		self.push(value)
	}

	fn end(self) -> Result<Value, serde_json::Error> {
		Ok(Value::Array(self.items))
	}
}

impl ser::SerializeTuple for SeqSerializer {
	type Ok = Value;
	type Error = serde_json::Error;

	fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
		self.push(value)
	}

	fn end(self) -> Result<Value, serde_json::Error> {
		Ok(Value::Array(self.items))
	}
}

impl ser::SerializeTupleStruct for SeqSerializer {
	type Ok = Value;
	type Error = serde_json::Error;

	fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
		self.push(value)
	}

	fn end(self) -> Result<Value, serde_json::Error> {
		Ok(Value::Array(self.items))
	}
}
