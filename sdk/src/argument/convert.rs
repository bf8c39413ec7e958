// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use super::Arg;
use crate::{config::ArgumentOptions, Error, Result};
use aptos_bcs::{Deserializer, Serializer, I256, U256};
use aptos_types::{account_address::AccountAddress, language_storage::TypeTag};
use num_bigint::{BigInt, Sign};
use num_traits::FromPrimitive;
use tracing::{debug, warn};

/// Encodes `arg` as a value of `type_tag`. `generics` are the type arguments of the call and
/// resolve `T0`, `T1`, ... in the parameter type.
pub fn convert_arg(
    type_tag: &TypeTag,
    arg: &Arg,
    generics: &[TypeTag],
    options: &ArgumentOptions,
) -> Result<Vec<u8>> {
    let mut serializer = Serializer::new();
    if let Err(e) = encode_arg(&mut serializer, type_tag, arg, generics, options) {
        warn!(type_tag = %type_tag, error = %e, "argument conversion failed");
        return Err(e);
    }
    Ok(serializer.into_bytes()?)
}

fn resolve<'a>(type_tag: &'a TypeTag, generics: &'a [TypeTag]) -> Result<&'a TypeTag> {
    match type_tag {
        TypeTag::Generic(index) => generics.get(*index as usize).ok_or_else(|| {
            Error::type_error(format!(
                "type parameter T{} is out of bounds for {} type arguments",
                index,
                generics.len()
            ))
        }),
        _ => Ok(type_tag),
    }
}

fn mismatch(type_tag: &TypeTag, arg: &Arg) -> Error {
    Error::value(format!("{} is not a valid {}", arg.kind(), type_tag))
}

fn encode_arg(
    serializer: &mut Serializer,
    type_tag: &TypeTag,
    arg: &Arg,
    generics: &[TypeTag],
    options: &ArgumentOptions,
) -> Result<()> {
    let type_tag = resolve(type_tag, generics)?;
    match type_tag {
        TypeTag::Bool => {
            serializer.encode_bool(to_bool(type_tag, arg)?);
        }
        TypeTag::U8 => {
            serializer.encode_u8(to_int(type_tag, arg)?);
        }
        TypeTag::U16 => {
            serializer.encode_u16(to_int(type_tag, arg)?);
        }
        TypeTag::U32 => {
            serializer.encode_u32(to_int(type_tag, arg)?);
        }
        TypeTag::U64 => {
            serializer.encode_u64(to_int(type_tag, arg)?);
        }
        TypeTag::U128 => {
            serializer.encode_u128(to_int(type_tag, arg)?);
        }
        TypeTag::U256 => {
            serializer.encode_u256(to_u256(type_tag, arg)?);
        }
        TypeTag::I8 => {
            serializer.encode_i8(to_int(type_tag, arg)?);
        }
        TypeTag::I16 => {
            serializer.encode_i16(to_int(type_tag, arg)?);
        }
        TypeTag::I32 => {
            serializer.encode_i32(to_int(type_tag, arg)?);
        }
        TypeTag::I64 => {
            serializer.encode_i64(to_int(type_tag, arg)?);
        }
        TypeTag::I128 => {
            serializer.encode_i128(to_int(type_tag, arg)?);
        }
        TypeTag::I256 => {
            serializer.encode_i256(to_i256(type_tag, arg)?);
        }
        TypeTag::Address | TypeTag::Signer => {
            serializer.encode_struct(&to_address(type_tag, arg)?);
        }
        TypeTag::Vector(inner) => encode_vector(serializer, inner, arg, generics, options)?,
        TypeTag::Reference(inner) => encode_arg(serializer, inner, arg, generics, options)?,
        TypeTag::Struct(tag) if tag.is_string() => match arg {
            Arg::String(s) => {
                serializer.encode_str(s);
            }
            _ => return Err(mismatch(type_tag, arg)),
        },
        TypeTag::Struct(tag) if tag.is_object() => {
            serializer.encode_struct(&to_address(type_tag, arg)?);
        }
        TypeTag::Struct(tag) if tag.is_option() => {
            encode_option(serializer, &tag.type_args[0], arg, generics, options)?
        }
        TypeTag::Struct(tag) => {
            return Err(Error::type_error(format!(
                "{} cannot be passed as an argument",
                tag
            )))
        }
        TypeTag::Generic(_) => return Err(Error::type_error("unresolved type parameter")),
    }
    Ok(())
}

/// `vector<u8>` also takes raw bytes, or a string whose UTF-8 bytes are used as is.
fn encode_vector(
    serializer: &mut Serializer,
    inner: &TypeTag,
    arg: &Arg,
    generics: &[TypeTag],
    options: &ArgumentOptions,
) -> Result<()> {
    let inner = resolve(inner, generics)?;
    match (inner, arg) {
        (TypeTag::U8, Arg::Bytes(bytes)) => {
            serializer.encode_bytes(bytes);
        }
        (TypeTag::U8, Arg::String(s)) => {
            serializer.encode_bytes(s.as_bytes());
        }
        (_, Arg::Seq(items)) => {
            serializer.encode_len(items.len());
            for item in items {
                encode_arg(serializer, inner, item, generics, options)?;
            }
        }
        _ => return Err(mismatch(&TypeTag::vector(inner.clone()), arg)),
    }
    Ok(())
}

fn encode_option(
    serializer: &mut Serializer,
    inner: &TypeTag,
    arg: &Arg,
    generics: &[TypeTag],
    options: &ArgumentOptions,
) -> Result<()> {
    if options.compatibility_mode {
        if let Arg::String(s) = arg {
            if let Some(bytes) = decode_serialized(s, inner, generics) {
                debug!(type_tag = %inner, len = bytes.len(), "re-parsed serialized option argument");
                serializer.encode_u8(1).encode_fixed_bytes(&bytes);
                return Ok(());
            }
        }
    }
    // A list of at most one element reads as the option itself, unless the option holds a
    // vector and the list is that vector.
    let holds_vector = matches!(resolve(inner, generics), Ok(TypeTag::Vector(_)));
    match arg {
        Arg::Null | Arg::Option(None) => {
            serializer.encode_u8(0);
        }
        Arg::Option(Some(value)) => {
            serializer.encode_u8(1);
            encode_arg(serializer, inner, value, generics, options)?;
        }
        Arg::Seq(items) if items.is_empty() && !holds_vector => {
            serializer.encode_u8(0);
        }
        Arg::Seq(items) if items.len() == 1 && !holds_vector => {
            serializer.encode_u8(1);
            encode_arg(serializer, inner, &items[0], generics, options)?;
        }
        value => {
            serializer.encode_u8(1);
            encode_arg(serializer, inner, value, generics, options)?;
        }
    }
    Ok(())
}

/// `0x`-prefixed hex of a BCS encoded value, kept only if it decodes as exactly one `type_tag`.
fn decode_serialized(s: &str, type_tag: &TypeTag, generics: &[TypeTag]) -> Option<Vec<u8>> {
    let bytes = hex::decode(s.strip_prefix("0x")?).ok()?;
    let mut deserializer = Deserializer::new(&bytes);
    skip_value(&mut deserializer, type_tag, generics).ok()?;
    deserializer.finish().ok()?;
    Some(bytes)
}

fn skip_value(
    deserializer: &mut Deserializer<'_>,
    type_tag: &TypeTag,
    generics: &[TypeTag],
) -> aptos_bcs::Result<()> {
    let type_tag = resolve(type_tag, generics).map_err(aptos_bcs::Error::custom)?;
    match type_tag {
        TypeTag::Bool => {
            deserializer.decode_bool();
        }
        TypeTag::U8 => {
            deserializer.decode_u8();
        }
        TypeTag::U16 => {
            deserializer.decode_u16();
        }
        TypeTag::U32 => {
            deserializer.decode_u32();
        }
        TypeTag::U64 => {
            deserializer.decode_u64();
        }
        TypeTag::U128 => {
            deserializer.decode_u128();
        }
        TypeTag::U256 => {
            deserializer.decode_u256();
        }
        TypeTag::I8 => {
            deserializer.decode_i8();
        }
        TypeTag::I16 => {
            deserializer.decode_i16();
        }
        TypeTag::I32 => {
            deserializer.decode_i32();
        }
        TypeTag::I64 => {
            deserializer.decode_i64();
        }
        TypeTag::I128 => {
            deserializer.decode_i128();
        }
        TypeTag::I256 => {
            deserializer.decode_i256();
        }
        TypeTag::Address | TypeTag::Signer => {
            deserializer.decode_array::<{ AccountAddress::LENGTH }>();
        }
        TypeTag::Vector(inner) => {
            let len = deserializer.decode_len();
            for _ in 0..len {
                deserializer.check()?;
                skip_value(deserializer, inner, generics)?;
            }
        }
        TypeTag::Reference(inner) => skip_value(deserializer, inner, generics)?,
        TypeTag::Struct(tag) if tag.is_string() => {
            deserializer.decode_string();
        }
        TypeTag::Struct(tag) if tag.is_object() => {
            deserializer.decode_array::<{ AccountAddress::LENGTH }>();
        }
        TypeTag::Struct(tag) if tag.is_option() => match deserializer.decode_len() {
            0 => {}
            1 => skip_value(deserializer, &tag.type_args[0], generics)?,
            len => {
                deserializer.check()?;
                return Err(aptos_bcs::Error::custom(format!(
                    "option with {} elements",
                    len
                )));
            }
        },
        TypeTag::Struct(tag) => {
            return Err(aptos_bcs::Error::custom(format!("cannot decode {}", tag)))
        }
        TypeTag::Generic(_) => return Err(aptos_bcs::Error::custom("unresolved type parameter")),
    }
    deserializer.check()
}

fn to_bool(type_tag: &TypeTag, arg: &Arg) -> Result<bool> {
    match arg {
        Arg::Bool(b) => Ok(*b),
        Arg::String(s) if s == "true" => Ok(true),
        Arg::String(s) if s == "false" => Ok(false),
        _ => Err(mismatch(type_tag, arg)),
    }
}

fn to_address(type_tag: &TypeTag, arg: &Arg) -> Result<AccountAddress> {
    match arg {
        Arg::Address(address) => Ok(*address),
        Arg::String(s) => AccountAddress::from_str_relaxed(s)
            .map_err(|e| Error::value(format!("'{}' is not a valid address: {}", s, e))),
        _ => Err(mismatch(type_tag, arg)),
    }
}

/// Integers may be given natively, as whole floats or as decimal strings.
fn to_bigint(type_tag: &TypeTag, arg: &Arg) -> Result<BigInt> {
    match arg {
        Arg::Int(value) => Ok(value.clone()),
        Arg::Float(f) if f.is_finite() && f.fract() == 0.0 => BigInt::from_f64(*f)
            .ok_or_else(|| Error::value(format!("{} is not a valid {}", f, type_tag))),
        Arg::Float(f) => Err(Error::value(format!("{} is not an integer", f))),
        Arg::String(s) if s.contains('_') => {
            Err(Error::value(format!("'{}' is not a decimal integer", s)))
        }
        Arg::String(s) => s
            .trim()
            .parse::<BigInt>()
            .map_err(|_| Error::value(format!("'{}' is not a decimal integer", s))),
        _ => Err(mismatch(type_tag, arg)),
    }
}

fn out_of_range(type_tag: &TypeTag, value: &BigInt) -> Error {
    Error::value(format!("{} is out of range for {}", value, type_tag))
}

fn to_int<T>(type_tag: &TypeTag, arg: &Arg) -> Result<T>
where
    for<'a> T: TryFrom<&'a BigInt>,
{
    let value = to_bigint(type_tag, arg)?;
    T::try_from(&value).map_err(|_| out_of_range(type_tag, &value))
}

fn to_u256(type_tag: &TypeTag, arg: &Arg) -> Result<U256> {
    let value = to_bigint(type_tag, arg)?;
    let (sign, bytes) = value.to_bytes_le();
    if sign == Sign::Minus || bytes.len() > 32 {
        return Err(out_of_range(type_tag, &value));
    }
    let mut buf = [0u8; 32];
    buf[..bytes.len()].copy_from_slice(&bytes);
    Ok(U256::from_le_bytes(buf))
}

fn to_i256(type_tag: &TypeTag, arg: &Arg) -> Result<I256> {
    let value = to_bigint(type_tag, arg)?;
    let bytes = value.to_signed_bytes_le();
    if bytes.len() > 32 {
        return Err(out_of_range(type_tag, &value));
    }
    let fill = if value.sign() == Sign::Minus { 0xff } else { 0 };
    let mut buf = [fill; 32];
    buf[..bytes.len()].copy_from_slice(&bytes);
    Ok(I256::from_le_bytes(buf))
}
