// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    account_address::AccountAddress,
    identifier::Identifier,
    parser::{parse_struct_tag, parse_type_tag, TypeTagParseError},
};
use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const CORE_CODE_ADDRESS: AccountAddress = AccountAddress::ONE;

/// Type tags nested deeper than this are rejected by the decoder.
pub const MAX_TYPE_TAG_NESTING: usize = 8;

/// A Move type.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    I8,
    I16,
    I32,
    I64,
    I128,
    I256,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    Reference(Box<TypeTag>),
    /// A type parameter of the enclosing function, `T0`, `T1`, ...
    Generic(u16),
}

impl TypeTag {
    pub fn vector(inner: TypeTag) -> Self {
        TypeTag::Vector(Box::new(inner))
    }

    pub fn reference(inner: TypeTag) -> Self {
        TypeTag::Reference(Box::new(inner))
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(
            self,
            TypeTag::Vector(_) | TypeTag::Struct(_) | TypeTag::Reference(_) | TypeTag::Generic(_)
        )
    }

    /// `signer` or `&signer`.
    pub fn is_signer(&self) -> bool {
        match self {
            TypeTag::Signer => true,
            TypeTag::Reference(inner) => matches!(**inner, TypeTag::Signer),
            _ => false,
        }
    }

    /// The canonical Move syntax, identical to `Display`.
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }

    fn variant_index(&self) -> u32 {
        match self {
            TypeTag::Bool => 0,
            TypeTag::U8 => 1,
            TypeTag::U64 => 2,
            TypeTag::U128 => 3,
            TypeTag::Address => 4,
            TypeTag::Signer => 5,
            TypeTag::Vector(_) => 6,
            TypeTag::Struct(_) => 7,
            TypeTag::U16 => 8,
            TypeTag::U32 => 9,
            TypeTag::U256 => 10,
            TypeTag::I8 => 11,
            TypeTag::I16 => 12,
            TypeTag::I32 => 13,
            TypeTag::I64 => 14,
            TypeTag::I128 => 15,
            TypeTag::I256 => 16,
            TypeTag::Generic(_) => 254,
            TypeTag::Reference(_) => 255,
        }
    }
}

impl From<StructTag> for TypeTag {
    fn from(tag: StructTag) -> Self {
        TypeTag::Struct(Box::new(tag))
    }
}

impl FromStr for TypeTag {
    type Err = TypeTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type_tag(s)
    }
}

impl TryFrom<String> for TypeTag {
    type Error = TypeTagParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_type_tag(&s)
    }
}

impl From<TypeTag> for String {
    fn from(tag: TypeTag) -> String {
        tag.to_string()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::U8 => write!(f, "u8"),
            TypeTag::U16 => write!(f, "u16"),
            TypeTag::U32 => write!(f, "u32"),
            TypeTag::U64 => write!(f, "u64"),
            TypeTag::U128 => write!(f, "u128"),
            TypeTag::U256 => write!(f, "u256"),
            TypeTag::I8 => write!(f, "i8"),
            TypeTag::I16 => write!(f, "i16"),
            TypeTag::I32 => write!(f, "i32"),
            TypeTag::I64 => write!(f, "i64"),
            TypeTag::I128 => write!(f, "i128"),
            TypeTag::I256 => write!(f, "i256"),
            TypeTag::Address => write!(f, "address"),
            TypeTag::Signer => write!(f, "signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{}>", inner),
            TypeTag::Struct(tag) => write!(f, "{}", tag),
            TypeTag::Reference(inner) => write!(f, "&{}", inner),
            TypeTag::Generic(index) => write!(f, "T{}", index),
        }
    }
}

impl CanonicalSerialize for TypeTag {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer.encode_variant_index(self.variant_index());
        match self {
            TypeTag::Vector(inner) | TypeTag::Reference(inner) => {
                serializer.encode_struct(inner);
            }
            TypeTag::Struct(tag) => {
                serializer.encode_struct(tag);
            }
            TypeTag::Generic(index) => {
                serializer.encode_u16(*index);
            }
            _ => {}
        }
    }
}

impl CanonicalDeserialize for TypeTag {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        decode_type_tag(deserializer, 0)
    }
}

fn decode_type_tag(deserializer: &mut Deserializer<'_>, depth: usize) -> aptos_bcs::Result<TypeTag> {
    let index = deserializer.decode_variant_index();
    deserializer.check()?;
    let tag = match index {
        0 => TypeTag::Bool,
        1 => TypeTag::U8,
        2 => TypeTag::U64,
        3 => TypeTag::U128,
        4 => TypeTag::Address,
        5 => TypeTag::Signer,
        6 | 7 | 255 if depth >= MAX_TYPE_TAG_NESTING => {
            return Err(aptos_bcs::Error::custom(format!(
                "type tag nesting exceeds {}",
                MAX_TYPE_TAG_NESTING
            )))
        }
        6 => TypeTag::vector(decode_type_tag(deserializer, depth + 1)?),
        7 => decode_struct_tag(deserializer, depth + 1)?.into(),
        8 => TypeTag::U16,
        9 => TypeTag::U32,
        10 => TypeTag::U256,
        11 => TypeTag::I8,
        12 => TypeTag::I16,
        13 => TypeTag::I32,
        14 => TypeTag::I64,
        15 => TypeTag::I128,
        16 => TypeTag::I256,
        254 => TypeTag::Generic(deserializer.decode_u16()),
        255 => TypeTag::reference(decode_type_tag(deserializer, depth + 1)?),
        index => return Err(aptos_bcs::Error::unknown_variant("TypeTag", index)),
    };
    deserializer.check().map(|_| tag)
}

/// A fully qualified struct type, `address::module::Name<type_args>`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StructTag {
    pub address: AccountAddress,
    pub module: Identifier,
    pub name: Identifier,
    pub type_args: Vec<TypeTag>,
}

impl StructTag {
    pub fn new(
        address: AccountAddress,
        module: Identifier,
        name: Identifier,
        type_args: Vec<TypeTag>,
    ) -> Self {
        Self {
            address,
            module,
            name,
            type_args,
        }
    }

    fn framework(module: &'static str, name: &'static str, type_args: Vec<TypeTag>) -> Self {
        Self::new(
            CORE_CODE_ADDRESS,
            Identifier::from_static(module),
            Identifier::from_static(name),
            type_args,
        )
    }

    /// `0x1::string::String`
    pub fn string() -> Self {
        Self::framework("string", "String", vec![])
    }

    /// `0x1::option::Option<inner>`
    pub fn option(inner: TypeTag) -> Self {
        Self::framework("option", "Option", vec![inner])
    }

    /// `0x1::object::Object<inner>`
    pub fn object(inner: TypeTag) -> Self {
        Self::framework("object", "Object", vec![inner])
    }

    /// `0x1::aptos_coin::AptosCoin`
    pub fn aptos_coin() -> Self {
        Self::framework("aptos_coin", "AptosCoin", vec![])
    }

    fn is_framework(&self, module: &str, name: &str) -> bool {
        self.address == CORE_CODE_ADDRESS && self.module == module && self.name == name
    }

    pub fn is_string(&self) -> bool {
        self.is_framework("string", "String") && self.type_args.is_empty()
    }

    pub fn is_option(&self) -> bool {
        self.is_framework("option", "Option") && self.type_args.len() == 1
    }

    pub fn is_object(&self) -> bool {
        self.is_framework("object", "Object") && self.type_args.len() == 1
    }

    pub fn module_id(&self) -> ModuleId {
        ModuleId::new(self.address, self.module.clone())
    }

    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }
}

impl FromStr for StructTag {
    type Err = TypeTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_struct_tag(s)
    }
}

impl TryFrom<String> for StructTag {
    type Error = TypeTagParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_struct_tag(&s)
    }
}

impl From<StructTag> for String {
    fn from(tag: StructTag) -> String {
        tag.to_string()
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}::{}::{}",
            self.address.to_hex_literal(),
            self.module,
            self.name
        )?;
        if let Some((first, rest)) = self.type_args.split_first() {
            write!(f, "<{}", first)?;
            for ty in rest {
                write!(f, ", {}", ty)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl CanonicalSerialize for StructTag {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer
            .encode_struct(&self.address)
            .encode_struct(&self.module)
            .encode_struct(&self.name)
            .encode_vec(&self.type_args);
    }
}

impl CanonicalDeserialize for StructTag {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        decode_struct_tag(deserializer, 0)
    }
}

fn decode_struct_tag(
    deserializer: &mut Deserializer<'_>,
    depth: usize,
) -> aptos_bcs::Result<StructTag> {
    let address = deserializer.decode_struct::<AccountAddress>()?;
    let module = deserializer.decode_struct::<Identifier>()?;
    let name = deserializer.decode_struct::<Identifier>()?;
    let type_args = deserializer.decode_vec_with(|d| decode_type_tag(d, depth))?;
    Ok(StructTag {
        address,
        module,
        name,
        type_args,
    })
}

/// Identifies a published module, `address::name`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ModuleId {
    address: AccountAddress,
    name: Identifier,
}

impl ModuleId {
    pub fn new(address: AccountAddress, name: Identifier) -> Self {
        ModuleId { address, name }
    }

    pub fn name(&self) -> &Identifier {
        &self.name
    }

    pub fn address(&self) -> &AccountAddress {
        &self.address
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}::{}", self.address.to_hex_literal(), self.name)
    }
}

impl FromStr for ModuleId {
    type Err = TypeTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (address, name) = s
            .trim()
            .split_once("::")
            .ok_or_else(|| TypeTagParseError::InvalidModuleId(s.to_string()))?;
        let address = AccountAddress::from_hex_literal(address.trim())
            .map_err(|_| TypeTagParseError::InvalidModuleId(s.to_string()))?;
        let name = Identifier::new(name.trim())
            .map_err(|_| TypeTagParseError::InvalidModuleId(s.to_string()))?;
        Ok(ModuleId::new(address, name))
    }
}

impl CanonicalSerialize for ModuleId {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer
            .encode_struct(&self.address)
            .encode_struct(&self.name);
    }
}

impl CanonicalDeserialize for ModuleId {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let address = deserializer.decode_struct::<AccountAddress>()?;
        let name = deserializer.decode_struct::<Identifier>()?;
        Ok(Self { address, name })
    }
}

#[cfg(any(test, feature = "fuzzing"))]
mod arbitrary {
    use super::*;
    use proptest::{collection::vec, prelude::*};

    impl Arbitrary for TypeTag {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
            let leaf = prop_oneof![
                Just(TypeTag::Bool),
                Just(TypeTag::U8),
                Just(TypeTag::U16),
                Just(TypeTag::U32),
                Just(TypeTag::U64),
                Just(TypeTag::U128),
                Just(TypeTag::U256),
                Just(TypeTag::I8),
                Just(TypeTag::I64),
                Just(TypeTag::I256),
                Just(TypeTag::Address),
                Just(TypeTag::Signer),
                (0u16..8).prop_map(TypeTag::Generic),
            ];
            leaf.prop_recursive(4, 16, 3, |inner| {
                prop_oneof![
                    inner.clone().prop_map(TypeTag::vector),
                    inner.clone().prop_map(TypeTag::reference),
                    (
                        any::<AccountAddress>(),
                        any::<Identifier>(),
                        any::<Identifier>(),
                        vec(inner, 0..3),
                    )
                        .prop_map(|(address, module, name, type_args)| {
                            StructTag::new(address, module, name, type_args).into()
                        }),
                ]
            })
            .boxed()
        }
    }
}
