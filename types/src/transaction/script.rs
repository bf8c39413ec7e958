// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use crate::{
    identifier::Identifier,
    language_storage::{ModuleId, TypeTag},
    transaction::transaction_argument::TransactionArgument,
};
use aptos_bcs::{CanonicalDeserialize, CanonicalSerialize, Deserializer, Serializer};
use std::fmt;

/// Call a Move script.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Script {
    code: Vec<u8>,
    ty_args: Vec<TypeTag>,
    args: Vec<TransactionArgument>,
}

impl Script {
    pub fn new(code: Vec<u8>, ty_args: Vec<TypeTag>, args: Vec<TransactionArgument>) -> Self {
        Script {
            code,
            ty_args,
            args,
        }
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn ty_args(&self) -> &[TypeTag] {
        &self.ty_args
    }

    pub fn args(&self) -> &[TransactionArgument] {
        &self.args
    }

    pub fn into_inner(self) -> (Vec<u8>, Vec<TransactionArgument>) {
        (self.code, self.args)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script")
            .field("code", &hex::encode(&self.code))
            .field("ty_args", &self.ty_args)
            .field("args", &self.args)
            .finish()
    }
}

impl CanonicalSerialize for Script {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer
            .encode_bytes(&self.code)
            .encode_vec(&self.ty_args)
            .encode_vec(&self.args);
    }
}

impl CanonicalDeserialize for Script {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let code = deserializer.decode_bytes();
        let ty_args = deserializer.decode_vec()?;
        let args = deserializer.decode_vec()?;
        Ok(Script::new(code, ty_args, args))
    }
}

/// Call a public entry function of a published module. Arguments are BCS encoded values.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct EntryFunction {
    module: ModuleId,
    function: Identifier,
    ty_args: Vec<TypeTag>,
    args: Vec<Vec<u8>>,
}

impl EntryFunction {
    pub fn new(
        module: ModuleId,
        function: Identifier,
        ty_args: Vec<TypeTag>,
        args: Vec<Vec<u8>>,
    ) -> Self {
        EntryFunction {
            module,
            function,
            ty_args,
            args,
        }
    }

    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    pub fn function(&self) -> &Identifier {
        &self.function
    }

    pub fn ty_args(&self) -> &[TypeTag] {
        &self.ty_args
    }

    pub fn args(&self) -> &[Vec<u8>] {
        &self.args
    }

    pub fn into_inner(self) -> (ModuleId, Identifier, Vec<TypeTag>, Vec<Vec<u8>>) {
        (self.module, self.function, self.ty_args, self.args)
    }
}

impl fmt::Debug for EntryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryFunction")
            .field("module", &self.module.to_string())
            .field("function", &self.function.as_str())
            .field("ty_args", &self.ty_args)
            .field(
                "args",
                &self.args.iter().map(hex::encode).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl CanonicalSerialize for EntryFunction {
    fn serialize(&self, serializer: &mut Serializer) {
        serializer
            .encode_struct(&self.module)
            .encode_struct(&self.function)
            .encode_vec(&self.ty_args)
            .encode_vec_with(&self.args, |s, arg| {
                s.encode_bytes(arg);
            });
    }
}

impl CanonicalDeserialize for EntryFunction {
    fn deserialize(deserializer: &mut Deserializer<'_>) -> aptos_bcs::Result<Self> {
        let module = deserializer.decode_struct()?;
        let function = deserializer.decode_struct()?;
        let ty_args = deserializer.decode_vec()?;
        let args = deserializer.decode_vec_with(|d| {
            let bytes = d.decode_bytes();
            d.check().map(|_| bytes)
        })?;
        Ok(EntryFunction::new(module, function, ty_args, args))
    }
}
