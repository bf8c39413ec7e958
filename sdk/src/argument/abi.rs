// Copyright (c) The Diem Core Contributors
// SPDX-License-Identifier: Apache-2.0

use super::{convert_arg, Arg};
use crate::{config::ArgumentOptions, Error, Result};
use aptos_bcs::{CanonicalSerialize, Serializer};
use aptos_types::{
    account_address::AccountAddress,
    identifier::Identifier,
    language_storage::{ModuleId, TypeTag},
    transaction::EntryFunction,
};
use serde::{Deserialize, Serialize};

/// The JSON ABI of a published module, as served by a node's REST API.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct MoveModule {
    pub address: AccountAddress,
    pub name: Identifier,
    #[serde(default)]
    pub exposed_functions: Vec<MoveFunction>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct MoveFunction {
    pub name: Identifier,
    #[serde(default)]
    pub visibility: String,
    #[serde(default)]
    pub is_entry: bool,
    #[serde(default)]
    pub is_view: bool,
    #[serde(default)]
    pub generic_type_params: Vec<MoveFunctionGenericTypeParam>,
    pub params: Vec<TypeTag>,
    #[serde(default, rename = "return")]
    pub return_types: Vec<TypeTag>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct MoveFunctionGenericTypeParam {
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl MoveModule {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::type_error(format!("invalid module ABI: {}", e)))
    }

    pub fn module_id(&self) -> ModuleId {
        ModuleId::new(self.address, self.name.clone())
    }

    pub fn function(&self, name: &str) -> Result<&MoveFunction> {
        self.exposed_functions
            .iter()
            .find(|function| function.name.as_str() == name)
            .ok_or_else(|| {
                Error::type_error(format!("{}::{} does not exist", self.module_id(), name))
            })
    }

    pub fn entry_function_abi(&self, name: &str) -> Result<EntryFunctionAbi> {
        let function = self.function(name)?;
        if !function.is_entry {
            return Err(Error::type_error(format!(
                "{}::{} is not an entry function",
                self.module_id(),
                name
            )));
        }
        Ok(EntryFunctionAbi(self.signature(function)))
    }

    pub fn view_function_abi(&self, name: &str) -> Result<ViewFunctionAbi> {
        let function = self.function(name)?;
        if !function.is_view {
            return Err(Error::type_error(format!(
                "{}::{} is not a view function",
                self.module_id(),
                name
            )));
        }
        Ok(ViewFunctionAbi(self.signature(function)))
    }

    fn signature(&self, function: &MoveFunction) -> FunctionSignature {
        FunctionSignature {
            module: self.module_id(),
            function: function.name.clone(),
            type_param_count: function.generic_type_params.len(),
            params: function.params.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct FunctionSignature {
    module: ModuleId,
    function: Identifier,
    type_param_count: usize,
    params: Vec<TypeTag>,
}

impl FunctionSignature {
    fn encode_args(
        &self,
        params: &[TypeTag],
        type_args: &[TypeTag],
        args: &[Arg],
        options: &ArgumentOptions,
    ) -> Result<Vec<Vec<u8>>> {
        if type_args.len() != self.type_param_count {
            return Err(Error::type_error(format!(
                "{}::{} expects {} type arguments but got {}",
                self.module,
                self.function,
                self.type_param_count,
                type_args.len()
            )));
        }
        if args.len() != params.len() {
            return Err(Error::value(format!(
                "{}::{} expects {} arguments but got {}",
                self.module,
                self.function,
                params.len(),
                args.len()
            )));
        }
        params
            .iter()
            .zip(args)
            .map(|(param, arg)| convert_arg(param, arg, type_args, options))
            .collect()
    }
}

/// Parameter types of an entry function, resolved ahead of time or read from a module ABI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFunctionAbi(FunctionSignature);

impl EntryFunctionAbi {
    pub fn new(
        module: ModuleId,
        function: Identifier,
        type_param_count: usize,
        params: Vec<TypeTag>,
    ) -> Self {
        Self(FunctionSignature {
            module,
            function,
            type_param_count,
            params,
        })
    }

    /// The parameters the caller supplies. Leading `signer` and `&signer` parameters are filled
    /// in by the transaction's signers.
    pub fn arg_types(&self) -> &[TypeTag] {
        let signers = self.0.params.iter().take_while(|param| param.is_signer()).count();
        &self.0.params[signers..]
    }

    pub fn build(
        &self,
        type_args: Vec<TypeTag>,
        args: &[Arg],
        options: &ArgumentOptions,
    ) -> Result<EntryFunction> {
        let args = self
            .0
            .encode_args(self.arg_types(), &type_args, args, options)?;
        Ok(EntryFunction::new(
            self.0.module.clone(),
            self.0.function.clone(),
            type_args,
            args,
        ))
    }
}

/// Parameter types of a view function. Unlike entry functions every parameter is supplied by
/// the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewFunctionAbi(FunctionSignature);

impl ViewFunctionAbi {
    pub fn new(
        module: ModuleId,
        function: Identifier,
        type_param_count: usize,
        params: Vec<TypeTag>,
    ) -> Self {
        Self(FunctionSignature {
            module,
            function,
            type_param_count,
            params,
        })
    }

    pub fn build(
        &self,
        type_args: Vec<TypeTag>,
        args: &[Arg],
        options: &ArgumentOptions,
    ) -> Result<ViewFunction> {
        let args = self
            .0
            .encode_args(&self.0.params, &type_args, args, options)?;
        Ok(ViewFunction {
            module: self.0.module.clone(),
            function: self.0.function.clone(),
            ty_args: type_args,
            args,
        })
    }
}

/// The body of a BCS view request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewFunction {
    pub module: ModuleId,
    pub function: Identifier,
    pub ty_args: Vec<TypeTag>,
    pub args: Vec<Vec<u8>>,
}

impl CanonicalSerialize for ViewFunction {
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
