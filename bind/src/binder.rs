//! This mod provides various types and utilities for code generation.

use indexmap::IndexMap;

use crate::typedef::{AbiField, Parameter, StateMutability};

/// Error type for code generation.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
    #[error("{0}")]
    BinderError(#[from] anyhow::Error),

    #[error("contract names({names}), abis({abis}) and bytecodes({bytecodes}) must have the same length")]
    LengthMismatch {
        names: usize,
        abis: usize,
        bytecodes: usize,
    },

    #[error("decode abi of contract `{contract}`: {source}")]
    Abi {
        contract: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("load type mapping: {0}")]
    Mapping(#[source] serde_json::Error),
}

/// The trait that the error returned by binder traits must implement.
pub trait BinderError: std::error::Error + Send + Sync + 'static {}

impl<T> BinderError for T where T: std::error::Error + Send + Sync + 'static {}

fn map_binder_error<E: BinderError>(error: E) -> BindError {
    BindError::BinderError(anyhow::Error::from(error))
}

/// Returns the key under which the tuple type of `parameter` is indexed.
///
/// Prefers the compiler's `internalType` stripped of array suffixes, e.g. `struct Lib.Point[]`
/// becomes `struct Lib.Point`, and falls back to the canonical component list.
pub fn tuple_key(parameter: &Parameter) -> String {
    match parameter.internal_type.as_deref() {
        Some(internal_type) => internal_type
            .split('[')
            .next()
            .unwrap_or(internal_type)
            .to_owned(),
        None => {
            let canonical = parameter.canonical_type();

            match canonical.rfind(')') {
                Some(end) => canonical[..=end].to_owned(),
                None => canonical,
            }
        }
    }
}

/// Context data of one contract to invoke [`bind`] function.
pub struct BinderContext<'a> {
    contract_name: &'a str,
    abi: &'a str,
    fields: &'a [AbiField],
    bytecode: Option<&'a str>,
    components: IndexMap<String, Vec<Parameter>>,
}

impl<'a> BinderContext<'a> {
    /// Create a new `BinderContext` object.
    ///
    /// `abi` is the json text `fields` were decoded from. An empty or `0x` bytecode
    /// is treated as no bytecode.
    pub fn new(
        contract_name: &'a str,
        abi: &'a str,
        fields: &'a [AbiField],
        bytecode: Option<&'a str>,
    ) -> Self {
        let bytecode = bytecode
            .map(|bytecode| bytecode.trim())
            .map(|bytecode| bytecode.strip_prefix("0x").unwrap_or(bytecode))
            .filter(|bytecode| !bytecode.is_empty());

        let mut cx = BinderContext {
            contract_name,
            abi,
            fields,
            bytecode,
            components: IndexMap::new(),
        };

        cx.index_components();

        cx
    }

    fn index_components(&mut self) {
        for field in self.fields {
            let parameters: Vec<&Parameter> = match field {
                AbiField::Function(function) => {
                    function.inputs.iter().chain(function.outputs.iter()).collect()
                }
                AbiField::Constructor(constructor) => constructor.inputs.iter().collect(),
                AbiField::Event(event) => event.inputs.iter().collect(),
                AbiField::Error(error) => error.inputs.iter().collect(),
                _ => vec![],
            };

            for parameter in parameters {
                self.index_component_of_parameter(parameter);
            }
        }
    }

    fn index_component_of_parameter(&mut self, parameter: &Parameter) {
        if let Some(components) = &parameter.components {
            let key = tuple_key(parameter);

            if !self.components.contains_key(&key) {
                self.components.insert(key, components.clone());

                // recursively index component.
                for parameter in components {
                    self.index_component_of_parameter(parameter);
                }
            }
        }
    }

    /// Returns the contract name.
    pub fn contract_name(&self) -> &str {
        self.contract_name
    }

    /// Returns the abi json text of the contract.
    pub fn abi(&self) -> &str {
        self.abi
    }

    /// Get the metadata of tuple type.
    pub fn component(&self, name: &str) -> Option<&Vec<Parameter>> {
        self.components.get(name)
    }

    /// Iterate the tuple types used by the contract, outer tuples before their components.
    pub fn components(&self) -> impl Iterator<Item = (&str, &[Parameter])> {
        self.components
            .iter()
            .map(|(key, components)| (key.as_str(), components.as_slice()))
    }

    /// Returns the bytecode string of compiled contract, without `0x` prefix.
    pub fn bytecode(&self) -> Option<&str> {
        self.bytecode
    }
}

/// A binder is the specific-language code generator of solidity abi.
///
/// One binder instance generates one source file containing every contract passed to [`bind`].
pub trait Binder {
    type Error: BinderError;

    type ContractBinder: ContractBinder;

    /// Start a new process of contract code generation.
    fn prepare(&mut self, cx: &BinderContext<'_>) -> Result<Self::ContractBinder, Self::Error>;

    /// Assemble the source file of `package` after every contract was bound.
    fn finalize(self, package: &str) -> Result<String, Self::Error>;
}

/// A trait object returns by [`prepare`](Binder::prepare) function.
pub trait ContractBinder {
    type Error: BinderError;

    type ConstructorBinder: ConstructorBinder;
    type FunctionBinder: FunctionBinder;
    type EventBinder: EventBinder;
    type TupleBinder: TupleBinder;

    /// This function is called to generate the declaration of a tuple type.
    fn bind_tuple(
        &mut self,
        cx: &BinderContext<'_>,
        name: &str,
    ) -> Result<Self::TupleBinder, Self::Error>;

    /// This function is called to generate contract `contructor` function.
    fn bind_constructor(
        &mut self,
        cx: &BinderContext<'_>,
        signature: &str,
        state: &StateMutability,
    ) -> Result<Self::ConstructorBinder, Self::Error>;

    /// This function is called to generate contract function.
    fn bind_function(
        &mut self,
        cx: &BinderContext<'_>,
        fn_name: &str,
        signature: &str,
        state: &StateMutability,
    ) -> Result<Self::FunctionBinder, Self::Error>;

    /// This function is called to generate contract `receive` function.
    fn bind_receiver(
        &mut self,
        cx: &BinderContext<'_>,
        state: &StateMutability,
    ) -> Result<(), Self::Error>;

    /// This function is called to generate contract `fallback` function.
    fn bind_fallback(
        &mut self,
        cx: &BinderContext<'_>,
        state: &StateMutability,
    ) -> Result<(), Self::Error>;

    /// Calling this function generates event handling related code.
    fn bind_event(
        &mut self,
        cx: &BinderContext<'_>,
        name: &str,
        signature: &str,
        anonymous: bool,
    ) -> Result<Self::EventBinder, Self::Error>;

    /// Calling this function generates error handling related code.
    fn bind_error(
        &mut self,
        cx: &BinderContext<'_>,
        name: &str,
        signature: &str,
    ) -> Result<(), Self::Error>;

    /// This function is called to generate contract deploy function.
    fn bind_deploy(&mut self, cx: &BinderContext<'_>, bytecode: &str) -> Result<(), Self::Error>;

    /// This function is called to clean up resources after the code generation process is end.
    fn finalize(&mut self, cx: &BinderContext<'_>) -> Result<(), Self::Error>;
}

/// A trait object returns by [`bind_constructor`](ContractBinder::bind_constructor) function.
pub trait ConstructorBinder {
    type Error: BinderError;

    /// This function is called to generate parameter list of the function's.
    fn bind_input(
        &mut self,
        cx: &BinderContext<'_>,
        index: usize,
        parameter: &Parameter,
    ) -> Result<(), Self::Error>;

    fn finalize(&mut self, cx: &BinderContext<'_>) -> Result<(), Self::Error>;
}

/// A trait object returns by [`bind_function`](ContractBinder::bind_function) function.
pub trait FunctionBinder {
    type Error: BinderError;

    /// This function is called to generate parameter list of the function's.
    fn bind_input(
        &mut self,
        cx: &BinderContext<'_>,
        index: usize,
        parameter: &Parameter,
    ) -> Result<(), Self::Error>;

    /// This function is called to generate output parameter list of the function's.
    fn bind_output(
        &mut self,
        cx: &BinderContext<'_>,
        index: usize,
        parameter: &Parameter,
    ) -> Result<(), Self::Error>;

    fn finalize(&mut self, cx: &BinderContext<'_>) -> Result<(), Self::Error>;
}

/// A trait object returns by [`bind_event`](ContractBinder::bind_event) function.
pub trait EventBinder {
    type Error: BinderError;

    fn bind_input(
        &mut self,
        cx: &BinderContext<'_>,
        index: usize,
        parameter: &Parameter,
    ) -> Result<(), Self::Error>;

    fn finalize(&mut self, cx: &BinderContext<'_>) -> Result<(), Self::Error>;
}

/// A trait object returns by [`bind_tuple`](ContractBinder::bind_tuple) function.
pub trait TupleBinder {
    type Error: BinderError;

    fn bind_field(
        &mut self,
        cx: &BinderContext<'_>,
        index: usize,
        parameter: &Parameter,
    ) -> Result<(), Self::Error>;

    fn finalize(&mut self, cx: &BinderContext<'_>) -> Result<(), Self::Error>;
}

/// Invoke code generation for every contract of one package.
///
/// On success, returns the generated source text.
pub fn bind<B: Binder>(
    contracts: &[BinderContext<'_>],
    package: &str,
    mut binder: B,
) -> Result<String, BindError> {
    for cx in contracts {
        log::trace!("bind contract {} into package {}", cx.contract_name(), package);

        bind_contract(cx, &mut binder)?;
    }

    binder.finalize(package).map_err(map_binder_error)
}

fn bind_contract<B: Binder>(cx: &BinderContext<'_>, binder: &mut B) -> Result<(), BindError> {
    let mut contract = binder.prepare(cx).map_err(map_binder_error)?;

    for (name, components) in cx.components() {
        let mut binder = contract.bind_tuple(cx, name).map_err(map_binder_error)?;

        for (index, parameter) in components.iter().enumerate() {
            binder
                .bind_field(cx, index, parameter)
                .map_err(map_binder_error)?;
        }

        binder.finalize(cx).map_err(map_binder_error)?;
    }

    if let Some(bytecode) = cx.bytecode() {
        contract
            .bind_deploy(cx, bytecode)
            .map_err(map_binder_error)?;
    }

    for field in cx.fields {
        match field {
            AbiField::Function(function) => {
                let mut binder = contract
                    .bind_function(
                        cx,
                        &function.name,
                        function.signature().as_str(),
                        &function.state_mutability,
                    )
                    .map_err(map_binder_error)?;

                for (index, parameter) in function.inputs.iter().enumerate() {
                    binder
                        .bind_input(cx, index, parameter)
                        .map_err(map_binder_error)?;
                }

                for (index, parameter) in function.outputs.iter().enumerate() {
                    binder
                        .bind_output(cx, index, parameter)
                        .map_err(map_binder_error)?;
                }

                binder.finalize(cx).map_err(map_binder_error)?;
            }
            AbiField::Constructor(constructor) => {
                let mut binder = contract
                    .bind_constructor(
                        cx,
                        constructor.signature().as_str(),
                        &constructor.state_mutability,
                    )
                    .map_err(map_binder_error)?;

                for (index, parameter) in constructor.inputs.iter().enumerate() {
                    binder
                        .bind_input(cx, index, parameter)
                        .map_err(map_binder_error)?;
                }

                binder.finalize(cx).map_err(map_binder_error)?;
            }
            AbiField::Receive(receiver) => {
                contract
                    .bind_receiver(cx, &receiver.state_mutability)
                    .map_err(map_binder_error)?;
            }
            AbiField::Fallback(fallback) => {
                contract
                    .bind_fallback(cx, &fallback.state_mutability)
                    .map_err(map_binder_error)?;
            }
            AbiField::Event(event) => {
                let mut binder = contract
                    .bind_event(cx, &event.name, &event.signature(), event.anonymous)
                    .map_err(map_binder_error)?;

                for (index, parameter) in event.inputs.iter().enumerate() {
                    binder
                        .bind_input(cx, index, parameter)
                        .map_err(map_binder_error)?;
                }

                binder.finalize(cx).map_err(map_binder_error)?;
            }
            AbiField::Error(error) => {
                contract
                    .bind_error(cx, &error.name, &error.signature())
                    .map_err(map_binder_error)?;
            }
        }
    }

    contract.finalize(cx).map_err(map_binder_error)
}

#[cfg(test)]
mod tests {

    use crate::typedef::AbiField;

    use super::*;

    const ABI: &str = r#"[
        {
            "type": "function",
            "name": "route",
            "inputs": [
                {
                    "name": "path",
                    "type": "tuple[]",
                    "internalType": "struct Router.Hop[]",
                    "components": [
                        { "name": "pool", "type": "address", "internalType": "address" },
                        {
                            "name": "fee",
                            "type": "tuple",
                            "internalType": "struct Router.Fee",
                            "components": [
                                { "name": "bps", "type": "uint16", "internalType": "uint16" }
                            ]
                        }
                    ]
                }
            ],
            "outputs": [],
            "stateMutability": "nonpayable"
        }
    ]"#;

    #[test]
    fn binder_context_new() {
        let fields: Vec<AbiField> = serde_json::from_str(ABI).unwrap();

        let cx = BinderContext::new("Router", ABI, &fields, Some("0x6080"));

        assert_eq!(cx.contract_name(), "Router");
        assert_eq!(cx.bytecode(), Some("6080"));
        assert_eq!(cx.component("struct Router.Hop").map(Vec::len), Some(2));
        assert_eq!(cx.component("struct Router.Fee").map(Vec::len), Some(1));

        let keys = cx.components().map(|(key, _)| key).collect::<Vec<_>>();

        assert_eq!(keys, ["struct Router.Hop", "struct Router.Fee"]);
    }

    #[test]
    fn binder_context_empty_bytecode() {
        let fields: Vec<AbiField> = serde_json::from_str(ABI).unwrap();

        assert_eq!(BinderContext::new("Router", ABI, &fields, Some("0x")).bytecode(), None);
        assert_eq!(BinderContext::new("Router", ABI, &fields, Some("")).bytecode(), None);
        assert_eq!(BinderContext::new("Router", ABI, &fields, None).bytecode(), None);
    }

    #[test]
    fn tuple_key_without_internal_type() {
        let parameter: Parameter = serde_json::from_str(
            r#"{
                "name": "pair",
                "type": "tuple[3]",
                "components": [
                    { "name": "a", "type": "uint256" },
                    { "name": "b", "type": "bool" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(tuple_key(&parameter), "(uint256,bool)");
    }
}
