//! This module provides a [`binder`](crate::binder::Binder) implementation for go code.
//!
//! The generated file targets the `go-ethereum` bind runtime, mirroring the layout of `abigen` output.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    fmt::Write,
    rc::Rc,
};

use indexmap::IndexMap;

use crate::{
    binder::{
        tuple_key, BindError, Binder, BinderContext, ConstructorBinder, ContractBinder,
        EventBinder, FunctionBinder, TupleBinder,
    },
    mapping::BinderTypeMapping,
    typedef::{keccak256, selector, to_hex, topic, Parameter, SimpleType, StateMutability, Type},
};

/// Error type that raised by the functions in this mod.
#[derive(Debug, thiserror::Error)]
pub enum GoBinderError {
    #[error("abi type `{0}` has no go type mapping")]
    UnsupportedType(String),

    #[error("`{0}` type mapping not found")]
    RuntimeTypeNotFound(String),

    #[error("quote abi json: {0}")]
    Quote(#[from] serde_json::Error),

    #[error(transparent)]
    Format(#[from] std::fmt::Error),
}

/// Load the abi to go type mapping shipped with this crate.
pub fn go_mapping() -> Result<BinderTypeMapping, BindError> {
    include_str!("go_mapping.json")
        .parse()
        .map_err(BindError::Mapping)
}

const HEADER: &str = r#"// Code generated - DO NOT EDIT.
// This file is a generated binding and any manual changes will be lost.

package $package

import (
	"errors"
	"math/big"
	"strings"

	ethereum "github.com/ethereum/go-ethereum"
	"github.com/ethereum/go-ethereum/accounts/abi"
	"github.com/ethereum/go-ethereum/accounts/abi/bind"
	"github.com/ethereum/go-ethereum/common"
	"github.com/ethereum/go-ethereum/core/types"
	"github.com/ethereum/go-ethereum/event"
)

// Reference imports to suppress errors if they are not otherwise used.
var (
	_ = errors.New
	_ = big.NewInt
	_ = strings.NewReader
	_ = ethereum.NotFound
	_ = bind.Bind
	_ = common.Big1
	_ = types.BloomLookup
	_ = event.NewSubscription
	_ = abi.ConvertType
)
"#;

const GO_KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

struct GoModuleContext {
    mapping: BinderTypeMapping,
    /// struct declarations shared by all contracts of the package, keyed by go type name.
    structs: IndexMap<String, String>,
    /// tuple key and canonical type -> go type name.
    tuple_names: HashMap<String, String>,
    struct_names: HashSet<String>,
    contracts: Vec<String>,
}

impl GoModuleContext {
    /// Returns the go type name of a tuple.
    ///
    /// Tuples with the same key and shape share one name, a different shape under a taken
    /// name gets a numeric suffix.
    fn resolve_tuple(&mut self, key: &str, components: &[Parameter]) -> String {
        let identity = format!("{}{}", key, tuple_signature(components));

        if let Some(name) = self.tuple_names.get(&identity) {
            return name.clone();
        }

        let name = overloaded_name(&struct_name(key), &self.struct_names);

        self.struct_names.insert(name.clone());
        self.tuple_names.insert(identity, name.clone());

        name
    }
}

/// The code generator for go language.
///
/// All contracts bound by one `GoBinder` are written into one go package file.
pub struct GoBinder(Rc<RefCell<GoModuleContext>>);

impl From<BinderTypeMapping> for GoBinder {
    fn from(mapping: BinderTypeMapping) -> Self {
        Self(Rc::new(RefCell::new(GoModuleContext {
            mapping,
            structs: Default::default(),
            tuple_names: Default::default(),
            struct_names: Default::default(),
            contracts: Default::default(),
        })))
    }
}

impl GoBinder {
    /// Create new `GoBinder` to generate go binding code.
    pub fn new(mapping: BinderTypeMapping) -> Self {
        mapping.into()
    }
}

impl Binder for GoBinder {
    type Error = GoBinderError;
    type ContractBinder = GoContractBinder;

    fn prepare(&mut self, cx: &BinderContext<'_>) -> Result<Self::ContractBinder, Self::Error> {
        let contract = GoContractBinder::new(cx.contract_name(), self.0.clone());

        // nested tuples are referenced before their own declaration is bound.
        for (key, components) in cx.components() {
            let name = self.0.borrow_mut().resolve_tuple(key, components);

            contract
                .context
                .borrow_mut()
                .tuples
                .insert(key.to_owned(), name);
        }

        Ok(contract)
    }

    fn finalize(self, package: &str) -> Result<String, Self::Error> {
        let module = self.0.borrow();

        let mut code = HEADER.replace("$package", package);

        for declaration in module.structs.values() {
            code.push_str(declaration);
        }

        for contract in &module.contracts {
            code.push_str(contract);
        }

        Ok(code)
    }
}

struct GoContractContext {
    /// go type name of the contract.
    name: String,
    bytecode: Option<String>,
    /// tuple key -> go type name.
    tuples: HashMap<String, String>,
    constructor: Vec<(String, String)>,
    method_keys: HashSet<String>,
    event_keys: HashSet<String>,
    calls: Vec<String>,
    transacts: Vec<String>,
    events: Vec<String>,
}

/// An individual contract generator
pub struct GoContractBinder {
    module: Rc<RefCell<GoModuleContext>>,
    context: Rc<RefCell<GoContractContext>>,
}

impl GoContractBinder {
    fn new(contract_name: &str, module: Rc<RefCell<GoModuleContext>>) -> Self {
        Self {
            module,
            context: Rc::new(RefCell::new(GoContractContext {
                name: capitalise(contract_name),
                bytecode: None,
                tuples: Default::default(),
                constructor: Default::default(),
                method_keys: Default::default(),
                event_keys: Default::default(),
                calls: Default::default(),
                transacts: Default::default(),
                events: Default::default(),
            })),
        }
    }
}

impl ContractBinder for GoContractBinder {
    type Error = GoBinderError;

    type ConstructorBinder = GoConstructorBinder;

    type FunctionBinder = GoFunctionBinder;

    type EventBinder = GoEventBinder;

    type TupleBinder = GoTupleBinder;

    fn bind_tuple(
        &mut self,
        _cx: &BinderContext<'_>,
        name: &str,
    ) -> Result<Self::TupleBinder, Self::Error> {
        let name = self
            .context
            .borrow()
            .tuples
            .get(name)
            .cloned()
            .unwrap_or_else(|| struct_name(name));

        Ok(GoTupleBinder {
            name,
            module: self.module.clone(),
            context: self.context.clone(),
            fields: Default::default(),
            used: Default::default(),
        })
    }

    fn bind_constructor(
        &mut self,
        _cx: &BinderContext<'_>,
        _signature: &str,
        _state: &StateMutability,
    ) -> Result<Self::ConstructorBinder, Self::Error> {
        Ok(GoConstructorBinder {
            module: self.module.clone(),
            context: self.context.clone(),
            inputs: Default::default(),
        })
    }

    fn bind_function(
        &mut self,
        _cx: &BinderContext<'_>,
        fn_name: &str,
        signature: &str,
        state: &StateMutability,
    ) -> Result<Self::FunctionBinder, Self::Error> {
        let key = {
            let mut context = self.context.borrow_mut();

            let key = overloaded_name(fn_name, &context.method_keys);

            context.method_keys.insert(key.clone());

            key
        };

        Ok(GoFunctionBinder {
            fn_name: fn_name.to_owned(),
            key,
            signature: signature.to_owned(),
            state: *state,
            module: self.module.clone(),
            context: self.context.clone(),
            inputs: Default::default(),
            outputs: Default::default(),
            solidity_inputs: Default::default(),
            solidity_outputs: Default::default(),
        })
    }

    fn bind_receiver(
        &mut self,
        _cx: &BinderContext<'_>,
        _state: &StateMutability,
    ) -> Result<(), Self::Error> {
        let mut context = self.context.borrow_mut();

        let c = context.name.clone();

        let mut code = String::new();

        writeln!(code)?;
        writeln!(
            code,
            "// Receive is a paid mutator transaction binding the contract receive function."
        )?;
        writeln!(code, "//")?;
        writeln!(code, "// Solidity: receive() payable returns()")?;
        writeln!(
            code,
            "func (_{c} *{c}Transactor) Receive(opts *bind.TransactOpts) (*types.Transaction, error) {{"
        )?;
        writeln!(
            code,
            "\treturn _{c}.contract.RawTransact(opts, nil) // calldata is disallowed for receive function"
        )?;
        writeln!(code, "}}")?;

        context.transacts.push(code);

        Ok(())
    }

    fn bind_fallback(
        &mut self,
        _cx: &BinderContext<'_>,
        state: &StateMutability,
    ) -> Result<(), Self::Error> {
        let mut context = self.context.borrow_mut();

        let c = context.name.clone();

        let mut code = String::new();

        writeln!(code)?;
        writeln!(
            code,
            "// Fallback is a paid mutator transaction binding the contract fallback function."
        )?;
        writeln!(code, "//")?;
        writeln!(code, "// Solidity: fallback(bytes calldata) {} returns(bytes)", state)?;
        writeln!(
            code,
            "func (_{c} *{c}Transactor) Fallback(opts *bind.TransactOpts, calldata []byte) (*types.Transaction, error) {{"
        )?;
        writeln!(code, "\treturn _{c}.contract.RawTransact(opts, calldata)")?;
        writeln!(code, "}}")?;

        context.transacts.push(code);

        Ok(())
    }

    fn bind_event(
        &mut self,
        _cx: &BinderContext<'_>,
        name: &str,
        signature: &str,
        anonymous: bool,
    ) -> Result<Self::EventBinder, Self::Error> {
        let key = {
            let mut context = self.context.borrow_mut();

            let key = overloaded_name(name, &context.event_keys);

            context.event_keys.insert(key.clone());

            key
        };

        Ok(GoEventBinder {
            name: name.to_owned(),
            key,
            signature: signature.to_owned(),
            anonymous,
            module: self.module.clone(),
            context: self.context.clone(),
            fields: Default::default(),
            used: Default::default(),
            solidity_inputs: Default::default(),
        })
    }

    fn bind_error(
        &mut self,
        _cx: &BinderContext<'_>,
        _name: &str,
        signature: &str,
    ) -> Result<(), Self::Error> {
        // custom errors are only reachable through the abi metadata.
        log::trace!(
            "{}: skip generate binding of error {}",
            self.context.borrow().name,
            signature
        );

        Ok(())
    }

    fn bind_deploy(&mut self, _cx: &BinderContext<'_>, bytecode: &str) -> Result<(), Self::Error> {
        self.context.borrow_mut().bytecode = Some(bytecode.to_owned());

        Ok(())
    }

    fn finalize(&mut self, cx: &BinderContext<'_>) -> Result<(), Self::Error> {
        let context = self.context.borrow();

        let c = context.name.as_str();

        let mut code = String::new();

        writeln!(code)?;
        writeln!(code, "// {c}MetaData contains all meta data concerning the {c} contract.")?;
        writeln!(code, "var {c}MetaData = &bind.MetaData{{")?;
        writeln!(code, "\tABI: {},", serde_json::to_string(cx.abi())?)?;

        if let Some(bytecode) = context.bytecode.as_deref() {
            writeln!(code, "\tBin: \"0x{}\",", bytecode)?;
        }

        writeln!(code, "}}")?;
        writeln!(code)?;
        writeln!(code, "// {c}ABI is the input ABI used to generate the binding from.")?;
        writeln!(code, "// Deprecated: Use {c}MetaData.ABI instead.")?;
        writeln!(code, "var {c}ABI = {c}MetaData.ABI")?;

        if context.bytecode.is_some() {
            write_deploy(&mut code, c, &context.constructor)?;
        }

        write_contract_types(&mut code, c)?;

        for call in &context.calls {
            code.push_str(call);
        }

        for transact in &context.transacts {
            code.push_str(transact);
        }

        for event in &context.events {
            code.push_str(event);
        }

        self.module.borrow_mut().contracts.push(code);

        Ok(())
    }
}

fn write_deploy(code: &mut String, c: &str, constructor: &[(String, String)]) -> std::fmt::Result {
    let params = constructor
        .iter()
        .map(|(name, go_type)| format!(", {} {}", name, go_type))
        .collect::<String>();

    let args = constructor
        .iter()
        .map(|(name, _)| format!(", {}", name))
        .collect::<String>();

    writeln!(code)?;
    writeln!(code, "// {c}Bin is the compiled bytecode used for deploying new contracts.")?;
    writeln!(code, "// Deprecated: Use {c}MetaData.Bin instead.")?;
    writeln!(code, "var {c}Bin = {c}MetaData.Bin")?;
    writeln!(code)?;
    writeln!(
        code,
        "// Deploy{c} deploys a new Ethereum contract, binding an instance of {c} to it."
    )?;
    writeln!(
        code,
        "func Deploy{c}(auth *bind.TransactOpts, backend bind.ContractBackend{params}) (common.Address, *types.Transaction, *{c}, error) {{"
    )?;
    writeln!(code, "\tparsed, err := {c}MetaData.GetAbi()")?;
    writeln!(code, "\tif err != nil {{")?;
    writeln!(code, "\t\treturn common.Address{{}}, nil, nil, err")?;
    writeln!(code, "\t}}")?;
    writeln!(code, "\tif parsed == nil {{")?;
    writeln!(
        code,
        "\t\treturn common.Address{{}}, nil, nil, errors.New(\"GetABI returned nil\")"
    )?;
    writeln!(code, "\t}}")?;
    writeln!(code)?;
    writeln!(
        code,
        "\taddress, tx, contract, err := bind.DeployContract(auth, *parsed, common.FromHex({c}Bin), backend{args})"
    )?;
    writeln!(code, "\tif err != nil {{")?;
    writeln!(code, "\t\treturn common.Address{{}}, nil, nil, err")?;
    writeln!(code, "\t}}")?;
    writeln!(code, "\treturn address, tx, {}, nil", instance_literal(c))?;
    writeln!(code, "}}")?;

    Ok(())
}

fn instance_literal(c: &str) -> String {
    format!(
        "&{c}{{{c}Caller: {c}Caller{{contract: contract}}, {c}Transactor: {c}Transactor{{contract: contract}}, {c}Filterer: {c}Filterer{{contract: contract}}}}"
    )
}

fn write_contract_types(code: &mut String, c: &str) -> std::fmt::Result {
    let embedded = [
        (format!("{c}Caller"), "Read-only binding to the contract"),
        (format!("{c}Transactor"), "Write-only binding to the contract"),
        (format!("{c}Filterer"), "Log filterer for contract events"),
    ];

    let width = embedded
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or_default();

    writeln!(code)?;
    writeln!(code, "// {c} is an auto generated Go binding around an Ethereum contract.")?;
    writeln!(code, "type {c} struct {{")?;

    for (name, comment) in &embedded {
        writeln!(code, "\t{:<width$} // {}", name, comment, width = width)?;
    }

    writeln!(code, "}}")?;

    let roles = [
        ("Caller", "read-only", "caller bind.ContractCaller", "caller, nil, nil"),
        (
            "Transactor",
            "write-only",
            "transactor bind.ContractTransactor",
            "nil, transactor, nil",
        ),
        (
            "Filterer",
            "log filtering",
            "filterer bind.ContractFilterer",
            "nil, nil, filterer",
        ),
    ];

    for (role, description, _, _) in &roles {
        writeln!(code)?;
        writeln!(
            code,
            "// {c}{role} is an auto generated {description} Go binding around an Ethereum contract."
        )?;
        writeln!(code, "type {c}{role} struct {{")?;
        writeln!(
            code,
            "\tcontract *bind.BoundContract // Generic contract wrapper for the low level calls"
        )?;
        writeln!(code, "}}")?;
    }

    writeln!(code)?;
    writeln!(
        code,
        "// New{c} creates a new instance of {c}, bound to a specific deployed contract."
    )?;
    writeln!(
        code,
        "func New{c}(address common.Address, backend bind.ContractBackend) (*{c}, error) {{"
    )?;
    writeln!(code, "\tcontract, err := bind{c}(address, backend, backend, backend)")?;
    writeln!(code, "\tif err != nil {{")?;
    writeln!(code, "\t\treturn nil, err")?;
    writeln!(code, "\t}}")?;
    writeln!(code, "\treturn {}, nil", instance_literal(c))?;
    writeln!(code, "}}")?;

    for (role, description, param, args) in &roles {
        writeln!(code)?;
        writeln!(
            code,
            "// New{c}{role} creates a new {description} instance of {c}, bound to a specific deployed contract."
        )?;
        writeln!(
            code,
            "func New{c}{role}(address common.Address, {param}) (*{c}{role}, error) {{"
        )?;
        writeln!(code, "\tcontract, err := bind{c}(address, {args})")?;
        writeln!(code, "\tif err != nil {{")?;
        writeln!(code, "\t\treturn nil, err")?;
        writeln!(code, "\t}}")?;
        writeln!(code, "\treturn &{c}{role}{{contract: contract}}, nil")?;
        writeln!(code, "}}")?;
    }

    writeln!(code)?;
    writeln!(
        code,
        "// bind{c} binds a generic wrapper to an already deployed contract."
    )?;
    writeln!(
        code,
        "func bind{c}(address common.Address, caller bind.ContractCaller, transactor bind.ContractTransactor, filterer bind.ContractFilterer) (*bind.BoundContract, error) {{"
    )?;
    writeln!(code, "\tparsed, err := {c}MetaData.GetAbi()")?;
    writeln!(code, "\tif err != nil {{")?;
    writeln!(code, "\t\treturn nil, err")?;
    writeln!(code, "\t}}")?;
    writeln!(
        code,
        "\treturn bind.NewBoundContract(address, *parsed, caller, transactor, filterer), nil"
    )?;
    writeln!(code, "}}")?;

    Ok(())
}

/// Go struct name of the tuple indexed under `key`, e.g. `struct ERC20.Data` is `ERC20Data`.
fn struct_name(key: &str) -> String {
    match key.strip_prefix("struct ") {
        Some(name) => capitalise(&name.replace('.', "")),
        // anonymous tuple, named after its canonical components.
        None if key.starts_with('(') => format!("Struct{}", &to_hex(&keccak256(key))[..8]),
        None => capitalise(key),
    }
}

fn tuple_signature(components: &[Parameter]) -> String {
    let types = components
        .iter()
        .map(Parameter::canonical_type)
        .collect::<Vec<_>>();

    format!("({})", types.join(","))
}

/// `abigen` style camel case: split on `_`, upper the first letter of each part.
fn capitalise(name: &str) -> String {
    name.split('_')
        .map(|part| {
            let mut chars = part.chars();

            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

fn overloaded_name(raw: &str, taken: &HashSet<String>) -> String {
    let mut name = raw.to_owned();

    let mut index = 0;

    while taken.contains(&name) {
        name = format!("{}{}", raw, index);
        index += 1;
    }

    name
}

fn to_var_ident(index: usize, param: &Parameter) -> String {
    if param.name.is_empty() || GO_KEYWORDS.contains(&param.name.as_str()) {
        format!("arg{}", index)
    } else {
        param.name.clone()
    }
}

fn to_field_ident(index: usize, param: &Parameter) -> String {
    let name = capitalise(&param.name);

    if name.is_empty() {
        format!("Arg{}", index)
    } else {
        name
    }
}

/// Field name of `param`, suffixed when an earlier field capitalises to the same name.
fn unique_field_ident(index: usize, param: &Parameter, used: &mut HashSet<String>) -> String {
    let name = overloaded_name(&to_field_ident(index, param), used);

    used.insert(name.clone());

    name
}

fn solidity_param(param: &Parameter, with_indexed: bool) -> String {
    let mut declared = param.canonical_type();

    if with_indexed && param.indexed {
        declared.push_str(" indexed");
    }

    if !param.name.is_empty() {
        declared.push(' ');
        declared.push_str(&param.name);
    }

    declared
}

/// Indexed event inputs of reference types are only recoverable as their topic hash.
fn indexed_as_hash(t: &Type) -> bool {
    matches!(
        t,
        Type::Array(_)
            | Type::ArrayM(_)
            | Type::Simple(SimpleType::String | SimpleType::Bytes | SimpleType::Tuple)
    )
}

fn param_type_mapping(
    module: &Rc<RefCell<GoModuleContext>>,
    context: &Rc<RefCell<GoContractContext>>,
    param: &Parameter,
) -> Result<String, GoBinderError> {
    let tuple = param.components.as_ref().map(|_| {
        let key = tuple_key(param);

        context
            .borrow()
            .tuples
            .get(&key)
            .cloned()
            .unwrap_or_else(|| struct_name(&key))
    });

    module
        .borrow_mut()
        .mapping
        .abi_type_mapping(&param.r#type, tuple.as_deref())
        .ok_or_else(|| GoBinderError::UnsupportedType(param.r#type.to_string()))
}

fn rt_type_mapping(
    module: &Rc<RefCell<GoModuleContext>>,
    type_name: &str,
) -> Result<String, GoBinderError> {
    module
        .borrow()
        .mapping
        .rt_type_mapping(type_name)
        .map(str::to_owned)
        .ok_or_else(|| GoBinderError::RuntimeTypeNotFound(type_name.to_owned()))
}

fn write_struct(
    code: &mut String,
    name: &str,
    fields: &[(String, String)],
    trailer: Option<(&str, &str, &str)>,
) -> std::fmt::Result {
    let width = fields
        .iter()
        .map(|(field, _)| field.len())
        .chain(trailer.map(|(field, _, _)| field.len()))
        .max()
        .unwrap_or_default();

    writeln!(code, "type {} struct {{", name)?;

    for (field, go_type) in fields {
        writeln!(code, "\t{:<width$} {}", field, go_type, width = width)?;
    }

    if let Some((field, go_type, comment)) = trailer {
        writeln!(
            code,
            "\t{:<width$} {} // {}",
            field,
            go_type,
            comment,
            width = width
        )?;
    }

    writeln!(code, "}}")
}

pub struct GoTupleBinder {
    name: String,
    module: Rc<RefCell<GoModuleContext>>,
    context: Rc<RefCell<GoContractContext>>,
    fields: Vec<(String, String)>,
    used: HashSet<String>,
}

impl TupleBinder for GoTupleBinder {
    type Error = GoBinderError;

    fn bind_field(
        &mut self,
        _cx: &BinderContext<'_>,
        index: usize,
        param: &Parameter,
    ) -> Result<(), Self::Error> {
        let go_type = param_type_mapping(&self.module, &self.context, param)?;

        let field = unique_field_ident(index, param, &mut self.used);

        self.fields.push((field, go_type));

        Ok(())
    }

    fn finalize(&mut self, _cx: &BinderContext<'_>) -> Result<(), Self::Error> {
        let mut module = self.module.borrow_mut();

        // tuples of the same shape resolve to one name, declared by the first contract.
        if module.structs.contains_key(&self.name) {
            return Ok(());
        }

        let mut code = String::new();

        writeln!(code)?;
        writeln!(
            code,
            "// {} is an auto generated low-level Go binding around an user-defined struct.",
            self.name
        )?;
        write_struct(&mut code, &self.name, &self.fields, None)?;

        module.structs.insert(self.name.clone(), code);

        Ok(())
    }
}

pub struct GoConstructorBinder {
    module: Rc<RefCell<GoModuleContext>>,
    context: Rc<RefCell<GoContractContext>>,
    inputs: Vec<(String, String)>,
}

impl ConstructorBinder for GoConstructorBinder {
    type Error = GoBinderError;

    fn bind_input(
        &mut self,
        _cx: &BinderContext<'_>,
        index: usize,
        param: &Parameter,
    ) -> Result<(), Self::Error> {
        let go_type = param_type_mapping(&self.module, &self.context, param)?;

        self.inputs.push((to_var_ident(index, param), go_type));

        Ok(())
    }

    fn finalize(&mut self, cx: &BinderContext<'_>) -> Result<(), Self::Error> {
        if cx.bytecode().is_none() {
            log::warn!(
                "{}: bytecode not found, skip generate deploy fn.",
                cx.contract_name()
            );
        }

        self.context.borrow_mut().constructor = self.inputs.drain(..).collect();

        Ok(())
    }
}

pub struct GoFunctionBinder {
    fn_name: String,
    /// method name in the parsed go abi, overloads get a numeric suffix.
    key: String,
    signature: String,
    state: StateMutability,
    module: Rc<RefCell<GoModuleContext>>,
    context: Rc<RefCell<GoContractContext>>,
    inputs: Vec<(String, String)>,
    outputs: Vec<String>,
    solidity_inputs: Vec<String>,
    solidity_outputs: Vec<String>,
}

impl GoFunctionBinder {
    fn solidity(&self) -> String {
        let mut solidity = format!(
            "function {}({})",
            self.fn_name,
            self.solidity_inputs.join(", ")
        );

        if self.state != StateMutability::Nonpayable {
            write!(solidity, " {}", self.state).ok();
        }

        write!(solidity, " returns({})", self.solidity_outputs.join(", ")).ok();

        solidity
    }

    fn write_call(&self, code: &mut String, c: &str, params: &str, args: &str) -> std::fmt::Result {
        let go_name = capitalise(&self.key);
        let key = &self.key;

        if self.outputs.is_empty() {
            writeln!(
                code,
                "func (_{c} *{c}Caller) {go_name}(opts *bind.CallOpts{params}) error {{"
            )?;
            writeln!(code, "\tvar out []interface{{}}")?;
            writeln!(code, "\terr := _{c}.contract.Call(opts, &out, \"{key}\"{args})")?;
            writeln!(code, "\treturn err")?;

            return writeln!(code, "}}");
        }

        let returns = self.outputs.join(", ");

        let zeros = self
            .outputs
            .iter()
            .map(|go_type| format!("*new({}), ", go_type))
            .collect::<String>();

        let values = (0..self.outputs.len())
            .map(|index| format!("out{}, ", index))
            .collect::<String>();

        writeln!(
            code,
            "func (_{c} *{c}Caller) {go_name}(opts *bind.CallOpts{params}) ({returns}, error) {{"
        )?;
        writeln!(code, "\tvar out []interface{{}}")?;
        writeln!(code, "\terr := _{c}.contract.Call(opts, &out, \"{key}\"{args})")?;
        writeln!(code)?;
        writeln!(code, "\tif err != nil {{")?;
        writeln!(code, "\t\treturn {zeros}err")?;
        writeln!(code, "\t}}")?;
        writeln!(code)?;

        for (index, go_type) in self.outputs.iter().enumerate() {
            writeln!(
                code,
                "\tout{index} := *abi.ConvertType(out[{index}], new({go_type})).(*{go_type})"
            )?;
        }

        writeln!(code)?;
        writeln!(code, "\treturn {values}err")?;
        writeln!(code, "}}")
    }
}

impl FunctionBinder for GoFunctionBinder {
    type Error = GoBinderError;

    fn bind_input(
        &mut self,
        _cx: &BinderContext<'_>,
        index: usize,
        param: &Parameter,
    ) -> Result<(), Self::Error> {
        let go_type = param_type_mapping(&self.module, &self.context, param)?;

        self.inputs.push((to_var_ident(index, param), go_type));
        self.solidity_inputs.push(solidity_param(param, false));

        Ok(())
    }

    fn bind_output(
        &mut self,
        _cx: &BinderContext<'_>,
        _index: usize,
        param: &Parameter,
    ) -> Result<(), Self::Error> {
        // transactions only return the transaction, outputs are still checked for a mapping.
        let go_type = param_type_mapping(&self.module, &self.context, param)?;

        self.outputs.push(go_type);
        self.solidity_outputs.push(solidity_param(param, false));

        Ok(())
    }

    fn finalize(&mut self, _cx: &BinderContext<'_>) -> Result<(), Self::Error> {
        let c = self.context.borrow().name.clone();

        let go_name = capitalise(&self.key);
        let selector = selector(&self.signature);

        let params = self
            .inputs
            .iter()
            .map(|(name, go_type)| format!(", {} {}", name, go_type))
            .collect::<String>();

        let args = self
            .inputs
            .iter()
            .map(|(name, _)| format!(", {}", name))
            .collect::<String>();

        let mut code = String::new();

        writeln!(code)?;

        match self.state {
            StateMutability::Pure | StateMutability::View => {
                writeln!(
                    code,
                    "// {go_name} is a free data retrieval call binding the contract method 0x{selector}."
                )?;
                writeln!(code, "//")?;
                writeln!(code, "// Solidity: {}", self.solidity())?;

                self.write_call(&mut code, &c, &params, &args)?;

                self.context.borrow_mut().calls.push(code);
            }
            StateMutability::Nonpayable | StateMutability::Payable => {
                writeln!(
                    code,
                    "// {go_name} is a paid mutator transaction binding the contract method 0x{selector}."
                )?;
                writeln!(code, "//")?;
                writeln!(code, "// Solidity: {}", self.solidity())?;
                writeln!(
                    code,
                    "func (_{c} *{c}Transactor) {go_name}(opts *bind.TransactOpts{params}) (*types.Transaction, error) {{"
                )?;
                writeln!(
                    code,
                    "\treturn _{c}.contract.Transact(opts, \"{}\"{args})",
                    self.key
                )?;
                writeln!(code, "}}")?;

                self.context.borrow_mut().transacts.push(code);
            }
        }

        log::trace!("{}: generate method {}", c, go_name);

        Ok(())
    }
}

pub struct GoEventBinder {
    name: String,
    key: String,
    signature: String,
    anonymous: bool,
    module: Rc<RefCell<GoModuleContext>>,
    context: Rc<RefCell<GoContractContext>>,
    fields: Vec<(String, String)>,
    used: HashSet<String>,
    solidity_inputs: Vec<String>,
}

impl EventBinder for GoEventBinder {
    type Error = GoBinderError;

    fn bind_input(
        &mut self,
        _cx: &BinderContext<'_>,
        index: usize,
        param: &Parameter,
    ) -> Result<(), Self::Error> {
        let go_type = if param.indexed && indexed_as_hash(&param.r#type) {
            rt_type_mapping(&self.module, "rt_hash")?
        } else {
            param_type_mapping(&self.module, &self.context, param)?
        };

        let field = unique_field_ident(index, param, &mut self.used);

        self.fields.push((field, go_type));
        self.solidity_inputs.push(solidity_param(param, true));

        Ok(())
    }

    fn finalize(&mut self, _cx: &BinderContext<'_>) -> Result<(), Self::Error> {
        let c = self.context.borrow().name.clone();

        let event = capitalise(&self.key);
        let type_name = format!("{}{}", c, event);
        let topic = topic(&self.signature);
        let anonymous = if self.anonymous { " anonymous" } else { "" };

        let mut code = String::new();

        writeln!(code)?;
        writeln!(
            code,
            "// {type_name} represents a {event} event raised by the {c} contract."
        )?;
        write_struct(
            &mut code,
            &type_name,
            &self.fields,
            Some(("Raw", "types.Log", "Blockchain specific contextual infos")),
        )?;
        writeln!(code)?;
        writeln!(
            code,
            "// Parse{event} is a log parse operation binding the contract event 0x{topic}."
        )?;
        writeln!(code, "//")?;
        writeln!(
            code,
            "// Solidity: event {}({}){}",
            self.name,
            self.solidity_inputs.join(", "),
            anonymous
        )?;
        writeln!(
            code,
            "func (_{c} *{c}Filterer) Parse{event}(log types.Log) (*{type_name}, error) {{"
        )?;
        writeln!(code, "\tevent := new({type_name})")?;
        writeln!(
            code,
            "\tif err := _{c}.contract.UnpackLog(event, \"{}\", log); err != nil {{",
            self.key
        )?;
        writeln!(code, "\t\treturn nil, err")?;
        writeln!(code, "\t}}")?;
        writeln!(code, "\tevent.Raw = log")?;
        writeln!(code, "\treturn event, nil")?;
        writeln!(code, "}}")?;

        self.context.borrow_mut().events.push(code);

        log::trace!("{}: generate event {}", c, event);

        Ok(())
    }
}
