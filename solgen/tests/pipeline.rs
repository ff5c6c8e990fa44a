use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use solgen::{
    run_with_output, BindingGenerator, Config, Error, ExportOutcome, GoBindings,
};
use solgen_bind::{BindError, Lang};

const ARB_SYS: &str = include_str!("fixtures/ArbSys.json");
const NODE_INTERFACE: &str = include_str!("fixtures/NodeInterface.json");
const COUNTER: &str = include_str!("fixtures/Counter.json");

const NESTED_ARTIFACTS: &str = "contracts/out/*/*/*.json";

struct StubGenerator;

impl BindingGenerator for StubGenerator {
    fn generate(
        &self,
        names: &[String],
        abis: &[String],
        bytecodes: &[String],
        module: &str,
    ) -> Result<String, BindError> {
        assert_eq!(names.len(), abis.len());
        assert_eq!(names.len(), bytecodes.len());

        Ok(format!("package {}\n\n// {}\n", module, names.join(",")))
    }

    fn lang(&self) -> Lang {
        Lang::Go
    }
}

struct FailingGenerator;

impl BindingGenerator for FailingGenerator {
    fn generate(
        &self,
        names: &[String],
        _abis: &[String],
        _bytecodes: &[String],
        _module: &str,
    ) -> Result<String, BindError> {
        Err(BindError::LengthMismatch {
            names: names.len(),
            abis: 0,
            bytecodes: 0,
        })
    }

    fn lang(&self) -> Lang {
        Lang::Go
    }
}

/// Create an empty workspace under the cargo target tmpdir, returns the parent directory.
fn workspace(name: &str) -> PathBuf {
    _ = pretty_env_logger::try_init();

    let parent = Path::new(env!("CARGO_TARGET_TMPDIR")).join(name);

    if parent.exists() {
        fs::remove_dir_all(&parent).unwrap();
    }

    fs::create_dir_all(parent.join("solgen")).unwrap();

    parent
}

fn write_artifact(parent: &Path, relative: &str, content: &str) {
    let path = parent.join("contracts/out").join(relative);

    fs::create_dir_all(path.parent().unwrap()).unwrap();

    fs::write(path, content).unwrap();
}

fn nitro_artifacts(parent: &Path) {
    write_artifact(parent, "precompiles/ArbSys.sol/ArbSys.json", ARB_SYS);
    write_artifact(
        parent,
        "node-interface/NodeInterface.sol/NodeInterface.json",
        NODE_INTERFACE,
    );
    write_artifact(parent, "mocks/Counter.sol/Counter.json", COUNTER);
    // debug companions are never parsed.
    write_artifact(parent, "mocks/Counter.sol/Counter.dbg.json", "not json");
}

fn config(parent: &Path, artifacts: &str) -> Config {
    Config::parse_from([
        "solgen",
        "--root",
        parent.join("solgen").to_str().unwrap(),
        "--artifacts",
        artifacts,
    ])
}

fn run<G: BindingGenerator>(config: &Config, generator: &G) -> (solgen::Result<ExportOutcome>, Vec<String>) {
    let mut output = vec![];

    let result = run_with_output(config, generator, &mut output);

    let lines = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect();

    (result, lines)
}

#[test]
fn test_pipeline_without_blockscout() {
    let parent = workspace("pipeline_without_blockscout");

    nitro_artifacts(&parent);

    let (result, lines) = run(&config(&parent, NESTED_ARTIFACTS), &StubGenerator);

    assert_eq!(result.unwrap(), ExportOutcome::Skipped);

    assert_eq!(
        lines,
        [
            "mocksgen",
            "node_interfacegen",
            "precompilesgen",
            "successfully generated go abi files",
            "skipping abi export since blockscout is not present",
        ]
    );

    assert_eq!(
        fs::read_to_string(parent.join("solgen/go/precompilesgen/precompilesgen.go")).unwrap(),
        "package precompilesgen\n\n// ArbSys\n"
    );
    assert_eq!(
        fs::read_to_string(parent.join("solgen/go/node_interfacegen/node_interfacegen.go"))
            .unwrap(),
        "package node_interfacegen\n\n// NodeInterface\n"
    );
    assert!(parent.join("solgen/go/mocksgen/mocksgen.go").exists());

    assert!(!parent.join("blockscout").exists());
}

#[test]
fn test_pipeline_with_blockscout() {
    let parent = workspace("pipeline_with_blockscout");

    nitro_artifacts(&parent);

    let export_dir = parent.join("blockscout/init/data");

    fs::create_dir_all(&export_dir).unwrap();

    let (result, lines) = run(&config(&parent, NESTED_ARTIFACTS), &StubGenerator);

    assert_eq!(result.unwrap(), ExportOutcome::Exported);
    assert_eq!(lines.last().map(String::as_str), Some("successfully exported abi files"));

    let mut exported = fs::read_dir(&export_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect::<Vec<_>>();

    exported.sort();

    assert_eq!(exported, ["ArbSys.abi", "NodeInterface.abi"]);

    let abi = fs::read_to_string(export_dir.join("ArbSys.abi")).unwrap();

    assert!(abi.ends_with("]\n"));
    assert!(!abi.trim_end().contains('\n'));

    let items: Vec<serde_json::Value> = serde_json::from_str(&abi).unwrap();

    assert_eq!(items.len(), 3);
}

#[test]
fn test_export_without_designated_modules() {
    let parent = workspace("export_without_designated_modules");

    write_artifact(&parent, "mocks/Counter.sol/Counter.json", COUNTER);

    let export_dir = parent.join("blockscout/init/data");

    fs::create_dir_all(&export_dir).unwrap();

    let (result, _) = run(&config(&parent, NESTED_ARTIFACTS), &StubGenerator);

    assert_eq!(result.unwrap(), ExportOutcome::Exported);
    assert_eq!(fs::read_dir(&export_dir).unwrap().count(), 0);
}

#[test]
fn test_default_pattern_module_name() {
    let parent = workspace("default_pattern_module_name");

    write_artifact(&parent, "Counter.sol/Counter.json", COUNTER);
    write_artifact(&parent, "ArbSys.sol/ArbSys.json", ARB_SYS);

    let config = Config::parse_from([
        "solgen",
        "--root",
        parent.join("solgen").to_str().unwrap(),
    ]);

    let (result, lines) = run(&config, &StubGenerator);

    result.unwrap();

    // every file under the default pattern lands in the module named after `out`.
    assert_eq!(lines[0], "outgen");
    assert_eq!(
        fs::read_to_string(parent.join("solgen/go/outgen/outgen.go")).unwrap(),
        "package outgen\n\n// ArbSys,Counter\n"
    );
}

#[test]
fn test_go_bindings() {
    let parent = workspace("go_bindings");

    nitro_artifacts(&parent);

    let config = config(&parent, NESTED_ARTIFACTS);

    let (result, _) = run(&config, &GoBindings);

    result.unwrap();

    let mocks = fs::read_to_string(parent.join("solgen/go/mocksgen/mocksgen.go")).unwrap();

    assert!(mocks.contains("package mocksgen\n"));
    assert!(mocks.contains(
        "func DeployCounter(auth *bind.TransactOpts, backend bind.ContractBackend, start uint64) (common.Address, *types.Transaction, *Counter, error) {"
    ));
    assert!(mocks.contains("func (_Counter *CounterCaller) Number(opts *bind.CallOpts) (uint64, error) {"));
    assert!(mocks.contains(
        "func (_Counter *CounterTransactor) Increment(opts *bind.TransactOpts) (*types.Transaction, error) {"
    ));

    let precompiles =
        fs::read_to_string(parent.join("solgen/go/precompilesgen/precompilesgen.go")).unwrap();

    assert!(!precompiles.contains("func DeployArbSys("));
    assert!(precompiles.contains(
        "func (_ArbSys *ArbSysTransactor) WithdrawEth(opts *bind.TransactOpts, destination common.Address) (*types.Transaction, error) {"
    ));
    assert!(precompiles.contains("func (_ArbSys *ArbSysFilterer) ParseL2ToL1Tx(log types.Log) (*ArbSysL2ToL1Tx, error) {"));

    // unchanged input, byte identical output.
    let (result, _) = run(&config, &GoBindings);

    result.unwrap();

    assert_eq!(
        fs::read_to_string(parent.join("solgen/go/mocksgen/mocksgen.go")).unwrap(),
        mocks
    );
    assert_eq!(
        fs::read_to_string(parent.join("solgen/go/precompilesgen/precompilesgen.go")).unwrap(),
        precompiles
    );
}

#[test]
fn test_malformed_artifact() {
    let parent = workspace("malformed_artifact");

    write_artifact(&parent, "mocks/Broken.sol/Broken.json", "{ \"abi\": [");

    let (result, lines) = run(&config(&parent, NESTED_ARTIFACTS), &StubGenerator);

    match result {
        Err(Error::Decode { contract, .. }) => assert_eq!(contract, "Broken"),
        result => panic!("unexpected result: {:?}", result),
    }

    assert!(lines.is_empty());
}

#[test]
fn test_generator_error() {
    let parent = workspace("generator_error");

    write_artifact(&parent, "mocks/Counter.sol/Counter.json", COUNTER);

    let (result, lines) = run(&config(&parent, NESTED_ARTIFACTS), &FailingGenerator);

    match result {
        Err(Error::Bind { module, .. }) => assert_eq!(module, "mocksgen"),
        result => panic!("unexpected result: {:?}", result),
    }

    assert_eq!(lines, ["mocksgen"]);
    assert!(!parent.join("solgen/go/mocksgen").exists());
}
