use nacos_a2a_cli::{Cli, Commands, PlanArgs, commands};
use nacos_a2a_registry::RegistrySettings;
use clap::Parser;
use std::collections::HashMap;
use std::io::Write;

fn plan_args(argv: &[&str]) -> PlanArgs {
    let mut full = vec!["nacos-a2a", "plan"];
    full.extend_from_slice(argv);
    match Cli::try_parse_from(full).unwrap().command {
        Commands::Plan(args) => args,
        other => panic!("unexpected command: {other:?}"),
    }
}

fn settings() -> RegistrySettings {
    RegistrySettings::from_vars(Vec::<(String, String)>::new())
}

#[tokio::test]
async fn test_plan_single_endpoint() {
    let args = plan_args(&["--interface", "JSONRPC=http://127.0.0.1:8000/a2a"]);
    let plan = commands::plan(&args, &settings(), &HashMap::new()).await.unwrap();

    assert_eq!(plan["endpointAction"]["type"], "SingleEndpoint");
    assert_eq!(plan["endpointAction"]["endpoints"]["host"], "127.0.0.1");
    assert_eq!(plan["endpointAction"]["endpoints"]["port"], 8000);
    assert!(plan.get("preferredTransportOverwrite").is_none());
}

#[tokio::test]
async fn test_plan_with_config_file_and_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "overwrite_preferred_transport = \"GRPC\"\n\n[transports.GRPC]\nhost = \"10.0.0.5\""
    )
    .unwrap();

    let args = plan_args(&[
        "--interface",
        "JSONRPC=http://127.0.0.1:8000/a2a",
        "--interface",
        "GRPC=grpc://127.0.0.1:50051",
        "--config",
        file.path().to_str().unwrap(),
        "--prefix",
        "TEST_A2A_",
    ]);
    let env = HashMap::from([("TEST_A2A_GRPC_PORT".to_string(), "6000".to_string())]);

    let plan = commands::plan(&args, &settings(), &env).await.unwrap();
    assert_eq!(plan["endpointAction"]["type"], "MultiEndpoint");
    assert_eq!(plan["endpointAction"]["endpoints"]["GRPC"]["host"], "10.0.0.5");
    assert_eq!(plan["endpointAction"]["endpoints"]["GRPC"]["port"], 6000);
    assert_eq!(plan["preferredTransportOverwrite"]["url"], "grpc://10.0.0.5:6000");
}

#[tokio::test]
async fn test_plan_without_endpoints_still_overwrites() {
    let args = plan_args(&[
        "--interface",
        "JSONRPC=http://127.0.0.1:8000/a2a",
        "--interface",
        "GRPC=grpc://127.0.0.1:50051",
        "--overwrite-preferred-transport",
        "grpc",
        "--no-endpoints",
    ]);

    let plan = commands::plan(&args, &settings(), &HashMap::new()).await.unwrap();
    assert_eq!(plan["endpointAction"]["type"], "NoEndpointRegistration");
    assert_eq!(plan["preferredTransportOverwrite"]["transport"], "GRPC");
}

#[tokio::test]
async fn test_unknown_preferred_transport_is_rejected() {
    let args = plan_args(&[
        "--interface",
        "JSONRPC=http://127.0.0.1:8000/a2a",
        "--preferred-transport",
        "GRPC",
    ]);
    assert!(commands::plan(&args, &settings(), &HashMap::new()).await.is_err());
}

#[tokio::test]
async fn test_plan_disabled_by_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "enabled = false").unwrap();

    let args = plan_args(&[
        "--interface",
        "JSONRPC=http://127.0.0.1:8000/a2a",
        "--config",
        file.path().to_str().unwrap(),
    ]);
    let plan = commands::plan(&args, &settings(), &HashMap::new()).await.unwrap();
    assert_eq!(plan, serde_json::json!({ "enabled": false }));
}

#[tokio::test]
async fn test_plan_disabled_by_environment() {
    let settings = RegistrySettings::from_vars([("A2A_REGISTRY_ENABLED", "false")]);
    let args = plan_args(&["--interface", "JSONRPC=http://127.0.0.1:8000/a2a"]);

    let plan = commands::plan(&args, &settings, &HashMap::new()).await.unwrap();
    assert_eq!(plan["enabled"], false);
    assert!(plan.get("endpointAction").is_none());
}

#[test]
fn test_overlay_command() {
    let env = HashMap::from([
        ("P_JSONRPC_HOST".to_string(), "127.0.0.1".to_string()),
        ("P_JSONRPC_PORT".to_string(), "8080".to_string()),
        ("P_BADKEY".to_string(), "x".to_string()),
    ]);

    let overlay = commands::overlay("P_", &env).unwrap();
    assert_eq!(overlay["JSONRPC"]["host"], "127.0.0.1");
    assert_eq!(overlay["JSONRPC"]["port"], 8080);
    assert_eq!(overlay.as_object().unwrap().len(), 1);
}
