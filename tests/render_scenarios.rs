// tests/render_scenarios.rs

mod common;
use crate::common::builders::ConfigFileBuilder;
use crate::common::{demo, init_tracing};

use std::error::Error;

use confexec::fs::{FileSystem, RealFileSystem};
use confexec::template::{EnvSnapshot, Whitelist, render_file, render_str};

type TestResult = Result<(), Box<dyn Error>>;

const GATEWAY_VARS: [&str; 3] = ["USUARIOS_HOSTPORT", "RESERVAS_HOSTPORT", "INVENTARIO_HOSTPORT"];

#[test]
fn listen_and_proxy_pass_scenario() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let cfg = ConfigFileBuilder::new().in_dir(dir.path()).build();
    std::fs::write(
        cfg.template(),
        "server {\n    listen $USUARIOS_HOSTPORT;\n    proxy_pass $OTHER_VAR;\n}\n",
    )?;

    let env = EnvSnapshot::from_pairs([("USUARIOS_HOSTPORT", "8080"), ("OTHER_VAR", "secret")]);
    render_file(&RealFileSystem, cfg.template(), cfg.output(), &cfg.whitelist, &env)?;

    let rendered = std::fs::read_to_string(cfg.output())?;
    assert!(rendered.contains("listen 8080;"));
    assert!(rendered.contains("proxy_pass $OTHER_VAR;"));
    assert!(!rendered.contains("secret"));
    Ok(())
}

#[test]
fn gateway_demo_with_all_variables_set_has_no_placeholders_left() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("nginx.conf");
    let whitelist = Whitelist::new(GATEWAY_VARS)?;
    let env = EnvSnapshot::from_pairs([
        ("USUARIOS_HOSTPORT", "usuarios:8001"),
        ("RESERVAS_HOSTPORT", "reservas:8002"),
        ("INVENTARIO_HOSTPORT", "inventario:8003"),
    ]);

    render_file(
        &RealFileSystem,
        &demo("gateway/nginx.conf.template"),
        &output,
        &whitelist,
        &env,
    )?;

    let rendered = std::fs::read_to_string(&output)?;
    for name in GATEWAY_VARS {
        assert!(!rendered.contains(&format!("${name}")), "{name} left in output");
        assert!(!rendered.contains(&format!("${{{name}}}")), "{{{name}}} left in output");
    }
    assert!(rendered.contains("server usuarios:8001;"));
    assert!(rendered.contains("server reservas:8002;"));
    assert!(rendered.contains("server inventario:8003;"));
    // nginx's own variables are untouched.
    assert!(rendered.contains("proxy_set_header Host $host;"));
    assert!(rendered.contains("$proxy_add_x_forwarded_for"));
    Ok(())
}

#[test]
fn rendering_overwrites_previous_output() -> TestResult {
    let dir = tempfile::tempdir()?;
    let template = dir.path().join("t.template");
    let output = dir.path().join("out.conf");
    std::fs::write(&template, "port=$P\n")?;
    std::fs::write(&output, "stale config from a previous start, much longer\n")?;

    let wl = Whitelist::new(["P"])?;
    render_file(&RealFileSystem, &template, &output, &wl, &EnvSnapshot::from_pairs([("P", "1")]))?;
    assert_eq!(std::fs::read_to_string(&output)?, "port=1\n");

    render_file(&RealFileSystem, &template, &output, &wl, &EnvSnapshot::from_pairs([("P", "2")]))?;
    assert_eq!(std::fs::read_to_string(&output)?, "port=2\n");
    Ok(())
}

#[test]
fn unset_whitelisted_variable_renders_empty() {
    let wl = Whitelist::new(GATEWAY_VARS).unwrap();
    let out = render_str("server $INVENTARIO_HOSTPORT;", &wl, &EnvSnapshot::default());
    assert_eq!(out, "server ;");
}

#[test]
fn missing_template_leaves_no_output() -> TestResult {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("nginx.conf");

    let res = render_file(
        &RealFileSystem,
        &dir.path().join("nginx.conf.template"),
        &output,
        &Whitelist::new(GATEWAY_VARS)?,
        &EnvSnapshot::default(),
    );

    assert!(res.is_err());
    assert!(!RealFileSystem.exists(&output));
    Ok(())
}
