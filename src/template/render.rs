// src/template/render.rs

use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, info};

use super::snapshot::EnvSnapshot;
use super::whitelist::Whitelist;
use crate::errors::{ConfexecError, Result};
use crate::fs::FileSystem;

/// `${NAME}` or `$NAME`. The braced alternative is tried first; an unclosed
/// `${` matches neither and is left as-is.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
        .expect("valid placeholder regex")
});

/// Substitute whitelisted placeholders in `template`.
///
/// Placeholders naming a variable outside `whitelist` are copied through
/// verbatim, as is every other byte of the template.
pub fn render_str<'t>(template: &'t str, whitelist: &Whitelist, env: &EnvSnapshot) -> Cow<'t, str> {
    PLACEHOLDER_RE.replace_all(template, |caps: &Captures<'_>| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();

        if whitelist.contains(name) {
            env.resolve(name).to_string()
        } else {
            caps[0].to_string()
        }
    })
}

/// Names of every placeholder in `template` that will *not* be substituted.
///
/// Purely informational; nginx uses `$name` syntax for its own variables.
pub fn passthrough_placeholders<'t>(template: &'t str, whitelist: &Whitelist) -> Vec<&'t str> {
    let mut out: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let Some(m) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let name = m.as_str();
        if !whitelist.contains(name) && !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// Read `template_path`, substitute, and write the result to `output_path`.
///
/// Any I/O failure is returned as [`ConfexecError::RenderIo`] carrying the
/// offending path.
pub fn render_file(
    fs: &dyn FileSystem,
    template_path: &Path,
    output_path: &Path,
    whitelist: &Whitelist,
    env: &EnvSnapshot,
) -> Result<()> {
    let rendered = render_to_string(fs, template_path, whitelist, env)?;

    fs.write(output_path, rendered.as_bytes())
        .map_err(|e| ConfexecError::render_io(output_path, e))?;

    info!(
        template = %template_path.display(),
        output = %output_path.display(),
        bytes = rendered.len(),
        "rendered configuration"
    );
    Ok(())
}

/// Like [`render_file`] but returns the rendered text instead of writing it.
pub fn render_to_string(
    fs: &dyn FileSystem,
    template_path: &Path,
    whitelist: &Whitelist,
    env: &EnvSnapshot,
) -> Result<String> {
    let template = fs
        .read_to_string(template_path)
        .map_err(|e| ConfexecError::render_io(template_path, e))?;

    let untouched = passthrough_placeholders(&template, whitelist);
    if !untouched.is_empty() {
        debug!(?untouched, "placeholders outside the whitelist left verbatim");
    }

    Ok(render_str(&template, whitelist, env).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::path::PathBuf;

    fn gateway_whitelist() -> Whitelist {
        Whitelist::new(["USUARIOS_HOSTPORT", "RESERVAS_HOSTPORT", "INVENTARIO_HOSTPORT"]).unwrap()
    }

    #[test]
    fn substitutes_whitelisted_and_keeps_others() {
        let env = EnvSnapshot::from_pairs([("USUARIOS_HOSTPORT", "8080"), ("OTHER_VAR", "leak")]);
        let tpl = "listen $USUARIOS_HOSTPORT;\nproxy_pass $OTHER_VAR;\n";

        let out = render_str(tpl, &gateway_whitelist(), &env);
        assert_eq!(out, "listen 8080;\nproxy_pass $OTHER_VAR;\n");
    }

    #[test]
    fn unset_whitelisted_becomes_empty() {
        let env = EnvSnapshot::default();
        let out = render_str("server $RESERVAS_HOSTPORT;", &gateway_whitelist(), &env);
        assert_eq!(out, "server ;");
    }

    #[test]
    fn braced_form_is_substituted() {
        let env = EnvSnapshot::from_pairs([("INVENTARIO_HOSTPORT", "inv:9000")]);
        let out = render_str("http://${INVENTARIO_HOSTPORT}/api", &gateway_whitelist(), &env);
        assert_eq!(out, "http://inv:9000/api");
    }

    #[test]
    fn identifier_is_matched_greedily() {
        let wl = Whitelist::new(["PORT"]).unwrap();
        let env = EnvSnapshot::from_pairs([("PORT", "80")]);
        // `$PORT_X` names PORT_X, which is not whitelisted.
        assert_eq!(render_str("$PORT_X $PORT.x ${PORT}_X", &wl, &env), "$PORT_X 80.x 80_X");
    }

    #[test]
    fn malformed_syntax_passes_through() {
        let wl = Whitelist::new(["A"]).unwrap();
        let env = EnvSnapshot::from_pairs([("A", "v")]);
        for tpl in ["${A", "${}", "${1A}", "$", "$ A", "$1", "cost: 5$", "${ A }"] {
            assert_eq!(render_str(tpl, &wl, &env), tpl, "template {tpl:?}");
        }
        assert_eq!(render_str("$$A", &wl, &env), "$v");
    }

    #[test]
    fn nginx_runtime_variables_survive() {
        let env = EnvSnapshot::from_pairs([("USUARIOS_HOSTPORT", "users:8000")]);
        let tpl = "proxy_set_header Host $host;\nproxy_set_header X-Real-IP $remote_addr;\n\
                   proxy_pass http://$USUARIOS_HOSTPORT$request_uri;\n";
        let out = render_str(tpl, &gateway_whitelist(), &env);
        assert_eq!(
            out,
            "proxy_set_header Host $host;\nproxy_set_header X-Real-IP $remote_addr;\n\
             proxy_pass http://users:8000$request_uri;\n"
        );
    }

    #[test]
    fn lists_untouched_placeholders_once() {
        let tpl = "$host $USUARIOS_HOSTPORT ${host} $remote_addr";
        assert_eq!(
            passthrough_placeholders(tpl, &gateway_whitelist()),
            vec!["host", "remote_addr"]
        );
    }

    #[test]
    fn render_file_writes_output() {
        let fs = MockFileSystem::new();
        fs.add_file("/etc/nginx/nginx.conf.template", "listen $USUARIOS_HOSTPORT;");
        let env = EnvSnapshot::from_pairs([("USUARIOS_HOSTPORT", "8080")]);

        render_file(
            &fs,
            &PathBuf::from("/etc/nginx/nginx.conf.template"),
            &PathBuf::from("/etc/nginx/nginx.conf"),
            &gateway_whitelist(),
            &env,
        )
        .unwrap();

        assert_eq!(
            fs.contents("/etc/nginx/nginx.conf").unwrap(),
            b"listen 8080;".to_vec()
        );
    }

    #[test]
    fn missing_template_is_render_io_and_writes_nothing() {
        let fs = MockFileSystem::new();
        fs.add_dir("/etc/nginx");

        let err = render_file(
            &fs,
            &PathBuf::from("/etc/nginx/nginx.conf.template"),
            &PathBuf::from("/etc/nginx/nginx.conf"),
            &gateway_whitelist(),
            &EnvSnapshot::default(),
        )
        .unwrap_err();

        match err {
            ConfexecError::RenderIo { path, source } => {
                assert_eq!(path, PathBuf::from("/etc/nginx/nginx.conf.template"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected RenderIo, got {other:?}"),
        }
        assert!(!fs.exists(&PathBuf::from("/etc/nginx/nginx.conf")));
    }

    #[test]
    fn unwritable_output_is_render_io() {
        let fs = MockFileSystem::new();
        fs.add_file("/etc/nginx/nginx.conf.template", "x");
        fs.add_file("/etc/nginx/nginx.conf", "previous");
        fs.deny_write("/etc/nginx/nginx.conf");

        let err = render_file(
            &fs,
            &PathBuf::from("/etc/nginx/nginx.conf.template"),
            &PathBuf::from("/etc/nginx/nginx.conf"),
            &gateway_whitelist(),
            &EnvSnapshot::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ConfexecError::RenderIo { .. }));
        assert_eq!(fs.contents("/etc/nginx/nginx.conf").unwrap(), b"previous".to_vec());
    }
}
