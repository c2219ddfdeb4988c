//! Unit tests for the bootstrap orchestrator.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use summon_cli::application::services::bootstrap::{self, BootstrapDeps};
use summon_cli::application::signal::BootstrapSignal;
use summon_cli::domain::bootstrap::BootstrapPath;
use summon_cli::domain::error::{BootstrapError, SchemaError};
use summon_cli::domain::session::Session;

use crate::helpers::{
    FakeBackend, FakeFs, FakeScripts, RecordingReporter, ScriptedRunner, ok_output,
};

fn session(cloud: &str, cloud_type: &str) -> Session {
    Session {
        cloud: cloud.to_string(),
        cloud_type: cloud_type.to_string(),
        controller: "ctl".to_string(),
        model: "conjure".to_string(),
        spells_dir: PathBuf::from("/spells"),
        spell_dir: PathBuf::from("/spells/kubernetes"),
        ..Session::default()
    }
}

fn lxd_backend() -> FakeBackend {
    FakeBackend {
        cloud_types: BTreeMap::from([("localhost".to_string(), "lxd".to_string())]),
        bootstrap_ok: true,
        provider_type: "lxd".to_string(),
        ..FakeBackend::default()
    }
}

struct Harness {
    scripts: FakeScripts,
    fs: FakeFs,
    tools: ScriptedRunner,
    reporter: RecordingReporter,
    signal: BootstrapSignal,
}

impl Harness {
    fn new() -> Self {
        Self {
            scripts: FakeScripts::default(),
            fs: FakeFs::default(),
            tools: ScriptedRunner::default(),
            reporter: RecordingReporter::default(),
            signal: BootstrapSignal::new(),
        }
    }

    fn deps<'a>(
        &'a self,
        backend: &'a FakeBackend,
    ) -> BootstrapDeps<'a, FakeBackend, FakeScripts, FakeFs, ScriptedRunner, RecordingReporter>
    {
        BootstrapDeps {
            backend,
            scripts: &self.scripts,
            fs: &self.fs,
            tools: &self.tools,
            reporter: &self.reporter,
            signal: &self.signal,
        }
    }
}

#[tokio::test]
async fn test_known_controller_adds_model_and_signals_once() {
    let backend = FakeBackend {
        controllers: vec!["other".to_string(), "ctl".to_string()],
        ..lxd_backend()
    };
    let h = Harness::new();
    let rx = h.signal.subscribe();
    let mut s = session("localhost", "localhost");

    let path = bootstrap::run(&mut s, &h.deps(&backend)).await.expect("run");

    assert_eq!(path, BootstrapPath::AddModel);
    assert_eq!(backend.log(), ["add-model conjure localhost ctl None"]);
    assert_eq!(
        h.reporter.events(),
        ["step:Creating model.", "step:Model created."]
    );
    assert!(h.signal.is_set());
    assert!(rx.has_changed().expect("open"));
    assert!(!h.signal.set(), "signal must already have fired");
    assert!(h.scripts.runs().is_empty(), "no step scripts on add-model path");
}

#[tokio::test]
async fn test_jaas_always_adds_model() {
    let backend = lxd_backend();
    let h = Harness::new();
    let mut s = Session {
        is_jaas: true,
        ..session("localhost", "localhost")
    };

    let path = bootstrap::run(&mut s, &h.deps(&backend)).await.expect("run");

    assert_eq!(path, BootstrapPath::AddModel);
    assert!(backend.log()[0].starts_with("add-model"));
}

#[tokio::test]
async fn test_new_controller_bootstraps_with_pre_and_post_steps() {
    let backend = lxd_backend();
    let mut h = Harness::new();
    h.scripts
        .messages
        .insert("00_post-bootstrap".to_string(), "Storage configured.".to_string());
    let mut s = session("localhost", "localhost");

    let path = bootstrap::run(&mut s, &h.deps(&backend)).await.expect("run");

    assert_eq!(path, BootstrapPath::Bootstrap);
    assert_eq!(
        backend.log(),
        [
            "bootstrap localhost ctl conjure log=/spells/kubernetes/ctl-bootstrap.err",
            "login ctl:conjure",
        ]
    );

    let runs = h.scripts.runs();
    assert_eq!(runs.len(), 2);
    let (pre, pre_env) = &runs[0];
    assert_eq!(pre, "00_pre-bootstrap");
    assert_eq!(pre_env["JUJU_PROVIDERTYPE"], "lxd");
    assert_eq!(pre_env["JUJU_CREDENTIAL"], "");
    assert_eq!(pre_env["JUJU_CONTROLLER"], "ctl");
    assert_eq!(pre_env["JUJU_MODEL"], "conjure");
    assert_eq!(pre_env["SUMMON_SPELLSDIR"], "/spells");
    assert_eq!(runs[1].0, "00_post-bootstrap");

    assert_eq!(
        h.reporter.events(),
        [
            "step:Bootstrapping controller.",
            "step:Bootstrap complete.",
            "success:Storage configured.",
        ]
    );
    assert!(h.signal.is_set());
    assert!(!h.signal.set());
}

#[tokio::test]
async fn test_post_bootstrap_env_uses_logged_in_provider_type() {
    let backend = FakeBackend {
        provider_type: "lxd-remote".to_string(),
        ..lxd_backend()
    };
    let h = Harness::new();
    let mut s = session("localhost", "localhost");

    bootstrap::run(&mut s, &h.deps(&backend)).await.expect("run");

    let runs = h.scripts.runs();
    assert_eq!(runs[0].1["JUJU_PROVIDERTYPE"], "lxd");
    assert_eq!(runs[1].1["JUJU_PROVIDERTYPE"], "lxd-remote");
    assert_eq!(s.env["JUJU_PROVIDERTYPE"], "lxd-remote");
}

#[tokio::test]
async fn test_bootstrap_failure_carries_log_tail_and_does_not_signal() {
    let backend = FakeBackend {
        bootstrap_ok: false,
        ..lxd_backend()
    };
    let mut h = Harness::new();
    let log: String = (0..500).map(|i| format!("line {i}\n")).collect();
    h.fs
        .files
        .insert(PathBuf::from("/spells/kubernetes/ctl-bootstrap.err"), log);
    let mut s = session("localhost", "localhost");

    let err = bootstrap::run(&mut s, &h.deps(&backend))
        .await
        .expect_err("bootstrap fails");

    let rendered = format!("{err:#}");
    assert!(rendered.starts_with("Unable to bootstrap (cloud type: localhost)\n    line 100\n"));
    assert!(rendered.ends_with("\n    line 499"));
    assert!(!rendered.contains("line 99\n"));
    match err.downcast_ref::<BootstrapError>() {
        Some(BootstrapError::Failed { log_tail, .. }) => {
            assert_eq!(log_tail.len(), 400);
            assert_eq!(log_tail[0], "line 100");
            assert_eq!(log_tail[399], "line 499");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!h.signal.is_set());
    assert_eq!(h.scripts.runs().len(), 1, "post-bootstrap must not run");
    assert!(!backend.log().iter().any(|l| l.starts_with("login")));
}

#[tokio::test]
async fn test_bootstrap_failure_without_log_still_fails() {
    let backend = FakeBackend {
        bootstrap_ok: false,
        ..lxd_backend()
    };
    let h = Harness::new();
    let mut s = session("localhost", "localhost");

    let err = bootstrap::run(&mut s, &h.deps(&backend))
        .await
        .expect_err("bootstrap fails");

    match err.downcast_ref::<BootstrapError>() {
        Some(BootstrapError::Failed { log_tail, .. }) => assert!(log_tail.is_empty()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_region_and_aws_profile() {
    let backend = FakeBackend {
        cloud_types: BTreeMap::from([("aws".to_string(), "ec2".to_string())]),
        credentials: BTreeMap::from([(
            ("aws".to_string(), "me".to_string()),
            BTreeMap::from([
                ("access-key".to_string(), "AKIA".to_string()),
                ("secret-key".to_string(), "s3cr3t".to_string()),
            ]),
        )]),
        bootstrap_ok: true,
        provider_type: "ec2".to_string(),
        ..FakeBackend::default()
    };
    let mut h = Harness::new();
    h.tools = ScriptedRunner::new([ok_output(b"")]);
    let mut s = Session {
        region: Some("us-west-2".to_string()),
        credential: Some("me".to_string()),
        ..session("aws", "ec2")
    };

    bootstrap::run(&mut s, &h.deps(&backend)).await.expect("run");

    let calls = h.tools.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "aws");
    assert_eq!(calls[0].args, ["configure", "--profile", "me"]);
    assert_eq!(calls[0].stdin.as_deref(), Some(&b"AKIA\ns3cr3t\n\n\n"[..]));
    assert!(backend.log()[0].starts_with("bootstrap aws/us-west-2 ctl"));
    assert_eq!(h.scripts.runs()[0].1["JUJU_CREDENTIAL"], "me");
}

#[tokio::test]
async fn test_unknown_cloud_type_is_schema_error() {
    let backend = lxd_backend();
    let h = Harness::new();
    let mut s = session("nimbus", "nimbus");

    let err = bootstrap::run(&mut s, &h.deps(&backend))
        .await
        .expect_err("schema");

    assert!(err.downcast_ref::<SchemaError>().is_some());
    assert!(backend.log().is_empty());
}

#[tokio::test]
async fn test_cloud_missing_from_backend_fails_before_bootstrap() {
    let backend = FakeBackend {
        cloud_types: BTreeMap::new(),
        ..lxd_backend()
    };
    let h = Harness::new();
    let mut s = session("localhost", "localhost");

    let err = bootstrap::run(&mut s, &h.deps(&backend))
        .await
        .expect_err("unknown cloud");

    assert!(matches!(
        err.downcast_ref::<BootstrapError>(),
        Some(BootstrapError::UnknownCloudType(c)) if c == "localhost"
    ));
    assert!(backend.log().is_empty());
}

#[tokio::test]
async fn test_add_model_failure_propagates_without_signal() {
    let backend = FakeBackend {
        controllers: vec!["ctl".to_string()],
        add_model_error: Some("model already exists".to_string()),
        ..lxd_backend()
    };
    let h = Harness::new();
    let mut s = session("localhost", "localhost");

    let err = bootstrap::run(&mut s, &h.deps(&backend))
        .await
        .expect_err("add-model fails");

    assert!(err.to_string().contains("model already exists"));
    assert!(!h.signal.is_set());
    assert_eq!(h.reporter.events(), ["step:Creating model."]);
}
