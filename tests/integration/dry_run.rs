use serde_json::Value;

use crate::common::{stdout, Workspace};

#[test]
fn dry_run_prints_plan_without_side_effects() {
    let workspace = Workspace::new();
    workspace.install_stand_ins(0);

    let output = workspace.launch(&[
        "--dry-run",
        "query.fasta",
        "desc",
        "1gpu1",
        "monomer",
        "nvidia",
        "msa",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let plan: Value = serde_json::from_str(&stdout(&output)).expect("stdout is a JSON plan");
    assert_eq!(plan["environment"]["vars"]["CUDA_VISIBLE_DEVICES"], "1");
    assert_eq!(plan["environment"]["active_env"], "af2");
    assert_eq!(
        plan["module_steps"].as_array().map(Vec::len),
        Some(3),
        "plan: {plan}"
    );
    assert_eq!(plan["program_step"]["program"], "/bin/sh");

    assert!(!workspace.file("modules.log").exists());
    assert!(!workspace.file("program-args.log").exists());
    assert!(workspace.output_dirs().is_empty());
}

#[test]
fn explicit_config_flag_overrides_working_directory_file() {
    let workspace = Workspace::new();
    workspace.install_stand_ins(0);
    let other = workspace.file("other.toml");
    std::fs::write(&other, "[program]\nmax_template_date = \"2020-05-14\"\n")
        .expect("can write other.toml");

    let output = workspace.launch(&[
        "--dry-run",
        "--config",
        "other.toml",
        "query.fasta",
        "desc",
        "cpu",
        "monomer",
        "amd",
        "nomsa",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let plan: Value = serde_json::from_str(&stdout(&output)).expect("stdout is a JSON plan");
    let args = plan["program_step"]["args"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    assert!(args.contains(&Value::from("--max_template_date=2020-05-14")));
    assert_eq!(plan["program_step"]["program"], "python3");
}
