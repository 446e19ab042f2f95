use crate::common::{stdout, Workspace};

#[test]
fn missing_input_file_exits_with_message_on_stdout() {
    let workspace = Workspace::new();

    let output = workspace.launch(&["absent.fasta", "desc", "cpu", "monomer", "nvidia", "msa"]);

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(
        text.contains("Input file 'absent.fasta' does not exist."),
        "stdout: {text}"
    );
}

#[test]
fn missing_file_is_reported_before_bad_choices() {
    let workspace = Workspace::new();

    let output = workspace.launch(&["absent.fasta", "desc", "9gpus", "dimer", "intel", "maybe"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("does not exist"));
}

#[test]
fn invalid_choices_exit_with_one() {
    let workspace = Workspace::new();
    let cases = [
        (["query.fasta", "d", "cpu", "dimer", "nvidia", "msa"], "'preset'"),
        (["query.fasta", "d", "cpu", "monomer", "nvidia", "yes"], "'msa'"),
        (["query.fasta", "d", "cpu", "monomer", "intel", "msa"], "Supported platforms"),
        (["query.fasta", "d", "3gpus", "monomer", "amd", "msa"], "Unsupported mode"),
    ];

    for (args, needle) in cases {
        let output = workspace.launch(&args);

        assert_eq!(output.status.code(), Some(1), "args: {args:?}");
        let text = stdout(&output);
        assert!(text.starts_with("Error: "), "stdout: {text}");
        assert!(text.contains(needle), "expected {needle} in: {text}");
    }
}

#[test]
fn missing_conda_environment_loads_no_modules() {
    let workspace = Workspace::new();
    workspace.install_stand_ins(0);

    let output =
        workspace.launch_without_conda(&["query.fasta", "desc", "1gpu0", "monomer", "amd", "msa"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("CONDA_PREFIX"));
    assert!(!workspace.file("modules.log").exists());
    assert!(!workspace.file("program-args.log").exists());
    assert!(workspace.output_dirs().is_empty());
}

#[test]
fn invalid_config_file_is_fatal() {
    let workspace = Workspace::new();
    std::fs::write(
        workspace.file("launcher.toml"),
        "[program]\nmax_template_date = \"yesterday\"\n",
    )
    .expect("can write launcher.toml");

    let output = workspace.launch(&["query.fasta", "desc", "cpu", "monomer", "nvidia", "msa"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("program.max_template_date"));
}

#[test]
fn missing_input_file_is_reported_before_config_errors() {
    let workspace = Workspace::new();
    std::fs::write(
        workspace.file("launcher.toml"),
        "[program]\nmax_template_date = \"yesterday\"\n",
    )
    .expect("can write launcher.toml");

    let output = workspace.launch(&["absent.fasta", "desc", "cpu", "monomer", "nvidia", "msa"]);

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(
        text.contains("Input file 'absent.fasta' does not exist."),
        "stdout: {text}"
    );
    assert!(!text.contains("max_template_date"), "stdout: {text}");
}
