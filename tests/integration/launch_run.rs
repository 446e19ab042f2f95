use crate::common::Workspace;

#[test]
fn nvidia_monomer_run_passes_flags_and_environment() {
    let workspace = Workspace::new();
    workspace.install_stand_ins(0);

    let output = workspace.launch(&["query.fasta", "casp", "1gpu0", "monomer", "nvidia", "nomsa"]);

    assert_eq!(
        output.status.code(),
        Some(0),
        "stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    assert_eq!(
        workspace.read_lines("modules.log"),
        vec!["hmmer-3.4-a100", "hh-suite-3.3_AVX2", "kalign-3.4.0-a100"]
    );

    let output_dirs = workspace.output_dirs();
    assert_eq!(output_dirs.len(), 1, "dirs: {output_dirs:?}");
    let output_dir = &output_dirs[0];
    assert!(output_dir.ends_with("query"));
    let run_name = output_dir
        .parent()
        .and_then(|run| run.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .expect("run directory has a name");
    assert!(run_name.contains("-af2-"), "run dir: {run_name}");

    let args = workspace.read_lines("program-args.log");
    assert_eq!(
        args,
        vec![
            "--fasta_paths=query.fasta".to_string(),
            format!(
                "--output_dir={}",
                output_dir
                    .canonicalize()
                    .expect("output dir exists")
                    .display()
            ),
            "--max_template_date=2022-01-01".to_string(),
            "--use_precomputed_msas=false".to_string(),
            "--model_preset=monomer".to_string(),
            "--db_preset=full_dbs".to_string(),
            "--uniref90_database_path=/data/uniref90.fasta".to_string(),
        ]
    );

    assert_eq!(
        workspace.read_lines("program-env.log"),
        vec![
            "CUDA_VISIBLE_DEVICES=0",
            "JAX_PLATFORMS=cuda",
            "LD_LIBRARY_PATH=/envs/af2/lib:",
        ]
    );
}

#[test]
fn amd_multimer_run_exposes_both_gpus() {
    let workspace = Workspace::new();
    workspace.install_stand_ins(0);

    let output = workspace.launch(&["query.fasta", "complex", "2gpus", "multimer", "amd", "msa"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        workspace.read_lines("modules.log"),
        vec!["hmmer-3.4", "hh-suite-3.3_AVX2", "kalign-3.4.0"]
    );

    let args = workspace.read_lines("program-args.log");
    assert!(args.contains(&"--model_preset=multimer".to_string()));
    assert!(args.contains(&"--uniprot_database_path=/data/uniprot.fasta".to_string()));
    assert!(args.contains(&"--use_precomputed_msas=true".to_string()));

    let env = workspace.read_lines("program-env.log");
    assert!(env.contains(&"HIP_VISIBLE_DEVICES=0,1".to_string()), "{env:?}");
    assert!(env.contains(&"JAX_PLATFORMS=rocm".to_string()), "{env:?}");
    assert!(env.contains(&"ROCM_PATH=/opt/rocm".to_string()), "{env:?}");
}

#[test]
fn failing_program_exits_with_one() {
    let workspace = Workspace::new();
    workspace.install_stand_ins(3);

    let output = workspace.launch(&["query.fasta", "desc", "cpu", "monomer", "nvidia", "msa"]);

    assert_eq!(output.status.code(), Some(1));
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("alphafold"), "stdout: {text}");
    assert!(text.contains("exit=Some(3)"), "stdout: {text}");
}
