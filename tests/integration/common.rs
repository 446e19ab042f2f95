use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use tempfile::TempDir;

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_fold-launcher");

/// Scratch working directory with a FASTA input and stand-in cluster tools.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("can create temporary directory");
        fs::write(dir.path().join("query.fasta"), ">query\nMKTAYIAKQRQISFVKSHFSRQ\n")
            .expect("can write fasta");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `launcher.toml` pointing the module loader and program at shell stand-ins.
    pub fn install_stand_ins(&self, program_exit_code: i32) {
        let loader = self.file("fake-module-load.sh");
        fs::write(
            &loader,
            format!(
                "printf '%s\\n' \"$*\" >> '{}'\n",
                self.file("modules.log").display()
            ),
        )
        .expect("can write module loader");

        let program = self.file("fake-alphafold.sh");
        fs::write(
            &program,
            format!(
                "printf '%s\\n' \"$@\" > '{args}'\n\
                 env | grep -E '^(JAX_PLATFORMS|CUDA_VISIBLE_DEVICES|HIP_VISIBLE_DEVICES|ROCM_PATH|LD_LIBRARY_PATH)=' | sort > '{env}'\n\
                 exit {program_exit_code}\n",
                args = self.file("program-args.log").display(),
                env = self.file("program-env.log").display(),
            ),
        )
        .expect("can write program stand-in");

        fs::write(
            self.file("launcher.toml"),
            format!(
                "[program]\ncommand = [\"/bin/sh\", \"{program}\"]\n\n\
                 [modules]\nload_command = [\"/bin/sh\", \"{loader}\"]\n",
                program = program.display(),
                loader = loader.display(),
            ),
        )
        .expect("can write launcher.toml");
    }

    pub fn read_lines(&self, name: &str) -> Vec<String> {
        fs::read_to_string(self.file(name))
            .unwrap_or_else(|_| panic!("{name} should exist"))
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Run the launcher inside the workspace with an active conda env.
    pub fn launch(&self, args: &[&str]) -> Output {
        self.command(args)
            .env("CONDA_PREFIX", "/envs/af2")
            .env("CONDA_DEFAULT_ENV", "af2")
            .output()
            .expect("launcher should start")
    }

    /// Run the launcher without any conda variables.
    pub fn launch_without_conda(&self, args: &[&str]) -> Output {
        self.command(args)
            .env_remove("CONDA_PREFIX")
            .env_remove("CONDA_DEFAULT_ENV")
            .output()
            .expect("launcher should start")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(BINARY_PATH);
        command
            .current_dir(self.path())
            .args(args)
            .env_remove("FOLD_LAUNCHER_CONFIG")
            .env_remove("LD_LIBRARY_PATH")
            .env_remove("JAX_PLATFORMS")
            .env_remove("ROCM_PATH")
            .env_remove("HIP_VISIBLE_DEVICES")
            .env_remove("CUDA_VISIBLE_DEVICES")
            .env("RUST_LOG", "warn");
        command
    }

    /// Directories created under `output/<run>/`.
    pub fn output_dirs(&self) -> Vec<PathBuf> {
        let root = self.file("output");
        let Ok(runs) = fs::read_dir(&root) else {
            return Vec::new();
        };
        runs.flatten()
            .flat_map(|run| fs::read_dir(run.path()).into_iter().flatten().flatten())
            .map(|entry| entry.path())
            .collect()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}
