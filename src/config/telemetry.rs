use tracing::{debug, info};

use super::{ConfigSource, LauncherConfig};

pub fn log_source(source: &ConfigSource) {
    match source {
        ConfigSource::Defaults => debug!(
            target: "fold_launcher::config",
            "No configuration file found; using built-in defaults"
        ),
        ConfigSource::File(path) => info!(
            target: "fold_launcher::config",
            path = %path.display(),
            "Loading configuration file"
        ),
    }
}

pub fn log_loaded(config: &LauncherConfig) {
    info!(
        target: "fold_launcher::config",
        path = %config
            .source_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<defaults>".into()),
        program = ?config.program.command,
        max_template_date = %config.program.max_template_date,
        module_load_command = ?config.modules.load_command,
        amd_modules = config.modules.amd.len(),
        nvidia_modules = config.modules.nvidia.len(),
        output_root = %config.output.root.display(),
        "Configuration loaded successfully"
    );
}
