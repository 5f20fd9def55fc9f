use crate::cli::{ModeArg, RunArgs};
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tmcompare::core::io::tables::OutputLayout;
use tmcompare::engine::config::{AlignConfig, AlignmentMode};
use tmcompare::engine::sasa::ShrakeRupley;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub alignment: AlignmentSection,
    #[serde(default)]
    pub sasa: SasaSection,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct AlignmentSection {
    pub executable: Option<PathBuf>,
    pub mode: Option<FileMode>,
    #[serde(default)]
    pub extra_args: Vec<String>,
    pub timeout_secs: Option<u64>,
    pub apply_transform: Option<bool>,
    pub strip_chain_breaks: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileMode {
    ScoreOnly,
    Full,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SasaSection {
    pub probe_radius: Option<f64>,
    pub atom_radius: Option<f64>,
    pub samples: Option<usize>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("invalid TOML in '{}': {}", path.display(), e)))
    }
}

/// Everything the `run` command needs, resolved from the optional config
/// file and the CLI flags. CLI flags win over file values.
#[derive(Debug)]
pub struct RunSettings {
    pub align: AlignConfig,
    pub sasa: ShrakeRupley,
    pub layout: OutputLayout,
    pub write_superposed: bool,
}

pub fn resolve(args: &RunArgs) -> Result<RunSettings> {
    let file = match &args.config {
        Some(path) => {
            debug!("Loading configuration file {:?}", path);
            FileConfig::from_file(path)?
        }
        None => FileConfig::default(),
    };

    let executable = args
        .exe
        .clone()
        .or(file.alignment.executable)
        .ok_or_else(|| {
            CliError::Config(
                "alignment executable not set; pass --exe or set alignment.executable in the config file".to_string(),
            )
        })?;

    let mode = match (args.mode, file.alignment.mode) {
        (Some(ModeArg::ScoreOnly), _) => AlignmentMode::ScoreOnly,
        (Some(ModeArg::Full), _) => AlignmentMode::Full,
        (None, Some(FileMode::ScoreOnly)) => AlignmentMode::ScoreOnly,
        (None, Some(FileMode::Full)) | (None, None) => AlignmentMode::Full,
    };

    let extra_args = if args.extra_args.is_empty() {
        file.alignment.extra_args
    } else {
        args.extra_args.clone()
    };

    let timeout = args
        .timeout
        .or(file.alignment.timeout_secs)
        .map(Duration::from_secs);

    let apply_transform = args.write_superposed
        || file.alignment.apply_transform.unwrap_or(false);

    let strip_chain_breaks = if args.keep_chain_breaks {
        false
    } else {
        file.alignment.strip_chain_breaks.unwrap_or(true)
    };

    let align = AlignConfig::builder()
        .executable(executable)
        .mode(mode)
        .extra_args(extra_args)
        .apply_transform(apply_transform)
        .strip_chain_breaks(strip_chain_breaks)
        .timeout(timeout)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let defaults = ShrakeRupley::default();
    let sasa = ShrakeRupley {
        probe_radius: file.sasa.probe_radius.unwrap_or(defaults.probe_radius),
        atom_radius: file.sasa.atom_radius.unwrap_or(defaults.atom_radius),
        samples: file.sasa.samples.unwrap_or(defaults.samples),
    };

    Ok(RunSettings {
        align,
        sasa,
        layout: OutputLayout::new(&args.data_dir, &args.dataset),
        write_superposed: args.write_superposed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args() -> RunArgs {
        RunArgs {
            data_dir: PathBuf::from("/data"),
            dataset: "Hemo".to_string(),
            exe: None,
            config: None,
            mode: None,
            extra_args: Vec::new(),
            timeout: None,
            write_superposed: false,
            keep_chain_breaks: false,
        }
    }

    #[test]
    fn missing_executable_everywhere_is_a_config_error() {
        let result = resolve(&run_args());
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn cli_executable_is_enough() {
        let mut args = run_args();
        args.exe = Some(PathBuf::from("/usr/bin/TMalign"));
        let settings = resolve(&args).unwrap();
        assert_eq!(settings.align.executable, PathBuf::from("/usr/bin/TMalign"));
        assert_eq!(settings.align.mode, AlignmentMode::Full);
        assert!(settings.align.strip_chain_breaks);
    }

    #[test]
    fn file_values_fill_in_and_cli_flags_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tmcompare.toml");
        std::fs::write(
            &path,
            r#"
[alignment]
executable = "/opt/TMalign"
mode = "score-only"
timeout-secs = 30
extra-args = ["-fast"]

[sasa]
probe-radius = 1.2
"#,
        )
        .unwrap();

        let mut args = run_args();
        args.config = Some(path);
        args.mode = Some(ModeArg::Full);

        let settings = resolve(&args).unwrap();
        assert_eq!(settings.align.executable, PathBuf::from("/opt/TMalign"));
        // CLI mode wins over the file's score-only.
        assert_eq!(settings.align.mode, AlignmentMode::Full);
        assert_eq!(settings.align.timeout, Some(Duration::from_secs(30)));
        assert_eq!(settings.align.extra_args, vec!["-fast".to_string()]);
        assert!((settings.sasa.probe_radius - 1.2).abs() < 1e-9);
    }

    #[test]
    fn write_superposed_implies_apply_transform() {
        let mut args = run_args();
        args.exe = Some(PathBuf::from("/usr/bin/TMalign"));
        args.write_superposed = true;
        let settings = resolve(&args).unwrap();
        assert!(settings.align.apply_transform);
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[alignment]\nexecutbale = \"/opt/TMalign\"\n").unwrap();
        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::Config(_))
        ));
    }
}
