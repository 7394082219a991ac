use acmicore::prelude::DEFAULT_WEAPON_RADIUS_M;
use acmicore::FogConfig;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub weapon_radius_m: u32,
    pub dry_run: bool,
    pub read_only: bool,
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("Tacview"),
            output_dir: PathBuf::from("Output"),
            weapon_radius_m: DEFAULT_WEAPON_RADIUS_M,
            dry_run: false,
            read_only: false,
            verbose: true,
        }
    }
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading run config {}", path_ref.display()))?;
        let config: RunConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing run config {}", path_ref.display()))?;
        config
            .fog_config()
            .with_context(|| format!("validating run config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        input_dir: PathBuf,
        output_dir: PathBuf,
        weapon_radius_m: u32,
        dry_run: bool,
        read_only: bool,
        verbose: bool,
    ) -> Self {
        Self {
            input_dir,
            output_dir,
            weapon_radius_m,
            dry_run,
            read_only,
            verbose,
        }
    }

    pub fn fog_config(&self) -> anyhow::Result<FogConfig> {
        FogConfig::new(self.weapon_radius_m, self.verbose).context("building fog-of-war settings")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_fog_config() {
        let cfg = RunConfig::from_args("in".into(), "out".into(), 25, false, true, false);
        let fog = cfg.fog_config().unwrap();
        assert_eq!(fog.weapon_radius_m, 25);
        assert!(!fog.verbose);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"input_dir: Recordings\nweapon_radius_m: 80\nread_only: true\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = RunConfig::load(&path).unwrap();
        assert_eq!(cfg.input_dir, PathBuf::from("Recordings"));
        assert_eq!(cfg.output_dir, PathBuf::from("Output"));
        assert_eq!(cfg.weapon_radius_m, 80);
        assert!(cfg.read_only);
        assert!(cfg.verbose);
    }

    #[test]
    fn config_load_rejects_zero_radius() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"weapon_radius_m: 0\n").unwrap();
        let path = temp.into_temp_path();
        assert!(RunConfig::load(&path).is_err());
    }
}
