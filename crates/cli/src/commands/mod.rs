pub mod categories;
pub mod downloads;
pub mod interactive;
pub mod product;
pub mod search;
pub mod serve;
pub mod submit;

use clap::Args;
use std::path::PathBuf;
use tracing::debug;
use yx_core::SiteConfig;
use yx_core::content::CmsClient;

/// Flags shared by every command that talks to the CMS.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    #[arg(
        long,
        value_name = "FILE",
        global = true,
        help = "Config file. Defaults to ./yx.toml, then ~/.yx/config.toml"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        value_name = "URL",
        global = true,
        help = "CMS base URL, overriding config and YX_CMS_URL"
    )]
    pub cms_url: Option<String>,
}

impl CommonArgs {
    /// Config file and environment, with these flags applied last.
    pub fn load_config(&self) -> Result<SiteConfig, String> {
        let mut config = SiteConfig::load(self.config.as_deref()).map_err(|err| err.to_string())?;
        if let Some(cms_url) = &self.cms_url {
            config.cms.base_url.clone_from(cms_url);
        }
        debug!(cms = %config.cms.base_url, "Resolved configuration.");
        Ok(config)
    }

    pub fn cms_client(&self) -> Result<(SiteConfig, CmsClient), String> {
        let config = self.load_config()?;
        let client = CmsClient::new(&config.cms).map_err(|err| err.to_string())?;
        Ok((config, client))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_flag_overrides_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("yx.toml");
        fs::write(&path, "[cms]\nbase_url = \"http://from-file:1337\"\ntimeout_secs = 3\n").unwrap();

        let args = CommonArgs {
            config: Some(path),
            cms_url: Some("http://from-flag:1337".to_string()),
        };
        let config = args.load_config().unwrap();
        assert_eq!(config.cms.base_url, "http://from-flag:1337");
        assert_eq!(config.cms.timeout_secs, 3);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let args = CommonArgs {
            config: Some(temp_dir.path().join("absent.toml")),
            cms_url: None,
        };
        let err = args.load_config().unwrap_err();
        assert!(err.contains("absent.toml"));
    }
}
