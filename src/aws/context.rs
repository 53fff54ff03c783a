// src/aws/context.rs

//! Shared AWS configuration context.

use std::fmt;
use std::sync::Arc;

use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use chrono::Utc;
use tracing::{debug, info};

use crate::config::{AuthSection, ConfigFile};

/// Loaded AWS SDK configuration plus the region it was loaded for.
#[derive(Clone)]
pub struct AwsContext {
    config: Arc<SdkConfig>,
    region: String,
}

impl AwsContext {
    /// Build the context described by a validated config.
    pub async fn from_config(cfg: &ConfigFile) -> Self {
        Self::load(&cfg.region, &cfg.auth).await
    }

    /// Load credentials and settings for `region`.
    ///
    /// - `auth.profile` selects a named profile from the shared config files;
    ///   otherwise the default credential chain is used.
    /// - `auth.role_arn`, if set, is assumed via STS using the credentials
    ///   resolved above.
    pub async fn load(region: &str, auth: &AuthSection) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(profile) = &auth.profile {
            debug!(profile = %profile, "using named AWS profile");
            loader = loader.profile_name(profile);
        }
        let base = loader.load().await;

        let config = match &auth.role_arn {
            Some(role_arn) => {
                let session_name = assume_role_session_name();
                info!(role_arn = %role_arn, session = %session_name, "assuming IAM role");
                let provider = AssumeRoleProvider::builder(role_arn.clone())
                    .session_name(session_name)
                    .region(Region::new(region.to_string()))
                    .configure(&base)
                    .build()
                    .await;
                aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region.to_string()))
                    .credentials_provider(provider)
                    .load()
                    .await
            }
            None => base,
        };

        Self {
            config: Arc::new(config),
            region: region.to_string(),
        }
    }

    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn rds_client(&self) -> aws_sdk_rds::Client {
        aws_sdk_rds::Client::new(self.sdk_config())
    }
}

impl fmt::Debug for AwsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsContext")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// STS session name, unique per invocation.
fn assume_role_session_name() -> String {
    format!("snapctl-{}", Utc::now().format("%Y%m%d%H%M%S"))
}
