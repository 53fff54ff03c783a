#![allow(dead_code)]

use snapctl::backup::Resource;
use snapctl::config::{
    AuthSection, BackupSection, ConfigFile, ProtectSection, ProviderSection, RawConfigFile,
    RawProtectedResource,
};

/// Builder for `RawConfigFile` / `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                app: "test-app".to_string(),
                provider: ProviderSection {
                    name: "aws".to_string(),
                    region: "us-east-1".to_string(),
                },
                auth: AuthSection::default(),
                backup: BackupSection::default(),
                protect: ProtectSection::default(),
            },
        }
    }

    pub fn provider(mut self, name: &str) -> Self {
        self.config.provider.name = name.to_string();
        self
    }

    pub fn region(mut self, region: &str) -> Self {
        self.config.provider.region = region.to_string();
        self
    }

    pub fn profile(mut self, profile: &str) -> Self {
        self.config.auth.profile = Some(profile.to_string());
        self
    }

    pub fn parallel(mut self, parallel: usize) -> Self {
        self.config.backup.parallel = parallel;
        self
    }

    pub fn poll_interval(mut self, interval: &str) -> Self {
        self.config.backup.poll_interval = interval.to_string();
        self
    }

    pub fn max_poll_failures(mut self, limit: u32) -> Self {
        self.config.backup.max_poll_failures = Some(limit);
        self
    }

    pub fn with_resource(mut self, name: &str, kind: &str, tags: &str) -> Self {
        self.config.protect.resources.push(RawProtectedResource {
            name: name.to_string(),
            kind: kind.to_string(),
            tags: tags.to_string(),
        });
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Resource`. Defaults to the eligible `available` status.
pub struct ResourceBuilder {
    resource: Resource,
}

impl ResourceBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            resource: Resource::new(id, "available"),
        }
    }

    pub fn status(mut self, status: &str) -> Self {
        self.resource.status = status.to_string();
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.resource.tags.insert(key.to_string(), value.to_string());
        self
    }

    pub fn arn(mut self, arn: &str) -> Self {
        self.resource.arn = Some(arn.to_string());
        self
    }

    pub fn build(self) -> Resource {
        self.resource
    }
}

/// `count` eligible resources named `db-0`, `db-1`, ...
pub fn resources(count: usize) -> Vec<Resource> {
    (0..count)
        .map(|i| ResourceBuilder::new(&format!("db-{i}")).build())
        .collect()
}
