//! Test configuration builder for creating test configs programmatically

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builder for creating test configurations
pub struct TestConfigBuilder {
    temp_dir: TempDir,
    main_config: MainConfigBuilder,
    host_configs: Vec<(String, HostConfigBuilder)>,
}

impl TestConfigBuilder {
    /// Create a new test config builder
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            main_config: MainConfigBuilder::default(),
            host_configs: Vec::new(),
        }
    }

    /// Configure main settings
    pub fn with_main_config<F>(mut self, f: F) -> Self
    where
        F: FnOnce(MainConfigBuilder) -> MainConfigBuilder,
    {
        self.main_config = f(self.main_config);
        self
    }

    /// Add an etcd host configuration, written to `<file_name>.toml`
    pub fn with_host<F>(mut self, file_name: &str, f: F) -> Self
    where
        F: FnOnce(HostConfigBuilder) -> HostConfigBuilder,
    {
        let builder = f(HostConfigBuilder::default());
        self.host_configs.push((file_name.to_string(), builder));
        self
    }

    /// Build and write config files to temp directory
    pub fn build(self) -> TestConfig {
        let config_dir = self.temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        fs::write(config_dir.join("main.toml"), self.main_config.to_toml())
            .expect("Failed to write main.toml");

        for (name, builder) in self.host_configs {
            fs::write(config_dir.join(format!("{}.toml", name)), builder.to_toml())
                .expect("Failed to write host config");
        }

        TestConfig {
            _temp_dir: self.temp_dir,
            config_dir,
        }
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Main configuration builder
#[derive(Clone)]
pub struct MainConfigBuilder {
    cluster_name: String,
    port: u16,
    etcd_image: String,
    backup_image: String,
    backup_config: bool,
    s3_bucket: Option<String>,
}

impl MainConfigBuilder {
    pub fn cluster_name(mut self, name: &str) -> Self {
        self.cluster_name = name.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn backup_image(mut self, image: &str) -> Self {
        self.backup_image = image.to_string();
        self
    }

    /// Enable the backup configuration section
    pub fn with_backup_config(mut self) -> Self {
        self.backup_config = true;
        self
    }

    /// Enable backup configuration with an S3 target
    pub fn with_s3(mut self, bucket: &str) -> Self {
        self.backup_config = true;
        self.s3_bucket = Some(bucket.to_string());
        self
    }

    fn to_toml(&self) -> String {
        let mut toml = format!(
            r#"
cluster_name = "{}"
port = {}
job_poll_interval_seconds = 1

[etcd]
image = "{}"
backup_image = "{}"
"#,
            self.cluster_name, self.port, self.etcd_image, self.backup_image
        );

        if self.backup_config {
            toml.push_str(
                r#"
[etcd.backup_config]
interval_hours = 6
retention = 12
"#,
            );
        }

        if let Some(bucket) = &self.s3_bucket {
            toml.push_str(&format!(
                r#"
[etcd.backup_config.s3_backup_config]
endpoint = "s3.amazonaws.com"
bucket_name = "{}"
region = "us-east-1"
"#,
                bucket
            ));
        }

        toml
    }
}

impl Default for MainConfigBuilder {
    fn default() -> Self {
        Self {
            cluster_name: "c-demo".to_string(),
            port: 8095,
            etcd_image: "rancher/mirrored-coreos-etcd:v3.5.9".to_string(),
            backup_image: "rancher/rke-tools:v0.1.96".to_string(),
            backup_config: false,
            s3_bucket: None,
        }
    }
}

/// Host configuration builder
#[derive(Clone)]
pub struct HostConfigBuilder {
    address: String,
    internal_address: Option<String>,
    hostname_override: Option<String>,
    agent_port: u16,
    api_key: String,
}

impl HostConfigBuilder {
    pub fn address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    pub fn internal_address(mut self, address: &str) -> Self {
        self.internal_address = Some(address.to_string());
        self
    }

    pub fn hostname_override(mut self, name: &str) -> Self {
        self.hostname_override = Some(name.to_string());
        self
    }

    pub fn agent_port(mut self, port: u16) -> Self {
        self.agent_port = port;
        self
    }

    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = key.to_string();
        self
    }

    fn to_toml(&self) -> String {
        let mut toml = format!(
            r#"
[host]
address = "{}"
agent_port = {}
api_key = "{}"
"#,
            self.address, self.agent_port, self.api_key
        );
        if let Some(internal) = &self.internal_address {
            toml.push_str(&format!("internal_address = \"{}\"\n", internal));
        }
        if let Some(name) = &self.hostname_override {
            toml.push_str(&format!("hostname_override = \"{}\"\n", name));
        }
        toml
    }
}

impl Default for HostConfigBuilder {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            internal_address: None,
            hostname_override: None,
            agent_port: 8745,
            api_key: "test-api-key".to_string(),
        }
    }
}

/// Built test configuration with temp directory
pub struct TestConfig {
    _temp_dir: TempDir,
    pub config_dir: PathBuf,
}

impl TestConfig {
    /// Get the config directory path
    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }

    pub fn config_dir_string(&self) -> String {
        self.config_dir.display().to_string()
    }
}
