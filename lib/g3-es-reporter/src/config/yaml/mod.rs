/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::{Yaml, YamlLoader};

use super::{
    Credentials, ElasticsearchReporterConfig, MetricPredicateConfig, PredicateColor,
    ReporterCommonConfig, ReporterConfig, TimeUnit,
};

mod value;

impl ReporterConfig {
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read config file {}: {e}", path.display()))?;
        let docs = YamlLoader::load_from_str(&content)
            .map_err(|e| anyhow!("invalid yaml file {}: {e}", path.display()))?;
        match docs.first() {
            Some(doc) => ReporterConfig::parse_yaml(doc)
                .context(format!("invalid reporter config file {}", path.display())),
            None => Ok(ReporterConfig::default()),
        }
    }

    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        match v {
            Yaml::Hash(map) => {
                let mut config = ReporterConfig::default();
                value::foreach_kv(map, |k, v| match value::normalize_key(k).as_str() {
                    "elasticsearch" => {
                        let list = value::as_list(v, ElasticsearchReporterConfig::parse_yaml)
                            .context(format!("invalid elasticsearch reporter value for key {k}"))?;
                        for es in list {
                            config.add_elasticsearch(es);
                        }
                        Ok(())
                    }
                    _ => Err(anyhow!("invalid key {k}")),
                })?;
                Ok(config)
            }
            Yaml::Null => Ok(ReporterConfig::default()),
            _ => Err(anyhow!(
                "yaml value type for 'reporter config' should be 'map'"
            )),
        }
    }
}

impl ElasticsearchReporterConfig {
    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        if let Yaml::Hash(map) = v {
            let mut config = ElasticsearchReporterConfig::default();
            value::foreach_kv(map, |k, v| config.set_by_yaml_kv(k, v))?;
            config.check()?;
            Ok(config)
        } else {
            Err(anyhow!(
                "yaml value type for 'elasticsearch reporter config' should be 'map'"
            ))
        }
    }

    fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match value::normalize_key(k).as_str() {
            "hosts" => {
                let hosts = value::as_list(v, value::as_host_entry)
                    .context(format!("invalid host list value for key {k}"))?;
                self.hosts.set_host_entries(hosts);
            }
            "hosts_string" | "hostsstring" => {
                let s = value::as_string(v).context(format!("invalid string value for key {k}"))?;
                self.hosts.set_hosts_string(s);
            }
            "default_port" | "defaultport" | "port" => {
                let port = value::as_u16(v).context(format!("invalid port value for key {k}"))?;
                self.hosts.set_default_port(port);
            }
            "protocol" => {
                let s = value::as_string(v).context(format!("invalid string value for key {k}"))?;
                self.protocol = s.to_lowercase();
            }
            "db_name" | "dbname" | "index" => {
                self.db_name =
                    value::as_string(v).context(format!("invalid string value for key {k}"))?;
            }
            "auth" => {
                let auth = value::as_credentials(v)
                    .context(format!("invalid credentials value for key {k}"))?;
                self.auth = Some(auth);
            }
            "username" | "user" => {
                let username =
                    value::as_string(v).context(format!("invalid string value for key {k}"))?;
                match &mut self.auth {
                    Some(auth) => auth.set_username(username),
                    None => self.auth = Some(Credentials::new(username, "")),
                }
            }
            "password" => {
                let password =
                    value::as_string(v).context(format!("invalid string value for key {k}"))?;
                match &mut self.auth {
                    Some(auth) => auth.set_password(password),
                    None => self.auth = Some(Credentials::new("", password)),
                }
            }
            "connection_timeout" | "connectiontimeout" | "connect_timeout" => {
                self.connection_timeout = value::as_duration(v, TimeUnit::Milliseconds)
                    .context(format!("invalid duration value for key {k}"))?;
            }
            "read_timeout" | "readtimeout" => {
                self.read_timeout = value::as_duration(v, TimeUnit::Milliseconds)
                    .context(format!("invalid duration value for key {k}"))?;
            }
            "pipeline" => {
                let s = value::as_string(v).context(format!("invalid string value for key {k}"))?;
                self.set_pipeline(s);
            }
            _ => return self.common.set_by_yaml_kv(k, v),
        }
        Ok(())
    }
}

impl ReporterCommonConfig {
    fn set_by_yaml_kv(&mut self, k: &str, v: &Yaml) -> anyhow::Result<()> {
        match value::normalize_key(k).as_str() {
            "period" => match v {
                Yaml::String(s) if u64::from_str(s).is_err() => {
                    let period = value::as_duration(v, TimeUnit::Seconds)
                        .context(format!("invalid duration value for key {k}"))?;
                    self.set_period_duration(period);
                    Ok(())
                }
                _ => {
                    let period =
                        value::as_u64(v).context(format!("invalid u64 value for key {k}"))?;
                    self.set_period_value(period);
                    Ok(())
                }
            },
            "timeunit" | "time_unit" => {
                let unit = value::as_time_unit(v)
                    .context(format!("invalid time unit value for key {k}"))?;
                self.set_time_unit(unit);
                Ok(())
            }
            "rateunit" | "rate_unit" => {
                let unit = value::as_time_unit(v)
                    .context(format!("invalid time unit value for key {k}"))?;
                self.set_rate_unit(unit);
                Ok(())
            }
            "durationunit" | "duration_unit" => {
                let unit = value::as_time_unit(v)
                    .context(format!("invalid time unit value for key {k}"))?;
                self.set_duration_unit(unit);
                Ok(())
            }
            "prefix" => {
                let prefix =
                    value::as_string(v).context(format!("invalid string value for key {k}"))?;
                self.set_prefix(prefix);
                Ok(())
            }
            "tags" => {
                let tags = value::as_string_map(v).context(format!("invalid tags value for key {k}"))?;
                for (name, value) in tags {
                    self.add_tag(name, value);
                }
                Ok(())
            }
            "predicate" => {
                let predicate = MetricPredicateConfig::parse_yaml(v)
                    .context(format!("invalid predicate value for key {k}"))?;
                self.set_predicate(predicate);
                Ok(())
            }
            "group_gauges" | "groupgauges" => {
                let enable = value::as_bool(v).context(format!("invalid bool value for key {k}"))?;
                self.set_group_gauges(enable);
                Ok(())
            }
            _ => Err(anyhow!("invalid key {k}")),
        }
    }
}

impl MetricPredicateConfig {
    pub fn parse_yaml(v: &Yaml) -> anyhow::Result<Self> {
        if let Yaml::Hash(map) = v {
            let mut config = MetricPredicateConfig::default();
            value::foreach_kv(map, |k, v| match value::normalize_key(k).as_str() {
                "color" => {
                    let s = value::as_string(v).context(format!("invalid string value for key {k}"))?;
                    let color = PredicateColor::from_str(&s)?;
                    config.set_color(color);
                    Ok(())
                }
                "use_qualified_name" | "usequalifiedname" => {
                    let enable =
                        value::as_bool(v).context(format!("invalid bool value for key {k}"))?;
                    config.set_use_qualified_name(enable);
                    Ok(())
                }
                "patterns" | "pattern" => {
                    let patterns = value::as_list(v, value::as_string)
                        .context(format!("invalid pattern list value for key {k}"))?;
                    for p in patterns {
                        config
                            .add_pattern(&p)
                            .map_err(|e| anyhow!("invalid regex pattern {p}: {e}"))?;
                    }
                    Ok(())
                }
                _ => Err(anyhow!("invalid key {k}")),
            })?;
            Ok(config)
        } else {
            Err(anyhow!(
                "yaml value type for 'metric predicate' should be 'map'"
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HostPort;
    use std::time::Duration;

    macro_rules! yaml_doc {
        ($s:expr) => {
            YamlLoader::load_from_str($s).unwrap().pop().unwrap()
        };
    }

    #[test]
    fn parse_full() {
        let yaml = yaml_doc!(
            r#"
                hosts:
                  - es1:9201
                protocol: HTTPS
                db_name: app-metrics
                auth: "elastic:changeme"
                connection_timeout: 500
                read-timeout: 2s
                pipeline: metrics-pipeline
                period: 10
                timeunit: SECONDS
                rateunit: MINUTES
                durationunit: MICROSECONDS
                prefix: svc
                tags:
                  env: prod
                  zone: 1
                group_gauges: true
                predicate:
                  color: black
                  use_qualified_name: true
                  patterns:
                    - "jvm\\..*"
            "#
        );
        let config = ElasticsearchReporterConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(
            config.full_host_list().unwrap(),
            vec![HostPort::new("es1", 9201)]
        );
        assert_eq!(config.protocol(), "https");
        assert_eq!(config.db_name(), "app-metrics");
        assert_eq!(
            config.auth(),
            Some(&Credentials::new("elastic", "changeme"))
        );
        assert_eq!(config.connection_timeout(), Duration::from_millis(500));
        assert_eq!(config.read_timeout(), Duration::from_secs(2));
        assert_eq!(config.pipeline(), Some("metrics-pipeline"));

        let common = config.common();
        assert_eq!(common.period_duration().unwrap(), Duration::from_secs(10));
        assert_eq!(common.rate_unit(), TimeUnit::Minutes);
        assert_eq!(common.duration_unit(), TimeUnit::Microseconds);
        assert_eq!(common.prefix(), "svc");
        assert_eq!(common.tags().get("env").unwrap(), "prod");
        assert_eq!(common.tags().get("zone").unwrap(), "1");
        assert!(common.group_gauges());

        let predicate = common.predicate().unwrap();
        assert_eq!(predicate.color(), PredicateColor::Black);
        assert!(predicate.use_qualified_name());
        assert!(!predicate.allow("jvm.heap"));
        assert!(predicate.allow("requests"));
    }

    #[test]
    fn parse_hosts_string() {
        let yaml = yaml_doc!(
            r#"
                hostsString: "es1, es2:9300"
                defaultPort: 19200
                dbName: m
                period: 30s
            "#
        );
        let config = ElasticsearchReporterConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(
            config.full_host_list().unwrap(),
            vec![HostPort::new("es1", 19200), HostPort::new("es2", 9300)]
        );
        assert_eq!(config.db_name(), "m");
        assert_eq!(
            config.common().period_duration().unwrap(),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn parse_host_map_and_auth_map() {
        let yaml = yaml_doc!(
            r#"
                hosts:
                  - host: es1
                  - host: es2
                    port: 9201
                auth:
                  username: elastic
                  password: secret
            "#
        );
        let config = ElasticsearchReporterConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(
            config.full_host_list().unwrap(),
            vec![HostPort::new("es1", 9200), HostPort::new("es2", 9201)]
        );
        assert_eq!(config.auth(), Some(&Credentials::new("elastic", "secret")));

        let yaml = yaml_doc!(
            r#"
                username: elastic
                password: secret
            "#
        );
        let config = ElasticsearchReporterConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.auth(), Some(&Credentials::new("elastic", "secret")));
        assert!(config.check().is_ok());
    }

    #[test]
    fn default_port_after_hosts() {
        let yaml = yaml_doc!(
            r#"
                hosts:
                  - es1
                  - host: es2
                  - es3:9300
                default_port: 19200
            "#
        );
        let config = ElasticsearchReporterConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(
            config.full_host_list().unwrap(),
            vec![
                HostPort::new("es1", 19200),
                HostPort::new("es2", 19200),
                HostPort::new("es3", 9300)
            ]
        );

        let yaml = yaml_doc!(
            r#"
                default_port: 19200
                hosts: es1
            "#
        );
        let config = ElasticsearchReporterConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(
            config.full_host_list().unwrap(),
            vec![HostPort::new("es1", 19200)]
        );
    }

    #[test]
    fn timeunit_after_humanized_period() {
        let yaml = yaml_doc!(
            r#"
                period: 30s
                timeunit: SECONDS
            "#
        );
        let config = ElasticsearchReporterConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(
            config.common().period_duration().unwrap(),
            Duration::from_secs(30)
        );

        let yaml = yaml_doc!(
            r#"
                timeunit: MINUTES
                period: 500ms
            "#
        );
        let config = ElasticsearchReporterConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(
            config.common().period_duration().unwrap(),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn parse_err() {
        let yaml = yaml_doc!("invalid_key: 1");
        assert!(ElasticsearchReporterConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!("protocol: gopher");
        assert!(ElasticsearchReporterConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!("period: 0");
        assert!(ElasticsearchReporterConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!("timeunit: fortnights");
        assert!(ElasticsearchReporterConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!("hosts: es1:http");
        assert!(ElasticsearchReporterConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!("password: secret");
        assert!(ElasticsearchReporterConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!(
            r#"
                predicate:
                  patterns: "(unclosed"
            "#
        );
        assert!(ElasticsearchReporterConfig::parse_yaml(&yaml).is_err());

        let yaml = yaml_doc!("- a");
        assert!(ElasticsearchReporterConfig::parse_yaml(&yaml).is_err());
    }

    #[test]
    fn reporter_config() {
        let yaml = yaml_doc!(
            r#"
                elasticsearch:
                  - hosts: es1
                    period: 5
                  - hosts_string: "es2,es3"
            "#
        );
        let config = ReporterConfig::parse_yaml(&yaml).unwrap();
        assert_eq!(config.elasticsearch().len(), 2);
        assert_eq!(
            config.elasticsearch()[0].full_host_list().unwrap(),
            vec![HostPort::new("es1", 9200)]
        );

        let yaml = yaml_doc!("graphite: []");
        assert!(ReporterConfig::parse_yaml(&yaml).is_err());

        assert!(
            ReporterConfig::parse_yaml(&Yaml::Null)
                .unwrap()
                .elasticsearch()
                .is_empty()
        );
    }
}
