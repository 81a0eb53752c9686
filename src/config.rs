use crate::error::ConfigError;
use crate::models::pattern::{PatternSet, PatternSpec};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 默认接受全文的附件类型
pub static DEFAULT_CONTENT_TYPES: phf::Set<&'static str> = phf::phf_set! {
    "application/pdf",
    "text/html",
};

/// 程序配置文件
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 源分组名称
    pub source_collection: String,
    /// 目标分组名称（promote 使用）
    pub target_collection: String,
    /// 输出目录
    pub output_dir: String,
    /// 合并全文文件名（位于输出目录）
    pub combined_file: String,
    /// 统计报告文件名（位于输出目录）
    pub stats_file: String,
    /// 投票笔记的匹配规则
    pub vote_pattern: String,
    /// 至少需要的投票笔记数量
    pub quorum: usize,
    /// 接受全文的附件类型
    pub content_types: Vec<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 关键词表（按顺序输出）
    pub patterns: Vec<PatternSpec>,
    /// 文献库来源
    pub store: StoreConfig,
}

/// 文献库来源配置
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    /// 本地 TOML 快照
    Snapshot { path: String },
    /// Web API
    Web {
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default)]
        library_type: LibraryType,
        library_id: String,
        #[serde(default)]
        api_key: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryType {
    #[default]
    User,
    Group,
}

impl LibraryType {
    pub fn path_segment(self) -> &'static str {
        match self {
            LibraryType::User => "users",
            LibraryType::Group => "groups",
        }
    }
}

fn default_base_url() -> String {
    "https://api.zotero.org".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_collection: "SOURCE".to_string(),
            target_collection: "TARGET".to_string(),
            output_dir: "output".to_string(),
            combined_file: "all_files.txt".to_string(),
            stats_file: "stats.txt".to_string(),
            vote_pattern: "^(Y-|YES-)".to_string(),
            quorum: 2,
            content_types: DEFAULT_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
            verbose_logging: false,
            patterns: default_patterns(),
            store: StoreConfig::Snapshot {
                path: "library.toml".to_string(),
            },
        }
    }
}

/// 默认关键词表
///
/// 单词边界和 `\w` 只按 ASCII 判定，与常见 JS 正则行为一致
pub fn default_patterns() -> Vec<PatternSpec> {
    vec![
        PatternSpec::new("dataf*", r"(?-u:\b)dataf(?-u:\w)*(?-u:\b)"),
        PatternSpec::new("higher education", r"(?-u:\b)higher education(?-u:\b)"),
        PatternSpec::new("education", r"(?-u:\b)education(?-u:\b)"),
        PatternSpec::new("universit*", r"(?-u:\b)universit(?-u:\w)*(?-u:\b)"),
        PatternSpec::new("child*", r"(?-u:\b)child(?-u:\w)*(?-u:\b)"),
        PatternSpec::new("school*", r"(?-u:\b)school(?-u:\w)*(?-u:\b)"),
        PatternSpec::new(
            "primary school*",
            r"(?-u:\b)(primary|elementary|grade) school(s)?(?-u:\b)",
        ),
        PatternSpec::new(
            "secondary school*",
            r"(?-u:\b)(secondary|high|middle|junior high|senior high) school(s)?(?-u:\b)",
        ),
    ]
}

impl Config {
    /// 读取配置文件（不存在时使用默认值），再叠加环境变量
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
                    path: path.display().to_string(),
                    source,
                })?;
            toml::from_str::<Config>(&content).map_err(|source| ConfigError::ParseFailed {
                path: path.display().to_string(),
                source,
            })?
        } else {
            tracing::debug!("配置文件 {} 不存在，使用默认配置", path.display());
            Self::default()
        };

        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("REF_BATCH_SOURCE") {
            self.source_collection = v;
        }
        if let Ok(v) = std::env::var("REF_BATCH_TARGET") {
            self.target_collection = v;
        }
        if let Ok(v) = std::env::var("REF_BATCH_OUTPUT_DIR") {
            self.output_dir = v;
        }
        if let Ok(v) = std::env::var("REF_BATCH_SNAPSHOT") {
            self.store = StoreConfig::Snapshot { path: v };
        }
        if let Ok(v) = std::env::var("REF_BATCH_API_KEY") {
            if let StoreConfig::Web { api_key, .. } = &mut self.store {
                *api_key = Some(v);
            }
        }
        self.verbose_logging = std::env::var("REF_BATCH_VERBOSE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.verbose_logging);
        self
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        Path::new(&self.output_dir).join(file_name)
    }

    /// 在任何 I/O 之前一次性校验配置并编译所有规则
    pub fn validate(self) -> Result<ValidatedConfig, ConfigError> {
        require_non_empty("source_collection", &self.source_collection)?;
        require_non_empty("target_collection", &self.target_collection)?;
        require_non_empty("output_dir", &self.output_dir)?;
        require_non_empty("combined_file", &self.combined_file)?;
        require_non_empty("stats_file", &self.stats_file)?;

        if self.quorum == 0 {
            return Err(ConfigError::invalid("quorum", "至少为 1"));
        }
        if self.patterns.is_empty() {
            return Err(ConfigError::invalid("patterns", "关键词表不能为空"));
        }
        if self.content_types.is_empty() {
            return Err(ConfigError::invalid("content_types", "附件类型不能为空"));
        }
        match &self.store {
            StoreConfig::Snapshot { path } => require_non_empty("store.path", path)?,
            StoreConfig::Web {
                base_url,
                library_id,
                ..
            } => {
                require_non_empty("store.base_url", base_url)?;
                require_non_empty("store.library_id", library_id)?;
            }
        }

        let patterns = PatternSet::compile(&self.patterns)?;
        let vote_pattern = RegexBuilder::new(&self.vote_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ConfigError::InvalidPattern {
                label: "vote_pattern".to_string(),
                source,
            })?;

        Ok(ValidatedConfig {
            config: self,
            patterns,
            vote_pattern,
        })
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::invalid(field, "不能为空"))
    } else {
        Ok(())
    }
}

/// 校验通过的配置，携带编译好的规则
#[derive(Clone, Debug)]
pub struct ValidatedConfig {
    pub config: Config,
    pub patterns: PatternSet,
    pub vote_pattern: Regex,
}

impl ValidatedConfig {
    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        self.config
            .content_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let validated = Config::default().validate().unwrap();
        assert_eq!(validated.patterns.len(), 8);
        assert!(validated.accepts_content_type("application/pdf"));
        assert!(validated.accepts_content_type("TEXT/HTML"));
        assert!(!validated.accepts_content_type("image/png"));
    }

    #[test]
    fn test_empty_source_rejected() {
        let config = Config {
            source_collection: " ".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "source_collection"
        ));
    }

    #[test]
    fn test_zero_quorum_rejected() {
        let config = Config {
            quorum: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_web_store_requires_library_id() {
        let config = Config {
            store: StoreConfig::Web {
                base_url: default_base_url(),
                library_type: LibraryType::Group,
                library_id: String::new(),
                api_key: None,
            },
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_toml_config() {
        let content = r#"
source_collection = "SELECTED"
output_dir = "out"

[store]
kind = "web"
library_type = "group"
library_id = "12345"

[[patterns]]
label = "education"
pattern = '\beducation\b'
"#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.source_collection, "SELECTED");
        assert_eq!(config.target_collection, "TARGET");
        assert_eq!(config.patterns.len(), 1);
        assert_eq!(
            config.store,
            StoreConfig::Web {
                base_url: "https://api.zotero.org".to_string(),
                library_type: LibraryType::Group,
                library_id: "12345".to_string(),
                api_key: None,
            }
        );
    }
}
