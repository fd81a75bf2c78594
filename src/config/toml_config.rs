use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/koheiduck/bert-japanese-finetuned-sentiment";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub job: JobInfo,
    pub filter: FilterConfig,
    pub compress: CompressConfig,
    pub model: ModelConfig,
    pub build: BuildConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobInfo {
    pub name: String,
    pub description: Option<String>,
}

impl Default for JobInfo {
    fn default() -> Self {
        Self {
            name: "cc-sentiment".to_string(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub keywords: Vec<String>,
    /// 每行一個關鍵字；與 `keywords` 合併
    pub keywords_file: Option<PathBuf>,
    pub text_columns: Vec<String>,
    pub case_sensitive: bool,
    pub chunk_size: usize,
    /// -1 代表使用全部 CPU
    pub n_jobs: i32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            keywords_file: None,
            text_columns: vec![
                "title".to_string(),
                "content".to_string(),
                "description".to_string(),
            ],
            case_sensitive: false,
            chunk_size: 10_000,
            n_jobs: -1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressConfig {
    pub max_length: usize,
    /// 未設定時不使用頻度辞書 (所有句子同分)
    pub dictionary_dir: Option<PathBuf>,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            max_length: 512,
            dictionary_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub endpoint: String,
    pub api_token: Option<String>,
    pub batch_size: usize,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MODEL_ENDPOINT.to_string(),
            api_token: None,
            batch_size: 32,
            timeout_seconds: 60,
            retry_attempts: 3,
            retry_delay_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnFileError {
    #[default]
    Fail,
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// 壓縮並送進模型的欄位
    pub text_column: String,
    pub output_prefix: String,
    pub min_rows: Option<usize>,
    pub on_file_error: OnFileError,
    pub summary_file: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            text_column: "content".to_string(),
            output_prefix: "cc_sentiment_".to_string(),
            min_rows: None,
            on_file_error: OnFileError::Fail,
            summary_file: Some("build_summary.json".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: bool,
}

impl JobConfig {
    /// 從 TOML 檔案載入配置；`keywords_file` 以設定檔所在目錄為基準
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        let mut config = Self::from_toml_str(&content)?;

        let base = path.as_ref().parent().map(Path::to_path_buf).unwrap_or_default();
        config.filter.keywords_file = config
            .filter
            .keywords_file
            .take()
            .map(|file| relative_to(&base, file));
        config.compress.dictionary_dir = config
            .compress
            .dictionary_dir
            .take()
            .map(|dir| relative_to(&base, dir));

        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HF_API_TOKEN})；未定義者保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 合併 `keywords` 與 `keywords_file`；檔案中的空行與 `#` 註解略過
    pub fn resolve_keywords(&mut self) -> Result<()> {
        let Some(path) = self.filter.keywords_file.take() else {
            return Ok(());
        };

        let content = std::fs::read_to_string(&path).map_err(|e| EtlError::ConfigError {
            message: format!("Cannot read keywords file {}: {}", path.display(), e),
        })?;

        let before = self.filter.keywords.len();
        self.filter.keywords.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(String::from),
        );
        tracing::debug!(
            "Loaded {} keywords from {}",
            self.filter.keywords.len() - before,
            path.display()
        );

        Ok(())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if self.filter.keywords.is_empty() && self.filter.keywords_file.is_none() {
            return Err(EtlError::MissingConfigError {
                field: "filter.keywords".to_string(),
            });
        }
        if self.filter.text_columns.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "filter.text_columns".to_string(),
            });
        }
        validation::validate_positive_number("filter.chunk_size", self.filter.chunk_size, 1)?;
        validation::validate_n_jobs("filter.n_jobs", self.filter.n_jobs)?;

        validation::validate_url("model.endpoint", &self.model.endpoint)?;
        validation::validate_positive_number("model.batch_size", self.model.batch_size, 1)?;
        validation::validate_positive_number(
            "model.timeout_seconds",
            self.model.timeout_seconds as usize,
            1,
        )?;
        validation::validate_range("model.retry_attempts", self.model.retry_attempts, 0, 10)?;

        validation::validate_non_empty_string("build.text_column", &self.build.text_column)?;
        validation::validate_non_empty_string("build.output_prefix", &self.build.output_prefix)?;
        validation::validate_path("build.output_prefix", &self.build.output_prefix)?;
        if self.build.output_prefix.contains(['/', '\\']) {
            return Err(EtlError::InvalidConfigValueError {
                field: "build.output_prefix".to_string(),
                value: self.build.output_prefix.clone(),
                reason: "Prefix must not contain path separators".to_string(),
            });
        }

        if let Some(dir) = &self.compress.dictionary_dir {
            validation::validate_path("compress.dictionary_dir", &dir.to_string_lossy())?;
        }

        Ok(())
    }
}

fn relative_to(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}

impl ConfigProvider for JobConfig {
    fn keywords(&self) -> &[String] {
        &self.filter.keywords
    }

    fn text_columns(&self) -> &[String] {
        &self.filter.text_columns
    }

    fn case_sensitive(&self) -> bool {
        self.filter.case_sensitive
    }

    fn chunk_size(&self) -> usize {
        self.filter.chunk_size
    }

    fn n_jobs(&self) -> i32 {
        self.filter.n_jobs
    }

    fn analysis_column(&self) -> &str {
        &self.build.text_column
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
