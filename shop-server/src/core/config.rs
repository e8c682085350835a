use std::path::PathBuf;
use std::time::Duration;

use crate::orders::StoreOptions;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 邮件发送方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTransport {
    /// 只记录日志 (开发环境)
    Log,
    /// AWS SES v2
    Ses,
}

impl MailTransport {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "log" => Some(Self::Log),
            "ses" => Some(Self::Ses),
            _ => None,
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 订单数据目录 |
/// | HTTP_PORT | 3001 | HTTP 服务端口 |
/// | STATIC_DIR | ../dist | 前端构建产物目录 |
/// | ENVIRONMENT | development | 运行环境 |
/// | STRIPE_SECRET_KEY | (开发环境可省略) | Stripe 密钥 |
/// | STRIPE_API_BASE | https://api.stripe.com | Stripe API 地址 |
/// | MAIL_TRANSPORT | log (开发) / ses | 收据邮件发送方式 |
/// | EMAIL_FROM | receipts@organicshop.local | 发件人 |
/// | LOCK_TIMEOUT_MS | 5000 | 订单写锁超时 |
/// | BACKUP_KEEP | 10 | 保留备份份数 |
/// | RATE_LIMIT_MAX_REQUESTS | 100 | 每个 IP 每窗口最大请求数 |
/// | RATE_LIMIT_WINDOW_SECS | 900 | 限流窗口 (秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录，存在时启用文件日志 |
#[derive(Debug, Clone)]
pub struct Config {
    /// 数据目录: orders.json、锁文件、备份
    pub work_dir: String,
    pub http_port: u16,
    /// 前端 SPA 静态文件目录
    pub static_dir: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub mail_transport: MailTransport,
    pub email_from: String,
    pub lock_timeout_ms: u64,
    pub backup_keep: usize,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// 从环境变量加载配置
    ///
    /// 数值解析失败时使用默认值；生产环境缺少密钥时报错。
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let default_transport = if environment == "development" {
            MailTransport::Log
        } else {
            MailTransport::Ses
        };
        let mail_transport = match std::env::var("MAIL_TRANSPORT") {
            Ok(v) => MailTransport::parse(&v)
                .ok_or_else(|| format!("MAIL_TRANSPORT must be 'log' or 'ses', got '{v}'"))?,
            Err(_) => default_transport,
        };

        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: env_parse("HTTP_PORT", 3001),
            static_dir: std::env::var("STATIC_DIR").unwrap_or_else(|_| "../dist".into()),
            stripe_secret_key: Self::require_secret("STRIPE_SECRET_KEY", &environment)?,
            stripe_api_base: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com".into()),
            mail_transport,
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "receipts@organicshop.local".into()),
            lock_timeout_ms: env_parse("LOCK_TIMEOUT_MS", 5000),
            backup_keep: env_parse("BACKUP_KEEP", 10),
            rate_limit_max_requests: env_parse("RATE_LIMIT_MAX_REQUESTS", 100),
            rate_limit_window_secs: env_parse("RATE_LIMIT_WINDOW_SECS", 900),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            environment,
        })
    }

    /// 开发环境默认值，数据目录指定为 `work_dir`
    ///
    /// 不读取环境变量，常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 3001,
            static_dir: "../dist".into(),
            environment: "development".into(),
            stripe_secret_key: "dev-STRIPE_SECRET_KEY-not-for-production".into(),
            stripe_api_base: "https://api.stripe.com".into(),
            mail_transport: MailTransport::Log,
            email_from: "receipts@organicshop.local".into(),
            lock_timeout_ms: 5000,
            backup_keep: 10,
            rate_limit_max_requests: 100,
            rate_limit_window_secs: 900,
            log_level: "info".into(),
            log_dir: None,
        }
    }

    /// 订单存储选项
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            lock_timeout: Duration::from_millis(self.lock_timeout_ms),
            backup_keep: self.backup_keep,
        }
    }

    pub fn static_path(&self) -> PathBuf {
        PathBuf::from(&self.static_dir)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
