//! Organic Shop Server - 有机商店后端
//!
//! # 架构概述
//!
//! - **订单存储** (`orders`): JSON 文件存储，文件锁 + 原子重命名 + 备份轮转
//! - **支付** (`services/stripe`): Stripe PaymentIntents REST 调用
//! - **收据** (`receipt`, `services/email`): PDF 收据 + SES 邮件
//! - **HTTP API** (`api`): axum 路由、限流、静态前端
//!
//! # 模块结构
//!
//! ```text
//! shop-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── orders/        # 锁、备份、存储、订单服务
//! ├── receipt/       # PDF 收据渲染
//! ├── services/      # 路由装配、支付网关、邮件
//! ├── server/        # 中间件
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod core;
pub mod orders;
pub mod receipt;
pub mod server;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use orders::{OrderService, OrderStore, StoreError, StoreOptions};
pub use services::https::build_app;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 设置运行环境: 加载 .env、读取配置、初始化日志
pub fn setup_environment() -> Result<Config, BoxError> {
    // .env 文件可选
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   ____                        _         _____ __
  / __ \_________ _____ _____ (_)____   / ___// /_  ____  ____
 / / / / ___/ __ `/ __ `/ __ \/ / ___/   \__ \/ __ \/ __ \/ __ \
/ /_/ / /  / /_/ / /_/ / / / / / /__    ___/ / / / / /_/ / /_/ /
\____/_/   \__, /\__,_/_/ /_/_/\___/   /____/_/ /_/\____/ .___/
          /____/                                        /_/
    "#
    );
}
