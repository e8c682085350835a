use std::sync::Arc;
use std::time::Duration;

use crate::core::config::MailTransport;
use crate::core::{Config, Result};
use crate::orders::{OrderService, OrderStore};
use crate::server::middleware::RateLimiter;
use crate::services::{LogMailer, PaymentGateway, ReceiptMailer, SesMailer, StripeGateway};

/// 限流表清理间隔
const RATE_LIMIT_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// 服务器状态 - 持有所有服务的共享引用
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | orders | OrderService | 订单存储与服务 |
/// | payments | Arc<dyn PaymentGateway> | 支付网关 |
/// | mailer | Arc<dyn ReceiptMailer> | 收据邮件 |
/// | rate_limiter | RateLimiter | 每 IP 限流 |
///
/// 所有字段都是浅拷贝，`clone()` 成本很低。
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub orders: OrderService,
    pub payments: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn ReceiptMailer>,
    pub rate_limiter: RateLimiter,
}

impl ServerState {
    /// 使用现成的组件创建 (测试中注入假网关与假邮件)
    pub fn new(
        config: Config,
        orders: OrderService,
        payments: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn ReceiptMailer>,
    ) -> Self {
        let rate_limiter = RateLimiter::new(
            config.rate_limit_max_requests,
            Duration::from_secs(config.rate_limit_window_secs),
        );
        Self {
            config,
            orders,
            payments,
            mailer,
            rate_limiter,
        }
    }

    /// 按配置初始化所有服务
    pub async fn initialize(config: &Config) -> Result<Self> {
        let store = OrderStore::open(&config.work_dir, config.store_options()).await?;
        let orders = OrderService::new(store);

        let payments: Arc<dyn PaymentGateway> = Arc::new(StripeGateway::new(
            &config.stripe_secret_key,
            &config.stripe_api_base,
        )?);

        let mailer: Arc<dyn ReceiptMailer> = match config.mail_transport {
            MailTransport::Log => Arc::new(LogMailer),
            MailTransport::Ses => {
                Arc::new(SesMailer::from_default_config(&config.email_from).await)
            }
        };

        tracing::info!(
            work_dir = %config.work_dir,
            environment = %config.environment,
            mail_transport = ?config.mail_transport,
            "Server state initialized"
        );

        Ok(Self::new(config.clone(), orders, payments, mailer))
    }

    /// 启动后台任务: 定期清理过期的限流记录
    pub fn start_background_tasks(&self) {
        let limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(RATE_LIMIT_CLEANUP_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                limiter.cleanup().await;
            }
        });
    }
}
