//! 收据邮件发送
//!
//! - [`SesMailer`]: 构造 `multipart/mixed` 原始邮件，经 AWS SES v2 发送
//! - [`LogMailer`]: 只记录日志，开发环境默认

use async_trait::async_trait;
use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::primitives::Blob;
use aws_sdk_sesv2::types::{EmailContent, RawMessage};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Base64 line length for MIME bodies (RFC 2045)
const MIME_LINE_LEN: usize = 76;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("Failed to send email: {0}")]
    Send(String),
}

/// 邮件附件
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Attachment {
    pub fn pdf(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: "application/pdf".to_string(),
            data,
        }
    }
}

/// 收据邮件发送方
#[async_trait]
pub trait ReceiptMailer: Send + Sync {
    async fn send_receipt(
        &self,
        to: &str,
        subject: &str,
        body_text: &str,
        attachment: Attachment,
    ) -> Result<(), MailError>;
}

/// 只记录日志，不实际发送
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl ReceiptMailer for LogMailer {
    async fn send_receipt(
        &self,
        to: &str,
        subject: &str,
        _body_text: &str,
        attachment: Attachment,
    ) -> Result<(), MailError> {
        tracing::info!(
            to,
            subject,
            attachment = %attachment.filename,
            attachment_bytes = attachment.data.len(),
            "Receipt email logged (MAIL_TRANSPORT=log)"
        );
        Ok(())
    }
}

/// AWS SES v2 发送
#[derive(Debug, Clone)]
pub struct SesMailer {
    client: SesClient,
    from: String,
}

impl SesMailer {
    pub fn new(client: SesClient, from: impl Into<String>) -> Self {
        Self {
            client,
            from: from.into(),
        }
    }

    /// 使用默认 AWS 凭证链创建
    pub async fn from_default_config(from: impl Into<String>) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(SesClient::new(&aws_config), from)
    }
}

#[async_trait]
impl ReceiptMailer for SesMailer {
    async fn send_receipt(
        &self,
        to: &str,
        subject: &str,
        body_text: &str,
        attachment: Attachment,
    ) -> Result<(), MailError> {
        let boundary = format!("----=_Part_{}", uuid::Uuid::new_v4().simple());
        let mime = build_mime_message(&self.from, to, subject, body_text, &attachment, &boundary);

        let raw = RawMessage::builder()
            .data(Blob::new(mime.into_bytes()))
            .build()
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.client
            .send_email()
            .from_email_address(&self.from)
            .destination(
                aws_sdk_sesv2::types::Destination::builder()
                    .to_addresses(to)
                    .build(),
            )
            .content(EmailContent::builder().raw(raw).build())
            .send()
            .await
            .map_err(|e| {
                MailError::Send(aws_sdk_sesv2::error::DisplayErrorContext(&e).to_string())
            })?;

        tracing::info!(to, attachment_bytes = attachment.data.len(), "Receipt email sent");
        Ok(())
    }
}

/// 构造带一个附件的 `multipart/mixed` 邮件 (CRLF 换行)
pub fn build_mime_message(
    from: &str,
    to: &str,
    subject: &str,
    body_text: &str,
    attachment: &Attachment,
    boundary: &str,
) -> String {
    let encoded = STANDARD.encode(&attachment.data);
    let wrapped = encoded
        .as_bytes()
        .chunks(MIME_LINE_LEN)
        .map(|chunk| String::from_utf8_lossy(chunk))
        .collect::<Vec<_>>()
        .join("\r\n");
    let body_text = body_text.replace("\r\n", "\n").replace('\n', "\r\n");

    let mut out = String::with_capacity(wrapped.len() + body_text.len() + 512);
    out.push_str(&format!("From: {from}\r\n"));
    out.push_str(&format!("To: {to}\r\n"));
    out.push_str(&format!("Subject: {subject}\r\n"));
    out.push_str("MIME-Version: 1.0\r\n");
    out.push_str(&format!(
        "Content-Type: multipart/mixed; boundary=\"{boundary}\"\r\n\r\n"
    ));

    out.push_str(&format!("--{boundary}\r\n"));
    out.push_str("Content-Type: text/plain; charset=UTF-8\r\n");
    out.push_str("Content-Transfer-Encoding: 8bit\r\n\r\n");
    out.push_str(&body_text);
    out.push_str("\r\n\r\n");

    out.push_str(&format!("--{boundary}\r\n"));
    out.push_str(&format!(
        "Content-Type: {}; name=\"{}\"\r\n",
        attachment.content_type, attachment.filename
    ));
    out.push_str("Content-Transfer-Encoding: base64\r\n");
    out.push_str(&format!(
        "Content-Disposition: attachment; filename=\"{}\"\r\n\r\n",
        attachment.filename
    ));
    out.push_str(&wrapped);
    out.push_str("\r\n");
    out.push_str(&format!("--{boundary}--\r\n"));
    out
}
