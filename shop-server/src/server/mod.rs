//! 服务器 HTTP 层组件

pub mod middleware;
