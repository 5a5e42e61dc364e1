use thiserror::Error;

/// SDK 错误类型，经 `anyhow::Error` 向外传递，可用 `downcast_ref` 取回
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HbdmError {
    #[error("invalid config: {0}")]
    Config(String),

    #[error("http status {status}: {body}")]
    Http { status: u16, body: String },

    /// 接口返回 status != "ok"
    #[error("{code}:[{msg}]")]
    Api { code: i64, msg: String },

    /// 撤单等批量接口 errors 列表里的第一条
    #[error("{0}")]
    Rejected(String),

    #[error("not found")]
    NotFound,

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
